use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use speedwrite::{
    app::{App, Flow},
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    feedback::{Bell, KeystrokeFeedback},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, InputEventSource, Runner},
    Catalog, Language, Trainer, TICK_RATE_MS,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

/// terminal typing speed trainer with live highlighting and wpm reports
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a reference text against the clock. Characters are highlighted as you type, and gross wpm, net wpm and accuracy are reported when you stop."
)]
pub struct Cli {
    /// language of the practice texts
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// compare characters without regard to case
    #[clap(short = 'i', long)]
    ignore_case: bool,

    /// JSON catalog of practice texts to use instead of the built-in ones
    #[clap(short = 't', long)]
    texts: Option<PathBuf>,

    /// index of the text to select at startup
    #[clap(short = 'n', long = "text")]
    text_index: Option<usize>,

    /// do not ring the terminal bell on mistakes
    #[clap(short = 'm', long)]
    mute: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags layered over the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(language) = self.language {
            cfg.language = language;
        }
        if self.texts.is_some() {
            cfg.texts_path = self.texts.clone();
        }
        cfg.ignore_case |= self.ignore_case;
        cfg.muted |= self.mute;
        cfg
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let _log_guard = AppDirs::log_dir()
        .filter(|dir| fs::create_dir_all(dir).is_ok())
        .and_then(|dir| logging::init_tracing(&dir));

    let store = FileConfigStore::new();
    let cfg = cli.apply(store.load());
    if cli.save_config {
        store.save(&cfg)?;
        info!(path = %store.path().display(), "config saved");
    }

    let catalog = match &cfg.texts_path {
        Some(path) => Catalog::load_from_path(path).unwrap_or_else(|err| {
            Cli::command()
                .error(
                    ErrorKind::Io,
                    format!("cannot load texts from {}: {err}", path.display()),
                )
                .exit()
        }),
        None => Catalog::builtin()?,
    };

    let mut trainer = Trainer::new(
        catalog,
        cfg.language,
        cfg.ignore_case,
        SystemClock,
        Bell::new(io::stdout(), cfg.muted),
    );
    if let Some(index) = cli.text_index {
        if let Err(err) = trainer.select_text(index) {
            Cli::command()
                .error(ErrorKind::ValueValidation, err.to_string())
                .exit();
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(trainer);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        warn!(%err, "terminal loop failed");
    }
    result
}

fn start_tui<B, E, C, F>(
    terminal: &mut Terminal<B>,
    app: &mut App<C, F>,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    E: InputEventSource,
    C: Clock,
    F: KeystrokeFeedback,
{
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.on_input(runner.step()) == Flow::Quit {
            break;
        }
    }

    Ok(())
}

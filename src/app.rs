use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::clock::Clock;
use crate::error::TrainerError;
use crate::feedback::KeystrokeFeedback;
use crate::runtime::InputEvent;
use crate::trainer::{Trainer, TrainerEvent, Transition};

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end state: the trainer plus the writing box the user types
/// into. Every change to the writing box is forwarded to the trainer as a
/// keystroke carrying the full box contents.
#[derive(Debug)]
pub struct App<C: Clock, F: KeystrokeFeedback> {
    pub trainer: Trainer<C, F>,
    pub writing_box: String,
    /// Message from the last rejected event, shown until the next success.
    pub status: Option<String>,
}

impl<C: Clock, F: KeystrokeFeedback> App<C, F> {
    pub fn new(trainer: Trainer<C, F>) -> Self {
        let status = (!trainer.can_start()).then(|| TrainerError::EmptyCatalog.to_string());
        Self {
            trainer,
            writing_box: String::new(),
            status,
        }
    }

    pub fn on_input(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::Key(key) => self.on_key(key),
            InputEvent::Paste(text) => {
                if self.trainer.is_running() {
                    // the writing box is a single line
                    self.writing_box
                        .extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
                    self.send_box();
                }
                Flow::Continue
            }
            InputEvent::Resize | InputEvent::Tick => Flow::Continue,
            InputEvent::Closed => Flow::Quit,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if ctrl => return Flow::Quit,
            KeyCode::Char('r') if ctrl => {
                self.writing_box.clear();
                match self.trainer.start() {
                    Ok(()) => self.status = None,
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
            KeyCode::Enter => {
                self.writing_box.clear();
                self.dispatch(TrainerEvent::StartStop);
            }
            _ if self.trainer.is_running() => self.on_typing_key(key, ctrl),
            _ => self.on_idle_key(key),
        }
        Flow::Continue
    }

    fn on_typing_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char(c) if !ctrl => {
                self.writing_box.push(c);
                self.send_box();
            }
            KeyCode::Backspace => {
                if self.writing_box.pop().is_some() {
                    self.send_box();
                }
            }
            _ => {}
        }
    }

    fn on_idle_key(&mut self, key: KeyEvent) {
        let count = self.trainer.catalog().len();
        let selected = self.trainer.selected_index();

        match key.code {
            KeyCode::Right | KeyCode::Down if count > 0 => {
                self.dispatch(TrainerEvent::SelectText((selected + 1) % count));
            }
            KeyCode::Left | KeyCode::Up if count > 0 => {
                self.dispatch(TrainerEvent::SelectText((selected + count - 1) % count));
            }
            KeyCode::Char('l') => {
                let language = self.trainer.language().toggled();
                self.dispatch(TrainerEvent::SetLanguage(language));
            }
            KeyCode::Char('i') => {
                let ignore_case = !self.trainer.ignore_case();
                self.dispatch(TrainerEvent::SetIgnoreCase(ignore_case));
            }
            _ => {}
        }
    }

    fn send_box(&mut self) {
        let text = self.writing_box.clone();
        self.dispatch(TrainerEvent::Keystroke(text));
    }

    fn dispatch(&mut self, event: TrainerEvent) {
        match self.trainer.handle(event) {
            Ok(transition) => {
                if !matches!(transition, Transition::Typed { .. }) {
                    debug!(?transition, "trainer transition");
                }
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }
}

use std::path::Path;
use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "SPEEDWRITE_LOG";

const LOG_FILE: &str = "speedwrite.log";

static INIT: Once = Once::new();

/// Routes `tracing` output to a log file in `log_dir`; the terminal belongs to
/// the UI. The returned guard flushes pending lines when dropped, so keep it
/// alive for the life of the program.
pub fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    let mut guard = None;
    INIT.call_once(|| {
        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (non_blocking, g) = tracing_appender::non_blocking(file_appender);
        guard = Some(g);

        tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_env_filter(
                EnvFilter::try_from_env(LOG_ENV)
                    .unwrap_or_else(|_| EnvFilter::new("speedwrite=info")),
            )
            .init();
    });
    guard
}

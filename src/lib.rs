// Library surface for the binary, headless runs and integration tests.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod feedback;
pub mod highlight;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod trainer;
pub mod ui;

pub use catalog::{Catalog, Language, PracticeText};
pub use error::{CatalogError, TrainerError};
pub use scoring::ScoreReport;
pub use trainer::{Trainer, TrainerEvent, Transition};

/// Redraw interval for the live timer.
pub const TICK_RATE_MS: u64 = 100;

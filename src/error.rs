use std::io;

/// Failures surfaced by the trainer core. All of them are local to the
/// operation that raised them and leave the trainer usable.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum TrainerError {
    /// Scoring was attempted with a non-positive (or non-finite) elapsed time.
    #[error("invalid session: elapsed time of {elapsed_minutes} minutes cannot be scored")]
    InvalidSession { elapsed_minutes: f64 },

    #[error("no practice texts are available")]
    EmptyCatalog,

    #[error("text index {index} is out of range (catalog holds {len} texts)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Keystrokes or stop requests that arrive while no session is running.
    #[error("no session is running")]
    NotRunning,
}

/// Failures while reading a practice text catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("embedded catalog {0} is missing or not UTF-8")]
    Embedded(String),
}

use itertools::Itertools;

use crate::error::TrainerError;
use crate::highlight::chars_match;

/// Keystrokes per word used by the WPM convention.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Results of a finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReport {
    pub gross_wpm: f64,
    /// Never negative.
    pub net_wpm: f64,
    /// `None` when nothing was typed, rendered as "N/A".
    pub accuracy_percent: Option<f64>,
    pub error_count: usize,
    pub typed_words: usize,
    pub elapsed_minutes: f64,
}

/// Counts positions where both strings have a character and they differ.
/// Untyped reference positions and typed characters past the end of the
/// reference are not errors.
pub fn count_errors(reference: &str, typed: &str, ignore_case: bool) -> usize {
    reference
        .chars()
        .zip(typed.chars())
        .filter(|&(expected, c)| !chars_match(expected, c, ignore_case))
        .count()
}

/// Number of non-empty tokens between single spaces.
pub fn count_words(typed: &str) -> usize {
    typed.split(' ').filter(|w| !w.is_empty()).count()
}

/// Accuracy over the typed characters, or `None` for empty input.
pub fn accuracy(error_count: usize, typed_len: usize) -> Option<f64> {
    if typed_len == 0 {
        return None;
    }
    let ratio = error_count as f64 / typed_len as f64;
    Some(((1.0 - ratio) * 100.0).clamp(0.0, 100.0))
}

pub fn score(
    elapsed_minutes: f64,
    typed: &str,
    error_count: usize,
) -> Result<ScoreReport, TrainerError> {
    if !elapsed_minutes.is_finite() || elapsed_minutes <= 0.0 {
        return Err(TrainerError::InvalidSession { elapsed_minutes });
    }

    let typed_words = count_words(typed);
    let gross_wpm = (typed_words as f64 / CHARS_PER_WORD) / elapsed_minutes;
    let net_wpm = (gross_wpm - error_count as f64 / elapsed_minutes).max(0.0);

    Ok(ScoreReport {
        gross_wpm,
        net_wpm,
        accuracy_percent: accuracy(error_count, typed.chars().count()),
        error_count,
        typed_words,
        elapsed_minutes,
    })
}

impl ScoreReport {
    /// One line summary used by the results view and the log.
    pub fn summary(&self) -> String {
        [
            format!("{:.2} gross wpm", self.gross_wpm),
            format!("{:.2} net wpm", self.net_wpm),
            match self.accuracy_percent {
                Some(acc) => format!("{acc:.2}% acc"),
                None => "N/A acc".to_string(),
            },
            format!("{} errors", self.error_count),
        ]
        .iter()
        .join("   ")
    }
}

use std::time::Instant;

use tracing::debug;

use crate::error::TrainerError;
use crate::scoring::{self, ScoreReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: Phase,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
    pub typed_input: String,
    /// Always the char length of `typed_input` while running.
    pub caret_index: usize,
    pub ignore_case: bool,
    pub report: Option<ScoreReport>,
}

impl SessionState {
    pub fn new(ignore_case: bool) -> Self {
        Self {
            ignore_case,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Starts a fresh session. Calling this while running discards the
    /// interrupted session without scoring it.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            debug!("restarting running session");
        }
        self.phase = Phase::Running;
        self.started_at = Some(now);
        self.ended_at = None;
        self.typed_input.clear();
        self.caret_index = 0;
        self.report = None;
    }

    /// Ends the session and scores it against `reference`. The session is
    /// idle afterwards even when scoring fails.
    pub fn stop(&mut self, now: Instant, reference: &str) -> Result<ScoreReport, TrainerError> {
        if !self.is_running() {
            return Err(TrainerError::NotRunning);
        }
        self.phase = Phase::Idle;
        self.ended_at = Some(now);

        let elapsed_minutes = self.elapsed_minutes(now);
        let errors = scoring::count_errors(reference, &self.typed_input, self.ignore_case);
        let report = scoring::score(elapsed_minutes, &self.typed_input, errors)?;

        self.report = Some(report);
        Ok(report)
    }

    /// Leaves the running state without producing a report.
    pub fn abandon(&mut self) {
        if self.is_running() {
            debug!("abandoning running session");
        }
        self.phase = Phase::Idle;
        self.started_at = None;
        self.ended_at = None;
        self.typed_input.clear();
        self.caret_index = 0;
    }

    /// Replaces the typed input with the writing box contents.
    pub fn keystroke(&mut self, new_input: &str) -> Result<(), TrainerError> {
        if !self.is_running() {
            return Err(TrainerError::NotRunning);
        }
        self.typed_input.clear();
        self.typed_input.push_str(new_input);
        self.caret_index = self.typed_input.chars().count();
        Ok(())
    }

    /// Minutes between start and `now`, or zero if the session never started.
    pub fn elapsed_minutes(&self, now: Instant) -> f64 {
        self.started_at
            .map(|start| now.saturating_duration_since(start).as_secs_f64() / 60.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    #[test]
    fn test_new_session_is_idle() {
        let session = SessionState::new(false);
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.started_at.is_none());
        assert!(session.typed_input.is_empty());
        assert_eq!(session.caret_index, 0);
    }

    #[test]
    fn test_keystroke_while_idle_is_rejected() {
        let mut session = SessionState::new(false);
        assert_matches!(session.keystroke("abc"), Err(TrainerError::NotRunning));
        assert!(session.typed_input.is_empty());
        assert_eq!(session.caret_index, 0);
    }

    #[test]
    fn test_keystroke_tracks_caret() {
        let mut session = SessionState::new(false);
        session.start(Instant::now());

        session.keystroke("hej å").unwrap();
        assert_eq!(session.typed_input, "hej å");
        assert_eq!(session.caret_index, 5);

        session.keystroke("he").unwrap();
        assert_eq!(session.caret_index, 2);
    }

    #[test]
    fn test_stop_scores_session() {
        let t0 = Instant::now();
        let mut session = SessionState::new(false);
        session.start(t0);
        session.keystroke("one two three four five").unwrap();

        let report = session
            .stop(t0 + Duration::from_secs(60), "one two three four five")
            .unwrap();

        assert_eq!(report.gross_wpm, 1.0);
        assert_eq!(report.error_count, 0);
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.report, Some(report));
        assert_eq!(session.ended_at, Some(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_stop_in_same_instant_is_invalid() {
        let t0 = Instant::now();
        let mut session = SessionState::new(false);
        session.start(t0);

        assert_matches!(
            session.stop(t0, "abc"),
            Err(TrainerError::InvalidSession { .. })
        );
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.report.is_none());
    }

    #[test]
    fn test_stop_while_idle() {
        let mut session = SessionState::new(false);
        assert_matches!(
            session.stop(Instant::now(), "abc"),
            Err(TrainerError::NotRunning)
        );
    }

    #[test]
    fn test_restart_resets_everything() {
        let t0 = Instant::now();
        let mut session = SessionState::new(false);
        session.start(t0);
        session.keystroke("abc").unwrap();
        session.stop(t0 + Duration::from_secs(1), "abc").unwrap();
        assert!(session.report.is_some());

        let t1 = t0 + Duration::from_secs(5);
        session.start(t1);
        session.keystroke("xy").unwrap();
        session.start(t1 + Duration::from_secs(1));

        assert!(session.is_running());
        assert!(session.typed_input.is_empty());
        assert_eq!(session.caret_index, 0);
        assert_eq!(session.started_at, Some(t1 + Duration::from_secs(1)));
        assert!(session.report.is_none());
    }

    #[test]
    fn test_ignore_case_applies_at_stop() {
        let t0 = Instant::now();
        let mut session = SessionState::new(true);
        session.start(t0);
        session.keystroke("HELLO").unwrap();

        let report = session.stop(t0 + Duration::from_secs(6), "hello").unwrap();
        assert_eq!(report.error_count, 0);
        assert_eq!(report.accuracy_percent, Some(100.0));
    }

    #[test]
    fn test_abandon_discards_input() {
        let mut session = SessionState::new(false);
        session.start(Instant::now());
        session.keystroke("abc").unwrap();

        session.abandon();
        assert_eq!(session.phase, Phase::Idle);
        assert!(session.typed_input.is_empty());
        assert!(session.report.is_none());
    }
}

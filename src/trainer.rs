use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Language, PracticeText};
use crate::clock::Clock;
use crate::error::TrainerError;
use crate::feedback::KeystrokeFeedback;
use crate::highlight::{self, chars_match, Highlight};
use crate::scoring::ScoreReport;
use crate::session::SessionState;

/// Events delivered by the front end. [`Trainer::handle`] is the single
/// entry point for all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainerEvent {
    StartStop,
    /// Full contents of the writing box after the keystroke.
    Keystroke(String),
    SelectText(usize),
    SetLanguage(Language),
    SetIgnoreCase(bool),
}

/// What a successfully handled event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Started,
    Stopped(ScoreReport),
    Typed { was_error: bool },
    TextSelected(usize),
    LanguageChanged(Language),
    IgnoreCaseChanged(bool),
}

/// Owns every piece of mutable trainer state: the catalog, the current
/// selection and toggles, and the session.
#[derive(Debug)]
pub struct Trainer<C: Clock, F: KeystrokeFeedback> {
    catalog: Catalog,
    selected: usize,
    language: Language,
    session: SessionState,
    clock: C,
    feedback: F,
}

impl<C: Clock, F: KeystrokeFeedback> Trainer<C, F> {
    pub fn new(
        catalog: Catalog,
        language: Language,
        ignore_case: bool,
        clock: C,
        feedback: F,
    ) -> Self {
        if catalog.is_empty() {
            warn!("catalog is empty, sessions cannot be started");
        }
        Self {
            catalog,
            selected: 0,
            language,
            session: SessionState::new(ignore_case),
            clock,
            feedback,
        }
    }

    pub fn handle(&mut self, event: TrainerEvent) -> Result<Transition, TrainerError> {
        debug!(?event, "handling event");
        let result = match event {
            TrainerEvent::StartStop => {
                if self.session.is_running() {
                    self.stop().map(Transition::Stopped)
                } else {
                    self.start().map(|_| Transition::Started)
                }
            }
            TrainerEvent::Keystroke(text) => self
                .keystroke(&text)
                .map(|was_error| Transition::Typed { was_error }),
            TrainerEvent::SelectText(index) => {
                self.select_text(index).map(|_| Transition::TextSelected(index))
            }
            TrainerEvent::SetLanguage(language) => {
                self.set_language(language);
                Ok(Transition::LanguageChanged(language))
            }
            TrainerEvent::SetIgnoreCase(ignore_case) => {
                self.set_ignore_case(ignore_case);
                Ok(Transition::IgnoreCaseChanged(ignore_case))
            }
        };

        if let Err(ref err) = result {
            warn!(%err, "event rejected");
        }
        result
    }

    pub fn can_start(&self) -> bool {
        !self.catalog.is_empty()
    }

    /// Starts a session on the selected text, restarting one that is
    /// already running.
    pub fn start(&mut self) -> Result<(), TrainerError> {
        if !self.can_start() {
            return Err(TrainerError::EmptyCatalog);
        }
        self.session.start(self.clock.now());
        info!(text = self.selected, language = %self.language, "session started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<ScoreReport, TrainerError> {
        let now = self.clock.now();
        let reference = self.current_content().to_owned();
        let report = self.session.stop(now, &reference)?;
        info!(
            gross_wpm = report.gross_wpm,
            net_wpm = report.net_wpm,
            accuracy = ?report.accuracy_percent,
            errors = report.error_count,
            "session stopped"
        );
        Ok(report)
    }

    /// Takes the new writing box contents and reports whether the keystroke
    /// that produced them was an error.
    pub fn keystroke(&mut self, text: &str) -> Result<bool, TrainerError> {
        let previous_len = self.session.caret_index;
        self.session.keystroke(text)?;

        let was_error = self.keystroke_was_error(previous_len);
        self.feedback.on_keystroke(was_error);
        Ok(was_error)
    }

    fn keystroke_was_error(&self, previous_len: usize) -> bool {
        let caret = self.session.caret_index;
        if caret == 0 || caret <= previous_len {
            return false;
        }
        let typed = self.session.typed_input.chars().nth(caret - 1);
        let expected = self.current_content().chars().nth(caret - 1);
        match (expected, typed) {
            (Some(expected), Some(typed)) => !chars_match(expected, typed, self.session.ignore_case),
            _ => false,
        }
    }

    /// Selects a text by catalog index. A running session is abandoned.
    pub fn select_text(&mut self, index: usize) -> Result<(), TrainerError> {
        if self.catalog.is_empty() {
            return Err(TrainerError::EmptyCatalog);
        }
        self.catalog.get(index)?;
        if index != self.selected {
            self.session.abandon();
        }
        self.selected = index;
        Ok(())
    }

    /// Switches the active language. A running session is abandoned when the
    /// language actually changes.
    pub fn set_language(&mut self, language: Language) {
        if language != self.language {
            self.session.abandon();
        }
        self.language = language;
    }

    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.session.ignore_case = ignore_case;
    }

    pub fn highlights(&self) -> Vec<Highlight> {
        highlight::classify(
            self.current_content(),
            &self.session.typed_input,
            self.session.ignore_case,
        )
    }

    pub fn report(&self) -> Option<&ScoreReport> {
        self.session.report.as_ref()
    }

    pub fn current_text(&self) -> Option<&PracticeText> {
        self.catalog.get(self.selected).ok()
    }

    /// Reference content of the selected text in the active language.
    pub fn current_content(&self) -> &str {
        self.current_text()
            .map(|t| t.content(self.language))
            .unwrap_or("")
    }

    /// Minutes since the session started, for a live timer.
    pub fn elapsed_minutes(&self) -> f64 {
        let now = self.session.ended_at.unwrap_or_else(|| self.clock.now());
        self.session.elapsed_minutes(now)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn ignore_case(&self) -> bool {
        self.session.ignore_case
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }
}

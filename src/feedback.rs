use std::io::Write;

use tracing::trace;

/// Receives one signal per keystroke telling whether it was an error. The
/// sink decides on its own whether and how to react.
pub trait KeystrokeFeedback {
    fn on_keystroke(&mut self, was_error: bool);
}

/// Ignores every keystroke.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl KeystrokeFeedback for Silent {
    fn on_keystroke(&mut self, _was_error: bool) {}
}

/// Rings the terminal bell on error keystrokes.
#[derive(Debug)]
pub struct Bell<W: Write> {
    out: W,
    muted: bool,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W, muted: bool) -> Self {
        Self { out, muted }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> KeystrokeFeedback for Bell<W> {
    fn on_keystroke(&mut self, was_error: bool) {
        if !was_error || self.muted {
            return;
        }
        if let Err(err) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            trace!(%err, "bell write failed");
        }
    }
}

/// Records every signal, for tests.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub signals: Vec<bool>,
}

impl KeystrokeFeedback for Recorder {
    fn on_keystroke(&mut self, was_error: bool) {
        self.signals.push(was_error);
    }
}

impl<F: KeystrokeFeedback + ?Sized> KeystrokeFeedback for Box<F> {
    fn on_keystroke(&mut self, was_error: bool) {
        (**self).on_keystroke(was_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_rings_only_on_errors() {
        let mut bell = Bell::new(Vec::new(), false);
        bell.on_keystroke(false);
        bell.on_keystroke(true);
        bell.on_keystroke(true);
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }

    #[test]
    fn muted_bell_is_silent() {
        let mut bell = Bell::new(Vec::new(), true);
        bell.on_keystroke(true);
        bell.set_muted(false);
        bell.on_keystroke(true);
        assert_eq!(bell.into_inner(), b"\x07".to_vec());
    }

    #[test]
    fn recorder_keeps_order() {
        let mut rec = Recorder::default();
        rec.on_keystroke(true);
        rec.on_keystroke(false);
        assert_eq!(rec.signals, vec![true, false]);
    }
}

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::debug;

/// Terminal-level event consumed by the app loop. Keys and pastes are turned
/// into trainer events by [`crate::app::App`].
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
    /// The event source went away; the loop should wind down.
    Closed,
}

/// Source of terminal events
pub trait InputEventSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread and forwards them over a
/// channel, so the UI thread stays the only mutator of trainer state.
pub struct CrosstermEventSource {
    rx: Receiver<InputEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // Windows reports releases too; only presses type characters
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    Some(InputEvent::Key(key))
                }
                Ok(CtEvent::Paste(text)) => Some(InputEvent::Paste(text)),
                Ok(CtEvent::Resize(_, _)) => Some(InputEvent::Resize),
                Ok(_) => None,
                Err(err) => {
                    debug!(%err, "terminal event reader stopped");
                    break;
                }
            };

            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for headless runs and tests
pub struct ChannelEventSource {
    rx: Receiver<InputEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl InputEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Redraw cadence while idle; the live timer is the only thing that moves
/// without input.
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Advances the app one event at a time
pub struct Runner<E: InputEventSource> {
    source: E,
    ticker: FixedTicker,
}

impl<E: InputEventSource> Runner<E> {
    pub fn new(source: E, ticker: FixedTicker) -> Self {
        Self { source, ticker }
    }

    /// Blocks up to one tick interval. Returns the next event, `Tick` when the
    /// interval passes quietly, or `Closed` once the source is gone.
    pub fn step(&self) -> InputEvent {
        match self.source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => InputEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => InputEvent::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        assert_eq!(runner.step(), InputEvent::Tick);
    }

    #[test]
    fn step_passes_through_events_in_order() {
        let (tx, rx) = mpsc::channel();
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        tx.send(InputEvent::Key(key)).unwrap();
        tx.send(InputEvent::Paste("bc".into())).unwrap();
        let runner = Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(10)),
        );

        assert_eq!(runner.step(), InputEvent::Key(key));
        assert_eq!(runner.step(), InputEvent::Paste("bc".into()));
    }

    #[test]
    fn step_reports_closed_source() {
        let (tx, rx) = mpsc::channel::<InputEvent>();
        drop(tx);
        let runner = Runner::new(
            ChannelEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        assert_eq!(runner.step(), InputEvent::Closed);
    }
}

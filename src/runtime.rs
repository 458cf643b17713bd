//! Event pump between the terminal and the engine.
//!
//! Each [`Runner::step`] waits up to one tick for input and reports how much
//! time went by, so the caller can feed that straight into
//! [`QuizEngine::tick`](crate::engine::QuizEngine::tick) before handling the
//! event. Wall time comes from a [`Clock`]; tests swap in [`SteppedClock`]
//! to make every step a fixed slice of virtual time.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// How often the front end wakes up when no input arrives.
pub const TICK_RATE_MS: u64 = 100;

#[derive(Clone, Debug)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// One turn of the loop: what woke us up, and the time since the last turn.
#[derive(Clone, Debug)]
pub struct Step {
    pub event: QuizEvent,
    pub elapsed: Duration,
}

pub trait QuizEventSource {
    /// Wait at most `timeout` for input. `None` means nothing arrived.
    fn next_event(&mut self, timeout: Duration) -> Option<QuizEvent>;
}

/// Reads the real terminal.
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl QuizEventSource for CrosstermEventSource {
    fn next_event(&mut self, timeout: Duration) -> Option<QuizEvent> {
        match event::poll(timeout) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                tracing::warn!("terminal poll failed: {}", e);
                return None;
            }
        }

        match event::read() {
            // key release/repeat events would answer twice on some platforms
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => Some(QuizEvent::Key(key)),
            Ok(CtEvent::Resize(_, _)) => Some(QuizEvent::Resize),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("terminal read failed: {}", e);
                None
            }
        }
    }
}

/// Scripted input for headless runs. Never blocks.
pub struct TestEventSource {
    rx: Receiver<QuizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }
}

impl QuizEventSource for TestEventSource {
    fn next_event(&mut self, _timeout: Duration) -> Option<QuizEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

pub trait Clock {
    /// Time passed since the previous lap (or since creation).
    fn lap(&mut self) -> Duration;
}

#[derive(Debug)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed
    }
}

/// Every lap takes exactly `step`.
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    step: Duration,
}

impl SteppedClock {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl Clock for SteppedClock {
    fn lap(&mut self) -> Duration {
        self.step
    }
}

pub struct Runner<E: QuizEventSource, C: Clock> {
    source: E,
    clock: C,
    tick_rate: Duration,
}

impl Runner<CrosstermEventSource, WallClock> {
    pub fn terminal() -> Self {
        Self::new(
            CrosstermEventSource,
            WallClock::new(),
            Duration::from_millis(TICK_RATE_MS),
        )
    }
}

impl<E: QuizEventSource, C: Clock> Runner<E, C> {
    pub fn new(source: E, clock: C, tick_rate: Duration) -> Self {
        Self {
            source,
            clock,
            tick_rate,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn step(&mut self) -> Step {
        let event = self
            .source
            .next_event(self.tick_rate)
            .unwrap_or(QuizEvent::Tick);
        Step {
            event,
            elapsed: self.clock.lap(),
        }
    }
}

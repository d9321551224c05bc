//! Pausable elapsed-time measurement for the simulation phases.

use std::time::{Duration, Instant};

/// Measures the time a phase spends running, leaving out any time spent paused.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stopwatch {
    /// Time collected by earlier running stretches.
    accumulated: Duration,
    /// Start of the current running stretch, if any.
    running_since: Option<Instant>,
    /// Set once stopped for good; resuming is ignored afterwards.
    stopped: bool,
}

impl Stopwatch {
    /// A stopwatch that has not started yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: None,
            stopped: false,
        }
    }

    /// Clears any previous measurement and starts running.
    pub fn start(&mut self) {
        *self = Self {
            running_since: Some(Instant::now()),
            ..Self::new()
        };
    }

    /// Freezes the measurement until [`Stopwatch::resume`].
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    /// Continues a paused measurement. Does nothing once stopped.
    pub fn resume(&mut self) {
        if !self.stopped && self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Freezes the measurement for good.
    pub fn stop(&mut self) {
        self.pause();
        self.stopped = true;
    }

    /// Whether time is currently being collected.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Total running time so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.accumulated
            + self
                .running_since
                .map_or(Duration::ZERO, |since| since.elapsed())
    }
}

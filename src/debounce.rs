//! Time-windowed event coalescing and the single pending-trial timer.
//!
//! Both primitives take the current instant as an argument instead of
//! reading a clock, so the event loop owns time and tests control it.

use std::time::{Duration, Instant};

/// Collapses bursts of pushes into one value, delivered after a quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    queued: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            queued: None,
        }
    }

    /// Queues `value`, replacing anything queued, and restarts the window.
    pub fn push(&mut self, now: Instant, value: T) {
        self.queued = Some((now, value));
    }

    /// Yields the queued value once the window has passed without a push.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.queued.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// When the queued value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.queued.as_ref().map(|(at, _)| *at + self.quiet)
    }

    pub fn is_idle(&self) -> bool {
        self.queued.is_none()
    }
}

/// The one live auto-finalization timer.
///
/// Arming replaces whatever was armed, so a stale timer can never fire for
/// an older trial once a newer one exists.
#[derive(Debug)]
pub struct PendingTimer {
    timeout: Duration,
    armed: Option<(Instant, String)>,
}

impl PendingTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            armed: None,
        }
    }

    /// Starts the timer for `id`, cancelling any previous one.
    pub fn arm(&mut self, now: Instant, id: impl Into<String>) {
        let id = id.into();
        if let Some((_, previous)) = self.armed.replace((now + self.timeout, id)) {
            log::debug!("pending timer for {previous} cancelled");
        }
    }

    /// Stops the timer if it is armed for `id`.
    pub fn cancel(&mut self, id: &str) {
        if self.armed.as_ref().is_some_and(|(_, armed)| armed == id) {
            self.armed = None;
        }
    }

    /// Returns the id once, when its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.armed.take().map(|(_, id)| id),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|(deadline, _)| *deadline)
    }
}

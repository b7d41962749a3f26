//! Event-shaping primitives: trailing-edge debounce and leading-edge throttle.
//!
//! Both are driven by explicit "now" values (a `Duration` since any fixed
//! origin) rather than by timers, so the owner decides when to poll and tests
//! can use a virtual clock. Neither reorders events and neither replays a
//! dropped or coalesced event.

use std::time::Duration;

/// Trailing-edge debounce.
///
/// A burst of `schedule` calls yields at most one event from `poll`, the last
/// one scheduled, once `delay` has elapsed since that last call.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    deadline: Option<Duration>,
    pending: Option<T>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            pending: None,
        }
    }

    /// Record `event`, replacing any pending one, and restart the quiet period.
    pub fn schedule(&mut self, event: T, now: Duration) {
        self.pending = Some(event);
        self.deadline = Some(now + self.delay);
    }

    /// Take the pending event if its quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop the pending event, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending event becomes due.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// Leading-edge throttle.
///
/// The first call fires immediately and opens a window of `interval`; every
/// call inside the window is dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    window_end: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_end: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` if a call at `now` may fire; opens a new window when it does.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        match self.window_end {
            Some(end) if now < end => false,
            _ => {
                self.window_end = Some(now + self.interval);
                true
            }
        }
    }

    /// Pass `event` through if a call at `now` may fire, otherwise drop it.
    pub fn schedule<T>(&mut self, event: T, now: Duration) -> Option<T> {
        self.try_acquire(now).then_some(event)
    }

    /// Close the current window.
    pub fn cancel(&mut self) {
        self.window_end = None;
    }
}

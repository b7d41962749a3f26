//! Time sources for event shaping and lightweight latency measurement.
//!
//! Rate limiting never reads the wall clock directly: callers pass the current
//! time as a `Duration` since an arbitrary origin. `VirtualClock` produces those
//! values deterministically for replays and tests.

use std::time::{Duration, Instant};

/// Monotonic, manually advanced clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move forward by `step`.
    pub fn advance(&mut self, step: Duration) -> Duration {
        self.now += step;
        self.now
    }

    /// Move to `t`; never moves backwards.
    pub fn advance_to(&mut self, t: Duration) -> Duration {
        if t > self.now {
            self.now = t;
        }
        self.now
    }
}

/// A simple timer that measures elapsed wall time.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed time.
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and report it at debug level.
    pub fn stop_and_log(self) -> Duration {
        let label = self.label;
        let elapsed = self.stop();
        tracing::debug!(target: "timing", label, elapsed_ms = elapsed.as_secs_f64() * 1e3);
        elapsed
    }
}

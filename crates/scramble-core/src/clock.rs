#![forbid(unsafe_code)]

//! Monotonic clocks.
//!
//! Effects never read time themselves; the host samples a [`Clock`] once per
//! frame and passes the value down. Tests use [`DeterministicClock`] and step
//! it by hand.

use std::time::Duration;

/// Source of monotonic time, measured from an arbitrary origin.
pub trait Clock {
    /// Current monotonic time.
    fn now_mono(&self) -> Duration;
}

/// Monotonic clock advanced explicitly by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Real monotonic clock. Uses `web-time` so it also works on wasm32.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: web_time::Instant,
}

impl MonotonicClock {
    /// Clock whose origin is "now".
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

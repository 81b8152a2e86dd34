#![forbid(unsafe_code)]

//! Easing curves and time-based tweens.
//!
//! Curves map normalized progress `t` in [0, 1] to an output in [0, 1].
//! Inputs outside the range are clamped, so callers may pass raw ratios
//! without pre-clamping.
//!
//! [`Tween`] is anchored at an absolute start time rather than accumulating
//! `dt`, so sampling it twice at the same `now` always yields the same value.

pub mod stagger;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-in.
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out. The hero reveal curve.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Named curves
// ---------------------------------------------------------------------------

/// A named easing curve.
///
/// Configuration records carry this instead of a bare function pointer so
/// they stay comparable, printable, and serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CubicIn,
    CubicOut,
}

impl Easing {
    /// Every named curve, in declaration order.
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::CubicIn,
        Easing::CubicOut,
    ];

    /// The function backing this curve.
    #[must_use]
    pub const fn as_fn(self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::EaseIn => ease_in,
            Easing::EaseOut => ease_out,
            Easing::EaseInOut => ease_in_out,
            Easing::CubicIn => ease_in_cubic,
            Easing::CubicOut => ease_out_cubic,
        }
    }

    /// Evaluate the curve at `t` (clamped to [0, 1]).
    #[inline]
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        (self.as_fn())(t)
    }

    /// Canonical kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::CubicIn => "cubic-in",
            Easing::CubicOut => "cubic-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognized easing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing curve: {:?}", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    /// Accepts the canonical names plus the tween-library aliases used in
    /// page scripts (`none`, `power1.out`, `power2.out`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s.trim() {
            "linear" | "none" => Easing::Linear,
            "ease-in" | "power1.in" => Easing::EaseIn,
            "ease-out" | "power1.out" => Easing::EaseOut,
            "ease-in-out" | "power1.inOut" => Easing::EaseInOut,
            "cubic-in" | "power2.in" => Easing::CubicIn,
            "cubic-out" | "power2.out" => Easing::CubicOut,
            other => return Err(UnknownEasing(other.to_string())),
        };
        Ok(easing)
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Eased 0.0 → 1.0 progression between `start` and `start + duration`.
///
/// Used for follow-up effects chained after a scramble run, e.g. fading in a
/// tagline once the headline has resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// A linear tween starting at `start`. A zero duration is clamped to 1 ns.
    #[must_use]
    pub fn new(start: Duration, duration: Duration) -> Self {
        Self {
            start,
            duration: duration.max(Duration::from_nanos(1)),
            easing: Easing::Linear,
        }
    }

    /// Set the easing curve (builder).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Time at which the tween reaches 1.0.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }

    /// Linear progress at `now`, before easing. 0.0 before `start`.
    #[must_use]
    pub fn raw_progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.start);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Eased value at `now`.
    #[must_use]
    pub fn value(&self, now: Duration) -> f32 {
        self.easing.apply(self.raw_progress(now))
    }

    /// Whether `now` is at or past the end.
    #[must_use]
    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#![forbid(unsafe_code)]

//! Stagger offsets: per-index start delays for a list of targets.
//!
//! A stagger turns "animate these N targets" into N start times so the
//! targets resolve one after another instead of all at once.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. Offsets are monotonically non-decreasing for every mode whose curve is
//!    monotonic.
//! 4. For `Linear`, `offset[i] == i * delay` exactly.
//! 5. For `Eased`, offsets follow the curve scaled to `(count - 1) * delay`.
//!
//! # Failure Modes
//!
//! - Zero count: empty vec.
//! - Zero delay: all offsets are `Duration::ZERO`.

use std::time::Duration;

use super::{Easing, EasingFn};
use crate::rng::Xorshift64;

/// How to distribute start delays across targets.
#[derive(Debug, Clone, Copy)]
pub enum StaggerMode {
    /// Equal spacing: `offset[i] = i * delay`.
    Linear,
    /// Offsets follow a named curve over the total span.
    Eased(Easing),
    /// Offsets follow a caller-supplied curve over the total span.
    Custom(EasingFn),
}

/// Compute start offsets for `count` targets spaced by `delay`.
#[must_use]
pub fn stagger_offsets(count: usize, delay: Duration, mode: StaggerMode) -> Vec<Duration> {
    if count == 0 {
        return Vec::new();
    }

    let curve: EasingFn = match mode {
        // Integer arithmetic keeps linear offsets exact.
        StaggerMode::Linear => {
            return (0..count)
                .map(|i| delay.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
                .collect();
        }
        StaggerMode::Eased(easing) => easing.as_fn(),
        StaggerMode::Custom(f) => f,
    };

    if count == 1 {
        return vec![Duration::ZERO];
    }

    let span_nanos = delay.as_nanos() as f64 * (count - 1) as f64;
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            Duration::from_nanos((span_nanos * f64::from(curve(t))) as u64)
        })
        .collect()
}

/// A uniformly shuffled permutation of `0..count`.
///
/// Used to reveal targets in a random order; feed the permutation back in
/// reverse for a symmetric exit.
#[must_use]
pub fn shuffled_order(count: usize, rng: &mut Xorshift64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    rng.shuffle(&mut order);
    order
}

#![forbid(unsafe_code)]

//! Frame composition: the pure part of a scramble run.
//!
//! Given the run's phases and the elapsed time, [`reveal_count`] says how many
//! leading characters are locked to their true value and [`compose_frame`]
//! builds the next displayed string. Neither touches a surface or a clock.
//!
//! # Invariants
//!
//! 1. `scramble + reveal == total`, both non-negative.
//! 2. `reveal_count` is non-decreasing in `elapsed` for a monotonic curve.
//! 3. Whitespace positions always render as the original whitespace.
//! 4. Without a refresh, unrevealed positions repeat the previous frame.

use std::time::Duration;

use scramble_core::animation::Easing;
use scramble_core::rng::Xorshift64;

use crate::config::Alphabet;

/// Scramble/reveal split of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    /// Whole run.
    pub total: Duration,
    /// Pure scramble phase, from the start of the run.
    pub scramble: Duration,
    /// Eased reveal phase, after the scramble phase.
    pub reveal: Duration,
}

impl Phases {
    /// Split `total` at `ratio`.
    ///
    /// `total` is clamped to at least 1 ns, `ratio` to [0, 1]; a non-finite
    /// ratio counts as 0.
    #[must_use]
    pub fn new(total: Duration, ratio: f32) -> Self {
        let total = total.max(Duration::from_nanos(1));
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let scramble = if ratio >= 1.0 {
            total
        } else {
            Duration::try_from_secs_f64(total.as_secs_f64() * f64::from(ratio))
                .unwrap_or(total)
                .min(total)
        };
        Self {
            total,
            scramble,
            reveal: total - scramble,
        }
    }

    /// Whether `elapsed` is still inside the pure scramble phase.
    #[must_use]
    pub fn in_scramble(&self, elapsed: Duration) -> bool {
        elapsed < self.scramble
    }
}

/// Number of leading characters shown as their true value at `elapsed`.
#[must_use]
pub fn reveal_count(elapsed: Duration, phases: &Phases, easing: Easing, len: usize) -> usize {
    if phases.in_scramble(elapsed) {
        return 0;
    }
    if phases.reveal.is_zero() {
        return len;
    }
    let into_reveal = elapsed.saturating_sub(phases.scramble);
    let t = (into_reveal.as_secs_f64() / phases.reveal.as_secs_f64()).clamp(0.0, 1.0);
    let eased = f64::from(easing.apply(t as f32)).clamp(0.0, 1.0);
    ((eased * len as f64).floor() as usize).min(len)
}

/// Build the next frame for `letters`.
///
/// `previous` is the frame currently on screen; `refresh` says whether this
/// frame may draw new filler glyphs.
#[must_use]
pub fn compose_frame(
    letters: &[char],
    previous: &[char],
    in_scramble: bool,
    revealed: usize,
    refresh: bool,
    alphabet: &Alphabet,
    rng: &mut Xorshift64,
) -> Vec<char> {
    letters
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c.is_whitespace() || (!in_scramble && i < revealed) {
                c
            } else if refresh {
                alphabet.pick(rng)
            } else {
                match previous.get(i) {
                    Some(&p) if !p.is_whitespace() => p,
                    _ => alphabet.pick(rng),
                }
            }
        })
        .collect()
}

#![forbid(unsafe_code)]

//! Small seedable PRNG for filler glyphs, palette picks, and shuffles.
//!
//! Visual noise does not need cryptographic quality, but it does need to be
//! reproducible under test. [`Xorshift64`] is seeded explicitly in tests and
//! from process entropy otherwise.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

/// Fallback state for seeds that would collapse to zero.
const NONZERO_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

/// xorshift64 generator.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Deterministic generator for `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        // xorshift has a fixed point at zero.
        let state = match seed.wrapping_add(1) {
            0 => NONZERO_STATE,
            s => s,
        };
        Self { state }
    }

    /// Generator seeded from the process hash seed and the current time.
    #[must_use]
    pub fn from_entropy() -> Self {
        let mut hasher = RandomState::new().build_hasher();
        let since_epoch = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .unwrap_or_default();
        hasher.write_u128(since_epoch.as_nanos());
        Self::seeded(hasher.finish())
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform-ish index in `0..bound`. Returns 0 when `bound` is 0.
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % bound as u64) as usize
    }

    /// Value in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Random element of `items`, or `None` if empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.below(items.len()))
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

impl Default for Xorshift64 {
    fn default() -> Self {
        Self::from_entropy()
    }
}

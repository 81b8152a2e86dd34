#![forbid(unsafe_code)]

//! Core: easing curves, stagger offsets, clocks, a seedable PRNG, and the
//! frame scheduler that drives scramble text effects.
//!
//! Nothing in this crate reads a wall clock on its own. Time is always passed
//! in as a monotonic [`Duration`](std::time::Duration) obtained from a
//! [`clock::Clock`], which keeps every effect replayable under a
//! [`clock::DeterministicClock`].

pub mod animation;
pub mod clock;
pub mod frame;
pub mod rng;

pub use animation::{Easing, EasingFn, Tween};
pub use clock::{Clock, DeterministicClock, MonotonicClock};
pub use frame::{FrameHandle, FrameQueue, FrameScheduler};
pub use rng::Xorshift64;

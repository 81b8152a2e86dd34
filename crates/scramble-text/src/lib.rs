#![forbid(unsafe_code)]

//! Scramble-and-reveal text effects.
//!
//! A run replaces a surface's text with random filler glyphs, then locks the
//! true characters in from left to right along an easing curve until the
//! surface shows its target text again.
//!
//! # Role in the workspace
//! - **Engine**: [`ScrambleEngine`] owns targets, runs and the frame
//!   scheduler; hosts drive it with [`ScrambleEngine::advance`].
//! - **Composition**: [`compose`] holds the pure per-frame math.
//! - **Orchestration**: [`stagger`] runs one config across many targets.
//! - **Replay**: [`trigger`] maps view and hover signals to runs.
//! - **Scrub**: [`scrub`] renders a progress-driven reveal with no clock.
//! - **Presets**: [`presets`] names the site's configurations.
//!
//! Time is always a monotonic [`Duration`](std::time::Duration) supplied by
//! the host, usually from a [`scramble_core::Clock`].

pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod presets;
pub mod scrub;
pub mod stagger;
pub mod surface;
pub mod target;
pub mod trigger;

pub use config::{Alphabet, ColorChoice, DEFAULT_ALPHABET, ScrambleConfig, TargetText};
pub use engine::{EngineJob, EventKind, RunOutcome, ScrambleEngine, ScrambleEvent, StartTicket};
pub use error::{ConfigError, SkipReason};
pub use hooks::{FnHooks, NoHooks, RunHooks};
pub use scrub::{ScrubCell, ScrubReveal, ScrubTiming};
pub use stagger::{ShuffleMemory, StaggerPlan, run_plan, run_plan_with, run_staggered};
pub use surface::{Color, MemorySurface, TextSurface};
pub use target::{CompletionFlag, Generation, ScrambleTarget, TargetId};
pub use trigger::{ExitStage, Signal, TriggerConfig, TriggerMachine, TriggerSet, TriggerState};

pub use scramble_core::{Clock, DeterministicClock, Easing, MonotonicClock};

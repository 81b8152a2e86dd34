#![forbid(unsafe_code)]

//! Scramble targets: one per display surface, alive as long as the surface.

use std::fmt;
use std::time::Duration;

use scramble_core::animation::Easing;
use scramble_core::frame::FrameHandle;

use crate::compose::Phases;
use crate::config::Alphabet;
use crate::hooks::RunHooks;
use crate::surface::Color;

/// Index of a target inside its engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) usize);

impl TargetId {
    /// Registration order, starting at 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Per-target run token. Incremented on every start and every cancel, so a
/// scheduled frame carrying an older value is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Play-once bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompletionFlag {
    #[default]
    NotRun,
    Running,
    /// A play-once run finished; further play-once runs are no-ops.
    Done,
}

/// State of the live run on a target.
pub(crate) struct ActiveRun {
    pub(crate) letters: Vec<char>,
    pub(crate) phases: Phases,
    pub(crate) easing: Easing,
    pub(crate) alphabet: Alphabet,
    pub(crate) refresh_interval: Duration,
    pub(crate) play_once: bool,
    pub(crate) settle_color: Option<Color>,
    pub(crate) started_at: Duration,
    pub(crate) last_refresh: Option<Duration>,
    pub(crate) hooks: Box<dyn RunHooks>,
}

/// A display surface plus everything the engine remembers about it.
pub struct ScrambleTarget<S> {
    pub(crate) surface: S,
    pub(crate) base_text: String,
    pub(crate) base_color: Option<Color>,
    pub(crate) generation: Generation,
    pub(crate) completion: CompletionFlag,
    /// Last frame written, one entry per character.
    pub(crate) displayed: Vec<char>,
    pub(crate) run: Option<ActiveRun>,
    pub(crate) pending_frame: Option<FrameHandle>,
    /// Bumped on cancel; delayed starts scheduled under an older epoch are dropped.
    pub(crate) start_epoch: u64,
}

impl<S: fmt::Debug> fmt::Debug for ScrambleTarget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrambleTarget")
            .field("surface", &self.surface)
            .field("base_text", &self.base_text)
            .field("generation", &self.generation)
            .field("completion", &self.completion)
            .field("running", &self.run.is_some())
            .finish()
    }
}

impl<S> ScrambleTarget<S> {
    pub(crate) fn new(surface: S, base_text: String, displayed: &str) -> Self {
        Self {
            surface,
            base_text,
            base_color: None,
            generation: Generation::default(),
            completion: CompletionFlag::NotRun,
            displayed: displayed.chars().collect(),
            run: None,
            pending_frame: None,
            start_epoch: 0,
        }
    }

    /// The caller's surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Ground-truth text, fixed at registration.
    pub fn base_text(&self) -> &str {
        &self.base_text
    }

    /// Color restored on reset, if any.
    pub fn base_color(&self) -> Option<Color> {
        self.base_color
    }

    /// Current run token.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Play-once bookkeeping.
    pub fn completion(&self) -> CompletionFlag {
        self.completion
    }

    /// Whether a run is live.
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// The last frame the engine wrote.
    pub fn displayed(&self) -> String {
        self.displayed.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_increments() {
        let g = Generation::default();
        assert_eq!(g.value(), 0);
        assert_eq!(g.next().next().value(), 2);
        assert!(g.next() > g);
    }

    #[test]
    fn new_target_is_idle() {
        let target = ScrambleTarget::new((), "MEDLOCK".into(), "MEDLOCK");
        assert_eq!(target.completion(), CompletionFlag::NotRun);
        assert!(!target.is_running());
        assert_eq!(target.displayed(), "MEDLOCK");
        assert_eq!(TargetId(3).to_string(), "target#3");
    }
}

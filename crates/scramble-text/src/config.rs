#![forbid(unsafe_code)]

//! Per-run configuration.
//!
//! A [`ScrambleConfig`] is a plain value handed to each run; nothing in it is
//! shared or mutated while the run is live. Out-of-range values are clamped
//! rather than rejected (see [`Phases::new`]).

use std::time::Duration;

use scramble_core::animation::Easing;
use scramble_core::rng::Xorshift64;

use crate::compose::Phases;
use crate::surface::Color;

/// Filler glyphs used when no alphabet (or an empty one) is configured.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// Non-empty set of filler glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Alphabet of the glyphs in `glyphs`, ignoring whitespace.
    ///
    /// An alphabet with no usable glyphs falls back to [`DEFAULT_ALPHABET`].
    #[must_use]
    pub fn new(glyphs: &str) -> Self {
        let chars: Vec<char> = glyphs.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            tracing::debug!(requested = glyphs, "empty alphabet, using default glyphs");
            return Self(DEFAULT_ALPHABET.chars().collect());
        }
        Self(chars)
    }

    /// The glyphs, never empty.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.0
    }

    /// Whether `c` is one of the filler glyphs.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    /// Random filler glyph.
    pub fn pick(&self, rng: &mut Xorshift64) -> char {
        rng.pick(&self.0).copied().unwrap_or('?')
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }
}

impl From<&str> for Alphabet {
    fn from(glyphs: &str) -> Self {
        Self::new(glyphs)
    }
}

impl From<String> for Alphabet {
    fn from(glyphs: String) -> Self {
        Self::new(&glyphs)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.0.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Target text and color choices
// ---------------------------------------------------------------------------

/// What a run converges on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TargetText {
    /// The target's cached ground-truth text.
    #[default]
    Base,
    /// A specific string. Empty falls back to the base text.
    Fixed(String),
    /// A single glyph drawn from the run's alphabet when the run starts.
    RandomGlyph,
}

/// Color applied to the surface when a run starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ColorChoice {
    /// Leave the color alone.
    #[default]
    Keep,
    /// Always this color.
    Fixed(Color),
    /// A random pick from the palette, per run.
    Palette(Vec<Color>),
}

impl ColorChoice {
    /// The color to apply for one run, if any.
    pub fn resolve(&self, rng: &mut Xorshift64) -> Option<Color> {
        match self {
            Self::Keep => None,
            Self::Fixed(color) => Some(*color),
            Self::Palette(colors) => rng.pick(colors).copied(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScrambleConfig
// ---------------------------------------------------------------------------

/// Configuration for one scramble run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrambleConfig {
    /// Total run length. Zero is clamped to 1 ns.
    pub duration: Duration,
    /// Fraction of `duration` spent in the pure scramble phase, clamped to [0, 1].
    pub scramble_ratio: f32,
    /// Filler glyphs.
    pub alphabet: Alphabet,
    /// Once a play-once run completes, further runs on the target are no-ops.
    pub play_once: bool,
    /// Minimum spacing between filler refreshes. Zero refreshes every frame.
    pub refresh_interval: Duration,
    /// Curve mapping reveal-phase progress to revealed character count.
    pub easing: Easing,
    /// What the run converges on.
    pub target: TargetText,
    /// Color applied at run start.
    pub active_color: ColorChoice,
    /// Color applied when the run completes.
    pub settle_color: Option<Color>,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(3),
            scramble_ratio: 0.65,
            alphabet: Alphabet::default(),
            play_once: true,
            refresh_interval: Duration::from_millis(50),
            easing: Easing::Linear,
            target: TargetText::Base,
            active_color: ColorChoice::Keep,
            settle_color: None,
        }
    }
}

impl ScrambleConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn scramble_ratio(mut self, ratio: f32) -> Self {
        self.scramble_ratio = ratio;
        self
    }

    #[must_use]
    pub fn alphabet(mut self, alphabet: impl Into<Alphabet>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    #[must_use]
    pub fn play_once(mut self, once: bool) -> Self {
        self.play_once = once;
        self
    }

    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn target(mut self, target: TargetText) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn active_color(mut self, choice: ColorChoice) -> Self {
        self.active_color = choice;
        self
    }

    #[must_use]
    pub fn settle_color(mut self, color: Option<Color>) -> Self {
        self.settle_color = color;
        self
    }

    /// Scramble/reveal split after clamping.
    #[must_use]
    pub fn phases(&self) -> Phases {
        Phases::new(self.duration, self.scramble_ratio)
    }
}

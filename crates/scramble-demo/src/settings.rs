#![forbid(unsafe_code)]

//! Demo settings: optional JSON overrides for the built-in presets, plus the
//! demo's error type.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use scramble_text::presets;
use scramble_text::{
    Alphabet, Color, ColorChoice, ConfigError, Easing, ScrambleConfig, ScrubTiming, TargetText,
    TriggerConfig,
};
use serde::Deserialize;

/// Anything that can stop the demo before or during the run loop.
#[derive(Debug)]
pub enum DemoError {
    Io(io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
    Logging(String),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Json(err) => write!(f, "invalid config file: {err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for DemoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for DemoError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Partial [`ScrambleConfig`] read from the settings file.
///
/// Each field is `Option`:
/// - `Some(v)` - use `v`
/// - `None` - keep the preset's value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverride {
    pub duration_ms: Option<u64>,
    pub scramble_ratio: Option<f32>,
    pub alphabet: Option<Alphabet>,
    pub play_once: Option<bool>,
    pub refresh_interval_ms: Option<u64>,
    pub easing: Option<Easing>,
    pub target: Option<TargetText>,
    pub active_color: Option<ColorChoice>,
    pub settle_color: Option<Color>,
}

impl ConfigOverride {
    /// Whether no field is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply this override on top of `config`.
    #[must_use]
    pub fn apply_to(&self, mut config: ScrambleConfig) -> ScrambleConfig {
        if let Some(ms) = self.duration_ms {
            config.duration = Duration::from_millis(ms);
        }
        if let Some(ratio) = self.scramble_ratio {
            config.scramble_ratio = ratio;
        }
        if let Some(alphabet) = &self.alphabet {
            config.alphabet = alphabet.clone();
        }
        if let Some(once) = self.play_once {
            config.play_once = once;
        }
        if let Some(ms) = self.refresh_interval_ms {
            config.refresh_interval = Duration::from_millis(ms);
        }
        if let Some(easing) = self.easing {
            config.easing = easing;
        }
        if let Some(target) = &self.target {
            config.target = target.clone();
        }
        if let Some(choice) = &self.active_color {
            config.active_color = choice.clone();
        }
        if let Some(color) = self.settle_color {
            config.settle_color = Some(color);
        }
        config
    }
}

/// On-disk shape of the settings file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    enter: ConfigOverride,
    hover: ConfigOverride,
    hover_exit: ConfigOverride,
    hover_settle: ConfigOverride,
    exit: ConfigOverride,
    stagger_ms: Option<u64>,
    intro: Option<ScrubTiming>,
    intro_play_ms: Option<u64>,
}

/// Effect settings: the presets with any file overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub enter: ScrambleConfig,
    pub hover: ScrambleConfig,
    pub hover_exit: ScrambleConfig,
    pub hover_settle: ScrambleConfig,
    pub exit: ScrambleConfig,
    pub stagger_ms: u64,
    pub intro: ScrubTiming,
    /// How long `i` takes to play the intro to the end.
    pub intro_play_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enter: presets::hero_into_place(),
            hover: presets::hover_loop(),
            hover_exit: presets::hover_exit(),
            hover_settle: presets::hover_settle(),
            exit: presets::hero_out_to_random(),
            stagger_ms: presets::HERO_STAGGER.as_millis() as u64,
            intro: ScrubTiming::default(),
            intro_play_ms: 1500,
        }
    }
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let defaults = Self::default();
        Self {
            enter: file.enter.apply_to(defaults.enter),
            hover: file.hover.apply_to(defaults.hover),
            hover_exit: file.hover_exit.apply_to(defaults.hover_exit),
            hover_settle: file.hover_settle.apply_to(defaults.hover_settle),
            exit: file.exit.apply_to(defaults.exit),
            stagger_ms: file.stagger_ms.unwrap_or(defaults.stagger_ms),
            intro: file.intro.unwrap_or(defaults.intro),
            intro_play_ms: file.intro_play_ms.unwrap_or(defaults.intro_play_ms),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text, overlaying it on the presets.
    pub fn from_json(text: &str) -> Result<Self, DemoError> {
        let file: SettingsFile = serde_json::from_str(text)?;
        Ok(file.into())
    }

    /// Load settings from `path`, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, DemoError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded demo settings");
        Ok(settings)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// Replay machine config for one hero letter.
    #[must_use]
    pub fn trigger(&self) -> TriggerConfig {
        TriggerConfig::new(self.enter.clone())
            .with_hover(self.hover.clone())
            .with_hover_exit(self.hover_exit.clone(), self.hover_settle.clone())
    }
}

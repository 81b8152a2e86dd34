#![forbid(unsafe_code)]

//! Display surfaces: where scrambled text is written.
//!
//! The engine only ever writes text and, optionally, a color. It reads the
//! surface once, when a target is registered, to capture the ground-truth
//! text. It never asks for layout or geometry.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, or the `#RGB` shorthand.
    pub fn from_hex(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(raw.to_string());
        let hex = raw.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Linear interpolation toward `other`; `t` is clamped to [0, 1].
    #[must_use]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ---------------------------------------------------------------------------
// Surface trait
// ---------------------------------------------------------------------------

/// A renderable text cell owned by the caller.
pub trait TextSurface {
    /// Current textual content. Read once when the target is registered.
    fn content(&self) -> String;

    /// Replace the displayed text.
    fn set_text(&mut self, text: &str);

    /// Change the text color. Surfaces without color support ignore this.
    fn set_color(&mut self, _color: Color) {}
}

/// In-memory surface. Optionally records every write, which makes it the
/// surface of choice for tests and for hosts that render elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySurface {
    text: String,
    color: Option<Color>,
    history: Option<Vec<String>>,
}

impl MemorySurface {
    /// Surface holding `text`, not recording writes.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            history: None,
        }
    }

    /// Surface holding `text` that records every `set_text`.
    #[must_use]
    pub fn recording(text: impl Into<String>) -> Self {
        Self {
            history: Some(Vec::new()),
            ..Self::new(text)
        }
    }

    /// Set the initial color (builder).
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Currently displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current color, if one was ever set.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Recorded writes (empty unless built with [`recording`](Self::recording)).
    #[must_use]
    pub fn writes(&self) -> &[String] {
        self.history.as_deref().unwrap_or(&[])
    }

    /// Take recorded writes, leaving the history empty.
    pub fn take_writes(&mut self) -> Vec<String> {
        self.history.as_mut().map(std::mem::take).unwrap_or_default()
    }
}

impl TextSurface for MemorySurface {
    fn content(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        if let Some(history) = &mut self.history {
            history.push(text.to_string());
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }
}

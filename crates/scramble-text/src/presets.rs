#![forbid(unsafe_code)]

//! Named configurations for the effects used by the hero letters and the
//! intro section.

use std::time::Duration;

use scramble_core::animation::Easing;

use crate::config::{Alphabet, ColorChoice, ScrambleConfig, TargetText};
use crate::scrub::ScrubReveal;
use crate::surface::Color;
use crate::trigger::TriggerConfig;

/// Hero filler glyphs: the brand letters first, then the default set.
pub const HERO_ALPHABET: &str = "MEDLOCKSQABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Intro filler glyphs.
pub const INTRO_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";

/// Blue, green, yellow, purple, pink, orange.
pub const HIGHLIGHT_PALETTE: [Color; 6] = [
    Color::rgb(0x75, 0xd8, 0xff),
    Color::rgb(0x64, 0xd1, 0x87),
    Color::rgb(0xf2, 0xfa, 0x7d),
    Color::rgb(0x9d, 0x78, 0xfe),
    Color::rgb(0xfe, 0xa5, 0xe5),
    Color::rgb(0xfe, 0x8f, 0x00),
];

pub const HIGHLIGHT: Color = Color::rgb(0xf2, 0xfa, 0x7d);

/// Settled text color on light backgrounds.
pub const BASE_DARK: Color = Color::rgb(0x1f, 0x1d, 0x1e);

/// Delay between consecutive hero letters.
pub const HERO_STAGGER: Duration = Duration::from_millis(60);

fn hero_base() -> ScrambleConfig {
    ScrambleConfig::new()
        .alphabet(HERO_ALPHABET)
        .play_once(false)
        .active_color(ColorChoice::Palette(HIGHLIGHT_PALETTE.to_vec()))
        .settle_color(Some(BASE_DARK))
}

/// Hero letters resolving into their word.
#[must_use]
pub fn hero_into_place() -> ScrambleConfig {
    hero_base()
        .duration(Duration::from_millis(1050))
        .scramble_ratio(0.35)
        .refresh_interval(Duration::from_millis(65))
        .easing(Easing::CubicOut)
}

/// Hero letters dissolving to a random glyph each.
#[must_use]
pub fn hero_out_to_random() -> ScrambleConfig {
    hero_base()
        .duration(Duration::from_millis(700))
        .scramble_ratio(1.0)
        .refresh_interval(Duration::from_millis(55))
        .target(TargetText::RandomGlyph)
}

/// One pass of the hover shimmer; restarted while hovered.
#[must_use]
pub fn hover_loop() -> ScrambleConfig {
    hero_base()
        .duration(Duration::from_millis(300))
        .scramble_ratio(1.0)
        .refresh_interval(Duration::from_millis(55))
        .target(TargetText::RandomGlyph)
}

/// First half of the hover exit: a longer scramble to a random glyph.
#[must_use]
pub fn hover_exit() -> ScrambleConfig {
    hero_base()
        .duration(Duration::from_millis(750))
        .scramble_ratio(1.0)
        .refresh_interval(Duration::from_millis(60))
        .target(TargetText::RandomGlyph)
        .settle_color(None)
}

/// Second half of the hover exit: straight reveal back to the letter.
#[must_use]
pub fn hover_settle() -> ScrambleConfig {
    hero_base()
        .duration(Duration::from_millis(300))
        .scramble_ratio(0.0)
        .refresh_interval(Duration::from_millis(50))
}

/// Replay machine config for one hero letter: resolve on enter, shimmer while
/// hovered, scramble out and settle back when the pointer leaves.
#[must_use]
pub fn hero_trigger() -> TriggerConfig {
    TriggerConfig::new(hero_into_place())
        .with_hover(hover_loop())
        .with_hover_exit(hover_exit(), hover_settle())
}

/// Scroll-scrubbed intro paragraph with its teaser line.
#[must_use]
pub fn intro_default(text: &str) -> ScrubReveal {
    ScrubReveal::new(text, Alphabet::new(INTRO_ALPHABET)).with_teaser(true)
}

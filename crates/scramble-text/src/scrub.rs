#![forbid(unsafe_code)]

//! Progress-driven reveal for scroll-scrubbed text.
//!
//! Unlike a timed run, a scrub has no clock: the host maps scroll position to
//! a progress value in [0, 1] and asks for the frame at that point. Moving
//! progress backwards re-scrambles characters that were already resolved.
//!
//! Every non-whitespace character owns a window on a shared timeline,
//! starting `index * char_stagger` in and lasting `char_span`. It shows
//! random glyphs until `resolve_at` of its window has passed, then its true
//! value. Its highlight fades from 1 to 0 over `highlight_span`, starting
//! `highlight_delay` into the window. An optional teaser fades in after the
//! last character.

use scramble_core::animation::Easing;
use scramble_core::rng::Xorshift64;

use crate::config::Alphabet;

/// Timeline layout, in timeline units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrubTiming {
    pub char_span: f32,
    pub char_stagger: f32,
    /// Local progress at which a character locks to its true value.
    pub resolve_at: f32,
    pub highlight_delay: f32,
    pub highlight_span: f32,
    pub highlight_easing: Easing,
    /// Gap between the last character's slot and the teaser fade.
    pub teaser_delay: f32,
    pub teaser_span: f32,
}

impl Default for ScrubTiming {
    fn default() -> Self {
        Self {
            char_span: 0.2,
            char_stagger: 0.02,
            resolve_at: 0.9,
            highlight_delay: 0.15,
            highlight_span: 0.15,
            highlight_easing: Easing::EaseOut,
            teaser_delay: 0.3,
            teaser_span: 0.4,
        }
    }
}

/// One rendered position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubCell {
    pub ch: char,
    /// 1 = full highlight color, 0 = settled color.
    pub highlight: f32,
}

/// Scrubbed reveal of one line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrubReveal {
    letters: Vec<char>,
    alphabet: Alphabet,
    timing: ScrubTiming,
    teaser: bool,
}

fn window(start: f32, span: f32, t: f32) -> f32 {
    if span <= 0.0 {
        return if t >= start { 1.0 } else { 0.0 };
    }
    ((t - start) / span).clamp(0.0, 1.0)
}

impl ScrubReveal {
    #[must_use]
    pub fn new(text: &str, alphabet: Alphabet) -> Self {
        Self {
            letters: text.chars().collect(),
            alphabet,
            timing: ScrubTiming::default(),
            teaser: false,
        }
    }

    #[must_use]
    pub fn timing(mut self, timing: ScrubTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Include the teaser fade in the timeline.
    #[must_use]
    pub fn with_teaser(mut self, teaser: bool) -> Self {
        self.teaser = teaser;
        self
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.letters.iter().collect()
    }

    fn glyph_count(&self) -> usize {
        self.letters.iter().filter(|c| !c.is_whitespace()).count()
    }

    /// Length of the whole timeline. Zero for all-whitespace text.
    #[must_use]
    pub fn timeline_len(&self) -> f32 {
        let n = self.glyph_count();
        if n == 0 {
            return 0.0;
        }
        let t = &self.timing;
        let last_start = (n - 1) as f32 * t.char_stagger;
        let chars_end = last_start + t.char_span.max(t.highlight_delay + t.highlight_span);
        if self.teaser {
            chars_end.max(self.teaser_start() + t.teaser_span)
        } else {
            chars_end
        }
    }

    fn teaser_start(&self) -> f32 {
        self.glyph_count() as f32 * self.timing.char_stagger + self.timing.teaser_delay
    }

    fn timeline_pos(&self, progress: f32) -> f32 {
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        p * self.timeline_len()
    }

    /// Cells at `progress`.
    pub fn frame(&self, progress: f32, rng: &mut Xorshift64) -> Vec<ScrubCell> {
        let t = self.timeline_pos(progress);
        let timing = &self.timing;
        let mut slot = 0usize;
        self.letters
            .iter()
            .map(|&c| {
                if c.is_whitespace() {
                    return ScrubCell { ch: c, highlight: 0.0 };
                }
                let start = slot as f32 * timing.char_stagger;
                slot += 1;
                let local = window(start, timing.char_span, t);
                let ch = if local >= timing.resolve_at {
                    c
                } else {
                    self.alphabet.pick(rng)
                };
                let fade = window(start + timing.highlight_delay, timing.highlight_span, t);
                ScrubCell {
                    ch,
                    highlight: 1.0 - timing.highlight_easing.apply(fade),
                }
            })
            .collect()
    }

    /// Text at `progress`.
    pub fn render(&self, progress: f32, rng: &mut Xorshift64) -> String {
        self.frame(progress, rng).into_iter().map(|cell| cell.ch).collect()
    }

    /// Teaser opacity at `progress`, eased like the highlight. Always 0 when
    /// the teaser is disabled.
    #[must_use]
    pub fn teaser_opacity(&self, progress: f32) -> f32 {
        if !self.teaser {
            return 0.0;
        }
        let t = self.timeline_pos(progress);
        let fade = window(self.teaser_start(), self.timing.teaser_span, t);
        self.timing.highlight_easing.apply(fade)
    }
}

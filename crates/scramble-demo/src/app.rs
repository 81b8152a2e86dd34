#![forbid(unsafe_code)]

//! Demo model: the hero word, its replay machines and the scrubbed intro.
//!
//! The model never touches the terminal on its own. [`App::handle_key`] and
//! [`App::tick`] are pure state updates driven by the host clock;
//! [`App::render`] queues crossterm commands into any writer.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::KeyCode;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use scramble_core::animation::{Easing, Tween};
use scramble_core::rng::Xorshift64;
use scramble_text::presets::{self, HIGHLIGHT};
use scramble_text::stagger::run_plan;
use scramble_text::{
    Color, EventKind, MemorySurface, ScrambleEngine, ScrubCell, ScrubReveal, ShuffleMemory, Signal,
    StaggerPlan, TargetId, TriggerMachine, TriggerSet,
};

use crate::settings::Settings;

/// Light strip the hero word sits on.
const HERO_BACKGROUND: Color = Color::rgb(0xf4, 0xf1, 0xec);
/// Settled intro text on the terminal background.
const INTRO_SETTLED: Color = Color::rgb(0xe8, 0xe6, 0xe3);
const TEASER_HIDDEN: Color = Color::rgb(0x30, 0x30, 0x30);
const TEASER_SHOWN: Color = Color::rgb(0xc8, 0xc8, 0xc8);
const TEASER: &str = "Scroll on for the rooms";
const SCRUB_STEP: f32 = 0.05;

/// Whether the run loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
struct IntroPlay {
    tween: Tween,
    from: f32,
}

pub struct App {
    engine: ScrambleEngine<MemorySurface>,
    triggers: TriggerSet,
    letters: Vec<TargetId>,
    shuffle: ShuffleMemory,
    settings: Settings,
    intro: ScrubReveal,
    progress: f32,
    intro_play: Option<IntroPlay>,
    scrub_rng: Xorshift64,
    completed_runs: usize,
    status: String,
}

impl App {
    /// Build the scene for `word` and `intro`. A seed makes every frame
    /// reproducible.
    pub fn new(word: &str, intro: &str, settings: Settings, seed: Option<u64>) -> Self {
        let (mut engine, scrub_rng) = match seed {
            Some(seed) => (
                ScrambleEngine::seeded(seed),
                Xorshift64::seeded(seed.rotate_left(17)),
            ),
            None => (ScrambleEngine::new(), Xorshift64::from_entropy()),
        };
        let trigger = settings.trigger();
        let mut triggers = TriggerSet::new(settings.stagger());
        let letters: Vec<TargetId> = word
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                let surface = MemorySurface::new(c.to_string()).with_color(presets::BASE_DARK);
                let id = engine.add_target(surface);
                engine.set_base_color(id, presets::BASE_DARK);
                triggers.push(TriggerMachine::new(id, trigger.clone()));
                id
            })
            .collect();
        let intro = presets::intro_default(intro).timing(settings.intro);
        tracing::info!(word, letters = letters.len(), seeded = seed.is_some(), "demo scene built");

        Self {
            engine,
            triggers,
            letters,
            shuffle: ShuffleMemory::new(),
            settings,
            intro,
            progress: 0.0,
            intro_play: None,
            scrub_rng,
            completed_runs: 0,
            status: "press e to reveal".into(),
        }
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn completed_runs(&self) -> usize {
        self.completed_runs
    }

    /// Whether anything is still animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.engine.is_busy() || self.intro_play.is_some()
    }

    /// Current hero text.
    #[must_use]
    pub fn hero_text(&self) -> String {
        self.hero_cells().into_iter().map(|(text, _)| text).collect()
    }

    fn hero_cells(&self) -> Vec<(String, Option<Color>)> {
        self.letters
            .iter()
            .filter_map(|&id| self.engine.surface(id))
            .map(|s| (s.text().to_string(), s.color()))
            .collect()
    }

    fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
        self.intro_play = None;
        self.status = format!("intro {:>3.0}%", self.progress * 100.0);
    }

    pub fn handle_key(&mut self, code: KeyCode, now: Duration) -> Control {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('e') => {
                let started = self.triggers.broadcast(Signal::EnterView, &mut self.engine, now);
                self.status = format!("enter: {} letters scheduled", started.len());
            }
            KeyCode::Char('l') => {
                let _ = self.triggers.broadcast(Signal::LeaveView, &mut self.engine, now);
                self.status = "leave: reset".into();
            }
            KeyCode::Char('s') => {
                let plan = self
                    .shuffle
                    .shuffle(&self.letters, self.settings.stagger(), self.engine.rng_mut());
                let _ = run_plan(&mut self.engine, &plan, &self.settings.enter, now);
                self.status = "shuffle in".into();
            }
            KeyCode::Char('o') => {
                let plan = self.shuffle.reverse_of_last().unwrap_or_else(|| {
                    StaggerPlan::in_order(self.letters.iter().rev().copied(), self.settings.stagger())
                });
                let _ = run_plan(&mut self.engine, &plan, &self.settings.exit, now);
                self.status = "scramble out".into();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(&id) = self.letters.get(index) {
                    let hovering = self.triggers.machine(id).is_some_and(TriggerMachine::is_hovering);
                    let signal = if hovering {
                        Signal::HoverEnd
                    } else {
                        Signal::HoverStart
                    };
                    let _ = self.triggers.signal(id, signal, &mut self.engine, now);
                    self.status = format!("letter {c}: {signal:?}");
                }
            }
            KeyCode::Char('i') => {
                let duration = Duration::from_millis(self.settings.intro_play_ms);
                self.intro_play = Some(IntroPlay {
                    tween: Tween::new(now, duration).easing(Easing::EaseInOut),
                    from: self.progress,
                });
                self.status = "intro: playing".into();
            }
            KeyCode::Up => self.set_progress(self.progress + SCRUB_STEP),
            KeyCode::Down => self.set_progress(self.progress - SCRUB_STEP),
            _ => {}
        }
        Control::Continue
    }

    /// Advance every animation to `now`.
    pub fn tick(&mut self, now: Duration) {
        let events = self.triggers.pump(&mut self.engine, now);
        self.completed_runs += events.iter().filter(|e| e.kind == EventKind::Completed).count();

        if let Some(play) = self.intro_play {
            self.progress = play.from + (1.0 - play.from) * play.tween.value(now);
            if play.tween.is_complete(now) {
                self.progress = 1.0;
                self.intro_play = None;
                self.status = "intro: done".into();
            }
        }
    }

    /// Intro cells at the current progress.
    pub fn intro_cells(&mut self) -> Vec<ScrubCell> {
        self.intro.frame(self.progress, &mut self.scrub_rng)
    }

    /// Queue one full frame into `out`.
    pub fn render(&mut self, out: &mut impl Write, (cols, rows): (u16, u16)) -> io::Result<()> {
        queue!(out, terminal::Clear(terminal::ClearType::All))?;
        let hero_row = rows / 3;
        let hero = self.hero_cells();
        let hero_width = hero.len() as u16 * 2;
        let hero_col = cols.saturating_sub(hero_width) / 2;

        queue!(out, cursor::MoveTo(hero_col, hero_row), SetBackgroundColor(term(HERO_BACKGROUND)))?;
        for (text, color) in &hero {
            let fg = color.unwrap_or(presets::BASE_DARK);
            queue!(out, SetForegroundColor(term(fg)), Print(text), Print(' '))?;
        }
        queue!(out, ResetColor)?;

        let cells = self.intro_cells();
        let intro_col = cols.saturating_sub(cells.len() as u16) / 2;
        queue!(out, cursor::MoveTo(intro_col, hero_row + 3))?;
        for cell in &cells {
            let fg = INTRO_SETTLED.lerp(HIGHLIGHT, cell.highlight);
            queue!(out, SetForegroundColor(term(fg)), Print(cell.ch))?;
        }

        let teaser = TEASER_HIDDEN.lerp(TEASER_SHOWN, self.intro.teaser_opacity(self.progress));
        let teaser_col = cols.saturating_sub(TEASER.len() as u16) / 2;
        queue!(
            out,
            cursor::MoveTo(teaser_col, hero_row + 5),
            SetForegroundColor(term(teaser)),
            Print(TEASER),
            ResetColor,
            cursor::MoveTo(1, rows.saturating_sub(1)),
            Print(&self.status),
        )?;
        out.flush()
    }
}

fn term(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

#![forbid(unsafe_code)]

//! The scramble engine: per-target animator driven by a frame scheduler.
//!
//! The engine owns every registered [`ScrambleTarget`], a
//! [`FrameScheduler`] and the PRNG used for filler glyphs. Hosts call
//! [`ScrambleEngine::advance`] once per frame with the current monotonic
//! time; each live run draws at most one frame per `advance` and requests
//! the next one, so a frame requested during `advance` runs on the
//! following call.
//!
//! # Invariants
//!
//! 1. At most one run is live per target. Starting a run cancels the
//!    previous run's pending frame and bumps the generation, so a frame
//!    already drained for the old run is dropped on its generation check.
//! 2. A play-once run that completed makes further play-once runs no-ops.
//! 3. Whitespace positions never show a filler glyph.
//! 4. A run's final write is exactly its target text.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use scramble_text::{MemorySurface, RunOutcome, ScrambleConfig, ScrambleEngine};
//!
//! let mut engine = ScrambleEngine::seeded(7);
//! let id = engine.add_target(MemorySurface::new("MEDLOCK"));
//! let config = ScrambleConfig::new().duration(Duration::from_millis(100));
//!
//! assert!(matches!(engine.start_run(id, &config, Duration::ZERO), RunOutcome::Started(_)));
//! let mut now = Duration::ZERO;
//! while engine.is_running(id) {
//!     engine.advance(now);
//!     now += Duration::from_millis(16);
//! }
//! assert_eq!(engine.surface(id).map(|s| s.text()), Some("MEDLOCK"));
//! ```

use std::fmt;
use std::time::Duration;

use scramble_core::frame::{FrameQueue, FrameScheduler};
use scramble_core::rng::Xorshift64;

use crate::compose::{compose_frame, reveal_count};
use crate::config::{ScrambleConfig, TargetText};
use crate::error::SkipReason;
use crate::hooks::{NoHooks, RunHooks};
use crate::surface::{Color, TextSurface};
use crate::target::{ActiveRun, CompletionFlag, Generation, ScrambleTarget, TargetId};

// ---------------------------------------------------------------------------
// Outcomes and events
// ---------------------------------------------------------------------------

/// Result of asking for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum RunOutcome {
    /// The run is live under this generation; its first frame is drawn on
    /// the next [`ScrambleEngine::advance`].
    Started(Generation),
    /// The run will be attempted on the first frame at or after `due`. The
    /// `Started` event it produces carries `ticket`.
    Deferred { due: Duration, ticket: StartTicket },
    /// Nothing was scheduled.
    Skipped(SkipReason),
}

impl RunOutcome {
    /// The generation of a started run.
    #[must_use]
    pub fn generation(self) -> Option<Generation> {
        match self {
            Self::Started(generation) => Some(generation),
            _ => None,
        }
    }

    /// When a deferred run is due.
    #[must_use]
    pub fn due(self) -> Option<Duration> {
        match self {
            Self::Deferred { due, .. } => Some(due),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Identifies one delayed start from [`ScrambleEngine::schedule_start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StartTicket(u64);

/// Lifecycle change of a run, queued for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrambleEvent {
    pub target: TargetId,
    pub generation: Generation,
    pub kind: EventKind,
    /// Set on `Started` when the run came from a delayed start.
    pub ticket: Option<StartTicket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Started,
    Completed,
    /// Superseded by a newer run, or cancelled explicitly.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Scheduler jobs
// ---------------------------------------------------------------------------

/// Work item the engine places on its frame scheduler. Opaque to hosts.
pub struct EngineJob {
    kind: JobKind,
}

enum JobKind {
    Tick {
        target: TargetId,
        generation: Generation,
    },
    Start {
        target: TargetId,
        epoch: u64,
        ticket: StartTicket,
        config: Box<ScrambleConfig>,
        hooks: Box<dyn RunHooks>,
    },
}

impl EngineJob {
    fn tick(target: TargetId, generation: Generation) -> Self {
        Self {
            kind: JobKind::Tick { target, generation },
        }
    }
}

impl fmt::Debug for EngineJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            JobKind::Tick { target, generation } => f
                .debug_struct("Tick")
                .field("target", target)
                .field("generation", generation)
                .finish(),
            JobKind::Start {
                target,
                epoch,
                ticket,
                ..
            } => f
                .debug_struct("Start")
                .field("target", target)
                .field("epoch", epoch)
                .field("ticket", ticket)
                .finish_non_exhaustive(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScrambleEngine
// ---------------------------------------------------------------------------

/// Scramble-and-reveal animator for a set of display surfaces.
pub struct ScrambleEngine<S, Q = FrameQueue<EngineJob>> {
    targets: Vec<ScrambleTarget<S>>,
    scheduler: Q,
    rng: Xorshift64,
    events: Vec<ScrambleEvent>,
    next_ticket: u64,
}

impl<S: fmt::Debug, Q> fmt::Debug for ScrambleEngine<S, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrambleEngine")
            .field("targets", &self.targets)
            .field("queued_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<S: TextSurface> ScrambleEngine<S> {
    /// Engine with the default frame queue and an entropy-seeded PRNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scheduler(FrameQueue::new(), Xorshift64::from_entropy())
    }

    /// Engine with a fixed PRNG seed, for reproducible frames.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_scheduler(FrameQueue::new(), Xorshift64::seeded(seed))
    }
}

impl<S: TextSurface> Default for ScrambleEngine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TextSurface, Q: FrameScheduler<EngineJob>> ScrambleEngine<S, Q> {
    /// Engine on a caller-provided scheduler.
    pub fn with_scheduler(scheduler: Q, rng: Xorshift64) -> Self {
        Self {
            targets: Vec::new(),
            scheduler,
            rng,
            events: Vec::new(),
            next_ticket: 0,
        }
    }

    // -- registration ------------------------------------------------------

    /// Register `surface`, capturing its trimmed content as the base text.
    pub fn add_target(&mut self, surface: S) -> TargetId {
        let content = surface.content();
        let base = content.trim().to_string();
        self.push_target(ScrambleTarget::new(surface, base, &content))
    }

    /// Register `surface` with an explicit base text.
    pub fn add_target_with_text(&mut self, surface: S, base_text: impl Into<String>) -> TargetId {
        let content = surface.content();
        self.push_target(ScrambleTarget::new(surface, base_text.into(), &content))
    }

    fn push_target(&mut self, target: ScrambleTarget<S>) -> TargetId {
        let id = TargetId(self.targets.len());
        tracing::trace!(target_id = id.0, base = %target.base_text, "target registered");
        self.targets.push(target);
        id
    }

    /// Color restored on [`reset`](Self::reset). Returns `false` for an unknown id.
    pub fn set_base_color(&mut self, id: TargetId, color: Color) -> bool {
        match self.targets.get_mut(id.0) {
            Some(target) => {
                target.base_color = Some(color);
                true
            }
            None => false,
        }
    }

    // -- accessors ---------------------------------------------------------

    #[must_use]
    pub fn target(&self, id: TargetId) -> Option<&ScrambleTarget<S>> {
        self.targets.get(id.0)
    }

    #[must_use]
    pub fn surface(&self, id: TargetId) -> Option<&S> {
        self.targets.get(id.0).map(|t| &t.surface)
    }

    /// Mutable surface access. The base text is not re-read.
    pub fn surface_mut(&mut self, id: TargetId) -> Option<&mut S> {
        self.targets.get_mut(id.0).map(|t| &mut t.surface)
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        (0..self.targets.len()).map(TargetId)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn is_running(&self, id: TargetId) -> bool {
        self.targets.get(id.0).is_some_and(ScrambleTarget::is_running)
    }

    /// Whether any run is live or any delayed start is pending.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.scheduler.pending() > 0
    }

    /// Number of jobs waiting on the scheduler.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.scheduler.pending()
    }

    /// Earliest delayed start still pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// The engine's PRNG, shared with plan shuffling so one seed covers a scene.
    pub fn rng_mut(&mut self) -> &mut Xorshift64 {
        &mut self.rng
    }

    /// Take queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<ScrambleEvent> {
        std::mem::take(&mut self.events)
    }

    // -- runs --------------------------------------------------------------

    /// Start a run with no hooks.
    pub fn start_run(&mut self, id: TargetId, config: &ScrambleConfig, now: Duration) -> RunOutcome {
        self.start_run_with(id, config, Box::new(NoHooks), now)
    }

    /// Start a run on `id`, superseding any live run there.
    pub fn start_run_with(
        &mut self,
        id: TargetId,
        config: &ScrambleConfig,
        hooks: Box<dyn RunHooks>,
        now: Duration,
    ) -> RunOutcome {
        self.launch(id, config, hooks, now, None)
    }

    fn launch(
        &mut self,
        id: TargetId,
        config: &ScrambleConfig,
        mut hooks: Box<dyn RunHooks>,
        now: Duration,
        ticket: Option<StartTicket>,
    ) -> RunOutcome {
        let Some(target) = self.targets.get_mut(id.0) else {
            tracing::warn!(target_id = id.0, "scramble requested for unregistered target");
            return RunOutcome::Skipped(SkipReason::MissingSurface);
        };

        let letters: Vec<char> = match &config.target {
            TargetText::Fixed(text) if !text.is_empty() => text.chars().collect(),
            TargetText::Base | TargetText::Fixed(_) => target.base_text.chars().collect(),
            TargetText::RandomGlyph => vec![config.alphabet.pick(&mut self.rng)],
        };
        if letters.is_empty() {
            tracing::debug!(target_id = id.0, reason = %SkipReason::EmptyText, "scramble skipped");
            return RunOutcome::Skipped(SkipReason::EmptyText);
        }
        if config.play_once && target.completion == CompletionFlag::Done {
            tracing::debug!(
                target_id = id.0,
                reason = %SkipReason::AlreadyCompleted,
                "scramble skipped"
            );
            return RunOutcome::Skipped(SkipReason::AlreadyCompleted);
        }

        if let Some(handle) = target.pending_frame.take() {
            self.scheduler.cancel(handle);
        }
        if target.run.take().is_some() {
            self.events.push(ScrambleEvent {
                target: id,
                generation: target.generation,
                kind: EventKind::Cancelled,
                ticket: None,
            });
        }

        target.generation = target.generation.next();
        let generation = target.generation;
        target.completion = CompletionFlag::Running;
        if let Some(color) = config.active_color.resolve(&mut self.rng) {
            target.surface.set_color(color);
        }
        hooks.on_start();

        let phases = config.phases();
        tracing::debug!(
            target_id = id.0,
            generation = generation.value(),
            len = letters.len(),
            total_ms = phases.total.as_millis() as u64,
            scramble_ms = phases.scramble.as_millis() as u64,
            easing = %config.easing,
            play_once = config.play_once,
            "scramble run started"
        );
        target.run = Some(ActiveRun {
            letters,
            phases,
            easing: config.easing,
            alphabet: config.alphabet.clone(),
            refresh_interval: config.refresh_interval,
            play_once: config.play_once,
            settle_color: config.settle_color,
            started_at: now,
            last_refresh: None,
            hooks,
        });
        target.pending_frame = Some(self.scheduler.request_frame(EngineJob::tick(id, generation)));
        self.events.push(ScrambleEvent {
            target: id,
            generation,
            kind: EventKind::Started,
            ticket,
        });
        RunOutcome::Started(generation)
    }

    /// Start a run after `delay`. A zero delay starts immediately.
    ///
    /// The delayed start is dropped if the target is cancelled or reset
    /// before it is due. Play-once and empty-text checks happen when it fires.
    pub fn schedule_start(
        &mut self,
        id: TargetId,
        delay: Duration,
        config: &ScrambleConfig,
        hooks: Box<dyn RunHooks>,
        now: Duration,
    ) -> RunOutcome {
        if delay.is_zero() {
            return self.start_run_with(id, config, hooks, now);
        }
        let Some(target) = self.targets.get(id.0) else {
            tracing::warn!(target_id = id.0, "delayed scramble for unregistered target");
            return RunOutcome::Skipped(SkipReason::MissingSurface);
        };
        let due = now.saturating_add(delay);
        let ticket = StartTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let job = EngineJob {
            kind: JobKind::Start {
                target: id,
                epoch: target.start_epoch,
                ticket,
                config: Box::new(config.clone()),
                hooks,
            },
        };
        self.scheduler.request_at(due, job);
        tracing::trace!(target_id = id.0, due_ms = due.as_millis() as u64, "scramble start deferred");
        RunOutcome::Deferred { due, ticket }
    }

    /// Invalidate the live run and any pending delayed starts on `id`
    /// without touching the surface. Returns whether a run was live.
    pub fn cancel(&mut self, id: TargetId) -> bool {
        let Some(target) = self.targets.get_mut(id.0) else {
            return false;
        };
        target.start_epoch = target.start_epoch.wrapping_add(1);
        if let Some(handle) = target.pending_frame.take() {
            self.scheduler.cancel(handle);
        }
        let was_running = target.run.take().is_some();
        if was_running {
            self.events.push(ScrambleEvent {
                target: id,
                generation: target.generation,
                kind: EventKind::Cancelled,
                ticket: None,
            });
            if target.completion == CompletionFlag::Running {
                target.completion = CompletionFlag::NotRun;
            }
        }
        target.generation = target.generation.next();
        tracing::debug!(target_id = id.0, was_running, "scramble cancelled");
        was_running
    }

    /// Cancel, then restore the base text and base color.
    ///
    /// A target that finished a play-once run stays `Done`.
    pub fn reset(&mut self, id: TargetId) -> bool {
        let was_running = self.cancel(id);
        if let Some(target) = self.targets.get_mut(id.0) {
            target.surface.set_text(&target.base_text);
            target.displayed = target.base_text.chars().collect();
            if let Some(color) = target.base_color {
                target.surface.set_color(color);
            }
            if target.completion != CompletionFlag::Done {
                target.completion = CompletionFlag::NotRun;
            }
        }
        was_running
    }

    // -- frames ------------------------------------------------------------

    /// Dispatch every job due at `now`. Returns the number of jobs drained.
    pub fn advance(&mut self, now: Duration) -> usize {
        let _span = tracing::debug_span!("scramble.advance", now_ms = now.as_millis() as u64).entered();
        let jobs = self.scheduler.drain_due(now);
        let count = jobs.len();
        for job in jobs {
            match job.kind {
                JobKind::Tick { target, generation } => self.tick(target, generation, now),
                JobKind::Start {
                    target,
                    epoch,
                    ticket,
                    config,
                    hooks,
                } => {
                    let current = self.targets.get(target.0).map(|t| t.start_epoch);
                    if current == Some(epoch) {
                        let _ = self.launch(target, &config, hooks, now, Some(ticket));
                    } else {
                        tracing::trace!(target_id = target.0, "cancelled delayed start dropped");
                    }
                }
            }
        }
        count
    }

    fn tick(&mut self, id: TargetId, generation: Generation, now: Duration) {
        let Some(target) = self.targets.get_mut(id.0) else {
            return;
        };
        if target.generation != generation {
            tracing::trace!(
                target_id = id.0,
                stale = generation.value(),
                current = target.generation.value(),
                "stale frame dropped"
            );
            return;
        }
        let Some(mut run) = target.run.take() else {
            return;
        };
        target.pending_frame = None;

        let elapsed = now.saturating_sub(run.started_at);
        if elapsed >= run.phases.total {
            let text: String = run.letters.iter().collect();
            target.surface.set_text(&text);
            target.displayed = run.letters;
            target.completion = if run.play_once {
                CompletionFlag::Done
            } else {
                CompletionFlag::NotRun
            };
            if let Some(color) = run.settle_color {
                target.surface.set_color(color);
            }
            run.hooks.on_complete();
            self.events.push(ScrambleEvent {
                target: id,
                generation,
                kind: EventKind::Completed,
                ticket: None,
            });
            tracing::debug!(
                target_id = id.0,
                generation = generation.value(),
                text = %text,
                "scramble run completed"
            );
            return;
        }

        let in_scramble = run.phases.in_scramble(elapsed);
        let revealed = reveal_count(elapsed, &run.phases, run.easing, run.letters.len());
        let refresh = run
            .last_refresh
            .is_none_or(|last| now.saturating_sub(last) >= run.refresh_interval);
        if refresh {
            run.last_refresh = Some(now);
        }
        let frame = compose_frame(
            &run.letters,
            &target.displayed,
            in_scramble,
            revealed,
            refresh,
            &run.alphabet,
            &mut self.rng,
        );
        let text: String = frame.iter().collect();
        target.surface.set_text(&text);
        target.displayed = frame;
        run.hooks.on_update(&text);
        tracing::trace!(target_id = id.0, revealed, refresh, frame = %text, "scramble frame");

        target.run = Some(run);
        target.pending_frame = Some(self.scheduler.request_frame(EngineJob::tick(id, generation)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::FnHooks;
    use crate::surface::MemorySurface;
    use std::cell::Cell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn short(duration_ms: u64) -> ScrambleConfig {
        ScrambleConfig::new()
            .duration(ms(duration_ms))
            .scramble_ratio(0.5)
            .refresh_interval(Duration::ZERO)
    }

    fn run_to_end(engine: &mut ScrambleEngine<MemorySurface>, from: Duration, step: Duration) -> Duration {
        let mut now = from;
        for _ in 0..10_000 {
            if !engine.is_busy() {
                break;
            }
            engine.advance(now);
            now += step;
        }
        now
    }

    #[test]
    fn run_converges_on_base_text() {
        let mut engine = ScrambleEngine::seeded(1);
        let id = engine.add_target(MemorySurface::new("  HELLO  "));
        assert_eq!(engine.target(id).map(|t| t.base_text()), Some("HELLO"));

        let outcome = engine.start_run(id, &short(100), Duration::ZERO);
        assert_eq!(outcome, RunOutcome::Started(Generation::default().next()));
        run_to_end(&mut engine, Duration::ZERO, ms(16));
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("HELLO"));
        assert_eq!(engine.target(id).map(|t| t.completion()), Some(CompletionFlag::Done));
    }

    #[test]
    fn first_frame_lands_on_next_advance() {
        let mut engine = ScrambleEngine::seeded(2);
        let id = engine.add_target(MemorySurface::recording("ABC"));
        let _ = engine.start_run(id, &short(100), Duration::ZERO);
        assert!(engine.surface(id).is_some_and(|s| s.writes().is_empty()));
        assert_eq!(engine.advance(Duration::ZERO), 1);
        assert_eq!(engine.surface(id).map(|s| s.writes().len()), Some(1));
    }

    #[test]
    fn unknown_target_is_skipped() {
        let mut engine: ScrambleEngine<MemorySurface> = ScrambleEngine::seeded(3);
        let outcome = engine.start_run(TargetId(9), &short(100), Duration::ZERO);
        assert_eq!(outcome, RunOutcome::Skipped(SkipReason::MissingSurface));
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn empty_text_is_skipped_without_hooks() {
        let mut engine = ScrambleEngine::seeded(4);
        let id = engine.add_target(MemorySurface::new("   "));
        let started = Rc::new(Cell::new(false));
        let flag = started.clone();
        let hooks = FnHooks::new().with_start(move || flag.set(true));
        let outcome = engine.start_run_with(id, &short(100), Box::new(hooks), Duration::ZERO);
        assert_eq!(outcome, RunOutcome::Skipped(SkipReason::EmptyText));
        assert!(!started.get());
    }

    #[test]
    fn play_once_blocks_replay() {
        let mut engine = ScrambleEngine::seeded(5);
        let id = engine.add_target(MemorySurface::new("ONCE"));
        let _ = engine.start_run(id, &short(50), Duration::ZERO);
        let end = run_to_end(&mut engine, Duration::ZERO, ms(10));
        let again = engine.start_run(id, &short(50), end);
        assert_eq!(again, RunOutcome::Skipped(SkipReason::AlreadyCompleted));
        assert!(!engine.is_busy());
    }

    #[test]
    fn repeatable_runs_replay() {
        let mut engine = ScrambleEngine::seeded(6);
        let id = engine.add_target(MemorySurface::new("LOOP"));
        let config = short(50).play_once(false);
        let _ = engine.start_run(id, &config, Duration::ZERO);
        let end = run_to_end(&mut engine, Duration::ZERO, ms(10));
        assert_eq!(engine.target(id).map(|t| t.completion()), Some(CompletionFlag::NotRun));
        assert!(matches!(engine.start_run(id, &config, end), RunOutcome::Started(_)));
    }

    #[test]
    fn preemption_drops_old_run() {
        let mut engine = ScrambleEngine::seeded(7);
        let id = engine.add_target(MemorySurface::new("AAAA"));
        let completions = Rc::new(Cell::new(0));
        let first = completions.clone();
        let _ = engine.start_run_with(
            id,
            &short(100),
            Box::new(FnHooks::new().with_complete(move || first.set(first.get() + 10))),
            Duration::ZERO,
        );
        engine.advance(Duration::ZERO);
        let second = completions.clone();
        let config = short(100).target(TargetText::Fixed("ZZ".into()));
        let _ = engine.start_run_with(
            id,
            &config,
            Box::new(FnHooks::new().with_complete(move || second.set(second.get() + 1))),
            ms(16),
        );
        run_to_end(&mut engine, ms(16), ms(16));
        assert_eq!(completions.get(), 1);
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("ZZ"));

        let kinds: Vec<EventKind> = engine.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [EventKind::Started, EventKind::Cancelled, EventKind::Started, EventKind::Completed]
        );
    }

    #[test]
    fn random_glyph_target_is_one_alphabet_char() {
        let mut engine = ScrambleEngine::seeded(8);
        let id = engine.add_target(MemorySurface::new("M"));
        let config = short(30).alphabet("XYZ").target(TargetText::RandomGlyph);
        let _ = engine.start_run(id, &config, Duration::ZERO);
        run_to_end(&mut engine, Duration::ZERO, ms(10));
        let text = engine.surface(id).map(|s| s.text().to_string()).unwrap_or_default();
        assert_eq!(text.chars().count(), 1);
        assert!("XYZ".contains(&text));
    }

    #[test]
    fn delayed_start_waits_and_can_be_cancelled() {
        let mut engine = ScrambleEngine::seeded(9);
        let id = engine.add_target(MemorySurface::new("LATE"));
        let outcome = engine.schedule_start(id, ms(60), &short(50), Box::new(NoHooks), Duration::ZERO);
        assert_eq!(outcome.due(), Some(ms(60)));
        assert_eq!(engine.next_deadline(), Some(ms(60)));
        engine.advance(ms(30));
        assert!(!engine.is_running(id));

        engine.cancel(id);
        engine.advance(ms(60));
        assert!(!engine.is_running(id));
        assert!(!engine.is_busy());
    }

    #[test]
    fn delayed_start_fires_when_due() {
        let mut engine = ScrambleEngine::seeded(10);
        let id = engine.add_target(MemorySurface::new("LATE"));
        let _ = engine.schedule_start(id, ms(60), &short(50), Box::new(NoHooks), Duration::ZERO);
        engine.advance(ms(64));
        assert!(engine.is_running(id));
    }

    #[test]
    fn delayed_start_tags_its_started_event() {
        let mut engine = ScrambleEngine::seeded(13);
        let id = engine.add_target(MemorySurface::new("TAG"));
        let RunOutcome::Deferred { ticket, .. } =
            engine.schedule_start(id, ms(20), &short(50), Box::new(NoHooks), Duration::ZERO)
        else {
            panic!("expected a deferred start");
        };
        let _ = engine.start_run(id, &short(50), ms(5));
        engine.advance(ms(20));

        let started: Vec<Option<StartTicket>> = engine
            .drain_events()
            .into_iter()
            .filter(|e| e.kind == EventKind::Started)
            .map(|e| e.ticket)
            .collect();
        assert_eq!(started, [None, Some(ticket)]);
    }

    #[test]
    fn huge_duration_starts_without_overflow() {
        let mut engine = ScrambleEngine::seeded(14);
        let id = engine.add_target(MemorySurface::new("SLOW"));
        let config = ScrambleConfig::new().duration(Duration::MAX).scramble_ratio(1.0);
        assert!(matches!(engine.start_run(id, &config, Duration::ZERO), RunOutcome::Started(_)));
        engine.advance(Duration::ZERO);
        engine.advance(ms(100));
        assert!(engine.is_running(id));
        assert_eq!(engine.surface(id).map(|s| s.text().chars().count()), Some(4));
    }

    #[test]
    fn huge_delay_saturates_due_time() {
        let mut engine = ScrambleEngine::seeded(15);
        let id = engine.add_target(MemorySurface::new("NEVER"));
        let outcome = engine.schedule_start(
            id,
            Duration::MAX,
            &short(50),
            Box::new(NoHooks),
            Duration::from_secs(1),
        );
        assert_eq!(outcome.due(), Some(Duration::MAX));
        assert_eq!(engine.advance(Duration::from_secs(3600)), 0);
        assert!(!engine.is_running(id));
    }

    #[test]
    fn reset_restores_text_and_color() {
        let base = Color::rgb(0x1f, 0x1d, 0x1e);
        let mut engine = ScrambleEngine::seeded(11);
        let id = engine.add_target(MemorySurface::new("BACK"));
        assert!(engine.set_base_color(id, base));
        let config = short(500)
            .play_once(false)
            .active_color(crate::config::ColorChoice::Fixed(Color::rgb(1, 2, 3)));
        let _ = engine.start_run(id, &config, Duration::ZERO);
        engine.advance(Duration::ZERO);
        assert_eq!(engine.surface(id).and_then(MemorySurface::color), Some(Color::rgb(1, 2, 3)));

        assert!(engine.reset(id));
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("BACK"));
        assert_eq!(engine.surface(id).and_then(MemorySurface::color), Some(base));
        assert_eq!(engine.target(id).map(|t| t.completion()), Some(CompletionFlag::NotRun));
        assert!(!engine.is_busy());
    }

    #[test]
    fn settle_color_applies_on_completion() {
        let settle = Color::rgb(9, 9, 9);
        let mut engine = ScrambleEngine::seeded(12);
        let id = engine.add_target(MemorySurface::new("OK"));
        let _ = engine.start_run(id, &short(20).settle_color(Some(settle)), Duration::ZERO);
        run_to_end(&mut engine, Duration::ZERO, ms(10));
        assert_eq!(engine.surface(id).and_then(MemorySurface::color), Some(settle));
    }
}

#![forbid(unsafe_code)]

//! Staggered orchestration: the same run on many targets, offset in time.
//!
//! A [`StaggerPlan`] pairs an ordered list of targets with start offsets.
//! [`run_plan`] hands each target to the engine, immediately for a zero
//! offset and as a delayed start otherwise, so the whole group shares one
//! scheduler and one clock.

use std::time::Duration;

use scramble_core::animation::stagger::{StaggerMode, shuffled_order, stagger_offsets};
use scramble_core::frame::FrameScheduler;
use scramble_core::rng::Xorshift64;

use crate::config::ScrambleConfig;
use crate::engine::{EngineJob, RunOutcome, ScrambleEngine};
use crate::hooks::{NoHooks, RunHooks};
use crate::surface::TextSurface;
use crate::target::TargetId;

/// Ordered targets plus one start offset per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaggerPlan {
    order: Vec<TargetId>,
    offsets: Vec<Duration>,
}

impl StaggerPlan {
    /// Targets in the given order, `i * stagger` apart.
    #[must_use]
    pub fn in_order(targets: impl IntoIterator<Item = TargetId>, stagger: Duration) -> Self {
        Self::with_mode(targets, stagger, StaggerMode::Linear)
    }

    /// Targets in the given order, offsets shaped by `mode`.
    #[must_use]
    pub fn with_mode(
        targets: impl IntoIterator<Item = TargetId>,
        stagger: Duration,
        mode: StaggerMode,
    ) -> Self {
        let order: Vec<TargetId> = targets.into_iter().collect();
        let offsets = stagger_offsets(order.len(), stagger, mode);
        Self { order, offsets }
    }

    /// Targets in a random order, `i * stagger` apart.
    #[must_use]
    pub fn shuffled(targets: &[TargetId], stagger: Duration, rng: &mut Xorshift64) -> Self {
        let order = shuffled_order(targets.len(), rng)
            .into_iter()
            .map(|i| targets[i]);
        Self::in_order(order, stagger)
    }

    /// Same offsets, targets in reverse order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            order: self.order.iter().rev().copied().collect(),
            offsets: self.offsets.clone(),
        }
    }

    #[must_use]
    pub fn order(&self) -> &[TargetId] {
        &self.order
    }

    #[must_use]
    pub fn offsets(&self) -> &[Duration] {
        &self.offsets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Offset of the last start.
    #[must_use]
    pub fn span(&self) -> Duration {
        self.offsets.last().copied().unwrap_or(Duration::ZERO)
    }

    /// `(target, offset)` pairs in start order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, Duration)> + '_ {
        self.order.iter().copied().zip(self.offsets.iter().copied())
    }
}

/// Run `config` on `targets` in order, `i * stagger` apart.
pub fn run_staggered<S, Q>(
    engine: &mut ScrambleEngine<S, Q>,
    targets: &[TargetId],
    config: &ScrambleConfig,
    stagger: Duration,
    now: Duration,
) -> Vec<RunOutcome>
where
    S: TextSurface,
    Q: FrameScheduler<EngineJob>,
{
    let plan = StaggerPlan::in_order(targets.iter().copied(), stagger);
    run_plan(engine, &plan, config, now)
}

/// Run `config` on every target of `plan`, without hooks.
pub fn run_plan<S, Q>(
    engine: &mut ScrambleEngine<S, Q>,
    plan: &StaggerPlan,
    config: &ScrambleConfig,
    now: Duration,
) -> Vec<RunOutcome>
where
    S: TextSurface,
    Q: FrameScheduler<EngineJob>,
{
    run_plan_with(engine, plan, config, |_, _| Box::new(NoHooks), now)
}

/// Run `config` on every target of `plan`. `hooks` builds the hooks for the
/// run at each plan position.
pub fn run_plan_with<S, Q, F>(
    engine: &mut ScrambleEngine<S, Q>,
    plan: &StaggerPlan,
    config: &ScrambleConfig,
    mut hooks: F,
    now: Duration,
) -> Vec<RunOutcome>
where
    S: TextSurface,
    Q: FrameScheduler<EngineJob>,
    F: FnMut(usize, TargetId) -> Box<dyn RunHooks>,
{
    tracing::debug!(
        targets = plan.len(),
        span_ms = plan.span().as_millis() as u64,
        "staggered scramble"
    );
    plan.iter()
        .enumerate()
        .map(|(i, (id, offset))| engine.schedule_start(id, offset, config, hooks(i, id), now))
        .collect()
}

/// Remembers the last shuffled order for exactly one reverse animation.
///
/// The hero letters shuffle in on enter and leave in the mirrored order; a
/// second leave without a new shuffle falls back to the caller's default.
#[derive(Debug, Clone, Default)]
pub struct ShuffleMemory {
    last: Option<StaggerPlan>,
}

impl ShuffleMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffle `targets` and remember the result.
    pub fn shuffle(&mut self, targets: &[TargetId], stagger: Duration, rng: &mut Xorshift64) -> StaggerPlan {
        let plan = StaggerPlan::shuffled(targets, stagger, rng);
        self.last = Some(plan.clone());
        plan
    }

    /// The reverse of the last shuffle, once.
    pub fn reverse_of_last(&mut self) -> Option<StaggerPlan> {
        self.last.take().map(|plan| plan.reversed())
    }

    /// Whether a shuffle is remembered.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.last.is_some()
    }

    pub fn forget(&mut self) {
        self.last = None;
    }
}

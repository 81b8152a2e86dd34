#![forbid(unsafe_code)]

//! View/hover replay: a small state machine per target.
//!
//! ```text
//!            enter / hover-start
//!   Idle ───────────────────────────▶ Active ──complete──▶ Completed
//!                                       ▲  │                   │
//!               enter / hover-start     │  │ leave             │ leave
//!   Reset ──────────────────────────────┘  ▼                   ▼
//!     ▲────────────────────────────────  Reset ◀───────────────┘
//! ```
//!
//! Leaving (view or hover) only resets a repeatable machine; for a play-once
//! machine `Completed` is absorbing and only the first enter from `Idle`
//! starts anything. While the pointer hovers a machine with a hover config,
//! every completion of its run immediately starts the hover run again, until
//! `HoverEnd` arrives.
//!
//! With a hover exit configured, `HoverEnd` plays the exit run instead of
//! resetting, and the exit's completion plays the settle run that brings the
//! target back to its text. A `HoverStart` during either stage resumes the
//! hover loop.
//!
//! A delayed start is adopted only through the [`StartTicket`] its
//! `Started` event carries. When another caller preempts the machine's run,
//! the machine falls back to `Reset` (or `Idle` if play-once).
//!
//! Machines never hold a reference to the engine. Hosts feed signals with
//! [`TriggerMachine::handle`] and completion events with
//! [`TriggerMachine::observe`], or let a [`TriggerSet`] do both.

use std::time::Duration;

use scramble_core::animation::stagger::{StaggerMode, stagger_offsets};
use scramble_core::frame::FrameScheduler;

use crate::config::ScrambleConfig;
use crate::engine::{EngineJob, EventKind, RunOutcome, ScrambleEngine, ScrambleEvent, StartTicket};
use crate::error::SkipReason;
use crate::hooks::NoHooks;
use crate::surface::TextSurface;
use crate::target::{Generation, TargetId};

/// Visibility and pointer signals from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Scrolled into view going forward.
    EnterView,
    /// Scrolled back into view from below.
    EnterViewReturning,
    /// Scrolled out of view going forward.
    LeaveView,
    /// Scrolled out of view going backward.
    LeaveViewReturning,
    HoverStart,
    HoverEnd,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::EnterView,
        Signal::EnterViewReturning,
        Signal::LeaveView,
        Signal::LeaveViewReturning,
        Signal::HoverStart,
        Signal::HoverEnd,
    ];

    #[must_use]
    pub const fn is_enter(self) -> bool {
        matches!(self, Self::EnterView | Self::EnterViewReturning | Self::HoverStart)
    }

    #[must_use]
    pub const fn is_leave(self) -> bool {
        !self.is_enter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Active,
    Completed,
    Reset,
}

/// Runs a machine starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerConfig {
    /// Run started on enter. Its `play_once` decides whether the machine is
    /// repeatable.
    pub enter: ScrambleConfig,
    /// Run looped while hovered. Always repeatable. `None` makes hover-start
    /// behave like enter.
    pub hover: Option<ScrambleConfig>,
    /// Run played on hover-end. `None` resets the target instead.
    pub hover_exit: Option<ScrambleConfig>,
    /// Run played once the hover exit completes.
    pub hover_settle: Option<ScrambleConfig>,
}

impl TriggerConfig {
    #[must_use]
    pub fn new(enter: ScrambleConfig) -> Self {
        Self {
            enter,
            hover: None,
            hover_exit: None,
            hover_settle: None,
        }
    }

    #[must_use]
    pub fn with_hover(mut self, hover: ScrambleConfig) -> Self {
        self.hover = Some(hover);
        self
    }

    /// Play `exit` then `settle` when the pointer leaves.
    #[must_use]
    pub fn with_hover_exit(mut self, exit: ScrambleConfig, settle: ScrambleConfig) -> Self {
        self.hover_exit = Some(exit);
        self.hover_settle = Some(settle);
        self
    }
}

/// Stage of the hover exit chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStage {
    Scramble,
    Settle,
}

/// Replay state for one target.
#[derive(Debug, Clone)]
pub struct TriggerMachine {
    target: TargetId,
    config: TriggerConfig,
    state: TriggerState,
    hovering: bool,
    /// Generation of the run this machine started, once known.
    run: Option<Generation>,
    /// Pending delayed start whose `Started` event makes it ours.
    awaiting: Option<StartTicket>,
    exit: Option<ExitStage>,
}

impl TriggerMachine {
    #[must_use]
    pub fn new(target: TargetId, config: TriggerConfig) -> Self {
        Self {
            target,
            config,
            state: TriggerState::Idle,
            hovering: false,
            run: None,
            awaiting: None,
            exit: None,
        }
    }

    #[must_use]
    pub fn target(&self) -> TargetId {
        self.target
    }

    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.state
    }

    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Hover exit stage in flight, if any.
    #[must_use]
    pub fn exit_stage(&self) -> Option<ExitStage> {
        self.exit
    }

    #[must_use]
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Whether leaving resets the target.
    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        !self.config.enter.play_once
    }

    fn can_start(&self) -> bool {
        match self.state {
            TriggerState::Idle => true,
            TriggerState::Reset | TriggerState::Completed => self.is_repeatable(),
            TriggerState::Active => false,
        }
    }

    fn hover_config(&self) -> ScrambleConfig {
        match &self.config.hover {
            Some(hover) => hover.clone().play_once(false),
            None => self.config.enter.clone(),
        }
    }

    /// Feed a signal, starting immediately.
    pub fn handle<S, Q>(
        &mut self,
        signal: Signal,
        engine: &mut ScrambleEngine<S, Q>,
        now: Duration,
    ) -> Option<RunOutcome>
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        self.handle_delayed(signal, Duration::ZERO, engine, now)
    }

    /// Feed a signal; a run it starts begins after `delay`. Leaves are
    /// always immediate. Returns the outcome when a run was requested.
    pub fn handle_delayed<S, Q>(
        &mut self,
        signal: Signal,
        delay: Duration,
        engine: &mut ScrambleEngine<S, Q>,
        now: Duration,
    ) -> Option<RunOutcome>
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        let before = self.state;
        let outcome = match signal {
            Signal::EnterView | Signal::EnterViewReturning => {
                if self.can_start() {
                    let config = self.config.enter.clone();
                    Some(self.start(&config, delay, engine, now))
                } else {
                    None
                }
            }
            Signal::HoverStart => {
                self.hovering = true;
                if self.can_start() || self.exit.is_some() {
                    let config = self.hover_config();
                    Some(self.start(&config, delay, engine, now))
                } else {
                    None
                }
            }
            Signal::HoverEnd if !self.hovering => None,
            Signal::LeaveView | Signal::LeaveViewReturning | Signal::HoverEnd => {
                let leaving_hover = signal == Signal::HoverEnd;
                if leaving_hover {
                    self.hovering = false;
                }
                if self.is_repeatable()
                    && matches!(self.state, TriggerState::Active | TriggerState::Completed)
                {
                    let exit = if leaving_hover {
                        self.start_exit(ExitStage::Scramble, engine, now)
                    } else {
                        None
                    };
                    if exit.is_none() {
                        engine.reset(self.target);
                        self.state = TriggerState::Reset;
                        self.run = None;
                        self.awaiting = None;
                        self.exit = None;
                    }
                    exit
                } else {
                    None
                }
            }
        };
        tracing::debug!(
            target_id = self.target.index(),
            ?signal,
            from = ?before,
            to = ?self.state,
            "trigger signal"
        );
        outcome
    }

    fn start<S, Q>(
        &mut self,
        config: &ScrambleConfig,
        delay: Duration,
        engine: &mut ScrambleEngine<S, Q>,
        now: Duration,
    ) -> RunOutcome
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        let outcome = engine.schedule_start(self.target, delay, config, Box::new(NoHooks), now);
        self.exit = None;
        match outcome {
            RunOutcome::Started(generation) => {
                self.run = Some(generation);
                self.awaiting = None;
                self.state = TriggerState::Active;
            }
            RunOutcome::Deferred { ticket, .. } => {
                self.run = None;
                self.awaiting = Some(ticket);
                self.state = TriggerState::Active;
            }
            RunOutcome::Skipped(SkipReason::AlreadyCompleted) => {
                self.state = TriggerState::Completed;
            }
            RunOutcome::Skipped(_) => {}
        }
        outcome
    }

    /// Start one stage of the hover exit chain. `None` when the stage is not
    /// configured or the engine declined it.
    fn start_exit<S, Q>(
        &mut self,
        stage: ExitStage,
        engine: &mut ScrambleEngine<S, Q>,
        now: Duration,
    ) -> Option<RunOutcome>
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        let config = match stage {
            ExitStage::Scramble => self.config.hover_exit.as_ref(),
            ExitStage::Settle => self.config.hover_settle.as_ref(),
        }?
        .clone()
        .play_once(false);
        if self.awaiting.take().is_some() {
            engine.cancel(self.target);
        }
        let outcome = engine.start_run(self.target, &config, now);
        let generation = outcome.generation()?;
        tracing::trace!(target_id = self.target.index(), ?stage, "hover exit stage started");
        self.run = Some(generation);
        self.awaiting = None;
        self.exit = Some(stage);
        self.state = TriggerState::Active;
        Some(outcome)
    }

    /// Feed an engine event. Events for other targets are ignored.
    pub fn observe<S, Q>(&mut self, event: &ScrambleEvent, engine: &mut ScrambleEngine<S, Q>, now: Duration)
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        if event.target != self.target {
            return;
        }
        match event.kind {
            EventKind::Started if self.awaiting.is_some() && event.ticket == self.awaiting => {
                self.run = Some(event.generation);
                self.awaiting = None;
            }
            EventKind::Cancelled if self.run == Some(event.generation) => {
                tracing::debug!(target_id = self.target.index(), "trigger run preempted");
                self.run = None;
                self.exit = None;
                self.state = if self.is_repeatable() {
                    TriggerState::Reset
                } else {
                    TriggerState::Idle
                };
            }
            EventKind::Completed if self.run == Some(event.generation) => {
                self.run = None;
                match self.exit.take() {
                    Some(ExitStage::Scramble) => {
                        if self.start_exit(ExitStage::Settle, engine, now).is_none() {
                            self.state = TriggerState::Completed;
                        }
                        return;
                    }
                    Some(ExitStage::Settle) => {
                        self.state = TriggerState::Completed;
                        return;
                    }
                    None => {}
                }
                if self.hovering && self.config.hover.is_some() && self.state == TriggerState::Active {
                    let config = self.hover_config();
                    if let RunOutcome::Started(generation) = engine.start_run(self.target, &config, now) {
                        tracing::trace!(target_id = self.target.index(), "hover loop restarted");
                        self.run = Some(generation);
                        return;
                    }
                }
                self.state = TriggerState::Completed;
            }
            _ => {}
        }
    }
}

/// Several machines sharing one engine.
#[derive(Debug, Clone, Default)]
pub struct TriggerSet {
    machines: Vec<TriggerMachine>,
    stagger: Duration,
}

impl TriggerSet {
    /// Broadcast enters are staggered by `stagger` in push order.
    #[must_use]
    pub fn new(stagger: Duration) -> Self {
        Self {
            machines: Vec::new(),
            stagger,
        }
    }

    /// Add a machine; returns its position.
    pub fn push(&mut self, machine: TriggerMachine) -> usize {
        self.machines.push(machine);
        self.machines.len() - 1
    }

    #[must_use]
    pub fn machines(&self) -> &[TriggerMachine] {
        &self.machines
    }

    /// First machine driving `target`.
    #[must_use]
    pub fn machine(&self, target: TargetId) -> Option<&TriggerMachine> {
        self.machines.iter().find(|m| m.target == target)
    }

    /// Route `signal` to every machine driving `target`.
    pub fn signal<S, Q>(
        &mut self,
        target: TargetId,
        signal: Signal,
        engine: &mut ScrambleEngine<S, Q>,
        now: Duration,
    ) -> Vec<RunOutcome>
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        self.machines
            .iter_mut()
            .filter(|m| m.target == target)
            .filter_map(|m| m.handle(signal, engine, now))
            .collect()
    }

    /// Send `signal` to every machine. Enters are staggered; leaves are not.
    pub fn broadcast<S, Q>(
        &mut self,
        signal: Signal,
        engine: &mut ScrambleEngine<S, Q>,
        now: Duration,
    ) -> Vec<RunOutcome>
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        let delays = if signal.is_enter() {
            stagger_offsets(self.machines.len(), self.stagger, StaggerMode::Linear)
        } else {
            vec![Duration::ZERO; self.machines.len()]
        };
        self.machines
            .iter_mut()
            .zip(delays)
            .filter_map(|(m, delay)| m.handle_delayed(signal, delay, engine, now))
            .collect()
    }

    /// Advance the engine, route its events into the machines and return them.
    pub fn pump<S, Q>(&mut self, engine: &mut ScrambleEngine<S, Q>, now: Duration) -> Vec<ScrambleEvent>
    where
        S: TextSurface,
        Q: FrameScheduler<EngineJob>,
    {
        engine.advance(now);
        let events = engine.drain_events();
        for event in &events {
            for machine in self.machines.iter_mut().filter(|m| m.target == event.target) {
                machine.observe(event, engine, now);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn quick(play_once: bool) -> ScrambleConfig {
        ScrambleConfig::new()
            .duration(ms(50))
            .refresh_interval(Duration::ZERO)
            .play_once(play_once)
    }

    fn pump_until_idle(set: &mut TriggerSet, engine: &mut ScrambleEngine<MemorySurface>, mut now: Duration) -> Duration {
        for _ in 0..1000 {
            if !engine.is_busy() {
                break;
            }
            set.pump(engine, now);
            now += ms(10);
        }
        now
    }

    #[test]
    fn signal_classification() {
        let enters: Vec<Signal> = Signal::ALL.into_iter().filter(|s| s.is_enter()).collect();
        assert_eq!(enters, [Signal::EnterView, Signal::EnterViewReturning, Signal::HoverStart]);
    }

    #[test]
    fn play_once_machine_is_absorbing() {
        let mut engine = ScrambleEngine::seeded(1);
        let id = engine.add_target(MemorySurface::new("ONCE"));
        let mut set = TriggerSet::new(Duration::ZERO);
        set.push(TriggerMachine::new(id, TriggerConfig::new(quick(true))));

        assert_eq!(set.signal(id, Signal::EnterView, &mut engine, ms(0)).len(), 1);
        let now = pump_until_idle(&mut set, &mut engine, ms(0));
        assert_eq!(set.machine(id).map(TriggerMachine::state), Some(TriggerState::Completed));

        assert!(set.signal(id, Signal::LeaveView, &mut engine, now).is_empty());
        assert!(set.signal(id, Signal::EnterViewReturning, &mut engine, now).is_empty());
        assert_eq!(set.machine(id).map(TriggerMachine::state), Some(TriggerState::Completed));
        assert!(!engine.is_busy());
    }

    #[test]
    fn repeatable_machine_resets_and_replays() {
        let mut engine = ScrambleEngine::seeded(2);
        let id = engine.add_target(MemorySurface::new("AGAIN"));
        let mut set = TriggerSet::new(Duration::ZERO);
        set.push(TriggerMachine::new(id, TriggerConfig::new(quick(false))));

        let _ = set.signal(id, Signal::EnterView, &mut engine, ms(0));
        set.pump(&mut engine, ms(0));
        let _ = set.signal(id, Signal::LeaveView, &mut engine, ms(10));
        assert_eq!(set.machine(id).map(TriggerMachine::state), Some(TriggerState::Reset));
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("AGAIN"));
        assert!(!engine.is_running(id));

        let outcomes = set.signal(id, Signal::EnterViewReturning, &mut engine, ms(20));
        assert!(matches!(outcomes[..], [RunOutcome::Started(_)]));
        assert_eq!(set.machine(id).map(TriggerMachine::state), Some(TriggerState::Active));
    }

    #[test]
    fn hover_loops_until_hover_end() {
        let mut engine = ScrambleEngine::seeded(3);
        let id = engine.add_target(MemorySurface::new("H"));
        let config = TriggerConfig::new(quick(false)).with_hover(quick(true).duration(ms(30)));
        let mut set = TriggerSet::new(Duration::ZERO);
        set.push(TriggerMachine::new(id, config));

        let _ = set.signal(id, Signal::HoverStart, &mut engine, ms(0));
        let mut completions = 0;
        let mut now = ms(0);
        while now < ms(300) {
            completions += set
                .pump(&mut engine, now)
                .iter()
                .filter(|e| e.kind == EventKind::Completed)
                .count();
            now += ms(10);
        }
        assert!(completions >= 3, "hover run completed {completions} times");
        assert!(engine.is_running(id));

        let _ = set.signal(id, Signal::HoverEnd, &mut engine, now);
        assert!(!engine.is_running(id));
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("H"));
        assert!(!set.machine(id).is_some_and(TriggerMachine::is_hovering));
    }

    #[test]
    fn broadcast_staggers_enters() {
        let mut engine = ScrambleEngine::seeded(4);
        let mut set = TriggerSet::new(ms(60));
        for word in ["M", "E", "D"] {
            let id = engine.add_target(MemorySurface::new(word));
            set.push(TriggerMachine::new(id, TriggerConfig::new(quick(false))));
        }
        let outcomes = set.broadcast(Signal::EnterView, &mut engine, ms(0));
        assert!(matches!(outcomes[0], RunOutcome::Started(_)));
        assert_eq!(outcomes[2].due(), Some(ms(120)));
    }

    #[test]
    fn leave_cancels_pending_staggered_start() {
        let mut engine = ScrambleEngine::seeded(5);
        let mut set = TriggerSet::new(ms(60));
        let ids: Vec<TargetId> = ["A", "B"]
            .into_iter()
            .map(|w| engine.add_target(MemorySurface::new(w)))
            .collect();
        for &id in &ids {
            set.push(TriggerMachine::new(id, TriggerConfig::new(quick(false))));
        }
        let _ = set.broadcast(Signal::EnterView, &mut engine, ms(0));
        let _ = set.broadcast(Signal::LeaveView, &mut engine, ms(10));
        set.pump(&mut engine, ms(100));
        assert!(!engine.is_running(ids[1]));
        assert_eq!(set.machine(ids[1]).map(TriggerMachine::state), Some(TriggerState::Reset));
    }

    #[test]
    fn deferred_run_is_adopted_on_start() {
        let mut engine = ScrambleEngine::seeded(6);
        let id = engine.add_target(MemorySurface::new("LATE"));
        let mut machine = TriggerMachine::new(id, TriggerConfig::new(quick(false)));
        let outcome = machine.handle_delayed(Signal::EnterView, ms(40), &mut engine, ms(0));
        assert_eq!(outcome.and_then(RunOutcome::due), Some(ms(40)));

        let mut now = ms(0);
        while machine.state() != TriggerState::Completed && now < ms(500) {
            engine.advance(now);
            for event in engine.drain_events() {
                machine.observe(&event, &mut engine, now);
            }
            now += ms(10);
        }
        assert_eq!(machine.state(), TriggerState::Completed);
    }

    fn drive(machine: &mut TriggerMachine, engine: &mut ScrambleEngine<MemorySurface>, now: Duration) {
        engine.advance(now);
        for event in engine.drain_events() {
            machine.observe(&event, engine, now);
        }
    }

    fn with_exit() -> TriggerConfig {
        TriggerConfig::new(quick(false))
            .with_hover(quick(true).duration(ms(30)))
            .with_hover_exit(
                quick(false).duration(ms(40)).alphabet("#").target(crate::config::TargetText::RandomGlyph),
                quick(false).duration(ms(20)).scramble_ratio(0.0),
            )
    }

    #[test]
    fn hover_end_plays_exit_then_settle() {
        let mut engine = ScrambleEngine::seeded(7);
        let id = engine.add_target(MemorySurface::new("H"));
        let mut set = TriggerSet::new(Duration::ZERO);
        set.push(TriggerMachine::new(id, with_exit()));

        let _ = set.signal(id, Signal::HoverStart, &mut engine, ms(0));
        set.pump(&mut engine, ms(0));
        set.pump(&mut engine, ms(10));

        let outcomes = set.signal(id, Signal::HoverEnd, &mut engine, ms(20));
        assert!(matches!(outcomes[..], [RunOutcome::Started(_)]));
        let stage = |set: &TriggerSet| set.machine(id).and_then(TriggerMachine::exit_stage);
        assert_eq!(stage(&set), Some(ExitStage::Scramble));
        assert!(engine.is_running(id));

        let mut now = ms(20);
        while stage(&set) == Some(ExitStage::Scramble) && now < ms(500) {
            set.pump(&mut engine, now);
            now += ms(10);
        }
        assert_eq!(stage(&set), Some(ExitStage::Settle));
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("#"));

        pump_until_idle(&mut set, &mut engine, now);
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("H"));
        assert_eq!(stage(&set), None);
        assert_eq!(set.machine(id).map(TriggerMachine::state), Some(TriggerState::Completed));
    }

    #[test]
    fn hover_start_during_exit_resumes_loop() {
        let mut engine = ScrambleEngine::seeded(8);
        let id = engine.add_target(MemorySurface::new("H"));
        let mut set = TriggerSet::new(Duration::ZERO);
        set.push(TriggerMachine::new(id, with_exit()));

        let _ = set.signal(id, Signal::HoverStart, &mut engine, ms(0));
        set.pump(&mut engine, ms(0));
        let _ = set.signal(id, Signal::HoverEnd, &mut engine, ms(10));
        set.pump(&mut engine, ms(10));

        let outcomes = set.signal(id, Signal::HoverStart, &mut engine, ms(20));
        assert!(matches!(outcomes[..], [RunOutcome::Started(_)]));
        let machine = set.machine(id);
        assert_eq!(machine.and_then(TriggerMachine::exit_stage), None);
        assert!(machine.is_some_and(TriggerMachine::is_hovering));

        let mut now = ms(20);
        while now < ms(200) {
            set.pump(&mut engine, now);
            now += ms(10);
        }
        assert!(engine.is_running(id));
        assert_eq!(set.machine(id).and_then(TriggerMachine::exit_stage), None);
    }

    #[test]
    fn foreign_start_is_not_adopted_while_awaiting() {
        let mut engine = ScrambleEngine::seeded(9);
        let id = engine.add_target(MemorySurface::new("LATE"));
        let mut machine = TriggerMachine::new(id, TriggerConfig::new(quick(false)));
        let _ = machine.handle_delayed(Signal::EnterView, ms(100), &mut engine, ms(0));

        let foreign = quick(false).duration(ms(20)).target(crate::config::TargetText::Fixed("XX".into()));
        let _ = engine.start_run(id, &foreign, ms(0));
        let mut now = ms(0);
        while now < ms(60) {
            drive(&mut machine, &mut engine, now);
            now += ms(10);
        }
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("XX"));
        assert_eq!(machine.state(), TriggerState::Active);

        while machine.state() != TriggerState::Completed && now < ms(500) {
            drive(&mut machine, &mut engine, now);
            now += ms(10);
        }
        assert_eq!(machine.state(), TriggerState::Completed);
        assert_eq!(engine.surface(id).map(MemorySurface::text), Some("LATE"));
    }

    #[test]
    fn foreign_preemption_frees_the_machine() {
        let mut engine = ScrambleEngine::seeded(10);
        let id = engine.add_target(MemorySurface::new("FREE"));
        let mut machine = TriggerMachine::new(id, TriggerConfig::new(quick(false)));
        let _ = machine.handle(Signal::EnterView, &mut engine, ms(0));
        drive(&mut machine, &mut engine, ms(0));

        let _ = engine.start_run(id, &quick(false), ms(10));
        drive(&mut machine, &mut engine, ms(10));
        assert_eq!(machine.state(), TriggerState::Reset);
        let again = machine.handle(Signal::EnterViewReturning, &mut engine, ms(20));
        assert!(matches!(again, Some(RunOutcome::Started(_))));

        let mut once = TriggerMachine::new(id, TriggerConfig::new(quick(true)));
        let _ = once.handle(Signal::EnterView, &mut engine, ms(30));
        drive(&mut once, &mut engine, ms(30));
        let _ = engine.start_run(id, &quick(false), ms(40));
        drive(&mut once, &mut engine, ms(40));
        assert_eq!(once.state(), TriggerState::Idle);
    }
}

//! The fade event loop
//!
//! [`Animator`] owns the style tree, a virtual clock with its timer queue,
//! and every live [`FadeRun`]. Starting a fade only schedules timers; all
//! style mutation happens inside [`Animator::advance`], one timer at a time,
//! on the caller's thread.
//!
//! Runs on the same element are not coordinated. Two overlapping fades both
//! write opacity on their own ticks and the later write wins.

use fader_core::{Document, ElementId, FadeError, PhaseEvent, RunPhase, StyleTree, Target};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::SlotMap;

use crate::config::{FadeConfig, MissingTargetPolicy};
use crate::direction::Drift;
use crate::handle::FadeHandle;
use crate::run::{Callback, Continuation, FadeKind, FadeRun, RunId};
use crate::timer::TimerQueue;

/// Outcome of starting a fade
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FadeStart {
    /// A run was scheduled; the callback fires when it completes
    Running(RunId),
    /// The element was already in the requested state; the callback has fired
    Settled,
    /// The target did not resolve; reported, nothing scheduled
    Rejected(FadeError),
}

impl FadeStart {
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            FadeStart::Running(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, FadeStart::Running(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, FadeStart::Rejected(_))
    }
}

enum Readiness {
    Ready(ElementId),
    Settled,
    Missing(FadeError),
}

/// Single-threaded driver for fade runs
pub struct Animator<T: StyleTree = Document> {
    tree: T,
    timers: TimerQueue<RunId>,
    runs: SlotMap<RunId, FadeRun>,
    deferred: FadeHandle,
    rng: StdRng,
}

impl<T: StyleTree> Animator<T> {
    /// Create an animator with an entropy-seeded drift generator
    pub fn new(tree: T) -> Self {
        Self::with_rng(tree, StdRng::from_entropy())
    }

    /// Create an animator whose random drift is reproducible
    pub fn with_seed(tree: T, seed: u64) -> Self {
        Self::with_rng(tree, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tree: T, rng: StdRng) -> Self {
        Self {
            tree,
            timers: TimerQueue::new(),
            runs: SlotMap::with_key(),
            deferred: FadeHandle::default(),
            rng,
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn into_tree(self) -> T {
        self.tree
    }

    /// Queue for starting fades from inside completion callbacks
    pub fn handle(&self) -> FadeHandle {
        self.deferred.clone()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Deadline of the next scheduled wait or tick
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// No run is waiting or ramping and nothing is queued
    pub fn is_idle(&self) -> bool {
        self.runs.is_empty() && self.deferred.pending() == 0
    }

    /// Get the number of live runs
    pub fn active_runs(&self) -> usize {
        self.runs.len()
    }

    /// Phase of a run; runs that have finished or been cancelled are `Done`
    pub fn phase(&self, run: RunId) -> RunPhase {
        self.runs
            .get(run)
            .map(|r| r.phase.current())
            .unwrap_or(RunPhase::Done)
    }

    /// Stop a run where it is, without calling its callback
    ///
    /// Styles are left exactly as the last tick wrote them. Returns `false`
    /// if the run had already finished.
    pub fn cancel(&mut self, run: RunId) -> bool {
        let Some(mut run) = self.runs.remove(run) else {
            return false;
        };
        if let Some(timer) = run.timer.take() {
            self.timers.cancel(timer);
        }
        run.phase.send(PhaseEvent::Cancel);
        tracing::debug!("{} on {} cancelled after {} ticks", run.kind, run.target, run.ticks);
        true
    }

    /// Advance the clock by `ms`, firing every timer that falls due
    pub fn advance(&mut self, ms: u64) {
        self.advance_to(self.now_ms() + ms);
    }

    /// Advance the clock to an absolute time
    pub fn advance_to(&mut self, until: u64) {
        self.start_deferred();
        while let Some((_, run)) = self.timers.pop_due(until) {
            self.fire(run);
        }
        self.timers.settle(until);
    }

    /// Advance until nothing is scheduled, or `limit_ms` has elapsed
    ///
    /// Returns the time that passed.
    pub fn run_until_idle(&mut self, limit_ms: u64) -> u64 {
        self.start_deferred();
        let start = self.now_ms();
        let limit = start + limit_ms;
        while let Some(deadline) = self.timers.next_deadline() {
            if deadline > limit {
                break;
            }
            self.advance_to(deadline);
        }
        self.now_ms() - start
    }

    /// Start a fade run
    ///
    /// With `check_first` unset and a wait configured, the target is only
    /// resolved once the wait is over.
    pub(crate) fn start(
        &mut self,
        kind: FadeKind,
        target: Target,
        config: FadeConfig,
        then: Continuation,
        check_first: bool,
    ) -> FadeStart {
        let drift = match kind {
            FadeKind::Out => Drift::resolve(&config, &mut self.rng),
            FadeKind::In => Drift::default(),
        };
        let mut run = FadeRun::new(kind, target, config, drift, then);

        if check_first || run.config.wait_ms.is_none() {
            match self.readiness(&run) {
                Readiness::Missing(err) => {
                    self.reject(run, &err);
                    return FadeStart::Rejected(err);
                }
                Readiness::Settled => {
                    tracing::debug!("{} on {} already settled", run.kind, run.target);
                    self.resume(run.then.take());
                    return FadeStart::Settled;
                }
                Readiness::Ready(element) => run.element = Some(element),
            }
        }

        let wait = run.config.wait_ms;
        let id = self.runs.insert(run);
        match wait {
            Some(wait_ms) => {
                let timer = self.timers.once(wait_ms, id);
                if let Some(run) = self.runs.get_mut(id) {
                    run.phase.send(PhaseEvent::Delay);
                    run.timer = Some(timer);
                    tracing::debug!("{} on {} waiting {}ms", run.kind, run.target, wait_ms);
                }
            }
            None => self.begin_ramp(id),
        }

        FadeStart::Running(id)
    }

    fn readiness(&self, run: &FadeRun) -> Readiness {
        let element = match self.tree.resolve(&run.target) {
            Ok(element) => element,
            Err(err) => return Readiness::Missing(err),
        };
        match self.tree.style(element) {
            Some(style) if run.is_settled(style) => Readiness::Settled,
            Some(_) => Readiness::Ready(element),
            None => Readiness::Missing(FadeError::StaleElement(element)),
        }
    }

    fn reject(&mut self, mut run: FadeRun, err: &FadeError) {
        tracing::warn!("{} error: {}", run.kind, err);
        if run.config.missing_target == MissingTargetPolicy::Complete {
            self.resume(run.then.take());
        }
    }

    fn resume(&mut self, then: Option<Continuation>) {
        match then {
            Some(Continuation::Callback(callback)) => {
                callback();
                self.start_deferred();
            }
            Some(Continuation::FadeIn {
                target,
                config,
                then,
            }) => {
                let _ = self.start(
                    FadeKind::In,
                    target,
                    config,
                    Continuation::Callback(then),
                    true,
                );
            }
            None => {}
        }
    }

    /// Start everything queued through a [`FadeHandle`]
    fn start_deferred(&mut self) {
        while let Some(pending) = self.deferred.pop() {
            let _ = self.start(
                pending.kind,
                pending.target,
                pending.config,
                pending.then,
                pending.check_first,
            );
        }
    }

    fn fire(&mut self, id: RunId) {
        match self.phase(id) {
            RunPhase::Waiting => self.wake(id),
            RunPhase::Ramping => self.tick(id),
            RunPhase::Idle | RunPhase::Done => {}
        }
    }

    /// The one-shot wait fired: check the target again, then ramp
    fn wake(&mut self, id: RunId) {
        let readiness = match self.runs.get(id) {
            Some(run) => self.readiness(run),
            None => return,
        };

        match readiness {
            Readiness::Ready(element) => {
                if let Some(run) = self.runs.get_mut(id) {
                    run.timer = None;
                    run.element = Some(element);
                }
                self.begin_ramp(id);
            }
            Readiness::Settled => {
                if let Some(mut run) = self.runs.remove(id) {
                    run.phase.send(PhaseEvent::Finish);
                    tracing::debug!("{} on {} already settled", run.kind, run.target);
                    self.resume(run.then.take());
                }
            }
            Readiness::Missing(err) => {
                if let Some(mut run) = self.runs.remove(id) {
                    run.phase.send(PhaseEvent::Cancel);
                    self.reject(run, &err);
                }
            }
        }
    }

    fn begin_ramp(&mut self, id: RunId) {
        let Some(run) = self.runs.get_mut(id) else {
            return;
        };

        if let Some(style) = run.element.and_then(|element| self.tree.style_mut(element)) {
            match run.kind {
                FadeKind::Out => style.opacity = 1.0,
                FadeKind::In => {
                    style.opacity = 0.0;
                    run.config.strategy.show(style, &run.config.display);
                }
            }
        }

        let event = if run.phase.is_in(RunPhase::Waiting) {
            PhaseEvent::Elapsed
        } else {
            PhaseEvent::Start
        };
        run.phase.send(event);
        run.timer = Some(self.timers.every(run.config.tick_ms, id));

        tracing::debug!(
            "{} on {} ramping over {}ms in {}ms ticks",
            run.kind,
            run.target,
            run.config.fade_ms,
            run.config.tick_ms
        );
    }

    fn tick(&mut self, id: RunId) {
        let Some(run) = self.runs.get_mut(id) else {
            return;
        };
        let Some(style) = run.element.and_then(|element| self.tree.style_mut(element)) else {
            tracing::warn!("{} error: {} left the tree mid-fade", run.kind, run.target);
            self.cancel(id);
            return;
        };

        if !run.crossed() {
            run.ticks += 1;
            style.opacity = run.opacity();
            run.drift.apply(style);
            tracing::trace!("{} on {} tick {} opacity {}", run.kind, run.target, run.ticks, style.opacity);
            return;
        }

        if let Some(timer) = run.timer.take() {
            self.timers.cancel(timer);
        }
        if run.kind == FadeKind::Out {
            run.config.strategy.hide(style);
            if run.config.has_drift() {
                style.reset_drift();
            }
        }
        run.phase.send(PhaseEvent::Finish);
        tracing::debug!("{} on {} done after {} ticks", run.kind, run.target, run.ticks);

        let then = run.then.take();
        self.runs.remove(id);
        self.resume(then);
    }
}

/// Box a caller's completion callback
pub(crate) fn boxed<F: FnOnce() + 'static>(callback: F) -> Callback {
    Box::new(callback)
}

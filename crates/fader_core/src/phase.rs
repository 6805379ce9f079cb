//! Run phase state machine
//!
//! Every fade run moves through the same flat state machine:
//!
//! ```text
//! Idle ──Start──▶ Ramping ──Finish──▶ Done
//!   │                ▲
//!   └─Delay─▶ Waiting ┘ (Elapsed)
//!
//! Waiting ──Finish──▶ Done            (already settled once the wait ends)
//! Waiting | Ramping ──Cancel──▶ Done
//! ```
//!
//! Events that have no transition from the current phase are ignored.

use smallvec::SmallVec;

/// Phase of a fade run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Created, nothing scheduled yet
    #[default]
    Idle,
    /// Sleeping through the one-shot wait delay
    Waiting,
    /// The repeating tick timer is running
    Ramping,
    /// Finished or cancelled
    Done,
}

/// Events that move a run between phases
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    /// Begin ramping immediately
    Start,
    /// Begin with a wait delay
    Delay,
    /// The wait delay fired
    Elapsed,
    /// The ramp crossed its threshold
    Finish,
    /// Stopped from outside
    Cancel,
}

struct Transition {
    from: RunPhase,
    event: PhaseEvent,
    to: RunPhase,
}

const fn t(from: RunPhase, event: PhaseEvent, to: RunPhase) -> Transition {
    Transition { from, event, to }
}

const TRANSITIONS: &[Transition] = &[
    t(RunPhase::Idle, PhaseEvent::Start, RunPhase::Ramping),
    t(RunPhase::Idle, PhaseEvent::Delay, RunPhase::Waiting),
    t(RunPhase::Waiting, PhaseEvent::Elapsed, RunPhase::Ramping),
    t(RunPhase::Waiting, PhaseEvent::Finish, RunPhase::Done),
    t(RunPhase::Waiting, PhaseEvent::Cancel, RunPhase::Done),
    t(RunPhase::Ramping, PhaseEvent::Finish, RunPhase::Done),
    t(RunPhase::Ramping, PhaseEvent::Cancel, RunPhase::Done),
];

/// Phase tracker for a single run
#[derive(Clone, Debug, Default)]
pub struct PhaseMachine {
    current: RunPhase,
    /// History of transitions (for debugging)
    history: SmallVec<[(RunPhase, PhaseEvent, RunPhase); 4]>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current phase
    pub fn current(&self) -> RunPhase {
        self.current
    }

    /// Check if we're in a specific phase
    pub fn is_in(&self, phase: RunPhase) -> bool {
        self.current == phase
    }

    pub fn is_done(&self) -> bool {
        self.current == RunPhase::Done
    }

    /// Check if an event can trigger a transition from the current phase
    pub fn can_send(&self, event: PhaseEvent) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the phase afterwards
    pub fn send(&mut self, event: PhaseEvent) -> RunPhase {
        let current = self.current;
        let Some(to) = self.find(event) else {
            return current;
        };

        self.current = to;
        self.history.push((current, event, to));
        to
    }

    /// Get transition history
    pub fn history(&self) -> &[(RunPhase, PhaseEvent, RunPhase)] {
        &self.history
    }

    fn find(&self, event: PhaseEvent) -> Option<RunPhase> {
        TRANSITIONS
            .iter()
            .find(|t| t.from == self.current && t.event == event)
            .map(|t| t.to)
    }
}

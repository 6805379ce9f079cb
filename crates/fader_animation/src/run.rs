//! A single in-flight fade

use std::fmt;

use fader_core::{ElementId, ElementStyle, PhaseMachine, Target};
use slotmap::new_key_type;

use crate::config::FadeConfig;
use crate::direction::Drift;
use crate::timer::TimerId;

new_key_type! {
    /// Handle to a fade run owned by an [`Animator`](crate::Animator)
    pub struct RunId;
}

/// Direction of the opacity ramp
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeKind {
    /// Opacity 0 → 1, element shown first
    In,
    /// Opacity 1 → 0, element hidden last
    Out,
}

impl fmt::Display for FadeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeKind::In => f.write_str("fadeIn"),
            FadeKind::Out => f.write_str("fadeOut"),
        }
    }
}

pub(crate) type Callback = Box<dyn FnOnce()>;

/// What happens once a run completes
pub(crate) enum Continuation {
    Callback(Callback),
    /// Second half of a replace
    FadeIn {
        target: Target,
        config: FadeConfig,
        then: Callback,
    },
}

pub(crate) struct FadeRun {
    pub kind: FadeKind,
    pub target: Target,
    pub config: FadeConfig,
    pub drift: Drift,
    /// Resolved when the ramp is about to start
    pub element: Option<ElementId>,
    pub ticks: u32,
    pub phase: PhaseMachine,
    pub timer: Option<TimerId>,
    pub then: Option<Continuation>,
}

impl FadeRun {
    pub fn new(
        kind: FadeKind,
        target: Target,
        config: FadeConfig,
        drift: Drift,
        then: Continuation,
    ) -> Self {
        Self {
            kind,
            target,
            config,
            drift,
            element: None,
            ticks: 0,
            phase: PhaseMachine::new(),
            timer: None,
            then: Some(then),
        }
    }

    /// Opacity the ramp has reached after `ticks` steps
    pub fn opacity(&self) -> f32 {
        let travelled = self.ticks as f32 * self.config.step();
        match self.kind {
            FadeKind::Out => 1.0 - travelled,
            FadeKind::In => travelled,
        }
    }

    /// The ramp has reached or passed its threshold
    pub fn crossed(&self) -> bool {
        match self.kind {
            FadeKind::Out => self.opacity() <= 0.0,
            FadeKind::In => self.opacity() >= 1.0,
        }
    }

    /// The element already sits in this run's end state
    pub fn is_settled(&self, style: &ElementStyle) -> bool {
        let hidden = self.config.strategy.is_hidden(style);
        match self.kind {
            FadeKind::Out => hidden,
            FadeKind::In => !hidden,
        }
    }
}

//! Drift directions for fading-out elements
//!
//! A fade-out can nudge its element sideways, vertically, or in scale on
//! every tick. `Random` axes are resolved once per run to one of the two
//! directions or to no drift at all, each with probability 1/3.

use fader_core::ElementStyle;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::FadeConfig;

/// Positional offset per tick, in pixels
pub const DRIFT_PX_PER_TICK: f32 = 1.0;

/// Scale change per tick
pub const ZOOM_PER_TICK: f32 = 0.005;

/// Horizontal drift
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionX {
    Left,
    Right,
    Random,
}

/// Vertical drift
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionY {
    Up,
    Down,
    Random,
}

/// Scale drift
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zoom {
    In,
    Out,
    Random,
}

/// Per-tick increments resolved for one run
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Drift {
    /// Added to `left` each tick
    pub dx: Option<f32>,
    /// Added to `top` each tick
    pub dy: Option<f32>,
    /// Added to the scale factor each tick
    pub dscale: Option<f32>,
}

impl Drift {
    /// Resolve the configured axes, rolling any `Random` ones
    pub fn resolve<R: Rng + ?Sized>(config: &FadeConfig, rng: &mut R) -> Self {
        let dx = config.direction_x.and_then(|d| match d {
            DirectionX::Right => Some(DRIFT_PX_PER_TICK),
            DirectionX::Left => Some(-DRIFT_PX_PER_TICK),
            DirectionX::Random => pick(rng, DRIFT_PX_PER_TICK, -DRIFT_PX_PER_TICK),
        });
        let dy = config.direction_y.and_then(|d| match d {
            DirectionY::Down => Some(DRIFT_PX_PER_TICK),
            DirectionY::Up => Some(-DRIFT_PX_PER_TICK),
            DirectionY::Random => pick(rng, -DRIFT_PX_PER_TICK, DRIFT_PX_PER_TICK),
        });
        let dscale = config.zoom.and_then(|z| match z {
            Zoom::In => Some(ZOOM_PER_TICK),
            Zoom::Out => Some(-ZOOM_PER_TICK),
            Zoom::Random => pick(rng, ZOOM_PER_TICK, -ZOOM_PER_TICK),
        });

        Self { dx, dy, dscale }
    }

    /// No axis moves
    pub fn is_still(&self) -> bool {
        self.dx.is_none() && self.dy.is_none() && self.dscale.is_none()
    }

    /// Apply one tick of drift
    pub fn apply(&self, style: &mut ElementStyle) {
        if let Some(dx) = self.dx {
            style.left += dx;
        }
        if let Some(dy) = self.dy {
            style.top += dy;
        }
        if let Some(dscale) = self.dscale {
            style.scale = Some(style.scale_factor() + dscale);
        }
    }
}

/// Uniform three-way choice: `first`, `second`, or nothing
fn pick<R: Rng + ?Sized>(rng: &mut R, first: f32, second: f32) -> Option<f32> {
    match rng.gen_range(0..3) {
        0 => Some(first),
        1 => Some(second),
        _ => None,
    }
}

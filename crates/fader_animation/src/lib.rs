//! Fader Animation System
//!
//! Opacity fades on a fixed timer, with optional positional and scale drift.
//!
//! # Features
//!
//! - **Fade out / fade in**: ramp opacity, then flip `display` or `visibility`
//! - **Replace**: fade one element out, then another in, strictly in sequence
//! - **Drift**: fading-out elements can slide or zoom, optionally at random
//! - **Chaining**: callbacks start follow-up fades through a [`FadeHandle`]
//! - **Deterministic**: virtual-time timers and a seedable drift generator
//!
//! # Example
//!
//! ```rust
//! use fader_animation::{fade_out, Animator, Document, ElementStyle, FadeOptions};
//!
//! let mut doc = Document::new();
//! doc.insert_with_id("toast", ElementStyle::default());
//! let mut animator = Animator::new(doc);
//!
//! fade_out(&mut animator, "toast", || {}, &FadeOptions::new().fade(100));
//! animator.run_until_idle(1_000);
//!
//! assert!(animator.tree().style_by_id("toast").unwrap().is_display_none());
//! ```

pub mod animator;
pub mod config;
pub mod controller;
pub mod direction;
pub mod handle;
pub mod run;
pub mod timer;

pub use animator::{Animator, FadeStart};
pub use config::{FadeConfig, FadeOptions, MissingTargetPolicy, VisibilityStrategy};
pub use controller::FadeController;
pub use direction::{DirectionX, DirectionY, Drift, Zoom};
pub use handle::FadeHandle;
pub use run::{FadeKind, RunId};
pub use timer::{TimerId, TimerQueue};

pub use fader_core::{Document, ElementId, ElementStyle, FadeError, RunPhase, StyleTree, Target, Visibility};

/// Fade `target` out with a one-off configuration
pub fn fade_out<T, F>(
    animator: &mut Animator<T>,
    target: impl Into<Target>,
    callback: F,
    options: &FadeOptions,
) -> FadeStart
where
    T: StyleTree,
    F: FnOnce() + 'static,
{
    FadeController::with_options(options).fade_out(animator, target, callback, None)
}

/// Fade `target` in with a one-off configuration
pub fn fade_in<T, F>(
    animator: &mut Animator<T>,
    target: impl Into<Target>,
    callback: F,
    options: &FadeOptions,
) -> FadeStart
where
    T: StyleTree,
    F: FnOnce() + 'static,
{
    FadeController::with_options(options).fade_in(animator, target, callback, None)
}

/// Fade `out_target` out and then `in_target` in with a one-off configuration
pub fn fade_replace<T, F>(
    animator: &mut Animator<T>,
    out_target: impl Into<Target>,
    in_target: impl Into<Target>,
    callback: F,
    options: &FadeOptions,
) -> FadeStart
where
    T: StyleTree,
    F: FnOnce() + 'static,
{
    FadeController::with_options(options).fade_replace(animator, out_target, in_target, callback, None)
}

//! Stateful fade controller
//!
//! Holds one [`FadeConfig`] and starts fade-out, fade-in and replace runs
//! with it. Every run snapshots the configuration it started with, so
//! reconfiguring never affects fades already in flight.
//!
//! # Example
//!
//! ```rust
//! use fader_animation::{Animator, Document, ElementStyle, FadeController, FadeOptions};
//!
//! let mut doc = Document::new();
//! doc.insert_with_id("old", ElementStyle::default());
//! doc.insert_with_id("new", ElementStyle::display_none());
//! let mut animator = Animator::new(doc);
//!
//! let mut fader = FadeController::new();
//! fader.configure(&FadeOptions::new().fade(100).display("flex"));
//! fader.fade_replace(&mut animator, "old", "new", || println!("swapped"), None);
//!
//! animator.run_until_idle(10_000);
//! assert_eq!(animator.tree().style_by_id("new").unwrap().display, "flex");
//! ```

use fader_core::{StyleTree, Target};

use crate::animator::{boxed, Animator, FadeStart};
use crate::config::{FadeConfig, FadeOptions};
use crate::run::{Continuation, FadeKind};

/// Configurable starter for fades
#[derive(Clone, Debug, Default)]
pub struct FadeController {
    config: FadeConfig,
}

impl FadeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller configured from `options`
    pub fn with_options(options: &FadeOptions) -> Self {
        Self {
            config: FadeConfig::from_options(options),
        }
    }

    pub fn config(&self) -> &FadeConfig {
        &self.config
    }

    /// Replace the configuration with defaults plus `options`
    pub fn configure(&mut self, options: &FadeOptions) -> &mut Self {
        self.config = FadeConfig::from_options(options);
        self
    }

    /// Fade `target` out, then hide it and call `callback`
    ///
    /// An already hidden target calls back immediately without touching its
    /// style. A target that does not resolve is reported and, unless the
    /// configuration says otherwise, never calls back.
    pub fn fade_out<T, F>(
        &mut self,
        animator: &mut Animator<T>,
        target: impl Into<Target>,
        callback: F,
        options: Option<&FadeOptions>,
    ) -> FadeStart
    where
        T: StyleTree,
        F: FnOnce() + 'static,
    {
        self.apply(options);
        animator.start(
            FadeKind::Out,
            target.into(),
            self.config.clone(),
            Continuation::Callback(boxed(callback)),
            true,
        )
    }

    /// Show `target` at zero opacity, fade it in, then call `callback`
    pub fn fade_in<T, F>(
        &mut self,
        animator: &mut Animator<T>,
        target: impl Into<Target>,
        callback: F,
        options: Option<&FadeOptions>,
    ) -> FadeStart
    where
        T: StyleTree,
        F: FnOnce() + 'static,
    {
        self.apply(options);
        animator.start(
            FadeKind::In,
            target.into(),
            self.config.clone(),
            Continuation::Callback(boxed(callback)),
            true,
        )
    }

    /// Fade `out_target` out, then fade `in_target` in, then call `callback`
    ///
    /// Both halves share one configuration and a single wait before the
    /// fade-out. The fade-in only starts from the fade-out's completion.
    pub fn fade_replace<T, F>(
        &mut self,
        animator: &mut Animator<T>,
        out_target: impl Into<Target>,
        in_target: impl Into<Target>,
        callback: F,
        options: Option<&FadeOptions>,
    ) -> FadeStart
    where
        T: StyleTree,
        F: FnOnce() + 'static,
    {
        self.apply(options);
        let then = Continuation::FadeIn {
            target: in_target.into(),
            config: self.config.without_wait(),
            then: boxed(callback),
        };
        animator.start(
            FadeKind::Out,
            out_target.into(),
            self.config.clone(),
            then,
            false,
        )
    }

    fn apply(&mut self, options: Option<&FadeOptions>) {
        if let Some(options) = options {
            self.configure(options);
        }
    }
}

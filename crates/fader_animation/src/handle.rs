//! Starting fades from inside completion callbacks
//!
//! Callbacks run while the [`Animator`](crate::Animator) is mutably borrowed,
//! so they cannot call it directly. A [`FadeHandle`] queues the request
//! instead; the animator starts queued fades as soon as the callback returns,
//! at the same virtual time.
//!
//! ```rust
//! use fader_animation::{fade_out, Animator, Document, ElementStyle, FadeOptions};
//!
//! let mut doc = Document::new();
//! doc.insert_with_id("a", ElementStyle::default());
//! doc.insert_with_id("b", ElementStyle::display_none());
//! let mut animator = Animator::new(doc);
//!
//! let handle = animator.handle();
//! let options = FadeOptions::new().fade(100);
//! let next = options.clone();
//! fade_out(&mut animator, "a", move || handle.fade_in("b", || {}, &next), &options);
//!
//! animator.run_until_idle(10_000);
//! assert!(!animator.tree().style_by_id("b").unwrap().is_display_none());
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use fader_core::Target;

use crate::animator::boxed;
use crate::config::{FadeConfig, FadeOptions};
use crate::run::{Continuation, FadeKind};

pub(crate) struct PendingStart {
    pub kind: FadeKind,
    pub target: Target,
    pub config: FadeConfig,
    pub then: Continuation,
    pub check_first: bool,
}

/// Cloneable queue of fades waiting to be started by an animator
#[derive(Clone, Default)]
pub struct FadeHandle {
    pending: Rc<RefCell<VecDeque<PendingStart>>>,
}

impl FadeHandle {
    /// Queue a fade-out of `target`
    pub fn fade_out<F>(&self, target: impl Into<Target>, callback: F, options: &FadeOptions)
    where
        F: FnOnce() + 'static,
    {
        self.push(PendingStart {
            kind: FadeKind::Out,
            target: target.into(),
            config: FadeConfig::from_options(options),
            then: Continuation::Callback(boxed(callback)),
            check_first: true,
        });
    }

    /// Queue a fade-in of `target`
    pub fn fade_in<F>(&self, target: impl Into<Target>, callback: F, options: &FadeOptions)
    where
        F: FnOnce() + 'static,
    {
        self.push(PendingStart {
            kind: FadeKind::In,
            target: target.into(),
            config: FadeConfig::from_options(options),
            then: Continuation::Callback(boxed(callback)),
            check_first: true,
        });
    }

    /// Queue a replace of `out_target` by `in_target`
    pub fn fade_replace<F>(
        &self,
        out_target: impl Into<Target>,
        in_target: impl Into<Target>,
        callback: F,
        options: &FadeOptions,
    ) where
        F: FnOnce() + 'static,
    {
        let config = FadeConfig::from_options(options);
        let then = Continuation::FadeIn {
            target: in_target.into(),
            config: config.without_wait(),
            then: boxed(callback),
        };
        self.push(PendingStart {
            kind: FadeKind::Out,
            target: out_target.into(),
            config,
            then,
            check_first: false,
        });
    }

    /// Number of fades not yet started
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub(crate) fn pop(&self) -> Option<PendingStart> {
        self.pending.borrow_mut().pop_front()
    }

    fn push(&self, start: PendingStart) {
        tracing::trace!("{} on {} queued", start.kind, start.target);
        self.pending.borrow_mut().push_back(start);
    }
}

impl std::fmt::Debug for FadeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FadeHandle")
            .field("pending", &self.pending())
            .finish()
    }
}

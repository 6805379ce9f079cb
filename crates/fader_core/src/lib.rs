//! Fader Core
//!
//! Foundational pieces shared by the fade engine:
//!
//! - **Element Styles**: the handful of style properties a fade touches
//! - **Style Trees**: element lookup by identifier or direct reference
//! - **Run Phases**: the `Idle → Waiting → Ramping → Done` state machine
//!
//! # Example
//!
//! ```rust
//! use fader_core::{Document, ElementStyle, StyleTree, Target};
//!
//! let mut doc = Document::new();
//! let banner = doc.insert_with_id("banner", ElementStyle::default());
//!
//! assert_eq!(doc.resolve(&Target::from("banner")), Ok(banner));
//! assert!(doc.resolve(&Target::from("missing")).is_err());
//! ```

pub mod error;
pub mod phase;
pub mod style;
pub mod tree;

pub use error::{FadeError, Result};
pub use phase::{PhaseEvent, PhaseMachine, RunPhase};
pub use style::{ElementStyle, Visibility};
pub use tree::{Document, ElementId, StyleTree, Target};

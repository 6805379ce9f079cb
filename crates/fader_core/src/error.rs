//! Fade error types

use crate::tree::ElementId;
use thiserror::Error;

/// Errors reported while resolving or driving a fade
///
/// None of these escape as panics: the animation layer logs them and
/// hands them back inside its start result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FadeError {
    /// No element carries the requested identifier
    #[error("no such element exists: {0}")]
    TargetNotFound(String),

    /// A direct element reference outlived its element
    #[error("element {0:?} is no longer in the tree")]
    StaleElement(ElementId),
}

/// Result type for tree operations
pub type Result<T> = std::result::Result<T, FadeError>;

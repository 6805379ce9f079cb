//! Element style state
//!
//! Only the properties a fade reads or writes are modelled: opacity, the two
//! visibility switches, the positional offsets and a uniform scale transform.

use serde::{Deserialize, Serialize};

/// Display value that removes an element from layout
pub const DISPLAY_NONE: &str = "none";

/// The `visibility` style property
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Mutable style of a single element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Opacity; a fade may leave it slightly outside 0.0..=1.0
    pub opacity: f32,
    /// Display mode (`"none"` hides the element)
    pub display: String,
    /// Visibility switch
    pub visibility: Visibility,
    /// Horizontal offset in pixels
    pub left: f32,
    /// Vertical offset in pixels
    pub top: f32,
    /// Uniform scale transform, `None` when no transform is set
    pub scale: Option<f32>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            display: "block".to_string(),
            visibility: Visibility::Visible,
            left: 0.0,
            top: 0.0,
            scale: None,
        }
    }
}

impl ElementStyle {
    /// Style of an element removed from layout with `display: none`
    pub fn display_none() -> Self {
        Self {
            display: DISPLAY_NONE.to_string(),
            ..Default::default()
        }
    }

    /// Style of an element occluded in place with `visibility: hidden`
    pub fn visibility_hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            ..Default::default()
        }
    }

    /// Builder: set display mode
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    /// Builder: set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Builder: set position offsets
    pub fn with_position(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Builder: set a uniform scale transform
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Whether `display` is `"none"`
    pub fn is_display_none(&self) -> bool {
        self.display == DISPLAY_NONE
    }

    /// Whether `visibility` is `hidden`
    pub fn is_visibility_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }

    /// Current scale factor, identity when no transform is set
    pub fn scale_factor(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    /// Reset offsets and transform left behind by a drifting fade
    pub fn reset_drift(&mut self) {
        self.left = 0.0;
        self.top = 0.0;
        self.scale = Some(1.0);
    }
}

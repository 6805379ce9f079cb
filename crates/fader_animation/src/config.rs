//! Fade configuration
//!
//! [`FadeOptions`] is a partial, caller-supplied set of overrides.
//! [`FadeConfig`] is the complete configuration a run executes with: defaults
//! plus whatever options were valid. Applying options never merges with an
//! earlier configuration, it always starts again from the defaults.

use fader_core::style::DISPLAY_NONE;
use fader_core::{ElementStyle, Visibility};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::direction::{DirectionX, DirectionY, Zoom};

/// Default ramp duration in milliseconds
pub const DEFAULT_FADE_MS: u32 = 250;

/// Default timer resolution in milliseconds
pub const DEFAULT_TICK_MS: u32 = 20;

/// Wait used when a loose options map says `waitTime: true`
pub const DEFAULT_WAIT_MS: u32 = 2000;

/// Display value restored by a fade-in by default
pub const DEFAULT_DISPLAY: &str = "block";

/// Display value meant by a loose `display: true`
const FLEX_DISPLAY: &str = "flex";

/// How an element is hidden and shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityStrategy {
    /// Hidden means `display: none` (removed from layout)
    #[default]
    Display,
    /// Hidden means `visibility: hidden` (occluded in place)
    Visibility,
}

impl VisibilityStrategy {
    /// Whether the element counts as hidden under this strategy
    pub fn is_hidden(&self, style: &ElementStyle) -> bool {
        match self {
            VisibilityStrategy::Display => style.is_display_none(),
            VisibilityStrategy::Visibility => style.is_visibility_hidden(),
        }
    }

    /// Apply the hidden state
    pub fn hide(&self, style: &mut ElementStyle) {
        match self {
            VisibilityStrategy::Display => style.display = DISPLAY_NONE.to_string(),
            VisibilityStrategy::Visibility => style.visibility = Visibility::Hidden,
        }
    }

    /// Apply the visible state
    pub fn show(&self, style: &mut ElementStyle, display: &str) {
        match self {
            VisibilityStrategy::Display => style.display = display.to_string(),
            VisibilityStrategy::Visibility => style.visibility = Visibility::Visible,
        }
    }
}

/// What to do when a target does not resolve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTargetPolicy {
    /// Report and stop; the callback is never called
    #[default]
    Abort,
    /// Report, then call the callback as if the fade had finished
    Complete,
}

/// Complete configuration for a fade run
#[derive(Clone, Debug, PartialEq)]
pub struct FadeConfig {
    /// Delay before the effect begins
    pub wait_ms: Option<u32>,
    /// Total ramp duration
    pub fade_ms: u32,
    /// Timer resolution
    pub tick_ms: u32,
    /// Meaning of "hidden"
    pub strategy: VisibilityStrategy,
    /// Display value applied by a fade-in under [`VisibilityStrategy::Display`]
    pub display: String,
    pub direction_x: Option<DirectionX>,
    pub direction_y: Option<DirectionY>,
    pub zoom: Option<Zoom>,
    pub missing_target: MissingTargetPolicy,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            wait_ms: None,
            fade_ms: DEFAULT_FADE_MS,
            tick_ms: DEFAULT_TICK_MS,
            strategy: VisibilityStrategy::Display,
            display: DEFAULT_DISPLAY.to_string(),
            direction_x: None,
            direction_y: None,
            zoom: None,
            missing_target: MissingTargetPolicy::Abort,
        }
    }
}

impl FadeConfig {
    /// Defaults overridden by every valid option
    pub fn from_options(options: &FadeOptions) -> Self {
        let defaults = Self::default();
        Self {
            wait_ms: options.wait_ms.filter(|&ms| ms > 0),
            fade_ms: options
                .fade_ms
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.fade_ms),
            tick_ms: options
                .tick_ms
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.tick_ms),
            strategy: options.strategy.unwrap_or(defaults.strategy),
            display: options
                .display
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or(defaults.display),
            direction_x: options.direction_x,
            direction_y: options.direction_y,
            zoom: options.zoom,
            missing_target: options.missing_target.unwrap_or(defaults.missing_target),
        }
    }

    /// Opacity change per tick (not rounded)
    pub fn step(&self) -> f32 {
        self.tick_ms as f32 / self.fade_ms as f32
    }

    /// Whether any drift axis is configured
    pub fn has_drift(&self) -> bool {
        self.direction_x.is_some() || self.direction_y.is_some() || self.zoom.is_some()
    }

    /// The same configuration with its wait consumed
    pub fn without_wait(&self) -> Self {
        Self {
            wait_ms: None,
            ..self.clone()
        }
    }
}

/// Partial fade configuration
///
/// Build it with the chained setters, or leniently from a loose key/value map
/// with [`FadeOptions::from_value`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FadeOptions {
    pub wait_ms: Option<u32>,
    pub fade_ms: Option<u32>,
    pub tick_ms: Option<u32>,
    pub strategy: Option<VisibilityStrategy>,
    pub display: Option<String>,
    pub direction_x: Option<DirectionX>,
    pub direction_y: Option<DirectionY>,
    pub zoom: Option<Zoom>,
    pub missing_target: Option<MissingTargetPolicy>,
}

impl FadeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait(mut self, ms: u32) -> Self {
        self.wait_ms = Some(ms);
        self
    }

    pub fn fade(mut self, ms: u32) -> Self {
        self.fade_ms = Some(ms);
        self
    }

    pub fn tick(mut self, ms: u32) -> Self {
        self.tick_ms = Some(ms);
        self
    }

    pub fn strategy(mut self, strategy: VisibilityStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn direction_x(mut self, direction: DirectionX) -> Self {
        self.direction_x = Some(direction);
        self
    }

    pub fn direction_y(mut self, direction: DirectionY) -> Self {
        self.direction_y = Some(direction);
        self
    }

    pub fn zoom(mut self, zoom: Zoom) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn missing_target(mut self, policy: MissingTargetPolicy) -> Self {
        self.missing_target = Some(policy);
        self
    }

    /// Read options from a loose key/value map
    ///
    /// Accepts every historical spelling of each option. Values of the wrong
    /// type or unknown enum strings are dropped, so the option falls back to
    /// its default. Anything other than an object yields empty options.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                tracing::debug!("fade options are not an object, using defaults");
            }
            return Self::default();
        };

        let mut strategy = option(map, &["visibilityStrategy", "mode", "strategy"]);
        if strategy.is_none() {
            if let Some(Value::Bool(true)) = field(map, &["toggleVisibility"]) {
                strategy = Some(VisibilityStrategy::Visibility);
            }
        }

        Self {
            wait_ms: field(map, &["waitTimeMs", "waitTime", "wait_ms"]).and_then(wait_value),
            fade_ms: field(map, &["fadeTimeMs", "fadeTime", "fade_ms"])
                .and_then(|v| millis(v, "fadeTime")),
            tick_ms: field(map, &["tickIntervalMs", "intervalTime", "tick_ms"])
                .and_then(|v| millis(v, "tickInterval")),
            strategy,
            display: field(map, &["display"]).and_then(display_value),
            direction_x: option(map, &["directionX", "direction_x"]),
            direction_y: option(map, &["directionY", "direction_y"]),
            zoom: option(map, &["zoom"]),
            missing_target: option(map, &["missingTarget", "missing_target"]),
        }
    }
}

/// First present key wins
fn field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

/// Enum option; unknown strings fall back to unset
fn option<T: DeserializeOwned>(map: &Map<String, Value>, keys: &[&str]) -> Option<T> {
    let (key, value) = keys
        .iter()
        .find_map(|key| map.get(*key).map(|value| (*key, value)))?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::debug!("ignoring invalid fade option {}={}", key, value);
            None
        }
    }
}

fn millis(value: &Value, name: &str) -> Option<u32> {
    match value.as_f64() {
        Some(ms) if ms.is_finite() && ms >= 0.0 && ms <= u32::MAX as f64 => Some(ms.round() as u32),
        _ => {
            tracing::debug!("ignoring invalid fade option {}={}", name, value);
            None
        }
    }
}

fn wait_value(value: &Value) -> Option<u32> {
    match value {
        Value::Bool(true) => Some(DEFAULT_WAIT_MS),
        Value::Bool(false) | Value::Null => None,
        other => millis(other, "waitTime"),
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(display) => Some(display.clone()),
        Value::Bool(true) => Some(FLEX_DISPLAY.to_string()),
        Value::Bool(false) => Some(DEFAULT_DISPLAY.to_string()),
        other => {
            tracing::debug!("ignoring invalid fade option display={}", other);
            None
        }
    }
}

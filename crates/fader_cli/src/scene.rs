//! Scene file handling
//!
//! A scene is a TOML file listing elements and the fades to run on them:
//!
//! ```toml
//! [[element]]
//! id = "splash"
//!
//! [[element]]
//! id = "menu"
//! display = "none"
//!
//! [[step]]
//! op = "replace"
//! target = "splash"
//! in_target = "menu"
//! at_ms = 500
//! options = { fadeTime = 300, display = "flex" }
//! ```

use anyhow::{Context, Result};
use fader_core::{Document, ElementStyle};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level scene file
#[derive(Debug, Default, Deserialize)]
pub struct Scene {
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<StepSpec>,
}

/// An element and its initial style
#[derive(Debug, Deserialize)]
pub struct ElementSpec {
    pub id: String,
    #[serde(flatten)]
    pub style: ElementStyle,
}

/// Fade operation of a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOp {
    FadeOut,
    FadeIn,
    Replace,
}

/// A fade started at a point in scene time
#[derive(Debug, Deserialize)]
pub struct StepSpec {
    pub op: StepOp,
    /// Element to fade (the outgoing one for `replace`)
    pub target: String,
    /// Incoming element for `replace`
    #[serde(default)]
    pub in_target: Option<String>,
    /// Scene time at which the step starts
    #[serde(default)]
    pub at_ms: u64,
    /// Loose fade options, any historical option spelling
    #[serde(default)]
    pub options: serde_json::Value,
}

impl Scene {
    /// Load and validate a scene file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No scene file found at {}", path.display());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse and validate scene TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scene: Scene = toml::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Reject steps that cannot run at all
    ///
    /// Targets that name no element are allowed; they exercise the
    /// missing-target diagnostics.
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            match (step.op, &step.in_target) {
                (StepOp::Replace, None) => {
                    anyhow::bail!("step {} is a replace without an in_target", index)
                }
                (StepOp::FadeOut | StepOp::FadeIn, Some(in_target)) => {
                    tracing::warn!("step {} ignores in_target '{}'", index, in_target)
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Step targets that name no element
    pub fn unknown_targets(&self) -> Vec<&str> {
        let known = |id: &str| self.elements.iter().any(|e| e.id == id);
        self.steps
            .iter()
            .flat_map(|step| std::iter::once(step.target.as_str()).chain(step.in_target.as_deref()))
            .filter(|id| !known(id))
            .collect()
    }

    /// Build the initial document
    pub fn document(&self) -> Document {
        let mut doc = Document::new();
        for element in &self.elements {
            doc.insert_with_id(element.id.clone(), element.style.clone());
        }
        doc
    }
}

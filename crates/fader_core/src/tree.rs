//! Style trees and element targets
//!
//! A [`StyleTree`] is anything that can look elements up by identifier and
//! hand out their mutable style. [`Document`] is the in-memory tree used by
//! the CLI and the tests.

use crate::error::{FadeError, Result};
use crate::style::ElementStyle;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::fmt;

new_key_type! {
    /// Direct reference to an element in a tree
    pub struct ElementId;
}

/// An element to animate, given by identifier or by reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Identifier lookup, like `getElementById`
    Id(String),
    /// Direct element reference
    Element(ElementId),
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Id(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Id(id)
    }
}

impl From<&String> for Target {
    fn from(id: &String) -> Self {
        Target::Id(id.clone())
    }
}

impl From<ElementId> for Target {
    fn from(element: ElementId) -> Self {
        Target::Element(element)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Id(id) => write!(f, "#{id}"),
            Target::Element(element) => write!(f, "{element:?}"),
        }
    }
}

/// A tree of elements with mutable styles
pub trait StyleTree {
    /// Find an element by identifier
    fn lookup(&self, id: &str) -> Option<ElementId>;

    /// Get an element's style
    fn style(&self, element: ElementId) -> Option<&ElementStyle>;

    /// Get an element's style for mutation
    fn style_mut(&mut self, element: ElementId) -> Option<&mut ElementStyle>;

    /// Resolve a target to a live element
    fn resolve(&self, target: &Target) -> Result<ElementId> {
        match target {
            Target::Id(id) => self
                .lookup(id)
                .ok_or_else(|| FadeError::TargetNotFound(id.clone())),
            Target::Element(element) => {
                if self.style(*element).is_some() {
                    Ok(*element)
                } else {
                    Err(FadeError::StaleElement(*element))
                }
            }
        }
    }
}

struct Element {
    id: Option<String>,
    style: ElementStyle,
}

/// In-memory style tree
#[derive(Default)]
pub struct Document {
    elements: SlotMap<ElementId, Element>,
    ids: FxHashMap<String, ElementId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anonymous element, reachable only by reference
    pub fn insert(&mut self, style: ElementStyle) -> ElementId {
        self.elements.insert(Element { id: None, style })
    }

    /// Add an element with an identifier
    ///
    /// Identifiers are expected to be unique. When one is reused, lookups keep
    /// returning the element that claimed it first.
    pub fn insert_with_id(&mut self, id: impl Into<String>, style: ElementStyle) -> ElementId {
        let id = id.into();
        let element = self.elements.insert(Element {
            id: Some(id.clone()),
            style,
        });
        if self.ids.contains_key(&id) {
            tracing::debug!("duplicate element id '{}', keeping the first", id);
        } else {
            self.ids.insert(id, element);
        }
        element
    }

    /// Remove an element, returning its last style
    pub fn remove(&mut self, element: ElementId) -> Option<ElementStyle> {
        let removed = self.elements.remove(element)?;
        if let Some(id) = &removed.id {
            if self.ids.get(id) == Some(&element) {
                self.ids.remove(id);
            }
        }
        Some(removed.style)
    }

    /// Identifier of an element, if it has one
    pub fn id_of(&self, element: ElementId) -> Option<&str> {
        self.elements.get(element)?.id.as_deref()
    }

    /// Style of the element with the given identifier
    pub fn style_by_id(&self, id: &str) -> Option<&ElementStyle> {
        self.lookup(id).and_then(|element| self.style(element))
    }

    /// Iterate over all elements
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, Option<&str>, &ElementStyle)> {
        self.elements
            .iter()
            .map(|(element, e)| (element, e.id.as_deref(), &e.style))
    }

    /// Get the number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl StyleTree for Document {
    fn lookup(&self, id: &str) -> Option<ElementId> {
        self.ids.get(id).copied()
    }

    fn style(&self, element: ElementId) -> Option<&ElementStyle> {
        self.elements.get(element).map(|e| &e.style)
    }

    fn style_mut(&mut self, element: ElementId) -> Option<&mut ElementStyle> {
        self.elements.get_mut(element).map(|e| &mut e.style)
    }
}

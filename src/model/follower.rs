//! The follower record
//!
//! A follower is one element of a document: an id, a display label, graded
//! aspects, a description, and triggers that name other followers by id.
//! Serialization order and key names match the document grammar, so the
//! derived `Serialize` doubles as the strict JSON encoding.

use super::ordered_map::OrderedMap;
use serde::Serialize;

/// Aspect name → graded value
pub type Aspects = OrderedMap<String, i32>;

/// Trigger name → target follower id
pub type Triggers = OrderedMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Follower {
    pub id: String,
    pub label: String,
    pub aspects: Aspects,
    pub description: String,
    #[serde(rename = "xtriggers")]
    pub triggers: Triggers,
    #[serde(rename = "uniquenessgroup")]
    pub uniqueness_group: String,
    #[serde(rename = "animFrame")]
    pub anim_frame: String,
    pub comments: String,
    #[serde(rename = "decayto")]
    pub decay_to: String,
    pub lifetime: i32,
    pub icon: String,
}

impl Follower {
    /// Create a follower with an id and label; every other field is empty.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_aspect(mut self, name: impl Into<String>, value: i32) -> Self {
        self.aspects.insert(name.into(), value);
        self
    }

    pub fn with_trigger(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.triggers.insert(name.into(), target.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_uniqueness_group(mut self, group: impl Into<String>) -> Self {
        self.uniqueness_group = group.into();
        self
    }

    pub fn with_lifetime(mut self, lifetime: i32) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// `Label (id)`, the form used by tree output
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.label, self.id)
    }

    /// Whether this follower has no outgoing references
    pub fn is_leaf(&self) -> bool {
        self.triggers.is_empty()
    }
}

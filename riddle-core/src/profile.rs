//! Entity profiles as supplied by upstream data loading.
//!
//! Profiles are formatting-only: sinks use them to render a display
//! identifier and an attribute dump for each classified pair. They take
//! no part in classification itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One name/value attribute of an entity profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Display identifier plus human-readable attributes for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProfile {
    /// Display identifier (URL or name) of the entity.
    pub url: String,
    /// Attribute dump, in load order.
    pub attributes: Vec<Attribute>,
}

impl EntityProfile {
    /// Create a profile with no attributes.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute (builder style).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }
}

impl fmt::Display for EntityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.url)?;
        for (i, attr) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}={}", attr.name, attr.value)?;
        }
        write!(f, "}}")
    }
}

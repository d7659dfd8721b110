//! Identity and tagging (C1)
//!
//! Every population, projection, channel, and backend owns a [`BaseData`]:
//! a stable [`Uid`] plus a [`TagMap`] of orchestration metadata. Tags are
//! used only by orchestration (experiment names, human-readable labels),
//! never by the hot simulation path, so concurrent access across threads is
//! the caller's responsibility.

use crate::uid::Uid;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dynamically-typed tag value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TagValue {
    /// Signed integer tag
    Int(i64),
    /// Floating point tag
    Float(f64),
    /// Boolean tag
    Bool(bool),
    /// String tag
    Str(String),
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// A mapping from string name to dynamically-typed tag value
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagMap {
    entries: HashMap<String, TagValue>,
}

impl TagMap {
    /// An empty tag map
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a tag's current value
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.entries.get(name)
    }

    /// Write a tag, replacing any existing value, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<TagValue>) -> Option<TagValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Remove a tag, returning its value if present
    pub fn remove(&mut self, name: &str) -> Option<TagValue> {
        self.entries.remove(name)
    }

    /// Number of tags currently set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no tags are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all tags
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.entries.iter()
    }
}

/// Common identity/metadata block owned by every network entity
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaseData {
    /// Stable identifier
    pub uid: Uid,
    /// Orchestration-only metadata
    pub tags: TagMap,
}

impl BaseData {
    /// A fresh [`BaseData`] with a newly generated UID and no tags
    pub fn new() -> Self {
        Self {
            uid: Uid::fresh(),
            tags: TagMap::new(),
        }
    }

    /// A [`BaseData`] with an explicit UID (e.g. for deserialization)
    pub fn with_uid(uid: Uid) -> Self {
        Self {
            uid,
            tags: TagMap::new(),
        }
    }
}

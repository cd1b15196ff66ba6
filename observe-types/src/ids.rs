//! Identifier and version types used throughout the export engine.
//!
//! Store ids are opaque strings. A leading `-` marks a placeholder id that a
//! client assigned before the element was accepted by the canonical store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PLACEHOLDER_PREFIX: char = '-';

/// Identifier of an element (feature or observation) in a store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Creates an id from any string, without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses an id, rejecting the empty string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.is_empty() {
            return Err(crate::Error::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the `index`-th (1-based) changeset placeholder id: `-1`, `-2`, ...
    #[must_use]
    pub fn placeholder(index: usize) -> Self {
        Self(format!("{PLACEHOLDER_PREFIX}{index}"))
    }

    /// Returns true if this id was assigned client-side and has not yet been
    /// accepted by the canonical store.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_PREFIX)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ElementId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Store-assigned revision token.
///
/// Opaque to the engine. The only operation it supports is lexicographic
/// comparison, used to keep fork selection stable when no timestamps exist.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

//! The element record shared by features and observations.
//!
//! An element is whatever a store returns for one fork of one id. The engine
//! only interprets the fields it needs for resolution and merging; everything
//! else a store attaches (changeset ids, user names, way node refs, ...) is
//! kept in [`Element::extra`] and written back out untouched.

use crate::{ElementId, Version};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// The kind of an element, serialized as its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
    Observation,
}

impl ElementKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
            Self::Observation => "observation",
        }
    }

    /// Returns true for kinds that can appear in an OsmChange document.
    #[must_use]
    pub const fn is_feature(&self) -> bool {
        !matches!(self, Self::Observation)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            "observation" => Ok(Self::Observation),
            other => Err(crate::Error::UnknownKind(other.to_string())),
        }
    }
}

/// Changeset classification of an exported feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The feature has never been accepted by the canonical store.
    Create,
    /// The feature exists upstream and gained tags.
    Modify,
}

impl Action {
    /// Classifies an element by its id: placeholder ids are creations.
    #[must_use]
    pub fn for_id(id: &ElementId) -> Self {
        if id.is_placeholder() {
            Self::Create
        } else {
            Self::Modify
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "modify" => Ok(Self::Modify),
            other => Err(crate::Error::UnknownAction(other.to_string())),
        }
    }
}

/// A map feature or an observation, as one resolved (or raw fork) revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    /// When present, authoritative for ordering forks and observations.
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Feature ids this observation annotates. Populated by the exporter from
    /// the link index; empty for features.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ElementId>,

    /// Set only on changeset output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,

    /// Store fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Element {
    /// Creates an element with no version, timestamp, position or tags.
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            version: None,
            timestamp: None,
            lat: None,
            lon: None,
            tags: BTreeMap::new(),
            links: Vec::new(),
            action: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Creates a bare node.
    #[must_use]
    pub fn node(id: impl Into<ElementId>) -> Self {
        Self::new(id, ElementKind::Node)
    }

    /// Creates a bare observation.
    #[must_use]
    pub fn observation(id: impl Into<ElementId>) -> Self {
        Self::new(id, ElementKind::Observation)
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_position(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_links<I, T>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ElementId>,
    {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if the element carries a client-side placeholder id.
    #[must_use]
    pub fn has_placeholder_id(&self) -> bool {
        self.id.is_placeholder()
    }

    /// Returns true if this element is an observation rather than a feature.
    #[must_use]
    pub fn is_observation(&self) -> bool {
        self.kind == ElementKind::Observation
    }

    /// Rewrites way node refs and relation member refs through `ids`.
    ///
    /// Refs with no entry in `ids` are left as they are.
    pub fn remap_references(&mut self, ids: &HashMap<ElementId, ElementId>) {
        let remap = |value: &mut Value| {
            let current = match value {
                Value::String(s) => ElementId::new(s.as_str()),
                Value::Number(n) => ElementId::new(n.to_string()),
                _ => return,
            };
            if let Some(renamed) = ids.get(&current) {
                *value = Value::String(renamed.to_string());
            }
        };
        match self.kind {
            ElementKind::Way => {
                if let Some(Value::Array(nodes)) = self.extra.get_mut("nodes") {
                    nodes.iter_mut().for_each(remap);
                }
            }
            ElementKind::Relation => {
                if let Some(Value::Array(members)) = self.extra.get_mut("members") {
                    members
                        .iter_mut()
                        .filter_map(|member| member.get_mut("ref"))
                        .for_each(remap);
                }
            }
            ElementKind::Node | ElementKind::Observation => {}
        }
    }

    /// Decodes an element from its JSON document form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the element as a JSON document.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parses a store timestamp.
///
/// Accepts RFC 3339, and also naive date-times and bare dates, which are
/// read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(raw.trim())
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp {raw:?}")))
}

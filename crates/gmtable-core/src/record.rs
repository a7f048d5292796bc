//! Record schema for scenarios and the characters that live in them.
//!
//! Records are plain data. On the wire every record carries a `"type"` field
//! naming its [`RecordTag`] and an integer `"id"`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;
use crate::identity::{Id, Identifiable};

/// The closed set of record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordTag {
    /// Top level organisational document.
    Scenario,
    /// Optional subgrouping within a scenario.
    Act,
    /// A scene scoped to a scenario or act.
    Scene,
    /// A pool definition such as Health or Stability.
    Meter,
    /// The definition of a game master character.
    GmcPrototype,
    /// A live instance of a game master character.
    Gmc,
}

impl RecordTag {
    /// All tags, in declaration order.
    pub const ALL: [RecordTag; 6] = [
        RecordTag::Scenario,
        RecordTag::Act,
        RecordTag::Scene,
        RecordTag::Meter,
        RecordTag::GmcPrototype,
        RecordTag::Gmc,
    ];

    /// Returns the wire name of this tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordTag::Scenario => "scenario",
            RecordTag::Act => "act",
            RecordTag::Scene => "scene",
            RecordTag::Meter => "meter",
            RecordTag::GmcPrototype => "gmcPrototype",
            RecordTag::Gmc => "gmc",
        }
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordTag {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| RecordError::UnknownTag(s.to_owned()))
    }
}

/// A reference from one record to the record that scopes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// The tag of the scoping record.
    #[serde(rename = "type")]
    pub tag: RecordTag,
    /// The id of the scoping record.
    pub id: Id,
}

/// Top level organisational document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Record identifier.
    pub id: Id,
    /// Display title.
    pub title: String,
    /// The game this scenario is written for.
    pub game: String,
}

/// Optional subgrouping within a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Act {
    /// Record identifier.
    pub id: Id,
    /// Display title.
    pub title: String,
    /// The owning scenario.
    pub scenario: Id,
    /// Sort position within the scenario.
    pub order_key: i64,
}

/// A scene, scoped to a scenario or an act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Record identifier.
    pub id: Id,
    /// Display title.
    pub title: String,
    /// The scenario or act this scene belongs to.
    pub scope: Scope,
}

/// A pool such as Health, Stability or Firearms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmcPoolDefinition {
    /// Record identifier.
    pub id: Id,
    /// Pool name.
    pub name: String,
    /// Maximum rated value.
    pub rating: i64,
    /// Lowest value the pool can fall to. Usually zero, may be negative.
    pub minimum: i64,
}

/// Whether a static value is a target number or a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    /// A target number.
    Threshold,
    /// A modifier applied to rolls.
    Modifier,
}

/// A static value on a character prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmcValue {
    /// Value name.
    pub name: String,
    /// Threshold or modifier.
    #[serde(rename = "type")]
    pub kind: ValueKind,
    /// The value itself.
    pub value: i64,
}

/// The definition of a game master character.
///
/// Holds maximum values, not game time state. Singleton prototypes describe
/// one specific character; others may be instantiated many times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmcPrototype {
    /// Record identifier.
    pub id: Id,
    /// Character name.
    pub name: String,
    /// Pools this character tracks.
    pub pools: Vec<GmcPoolDefinition>,
    /// Static values.
    pub values: Vec<GmcValue>,
    /// Whether at most one instance may exist.
    pub singleton: bool,
    /// The scenario, act or scene this character belongs to.
    pub scope: Scope,
}

/// A live instance of a [`GmcPrototype`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmcInstance {
    /// Record identifier.
    pub id: Id,
    /// The prototype this instance was created from.
    pub prototype: Id,
    /// Distinguishes instances of a non-singleton prototype.
    pub instance_counter: u32,
    /// Current pool values keyed by pool definition id.
    #[serde(deserialize_with = "deserialize_pool_values")]
    pub pool_values: BTreeMap<Id, i64>,
}

// JSON object keys are strings. Inside the tagged `Record` they arrive
// buffered and are not coerced to integers, so they are parsed here.
fn deserialize_pool_values<'de, D>(deserializer: D) -> Result<BTreeMap<Id, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, i64>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| match key.parse::<Id>() {
            Ok(id) => Ok((id, value)),
            Err(e) => Err(D::Error::custom(format!("invalid pool id {key:?}: {e}"))),
        })
        .collect()
}

/// Any record, discriminated by its `"type"` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Record {
    /// A scenario.
    Scenario(Scenario),
    /// An act.
    Act(Act),
    /// A scene.
    Scene(Scene),
    /// A pool definition.
    Meter(GmcPoolDefinition),
    /// A character prototype.
    GmcPrototype(GmcPrototype),
    /// A character instance.
    Gmc(GmcInstance),
}

impl Record {
    /// Decodes a record from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Serialization` if the text is not a valid record.
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encodes this record to its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Identifiable for Record {
    type Tag = RecordTag;

    fn tag(&self) -> RecordTag {
        match self {
            Record::Scenario(_) => RecordTag::Scenario,
            Record::Act(_) => RecordTag::Act,
            Record::Scene(_) => RecordTag::Scene,
            Record::Meter(_) => RecordTag::Meter,
            Record::GmcPrototype(_) => RecordTag::GmcPrototype,
            Record::Gmc(_) => RecordTag::Gmc,
        }
    }

    fn id(&self) -> Id {
        match self {
            Record::Scenario(r) => r.id,
            Record::Act(r) => r.id,
            Record::Scene(r) => r.id,
            Record::Meter(r) => r.id,
            Record::GmcPrototype(r) => r.id,
            Record::Gmc(r) => r.id,
        }
    }
}

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::layout::{serialize_ordered, KeyOrder, Split};
use super::resource::{Resource, ResourceKind};
use crate::errors::Result;

const DOCUMENT_KEYS: [&str; 2] = ["serial", "resources"];

/// In-memory Terraform state document
///
/// Only `serial` and `resources` are modeled. Every other top-level key
/// (`version`, `terraform_version`, `lineage`, `outputs`, ...) is kept in
/// `extra`. An unmodified document serializes back to the same text
/// `serde_json::to_string_pretty` gives for the parsed value: every object,
/// modeled or not, keeps its key order.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDocument {
    /// Monotonic version counter; bumped once per applied reconciliation
    pub serial: u64,

    pub resources: Vec<Resource>,

    pub extra: Map<String, Value>,

    key_order: KeyOrder,
}

impl Serialize for StateDocument {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_ordered(serializer, &self.key_order, &DOCUMENT_KEYS, &self.extra, |key, map| match key {
            "serial" => map.serialize_entry(key, &self.serial),
            _ => map.serialize_entry(key, &self.resources),
        })
    }
}

impl<'de> Deserialize<'de> for StateDocument {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut split = Split::deserialize(deserializer)?;
        let serial = split.require::<_, D::Error>("serial")?;
        let resources = split.take::<_, D::Error>("resources")?.unwrap_or_default();
        Ok(Self {
            serial,
            resources,
            extra: split.extra,
            key_order: split.order,
        })
    }
}

impl StateDocument {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty JSON with a trailing newline, two-space indent
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Position of the resource with this kind and name
    pub fn position_of(&self, kind: ResourceKind, name: &str) -> Option<usize> {
        self.resources.iter().position(|r| r.is(kind, name))
    }

    pub fn find(&self, kind: ResourceKind, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.is(kind, name))
    }

    pub fn find_mut(&mut self, kind: ResourceKind, name: &str) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.is(kind, name))
    }
}

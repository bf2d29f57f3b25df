//! Key order of the JSON objects behind the state model
//!
//! The state types pull a few keys out into typed fields and keep the rest in
//! an `extra` map. `KeyOrder` remembers where every key sat in the parsed
//! object so serialization can put the typed fields back in their place.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct KeyOrder(Vec<String>);

impl KeyOrder {
    pub(crate) fn of(object: &Map<String, Value>) -> Self {
        Self(object.keys().cloned().collect())
    }

    /// Keys to write: parsed order first, then modeled keys and extras added
    /// after parsing
    fn arrange<'a>(&'a self, modeled: &[&'static str], extra: &'a Map<String, Value>) -> Vec<&'a str> {
        let mut keys: Vec<&'a str> = self
            .0
            .iter()
            .map(String::as_str)
            .filter(|k| is_modeled(modeled, k) || extra.contains_key(*k))
            .collect();
        for key in modeled {
            if !keys.contains(key) {
                keys.push(*key);
            }
        }
        for key in extra.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
        keys
    }
}

fn is_modeled(modeled: &[&'static str], key: &str) -> bool {
    modeled.iter().any(|m| *m == key)
}

/// Parsed object split into its modeled keys and the rest
pub(crate) struct Split {
    pub(crate) order: KeyOrder,
    pub(crate) extra: Map<String, Value>,
}

impl Split {
    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let extra = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            order: KeyOrder::of(&extra),
            extra,
        })
    }

    /// Remove and decode a modeled key; `None` when absent
    pub(crate) fn take<T, E>(&mut self, key: &'static str) -> Result<Option<T>, E>
    where
        T: DeserializeOwned,
        E: serde::de::Error,
    {
        match self.extra.remove(key) {
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|e| E::custom(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub(crate) fn require<T, E>(&mut self, key: &'static str) -> Result<T, E>
    where
        T: DeserializeOwned,
        E: serde::de::Error,
    {
        self.take(key)?.ok_or_else(|| E::missing_field(key))
    }
}

/// Write an object whose modeled values come from `modeled_value`
pub(crate) fn serialize_ordered<S, F>(
    serializer: S,
    order: &KeyOrder,
    modeled: &[&'static str],
    extra: &Map<String, Value>,
    mut modeled_value: F,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    F: FnMut(&str, &mut S::SerializeMap) -> Result<(), S::Error>,
{
    let keys = order.arrange(modeled, extra);
    let mut map = serializer.serialize_map(Some(keys.len()))?;
    for key in keys {
        if is_modeled(modeled, key) {
            modeled_value(key, &mut map)?;
        } else if let Some(value) = extra.get(key) {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

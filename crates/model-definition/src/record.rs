use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EntityId, JsonMap};

/// A raw primary key, either the integer form used by serial columns or
/// an arbitrary string key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(value) => Value::from(*value),
            Key::Str(value) => Value::from(value.as_str()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(value) => value.fmt(f),
            Key::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

/// A stored row, addressed by entity and primary key. The attribute map
/// is keyed by column name and mutated in place by the update path;
/// persistence of the mutated map is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_id: EntityId,
    pub key: Key,
    pub attributes: JsonMap,
}

impl EntityRecord {
    pub fn new(entity_id: EntityId, key: Key, attributes: JsonMap) -> Self {
        Self {
            entity_id,
            key,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }
}

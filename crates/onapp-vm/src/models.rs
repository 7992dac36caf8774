//! Identifiers and option maps passed to virtual machine endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier of a virtual machine, network interface or user.
///
/// Never validated locally; it is rendered into the path or parameter map as
/// given and the control panel decides whether it is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric database id.
    Number(u64),
    /// String identifier such as an `identifier` slug.
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<u32> for Identifier {
    fn from(id: u32) -> Self {
        Self::Number(u64::from(id))
    }
}

impl From<usize> for Identifier {
    fn from(id: usize) -> Self {
        u64::try_from(id).map_or_else(|_| Self::Text(id.to_string()), Self::Number)
    }
}

// Negative values are kept verbatim as text.
impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        u64::try_from(id).map_or_else(|_| Self::Text(id.to_string()), Self::Number)
    }
}

impl From<i32> for Identifier {
    fn from(id: i32) -> Self {
        Self::from(i64::from(id))
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&String> for Identifier {
    fn from(id: &String) -> Self {
        Self::Text(id.clone())
    }
}

impl From<Identifier> for Value {
    fn from(id: Identifier) -> Self {
        match id {
            Identifier::Number(id) => Self::from(id),
            Identifier::Text(id) => Self::String(id),
        }
    }
}

/// Caller-supplied endpoint parameters, forwarded verbatim.
///
/// Keys keep insertion order. No schema is enforced: the accepted vocabulary
/// (`label`, `memory`, `cpus`, `template_id`, ...) is defined by the control
/// panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Create an empty option map.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nest the whole map under `key`: `{key: {..options}}`.
    #[must_use]
    pub fn wrapped(self, key: &str) -> Value {
        let mut outer = Map::new();
        outer.insert(key.to_string(), self.into_value());
        Value::Object(outer)
    }

    /// Convert into a JSON object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

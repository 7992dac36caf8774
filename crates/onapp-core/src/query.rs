//! Builder for HTTP query parameters.
//!
//! The control panel reads nested parameters in bracket notation, so a map
//! like `{"virtual_machine": {"destination": 7}}` travels as
//! `virtual_machine[destination]=7`.

use serde_json::Value;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Flatten a JSON value into bracket-notation pairs.
    ///
    /// Objects nest as `outer[inner]`, arrays as `key[]`. A top-level scalar
    /// has no key to attach to and produces nothing.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut params = Self::new();
        if let Value::Object(map) = value {
            for (key, nested) in map {
                params.push_value(key.clone(), nested);
            }
        }
        params
    }

    /// Append a JSON value under `key`, recursing into objects and arrays.
    fn push_value(&mut self, key: String, value: &Value) {
        match value {
            Value::Object(map) => {
                for (inner, nested) in map {
                    self.push_value(format!("{key}[{inner}]"), nested);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.push_value(format!("{key}[]"), item);
                }
            }
            Value::String(text) => self.pairs.push((key, text.clone())),
            Value::Null => self.pairs.push((key, String::new())),
            Value::Bool(_) | Value::Number(_) => self.pairs.push((key, value.to_string())),
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

}

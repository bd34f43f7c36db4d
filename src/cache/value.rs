//! Cache Value Module
//!
//! Structured documents accepted by the write path, and the JSON text form
//! they travel in.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, VoleError, MSG_VAL_MUST_BE_OBJECT};

// == Cache Value ==
/// A cacheable document: a JSON object or a JSON array.
///
/// Scalars (numbers, strings, booleans, null) cannot be represented, so the
/// write path never has to inspect value types at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CacheValue {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl CacheValue {
    /// Converts any serializable value, rejecting those that encode to a scalar.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Self::try_from(serde_json::to_value(value)?)
    }

    /// Encodes the document as compact JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the document as a plain JSON value.
    pub fn into_value(self) -> Value {
        match self {
            CacheValue::Object(map) => Value::Object(map),
            CacheValue::Array(items) => Value::Array(items),
        }
    }
}

impl TryFrom<Value> for CacheValue {
    type Error = VoleError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(CacheValue::Object(map)),
            Value::Array(items) => Ok(CacheValue::Array(items)),
            _ => Err(VoleError::validation(MSG_VAL_MUST_BE_OBJECT)),
        }
    }
}

impl From<Map<String, Value>> for CacheValue {
    fn from(map: Map<String, Value>) -> Self {
        CacheValue::Object(map)
    }
}

impl From<Vec<Value>> for CacheValue {
    fn from(items: Vec<Value>) -> Self {
        CacheValue::Array(items)
    }
}

impl From<CacheValue> for Value {
    fn from(value: CacheValue) -> Self {
        value.into_value()
    }
}

/// Parses stored JSON text back into a value.
pub fn decode(raw: &str) -> serde_json::Result<Value> {
    serde_json::from_str(raw)
}

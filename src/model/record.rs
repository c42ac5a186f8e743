//! Schema-free event records with fallible typed accessors
//!
//! Every accessor returns `None` when the field is absent, `null`, or holds an
//! incompatible JSON type. The nullable variants return `Some(None)` for a
//! present `null`, so callers can tell an explicit null apart from a missing
//! or malformed field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One decoded event, keeping every original key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord {
    raw: Map<String, Value>,
}

impl From<Map<String, Value>> for EventRecord {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}

impl EventRecord {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    /// Attach a field, replacing any previous value under the same key.
    ///
    /// Ingestion uses this to merge synthetic fields (stream class, camera)
    /// into a record before it reaches the engine.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw.insert(key.into(), value.into());
        self
    }

    /// Field names in ascending order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.raw.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn has(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.raw.get(key)?.as_str()
    }

    pub fn nullable_string(&self, key: &str) -> Option<Option<&str>> {
        match self.raw.get(key)? {
            Value::Null => Some(None),
            Value::String(s) => Some(Some(s.as_str())),
            _ => None,
        }
    }

    /// Finite floating point value; NaN and infinities count as missing
    pub fn f64(&self, key: &str) -> Option<f64> {
        as_finite_f64(self.raw.get(key)?)
    }

    /// Whole-number value; `2.5` is not an integer, `3.0` is
    pub fn i64(&self, key: &str) -> Option<i64> {
        as_whole_i64(self.raw.get(key)?)
    }

    pub fn nullable_i64(&self, key: &str) -> Option<Option<i64>> {
        match self.raw.get(key)? {
            Value::Null => Some(None),
            value => as_whole_i64(value).map(Some),
        }
    }

    /// String array; a single non-string element rejects the whole array
    pub fn string_array(&self, key: &str) -> Option<Vec<&str>> {
        self.array(key)?.iter().map(Value::as_str).collect()
    }

    /// Integer array; a single non-integer element rejects the whole array
    pub fn i64_array(&self, key: &str) -> Option<Vec<i64>> {
        self.array(key)?.iter().map(as_whole_i64).collect()
    }

    /// Numeric array; a single non-numeric element rejects the whole array
    pub fn f64_array(&self, key: &str) -> Option<Vec<f64>> {
        self.array(key)?.iter().map(as_finite_f64).collect()
    }

    /// Length of an array field, without inspecting its elements
    pub fn array_len(&self, key: &str) -> Option<usize> {
        self.array(key).map(<[Value]>::len)
    }

    /// Event label: `event_type`, falling back to the legacy `type` field
    ///
    /// `event_type` wins whenever it holds a non-empty string. Returns `None`
    /// when neither field carries a usable value.
    pub fn event_type(&self) -> Option<&str> {
        self.non_empty_string("event_type")
            .or_else(|| self.non_empty_string("type"))
    }

    pub fn non_empty_string(&self, key: &str) -> Option<&str> {
        self.string(key).filter(|s| !s.is_empty())
    }

    fn array(&self, key: &str) -> Option<&[Value]> {
        self.raw.get(key)?.as_array().map(Vec::as_slice)
    }
}

fn as_finite_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn as_whole_i64(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    let n = number.as_f64().filter(|n| n.is_finite())?;
    if n.fract() != 0.0 || n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return None;
    }
    Some(n as i64)
}

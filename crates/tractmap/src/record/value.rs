//! Attribute values and records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// `Missing` is the "no value" marker. It is distinct from `Number(0.0)`
/// and renders as `null` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A finite number.
    Number(f64),
    /// A boolean.
    Flag(bool),
    /// Free text.
    Text(String),
    /// No value.
    Missing,
}

impl Value {
    /// Parse a raw cell as a decimal number.
    ///
    /// NA-like cells, unparsable text and non-finite results all become
    /// `Missing`; parsing never fails.
    pub fn parse_number(raw: &str) -> Value {
        if is_null_value(raw) {
            return Value::Missing;
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Missing,
        }
    }

    /// Wrap a raw cell as text, or `Missing` for NA-like cells.
    pub fn text(raw: &str) -> Value {
        if is_null_value(raw) {
            Value::Missing
        } else {
            Value::Text(raw.to_string())
        }
    }

    /// Build a number, mapping NaN and infinities to `Missing`.
    pub fn number(n: f64) -> Value {
        if n.is_finite() {
            Value::Number(n)
        } else {
            Value::Missing
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this is the "no value" marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Convert from a GeoJSON property value.
    ///
    /// Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Flag(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::number).unwrap_or(Value::Missing),
            serde_json::Value::String(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    /// Convert to a GeoJSON property value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Flag(b) => serde_json::Value::Bool(*b),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Missing => serde_json::Value::Null,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Flag(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
        }
    }
}

/// An ordered mapping from attribute name to value.
pub type Record = IndexMap<String, Value>;

/// Check if a raw cell represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

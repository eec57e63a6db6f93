//! Join key normalization.

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Identifier used to match a tabular record to a geographic feature.
///
/// Keys are compared as normalized strings: text is trimmed and integral
/// numbers render without a fractional part, so `"11001000100"` and the
/// JSON number `11001000100` are equal. Zero-padding is not added unless
/// a [`KeyFormat`] asks for it, so `"01001"` and `1001` stay different.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinKey(String);

impl JoinKey {
    /// Build a key from raw text. Blank text has no key.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Build a key from an attribute value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Self::new(s),
            Value::Number(n) => Some(Self(format_number(*n))),
            Value::Flag(b) => Some(Self(b.to_string())),
            Value::Missing => None,
        }
    }

    /// The normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JoinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for JoinKey {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Consumer-supplied key formatting applied on both sides of a join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFormat {
    /// Left-pad purely numeric keys with zeros to this width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_pad: Option<usize>,
}

impl KeyFormat {
    /// Keys are used as normalized, with no padding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pad numeric keys to `width` digits.
    pub fn with_zero_pad(mut self, width: usize) -> Self {
        self.zero_pad = Some(width);
        self
    }

    /// Apply this format to a key.
    pub fn apply(&self, key: JoinKey) -> JoinKey {
        match self.zero_pad {
            Some(width)
                if key.0.len() < width && key.0.bytes().all(|b| b.is_ascii_digit()) =>
            {
                JoinKey(format!("{:0>width$}", key.0, width = width))
            }
            _ => key,
        }
    }

    /// Normalize a value into a formatted key.
    pub fn key_for(&self, value: &Value) -> Option<JoinKey> {
        JoinKey::from_value(value).map(|k| self.apply(k))
    }
}

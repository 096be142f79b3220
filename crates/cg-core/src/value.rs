//! Field values read off records

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single field value as seen by the engine.
///
/// `Null` doubles as the "missing" sentinel: fields that are absent on a
/// record resolve to it, so callers never need to tell the two apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// True for the missing sentinel
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Truthiness used when a value stands in for an identity key:
    /// missing, empty text, `false` and zero are all "absent".
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(_) | FieldValue::Map(_) => true,
        }
    }

    /// Convert a JSON value into a field value
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Null),
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.iter().map(FieldValue::from_json).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

/// Renders the value the way it is stringified for display and for
/// mixed-type comparison. Integral numbers print without a fraction.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            FieldValue::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

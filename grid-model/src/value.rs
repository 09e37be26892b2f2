//! FILENAME: grid-model/src/value.rs
//! PURPOSE: Defines the value a single row field can hold.
//! CONTEXT: Values are read out of rows through column accessors. The grid
//! never enforces a schema, so a missing field is represented explicitly
//! by `Value::Absent` instead of failing.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single field value inside a row.
///
/// Serialized untagged so rows read naturally as JSON objects:
/// `null` is `Absent`, and numbers, strings and booleans map directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Absent,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string representation used for matching and for
    /// ordering non-numeric values. Absent values render as "".
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Value::Absent => Cow::Borrowed(""),
            Value::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Cow::Owned(format!("{:.0}", n))
                } else {
                    Cow::Owned(format!("{}", n))
                }
            }
            Value::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Builds the key used by the sort stage for this value.
    pub fn order_key(&self) -> OrderKey {
        match self {
            Value::Absent => OrderKey::Absent,
            Value::Number(n) => OrderKey::Number(*n),
            other => OrderKey::Text(other.display_text().into_owned()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

// ============================================================================
// ORDERING
// ============================================================================

/// A precomputed, totally ordered sort key for a `Value`.
///
/// Order: absent values first, then numbers (numerically), then every
/// other value by its string representation.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderKey {
    Absent,
    Number(f64),
    Text(String),
}

impl OrderKey {
    fn rank(&self) -> u8 {
        match self {
            OrderKey::Absent => 0,
            OrderKey::Number(_) => 1,
            OrderKey::Text(_) => 2,
        }
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Number(a), OrderKey::Number(b)) => a.total_cmp(b),
            (OrderKey::Text(a), OrderKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

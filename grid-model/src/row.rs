//! FILENAME: grid-model/src/row.rs
//! PURPOSE: Defines the opaque record displayed as one table line.
//! CONTEXT: A row is a sparse map from field name to value. The grid only
//! reads rows; ownership of the data stays with whoever built them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Position of a row inside the source row set (0-based).
pub type RowIndex = usize;

/// A single record. Fields not present read as `Value::Absent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: FxHashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Row {
            fields: FxHashMap::default(),
        }
    }

    /// Builder-style field insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Looks up a field. Returns None when the row does not carry it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (field, value) in iter {
            row.insert(field, value);
        }
        row
    }
}

// ============================================================================
// ROW IDENTITY
// ============================================================================

/// A stable identifier for a row.
///
/// `Field` comes from a configured row-id accessor; `Source` is synthesized
/// from the row's position in the source set when no id is available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKey {
    Field(String),
    Source(RowIndex),
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKey::Field(id) => write!(f, "{}", id),
            RowKey::Source(index) => write!(f, "#{}", index),
        }
    }
}

//! FILENAME: datagrid-format/src/rows.rs
//! PURPOSE: Reads row sets from JSON documents.
//! CONTEXT: A row document is a JSON array of flat objects. `null` becomes
//! `Value::Absent`; nested arrays/objects are kept as their JSON text so
//! they still display and filter.

use std::fs;
use std::path::Path;

use grid_model::{Row, Value};
use log::debug;
use serde_json::Value as JsonValue;

use crate::error::FormatError;

fn to_value(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Absent,
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Absent),
        JsonValue::String(s) => Value::Text(s),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => Value::Text(nested.to_string()),
    }
}

/// Parses a JSON array of objects into rows.
pub fn rows_from_json(json: &str) -> Result<Vec<Row>, FormatError> {
    let document: JsonValue = serde_json::from_str(json)?;
    let JsonValue::Array(items) = document else {
        return Err(FormatError::InvalidFormat(
            "expected an array of row objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(fields) => Ok(fields
                .into_iter()
                .map(|(name, value)| (name, to_value(value)))
                .collect::<Row>()),
            other => Err(FormatError::InvalidFormat(format!(
                "row {} is not an object: {}",
                i, other
            ))),
        })
        .collect()
}

pub fn load_rows(path: &Path) -> Result<Vec<Row>, FormatError> {
    let json = fs::read_to_string(path)?;
    let rows = rows_from_json(&json)?;
    debug!("format: loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns are the union of object keys in first-seen order. A key absent from a row reads as
//! null. Nested objects and arrays are kept as their JSON text.

use std::fs;
use std::path::Path;

use crate::error::{QualityError, QualityResult};
use crate::types::{RowSet, Value};

/// Ingest JSON into an untyped [`RowSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> QualityResult<RowSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string into a [`RowSet`].
pub fn ingest_json_from_str(input: &str) -> QualityResult<RowSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QualityError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items),
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v)),
            _ => Err(QualityError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                QualityError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        ingest_json_values(&values)
    }
}

fn ingest_json_values(values: &[serde_json::Value]) -> QualityResult<RowSet> {
    let mut objects = Vec::with_capacity(values.len());
    let mut columns: Vec<String> = Vec::new();

    for (idx0, v) in values.iter().enumerate() {
        let obj = v.as_object().ok_or_else(|| QualityError::SchemaMismatch {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map(convert_json_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    RowSet::new(columns, rows)
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int64(i)
            } else {
                n.as_f64().map(Value::Float64).unwrap_or(Value::Null)
            }
        }
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        nested => Value::Utf8(nested.to_string()),
    }
}

//! CSV ingestion implementation.

use std::path::Path;

use crate::error::QualityResult;
use crate::types::{RowSet, Value};

/// Cell texts read as null, in addition to empty/whitespace-only cells.
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Ingest a CSV file into an untyped [`RowSet`].
///
/// Rules:
///
/// - CSV must have headers; every header becomes a column (names must be unique).
/// - Empty cells and [`NULL_TOKENS`] become [`Value::Null`].
/// - Other cells are read as an integer, then a finite float, then `true`/`false`, and
///   otherwise kept as trimmed text.
/// - Every record must have as many fields as the header.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> QualityResult<RowSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> QualityResult<RowSet> {
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(infer_value).collect());
    }

    RowSet::new(headers, rows)
}

/// Read one raw cell into a [`Value`].
pub fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed) {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int64(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Value::Float64(f);
        }
    }
    match parse_bool(trimmed) {
        Some(b) => Value::Bool(b),
        None => Value::Utf8(trimmed.to_owned()),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

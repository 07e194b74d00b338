//! Parquet ingestion implementation.

use std::collections::HashMap;
use std::path::Path;

use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::QualityResult;
use crate::types::{RowSet, Value};

/// Ingest a Parquet file into an untyped [`RowSet`].
///
/// Notes:
/// - Every leaf column (by column path string) becomes a column
/// - Uses the Parquet record API (`RowIter`)
/// - Integers and floats map to numeric values; dates, timestamps, decimals and binary values
///   are kept as their text rendering
pub fn ingest_parquet_from_path(path: impl AsRef<Path>) -> QualityResult<RowSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    let columns = parquet_leaf_column_paths(&reader);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row_res in reader.into_iter() {
        let row = row_res?;

        let map: HashMap<&str, &Field> = row
            .get_column_iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();

        rows.push(
            columns
                .iter()
                .map(|c| map.get(c.as_str()).map(|f| convert_parquet_field(f)).unwrap_or(Value::Null))
                .collect(),
        );
    }

    RowSet::new(columns, rows)
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Vec<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn convert_parquet_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Int64(i64::from(*v)),
        Field::Short(v) => Value::Int64(i64::from(*v)),
        Field::Int(v) => Value::Int64(i64::from(*v)),
        Field::Long(v) => Value::Int64(*v),
        Field::UByte(v) => Value::Int64(i64::from(*v)),
        Field::UShort(v) => Value::Int64(i64::from(*v)),
        Field::UInt(v) => Value::Int64(i64::from(*v)),
        Field::ULong(v) => i64::try_from(*v)
            .map(Value::Int64)
            .unwrap_or(Value::Float64(*v as f64)),
        Field::Float(v) => Value::Float64(f64::from(*v)),
        Field::Double(v) => Value::Float64(*v),
        Field::Str(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}

//! Core data model: raw cell [`Value`]s and the positionally-indexed [`RowSet`].
//!
//! Ingestion produces one [`RowSet`] per entity extract. Cells are *untyped* with respect to the
//! validation rules: a `Marks` column may hold integers, floats, text or nulls, and each rule
//! coerces what it needs (see [`crate::rules::coerce`]).

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{QualityError, QualityResult};

/// A single raw cell in a [`RowSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical text of a non-null value, used for duplicate grouping and key matching.
    ///
    /// Whole floats render without a fractional part, so `Int64(1)` and `Float64(1.0)` share
    /// the key `"1"`.
    pub fn key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Like [`Value::key`], with surrounding whitespace removed.
    pub fn trimmed_key(&self) -> Option<String> {
        self.key().map(|k| k.trim().to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular dataset with named columns and a stable row index.
///
/// Rows are stored row-major in column order. Every row carries the index it was assigned when
/// the set was created; filtering keeps those indices (they may become sparse) so findings can
/// always point back at the originating row. [`RowSet::reset_index`] renumbers `0..n`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    index: Vec<usize>,
    rows: Vec<Vec<Value>>,
}

impl RowSet {
    /// Create a row set from column names and rows, assigning row indices `0..n`.
    ///
    /// Fails with [`QualityError::ShapeMismatch`] if a row does not have one value per column,
    /// or with [`QualityError::SchemaMismatch`] on duplicate column names.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> QualityResult<Self> {
        let index = (0..rows.len()).collect();
        Self::with_index(columns, index, rows)
    }

    /// Create a row set with explicit (unique) row indices.
    pub fn with_index(
        columns: Vec<String>,
        index: Vec<usize>,
        rows: Vec<Vec<Value>>,
    ) -> QualityResult<Self> {
        check_unique_columns(&columns)?;
        if index.len() != rows.len() {
            return Err(QualityError::SchemaMismatch {
                message: format!(
                    "row index has {} entries but there are {} rows",
                    index.len(),
                    rows.len()
                ),
            });
        }
        for (pos, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(QualityError::ShapeMismatch {
                    row: pos,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        let mut seen = HashSet::with_capacity(index.len());
        for &i in &index {
            if !seen.insert(i) {
                return Err(QualityError::DuplicateRowIndex { index: i });
            }
        }
        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Create a row set from `(column name, column values)` pairs.
    ///
    /// All columns must have the same length.
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> QualityResult<Self> {
        let row_count = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();

        for (name, values) in columns {
            if values.len() != row_count {
                return Err(QualityError::SchemaMismatch {
                    message: format!(
                        "column '{name}' has {} values, expected {row_count}",
                        values.len()
                    ),
                });
            }
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
            names.push(name);
        }

        Self::new(names, rows)
    }

    /// A row set with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of a column by name, if present.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index_of(column).is_some()
    }

    /// Names from `required` that are not columns of this set.
    pub fn missing_columns<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|c| !self.has_column(c))
            .collect()
    }

    /// Stable row indices, in row order.
    pub fn row_indices(&self) -> &[usize] {
        &self.index
    }

    /// Row-major value storage, in row order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Row at position `pos` (not the stable row index).
    pub fn row(&self, pos: usize) -> Option<&[Value]> {
        self.rows.get(pos).map(Vec::as_slice)
    }

    /// Value at row position `pos` in `column`.
    pub fn cell(&self, pos: usize, column: &str) -> Option<&Value> {
        let idx = self.index_of(column)?;
        self.rows.get(pos).and_then(|r| r.get(idx))
    }

    /// Iterate `(row index, row)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Value])> {
        self.index
            .iter()
            .copied()
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Iterate `(row index, value)` pairs of one column, or `None` if the column is absent.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = (usize, &'a Value)> + 'a> {
        let idx = self.index_of(column)?;
        Some(self.iter().map(move |(i, row)| (i, &row[idx])))
    }

    /// Create a new row set containing only rows for which `predicate(row_index, row)` holds.
    ///
    /// Row indices of the retained rows are kept as-is.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(usize, &[Value]) -> bool,
    {
        let mut index = Vec::new();
        let mut rows = Vec::new();
        for (i, row) in self.iter() {
            if predicate(i, row) {
                index.push(i);
                rows.push(row.to_vec());
            }
        }
        Self {
            columns: self.columns.clone(),
            index,
            rows,
        }
    }

    /// Drop every row whose index is in `indices`. Retained rows keep their (now sparse) index.
    pub fn drop_rows(&self, indices: &BTreeSet<usize>) -> Self {
        self.filter_rows(|i, _| !indices.contains(&i))
    }

    /// Renumber rows `0..n`, preserving order.
    pub fn reset_index(mut self) -> Self {
        self.index = (0..self.rows.len()).collect();
        self
    }
}

fn check_unique_columns(columns: &[String]) -> QualityResult<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for c in columns {
        if !seen.insert(c.as_str()) {
            return Err(QualityError::SchemaMismatch {
                message: format!("duplicate column name '{c}'"),
            });
        }
    }
    Ok(())
}

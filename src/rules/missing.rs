//! Missing-value rules.

use crate::ledger::{ColumnRef, ExceptionRecord, IssueType};
use crate::types::{RowSet, Value};

use super::Rule;

/// One `Missing` record per null cell, naming the cell's column.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCells;

impl Rule for NullCells {
    fn name(&self) -> &str {
        "null_cells"
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let mut out = Vec::new();
        for (i, row) in rows.iter() {
            for (column, value) in rows.columns().iter().zip(row) {
                if value.is_null() {
                    out.push(ExceptionRecord::new(
                        i,
                        ColumnRef::column(column.as_str()),
                        IssueType::Missing,
                        "null value",
                    ));
                }
            }
        }
        out
    }
}

/// One row-level `Missing` record for every row holding at least one null.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRow;

impl Rule for NullRow {
    fn name(&self) -> &str {
        "null_row"
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        rows.iter()
            .filter(|(_, row)| row.iter().any(Value::is_null))
            .map(|(i, _)| {
                ExceptionRecord::new(i, ColumnRef::Row, IssueType::Missing, "Missing values in row")
            })
            .collect()
    }
}

/// `Missing` when a column is null or blank after trimming.
#[derive(Debug, Clone)]
pub struct RequiredText {
    column: String,
}

impl RequiredText {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Rule for RequiredText {
    fn name(&self) -> &str {
        "required_text"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.column.as_str()]
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let Some(values) = rows.column_values(&self.column) else {
            return Vec::new();
        };
        values
            .filter(|(_, v)| is_blank(v))
            .map(|(i, _)| {
                ExceptionRecord::new(
                    i,
                    ColumnRef::column(self.column.as_str()),
                    IssueType::Missing,
                    format!("{} is required", self.column),
                )
            })
            .collect()
    }
}

/// Null, or text that is empty after trimming.
pub(crate) fn is_blank(v: &Value) -> bool {
    v.trimmed_key().is_none_or(|k| k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{NullCells, NullRow, RequiredText};
    use crate::ledger::{ColumnRef, IssueType};
    use crate::rules::Rule;
    use crate::types::{RowSet, Value};

    fn rows() -> RowSet {
        RowSet::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Value::Null, Value::Null],
                vec![Value::Int64(1), Value::Utf8("  ".to_string())],
                vec![Value::Int64(2), Value::Utf8("x".to_string())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn null_cells_reports_each_cell() {
        let found = NullCells.evaluate(&rows(), None);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].column, ColumnRef::column("a"));
        assert_eq!(found[1].column, ColumnRef::column("b"));
        assert!(found.iter().all(|r| r.row_index == 0 && r.details == "null value"));
    }

    #[test]
    fn null_row_reports_once_per_row() {
        let found = NullRow.evaluate(&rows(), None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].column, ColumnRef::Row);
        assert_eq!(found[0].issue_type, IssueType::Missing);
    }

    #[test]
    fn required_text_treats_blank_as_missing() {
        let found = RequiredText::new("b").evaluate(&rows(), None);
        let idx: Vec<usize> = found.iter().map(|r| r.row_index).collect();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(found[0].details, "b is required");
    }
}

//! Duplicate detection over one column or a composite of columns.

use std::collections::HashMap;

use crate::ledger::{ColumnRef, ExceptionRecord, IssueType};
use crate::types::{RowSet, Value};

use super::Rule;

/// Flags *every* row whose value (or value combination) appears in two or more rows.
///
/// Values are compared by [`Value::key`]; nulls compare equal to each other.
#[derive(Debug, Clone)]
pub struct Uniqueness {
    columns: Vec<String>,
    issue: IssueType,
}

impl Uniqueness {
    /// Single-column uniqueness reported as `issue` (`Duplicate Key`, `Duplicate Value`, ...).
    pub fn column(column: impl Into<String>, issue: IssueType) -> Self {
        Self {
            columns: vec![column.into()],
            issue,
        }
    }

    /// Composite uniqueness over `columns`, taken as an ordered tuple.
    pub fn combination<I, S>(columns: I, issue: IssueType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            issue,
        }
    }

    fn column_ref(&self) -> ColumnRef {
        match self.columns.as_slice() {
            [single] => ColumnRef::column(single.as_str()),
            many => ColumnRef::Columns(many.to_vec()),
        }
    }

    fn details(&self, values: &[&Value]) -> String {
        match (self.columns.as_slice(), values) {
            ([column], [value]) => format!("{column}={value}"),
            _ => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("({}) appears more than once", parts.join(", "))
            }
        }
    }
}

impl Rule for Uniqueness {
    fn name(&self) -> &str {
        "uniqueness"
    }

    fn required_columns(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let Some(idxs) = self
            .columns
            .iter()
            .map(|c| rows.index_of(c))
            .collect::<Option<Vec<usize>>>()
        else {
            return Vec::new();
        };

        let keyed: Vec<(usize, Vec<&Value>, Vec<Option<String>>)> = rows
            .iter()
            .map(|(i, row)| {
                let values: Vec<&Value> = idxs.iter().map(|&c| &row[c]).collect();
                let key = values.iter().map(|v| v.key()).collect();
                (i, values, key)
            })
            .collect();

        let mut counts: HashMap<&[Option<String>], usize> = HashMap::new();
        for (_, _, key) in &keyed {
            *counts.entry(key.as_slice()).or_insert(0) += 1;
        }

        let column = self.column_ref();
        keyed
            .iter()
            .filter(|(_, _, key)| counts.get(key.as_slice()).copied().unwrap_or(0) > 1)
            .map(|(i, values, _)| {
                ExceptionRecord::new(*i, column.clone(), self.issue, self.details(values))
            })
            .collect()
    }
}

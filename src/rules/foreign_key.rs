//! Referential integrity against a reference row set.

use std::collections::HashSet;

use crate::ledger::{ColumnRef, ExceptionRecord, IssueType};
use crate::types::RowSet;

use super::Rule;

/// `FK Violation` when a non-blank value of `column` is absent from the key column of the
/// reference row set.
///
/// Values and keys compare by trimmed canonical text. Blank values are left to a separate
/// missing-value rule. If the reference is absent, lacks the key column, or has no non-null
/// keys, the check has nothing to compare against and reports nothing.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    column: String,
    reference_dataset: String,
    reference_column: String,
}

impl ForeignKey {
    pub fn new(
        column: impl Into<String>,
        reference_dataset: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            reference_dataset: reference_dataset.into(),
            reference_column: reference_column.into(),
        }
    }

    /// Distinct trimmed keys of the reference column.
    pub fn key_set(&self, reference: Option<&RowSet>) -> HashSet<String> {
        let Some(values) = reference.and_then(|r| r.column_values(&self.reference_column)) else {
            return HashSet::new();
        };
        values.filter_map(|(_, v)| v.trimmed_key()).collect()
    }
}

impl Rule for ForeignKey {
    fn name(&self) -> &str {
        "foreign_key"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.column.as_str()]
    }

    fn evaluate(&self, rows: &RowSet, reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let keys = self.key_set(reference);
        if keys.is_empty() {
            tracing::debug!(
                column = %self.column,
                reference = %self.reference_dataset,
                "no reference keys available, foreign key check has nothing to compare"
            );
            return Vec::new();
        }
        let Some(values) = rows.column_values(&self.column) else {
            return Vec::new();
        };

        values
            .filter_map(|(i, v)| {
                let key = v.trimmed_key().filter(|k| !k.is_empty())?;
                if keys.contains(&key) {
                    return None;
                }
                Some(ExceptionRecord::new(
                    i,
                    ColumnRef::column(self.column.as_str()),
                    IssueType::FkViolation,
                    format!(
                        "{}={key} not in {}.{}",
                        self.column, self.reference_dataset, self.reference_column
                    ),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ForeignKey;
    use crate::rules::Rule;
    use crate::types::{RowSet, Value};

    fn departments() -> RowSet {
        RowSet::new(
            vec!["Department_ID".to_string()],
            vec![
                vec![Value::Utf8("IDEPT1".to_string())],
                vec![Value::Utf8(" IDEPT2 ".to_string())],
                vec![Value::Null],
            ],
        )
        .unwrap()
    }

    fn admissions(values: Vec<Value>) -> RowSet {
        RowSet::new(
            vec!["Department_Admission".to_string()],
            values.into_iter().map(|v| vec![v]).collect(),
        )
        .unwrap()
    }

    fn rule() -> ForeignKey {
        ForeignKey::new("Department_Admission", "Department_Information", "Department_ID")
    }

    #[test]
    fn flags_unknown_keys_only() {
        let rows = admissions(vec![
            Value::Utf8("IDEPT1".to_string()),
            Value::Utf8("IDEPT2".to_string()),
            Value::Utf8("IDEPT9".to_string()),
            Value::Utf8("   ".to_string()),
            Value::Null,
        ]);
        let found = rule().evaluate(&rows, Some(&departments()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].row_index, 2);
        assert_eq!(
            found[0].details,
            "Department_Admission=IDEPT9 not in Department_Information.Department_ID"
        );
    }

    #[test]
    fn no_reference_keys_means_no_violations() {
        let rows = admissions(vec![Value::Utf8("IDEPT9".to_string())]);
        assert!(rule().evaluate(&rows, None).is_empty());

        let no_key_column = RowSet::new(vec!["Other".to_string()], vec![vec![Value::Int64(1)]]).unwrap();
        assert!(rule().evaluate(&rows, Some(&no_key_column)).is_empty());
    }
}

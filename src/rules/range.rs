//! Type and range rules for numeric columns.

use crate::ledger::{ColumnRef, ExceptionRecord, IssueType};
use crate::types::{RowSet, Value};

use super::Rule;
use super::coerce::{to_integer, to_real};

/// Evaluate `check` on every value of `column`, collecting findings in row order.
fn per_value<F>(rows: &RowSet, column: &str, mut check: F) -> Vec<ExceptionRecord>
where
    F: FnMut(&Value) -> Option<(IssueType, String)>,
{
    let Some(values) = rows.column_values(column) else {
        return Vec::new();
    };
    values
        .filter_map(|(i, v)| {
            check(v).map(|(issue, details)| {
                ExceptionRecord::new(i, ColumnRef::column(column), issue, details)
            })
        })
        .collect()
}

/// A year column that must hold an integer no smaller than `min`.
///
/// Null is out of range; a value that is not an integer is `Invalid Type`.
#[derive(Debug, Clone)]
pub struct MinimumYear {
    column: String,
    min: i64,
}

impl MinimumYear {
    pub fn new(column: impl Into<String>, min: i64) -> Self {
        Self {
            column: column.into(),
            min,
        }
    }
}

impl Rule for MinimumYear {
    fn name(&self) -> &str {
        "minimum_year"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.column.as_str()]
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let col = self.column.as_str();
        let min = self.min;
        per_value(rows, col, |v| {
            let out_of_range = || {
                (
                    IssueType::OutOfRange,
                    format!("{col}={v} (must be >={min})"),
                )
            };
            if v.is_null() {
                return Some(out_of_range());
            }
            match to_integer(v) {
                Ok(year) if year.value < min => Some(out_of_range()),
                Ok(_) => None,
                Err(_) => Some((IssueType::InvalidType, format!("{col}={v} (not integer)"))),
            }
        })
    }
}

/// A real-valued column bounded to `[min, max]` inclusive.
#[derive(Debug, Clone)]
pub struct RealRange {
    column: String,
    min: f64,
    max: f64,
}

impl RealRange {
    pub fn new(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }
}

impl Rule for RealRange {
    fn name(&self) -> &str {
        "real_range"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.column.as_str()]
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let col = self.column.as_str();
        let (min, max) = (self.min, self.max);
        per_value(rows, col, |v| match to_real(v) {
            // NaN fails both comparisons and lands here.
            Ok(x) if !(min <= x && x <= max) => Some((
                IssueType::OutOfRange,
                format!("{col}={v} not in [{min},{max}]"),
            )),
            Ok(_) => None,
            Err(_) => Some((IssueType::InvalidType, format!("{col}={v} not numeric"))),
        })
    }
}

/// A count column that must hold a whole number `>= 0`.
#[derive(Debug, Clone)]
pub struct NonNegativeInteger {
    column: String,
}

impl NonNegativeInteger {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Rule for NonNegativeInteger {
    fn name(&self) -> &str {
        "non_negative_integer"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.column.as_str()]
    }

    fn evaluate(&self, rows: &RowSet, _reference: Option<&RowSet>) -> Vec<ExceptionRecord> {
        let col = self.column.as_str();
        per_value(rows, col, |v| match to_integer(v) {
            Ok(n) if n.value < 0 || n.fractional => Some((
                IssueType::OutOfRange,
                format!("{col}={v} must be integer >= 0"),
            )),
            Ok(_) => None,
            Err(_) => Some((IssueType::InvalidType, format!("{col}={v} not integer"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MinimumYear, NonNegativeInteger, RealRange};
    use crate::ledger::IssueType;
    use crate::rules::Rule;
    use crate::types::{RowSet, Value};

    fn single_column(name: &str, values: Vec<Value>) -> RowSet {
        RowSet::new(
            vec![name.to_string()],
            values.into_iter().map(|v| vec![v]).collect(),
        )
        .unwrap()
    }

    fn issues(rule: &dyn Rule, rows: &RowSet) -> Vec<(usize, IssueType)> {
        rule.evaluate(rows, None)
            .into_iter()
            .map(|r| (r.row_index, r.issue_type))
            .collect()
    }

    #[test]
    fn minimum_year_classifies_values() {
        let rows = single_column(
            "DOE",
            vec![
                Value::Int64(2000),
                Value::Int64(1850),
                Value::Utf8("abc".to_string()),
                Value::Null,
                Value::Float64(1900.0),
                Value::Utf8("1901".to_string()),
            ],
        );
        let rule = MinimumYear::new("DOE", 1900);
        assert_eq!(
            issues(&rule, &rows),
            vec![
                (1, IssueType::OutOfRange),
                (2, IssueType::InvalidType),
                (3, IssueType::OutOfRange),
            ]
        );
        let details: Vec<String> = rule.evaluate(&rows, None).into_iter().map(|r| r.details).collect();
        assert_eq!(details[0], "DOE=1850 (must be >=1900)");
        assert_eq!(details[1], "DOE=abc (not integer)");
    }

    #[test]
    fn real_range_is_inclusive() {
        let rows = single_column(
            "Marks",
            vec![
                Value::Int64(0),
                Value::Int64(100),
                Value::Float64(100.5),
                Value::Int64(-1),
                Value::Utf8("abc".to_string()),
                Value::Null,
                Value::Utf8("55".to_string()),
            ],
        );
        let rule = RealRange::new("Marks", 0.0, 100.0);
        assert_eq!(
            issues(&rule, &rows),
            vec![
                (2, IssueType::OutOfRange),
                (3, IssueType::OutOfRange),
                (4, IssueType::InvalidType),
                (5, IssueType::OutOfRange),
            ]
        );
        let first = &rule.evaluate(&rows, None)[0];
        assert_eq!(first.details, "Marks=100.5 not in [0,100]");
    }

    #[test]
    fn non_negative_integer_rejects_fractions_and_negatives() {
        let rows = single_column(
            "Effort_Hours",
            vec![
                Value::Int64(3),
                Value::Int64(-2),
                Value::Float64(2.5),
                Value::Float64(4.0),
                Value::Utf8("lots".to_string()),
                Value::Null,
            ],
        );
        let rule = NonNegativeInteger::new("Effort_Hours");
        assert_eq!(
            issues(&rule, &rows),
            vec![
                (1, IssueType::OutOfRange),
                (2, IssueType::OutOfRange),
                (4, IssueType::InvalidType),
                (5, IssueType::InvalidType),
            ]
        );
    }
}

//! Exporting exception reports, row sets and the per-entity summary.
//!
//! Every entity gets a report, even when it has no findings: an empty report is written as the
//! header line alone, which is distinct from a report that was never produced.

use std::io::Write;

use serde::Serialize;

use crate::entity::Entity;
use crate::error::QualityResult;
use crate::ledger::{ExceptionLedger, ExceptionRecord, REPORT_HEADER};
use crate::types::{RowSet, Value};

/// File name of the cleaned performance table.
pub const CLEANED_FILE_NAME: &str = "Student_Performance_Data_cleaned.csv";
pub const SUMMARY_CSV_FILE_NAME: &str = "ETL_Exception_Summary.csv";
pub const SUMMARY_JSON_FILE_NAME: &str = "ETL_Exception_Summary.json";
pub const TRANSFORMED_FILE_NAME: &str = "transformed.csv";

/// Flat exception list for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    pub entity: Entity,
    pub records: Vec<ExceptionRecord>,
}

impl ExceptionReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<&ExceptionLedger> for ExceptionReport {
    fn from(ledger: &ExceptionLedger) -> Self {
        Self {
            entity: ledger.entity(),
            records: ledger.records().to_vec(),
        }
    }
}

/// One summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub dataset: String,
    pub exceptions: usize,
}

/// Exception counts per entity, in [`Entity::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    pub entries: Vec<SummaryEntry>,
}

impl Summary {
    /// Build a summary from reports. Entities without a report count zero exceptions.
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a ExceptionReport>) -> Self {
        let reports: Vec<&ExceptionReport> = reports.into_iter().collect();
        let entries = Entity::ALL
            .iter()
            .map(|&entity| SummaryEntry {
                dataset: entity.dataset_name().to_string(),
                exceptions: reports
                    .iter()
                    .filter(|r| r.entity == entity)
                    .map(|r| r.len())
                    .sum(),
            })
            .collect();
        Self { entries }
    }

    /// Total exceptions across entities.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.exceptions).sum()
    }
}

/// Write an exception report as CSV. The header is always written.
pub fn write_exception_report_csv<W: Write>(writer: W, report: &ExceptionReport) -> QualityResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;
    for record in &report.records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a row set as CSV (header + cells, nulls as empty fields).
pub fn write_row_set_csv<W: Write>(writer: W, rows: &RowSet) -> QualityResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(rows.columns())?;
    for row in rows.rows() {
        wtr.write_record(row.iter().map(cell_text))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the summary as CSV with header `dataset,exceptions`.
pub fn write_summary_csv<W: Write>(writer: W, summary: &Summary) -> QualityResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in &summary.entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the summary as a pretty-printed JSON array.
pub fn summary_to_json(summary: &Summary) -> QualityResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ExceptionReport, Summary, summary_to_json, write_exception_report_csv, write_row_set_csv,
        write_summary_csv,
    };
    use crate::entity::Entity;
    use crate::ledger::{ColumnRef, ExceptionRecord, IssueType};
    use crate::types::{RowSet, Value};

    fn to_string(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_report_is_header_only() {
        let report = ExceptionReport {
            entity: Entity::Employee,
            records: vec![],
        };
        let mut buf = Vec::new();
        write_exception_report_csv(&mut buf, &report).unwrap();
        assert_eq!(to_string(buf), "row_index,column,issue_type,details\n");
    }

    #[test]
    fn report_rows_use_report_labels() {
        let report = ExceptionReport {
            entity: Entity::Performance,
            records: vec![
                ExceptionRecord::new(3, ColumnRef::Row, IssueType::Missing, "Missing values in row"),
                ExceptionRecord::new(
                    4,
                    ColumnRef::Columns(vec!["Student_ID".into(), "Paper_ID".into()]),
                    IssueType::DuplicatePair,
                    "(5, 9) appears more than once",
                ),
            ],
        };
        let mut buf = Vec::new();
        write_exception_report_csv(&mut buf, &report).unwrap();
        assert_eq!(
            to_string(buf),
            "row_index,column,issue_type,details\n\
             3,(row),Missing,Missing values in row\n\
             4,\"Student_ID,Paper_ID\",Duplicate Pair,\"(5, 9) appears more than once\"\n"
        );
    }

    #[test]
    fn row_set_nulls_are_empty_fields() {
        let rows = RowSet::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Int64(1), Value::Null], vec![Value::Float64(2.5), Value::Utf8("x".into())]],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_row_set_csv(&mut buf, &rows).unwrap();
        assert_eq!(to_string(buf), "a,b\n1,\n2.5,x\n");
    }

    #[test]
    fn summary_lists_every_entity_in_order() {
        let reports = vec![
            ExceptionReport {
                entity: Entity::Performance,
                records: vec![ExceptionRecord::new(0, ColumnRef::Row, IssueType::Missing, "x")],
            },
            ExceptionReport {
                entity: Entity::Department,
                records: vec![],
            },
        ];
        let summary = Summary::from_reports(&reports);
        assert_eq!(summary.entries.len(), 4);
        assert_eq!(summary.entries[3].exceptions, 1);
        assert_eq!(summary.total(), 1);

        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &summary).unwrap();
        assert_eq!(
            to_string(buf),
            "dataset,exceptions\n\
             Department_Information,0\n\
             Employee_Information,0\n\
             Student_Counceling_Information,0\n\
             Student_Performance_Data,1\n"
        );

        let json = summary_to_json(&summary).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[3]["dataset"], "Student_Performance_Data");
        assert_eq!(parsed[3]["exceptions"], 1);
    }
}

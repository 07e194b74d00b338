//! Exception records, the per-entity ledger that accumulates them, and discard-set derivation.
//!
//! The ledger is the only output of rule evaluation. Which findings *disqualify* a row is a
//! separate, entity-specific [`DiscardPolicy`]; [`discard_set`] is a pure function of both.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::entity::{EFFORT_HOURS, Entity, MARKS};
use crate::report::ExceptionReport;

/// Header of every exported exception report, in column order.
pub const REPORT_HEADER: [&str; 4] = ["row_index", "column", "issue_type", "details"];

/// Kind of data-quality violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IssueType {
    #[serde(rename = "Missing")]
    Missing,
    #[serde(rename = "Duplicate Key")]
    DuplicateKey,
    #[serde(rename = "Duplicate Value")]
    DuplicateValue,
    #[serde(rename = "Out-of-Range")]
    OutOfRange,
    #[serde(rename = "Invalid Type")]
    InvalidType,
    #[serde(rename = "FK Violation")]
    FkViolation,
    #[serde(rename = "Duplicate Pair")]
    DuplicatePair,
}

impl IssueType {
    /// Label used in exported reports.
    pub fn label(self) -> &'static str {
        match self {
            IssueType::Missing => "Missing",
            IssueType::DuplicateKey => "Duplicate Key",
            IssueType::DuplicateValue => "Duplicate Value",
            IssueType::OutOfRange => "Out-of-Range",
            IssueType::InvalidType => "Invalid Type",
            IssueType::FkViolation => "FK Violation",
            IssueType::DuplicatePair => "Duplicate Pair",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What an exception points at inside its row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRef {
    /// A single named column.
    Column(String),
    /// The whole row (rendered `(row)`).
    Row,
    /// A combination of columns, e.g. a composite key (rendered comma-joined).
    Columns(Vec<String>),
}

impl ColumnRef {
    pub fn column(name: impl Into<String>) -> Self {
        ColumnRef::Column(name.into())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Column(name) => f.write_str(name),
            ColumnRef::Row => f.write_str("(row)"),
            ColumnRef::Columns(names) => f.write_str(&names.join(",")),
        }
    }
}

impl Serialize for ColumnRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One data-quality finding tied to its originating row.
///
/// `row_index` is the stable index of the row in the raw (pre-clean) row set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionRecord {
    pub row_index: usize,
    pub column: ColumnRef,
    pub issue_type: IssueType,
    pub details: String,
}

impl ExceptionRecord {
    pub fn new(
        row_index: usize,
        column: ColumnRef,
        issue_type: IssueType,
        details: impl Into<String>,
    ) -> Self {
        Self {
            row_index,
            column,
            issue_type,
            details: details.into(),
        }
    }
}

/// A rule that was not applied because the row set lacks some of its required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub rule: String,
    pub missing_columns: Vec<String>,
}

/// Exceptions recorded for one entity, in the order the rules produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionLedger {
    entity: Entity,
    records: Vec<ExceptionRecord>,
    skipped_rules: Vec<SkippedRule>,
}

impl ExceptionLedger {
    /// Create an empty ledger for `entity`.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            records: Vec::new(),
            skipped_rules: Vec::new(),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn push(&mut self, record: ExceptionRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ExceptionRecord>) {
        self.records.extend(records);
    }

    pub fn record_skipped(&mut self, rule: impl Into<String>, missing_columns: Vec<String>) {
        self.skipped_rules.push(SkippedRule {
            rule: rule.into(),
            missing_columns,
        });
    }

    /// All records, in rule order.
    pub fn records(&self) -> &[ExceptionRecord] {
        &self.records
    }

    /// Rules that were not applicable to this entity's row set.
    pub fn skipped_rules(&self) -> &[SkippedRule] {
        &self.skipped_rules
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per issue type.
    pub fn count_by_issue(&self) -> BTreeMap<IssueType, usize> {
        let mut out = BTreeMap::new();
        for r in &self.records {
            *out.entry(r.issue_type).or_insert(0) += 1;
        }
        out
    }

    /// Consume the ledger into its flat exception report.
    pub fn into_report(self) -> ExceptionReport {
        ExceptionReport {
            entity: self.entity,
            records: self.records,
        }
    }

    /// Row indices having at least one record of `issue` on `column`.
    pub fn rows_with(&self, issue: IssueType, column: &ColumnRef) -> BTreeSet<usize> {
        self.records
            .iter()
            .filter(|r| r.issue_type == issue && &r.column == column)
            .map(|r| r.row_index)
            .collect()
    }
}

/// Which `(column, issue)` findings disqualify a row from the cleaned output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscardPolicy {
    triggers: Vec<(ColumnRef, IssueType)>,
}

impl DiscardPolicy {
    /// A policy that never discards: findings are reported only.
    pub fn report_only() -> Self {
        Self::default()
    }

    pub fn new(triggers: Vec<(ColumnRef, IssueType)>) -> Self {
        Self { triggers }
    }

    /// Policy applied to `entity` by the pipeline.
    ///
    /// Only performance rows are dropped: a row-level `Missing`, or a `Marks`/`Effort_Hours`
    /// value that is `Invalid Type` or `Out-of-Range`. `Duplicate Pair` rows are reported and
    /// retained.
    pub fn for_entity(entity: Entity) -> Self {
        match entity {
            Entity::Performance => Self::new(vec![
                (ColumnRef::Row, IssueType::Missing),
                (ColumnRef::column(MARKS), IssueType::InvalidType),
                (ColumnRef::column(MARKS), IssueType::OutOfRange),
                (ColumnRef::column(EFFORT_HOURS), IssueType::InvalidType),
                (ColumnRef::column(EFFORT_HOURS), IssueType::OutOfRange),
            ]),
            Entity::Department | Entity::Employee | Entity::Counseling => Self::report_only(),
        }
    }

    pub fn disqualifies(&self, record: &ExceptionRecord) -> bool {
        self.triggers
            .iter()
            .any(|(col, issue)| *issue == record.issue_type && *col == record.column)
    }
}

/// Row indices of `ledger` disqualified under `policy`.
pub fn discard_set(ledger: &ExceptionLedger, policy: &DiscardPolicy) -> BTreeSet<usize> {
    ledger
        .records()
        .iter()
        .filter(|r| policy.disqualifies(r))
        .map(|r| r.row_index)
        .collect()
}

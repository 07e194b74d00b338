//! `edu-quality` is a data-quality rule engine for an institution's relational extracts:
//! departments, employees, student counseling (admission) records and student performance
//! records.
//!
//! For every entity it produces an exception report (one [`ledger::ExceptionRecord`] per
//! finding, pointing at the originating row), and for student performance it derives a cleaned,
//! re-indexed table from which disqualified rows have been removed.
//!
//! Data-quality findings are never errors. [`QualityError`] is reserved for I/O, decoding and
//! structural faults, which abort a run.
//!
//! ## What gets checked
//!
//! | Entity | Checks |
//! |---|---|
//! | `Department_Information` | null cells, duplicate `Department_ID`, duplicate `Department_Name`, `DOE` integer and `>= 1900` |
//! | `Employee_Information` | none (always an empty report) |
//! | `Student_Counceling_Information` | `Department_Admission` required and present in `Department_Information.Department_ID` |
//! | `Student_Performance_Data` | rows with nulls, `Marks` numeric in `[0, 100]`, `Effort_Hours` integer `>= 0`, duplicate `(Student_ID, Paper_ID)` |
//!
//! Only performance rows are discarded, and only for row-level missing values or bad
//! `Marks`/`Effort_Hours`. Duplicate pairs are reported but kept.
//!
//! ## Quick example: in-memory run
//!
//! ```rust
//! use edu_quality::entity::Entity;
//! use edu_quality::pipeline::{run, EntityInputs};
//! use edu_quality::types::{RowSet, Value};
//!
//! # fn main() -> Result<(), edu_quality::QualityError> {
//! let s = |v: &str| Value::Utf8(v.to_string());
//! let inputs = EntityInputs {
//!     department: RowSet::new(
//!         vec!["Department_ID".into(), "Department_Name".into(), "DOE".into()],
//!         vec![vec![s("IDEPT1"), s("Physics"), Value::Int64(1950)]],
//!     )?,
//!     employee: RowSet::empty(),
//!     counseling: RowSet::new(
//!         vec!["Student_ID".into(), "Department_Admission".into()],
//!         vec![vec![s("SID1"), s("IDEPT1")]],
//!     )?,
//!     performance: RowSet::new(
//!         vec!["Student_ID".into(), "Paper_ID".into(), "Marks".into(), "Effort_Hours".into()],
//!         vec![
//!             vec![s("SID1"), s("P1"), Value::Int64(88), Value::Int64(4)],
//!             vec![s("SID1"), s("P2"), Value::Int64(-3), Value::Int64(4)],
//!         ],
//!     )?,
//! };
//!
//! let outcome = run(&inputs)?;
//! assert_eq!(outcome.report(Entity::Performance).len(), 1);
//! assert_eq!(outcome.cleaned.row_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## From files
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use edu_quality::observability::TracingObserver;
//! use edu_quality::pipeline::{run_from_dir, PipelineOptions};
//!
//! # fn main() -> Result<(), edu_quality::QualityError> {
//! let opts = PipelineOptions {
//!     observer: Some(Arc::new(TracingObserver)),
//!     ..Default::default()
//! };
//! // Reads `data/*.csv`, writes reports into `etl_outputs/`.
//! let outcome = run_from_dir(&opts)?;
//! println!("exceptions={}", outcome.summary.total());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV, JSON/NDJSON and Parquet loading into [`types::RowSet`]
//! - [`rules`]: the rule trait, coercion helpers and per-entity catalogues
//! - [`ledger`]: exception records, ledgers and discard-set derivation
//! - [`processing`]: cleaning and the joined analysis table
//! - [`report`]: CSV/JSON export
//! - [`pipeline`]: end-to-end driver
//! - [`observability`]: observer hooks
//! - [`error`]: error types

pub mod entity;
pub mod error;
pub mod ingestion;
pub mod ledger;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod rules;
pub mod types;

pub use error::{QualityError, QualityResult};

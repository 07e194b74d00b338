//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - loads the file into an untyped [`crate::types::RowSet`]
//! - optionally reports loads/failures/alerts to a [`crate::observability::QualityObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]

pub mod csv;
pub mod json;
pub mod parquet;
pub mod unified;

pub(crate) use unified::ingest_entity;
pub use unified::{IngestionFormat, IngestionOptions, IngestionRequest, infer_format_from_path, ingest_from_path};

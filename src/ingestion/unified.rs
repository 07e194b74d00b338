//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which loads a file into an untyped
//! [`crate::types::RowSet`].
//!
//! - If [`IngestionOptions::format`] is `None`, the ingestion format is inferred from the file
//!   extension.
//! - If a [`crate::observability::QualityObserver`] is provided, loads, failures and alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::entity::Entity;
use crate::error::{QualityError, QualityResult};
use crate::observability::{LoadStats, QualityObserver, QualitySeverity, Stage, StageContext, report_failure};
use crate::types::RowSet;

use super::{csv, json, parquet};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn QualityObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: QualitySeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: QualitySeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// When an observer is configured, this function reports:
///
/// - `on_loaded` on success, with row and column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use edu_quality::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), edu_quality::QualityError> {
/// // Uses `.csv` to select CSV ingestion.
/// let rows = ingest_from_path("data/Student_Performance_Data.csv", &IngestionOptions::default())?;
/// println!("rows={}", rows.row_count());
/// # Ok(())
/// # }
/// ```
///
/// Force a format when the file has no usable extension:
///
/// ```no_run
/// use edu_quality::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
///
/// # fn main() -> Result<(), edu_quality::QualityError> {
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Json),
///     ..Default::default()
/// };
/// let rows = ingest_from_path("departments.export", &opts)?;
/// println!("rows={}", rows.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> QualityResult<RowSet> {
    ingest_with_context(path.as_ref(), None, options)
}

/// Same as [`ingest_from_path`], tagging observer events with the entity being loaded.
pub(crate) fn ingest_entity(path: &Path, entity: Entity, options: &IngestionOptions) -> QualityResult<RowSet> {
    ingest_with_context(path, Some(entity), options)
}

fn ingest_with_context(
    path: &Path,
    entity: Option<Entity>,
    options: &IngestionOptions,
) -> QualityResult<RowSet> {
    let mut ctx = StageContext::new(Stage::Load).with_path(path);
    ctx.entity = entity;

    let fmt = match options.format {
        Some(f) => f,
        None => match infer_format_from_path(path) {
            Ok(f) => f,
            Err(e) => {
                report_failure(options.observer.as_ref(), &ctx, options.alert_at_or_above, &e);
                return Err(e);
            }
        },
    };
    let ctx = ctx.with_format(fmt);

    let result = match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path),
        IngestionFormat::Json => json::ingest_json_from_path(path),
        IngestionFormat::Parquet => parquet::ingest_parquet_from_path(path),
    };

    match &result {
        Ok(rows) => {
            tracing::debug!(path = %path.display(), format = ?fmt, rows = rows.row_count(), "loaded");
            if let Some(obs) = options.observer.as_ref() {
                obs.on_loaded(
                    &ctx,
                    LoadStats {
                        rows: rows.row_count(),
                        columns: rows.columns().len(),
                    },
                );
            }
        }
        Err(e) => report_failure(options.observer.as_ref(), &ctx, options.alert_at_or_above, e),
    }

    result
}

/// Infer the ingestion format from a path's extension.
pub fn infer_format_from_path(path: &Path) -> QualityResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| QualityError::SchemaMismatch {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| QualityError::SchemaMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Convenience helper for callers that want an owned request object.
///
/// This can be useful if you want to enqueue loads in a job system.
#[derive(Debug, Clone)]
pub struct IngestionRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> QualityResult<RowSet> {
        ingest_from_path(&self.path, &self.options)
    }
}

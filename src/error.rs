use thiserror::Error;

/// Convenience result type for loading, validating and persisting datasets.
pub type QualityResult<T> = Result<T, QualityError>;

/// Error type returned by the crate.
///
/// Data-quality findings are *not* errors; they are recorded as
/// [`crate::ledger::ExceptionRecord`]s. This enum covers infrastructure failures (I/O, decoding)
/// and structural faults in a [`crate::types::RowSet`], which abort a run.
#[derive(Debug, Error)]
pub enum QualityError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding/encoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet decoding error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON decoding/encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have a usable tabular shape (duplicate headers, non-object rows, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A row does not carry exactly one value per column.
    #[error("row set shape mismatch at row {row}: expected {expected} values, found {found}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Stable row indices must be unique within a row set.
    #[error("duplicate row index {index}")]
    DuplicateRowIndex { index: usize },
}

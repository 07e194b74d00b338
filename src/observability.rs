//! Observer hooks for loading, validating, cleaning and writing datasets.
//!
//! Observers receive outcomes of each pipeline stage; they never influence results.
//! Implementations here log to stderr, append to a file, forward to `tracing`, or fan out to
//! several observers.

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::entity::Entity;
use crate::error::QualityError;
use crate::ingestion::IngestionFormat;
use crate::ledger::ExceptionLedger;
use crate::processing::CleanStats;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualitySeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Validate,
    Clean,
    Transform,
    Write,
}

/// Where an event happened.
#[derive(Debug, Clone, PartialEq)]
pub struct StageContext {
    pub stage: Stage,
    pub entity: Option<Entity>,
    pub path: Option<PathBuf>,
    pub format: Option<IngestionFormat>,
}

impl StageContext {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            entity: None,
            path: None,
            format: None,
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_format(mut self, format: IngestionFormat) -> Self {
        self.format = Some(format);
        self
    }
}

impl fmt::Display for StageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage={:?}", self.stage)?;
        if let Some(entity) = self.entity {
            write!(f, " entity={entity}")?;
        }
        if let Some(format) = self.format {
            write!(f, " format={format:?}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " path={}", path.display())?;
        }
        Ok(())
    }
}

/// Shape of a successfully loaded row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows: usize,
    pub columns: usize,
}

/// Observer interface for pipeline outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait QualityObserver: Send + Sync {
    /// Called when a row set was loaded.
    fn on_loaded(&self, _ctx: &StageContext, _stats: LoadStats) {}

    /// Called once per entity after its rule catalogue ran.
    fn on_validated(&self, _entity: Entity, _ledger: &ExceptionLedger) {}

    /// Called after the cleaner derived a retained subset.
    fn on_cleaned(&self, _entity: Entity, _stats: CleanStats) {}

    /// Called when a stage fails.
    fn on_failure(&self, _ctx: &StageContext, _severity: QualitySeverity, _error: &QualityError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Classify an error for observer callbacks.
///
/// I/O failures (including those wrapped by the CSV, JSON or Parquet layers) are
/// [`QualitySeverity::Critical`]; everything else is [`QualitySeverity::Error`].
pub fn severity_for_error(e: &QualityError) -> QualitySeverity {
    match e {
        QualityError::Io(_) => QualitySeverity::Critical,
        QualityError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => QualitySeverity::Critical,
            _ => QualitySeverity::Error,
        },
        QualityError::Json(err) if err.is_io() => QualitySeverity::Critical,
        QualityError::Parquet(err) => {
            // Parquet errors do not always expose IO structurally; look through the source chain.
            if error_chain_contains_io(err) {
                QualitySeverity::Critical
            } else {
                QualitySeverity::Error
            }
        }
        QualityError::Json(_)
        | QualityError::SchemaMismatch { .. }
        | QualityError::ShapeMismatch { .. }
        | QualityError::DuplicateRowIndex { .. } => QualitySeverity::Error,
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Report a failure to `observer`, alerting when `severity >= alert_at_or_above`.
pub(crate) fn report_failure(
    observer: Option<&Arc<dyn QualityObserver>>,
    ctx: &StageContext,
    alert_at_or_above: QualitySeverity,
    error: &QualityError,
) {
    if let Some(obs) = observer {
        let sev = severity_for_error(error);
        obs.on_failure(ctx, sev, error);
        if sev >= alert_at_or_above {
            obs.on_alert(ctx, sev, error);
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn QualityObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn QualityObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl QualityObserver for CompositeObserver {
    fn on_loaded(&self, ctx: &StageContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_loaded(ctx, stats);
        }
    }

    fn on_validated(&self, entity: Entity, ledger: &ExceptionLedger) {
        for o in &self.observers {
            o.on_validated(entity, ledger);
        }
    }

    fn on_cleaned(&self, entity: Entity, stats: CleanStats) {
        for o in &self.observers {
            o.on_cleaned(entity, stats);
        }
    }

    fn on_failure(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl QualityObserver for StdErrObserver {
    fn on_loaded(&self, ctx: &StageContext, stats: LoadStats) {
        eprintln!("[etl][ok] {ctx} rows={} columns={}", stats.rows, stats.columns);
    }

    fn on_validated(&self, entity: Entity, ledger: &ExceptionLedger) {
        eprintln!(
            "[etl][validated] entity={entity} exceptions={} skipped_rules={}",
            ledger.len(),
            ledger.skipped_rules().len()
        );
    }

    fn on_cleaned(&self, entity: Entity, stats: CleanStats) {
        eprintln!(
            "[etl][cleaned] entity={entity} input={} discarded={} retained={}",
            stats.input_rows, stats.discarded, stats.retained
        );
    }

    fn on_failure(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        eprintln!("[etl][{severity:?}] {ctx} err={error}");
    }

    fn on_alert(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        eprintln!("[ALERT][etl][{severity:?}] {ctx} err={error}");
    }
}

/// Forwards events to the `tracing` facade.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl QualityObserver for TracingObserver {
    fn on_loaded(&self, ctx: &StageContext, stats: LoadStats) {
        tracing::info!(context = %ctx, rows = stats.rows, columns = stats.columns, "row set loaded");
    }

    fn on_validated(&self, entity: Entity, ledger: &ExceptionLedger) {
        tracing::info!(
            entity = %entity,
            exceptions = ledger.len(),
            skipped_rules = ledger.skipped_rules().len(),
            "entity validated"
        );
    }

    fn on_cleaned(&self, entity: Entity, stats: CleanStats) {
        tracing::info!(
            entity = %entity,
            input = stats.input_rows,
            discarded = stats.discarded,
            retained = stats.retained,
            "rows cleaned"
        );
    }

    fn on_failure(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        tracing::error!(context = %ctx, severity = ?severity, error = %error, "stage failed");
    }

    fn on_alert(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        tracing::error!(context = %ctx, severity = ?severity, error = %error, alert = true, "stage failed");
    }
}

/// Appends events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl QualityObserver for FileObserver {
    fn on_loaded(&self, ctx: &StageContext, stats: LoadStats) {
        self.append_line(&format!(
            "{} ok {ctx} rows={} columns={}",
            unix_ts(),
            stats.rows,
            stats.columns
        ));
    }

    fn on_validated(&self, entity: Entity, ledger: &ExceptionLedger) {
        self.append_line(&format!(
            "{} validated entity={entity} exceptions={}",
            unix_ts(),
            ledger.len()
        ));
    }

    fn on_cleaned(&self, entity: Entity, stats: CleanStats) {
        self.append_line(&format!(
            "{} cleaned entity={entity} discarded={} retained={}",
            unix_ts(),
            stats.discarded,
            stats.retained
        ));
    }

    fn on_failure(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        self.append_line(&format!(
            "{} fail severity={severity:?} {ctx} err={error}",
            unix_ts()
        ));
    }

    fn on_alert(&self, ctx: &StageContext, severity: QualitySeverity, error: &QualityError) {
        self.append_line(&format!(
            "{} ALERT severity={severity:?} {ctx} err={error}",
            unix_ts()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

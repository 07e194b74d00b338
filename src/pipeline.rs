//! End-to-end driver: load, validate, clean, transform and persist.
//!
//! [`run`] is the in-memory core and never touches the filesystem. [`run_from_dir`] wraps it
//! with loading (entity files are read in parallel) and writing of every output file.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::entity::Entity;
use crate::error::{QualityError, QualityResult};
use crate::ingestion::{IngestionOptions, ingest_entity};
use crate::ledger::{DiscardPolicy, ExceptionLedger, SkippedRule, discard_set};
use crate::observability::{QualityObserver, QualitySeverity, Stage, StageContext, report_failure};
use crate::processing::{CleanStats, build_transformed, clean_with_stats};
use crate::report::{
    CLEANED_FILE_NAME, ExceptionReport, SUMMARY_CSV_FILE_NAME, SUMMARY_JSON_FILE_NAME, Summary,
    TRANSFORMED_FILE_NAME, summary_to_json, write_exception_report_csv, write_row_set_csv,
    write_summary_csv,
};
use crate::rules::rules_for;
use crate::types::RowSet;

/// Raw row sets of the four entities.
#[derive(Debug, Clone)]
pub struct EntityInputs {
    pub department: RowSet,
    pub employee: RowSet,
    pub counseling: RowSet,
    pub performance: RowSet,
}

impl EntityInputs {
    pub fn get(&self, entity: Entity) -> &RowSet {
        match entity {
            Entity::Department => &self.department,
            Entity::Employee => &self.employee,
            Entity::Counseling => &self.counseling,
            Entity::Performance => &self.performance,
        }
    }
}

/// Report of one entity plus the rules that could not be applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReport {
    pub report: ExceptionReport,
    pub skipped_rules: Vec<SkippedRule>,
}

impl From<ExceptionLedger> for EntityReport {
    fn from(ledger: ExceptionLedger) -> Self {
        let skipped_rules = ledger.skipped_rules().to_vec();
        Self {
            report: ledger.into_report(),
            skipped_rules,
        }
    }
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// One report per entity, in [`Entity::ALL`] order.
    pub reports: [EntityReport; 4],
    /// Original performance row indices excluded from the cleaned table.
    pub discard: BTreeSet<usize>,
    pub cleaned: RowSet,
    pub clean_stats: CleanStats,
    pub summary: Summary,
    pub transformed: RowSet,
}

impl PipelineOutcome {
    pub fn report(&self, entity: Entity) -> &ExceptionReport {
        &self.reports[entity_slot(entity)].report
    }
}

fn entity_slot(entity: Entity) -> usize {
    match entity {
        Entity::Department => 0,
        Entity::Employee => 1,
        Entity::Counseling => 2,
        Entity::Performance => 3,
    }
}

/// Validate and clean in memory.
///
/// Counseling is checked against the department row set. Only the performance entity is
/// cleaned; the other entities are report-only.
pub fn run(inputs: &EntityInputs) -> QualityResult<PipelineOutcome> {
    run_observed(inputs, None)
}

fn run_observed(
    inputs: &EntityInputs,
    observer: Option<&Arc<dyn QualityObserver>>,
) -> QualityResult<PipelineOutcome> {
    let ledgers = Entity::ALL.map(|entity| {
        let reference = match entity {
            Entity::Counseling => Some(&inputs.department),
            _ => None,
        };
        let ledger = rules_for(entity).apply(inputs.get(entity), reference);
        tracing::info!(entity = %entity, exceptions = ledger.len(), "validated");
        if let Some(obs) = observer {
            obs.on_validated(entity, &ledger);
        }
        ledger
    });

    let performance_ledger = &ledgers[entity_slot(Entity::Performance)];
    let discard = discard_set(
        performance_ledger,
        &DiscardPolicy::for_entity(Entity::Performance),
    );
    let (cleaned, clean_stats) = clean_with_stats(&inputs.performance, &discard);
    tracing::info!(
        input = clean_stats.input_rows,
        discarded = clean_stats.discarded,
        retained = clean_stats.retained,
        "performance cleaned"
    );
    if let Some(obs) = observer {
        obs.on_cleaned(Entity::Performance, clean_stats);
    }

    let transformed = build_transformed(&cleaned, &inputs.counseling, &inputs.department)?;

    let reports = ledgers.map(EntityReport::from);
    let summary = Summary::from_reports(reports.iter().map(|r| &r.report));

    Ok(PipelineOutcome {
        reports,
        discard,
        cleaned,
        clean_stats,
        summary,
        transformed,
    })
}

/// File names of the four raw extracts, relative to [`PipelineOptions::input_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub department: PathBuf,
    pub employee: PathBuf,
    pub counseling: PathBuf,
    pub performance: PathBuf,
}

impl InputFiles {
    pub fn get(&self, entity: Entity) -> &Path {
        match entity {
            Entity::Department => &self.department,
            Entity::Employee => &self.employee,
            Entity::Counseling => &self.counseling,
            Entity::Performance => &self.performance,
        }
    }
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            department: Entity::Department.default_file_name().into(),
            employee: Entity::Employee.default_file_name().into(),
            counseling: Entity::Counseling.default_file_name().into(),
            performance: Entity::Performance.default_file_name().into(),
        }
    }
}

/// Options for [`run_from_dir`].
#[derive(Clone)]
pub struct PipelineOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub inputs: InputFiles,
    /// Treat an absent input file as an empty row set instead of failing.
    pub allow_missing_inputs: bool,
    /// Also write the joined analysis table.
    pub write_transformed: bool,
    pub observer: Option<Arc<dyn QualityObserver>>,
    pub alert_at_or_above: QualitySeverity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("inputs", &self.inputs)
            .field("allow_missing_inputs", &self.allow_missing_inputs)
            .field("write_transformed", &self.write_transformed)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("etl_outputs"),
            inputs: InputFiles::default(),
            allow_missing_inputs: false,
            write_transformed: true,
            observer: None,
            alert_at_or_above: QualitySeverity::Critical,
        }
    }
}

/// Load the four extracts, run the rules, and write every output into `output_dir`.
///
/// Nothing is written when loading or validation fails.
///
/// ```no_run
/// use edu_quality::pipeline::{run_from_dir, PipelineOptions};
///
/// # fn main() -> Result<(), edu_quality::QualityError> {
/// let outcome = run_from_dir(&PipelineOptions::default())?;
/// println!("exceptions={}", outcome.summary.total());
/// # Ok(())
/// # }
/// ```
pub fn run_from_dir(options: &PipelineOptions) -> QualityResult<PipelineOutcome> {
    let inputs = load_inputs(options)?;
    let outcome = run_observed(&inputs, options.observer.as_ref())?;

    if let Err(e) = write_outputs(&outcome, options) {
        let ctx = StageContext::new(Stage::Write).with_path(&options.output_dir);
        report_failure(options.observer.as_ref(), &ctx, options.alert_at_or_above, &e);
        return Err(e);
    }
    tracing::info!(
        output_dir = %options.output_dir.display(),
        exceptions = outcome.summary.total(),
        "outputs written"
    );
    Ok(outcome)
}

fn load_inputs(options: &PipelineOptions) -> QualityResult<EntityInputs> {
    let ingestion = IngestionOptions {
        format: None,
        observer: options.observer.clone(),
        alert_at_or_above: options.alert_at_or_above,
    };

    let mut loaded: Vec<RowSet> = Entity::ALL
        .par_iter()
        .map(|&entity| load_entity(entity, options, &ingestion))
        .collect::<QualityResult<_>>()?;

    // `collect` keeps `Entity::ALL` order.
    let performance = loaded.pop().unwrap_or_default();
    let counseling = loaded.pop().unwrap_or_default();
    let employee = loaded.pop().unwrap_or_default();
    let department = loaded.pop().unwrap_or_default();
    Ok(EntityInputs {
        department,
        employee,
        counseling,
        performance,
    })
}

fn load_entity(entity: Entity, options: &PipelineOptions, ingestion: &IngestionOptions) -> QualityResult<RowSet> {
    let path = options.input_dir.join(options.inputs.get(entity));
    if !path.exists() && options.allow_missing_inputs {
        tracing::warn!(entity = %entity, path = %path.display(), "input file missing; using an empty row set");
        return Ok(RowSet::empty());
    }
    ingest_entity(&path, entity, ingestion)
}

fn write_outputs(outcome: &PipelineOutcome, options: &PipelineOptions) -> QualityResult<()> {
    let dir = &options.output_dir;
    fs::create_dir_all(dir)?;

    for entry in &outcome.reports {
        let path = dir.join(entry.report.entity.exceptions_file_name());
        write_exception_report_csv(create(&path)?, &entry.report)?;
    }
    write_row_set_csv(create(&dir.join(CLEANED_FILE_NAME))?, &outcome.cleaned)?;
    write_summary_csv(create(&dir.join(SUMMARY_CSV_FILE_NAME))?, &outcome.summary)?;
    fs::write(dir.join(SUMMARY_JSON_FILE_NAME), summary_to_json(&outcome.summary)?)?;
    if options.write_transformed {
        write_row_set_csv(create(&dir.join(TRANSFORMED_FILE_NAME))?, &outcome.transformed)?;
    }
    Ok(())
}

fn create(path: &Path) -> QualityResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(QualityError::from)
}

//! Shared "catalog pipeline" used by both `seg run` and `seg demo`.
//!
//! load catalog (CSV or synthetic) -> evaluate + compare per record -> summarize
//!
//! The command handlers then only deal with presentation and exports.

use std::path::PathBuf;

use chrono::Utc;

use crate::data::{SampleSpec, generate_catalog};
use crate::domain::{EngineConfig, ObjectRecord};
use crate::error::AppError;
use crate::eval::{BatchOptions, BatchRun, run_batch};
use crate::io::{RowError, RunMetadata, SummaryFile, load_catalog};

/// Where the records of a run come from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Csv(PathBuf),
    Synthetic(SampleSpec),
}

/// All computed outputs of a single batch run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub metadata: RunMetadata,
    pub run: BatchRun,
    /// Rows rejected at ingest; always empty for synthetic catalogs.
    pub row_errors: Vec<RowError>,
}

impl PipelineOutput {
    pub fn summary_file(&self) -> SummaryFile {
        SummaryFile::new(self.metadata.clone(), self.run.summary.clone(), self.row_errors.len())
    }
}

/// Execute the full pipeline for one catalog.
pub fn run_catalog(
    source: CatalogSource,
    config: &EngineConfig,
    options: &BatchOptions,
) -> Result<PipelineOutput, AppError> {
    let (records, row_errors) = load_records(source, config)?;
    for e in &row_errors {
        tracing::warn!(line = e.line, id = ?e.id, "row skipped: {}", e.message);
    }
    run_records(&records, row_errors, config, options)
}

/// Execute the pipeline on records already in memory.
pub fn run_records(
    records: &[ObjectRecord],
    row_errors: Vec<RowError>,
    config: &EngineConfig,
    options: &BatchOptions,
) -> Result<PipelineOutput, AppError> {
    if records.is_empty() {
        return Err(AppError::new(3, "No records to evaluate."));
    }

    let metadata = RunMetadata::new(*config, Utc::now());
    let span = tracing::info_span!("batch", run_id = %metadata.run_id);
    let _guard = span.enter();

    let run = run_batch(records, config, options)?;
    if run.summary.evaluated == 0 {
        return Err(AppError::new(3, "Every record failed; nothing was evaluated."));
    }

    Ok(PipelineOutput {
        metadata,
        run,
        row_errors,
    })
}

fn load_records(
    source: CatalogSource,
    config: &EngineConfig,
) -> Result<(Vec<ObjectRecord>, Vec<RowError>), AppError> {
    match source {
        CatalogSource::Csv(path) => {
            let catalog = load_catalog(&path)?;
            Ok((catalog.records, catalog.row_errors))
        }
        CatalogSource::Synthetic(spec) => Ok((generate_catalog(&spec, config)?, Vec::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::FailurePolicy;

    #[test]
    fn synthetic_pipeline_runs_end_to_end() {
        let spec = SampleSpec {
            count: 64,
            ..SampleSpec::default()
        };
        let out = run_catalog(
            CatalogSource::Synthetic(spec),
            &EngineConfig::default(),
            &BatchOptions::default(),
        )
        .unwrap();
        assert_eq!(out.run.outcomes.len(), 64);
        assert_eq!(out.run.summary.failed, 0);
        assert!(out.metadata.run_id.starts_with("run_"));
        assert_eq!(out.summary_file().rows_rejected, 0);
    }

    #[test]
    fn empty_catalog_is_insufficient_data() {
        let err = run_records(&[], Vec::new(), &EngineConfig::default(), &BatchOptions::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn halting_run_surfaces_the_record_error() {
        let records = vec![ObjectRecord::new("neg", -1.0, 1.0)];
        let opts = BatchOptions {
            policy: FailurePolicy::Halt,
            parallel: false,
        };
        let err = run_records(&records, Vec::new(), &EngineConfig::default(), &opts).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

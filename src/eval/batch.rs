//! Batch execution over a catalog.
//!
//! Each record is evaluated and compared independently (parallel via rayon).
//! Per-record outcomes keep input order; the summary is reduced with
//! [`BatchSummary::merge`], so its counts do not depend on scheduling.

use rayon::prelude::*;

use crate::domain::{Comparison, EngineConfig, EvaluationResult, ObjectRecord};
use crate::error::{SegError, SegResult};
use crate::eval::aggregate::BatchSummary;
use crate::eval::comparator::compare;
use crate::eval::processor::evaluate;

/// What to do when a record fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Count the failure and keep going.
    #[default]
    Skip,
    /// Stop at the first failing record (in input order).
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub policy: FailurePolicy,
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::Skip,
            parallel: true,
        }
    }
}

/// Successful evaluation of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub result: EvaluationResult,
    pub comparison: Comparison,
}

/// Outcome for one record: scored, or the explicit error.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub id: String,
    pub outcome: Result<Scored, SegError>,
}

/// All outcomes of a run plus their summary.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub outcomes: Vec<RecordOutcome>,
    pub summary: BatchSummary,
}

/// Evaluate and compare a single record against its own observation.
pub fn score_record(record: &ObjectRecord, config: &EngineConfig) -> SegResult<Scored> {
    let result = evaluate(record, config)?;
    let comparison = compare(&result, record.z_obs)?;
    Ok(Scored { result, comparison })
}

/// Run the evaluator and comparator over every record.
pub fn run_batch(
    records: &[ObjectRecord],
    config: &EngineConfig,
    options: &BatchOptions,
) -> SegResult<BatchRun> {
    let score = |record: &ObjectRecord| RecordOutcome {
        id: record.id.clone(),
        outcome: score_record(record, config),
    };

    let outcomes: Vec<RecordOutcome> = if options.parallel {
        records.par_iter().map(score).collect()
    } else {
        records.iter().map(score).collect()
    };

    if options.policy == FailurePolicy::Halt {
        if let Some(err) = outcomes.iter().find_map(|o| o.outcome.as_ref().err()) {
            return Err(err.clone());
        }
    }

    for o in &outcomes {
        if let Err(err) = &o.outcome {
            tracing::warn!(id = %o.id, kind = err.kind(), "skipping record: {err}");
        }
    }

    let summary = if options.parallel {
        outcomes
            .par_iter()
            .fold(BatchSummary::default, fold_outcome)
            .reduce(BatchSummary::default, BatchSummary::merge)
    } else {
        outcomes.iter().fold(BatchSummary::default(), fold_outcome)
    };

    tracing::info!(
        records = records.len(),
        evaluated = summary.evaluated,
        failed = summary.failed,
        with_observation = summary.with_observation,
        "batch complete"
    );

    Ok(BatchRun { outcomes, summary })
}

fn fold_outcome(mut acc: BatchSummary, outcome: &RecordOutcome) -> BatchSummary {
    match &outcome.outcome {
        Ok(scored) => acc.record(scored.result.regime, &scored.comparison),
        Err(_) => acc.record_failure(),
    }
    acc
}

//! Exports: per-record results CSV and the run summary JSON.
//!
//! The CSV is meant for spreadsheets and downstream scripts: one row per input
//! record, failed records included with their error. The JSON carries run
//! metadata next to the aggregate so a summary can be traced back to the
//! configuration that produced it.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Comparison, EngineConfig};
use crate::error::AppError;
use crate::eval::{BatchSummary, RecordOutcome};
use crate::math::Moments;

const RESULTS_HEADER: [&str; 25] = [
    "id",
    "status",
    "regime",
    "r_s_m",
    "r_over_rs",
    "xi",
    "d_seg",
    "d_gr",
    "d_delta",
    "d_delta_pct",
    "r_star_m",
    "d_at_intersection",
    "compactness",
    "e_norm",
    "e_excess_pct",
    "delta_m_pct",
    "z_gr",
    "z_grsr",
    "z_seg_total",
    "z_obs",
    "residual_seg",
    "residual_gr",
    "verdict",
    "relative_difference",
    "error",
];

/// Identifies one run of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// `run_<YYYYmmdd_HHMMSS>_<hash>` where the hash is over the configuration.
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub tool_version: String,
    pub config: EngineConfig,
}

impl RunMetadata {
    pub fn new(config: EngineConfig, created_at: DateTime<Utc>) -> Self {
        let run_id = format!(
            "run_{}_{:06x}",
            created_at.format("%Y%m%d_%H%M%S"),
            config_hash(&config) & 0xff_ffff
        );
        Self {
            run_id,
            created_at,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            config,
        }
    }
}

/// 64-bit FNV-1a over the configuration's JSON text, so ids reproduce across builds.
fn config_hash(config: &EngineConfig) -> u64 {
    let text = serde_json::to_string(config).unwrap_or_default();
    fnv1a(text.as_bytes())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Residual statistics for one model, flattened for JSON consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualStats {
    pub n: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub mae: Option<f64>,
}

impl From<&Moments> for ResidualStats {
    fn from(m: &Moments) -> Self {
        Self {
            n: m.n,
            mean: m.mean(),
            std_dev: m.std_dev(),
            mae: m.mae(),
        }
    }
}

/// Schema of the summary JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryFile {
    pub tool: String,
    pub run: RunMetadata,
    pub summary: BatchSummary,
    pub win_rate_pct: Option<f64>,
    pub residuals_seg: ResidualStats,
    pub residuals_gr: ResidualStats,
    /// Rows dropped during CSV ingest (never reached the evaluator).
    pub rows_rejected: usize,
}

impl SummaryFile {
    pub fn new(run: RunMetadata, summary: BatchSummary, rows_rejected: usize) -> Self {
        Self {
            tool: "seg".to_string(),
            run,
            win_rate_pct: summary.win_rate_pct(),
            residuals_seg: ResidualStats::from(&summary.residuals_seg),
            residuals_gr: ResidualStats::from(&summary.residuals_gr),
            summary,
            rows_rejected,
        }
    }
}

/// Write per-record results to a CSV file.
pub fn write_results_csv(path: &Path, outcomes: &[RecordOutcome]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, outcomes)?;
    tracing::info!(path = %path.display(), rows = outcomes.len(), "results exported");
    Ok(())
}

/// Write per-record results as CSV to any writer.
pub fn write_results<W: Write>(out: W, outcomes: &[RecordOutcome]) -> Result<(), AppError> {
    let csv_err = |e: csv::Error| AppError::new(2, format!("Failed to write export CSV: {e}"));

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(RESULTS_HEADER).map_err(csv_err)?;
    for outcome in outcomes {
        writer.write_record(result_row(outcome)).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn result_row(outcome: &RecordOutcome) -> Vec<String> {
    let num = |v: f64| format!("{v:.12e}");
    let opt = |v: Option<f64>| v.map(num).unwrap_or_default();

    let scored = match &outcome.outcome {
        Ok(scored) => scored,
        Err(err) => {
            let mut row = vec![String::new(); RESULTS_HEADER.len()];
            row[0] = outcome.id.clone();
            row[1] = format!("error:{}", err.kind());
            row[RESULTS_HEADER.len() - 1] = err.to_string();
            return row;
        }
    };

    let r = &scored.result;
    let pred = r.redshift;
    let (z_obs, residual_seg, residual_gr, verdict, rel_diff) = match &scored.comparison {
        Comparison::Verdict(v) => (
            num(v.z_obs),
            num(v.residual_seg),
            num(v.residual_gr),
            v.verdict.label().to_string(),
            String::new(),
        ),
        Comparison::PredictionOnly(p) => (
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            num(p.relative_difference),
        ),
    };

    vec![
        r.id.clone(),
        "ok".to_string(),
        r.regime.label().to_string(),
        num(r.r_s_m),
        num(r.r_over_rs),
        num(r.xi),
        num(r.d_seg),
        num(r.d_gr),
        num(r.d_delta),
        opt(r.d_delta_pct),
        num(r.r_star_m),
        num(r.d_at_intersection),
        num(r.energy.compactness),
        num(r.energy.e_norm),
        num(r.energy.e_excess_pct),
        num(r.delta_m_pct),
        opt(pred.map(|p| p.z_gr)),
        opt(pred.map(|p| p.z_grsr)),
        opt(pred.map(|p| p.z_seg_total)),
        z_obs,
        residual_seg,
        residual_gr,
        verdict,
        rel_diff,
        String::new(),
    ]
}

/// Write the summary JSON file.
pub fn write_summary_json(path: &Path, summary: &SummaryFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;
    tracing::info!(path = %path.display(), run_id = %summary.run.run_id, "summary exported");
    Ok(())
}

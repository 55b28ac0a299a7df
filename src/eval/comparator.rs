//! Winner determination against an observed redshift.
//!
//! Tie rule, relative to the larger residual:
//!
//! ```text
//! eps = 1e-12 · max(r_a, r_b, 1e-20)
//! |r_a − r_b| ≤ eps  → Tie
//! r_a < r_b          → model A
//! otherwise          → model B
//! ```
//!
//! There is no absolute threshold. Without an observation no verdict is produced,
//! only the relative difference between the two predictions.

use crate::domain::{
    Comparison, ComparisonVerdict, EvaluationResult, PredictionOnly, Verdict,
};
use crate::error::{SegError, SegResult};

/// Relative tolerance of the tie rule.
pub const TIE_REL_EPS: f64 = 1e-12;

/// Floor of the tie-rule scale so two exact hits still compare as a tie.
const TIE_SCALE_FLOOR: f64 = 1e-20;

/// Decide between two predictions given an observation.
///
/// Model A is the alternative (segmented) model, model B the baseline.
pub fn judge(prediction_a: f64, prediction_b: f64, observed: f64) -> Verdict {
    let residual_a = (prediction_a - observed).abs();
    let residual_b = (prediction_b - observed).abs();
    verdict_from_residuals(residual_a, residual_b)
}

/// Apply the tie rule to two residual magnitudes.
pub fn verdict_from_residuals(residual_a: f64, residual_b: f64) -> Verdict {
    let eps = TIE_REL_EPS * residual_a.max(residual_b).max(TIE_SCALE_FLOOR);
    if (residual_a - residual_b).abs() <= eps {
        Verdict::Tie
    } else if residual_a < residual_b {
        Verdict::Segmented
    } else {
        Verdict::Baseline
    }
}

/// Compare an evaluation with an optional observed redshift.
///
/// Errors:
/// - `Domain` when the evaluation has no finite predictions (reference radius)
/// - `Input` when the observation is present but not finite
pub fn compare(result: &EvaluationResult, observed: Option<f64>) -> SegResult<Comparison> {
    let Some(pred) = result.redshift else {
        return Err(SegError::domain(format!(
            "'{}': no finite baseline prediction at x = {}",
            result.id, result.r_over_rs
        )));
    };

    let Some(z_obs) = observed else {
        let denom = pred.z_grsr.abs().max(TIE_SCALE_FLOOR);
        return Ok(Comparison::PredictionOnly(PredictionOnly {
            relative_difference: (pred.z_seg_total - pred.z_grsr) / denom,
        }));
    };

    if !z_obs.is_finite() {
        return Err(SegError::input(format!(
            "'{}': observed redshift must be finite, got {z_obs}",
            result.id
        )));
    }

    Ok(Comparison::Verdict(ComparisonVerdict {
        z_obs,
        residual_seg: pred.z_seg_total - z_obs,
        residual_gr: pred.z_grsr - z_obs,
        verdict: judge(pred.z_seg_total, pred.z_grsr, z_obs),
    }))
}

//! Per-object evaluation.
//!
//! `evaluate` composes the closed-form pieces in `models` into one
//! [`EvaluationResult`]. It performs no I/O and reads nothing but its arguments,
//! so identical inputs give bit-identical outputs.

use crate::domain::{EngineConfig, EvaluationResult, ObjectRecord, RedshiftPrediction};
use crate::error::SegResult;
use crate::models::{
    INTERSECTION_R_OVER_RS, applied_correction_pct, baseline_dilation, classify, combine,
    corrected_redshift, density, dilation_difference_pct, energy_scaling, intersection_dilation,
    normalized_radius, redshift_from_dilation, segmented_dilation, snap_to_threshold,
    special_relativistic,
};

/// Evaluate both models for one catalog record.
///
/// Errors:
/// - `Input` for non-positive or non-finite mass, radius or velocity
/// - `Domain` for radii below the reference radius (`x < 1`)
pub fn evaluate(record: &ObjectRecord, config: &EngineConfig) -> SegResult<EvaluationResult> {
    let (r_s, x) = normalized_radius(record.mass_kg, record.radius_m, config.constants())?;
    let x = snap_to_threshold(x, config.boundaries());
    let regime = classify(x, config.boundaries())?;

    let xi = density(x, config)?;
    let d_seg = segmented_dilation(xi);
    let d_gr = baseline_dilation(x)?;
    let energy = energy_scaling(x);

    let delta_m_pct = applied_correction_pct(regime, record.mass_kg, r_s, config.correction());
    let z_sr = special_relativistic(record.v_mps, record.v_los_mps, config.constants().c())?;

    let redshift = redshift_from_dilation(d_gr).map(|z_gr| {
        let z_seg_grav = corrected_redshift(z_gr, delta_m_pct);
        let z_grsr = combine(z_gr, z_sr);
        RedshiftPrediction {
            z_gr,
            z_sr,
            z_grsr,
            z_seg_grav,
            z_seg_total: combine(z_seg_grav, z_sr),
            z_seg_uncorrected: z_grsr,
        }
    });

    tracing::trace!(id = %record.id, x, regime = %regime, xi, delta_m_pct, "evaluated record");

    Ok(EvaluationResult {
        id: record.id.clone(),
        r_s_m: r_s,
        r_over_rs: x,
        regime,
        xi,
        d_seg,
        d_gr,
        d_delta: d_seg - d_gr,
        d_delta_pct: dilation_difference_pct(d_seg, d_gr),
        r_star_m: INTERSECTION_R_OVER_RS * r_s,
        d_at_intersection: intersection_dilation(config),
        energy,
        delta_m_pct,
        redshift,
    })
}

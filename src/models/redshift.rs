//! Redshift predictions and the mass-dependent correction Δ(M).
//!
//! Baseline: `z_gr = 1/D_gr − 1`.
//!
//! Alternative: `z_seg = z_gr · (1 + Δ/100)`. It is never `1/D_seg − 1`; that
//! expression reduces to `ξ` itself and carries none of the baseline physics.
//!
//! Δ is forced to exactly zero in the far-field regime, so there the two models
//! produce bit-identical predictions.

use crate::domain::{CorrectionParams, Regime};
use crate::error::{SegError, SegResult};

/// Upper bound on `|v|/c` so the Lorentz factor stays finite.
const BETA_MAX: f64 = 0.999_999;

/// Redshift from a baseline dilation factor; `None` when the factor is zero.
pub fn redshift_from_dilation(d: f64) -> Option<f64> {
    (d > 0.0 && d.is_finite()).then(|| 1.0 / d - 1.0)
}

/// Special-relativistic redshift `γ(1 + β_los) − 1`.
///
/// Absent velocities contribute nothing.
pub fn special_relativistic(v_mps: Option<f64>, v_los_mps: Option<f64>, c: f64) -> SegResult<f64> {
    let v = v_mps.unwrap_or(0.0);
    let v_los = v_los_mps.unwrap_or(0.0);
    if !(v.is_finite() && v_los.is_finite()) {
        return Err(SegError::input(format!(
            "velocities must be finite, got v={v} v_los={v_los}"
        )));
    }

    let beta = (v.abs() / c).min(BETA_MAX);
    let beta_los = v_los / c;
    let gamma = 1.0 / (1.0 - beta * beta).sqrt();
    Ok(gamma * (1.0 + beta_los) - 1.0)
}

/// Multiplicative combination `(1 + a)(1 + b) − 1`.
pub fn combine(a: f64, b: f64) -> f64 {
    (1.0 + a) * (1.0 + b) - 1.0
}

/// Clamped log-mass normalization in `[0, 1]`.
pub fn mass_normalization(mass_kg: f64, params: &CorrectionParams) -> f64 {
    let lm = mass_kg.log10();
    let span = params.log_mass_max() - params.log_mass_min();
    ((lm - params.log_mass_min()) / span).clamp(0.0, 1.0)
}

/// Ungated correction Δ(M) in percent.
pub fn mass_correction_pct(mass_kg: f64, r_s_m: f64, params: &CorrectionParams) -> f64 {
    let shape = params.amplitude() * (-params.decay_per_m() * r_s_m).exp() + params.offset();
    shape * mass_normalization(mass_kg, params)
}

/// Correction actually applied for a regime: zero in the far field.
pub fn applied_correction_pct(
    regime: Regime,
    mass_kg: f64,
    r_s_m: f64,
    params: &CorrectionParams,
) -> f64 {
    if regime.is_far_field() {
        return 0.0;
    }
    mass_correction_pct(mass_kg, r_s_m, params)
}

/// Alternative-model gravitational redshift.
pub fn corrected_redshift(z_gr: f64, delta_pct: f64) -> f64 {
    z_gr * (1.0 + delta_pct / 100.0)
}

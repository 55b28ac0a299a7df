//! Empirical energy scaling with compactness.
//!
//! `E_obs / E_rest = 1 + α · (r_s / r)^β`, a fit over catalogued objects. It is
//! reported next to the dilation models and plays no part in the verdict.

use crate::domain::EnergyScaling;

pub const POWER_LAW_ALPHA: f64 = 0.3187;
pub const POWER_LAW_BETA: f64 = 0.9821;

/// Energy scaling at normalized radius `x`. Infinite `x` has zero excess.
pub fn energy_scaling(x: f64) -> EnergyScaling {
    let compactness = x.recip();
    let excess = if compactness.is_finite() && compactness > 0.0 {
        POWER_LAW_ALPHA * compactness.powf(POWER_LAW_BETA)
    } else {
        0.0
    };
    EnergyScaling {
        compactness,
        e_norm: 1.0 + excess,
        e_excess_pct: 100.0 * excess,
    }
}

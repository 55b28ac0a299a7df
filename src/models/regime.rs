//! Regime classification on the normalized radius.
//!
//! A single ordered chain of `x < threshold` checks over the sorted thresholds, so
//! every positive `x` lands in exactly one half-open interval.
//!
//! `x` is derived as `r / r_s`, so a radius given as an exact multiple of `r_s`
//! can come back a couple of ULP off that multiple. [`snap_to_threshold`] pulls
//! such values onto the threshold (or the reference radius `x = 1`) before
//! classification.

use crate::domain::{PhysicalConstants, Regime, RegimeBoundaries};
use crate::error::{SegError, SegResult};

/// Map a normalized radius to its regime.
pub fn classify(x: f64, boundaries: &RegimeBoundaries) -> SegResult<Regime> {
    if !(x.is_finite() && x > 0.0) {
        return Err(SegError::input(format!(
            "normalized radius must be finite and > 0, got {x}"
        )));
    }

    let regime = if x < boundaries.blend_low() {
        Regime::VeryClose
    } else if x < boundaries.blend_high() {
        Regime::Blended
    } else if x < boundaries.mid_field() {
        Regime::PhotonSphere
    } else if x < boundaries.far_field() {
        Regime::Strong
    } else {
        Regime::Weak
    };
    Ok(regime)
}

/// Relative distance within which a derived `x` counts as sitting on a threshold.
pub const THRESHOLD_SNAP_REL: f64 = 8.0 * f64::EPSILON;

/// Replace `x` by the reference radius or a regime threshold it lies within
/// [`THRESHOLD_SNAP_REL`] of; otherwise return it unchanged.
pub fn snap_to_threshold(x: f64, boundaries: &RegimeBoundaries) -> f64 {
    std::iter::once(1.0)
        .chain(boundaries.thresholds())
        .find(|t| (x - t).abs() <= THRESHOLD_SNAP_REL * t)
        .unwrap_or(x)
}

/// Reference radius and normalized radius `x = r / r_s` for a mass/radius pair.
pub fn normalized_radius(
    mass_kg: f64,
    radius_m: f64,
    constants: &PhysicalConstants,
) -> SegResult<(f64, f64)> {
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return Err(SegError::input(format!(
            "radius must be finite and > 0 m, got {radius_m}"
        )));
    }
    let r_s = constants.schwarzschild_radius(mass_kg)?;
    Ok((r_s, radius_m / r_s))
}

/// Interval `[lo, hi)` covered by a regime; `lo` is 0 for the innermost band and
/// `hi` is infinite for the far field.
pub fn regime_interval(regime: Regime, boundaries: &RegimeBoundaries) -> (f64, f64) {
    let [b0, b1, b2, b3] = boundaries.thresholds();
    match regime {
        Regime::VeryClose => (0.0, b0),
        Regime::Blended => (b0, b1),
        Regime::PhotonSphere => (b1, b2),
        Regime::Strong => (b2, b3),
        Regime::Weak => (b3, f64::INFINITY),
    }
}

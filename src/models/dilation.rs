//! Time dilation factors.
//!
//! - alternative model: `D_seg = 1 / (1 + ξ)`, finite everywhere
//! - baseline model: `D_gr = √(1 − 1/x)`, zero at `x = 1` and undefined below

use crate::domain::EngineConfig;
use crate::error::{SegError, SegResult};
use crate::models::near_field_jet;

/// Normalized radius of the point where the two dilation curves cross.
pub const INTERSECTION_R_OVER_RS: f64 = 1.386562;

/// Alternative-model dilation from a density value.
pub fn segmented_dilation(xi: f64) -> f64 {
    1.0 / (1.0 + xi)
}

/// Baseline dilation at normalized radius `x`.
///
/// Returns a domain error for `x < 1`, where the square root argument is negative.
pub fn baseline_dilation(x: f64) -> SegResult<f64> {
    if !(x.is_finite() && x > 0.0) {
        return Err(SegError::input(format!(
            "normalized radius must be finite and > 0, got {x}"
        )));
    }
    if x < 1.0 {
        return Err(SegError::domain(format!(
            "baseline dilation undefined below the reference radius (x = {x} < 1)"
        )));
    }
    Ok((1.0 - 1.0 / x).sqrt())
}

/// `100 · (D_seg − D_gr) / D_gr`; `None` at the reference radius where `D_gr = 0`.
pub fn dilation_difference_pct(d_seg: f64, d_gr: f64) -> Option<f64> {
    (d_gr > 0.0).then(|| 100.0 * (d_seg - d_gr) / d_gr)
}

/// Alternative-model dilation at [`INTERSECTION_R_OVER_RS`], from the near-field branch.
pub fn intersection_dilation(config: &EngineConfig) -> f64 {
    let jet = near_field_jet(
        INTERSECTION_R_OVER_RS,
        config.constants().phi(),
        config.density().ceiling(),
    );
    segmented_dilation(jet.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PHI;

    #[test]
    fn baseline_is_zero_at_reference_radius() {
        assert_eq!(baseline_dilation(1.0).unwrap(), 0.0);
    }

    #[test]
    fn dilation_difference_is_undefined_only_at_reference_radius() {
        assert_eq!(dilation_difference_pct(0.55, 0.0), None);
        let pct = dilation_difference_pct(0.6, 0.5).unwrap();
        assert!((pct - 20.0).abs() < 1e-12);
        assert!(dilation_difference_pct(0.4, 0.5).unwrap() < 0.0);
    }

    #[test]
    fn intersection_dilation_follows_the_near_field() {
        let cfg = EngineConfig::default();
        let xi = 1.0 - (-PHI / INTERSECTION_R_OVER_RS).exp();
        let d = intersection_dilation(&cfg);
        assert!((d - 1.0 / (1.0 + xi)).abs() < 1e-12);
        assert!(d > 0.5 && d < 1.0);
    }

    #[test]
    fn baseline_below_reference_radius_is_a_domain_error() {
        assert!(matches!(baseline_dilation(0.99), Err(SegError::Domain(_))));
        assert!(matches!(baseline_dilation(0.0), Err(SegError::Input(_))));
    }

    #[test]
    fn segmented_dilation_is_finite_at_reference_radius() {
        let xi = 1.0 - (-PHI).exp();
        let d = segmented_dilation(xi);
        assert!((d - 1.0 / (1.0 + xi)).abs() < 1e-15);
        assert!((d - 0.5550).abs() < 1e-3);
    }

    #[test]
    fn both_factors_approach_one_far_away() {
        assert!((baseline_dilation(1e8).unwrap() - 1.0).abs() < 1e-7);
        assert!((segmented_dilation(0.5 / 1e8) - 1.0).abs() < 1e-7);
    }
}

//! Segment density `ξ(x)` on the normalized radius.
//!
//! Two closed-form branches joined by a C² blend:
//!
//! - near field (`x ≤ blend_low`): `ξ = ξ_max · (1 − exp(−φ / x))`
//! - far field (`x ≥ blend_high`): `ξ = 1 / (2x)`
//! - blend: `ξ = (1 − w)·near + w·far`, `w` the quintic smoothstep of
//!   `t = (x − blend_low) / (blend_high − blend_low)`
//!
//! The near-field exponent is `φ/x`, not `φ·x`: with the reciprocal the density
//! falls towards 0 as `x → ∞`; with `φ·x` it would climb to `ξ_max` instead.
//! At `x = 1` the near field gives `ξ_max · (1 − e^{−φ})`.
//!
//! [`density_jet`] also returns the first and second derivative in `x`, which is
//! how C² continuity across both blend edges is checked.

use crate::domain::{DensityParams, EngineConfig, PhysicalConstants, RegimeBoundaries};
use crate::error::{SegError, SegResult};
use crate::math::{smoothstep5, smoothstep5_d1, smoothstep5_d2};

/// Value and first two derivatives of `ξ` at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityJet {
    pub value: f64,
    pub d1: f64,
    pub d2: f64,
}

/// Near-field branch with derivatives.
pub fn near_field_jet(x: f64, phi: f64, ceiling: f64) -> DensityJet {
    let u = phi / x;
    let e = (-u).exp();
    let du = -phi / (x * x);
    let d2u = 2.0 * phi / (x * x * x);
    DensityJet {
        // 1 − exp(−u) computed as −expm1(−u).
        value: ceiling * -(-u).exp_m1(),
        d1: ceiling * e * du,
        d2: ceiling * e * (d2u - du * du),
    }
}

/// Far-field branch with derivatives, capped at the ceiling.
pub fn far_field_jet(x: f64, ceiling: f64) -> DensityJet {
    let value = 0.5 / x;
    if value > ceiling {
        return DensityJet {
            value: ceiling,
            d1: 0.0,
            d2: 0.0,
        };
    }
    DensityJet {
        value,
        d1: -0.5 / (x * x),
        d2: 1.0 / (x * x * x),
    }
}

/// Blended density and its derivatives at normalized radius `x`.
pub fn density_jet(x: f64, config: &EngineConfig) -> SegResult<DensityJet> {
    if !(x.is_finite() && x > 0.0) {
        return Err(SegError::input(format!(
            "normalized radius must be finite and > 0, got {x}"
        )));
    }

    let phi = config.constants().phi();
    let ceiling = config.density().ceiling();
    let lo = config.boundaries().blend_low();
    let hi = config.boundaries().blend_high();

    if x <= lo {
        return Ok(near_field_jet(x, phi, ceiling));
    }
    if x >= hi {
        return Ok(far_field_jet(x, ceiling));
    }

    let near = near_field_jet(x, phi, ceiling);
    let far = far_field_jet(x, ceiling);

    let scale = 1.0 / (hi - lo);
    let t = (x - lo) * scale;
    let w = smoothstep5(t);
    let dw = smoothstep5_d1(t) * scale;
    let d2w = smoothstep5_d2(t) * scale * scale;

    let gap = far.value - near.value;
    Ok(DensityJet {
        value: (1.0 - w) * near.value + w * far.value,
        d1: (1.0 - w) * near.d1 + w * far.d1 + dw * gap,
        d2: (1.0 - w) * near.d2 + w * far.d2 + 2.0 * dw * (far.d1 - near.d1) + d2w * gap,
    })
}

/// Require the near-field branch to lie on or above the far-field branch across
/// the blend interval.
///
/// With both branches non-increasing and `far ≤ near`, the blend
/// `(1 − w)·near + w·far` with `w' ≥ 0` is non-increasing as well. In `u = 1/x`
/// the gap `near − far` is concave, and a capped far branch is active at
/// `blend_low` whenever it is active anywhere in the interval, so checking the
/// two edges covers the whole interval.
pub fn check_blend_ordering(
    constants: &PhysicalConstants,
    boundaries: &RegimeBoundaries,
    density: &DensityParams,
) -> SegResult<()> {
    let ceiling = density.ceiling();
    for x in [boundaries.blend_low(), boundaries.blend_high()] {
        let near = near_field_jet(x, constants.phi(), ceiling).value;
        let far = far_field_jet(x, ceiling).value;
        if near < far {
            return Err(SegError::config(format!(
                "density ceiling {ceiling} puts the near field ({near:.6}) below the far field \
                 ({far:.6}) at x = {x}; the blended density would rise with radius"
            )));
        }
    }
    Ok(())
}

/// Blended density `ξ(x)`, always within `[0, ceiling]`.
pub fn density(x: f64, config: &EngineConfig) -> SegResult<f64> {
    Ok(density_jet(x, config)?.value)
}

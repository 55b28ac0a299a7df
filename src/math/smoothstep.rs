//! Quintic smoothstep used to blend the near- and far-field density branches.
//!
//! `w(t) = 6t⁵ − 15t⁴ + 10t³` on `t ∈ [0, 1]`, with
//!
//! - `w(0) = 0, w'(0) = 0, w''(0) = 0`
//! - `w(1) = 1, w'(1) = 0, w''(1) = 0`
//!
//! so a convex combination `(1 − w)·a + w·b` inherits the value, slope and
//! curvature of `a` at `t = 0` and of `b` at `t = 1`.
//!
//! Derivatives here are with respect to `t`. Callers mapping an interval
//! `[lo, hi]` onto `t` multiply by `1/(hi − lo)` per order.

/// `w(t)`, clamped to `[0, 1]` outside the unit interval.
pub fn smoothstep5(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    // Horner form of 6t⁵ − 15t⁴ + 10t³.
    t * t * t * (t * (6.0 * t - 15.0) + 10.0)
}

/// `w'(t) = 30t²(t − 1)²`; zero outside the unit interval.
pub fn smoothstep5_d1(t: f64) -> f64 {
    if !(0.0..=1.0).contains(&t) {
        return 0.0;
    }
    let u = t * (t - 1.0);
    30.0 * u * u
}

/// `w''(t) = 60t(t − 1)(2t − 1)`; zero outside the unit interval.
pub fn smoothstep5_d2(t: f64) -> f64 {
    if !(0.0..=1.0).contains(&t) {
        return 0.0;
    }
    60.0 * t * (t - 1.0) * (2.0 * t - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_conditions_hold() {
        assert_eq!(smoothstep5(0.0), 0.0);
        assert_eq!(smoothstep5(1.0), 1.0);
        assert_eq!(smoothstep5_d1(0.0), 0.0);
        assert_eq!(smoothstep5_d1(1.0), 0.0);
        assert_eq!(smoothstep5_d2(0.0), 0.0);
        assert_eq!(smoothstep5_d2(1.0), 0.0);
        assert!((smoothstep5(0.5) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn weight_is_monotone_on_unit_interval() {
        let mut prev = smoothstep5(0.0);
        for i in 1..=1000 {
            let w = smoothstep5(i as f64 / 1000.0);
            assert!(w >= prev);
            prev = w;
        }
    }

    #[test]
    fn analytic_derivatives_match_central_differences() {
        let h = 1e-5;
        for &t in &[0.1, 0.25, 0.5, 0.7, 0.9] {
            let fd1 = (smoothstep5(t + h) - smoothstep5(t - h)) / (2.0 * h);
            let fd2 = (smoothstep5(t + h) - 2.0 * smoothstep5(t) + smoothstep5(t - h)) / (h * h);
            assert!((fd1 - smoothstep5_d1(t)).abs() < 1e-6, "w'({t})");
            assert!((fd2 - smoothstep5_d2(t)).abs() < 1e-3, "w''({t})");
        }
    }
}

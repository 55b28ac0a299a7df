//! Mergeable running moments.
//!
//! Batch summaries are reduced in parallel, so residual statistics are kept as
//! Welford state (count, mean, sum of squared deviations) combined with Chan's
//! pairwise formula. Residuals sit at redshift scale with small spread, where
//! raw power sums cancel to zero. Integer counts stay exact under any merge
//! order; the float state may differ from a sequential pass in the last bits.

use serde::{Deserialize, Serialize};

/// Count, running mean, Σ(x − mean)² and Σ|x| of a stream of samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Moments {
    pub n: usize,
    pub mean: f64,
    pub m2: f64,
    pub sum_abs: f64,
}

impl Moments {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
        self.sum_abs += x.abs();
    }

    pub fn merge(self, other: Moments) -> Moments {
        if self.n == 0 {
            return other;
        }
        if other.n == 0 {
            return self;
        }
        let (na, nb) = (self.n as f64, other.n as f64);
        let n = self.n + other.n;
        let delta = other.mean - self.mean;
        Moments {
            n,
            mean: self.mean + delta * nb / n as f64,
            m2: self.m2 + other.m2 + delta * delta * na * nb / n as f64,
            sum_abs: self.sum_abs + other.sum_abs,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then_some(self.mean)
    }

    /// Mean absolute value.
    pub fn mae(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum_abs / self.n as f64)
    }

    /// Sample standard deviation (n − 1 denominator).
    pub fn std_dev(&self) -> Option<f64> {
        (self.n >= 2).then(|| (self.m2.max(0.0) / (self.n - 1) as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_match_direct_formulas() {
        let xs = [1.0, -2.0, 3.0, 4.0];
        let mut m = Moments::default();
        for &x in &xs {
            m.push(x);
        }
        assert_eq!(m.n, 4);
        assert!((m.mean().unwrap() - 1.5).abs() < 1e-12);
        assert!((m.mae().unwrap() - 2.5).abs() < 1e-12);
        // Sample variance of [1, -2, 3, 4] is 7.0.
        assert!((m.std_dev().unwrap() - 7.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn merge_equals_single_pass() {
        let mut a = Moments::default();
        let mut b = Moments::default();
        let mut all = Moments::default();
        for i in 0..10 {
            let x = i as f64 * 0.5 - 2.0;
            if i % 2 == 0 { a.push(x) } else { b.push(x) }
            all.push(x);
        }
        let merged = a.merge(b);
        assert_eq!(merged.n, all.n);
        assert!((merged.mean().unwrap() - all.mean().unwrap()).abs() < 1e-12);
        assert!((merged.std_dev().unwrap() - all.std_dev().unwrap()).abs() < 1e-12);
    }

    #[test]
    fn tiny_spread_on_large_offset_survives() {
        let mut m = Moments::default();
        for i in 0..1000 {
            m.push(if i % 2 == 0 { 0.3 } else { 0.3 + 1e-9 });
        }
        // Sample std of an alternating pair: (d/2)·√(n/(n−1)).
        let expected = 0.5e-9 * (1000.0_f64 / 999.0).sqrt();
        let std = m.std_dev().unwrap();
        assert!((std - expected).abs() < 1e-3 * expected, "std = {std:e}");

        let (mut left, mut right) = (Moments::default(), Moments::default());
        for i in 0..1000 {
            let x = if i % 2 == 0 { 0.3 } else { 0.3 + 1e-9 };
            if i < 300 { left.push(x) } else { right.push(x) }
        }
        let merged = left.merge(right).std_dev().unwrap();
        assert!((merged - expected).abs() < 1e-3 * expected, "merged std = {merged:e}");
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut m = Moments::default();
        m.push(2.0);
        m.push(4.0);
        assert_eq!(m.merge(Moments::default()), m);
        assert_eq!(Moments::default().merge(m), m);
    }

    #[test]
    fn empty_moments_have_no_statistics() {
        let m = Moments::default();
        assert!(m.mean().is_none());
        assert!(m.std_dev().is_none());
    }
}

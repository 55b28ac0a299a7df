//! Batch summary: counts by regime and verdict, plus residual statistics.
//!
//! A [`BatchSummary`] is a commutative monoid under [`BatchSummary::merge`], so
//! partial summaries from independent partitions can be reduced in any order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Comparison, Regime, Verdict};
use crate::math::Moments;

/// Verdict tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerdictCounts {
    pub segmented: usize,
    pub baseline: usize,
    pub tie: usize,
}

impl VerdictCounts {
    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Segmented => self.segmented += 1,
            Verdict::Baseline => self.baseline += 1,
            Verdict::Tie => self.tie += 1,
        }
    }

    pub fn merge(self, other: VerdictCounts) -> VerdictCounts {
        VerdictCounts {
            segmented: self.segmented + other.segmented,
            baseline: self.baseline + other.baseline,
            tie: self.tie + other.tie,
        }
    }

    pub fn total(&self) -> usize {
        self.segmented + self.baseline + self.tie
    }

    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Segmented => self.segmented,
            Verdict::Baseline => self.baseline,
            Verdict::Tie => self.tie,
        }
    }
}

/// Counts within one regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegimeTally {
    pub evaluated: usize,
    pub prediction_only: usize,
    pub verdicts: VerdictCounts,
}

impl RegimeTally {
    fn merge(self, other: RegimeTally) -> RegimeTally {
        RegimeTally {
            evaluated: self.evaluated + other.evaluated,
            prediction_only: self.prediction_only + other.prediction_only,
            verdicts: self.verdicts.merge(other.verdicts),
        }
    }
}

/// Aggregate over one run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Records that produced a comparison (verdict or prediction-only).
    pub evaluated: usize,
    pub with_observation: usize,
    pub prediction_only: usize,
    /// Records rejected with an explicit error.
    pub failed: usize,
    pub verdicts: VerdictCounts,
    pub by_regime: BTreeMap<Regime, RegimeTally>,
    /// Signed residuals of the alternative model (prediction − observed).
    pub residuals_seg: Moments,
    /// Signed residuals of the baseline model (prediction − observed).
    pub residuals_gr: Moments,
}

impl BatchSummary {
    /// Fold one comparison into the summary.
    pub fn record(&mut self, regime: Regime, comparison: &Comparison) {
        self.evaluated += 1;
        let tally = self.by_regime.entry(regime).or_default();
        tally.evaluated += 1;

        match comparison {
            Comparison::Verdict(v) => {
                self.with_observation += 1;
                self.verdicts.add(v.verdict);
                tally.verdicts.add(v.verdict);
                self.residuals_seg.push(v.residual_seg);
                self.residuals_gr.push(v.residual_gr);
            }
            Comparison::PredictionOnly(_) => {
                self.prediction_only += 1;
                tally.prediction_only += 1;
            }
        }
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Combine two partial summaries. Commutative and associative.
    pub fn merge(mut self, other: BatchSummary) -> BatchSummary {
        self.evaluated += other.evaluated;
        self.with_observation += other.with_observation;
        self.prediction_only += other.prediction_only;
        self.failed += other.failed;
        self.verdicts = self.verdicts.merge(other.verdicts);
        for (regime, tally) in other.by_regime {
            let slot = self.by_regime.entry(regime).or_default();
            *slot = slot.merge(tally);
        }
        self.residuals_seg = self.residuals_seg.merge(other.residuals_seg);
        self.residuals_gr = self.residuals_gr.merge(other.residuals_gr);
        self
    }

    /// Share of observed records won by the alternative model, in percent.
    ///
    /// The denominator is every record with an observation, ties included, so
    /// ties lower the rate without being wins for either side. A catalog that is
    /// mostly far field (where every comparison ties) therefore shows a low rate.
    pub fn win_rate_pct(&self) -> Option<f64> {
        (self.with_observation > 0)
            .then(|| 100.0 * self.verdicts.segmented as f64 / self.with_observation as f64)
    }

    /// Tally for a regime (zeroes if none of its records were seen).
    pub fn regime(&self, regime: Regime) -> RegimeTally {
        self.by_regime.get(&regime).copied().unwrap_or_default()
    }

    pub fn total_records(&self) -> usize {
        self.evaluated + self.failed
    }
}

/// Build a summary from `(regime, comparison)` pairs.
pub fn aggregate<I>(items: I) -> BatchSummary
where
    I: IntoIterator<Item = (Regime, Comparison)>,
{
    let mut summary = BatchSummary::default();
    for (regime, comparison) in items {
        summary.record(regime, &comparison);
    }
    summary
}

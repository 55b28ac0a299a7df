//! Formatted terminal output.
//!
//! Formatting lives in one place so the evaluation code stays free of
//! presentation concerns and output changes are localized.

use crate::domain::{Comparison, EvaluationResult, Regime, Verdict};
use crate::eval::{BatchSummary, RecordOutcome};
use crate::io::RunMetadata;
use crate::math::Moments;

/// Format the run summary: totals, verdicts by regime, residual statistics.
pub fn format_run_summary(run: &RunMetadata, summary: &BatchSummary, rows_rejected: usize) -> String {
    let mut out = String::new();

    out.push_str("=== seg - segment density vs. baseline ===\n");
    out.push_str(&format!("Run: {} ({})\n", run.run_id, run.created_at.format("%Y-%m-%d %H:%M:%S UTC")));
    out.push_str(&format!(
        "Records: total={} | evaluated={} | observed={} | prediction-only={} | failed={}",
        summary.total_records(),
        summary.evaluated,
        summary.with_observation,
        summary.prediction_only,
        summary.failed,
    ));
    if rows_rejected > 0 {
        out.push_str(&format!(" | rejected at ingest={rows_rejected}"));
    }
    out.push('\n');

    out.push_str("\nBy regime:\n");
    out.push_str(&format_regime_table(summary));

    out.push_str("\nVerdicts:\n");
    for v in [Verdict::Segmented, Verdict::Baseline, Verdict::Tie] {
        out.push_str(&format!("- {:<4} {}\n", v.label(), summary.verdicts.get(v)));
    }
    match summary.win_rate_pct() {
        Some(rate) => out.push_str(&format!("- win rate (SEG): {rate:.2}%\n")),
        None => out.push_str("- win rate (SEG): n/a (no observations)\n"),
    }

    out.push_str("\nResiduals (prediction - observed):\n");
    out.push_str(&format_moments("SEG", &summary.residuals_seg));
    out.push_str(&format_moments("GR", &summary.residuals_gr));

    out
}

/// One row per regime, innermost first; regimes without records show zeroes.
pub fn format_regime_table(summary: &BatchSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<14} {:>8} {:>8} {:>8} {:>8} {:>10}\n",
        "regime", "n", "SEG", "GR", "TIE", "pred-only"
    ));
    out.push_str(&format!(
        "{:-<14} {:-<8} {:-<8} {:-<8} {:-<8} {:-<10}\n",
        "", "", "", "", "", ""
    ));
    for regime in Regime::ALL {
        let t = summary.regime(regime);
        out.push_str(&format!(
            "{:<14} {:>8} {:>8} {:>8} {:>8} {:>10}\n",
            regime.label(),
            t.evaluated,
            t.verdicts.segmented,
            t.verdicts.baseline,
            t.verdicts.tie,
            t.prediction_only,
        ));
    }
    out
}

fn format_moments(label: &str, m: &Moments) -> String {
    match (m.mean(), m.std_dev(), m.mae()) {
        (Some(mean), std, Some(mae)) => format!(
            "- {label:<4} n={} mean={mean:+.6e} std={} mae={mae:.6e}\n",
            m.n,
            std.map(|s| format!("{s:.6e}")).unwrap_or_else(|| "n/a".to_string()),
        ),
        _ => format!("- {label:<4} n=0\n"),
    }
}

/// List the first `limit` failed records with their error.
pub fn format_failures(outcomes: &[RecordOutcome], limit: usize) -> String {
    let failures: Vec<_> = outcomes
        .iter()
        .filter_map(|o| o.outcome.as_ref().err().map(|e| (&o.id, e)))
        .collect();
    if failures.is_empty() {
        return String::new();
    }

    let mut out = format!("Failed records ({}):\n", failures.len());
    for (id, err) in failures.iter().take(limit) {
        out.push_str(&format!("- {:<24} {err}\n", truncate(id, 24)));
    }
    if failures.len() > limit {
        out.push_str(&format!("  ... {} more\n", failures.len() - limit));
    }
    out
}

/// Detailed view of a single evaluated object.
pub fn format_object(result: &EvaluationResult, comparison: Option<&Comparison>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Object: {}\n", result.id));
    out.push_str(&format!("- r_s        : {:.6e} m\n", result.r_s_m));
    out.push_str(&format!("- r/r_s      : {:.6}\n", result.r_over_rs));
    out.push_str(&format!("- regime     : {}\n", result.regime));
    out.push_str(&format!("- xi         : {:.9}\n", result.xi));
    out.push_str(&format!("- D_seg      : {:.9}\n", result.d_seg));
    out.push_str(&format!("- D_GR       : {:.9}\n", result.d_gr));
    match result.d_delta_pct {
        Some(pct) => out.push_str(&format!("- D_delta    : {:+.9} ({pct:+.4}%)\n", result.d_delta)),
        None => out.push_str(&format!("- D_delta    : {:+.9}\n", result.d_delta)),
    }
    out.push_str(&format!(
        "- r*         : {:.6e} m (D = {:.6})\n",
        result.r_star_m, result.d_at_intersection
    ));
    out.push_str(&format!(
        "- E/E_rest   : {:.6} (r_s/r = {:.6}, excess {:.4}%)\n",
        result.energy.e_norm, result.energy.compactness, result.energy.e_excess_pct
    ));
    out.push_str(&format!("- delta(M)   : {:.6}%\n", result.delta_m_pct));

    match &result.redshift {
        Some(z) => {
            out.push_str(&format!("- z_GR       : {:.9e}\n", z.z_gr));
            out.push_str(&format!("- z_SR       : {:.9e}\n", z.z_sr));
            out.push_str(&format!("- z_GR+SR    : {:.9e}\n", z.z_grsr));
            out.push_str(&format!("- z_SEG      : {:.9e}\n", z.z_seg_total));
        }
        None => out.push_str("- z          : undefined at the reference radius\n"),
    }

    match comparison {
        Some(Comparison::Verdict(v)) => {
            out.push_str(&format!("- z_obs      : {:.9e}\n", v.z_obs));
            out.push_str(&format!(
                "- residuals  : SEG={:+.6e} GR={:+.6e}\n",
                v.residual_seg, v.residual_gr
            ));
            out.push_str(&format!("- verdict    : {}\n", v.verdict));
        }
        Some(Comparison::PredictionOnly(p)) => {
            out.push_str(&format!(
                "- rel. diff  : {:+.6e} (no observation, no verdict)\n",
                p.relative_difference
            ));
        }
        None => {}
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EngineConfig, M_SUN, ObjectRecord, PhysicalConstants};
    use crate::eval::{BatchOptions, compare, evaluate, run_batch};
    use chrono::{TimeZone, Utc};

    fn object(id: &str, x: f64) -> ObjectRecord {
        let r_s = PhysicalConstants::default().schwarzschild_radius(M_SUN).unwrap();
        ObjectRecord::new(id, M_SUN, x * r_s)
    }

    #[test]
    fn summary_lists_every_regime_and_the_win_rate() {
        let records = vec![
            object("a", 2.5).with_observation(0.9),
            object("b", 20.0).with_observation(0.03),
            object("c", 0.5),
        ];
        let run = run_batch(&records, &EngineConfig::default(), &BatchOptions::default()).unwrap();
        let meta = RunMetadata::new(
            EngineConfig::default(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        );
        let text = format_run_summary(&meta, &run.summary, 0);
        for regime in Regime::ALL {
            assert!(text.contains(regime.label()), "missing {regime}");
        }
        assert!(text.contains("failed=1"));
        assert!(text.contains("win rate (SEG)"));
        assert!(!text.contains("rejected at ingest"));

        let failures = format_failures(&run.outcomes, 10);
        assert!(failures.starts_with("Failed records (1):"));
        assert!(failures.contains("- c "));
    }

    #[test]
    fn object_view_reports_undefined_redshift_at_reference_radius() {
        let res = evaluate(&object("edge", 1.0), &EngineConfig::default()).unwrap();
        let text = format_object(&res, None);
        assert!(text.contains("very_close"));
        assert!(text.contains("undefined"));
        assert!(!text.lines().any(|l| l.starts_with("- D_delta") && l.contains('%')));
    }

    #[test]
    fn object_view_shows_dilation_difference_and_intersection() {
        let res = evaluate(&object("mid", 2.5), &EngineConfig::default()).unwrap();
        let text = format_object(&res, None);
        let delta = text.lines().find(|l| l.starts_with("- D_delta")).unwrap();
        assert!(delta.ends_with("%)"));
        assert!(text.contains("- r*"));
        assert!(text.contains("- E/E_rest"));
    }

    #[test]
    fn object_view_shows_verdict() {
        let res = evaluate(&object("o", 25.0), &EngineConfig::default()).unwrap();
        let cmp = compare(&res, Some(0.03)).unwrap();
        let text = format_object(&res, Some(&cmp));
        assert!(text.contains("verdict    : TIE"));
    }

    #[test]
    fn truncate_marks_cut_ids() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd.");
    }
}

//! End-to-end checks through the public API: evaluate → compare → aggregate.

use segcalc::data::{SampleSpec, generate_catalog};
use segcalc::domain::{
    Comparison, DensityParams, EngineConfig, M_SUN, ObjectRecord, PHI, PhysicalConstants,
    Regime, RegimeBoundaries, Verdict,
};
use segcalc::error::SegError;
use segcalc::eval::{BatchOptions, FailurePolicy, aggregate, compare, evaluate, run_batch};
use segcalc::models::density;

fn solar(id: &str, x: f64) -> ObjectRecord {
    let r_s = PhysicalConstants::default().schwarzschild_radius(M_SUN).unwrap();
    ObjectRecord::new(id, M_SUN, x * r_s)
}

#[test]
fn reference_radius_object() {
    let cfg = EngineConfig::default();
    let res = evaluate(&solar("edge", 1.0), &cfg).unwrap();
    assert_eq!(res.regime, Regime::VeryClose);
    assert!((res.xi - 0.8017).abs() < 1e-3, "xi = {}", res.xi);
    assert!((res.d_seg - 0.5550).abs() < 1e-3, "d_seg = {}", res.d_seg);
    assert_eq!(res.d_gr, 0.0);
    assert!(res.delta_m_pct > 0.0);
    assert!(res.redshift.is_none());
    assert!(matches!(compare(&res, Some(0.1)), Err(SegError::Domain(_))));
}

#[test]
fn far_field_models_coincide() {
    let cfg = EngineConfig::default();
    for x in [10.0, 42.0, 1e4] {
        let res = evaluate(&solar("far", x).with_observation(1e-3), &cfg).unwrap();
        assert_eq!(res.regime, Regime::Weak);
        assert_eq!(res.delta_m_pct, 0.0);
        let z = res.redshift.unwrap();
        assert_eq!(z.z_seg_total, z.z_grsr);
        assert_eq!(compare(&res, Some(1e-3)).unwrap().verdict(), Some(Verdict::Tie));
    }
}

#[test]
fn density_is_bounded_and_decreasing_across_regimes() {
    let cfg = EngineConfig::default();
    let mut prev = f64::INFINITY;
    let mut x = 1.0;
    while x < 500.0 {
        let xi = density(x, &cfg).unwrap();
        assert!((0.0..=1.0).contains(&xi));
        assert!(xi <= prev + 1e-15, "not monotone at x = {x}");
        prev = xi;
        x *= 1.01;
    }
}

/// Non-default boundary sets and density ceilings that pass validation.
fn custom_configs() -> Vec<EngineConfig> {
    let mut out = Vec::new();
    for ceiling in [1.0, 0.8, 0.6] {
        for (lo, hi, mid, far) in [(1.8, 2.2, 3.0, 20.0), (1.5, 2.5, 4.0, 12.0), (2.0, 2.1, 2.5, 6.0)] {
            let boundaries = RegimeBoundaries::new(lo, hi, mid, far).unwrap();
            let cfg = EngineConfig::default()
                .with_boundaries(boundaries)
                .and_then(|c| c.with_density(DensityParams::new(ceiling).unwrap()));
            out.push(cfg.unwrap_or_else(|e| panic!("ceiling {ceiling} with {boundaries:?}: {e}")));
        }
    }
    out
}

#[test]
fn reference_radius_stays_finite_under_custom_configs() {
    for cfg in custom_configs() {
        let ceiling = cfg.density().ceiling();
        let res = evaluate(&solar("edge", 1.0), &cfg).unwrap();
        assert_eq!(res.regime, Regime::VeryClose);
        assert!((res.xi - ceiling * (1.0 - (-PHI).exp())).abs() < 1e-12);
        assert!(res.d_seg.is_finite() && res.d_seg > 0.0 && res.d_seg <= 1.0);
        assert_eq!(res.d_gr, 0.0);
        assert!(res.redshift.is_none());
    }
}

#[test]
fn weak_field_coincides_under_custom_configs() {
    for cfg in custom_configs() {
        let far = cfg.boundaries().far_field();
        for x in [far, 1.5 * far, 1e3, 1e6] {
            let rec = solar("far", x).with_velocity(15_000.0, Some(4_000.0)).with_observation(1e-3);
            let res = evaluate(&rec, &cfg).unwrap();
            assert_eq!(res.regime, Regime::Weak, "x = {x} far = {far}");
            assert_eq!(res.delta_m_pct, 0.0);
            let z = res.redshift.unwrap();
            assert_eq!(z.z_seg_total, z.z_grsr);
            assert_eq!(compare(&res, Some(1e-3)).unwrap().verdict(), Some(Verdict::Tie));
        }
        // Just inside the far-field threshold the correction still applies.
        let inside = evaluate(&solar("strong", 0.95 * far), &cfg).unwrap();
        assert_ne!(inside.regime, Regime::Weak);
        assert!(inside.delta_m_pct > 0.0);
    }
}

#[test]
fn density_is_bounded_and_decreasing_under_custom_configs() {
    for cfg in custom_configs() {
        let ceiling = cfg.density().ceiling();
        let mut prev = f64::INFINITY;
        let mut x = 1.0;
        while x < 500.0 {
            let xi = density(x, &cfg).unwrap();
            assert!((0.0..=ceiling).contains(&xi), "xi = {xi} at x = {x}");
            assert!(xi <= prev + 1e-15, "not monotone at x = {x} for {cfg:?}");
            prev = xi;
            x *= 1.01;
        }
    }
}

#[test]
fn below_reference_radius_is_a_domain_error() {
    let err = evaluate(&solar("inside", 0.9), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, SegError::Domain(_)));
}

#[test]
fn batch_summary_matches_manual_aggregation() {
    let cfg = EngineConfig::default();
    let records = generate_catalog(&SampleSpec::default(), &cfg).unwrap();

    let manual = aggregate(records.iter().map(|r| {
        let res = evaluate(r, &cfg).unwrap();
        let cmp = compare(&res, r.z_obs).unwrap();
        (res.regime, cmp)
    }));
    let run = run_batch(&records, &cfg, &BatchOptions::default()).unwrap();

    assert_eq!(run.summary.verdicts, manual.verdicts);
    assert_eq!(run.summary.by_regime, manual.by_regime);
    assert_eq!(run.summary.with_observation, manual.with_observation);
    assert_eq!(run.summary.prediction_only, manual.prediction_only);
    assert_eq!(run.summary.residuals_seg.n, manual.residuals_seg.n);

    let weak = run.summary.regime(Regime::Weak);
    assert_eq!(weak.verdicts.segmented + weak.verdicts.baseline, 0);
}

#[test]
fn parallel_run_equals_sequential_run() {
    let cfg = EngineConfig::default();
    let spec = SampleSpec {
        count: 500,
        seed: 2024,
        ..SampleSpec::default()
    };
    let records = generate_catalog(&spec, &cfg).unwrap();

    let par = run_batch(&records, &cfg, &BatchOptions::default()).unwrap();
    let seq = run_batch(
        &records,
        &cfg,
        &BatchOptions {
            policy: FailurePolicy::Skip,
            parallel: false,
        },
    )
    .unwrap();

    assert_eq!(par.outcomes, seq.outcomes);
    assert_eq!(par.summary.verdicts, seq.summary.verdicts);
    assert_eq!(par.summary.by_regime, seq.summary.by_regime);
    assert_eq!(par.summary.residuals_gr.n, seq.summary.residuals_gr.n);
}

#[test]
fn missing_observations_only_produce_predictions() {
    let cfg = EngineConfig::default();
    let records: Vec<_> = [1.5, 2.0, 2.5, 5.0, 50.0]
        .iter()
        .enumerate()
        .map(|(i, &x)| solar(&format!("p{i}"), x))
        .collect();
    let run = run_batch(&records, &cfg, &BatchOptions::default()).unwrap();
    assert_eq!(run.summary.prediction_only, 5);
    assert_eq!(run.summary.verdicts.total(), 0);
    assert_eq!(run.summary.win_rate_pct(), None);
    for o in &run.outcomes {
        let scored = o.outcome.as_ref().unwrap();
        assert!(matches!(scored.comparison, Comparison::PredictionOnly(_)));
    }
}

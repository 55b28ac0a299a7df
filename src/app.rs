//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the tracing subscriber
//! - parses CLI arguments
//! - resolves the engine configuration (file + flag overrides)
//! - runs the batch pipeline or a single-object evaluation
//! - prints reports and writes optional exports

use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{BatchArgs, Command, DemoArgs, EngineArgs, ObjectArgs, RunArgs};
use crate::data::SampleSpec;
use crate::domain::{EngineConfig, ObjectRecord};
use crate::error::AppError;
use crate::eval::{BatchOptions, FailurePolicy, compare, evaluate};
use crate::io::read_config_json;

pub mod pipeline;

use pipeline::CatalogSource;

/// Entry point for the `seg` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Demo(args) => handle_demo(args),
        Command::Object(args) => handle_object(args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`) so stdout stays the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    // A second call (e.g. from tests driving `run`) keeps the first subscriber.
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = engine_config_from_args(&args.engine)?;
    let source = CatalogSource::Csv(args.csv.clone());
    execute_batch(source, &config, &args.batch)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = engine_config_from_args(&args.engine)?;
    let spec = SampleSpec {
        count: args.count,
        seed: args.seed,
        obs_noise: args.obs_noise,
        missing_obs_prob: args.missing_obs_prob,
        ..SampleSpec::default()
    };
    execute_batch(CatalogSource::Synthetic(spec), &config, &args.batch)
}

fn execute_batch(source: CatalogSource, config: &EngineConfig, batch: &BatchArgs) -> Result<(), AppError> {
    let options = batch_options_from_args(batch);
    let output = pipeline::run_catalog(source, config, &options)?;

    println!(
        "{}",
        crate::report::format_run_summary(&output.metadata, &output.run.summary, output.row_errors.len())
    );
    let failures = crate::report::format_failures(&output.run.outcomes, batch.show_failures);
    if !failures.is_empty() {
        println!("{failures}");
    }

    if let Some(path) = &batch.export_results {
        crate::io::write_results_csv(path, &output.run.outcomes)?;
    }
    if let Some(path) = &batch.export_summary {
        crate::io::write_summary_json(path, &output.summary_file())?;
    }

    Ok(())
}

fn handle_object(args: ObjectArgs) -> Result<(), AppError> {
    let config = engine_config_from_args(&args.engine)?;
    let mass_kg = args.mass_msun * config.constants().m_sun();

    let radius_m = match (args.radius_m, args.r_over_rs) {
        (Some(r), _) => r,
        (None, Some(x)) => x * config.constants().schwarzschild_radius(mass_kg)?,
        (None, None) => return Err(AppError::new(2, "Either --radius-m or --r-over-rs is required.")),
    };

    let record = ObjectRecord {
        id: args.id,
        mass_kg,
        radius_m,
        v_mps: args.v_mps,
        v_los_mps: args.v_los_mps,
        z_obs: args.z_obs,
    };

    let result = evaluate(&record, &config)?;
    // At the reference radius there is nothing to compare; still show the object.
    let comparison = match result.redshift {
        Some(_) => Some(compare(&result, record.z_obs)?),
        None => None,
    };

    println!("{}", crate::report::format_object(&result, comparison.as_ref()));
    Ok(())
}

/// Resolve the engine configuration: defaults, then the JSON file, then flag overrides.
pub fn engine_config_from_args(args: &EngineArgs) -> Result<EngineConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => EngineConfig::default(),
    };

    if args.log_mass_min.is_some() || args.log_mass_max.is_some() {
        let lo = args.log_mass_min.unwrap_or(config.correction().log_mass_min());
        let hi = args.log_mass_max.unwrap_or(config.correction().log_mass_max());
        config = config.with_correction(config.correction().with_log_mass_bounds(lo, hi)?);
    }

    Ok(config)
}

pub fn batch_options_from_args(args: &BatchArgs) -> BatchOptions {
    BatchOptions {
        policy: if args.halt_on_error {
            FailurePolicy::Halt
        } else {
            FailurePolicy::Skip
        },
        parallel: !args.sequential,
    }
}

//! Command-line parsing for the `seg` evaluator.
//!
//! Argument parsing and command dispatch stay separate from the physics and
//! evaluation code; `app` turns these structs into an [`EngineConfig`] and
//! [`BatchOptions`].
//!
//! [`EngineConfig`]: crate::domain::EngineConfig
//! [`BatchOptions`]: crate::eval::BatchOptions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "seg",
    version,
    about = "Segment-density vs. baseline redshift evaluator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate every object in a catalog CSV and summarize the verdicts.
    Run(RunArgs),
    /// Evaluate a seeded synthetic catalog spanning every regime.
    Demo(DemoArgs),
    /// Evaluate a single object and print every derived quantity.
    Object(ObjectArgs),
}

/// Options shared by every command that evaluates objects.
#[derive(Debug, Args, Clone, Default)]
pub struct EngineArgs {
    /// Engine configuration JSON (constants, regime boundaries, calibration).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Override the lower log10(M/kg) calibration bound of the mass correction.
    #[arg(long)]
    pub log_mass_min: Option<f64>,

    /// Override the upper log10(M/kg) calibration bound of the mass correction.
    #[arg(long)]
    pub log_mass_max: Option<f64>,
}

/// Options shared by the batch commands.
#[derive(Debug, Args, Clone, Default)]
pub struct BatchArgs {
    /// Export per-record results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_results: Option<PathBuf>,

    /// Export the run summary (with run metadata) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// Stop at the first record that fails instead of skipping it.
    #[arg(long)]
    pub halt_on_error: bool,

    /// Evaluate records on a single thread.
    #[arg(long)]
    pub sequential: bool,

    /// Maximum number of failed records listed in the report.
    #[arg(long, default_value_t = 20)]
    pub show_failures: usize,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Catalog CSV: id,mass_kg,radius_m[,v_mps,v_los_mps,z_obs].
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Number of synthetic objects.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub count: usize,

    /// Random seed for the synthetic catalog.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the multiplicative noise on observed redshifts.
    #[arg(long, default_value_t = 0.02)]
    pub obs_noise: f64,

    /// Probability that an object has no observed redshift.
    #[arg(long, default_value_t = 0.1)]
    pub missing_obs_prob: f64,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub batch: BatchArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ObjectArgs {
    /// Object label.
    #[arg(long, default_value = "object")]
    pub id: String,

    /// Mass in solar masses.
    #[arg(long)]
    pub mass_msun: f64,

    /// Radius in metres.
    #[arg(long, required_unless_present = "r_over_rs", conflicts_with = "r_over_rs")]
    pub radius_m: Option<f64>,

    /// Radius as a multiple of the reference radius r_s.
    #[arg(long)]
    pub r_over_rs: Option<f64>,

    /// Bulk speed [m/s].
    #[arg(long)]
    pub v_mps: Option<f64>,

    /// Line-of-sight velocity [m/s], positive when receding.
    #[arg(long, allow_negative_numbers = true)]
    pub v_los_mps: Option<f64>,

    /// Observed redshift to compare against.
    #[arg(long)]
    pub z_obs: Option<f64>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_parses_batch_flags() {
        let cli = Cli::parse_from([
            "seg",
            "run",
            "--csv",
            "cat.csv",
            "--halt-on-error",
            "--sequential",
            "--export-summary",
            "s.json",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.csv, PathBuf::from("cat.csv"));
        assert!(args.batch.halt_on_error && args.batch.sequential);
        assert_eq!(args.batch.export_summary, Some(PathBuf::from("s.json")));
        assert_eq!(args.batch.export_results, None);
    }

    #[test]
    fn object_requires_a_radius() {
        assert!(Cli::try_parse_from(["seg", "object", "--mass-msun", "1"]).is_err());
        assert!(
            Cli::try_parse_from(["seg", "object", "--mass-msun", "1", "--r-over-rs", "5", "--radius-m", "1e4"])
                .is_err()
        );
        let cli = Cli::parse_from(["seg", "object", "--mass-msun", "1", "--r-over-rs", "5", "--v-los-mps", "-300"]);
        let Command::Object(args) = cli.command else {
            panic!("expected object");
        };
        assert_eq!(args.r_over_rs, Some(5.0));
        assert_eq!(args.v_los_mps, Some(-300.0));
    }
}

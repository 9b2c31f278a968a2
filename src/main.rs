use anyhow::{Context, Result};
use balancing_econometrics::{config, pipeline, telemetry};
use clap::Parser;
use config::Config;
use std::path::PathBuf;
use telemetry::init_tracing;
use tracing::info;

/// Fit and compare balancing-price models on a day-ahead / aFRR price file
#[derive(Parser, Debug)]
#[command(name = "balancing-econometrics", version)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Price CSV, overrides `input.path`
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Country to model, overrides `model.country`
    #[arg(long)]
    country: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut cfg = Config::load_from(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    if let Some(input) = args.input {
        cfg.input.path = input;
    }
    if let Some(country) = args.country {
        cfg.model.country = country;
    }

    init_tracing(cfg.output.log_json);
    info!(input = %cfg.input.path.display(), country = %cfg.model.country, "starting run");

    let report = pipeline::run(&cfg)?;

    info!(
        models = report.models.len(),
        test_rows = report.partition.test_rows,
        "run complete"
    );
    Ok(())
}

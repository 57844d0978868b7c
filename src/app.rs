//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments and resolves environment defaults
//! - runs ingest + estimation
//! - prints the result and writes the optional export

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::EstimateConfig;
use crate::error::AppError;
use crate::estimate::{DEFAULT_CONTAMINATION, EllipticEnvelope};
use crate::io::export::{EstimateReport, write_estimate_json};

pub mod pipeline;

/// Environment variable providing the default outlier contamination.
pub const CONTAMINATION_ENV: &str = "TDEER_CONTAMINATION";

/// Entry point for the `tdeer` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let cli = Cli::parse();
    let config = estimate_config_from_args(&cli)?;
    let run = pipeline::run_estimate(&config)?;

    println!("{}", crate::report::format_result_line(run.estimate.tdee));

    if config.summary {
        println!(
            "{}",
            crate::report::format_run_summary(&run.ingest, &run.estimate, &config)
        );
    }

    if let Some(path) = &config.export {
        let report = EstimateReport::new(&config.csv_path, &run.ingest, &run.estimate);
        write_estimate_json(path, &report)?;
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries the result.
///
/// Set `RUST_LOG=debug` to see the outlier filter and fit internals.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve CLI flags plus `.env`/environment defaults into a run config.
pub fn estimate_config_from_args(cli: &Cli) -> Result<EstimateConfig, AppError> {
    dotenvy::dotenv().ok();
    let env_contamination = std::env::var(CONTAMINATION_ENV).ok();

    Ok(EstimateConfig {
        csv_path: cli.file_path.clone(),
        require_steps: cli.steps,
        contamination: resolve_contamination(cli.contamination, env_contamination.as_deref())?,
        summary: cli.summary,
        export: cli.export.clone(),
    })
}

/// Flag beats environment beats the built-in default.
fn resolve_contamination(flag: Option<f64>, env: Option<&str>) -> Result<f64, AppError> {
    let value = match (flag, env) {
        (Some(value), _) => value,
        (None, Some(raw)) => raw.trim().parse::<f64>().map_err(|_| {
            AppError::input(format!(
                "Invalid {CONTAMINATION_ENV} '{raw}' (expected a number)."
            ))
        })?,
        (None, None) => DEFAULT_CONTAMINATION,
    };

    EllipticEnvelope::new(value)
        .map_err(|e| AppError::input(format!("Invalid contamination: {e}")))?;
    Ok(value)
}

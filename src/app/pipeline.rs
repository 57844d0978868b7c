//! Shared estimation pipeline used by the CLI and the integration tests.
//!
//! CSV ingest -> estimate. Presentation (printing, export) is left to the
//! caller so the pipeline can be tested without capturing stdout.

use crate::domain::EstimateConfig;
use crate::error::AppError;
use crate::estimate::{Estimate, EstimatorOptions, estimate_with};
use crate::io::ingest::{IngestedData, load_series};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub estimate: Estimate,
}

/// Load and validate the CSV, then estimate TDEE.
///
/// Validation failures stop before the estimator runs.
pub fn run_estimate(config: &EstimateConfig) -> Result<RunOutput, AppError> {
    let ingest = load_series(&config.csv_path, config.require_steps)?;

    let options = EstimatorOptions::with_contamination(config.contamination)?;
    let estimate = estimate_with(&ingest.series.weight, &ingest.series.calories, &options)?;

    tracing::info!(
        days = ingest.series.len(),
        tdee = estimate.tdee,
        used = estimate.n_inliers,
        outliers = estimate.outlier_days.len(),
        "estimated tdee"
    );

    Ok(RunOutput { ingest, estimate })
}

//! Export an estimate to JSON.
//!
//! The export is meant for downstream scripts: it carries the rounded result
//! alongside the fitted line and the outlier diagnostics.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::{AppError, EXIT_OUTPUT};
use crate::estimate::Estimate;
use crate::io::ingest::IngestedData;

/// JSON document written by `--export`.
#[derive(Debug, Serialize)]
pub struct EstimateReport<'a> {
    pub tool: &'static str,
    pub source: String,
    pub rows: usize,
    pub tdee_calories: i64,
    pub estimate: &'a Estimate,
}

impl<'a> EstimateReport<'a> {
    pub fn new(source: &Path, ingest: &IngestedData, estimate: &'a Estimate) -> Self {
        Self {
            tool: "tdeer",
            source: source.display().to_string(),
            rows: ingest.rows_read,
            tdee_calories: crate::report::rounded_calories(estimate.tdee),
            estimate,
        }
    }
}

/// Write the estimate report as pretty-printed JSON.
pub fn write_estimate_json(path: &Path, report: &EstimateReport<'_>) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_OUTPUT,
            format!("Failed to create export JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write export JSON: {e}")))?;

    tracing::info!(path = %path.display(), "wrote estimate export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MeasurementSeries;
    use crate::estimate::{EstimatorOptions, estimate_with};

    #[test]
    fn export_contains_rounded_tdee_and_line() {
        let weight = [70.0, 69.8, 69.8, 70.0];
        let calories = [1500.0, 2000.0, 2500.0, 2300.0];
        let estimate = estimate_with(&weight, &calories, &EstimatorOptions::default()).unwrap();
        let ingest = IngestedData {
            series: MeasurementSeries {
                weight: weight.to_vec(),
                calories: calories.to_vec(),
                steps: None,
            },
            rows_read: 4,
        };

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("estimate.json");
        let report = EstimateReport::new(Path::new("log.csv"), &ingest, &estimate);
        write_estimate_json(&out, &report).unwrap();

        let json: serde_json::Value =
            serde_json::from_reader(File::open(&out).unwrap()).unwrap();
        assert_eq!(json["tool"], "tdeer");
        assert_eq!(json["rows"], 4);
        assert_eq!(json["tdee_calories"], 2000);
        assert!(json["estimate"]["slope"].as_f64().unwrap() > 0.0);
        assert!(json["estimate"]["envelope"]["location"].is_number());
    }

    #[test]
    fn unwritable_path_maps_to_output_exit_code() {
        let estimate = estimate_with(
            &[70.0, 69.8, 69.8, 70.0],
            &[1500.0, 2000.0, 2500.0, 2300.0],
            &EstimatorOptions::default(),
        )
        .unwrap();
        let ingest = IngestedData {
            series: MeasurementSeries {
                weight: vec![],
                calories: vec![],
                steps: None,
            },
            rows_read: 0,
        };
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing-dir").join("estimate.json");

        let report = EstimateReport::new(Path::new("log.csv"), &ingest, &estimate);
        let err = write_estimate_json(&out, &report).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_OUTPUT);
    }
}

//! Shared domain types.
//!
//! These types are passed between ingest, estimation and reporting.

use std::path::PathBuf;

use crate::estimate::DEFAULT_CONTAMINATION;

/// Aligned daily measurements, one entry per CSV data row.
///
/// Index `i` is day `i`; all present series have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    pub weight: Vec<f64>,
    pub calories: Vec<f64>,
    /// Daily step counts, present only when steps were requested.
    ///
    /// Not used by the estimator yet.
    pub steps: Option<Vec<f64>>,
}

impl MeasurementSeries {
    pub fn len(&self) -> usize {
        self.weight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_empty()
    }
}

/// Resolved run configuration (CLI flags + environment).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateConfig {
    pub csv_path: PathBuf,
    /// Require a `steps` column in addition to `weight` and `calories`.
    pub require_steps: bool,
    /// Expected outlier fraction for the elliptic envelope.
    pub contamination: f64,
    /// Print the diagnostic summary after the result line.
    pub summary: bool,
    /// Write the estimate as JSON to this path.
    pub export: Option<PathBuf>,
}

impl EstimateConfig {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            require_steps: false,
            contamination: DEFAULT_CONTAMINATION,
            summary: false,
            export: None,
        }
    }
}

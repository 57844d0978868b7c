//! Formatted terminal output.
//!
//! We keep formatting code in one place so the estimator stays free of
//! printing and output changes are localized.

use crate::domain::EstimateConfig;
use crate::estimate::Estimate;
use crate::io::ingest::IngestedData;

/// Round an estimate to whole calories for display.
pub fn rounded_calories(tdee: f64) -> i64 {
    tdee.round() as i64
}

/// The single result line printed on success.
pub fn format_result_line(tdee: f64) -> String {
    format!(
        "[TDEER] estimates your tdee to be {} calories",
        rounded_calories(tdee)
    )
}

/// Format the optional diagnostic summary (dataset, outliers, fitted line).
pub fn format_run_summary(
    ingest: &IngestedData,
    estimate: &Estimate,
    config: &EstimateConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== tdeer - TDEE estimate ===\n");
    out.push_str(&format!("File: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Days: {} | weight changes: {} | used: {}\n",
        ingest.rows_read, estimate.n_deltas, estimate.n_inliers
    ));

    let envelope = &estimate.envelope;
    out.push_str(&format!(
        "Outlier filter: contamination={:.3} | center={:+.3} | variance={:.5}\n",
        config.contamination, envelope.location, envelope.variance
    ));
    if estimate.outlier_days.is_empty() {
        out.push_str("Outlier days: none\n");
    } else {
        out.push_str(&format!("Outlier days: {}\n", fmt_days(&estimate.outlier_days)));
    }

    out.push_str(&format!(
        "Fit: change = {:.6} + {:.8} * calories\n",
        estimate.intercept, estimate.slope
    ));
    if let Some(steps) = &ingest.series.steps {
        out.push_str(&format!("Steps: {} values loaded (not used in the fit)\n", steps.len()));
    }

    out
}

fn fmt_days(days: &[usize]) -> String {
    let parts: Vec<String> = days.iter().map(|d| d.to_string()).collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MeasurementSeries;
    use crate::estimate::{EstimatorOptions, estimate_with};

    #[test]
    fn result_line_rounds_to_whole_calories() {
        assert_eq!(
            format_result_line(2349.6),
            "[TDEER] estimates your tdee to be 2350 calories"
        );
        assert_eq!(rounded_calories(2000.4), 2000);
    }

    #[test]
    fn summary_lists_outlier_days() {
        let weight = [80.0, 80.1, 80.0, 80.2, 83.2, 83.3, 83.2, 83.4, 83.3, 83.5, 83.4];
        let calories = [
            2400.0, 2100.0, 2600.0, 2300.0, 2400.0, 2100.0, 2600.0, 2200.0, 2700.0, 2300.0, 2500.0,
        ];
        let estimate = estimate_with(&weight, &calories, &EstimatorOptions::default()).unwrap();
        let ingest = IngestedData {
            series: MeasurementSeries {
                weight: weight.to_vec(),
                calories: calories.to_vec(),
                steps: Some(vec![0.0; weight.len()]),
            },
            rows_read: weight.len(),
        };
        let config = EstimateConfig::new("log.csv");

        let summary = format_run_summary(&ingest, &estimate, &config);
        assert!(summary.contains("File: log.csv"));
        assert!(summary.contains("Outlier days: 3"), "{summary}");
        assert!(summary.contains("Steps: 11 values loaded"));
    }
}

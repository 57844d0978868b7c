//! End-to-end runs of the ingest + estimate pipeline against CSV files.

use std::io::Write;

use tdeer::app::pipeline::run_estimate;
use tdeer::domain::EstimateConfig;
use tdeer::error::{EXIT_ESTIMATE, EXIT_INPUT};
use tdeer::report::format_result_line;

fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Eleven days whose weight change is `(calories - 2400) / 7700`, with a
/// 2 kg water spike between day 6 and day 7.
fn log_with_spike(reversed: bool) -> String {
    let calories = [
        2000.0, 2800.0, 2300.0, 3000.0, 2500.0, 2100.0, 2700.0, 2400.0, 2900.0, 2200.0, 2600.0,
    ];
    let mut weight = 82.0;
    let mut out = if reversed {
        String::from("calories,date,weight\n")
    } else {
        String::from("date,weight,calories\n")
    };
    for (day, &c) in calories.iter().enumerate() {
        if reversed {
            out.push_str(&format!("{c},2024-03-{:02},{weight}\n", day + 1));
        } else {
            out.push_str(&format!("2024-03-{:02},{weight},{c}\n", day + 1));
        }
        weight += (c - 2400.0) / 7700.0;
        if day == 6 {
            weight += 2.0;
        }
    }
    out
}

#[test]
fn estimates_tdee_from_csv_despite_spike() {
    let file = csv_file(&log_with_spike(false));
    let run = run_estimate(&EstimateConfig::new(file.path())).unwrap();

    assert_eq!(run.ingest.rows_read, 11);
    assert_eq!(run.estimate.outlier_days, vec![6]);
    assert!((run.estimate.tdee - 2400.0).abs() < 1e-3, "tdee {}", run.estimate.tdee);
    assert_eq!(
        format_result_line(run.estimate.tdee),
        "[TDEER] estimates your tdee to be 2400 calories"
    );
}

#[test]
fn column_order_does_not_change_the_estimate() {
    let a = csv_file(&log_with_spike(false));
    let b = csv_file(&log_with_spike(true));

    let run_a = run_estimate(&EstimateConfig::new(a.path())).unwrap();
    let run_b = run_estimate(&EstimateConfig::new(b.path())).unwrap();
    assert_eq!(run_a.estimate, run_b.estimate);
}

#[test]
fn flat_log_fails_estimation_not_validation() {
    let file = csv_file("weight,calories\n70,2000\n70,2000\n70,2000\n70,2000\n");
    let err = run_estimate(&EstimateConfig::new(file.path())).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_ESTIMATE);
    assert!(err.message().contains("insufficient variation"), "{}", err.message());
}

#[test]
fn missing_column_stops_before_estimation() {
    let file = csv_file("weight,kcal\n70,2000\n71,2500\n");
    let err = run_estimate(&EstimateConfig::new(file.path())).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert!(err.message().contains("`calories`"));
}

#[test]
fn steps_mode_requires_and_carries_steps() {
    let file = csv_file(&log_with_spike(false));
    let mut config = EstimateConfig::new(file.path());
    config.require_steps = true;
    let err = run_estimate(&config).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);

    let mut with_steps = String::from("weight,calories,steps\n");
    for (i, line) in log_with_spike(false).lines().skip(1).enumerate() {
        let cols: Vec<&str> = line.split(',').collect();
        with_steps.push_str(&format!("{},{},{}\n", cols[1], cols[2], 8000 + i * 100));
    }
    let file = csv_file(&with_steps);
    let mut config = EstimateConfig::new(file.path());
    config.require_steps = true;

    let run = run_estimate(&config).unwrap();
    assert_eq!(run.ingest.series.steps.as_ref().map(Vec::len), Some(11));
    assert!((run.estimate.tdee - 2400.0).abs() < 1e-3);
}

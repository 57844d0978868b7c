//! CSV ingest and validation.
//!
//! This module turns a daily log CSV into aligned `weight` / `calories` series
//! that are safe to hand to the estimator.
//!
//! Design goals:
//! - **Strict schema**: required columns are checked from the header row before
//!   any value is parsed
//! - **Strict rows**: a single missing or non-numeric value rejects the file,
//!   and the error names the line and column
//! - **Lookup by name**: column order in the file does not matter
//! - **Separation of concerns**: no estimation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use csv::StringRecord;

use crate::domain::MeasurementSeries;
use crate::error::AppError;

pub const WEIGHT_COLUMN: &str = "weight";
pub const CALORIES_COLUMN: &str = "calories";
pub const STEPS_COLUMN: &str = "steps";

/// Ingest output: the extracted series plus bookkeeping for reporting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub series: MeasurementSeries,
    pub rows_read: usize,
}

/// Validate `path` and extract the measurement columns in row order.
pub fn load_series(path: &Path, require_steps: bool) -> Result<IngestedData, AppError> {
    ensure_csv_file(path)?;

    let file = File::open(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to open CSV");
        AppError::input(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "failed to read CSV headers");
            AppError::input(format!("Line 1: failed to read CSV headers: {e}"))
        })?
        .clone();

    let header_map = build_header_map(&headers);

    let mut required = vec![WEIGHT_COLUMN, CALORIES_COLUMN];
    if require_steps {
        required.push(STEPS_COLUMN);
    }
    ensure_required_columns_exist(&required, &header_map)?;

    let mut weight = Vec::new();
    let mut calories = Vec::new();
    let mut steps = require_steps.then(Vec::new);
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = result.map_err(|e| {
            tracing::error!(line, error = %e, "unreadable CSV row");
            AppError::input(format!("Line {line}: {e}"))
        })?;

        let row_error = |message: String| AppError::input(format!("Line {line}: {message}"));

        let parse =
            |name: &str| parse_required_f64(&record, &header_map, name).map_err(row_error);

        weight.push(parse(WEIGHT_COLUMN)?);
        calories.push(parse(CALORIES_COLUMN)?);
        if let Some(steps) = steps.as_mut() {
            steps.push(parse(STEPS_COLUMN)?);
        }
    }

    let series = MeasurementSeries {
        weight,
        calories,
        steps,
    };
    if series.is_empty() {
        return Err(AppError::input(format!(
            "CSV '{}' has a header row but no data rows.",
            path.display()
        )));
    }

    tracing::info!(
        path = %path.display(),
        rows = rows_read,
        steps = require_steps,
        "loaded measurement series"
    );

    Ok(IngestedData { series, rows_read })
}

fn ensure_csv_file(path: &Path) -> Result<(), AppError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(AppError::input(format!(
                "The path '{}' is not a regular file.",
                path.display()
            )));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::input(format!(
                "The file at '{}' does not exist.",
                path.display()
            )));
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to access CSV");
            return Err(AppError::input(format!(
                "Failed to access '{}': {e}",
                path.display()
            )));
        }
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
        return Err(AppError::input(format!(
            "The file at '{}' is not a .csv file.",
            path.display()
        )));
    }
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    // Names are otherwise matched exactly (case-sensitive).
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn ensure_required_columns_exist(
    required: &[&str],
    header_map: &HashMap<String, usize>,
) -> Result<(), AppError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !header_map.contains_key(**name))
        .map(|name| format!("`{name}`"))
        .collect();

    match missing.len() {
        0 => Ok(()),
        1 => Err(AppError::input(format!(
            "Missing required column: {}",
            missing[0]
        ))),
        _ => Err(AppError::input(format!(
            "Missing required columns: {}",
            missing.join(", ")
        ))),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_required_f64(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<f64, String> {
    let raw = get_required(record, header_map, name)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `{name}` value '{raw}' (expected a finite number)")),
    }
}

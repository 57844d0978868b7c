//! TDEE estimation from aligned daily weight and calorie series.
//!
//! The model relates the calorie intake of day `i` to the weight change from
//! day `i` to day `i + 1`:
//!
//! ```text
//! delta_i = weight_{i+1} - weight_i ≈ b0 + b1 * calories_i
//! ```
//!
//! Days whose weight change is an outlier (water swings, missed weigh-ins that
//! were back-filled, ...) are removed with a robust [`EllipticEnvelope`] fitted
//! on the deltas alone. The line is then fit on the remaining days and the
//! estimate is the intake at which the predicted change is zero, `-b0 / b1`.
//!
//! The last calorie entry has no following weigh-in and is not used.

use serde::Serialize;

use crate::math::ols::fit_line;
use crate::math::stats::sort_floats;

pub mod envelope;

pub use envelope::{DEFAULT_CONTAMINATION, EllipticEnvelope, EnvelopeFit};

/// A slope is treated as zero when the fitted line moves by less than this
/// fraction of the largest observed weight change across the calorie range.
const SLOPE_REL_EPS: f64 = 1e-9;

/// Why an estimate could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// Weight and calorie series differ in length.
    LengthMismatch { weights: usize, calories: usize },
    /// Not enough days to form a single weight change.
    TooFewObservations { available: usize, required: usize },
    /// A NaN or infinite value in one of the series.
    NonFinite { series: &'static str, index: usize },
    /// Contamination outside `[0, 0.5)`.
    InvalidContamination(f64),
    /// Outlier filtering left nothing to fit.
    NoInliers,
    /// Fewer than two distinct calorie values among the retained days.
    InsufficientVariation { distinct: usize },
    /// Weight change does not depend on calorie intake.
    ZeroSlope,
    /// The least squares solve failed.
    SolveFailed,
    /// The zero crossing is not a finite number.
    NonFiniteResult,
}

impl std::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateError::LengthMismatch { weights, calories } => write!(
                f,
                "weight and calorie series differ in length ({weights} vs {calories})"
            ),
            EstimateError::TooFewObservations {
                available,
                required,
            } => write!(f, "need at least {required} days of data, found {available}"),
            EstimateError::NonFinite { series, index } => {
                write!(f, "non-finite {series} value on day {index}")
            }
            EstimateError::InvalidContamination(c) => {
                write!(f, "contamination must be in [0, 0.5), got {c}")
            }
            EstimateError::NoInliers => write!(f, "outlier filtering removed every day"),
            EstimateError::InsufficientVariation { distinct } => write!(
                f,
                "insufficient variation in calorie data \
                 ({distinct} distinct value(s) after outlier removal)"
            ),
            EstimateError::ZeroSlope => write!(
                f,
                "weight change does not vary with calorie intake (zero slope)"
            ),
            EstimateError::SolveFailed => write!(f, "least squares fit failed"),
            EstimateError::NonFiniteResult => write!(f, "estimate is not a finite number"),
        }
    }
}

impl std::error::Error for EstimateError {}

/// Tuning knobs for [`estimate_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EstimatorOptions {
    pub envelope: EllipticEnvelope,
}

impl EstimatorOptions {
    pub fn with_contamination(contamination: f64) -> Result<Self, EstimateError> {
        Ok(Self {
            envelope: EllipticEnvelope::new(contamination)?,
        })
    }
}

/// A TDEE estimate with the diagnostics used to produce it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Calorie intake at which the fitted weight change is zero.
    pub tdee: f64,
    pub intercept: f64,
    pub slope: f64,
    /// Number of day-over-day weight changes (`n - 1`).
    pub n_deltas: usize,
    pub n_inliers: usize,
    /// Day indices whose weight change was classified as an outlier.
    pub outlier_days: Vec<usize>,
    pub envelope: EnvelopeFit,
}

/// Estimate TDEE with default options.
pub fn estimate(weight: &[f64], calories: &[f64]) -> Result<f64, EstimateError> {
    estimate_with(weight, calories, &EstimatorOptions::default()).map(|e| e.tdee)
}

/// Estimate TDEE and return the fitted model alongside it.
pub fn estimate_with(
    weight: &[f64],
    calories: &[f64],
    options: &EstimatorOptions,
) -> Result<Estimate, EstimateError> {
    validate_series(weight, calories)?;

    let deltas = weight_deltas(weight);
    let features = &calories[..deltas.len()];

    let envelope = options
        .envelope
        .fit(&deltas)
        .ok_or(EstimateError::NoInliers)?;

    let (x_clean, y_clean): (Vec<f64>, Vec<f64>) = features
        .iter()
        .zip(&deltas)
        .zip(&envelope.inliers)
        .filter(|&(_, &keep)| keep)
        .map(|((&x, &y), _)| (x, y))
        .unzip();

    if x_clean.is_empty() {
        return Err(EstimateError::NoInliers);
    }

    let outlier_days = envelope.outlier_indices();
    if !outlier_days.is_empty() {
        tracing::debug!(?outlier_days, "dropping outlier weight changes");
    }

    let distinct = count_distinct(&x_clean);
    if distinct < 2 {
        return Err(EstimateError::InsufficientVariation { distinct });
    }

    let line = fit_line(&x_clean, &y_clean).ok_or(EstimateError::SolveFailed)?;
    if slope_is_negligible(line.slope, &x_clean, &y_clean) {
        return Err(EstimateError::ZeroSlope);
    }

    let tdee = line.zero_crossing();
    if !tdee.is_finite() {
        return Err(EstimateError::NonFiniteResult);
    }

    tracing::debug!(
        intercept = line.intercept,
        slope = line.slope,
        tdee,
        "fitted weight change against calorie intake"
    );

    Ok(Estimate {
        tdee,
        intercept: line.intercept,
        slope: line.slope,
        n_deltas: deltas.len(),
        n_inliers: x_clean.len(),
        outlier_days,
        envelope,
    })
}

/// Day-over-day weight changes, one shorter than `weight`.
pub fn weight_deltas(weight: &[f64]) -> Vec<f64> {
    weight.windows(2).map(|w| w[1] - w[0]).collect()
}

fn validate_series(weight: &[f64], calories: &[f64]) -> Result<(), EstimateError> {
    if weight.len() != calories.len() {
        return Err(EstimateError::LengthMismatch {
            weights: weight.len(),
            calories: calories.len(),
        });
    }
    if weight.len() < 2 {
        return Err(EstimateError::TooFewObservations {
            available: weight.len(),
            required: 2,
        });
    }
    for (series, values) in [("weight", weight), ("calories", calories)] {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(EstimateError::NonFinite { series, index });
        }
    }
    Ok(())
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);
    sorted.dedup();
    sorted.len()
}

fn slope_is_negligible(slope: f64, x: &[f64], y: &[f64]) -> bool {
    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_scale = y.iter().map(|v| v.abs()).fold(0.0, f64::max);
    (slope * (x_max - x_min)).abs() <= SLOPE_REL_EPS * y_scale
}

//! Robust outlier classification for a univariate sample.
//!
//! This is an elliptic envelope: a minimum covariance determinant (MCD)
//! estimate of location and scale, followed by a consistency correction, one
//! reweighting step, and a contamination-based cutoff on the squared
//! Mahalanobis distances. In one dimension the MCD has an exact solution, so
//! no random restarts are involved and the classification is deterministic.
//!
//! Steps for `m` values:
//!
//! 1. Support size `h = ceil((m + 2) / 2)`.
//! 2. Raw MCD: among sorted values, pick the window `sorted[i..=i + h]` with the
//!    smallest range; its mid-range is the raw location (averaged over ties).
//!    The `h` values closest to it form the support, whose population variance
//!    is the raw variance.
//! 3. Rescale the variance so the median distance matches the median of `χ²(1)`.
//! 4. Re-estimate location and variance from the points whose corrected
//!    distance falls below the 97.5% quantile of `χ²(1)`.
//! 5. Points whose final distance exceeds the `(1 - contamination)` quantile of
//!    all final distances are outliers.
//!
//! When a stage ends up with zero variance there is no scale to measure
//! distance with. The envelope then collapses to a single value: points equal
//! to it are inliers, every other point is an outlier.

use serde::Serialize;

use crate::estimate::EstimateError;
use crate::math::stats::{mean, median_mut, population_variance, quantile, sort_floats};

/// Default expected fraction of outliers.
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

/// Median of the chi-squared distribution with one degree of freedom.
const CHI2_1_MEDIAN: f64 = 0.454_936_423_119_572_7;

/// Upper 2.5% point of the chi-squared distribution with one degree of freedom.
const CHI2_1_REWEIGHT_CUTOFF: f64 = 5.023_886_187_314_888;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticEnvelope {
    contamination: f64,
}

impl Default for EllipticEnvelope {
    fn default() -> Self {
        Self {
            contamination: DEFAULT_CONTAMINATION,
        }
    }
}

/// Result of fitting an [`EllipticEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeFit {
    /// Robust (reweighted) center of the sample.
    pub location: f64,
    /// Robust (reweighted) variance. Zero for a collapsed envelope.
    pub variance: f64,
    /// Largest squared distance still classified as an inlier.
    pub threshold: f64,
    /// Squared Mahalanobis distance of every input point.
    #[serde(skip)]
    pub distances: Vec<f64>,
    /// `true` for inliers, aligned with the input.
    #[serde(skip)]
    pub inliers: Vec<bool>,
}

impl EnvelopeFit {
    pub fn inlier_count(&self) -> usize {
        self.inliers.iter().filter(|&&keep| keep).count()
    }

    pub fn outlier_indices(&self) -> Vec<usize> {
        self.inliers
            .iter()
            .enumerate()
            .filter_map(|(idx, &keep)| (!keep).then_some(idx))
            .collect()
    }

    fn collapsed(values: &[f64], location: f64) -> Self {
        let distances: Vec<f64> = values
            .iter()
            .map(|&v| if v == location { 0.0 } else { f64::INFINITY })
            .collect();
        let inliers = distances.iter().map(|&d| d == 0.0).collect();
        Self {
            location,
            variance: 0.0,
            threshold: 0.0,
            distances,
            inliers,
        }
    }
}

impl EllipticEnvelope {
    /// Create an envelope expecting `contamination` outliers, in `[0, 0.5)`.
    pub fn new(contamination: f64) -> Result<Self, EstimateError> {
        if !(0.0..0.5).contains(&contamination) {
            return Err(EstimateError::InvalidContamination(contamination));
        }
        Ok(Self { contamination })
    }

    /// Fit the envelope on `values` and classify each point.
    ///
    /// Returns `None` for an empty sample.
    pub fn fit(&self, values: &[f64]) -> Option<EnvelopeFit> {
        let m = values.len();
        if m == 0 {
            return None;
        }

        let support_size = (m + 3) / 2;
        let (raw_location, raw_support) = raw_mcd(values, support_size)?;
        let raw_variance = population_variance(&raw_support)?;
        tracing::debug!(
            n = m,
            support_size,
            raw_location,
            raw_variance,
            "raw minimum covariance determinant"
        );

        if raw_variance <= 0.0 {
            // The whole support shares one value.
            return Some(EnvelopeFit::collapsed(values, raw_support[0]));
        }

        let mut raw_distances = distances(values, raw_location, raw_variance);
        let correction = median_mut(&mut raw_distances.clone())? / CHI2_1_MEDIAN;
        if !(correction > 0.0 && correction.is_finite()) {
            // More than half of the sample sits exactly on the raw location.
            return Some(EnvelopeFit::collapsed(values, raw_location));
        }
        raw_distances.iter_mut().for_each(|d| *d /= correction);

        let reweighted: Vec<f64> = values
            .iter()
            .zip(&raw_distances)
            .filter(|&(_, &d)| d < CHI2_1_REWEIGHT_CUTOFF)
            .map(|(&v, _)| v)
            .collect();
        let location = mean(&reweighted)?;
        let variance = population_variance(&reweighted)?;
        if variance <= 0.0 {
            return Some(EnvelopeFit::collapsed(values, reweighted[0]));
        }

        let distances = distances(values, location, variance);
        let threshold = quantile(&distances, 1.0 - self.contamination)?;
        let inliers = distances.iter().map(|&d| d <= threshold).collect();
        tracing::debug!(location, variance, threshold, "reweighted envelope");

        Some(EnvelopeFit {
            location,
            variance,
            threshold,
            distances,
            inliers,
        })
    }
}

/// Exact univariate MCD: returns the raw location and the support values.
fn raw_mcd(values: &[f64], support_size: usize) -> Option<(f64, Vec<f64>)> {
    let m = values.len();
    if support_size >= m {
        return Some((mean(values)?, values.to_vec()));
    }

    let mut sorted = values.to_vec();
    sort_floats(&mut sorted);

    let ranges: Vec<f64> = (0..m - support_size)
        .map(|i| sorted[i + support_size] - sorted[i])
        .collect();
    let shortest = ranges.iter().copied().fold(f64::INFINITY, f64::min);
    let mids: Vec<f64> = ranges
        .iter()
        .enumerate()
        .filter(|&(_, &r)| r == shortest)
        .map(|(i, _)| 0.5 * (sorted[i + support_size] + sorted[i]))
        .collect();
    let location = mean(&mids)?;

    let mut by_closeness: Vec<f64> = values.to_vec();
    by_closeness.sort_by(|a, b| {
        (a - location)
            .abs()
            .partial_cmp(&(b - location).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    by_closeness.truncate(support_size);

    Some((location, by_closeness))
}

fn distances(values: &[f64], location: f64, variance: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| (v - location) * (v - location) / variance)
        .collect()
}

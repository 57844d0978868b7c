//! Ordinary least squares for a single regressor.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - (b0 + b1 x_i))^2
//! ```
//!
//! Implementation choices:
//! - The regressor is centred before solving. Calorie intakes sit around a few
//!   thousand while weight deltas are fractions of a kilogram, so an uncentred
//!   `[1, x]` design matrix is needlessly ill-conditioned.
//! - The system is solved with SVD (Nalgebra's `QR::solve` only handles square
//!   systems). The intercept is mapped back to the uncentred scale afterwards.

use nalgebra::{DMatrix, DVector};

use crate::math::stats::mean;

/// A fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LineFit {
    /// The `x` at which the fitted line crosses `y = 0`.
    pub fn zero_crossing(&self) -> f64 {
        -self.intercept / self.slope
    }
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y ≈ intercept + slope * x` by ordinary least squares.
///
/// Returns `None` when the inputs are empty, of unequal length, or the solve
/// fails. Callers are expected to reject regressors without variation first;
/// for those the SVD solve yields the minimum-norm solution (slope 0).
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }

    let x_mean = mean(x)?;
    let n = x.len();

    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { x[row] - x_mean });
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs)?;
    let slope = beta[1];
    let intercept = beta[0] - slope * x_mean;

    Some(LineFit { intercept, slope })
}

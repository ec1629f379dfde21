//! Ordinary least squares.
//!
//! The rolling regression repeatedly solves tiny problems of the form:
//!
//! ```text
//! minimize Σ (y_i - (a + b x_i))^2
//! ```
//!
//! Implementation choices:
//! - We solve through SVD so that tall design matrices (more rows than columns)
//!   are handled without forming normal equations.
//! - A window whose `x` values are all equal has no unique slope; we report
//!   that as `None` instead of returning an arbitrary minimum-norm solution.

use nalgebra::{DMatrix, DVector};

/// Slope and intercept of a fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y` on `x` with an intercept.
///
/// Needs at least two points and some spread in `x`.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = x_max - x_min;
    if spread.is_nan() || spread <= 0.0 {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { x[row] });
    let target = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &target)?;
    Some(LineFit {
        intercept: beta[0],
        slope: beta[1],
    })
}

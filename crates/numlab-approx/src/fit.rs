//! Least-squares polynomial fitting.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use numlab_core::{NumError, Result};
use numlab_math::stats::mean_squared_error;
use numlab_math::{linspace, Polynomial};

/// Singular values below this fraction of the largest are treated as zero.
const SVD_RELATIVE_EPS: f64 = 1e-14;

#[derive(Debug, Clone, PartialEq)]
pub struct PolyFit {
    pub polynomial: Polynomial,
    /// Mean squared residual over the fitted samples
    pub mse: f64,
}

impl PolyFit {
    /// Coefficients highest power first.
    pub fn descending(&self) -> Vec<f64> {
        self.polynomial.descending()
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.polynomial.evaluate(x)
    }
}

/// Fit a polynomial of the given degree to `(xs, ys)` minimizing the sum of
/// squared residuals.
///
/// The Vandermonde system is solved through its SVD, which stays well-behaved
/// when the columns are nearly dependent.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<PolyFit> {
    if xs.len() != ys.len() {
        return Err(NumError::DimensionMismatch {
            expected: xs.len(),
            actual: ys.len(),
        });
    }
    let cols = degree + 1;
    if xs.len() < cols {
        return Err(NumError::invalid(format!(
            "degree {degree} fit needs at least {cols} points, got {}",
            xs.len()
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(NumError::invalid("fit samples must be finite"));
    }

    let vandermonde = DMatrix::from_fn(xs.len(), cols, |i, j| xs[i].powi(j as i32));
    let rhs = DVector::from_column_slice(ys);

    let svd = vandermonde.svd(true, true);
    let cutoff = svd.singular_values.max() * SVD_RELATIVE_EPS;
    let coeffs = svd
        .solve(&rhs, cutoff)
        .map_err(|e| NumError::Singular(format!("least-squares solve failed: {e}")))?;

    let polynomial = Polynomial::new(coeffs.iter().copied().collect());
    let fitted: Vec<f64> = xs.iter().map(|&x| polynomial.evaluate(x)).collect();
    let mse = mean_squared_error(ys, &fitted)?;
    tracing::debug!(degree, points = xs.len(), mse, "polynomial fit");

    Ok(PolyFit { polynomial, mse })
}

/// `n` points `(cos t, sin t)` for `t` evenly spaced over `[0, pi]`.
pub fn sample_semicircle(n: usize) -> (Vec<f64>, Vec<f64>) {
    linspace(0.0, PI, n).into_iter().map(|t| (t.cos(), t.sin())).unzip()
}

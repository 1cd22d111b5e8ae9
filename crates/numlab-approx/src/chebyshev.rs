//! Chebyshev series and best-square approximation on `[-1, 1]`.

use std::f64::consts::PI;

use numlab_core::{NumError, Result};
use serde::{Deserialize, Serialize};

use crate::quadrature::{quad, QuadOptions};

/// `T_k(x)` by the three-term recurrence `T_{k+1} = 2x T_k - T_{k-1}`.
pub fn chebyshev_t(k: usize, x: f64) -> f64 {
    match k {
        0 => 1.0,
        1 => x,
        _ => {
            let (mut prev, mut cur) = (1.0, x);
            for _ in 1..k {
                (prev, cur) = (cur, 2.0 * x * cur - prev);
            }
            cur
        }
    }
}

/// A truncated Chebyshev series `sum coeffs[k] * T_k(x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChebyshevSeries {
    pub coeffs: Vec<f64>,
}

impl ChebyshevSeries {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Best-square approximation of `f` of the given degree with respect to
    /// the Chebyshev weight `1 / sqrt(1 - x^2)`.
    pub fn best_square<F: Fn(f64) -> f64>(f: F, degree: usize, options: &QuadOptions) -> Result<Self> {
        chebyshev_coefficients(f, degree, options).map(Self::new)
    }

    /// Evaluate with the Clenshaw recurrence.
    pub fn evaluate(&self, x: f64) -> f64 {
        let Some((&c0, rest)) = self.coeffs.split_first() else {
            return 0.0;
        };
        let (mut b1, mut b2) = (0.0, 0.0);
        for &c in rest.iter().rev() {
            (b1, b2) = (c + 2.0 * x * b1 - b2, b1);
        }
        c0 + x * b1 - b2
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Coefficients `c_0..=c_degree` of the Chebyshev best-square approximation:
///
/// `c_k = (norm_k / pi) * integral_{-1}^{1} f(x) T_k(x) / sqrt(1 - x^2) dx`
///
/// with `norm_0 = 1` and `norm_k = 2` otherwise. The integral is taken in the
/// form `integral_0^pi f(cos t) cos(k t) dt`, which has no endpoint singularity.
pub fn chebyshev_coefficients<F: Fn(f64) -> f64>(
    f: F,
    degree: usize,
    options: &QuadOptions,
) -> Result<Vec<f64>> {
    (0..=degree)
        .map(|k| {
            let kf = k as f64;
            let r = quad(|t: f64| f(t.cos()) * (kf * t).cos(), 0.0, PI, options)?;
            if !r.converged {
                tracing::warn!(k, error = r.error, "chebyshev coefficient integral did not converge");
            }
            if !r.value.is_finite() {
                return Err(NumError::Convergence(format!("coefficient c_{k} is not finite")));
            }
            let norm = if k == 0 { 1.0 } else { 2.0 };
            let c = norm / PI * r.value;
            tracing::debug!(k, c, evaluations = r.evaluations, "chebyshev coefficient");
            Ok(c)
        })
        .collect()
}

//! Roots of `a x^2 + b x + c = 0` under extreme coefficient magnitudes.
//!
//! The textbook formula overflows or cancels catastrophically when the
//! coefficients are huge, tiny, or of wildly different scale. [`solve_quadratic`]
//! picks between the plain formula, a scaled cancellation-free formula, and
//! Newton iteration depending on where the coefficients lie.

use numlab_core::{NumError, Result};

/// Coefficients above this magnitude are considered huge.
pub const LARGE_THRESHOLD: f64 = 1e150;
/// Coefficients below this magnitude are considered tiny.
pub const SMALL_THRESHOLD: f64 = 1e-150;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    None,
    One(f64),
    Two(f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Linear,
    Standard,
    Stable,
    Newton,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Linear => "linear",
            Strategy::Standard => "standard",
            Strategy::Stable => "stable",
            Strategy::Newton => "newton",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewtonOptions {
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            tol: 1e-12,
            max_iter: 10_000,
        }
    }
}

/// Textbook formula `(-b ± sqrt(b^2 - 4ac)) / 2a`.
pub fn standard_roots(a: f64, b: f64, c: f64) -> Roots {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Roots::None;
    }
    let sqrt_d = discriminant.sqrt();
    Roots::Two((-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a))
}

/// Scale the coefficients by their largest magnitude, then use the
/// cancellation-free pair `q / a`, `c / q`.
pub fn stable_roots(a: f64, b: f64, c: f64) -> Roots {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return Roots::None;
    }
    let (a, b, c) = (a / scale, b / scale, c / scale);

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Roots::None;
    }
    let sqrt_d = discriminant.sqrt();
    let q = if b >= 0.0 {
        -(b + sqrt_d) / 2.0
    } else {
        (-b + sqrt_d) / 2.0
    };
    if q == 0.0 {
        // b == 0 and c == 0: double root at the origin
        return Roots::Two(0.0, 0.0);
    }
    Roots::Two(q / a, c / q)
}

/// Newton iteration on `a x^2 + b x + c` from `initial_guess`.
pub fn newton_root(a: f64, b: f64, c: f64, initial_guess: f64, options: &NewtonOptions) -> Result<f64> {
    let mut x = initial_guess;
    for _ in 0..options.max_iter {
        let fx = a * x * x + b * x + c;
        let fpx = 2.0 * a * x + b;
        if fpx.abs() < f64::EPSILON {
            return Err(NumError::Convergence(format!(
                "derivative vanishes near x = {x:e}"
            )));
        }
        let next = x - fx / fpx;
        if (next - x).abs() < options.tol {
            return Ok(next);
        }
        x = next;
    }
    Err(NumError::Convergence(format!(
        "newton iteration exceeded {} iterations",
        options.max_iter
    )))
}

fn all(values: [f64; 3], pred: impl Fn(f64) -> bool) -> bool {
    values.into_iter().all(pred)
}

/// Pick a strategy from the coefficient magnitudes and solve.
///
/// Newton iteration, used when the magnitudes are mixed, only finds the root
/// nearest `initial_guess`.
pub fn solve_quadratic(a: f64, b: f64, c: f64, initial_guess: f64) -> Result<(Strategy, Roots)> {
    if a == 0.0 {
        let roots = if b.abs() < f64::EPSILON {
            Roots::None
        } else {
            Roots::One(-c / b)
        };
        return Ok((Strategy::Linear, roots));
    }

    let mags = [a.abs(), b.abs(), c.abs()];
    if all(mags, |m| m > SMALL_THRESHOLD && m < LARGE_THRESHOLD) {
        Ok((Strategy::Standard, standard_roots(a, b, c)))
    } else if all(mags, |m| m > LARGE_THRESHOLD) || all(mags, |m| m < SMALL_THRESHOLD) {
        Ok((Strategy::Stable, stable_roots(a, b, c)))
    } else {
        tracing::debug!(initial_guess, "mixed coefficient magnitudes, using newton");
        let root = newton_root(a, b, c, initial_guess, &NewtonOptions::default())?;
        Ok((Strategy::Newton, Roots::One(root)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two(r: Roots) -> (f64, f64) {
        match r {
            Roots::Two(x1, x2) => (x1, x2),
            other => panic!("expected two roots, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_coefficients_use_stable_formula() {
        let (strategy, roots) = solve_quadratic(6e154, 4e154, -5e154, 0.0).unwrap();
        assert_eq!(strategy, Strategy::Stable);
        let (x1, x2) = two(roots);
        assert_relative_eq!(x1 + x2, -2.0 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(x1 * x2, -5.0 / 6.0, max_relative = 1e-12);

        // The plain formula overflows in b^2.
        let (s1, _) = two(standard_roots(6e154, 4e154, -5e154));
        assert!(!s1.is_finite());
    }

    #[test]
    fn test_linear_case() {
        assert_eq!(solve_quadratic(0.0, 2.0, 2.0, 0.0).unwrap(), (Strategy::Linear, Roots::One(-1.0)));
        assert_eq!(solve_quadratic(0.0, 0.0, 2.0, 0.0).unwrap(), (Strategy::Linear, Roots::None));
    }

    #[test]
    fn test_stable_avoids_cancellation() {
        let (big, small) = two(stable_roots(1.0, -1e6, 1.0));
        assert_relative_eq!(big, 1e6, max_relative = 1e-12);
        assert_relative_eq!(small, 1e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_mixed_magnitudes_use_newton() {
        let (strategy, roots) = solve_quadratic(1e-154, -1e155, 1e155, 0.0).unwrap();
        assert_eq!(strategy, Strategy::Newton);
        match roots {
            Roots::One(x) => assert_relative_eq!(x, 1.0, max_relative = 1e-12),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_standard_case_and_no_real_roots() {
        let (strategy, roots) = solve_quadratic(1.0, -5.0, 4.0, 0.0).unwrap();
        assert_eq!(strategy, Strategy::Standard);
        assert_eq!(roots, Roots::Two(4.0, 1.0));
        assert_eq!(standard_roots(1.0, 0.0, 1.0), Roots::None);
        assert_eq!(stable_roots(1.0, 0.0, 1.0), Roots::None);
        assert_eq!(stable_roots(1.0, 0.0, 0.0), Roots::Two(0.0, 0.0));
    }

    #[test]
    fn test_newton_flat_derivative_fails() {
        // Starting at the vertex of x^2 + 1 the derivative is zero.
        let err = newton_root(1.0, 0.0, 1.0, 0.0, &NewtonOptions::default()).unwrap_err();
        assert!(matches!(err, NumError::Convergence(_)));
    }
}

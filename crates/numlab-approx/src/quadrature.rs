//! Adaptive numerical integration of scalar functions.
//!
//! [`quad`] is a globally adaptive Gauss-Kronrod (G7-K15) integrator: the
//! subinterval with the largest error estimate is bisected until the summed
//! error meets the tolerance. [`adaptive_simpson`] is the classic composite
//! Simpson rule with step halving.

use numlab_core::traits::Validate;
use numlab_core::{NumError, Result, Tolerance};
use serde::{Deserialize, Serialize};

/// Options for adaptive Gauss-Kronrod quadrature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadOptions {
    /// Relative tolerance (default: 1e-10)
    pub rtol: f64,
    /// Absolute tolerance (default: 1e-12)
    pub atol: f64,
    /// Maximum number of subintervals (default: 200)
    pub limit: usize,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self::from(Tolerance::default())
    }
}

impl From<Tolerance> for QuadOptions {
    fn from(tol: Tolerance) -> Self {
        Self {
            rtol: tol.relative,
            atol: tol.absolute,
            limit: 200,
        }
    }
}

impl Validate for QuadOptions {
    fn validate(&self) -> Result<()> {
        if !(self.rtol >= 0.0 && self.atol >= 0.0) {
            return Err(NumError::invalid("quadrature tolerances must be non-negative"));
        }
        if self.rtol == 0.0 && self.atol == 0.0 {
            return Err(NumError::invalid("at least one quadrature tolerance must be positive"));
        }
        if self.limit == 0 {
            return Err(NumError::invalid("quadrature subinterval limit must be at least 1"));
        }
        Ok(())
    }
}

/// Result of an adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadResult {
    /// Computed integral value
    pub value: f64,
    /// Estimated absolute error
    pub error: f64,
    /// Number of function evaluations
    pub evaluations: usize,
    /// Whether the tolerance was met
    pub converged: bool,
}

impl QuadResult {
    fn zero() -> Self {
        Self {
            value: 0.0,
            error: 0.0,
            evaluations: 0,
            converged: true,
        }
    }

    fn negated(self) -> Self {
        Self {
            value: -self.value,
            ..self
        }
    }
}

// Kronrod abscissae on [0, 1]; odd indices are the 7-point Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Apply the 15-point Kronrod rule on `[a, b]`, using the embedded 7-point
/// Gauss rule for the error estimate.
fn gauss_kronrod_15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> Segment {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = f(center);
    let mut kronrod = WGK[7] * fc;
    let mut gauss = WG[3] * fc;

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = f(center - dx) + f(center + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    }
}

const GK15_EVALUATIONS: usize = 15;

/// Integrate `f` over `[a, b]` with adaptive Gauss-Kronrod quadrature.
///
/// Endpoints are never evaluated, so integrable endpoint singularities are
/// tolerated (at the cost of more subdivisions). `a > b` integrates over
/// `[b, a]` and negates.
pub fn quad<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, options: &QuadOptions) -> Result<QuadResult> {
    options.validate()?;
    if !(a.is_finite() && b.is_finite()) {
        return Err(NumError::invalid(format!("integration bounds must be finite, got [{a}, {b}]")));
    }
    if a == b {
        return Ok(QuadResult::zero());
    }
    if a > b {
        return quad(f, b, a, options).map(QuadResult::negated);
    }

    let mut segments = vec![gauss_kronrod_15(&f, a, b)];
    let mut evaluations = GK15_EVALUATIONS;

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();

        if !value.is_finite() {
            return Err(NumError::Convergence(format!(
                "integrand produced non-finite values on [{a}, {b}]"
            )));
        }

        let target = options.atol.max(options.rtol * value.abs());
        if error <= target || segments.len() >= options.limit {
            let converged = error <= target;
            if !converged {
                tracing::warn!(
                    a, b, value, error, limit = options.limit,
                    "quadrature hit the subinterval limit"
                );
            }
            return Ok(QuadResult {
                value,
                error,
                evaluations,
                converged,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.a + seg.b);
        // no more resolution left to gain from bisecting
        if mid <= seg.a || mid >= seg.b {
            segments.push(seg);
            let value: f64 = segments.iter().map(|s| s.value).sum();
            let error: f64 = segments.iter().map(|s| s.error).sum();
            tracing::warn!(a, b, value, error, "quadrature interval can no longer be bisected");
            return Ok(QuadResult {
                value,
                error,
                evaluations,
                converged: false,
            });
        }
        segments.push(gauss_kronrod_15(&f, seg.a, mid));
        segments.push(gauss_kronrod_15(&f, mid, seg.b));
        evaluations += 2 * GK15_EVALUATIONS;
    }
}

/// Options for step-halving composite Simpson integration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpsonOptions {
    /// Stop when two successive estimates differ by less than this
    pub eps: f64,
    /// Maximum number of step halvings
    pub max_iter: usize,
}

impl Default for SimpsonOptions {
    fn default() -> Self {
        Self {
            eps: 1e-6,
            max_iter: 50,
        }
    }
}

/// Panel count beyond which halving stops regardless of `max_iter`.
const MAX_SIMPSON_PANELS: usize = 1 << 24;

/// Composite Simpson with repeated step halving.
///
/// Starts from the single-panel Simpson estimate and doubles the panel count
/// until two successive estimates agree within `eps`.
pub fn adaptive_simpson<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    options: &SimpsonOptions,
) -> Result<QuadResult> {
    if !(a.is_finite() && b.is_finite()) {
        return Err(NumError::invalid(format!("integration bounds must be finite, got [{a}, {b}]")));
    }
    if !(options.eps > 0.0) {
        return Err(NumError::invalid("simpson tolerance must be positive"));
    }
    if a == b {
        return Ok(QuadResult::zero());
    }

    let fa = f(a);
    let fb = f(b);
    let mut h = b - a;
    let mut previous = h / 6.0 * (fa + 4.0 * f(a + 0.5 * h) + fb);
    let mut evaluations = 3;
    let mut panels = 1usize;

    for _ in 0..options.max_iter {
        if panels * 2 > MAX_SIMPSON_PANELS {
            break;
        }
        panels *= 2;
        h *= 0.5;

        let mut sum = 0.0;
        for i in 0..panels {
            let x = a + h * i as f64;
            let x_next = if i + 1 == panels { b } else { x + h };
            sum += f(x) + 4.0 * f(x + 0.5 * h) + f(x_next);
        }
        evaluations += 3 * panels;
        let current = sum * h / 6.0;

        let diff = (current - previous).abs();
        if diff < options.eps {
            return Ok(QuadResult {
                value: current,
                error: diff,
                evaluations,
                converged: true,
            });
        }
        previous = current;
    }

    tracing::warn!(panels, "simpson step halving exceeded the iteration limit");
    Ok(QuadResult {
        value: previous,
        error: f64::NAN,
        evaluations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_quad_polynomial_exact() {
        // G7-K15 integrates degree <= 22 polynomials exactly, so no subdivision happens.
        let r = quad(|x| 5.0 * x.powi(4) - 2.0 * x + 1.0, -1.0, 2.0, &QuadOptions::default()).unwrap();
        assert_abs_diff_eq!(r.value, 33.0 - 3.0 + 3.0, epsilon = 1e-12);
        assert!(r.converged);
        assert_eq!(r.evaluations, 15);
    }

    #[test]
    fn test_quad_sin() {
        let r = quad(f64::sin, 0.0, PI, &QuadOptions::default()).unwrap();
        assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-12);
        assert!(r.converged);
    }

    #[test]
    fn test_quad_reversed_and_empty() {
        let r = quad(|x| x, 1.0, 0.0, &QuadOptions::default()).unwrap();
        assert_abs_diff_eq!(r.value, -0.5, epsilon = 1e-14);
        let r = quad(|x| x, 3.0, 3.0, &QuadOptions::default()).unwrap();
        assert_eq!(r.value, 0.0);
        assert_eq!(r.evaluations, 0);
    }

    #[test]
    fn test_quad_endpoint_singularity() {
        // integral of 1/sqrt(x) over [0, 1] is 2
        let options = QuadOptions {
            rtol: 1e-8,
            atol: 1e-10,
            limit: 500,
        };
        let r = quad(|x: f64| 1.0 / x.sqrt(), 0.0, 1.0, &options).unwrap();
        assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-6);
        assert!(r.evaluations > 15);
    }

    #[test]
    fn test_quad_limit_reports_non_convergence() {
        let options = QuadOptions {
            rtol: 1e-14,
            atol: 1e-16,
            limit: 1,
        };
        let r = quad(|x: f64| (50.0 * x).sin().abs(), 0.0, 1.0, &options).unwrap();
        assert!(!r.converged);
        assert_eq!(r.evaluations, 15);
    }

    #[test]
    fn test_quad_rejects_bad_options() {
        let bad = QuadOptions {
            rtol: 0.0,
            atol: 0.0,
            limit: 10,
        };
        assert!(quad(|x| x, 0.0, 1.0, &bad).is_err());
        assert!(quad(|x| x, 0.0, f64::INFINITY, &QuadOptions::default()).is_err());
        assert!(quad(|_| f64::NAN, 0.0, 1.0, &QuadOptions::default()).is_err());
    }

    #[test]
    fn test_simpson_sin_and_cubic() {
        let r = adaptive_simpson(f64::sin, 0.0, PI, &SimpsonOptions::default()).unwrap();
        assert!(r.converged);
        assert_abs_diff_eq!(r.value, 2.0, epsilon = 1e-6);

        // Simpson is exact for cubics: the first halving already agrees.
        let r = adaptive_simpson(|x| x * x * x, 0.0, 1.0, &SimpsonOptions::default()).unwrap();
        assert!(r.converged);
        assert_abs_diff_eq!(r.value, 0.25, epsilon = 1e-14);
        assert_eq!(r.evaluations, 3 + 6);
    }

    #[test]
    fn test_simpson_reversed_and_empty() {
        let r = adaptive_simpson(f64::sin, PI, 0.0, &SimpsonOptions::default()).unwrap();
        assert!(r.converged);
        assert_abs_diff_eq!(r.value, -2.0, epsilon = 1e-6);

        let r = adaptive_simpson(f64::sin, 1.5, 1.5, &SimpsonOptions::default()).unwrap();
        assert_eq!(r.value, 0.0);
        assert_eq!(r.evaluations, 0);
        assert!(r.converged);
    }

    #[test]
    fn test_simpson_iteration_limit() {
        let options = SimpsonOptions {
            eps: 1e-15,
            max_iter: 2,
        };
        let r = adaptive_simpson(f64::exp, 0.0, 5.0, &options).unwrap();
        assert!(!r.converged);
        assert_eq!(r.evaluations, 3 + 6 + 12);
        assert_abs_diff_eq!(r.value, 5f64.exp() - 1.0, epsilon = 0.5);
    }
}

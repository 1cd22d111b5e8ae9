use std::f64::consts::PI;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use numlab_approx::fit::sample_semicircle;
use numlab_approx::{adaptive_simpson, polyfit, quad, ChebyshevSeries, QuadOptions, SimpsonOptions};
use numlab_core::traits::Validate;
use numlab_core::Tolerance;
use numlab_math::linspace;
use numlab_math::stats::rms_error;

fn semicircle(x: f64) -> f64 {
    (1.0 - x * x).max(0.0).sqrt()
}

#[test]
fn test_quadrature_rules_agree() {
    let f = |x: f64| (-x * x).exp() * (3.0 * x).cos();
    let gk = quad(f, -2.0, 1.5, &QuadOptions::default()).unwrap();
    let simpson = adaptive_simpson(
        f,
        -2.0,
        1.5,
        &SimpsonOptions {
            eps: 1e-10,
            ..SimpsonOptions::default()
        },
    )
    .unwrap();
    assert!(gk.converged && simpson.converged);
    assert_abs_diff_eq!(gk.value, simpson.value, epsilon = 1e-9);
}

#[test]
fn test_quad_options_from_tolerance() {
    let options = QuadOptions::from(Tolerance::loose());
    assert_eq!(options.rtol, 1e-6);
    assert_eq!(options.atol, 1e-6);
    options.validate().unwrap();

    let r = quad(f64::exp, 0.0, 1.0, &options).unwrap();
    assert_relative_eq!(r.value, 1f64.exp() - 1.0, max_relative = 1e-6);
}

#[test]
fn test_c0_is_weighted_mean() {
    // c_0 = (1 / pi) * integral f(x) / sqrt(1 - x^2) dx
    let f = |x: f64| x.exp() + 0.5 * x;
    let series = ChebyshevSeries::best_square(f, 0, &QuadOptions::default()).unwrap();
    let mean = quad(|t: f64| f(t.cos()), 0.0, PI, &QuadOptions::default()).unwrap().value / PI;
    assert_relative_eq!(series.coeffs[0], mean, max_relative = 1e-12);
    // I_0(1), the modified Bessel function at 1
    assert_abs_diff_eq!(series.coeffs[0], 1.266_065_877_752_008_4, epsilon = 1e-10);
}

#[test]
fn test_semicircle_approximation_quality() {
    let series = ChebyshevSeries::best_square(semicircle, 8, &QuadOptions::default()).unwrap();
    let xs = linspace(-1.0, 1.0, 500);
    let exact: Vec<f64> = xs.iter().map(|&x| semicircle(x)).collect();
    let approx = series.evaluate_many(&xs);
    let err = rms_error(&exact, &approx).unwrap();
    assert!(err < 0.05, "rms {err}");

    // the error concentrates at the endpoints where the slope is unbounded
    for &x in &[-0.5, 0.0, 0.5] {
        assert_abs_diff_eq!(series.evaluate(x), semicircle(x), epsilon = 0.02);
    }
}

#[test]
fn test_semicircle_demo_values() {
    let (xs, ys) = sample_semicircle(30);
    let fit = polyfit(&xs, &ys, 5).unwrap();
    assert_eq!(fit.polynomial.degree(), 5);
    assert_eq!(fit.descending().len(), 6);
    // the fit passes close to the top of the arc
    assert_abs_diff_eq!(fit.evaluate(0.0), 1.0, epsilon = 0.05);
}

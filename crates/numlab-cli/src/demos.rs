//! One function per subcommand. Results go to stdout, charts and point
//! sets go to files in the output directory.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context as _, Result};
use numlab_approx::fit::sample_semicircle;
use numlab_approx::{adaptive_simpson, polyfit, quad, ChebyshevSeries};
use numlab_core::Tolerance;
use numlab_geometry::curve::Projection;
use numlab_geometry::distance::align_by_descent;
use numlab_geometry::pointset::parse_counted_pair;
use numlab_geometry::tessellate::adaptive_resample;
use numlab_geometry::{hausdorff, BezierCurve, Ellipse, PointSet};
use numlab_math::linalg::{
    gaussian_elimination, jacobi, l1_residual, parse_augmented, sparse_upper_triangular,
    split_augmented,
};
use numlab_math::roots::{solve_quadratic, stable_roots, standard_roots, Roots};
use numlab_math::stats::{rms_error, StatsMatrix};
use numlab_math::{dvec2, linspace, DMatrix, DVector, Point2};
use numlab_plot::{Color, Figure, HeatMap, LineStyle, Series};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::data::{self, ControlSet};

/// Shared state for one run: configuration, output location, and the RNG.
pub struct Context {
    pub config: Config,
    pub output_dir: PathBuf,
    pub rng: StdRng,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let output_dir = config.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("creating output directory {}", output_dir.display()))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            output_dir,
            rng,
        })
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    fn save_figure(&self, figure: &Figure, name: &str) -> Result<()> {
        let path = self.output(name);
        figure
            .save_svg(&path, self.config.plot)
            .with_context(|| format!("rendering {}", path.display()))?;
        println!("wrote {}", path.display());
        Ok(())
    }

    fn save_heatmap(&self, map: &HeatMap, name: &str) -> Result<()> {
        let path = self.output(name);
        map.save_svg(&path, self.config.plot)
            .with_context(|| format!("rendering {}", path.display()))?;
        println!("wrote {}", path.display());
        Ok(())
    }
}

fn format_point(p: Point2) -> String {
    format!("({:.6}, {:.6})", p.x, p.y)
}

pub fn bezier(ctx: &Context, set: ControlSet, samples: Option<usize>) -> Result<()> {
    let samples = samples.unwrap_or(ctx.config.bezier.samples);
    let (a, b) = set.curves()?;

    let mut fig = Figure::new("Bezier Curves");
    for (name, curve, color) in [("Bezier Curve A", &a, Color::RED), ("Bezier Curve B", &b, Color::BLUE)] {
        let control = curve.control_points().to_vec();
        fig.add_line(name, curve.sample(samples), color)
            .add_series(Series::new(None, control.clone(), color, LineStyle::Markers))
            .add_series(Series::new(None, control, color, LineStyle::Dashed));
        println!("{name}: degree {}, {samples} samples", curve.degree());
    }
    ctx.save_figure(&fig, set.file_name())
}

pub fn random_points(ctx: &mut Context, count: Option<usize>) -> Result<()> {
    let count = count.unwrap_or(ctx.config.random.count);
    let margin = ctx.config.random.margin;
    let preview = ctx.config.random.preview;

    for (i, reference) in [&data::SMALL_A, &data::SMALL_B].into_iter().enumerate() {
        let reference = PointSet::from_coords(reference);
        let set = PointSet::generate_around(reference.as_slice(), count, margin, &mut ctx.rng)?;
        let path = ctx.output(&format!("random_set{}.txt", i + 1));
        set.save(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        println!("set {} ({} points, written to {}):", i + 1, set.len(), path.display());
        for p in set.points.iter().take(preview) {
            println!("  {} {}", p.x, p.y);
        }
    }
    Ok(())
}

pub fn stats_matrix(ctx: &mut Context) -> Result<()> {
    let cfg = &ctx.config.stats;
    let stats = StatsMatrix::random(cfg.testcases, cfg.rows, cfg.columns, cfg.low, cfg.high, &mut ctx.rng)?;
    let (low, high) = (cfg.low, cfg.high);
    let (rows, cols) = stats.shape();
    let labels = data::stats_column_labels(cols);
    let testcase_labels: Vec<String> = (1..=stats.testcases()).map(|i| format!("Testcase {i}")).collect();

    let first = HeatMap::new("Test data matrix (testcase 1)", stats.data[0].clone())
        .with_row_labels((1..=rows).map(|i| format!("Row {i}")).collect())
        .with_col_labels(labels.clone())
        .with_range(low, high);
    ctx.save_heatmap(&first, "stats_matrix.svg")?;

    // means in the left half, variances in the right
    let summary_values = DMatrix::from_fn(stats.testcases(), 2 * cols, |t, j| {
        if j < cols {
            stats.means[(t, j)]
        } else {
            stats.variances[(t, j - cols)]
        }
    });
    let summary_labels = (1..=cols)
        .map(|j| format!("mean {j}"))
        .chain((1..=cols).map(|j| format!("var {j}")))
        .collect();
    let summary = HeatMap::new("Column mean and variance per testcase", summary_values)
        .with_row_labels(testcase_labels.clone())
        .with_col_labels(summary_labels);
    ctx.save_heatmap(&summary, "stats_summary.svg")?;

    for (t, name) in testcase_labels.iter().enumerate() {
        println!("{name}:");
        for (j, label) in labels.iter().enumerate() {
            println!(
                "  {label:<18} mean {:>8.2}  variance {:>9.2}",
                stats.means[(t, j)],
                stats.variances[(t, j)]
            );
        }
    }
    Ok(())
}

fn semicircle(x: f64) -> f64 {
    (1.0 - x * x).max(0.0).sqrt()
}

pub fn chebyshev(ctx: &Context, degrees: Option<Vec<usize>>) -> Result<()> {
    let degrees = degrees.unwrap_or_else(|| ctx.config.chebyshev.degrees.clone());
    if degrees.is_empty() {
        bail!("no approximation degrees given");
    }
    let xs = linspace(-1.0, 1.0, ctx.config.chebyshev.grid);
    let exact: Vec<f64> = xs.iter().map(|&x| semicircle(x)).collect();
    let to_points = |ys: &[f64]| xs.iter().zip(ys).map(|(&x, &y)| dvec2(x, y)).collect::<Vec<_>>();

    let mut fig = Figure::new("Best Square Approximation of f(x) using Chebyshev Polynomials")
        .with_axes("x", "f(x)");
    fig.add_line("f(x) = sqrt(1 - x^2)", to_points(&exact), Color::BLACK);

    for (i, &degree) in degrees.iter().enumerate() {
        let series = ChebyshevSeries::best_square(semicircle, degree, &ctx.config.quadrature)
            .with_context(|| format!("degree {degree} coefficients"))?;
        let approx = series.evaluate_many(&xs);
        let rms = rms_error(&exact, &approx)?;

        let style = match i {
            0 => LineStyle::Dashed,
            1 => LineStyle::Dotted,
            _ => LineStyle::Solid,
        };
        fig.add_auto_color(&format!("{degree}th Degree Approximation"), to_points(&approx), style);

        println!("degree {degree}: RMS error = {rms:.6e}");
        tracing::debug!(degree, coefficients = ?series.coeffs);
    }
    ctx.save_figure(&fig, "chebyshev.svg")
}

pub fn lsq_fit(ctx: &Context, points: Option<usize>, degree: Option<usize>) -> Result<()> {
    let points = points.unwrap_or(ctx.config.fit.points);
    let degree = degree.unwrap_or(ctx.config.fit.degree);
    let (xs, ys) = sample_semicircle(points);
    let fit = polyfit(&xs, &ys, degree)?;

    let samples: Vec<Point2> = xs.iter().zip(&ys).map(|(&x, &y)| dvec2(x, y)).collect();
    let fitted: Vec<Point2> = xs.iter().map(|&x| dvec2(x, fit.evaluate(x))).collect();

    let mut fig = Figure::new(format!(
        "Least Squares Polynomial Fit (Degree={degree}), MSE = {:.5}",
        fit.mse
    ))
    .with_axes("x", "y");
    fig.add_scatter("Sample Points", samples, Color::BLUE)
        .add_line(&format!("Fitted Polynomial (degree {degree})"), fitted, Color::RED);

    println!("coefficients (highest power first): {:?}", fit.descending());
    println!("p(x) = {}", fit.polynomial);
    println!("MSE = {:.5}", fit.mse);
    ctx.save_figure(&fig, "lsq_fit.svg")
}

pub fn simpson(ctx: &Context) -> Result<()> {
    let cases: [(&str, fn(f64) -> f64, f64, f64); 2] = [
        ("sin(x) on [0, pi]", f64::sin, 0.0, PI),
        ("x^3 on [0, 1]", |x| x * x * x, 0.0, 1.0),
    ];
    for (name, f, a, b) in cases {
        let simpson = adaptive_simpson(f, a, b, &ctx.config.simpson)?;
        let reference = quad(f, a, b, &ctx.config.quadrature)?;
        println!(
            "{name}: simpson {:.8} ({} evaluations{}), gauss-kronrod {:.8}",
            simpson.value,
            simpson.evaluations,
            if simpson.converged { "" } else { ", not converged" },
            reference.value
        );
    }
    Ok(())
}

/// Solve the built-in 4x4 system, a system read from `input`, or, with
/// `size`, a random sparse upper-triangular system of that order.
pub fn gauss(ctx: &mut Context, input: Option<&Path>, size: Option<usize>) -> Result<()> {
    if let Some(n) = size {
        let (a, b) = sparse_upper_triangular(n, ctx.config.gauss.sparsity, &mut ctx.rng)?;
        let start = Instant::now();
        let x = gaussian_elimination(&a, &b, Tolerance::default())?;
        let elapsed = start.elapsed();

        println!("n = {n}: solved in {elapsed:.3?}, residual {:e}", l1_residual(&a, &b, &x));
        for (i, v) in x.iter().take(10).enumerate() {
            println!("x[{i}] = {v:.6}");
        }
        return Ok(());
    }

    let (a, b) = match input {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            parse_augmented(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => {
            let rows: Vec<Vec<f64>> = data::GAUSS_SYSTEM.iter().map(|r| r.to_vec()).collect();
            split_augmented(&rows)?
        }
    };
    let x = gaussian_elimination(&a, &b, Tolerance::default())?;
    for (i, v) in x.iter().enumerate() {
        println!("x[{i}] = {v:.6}");
    }
    println!("residual |b - Ax|_1 = {:e}", l1_residual(&a, &b, &x));
    Ok(())
}

pub fn jacobi_demo(ctx: &mut Context, size: Option<usize>) -> Result<()> {
    let n = size.unwrap_or(ctx.config.jacobi.size);
    let (a, b) = sparse_upper_triangular(n, ctx.config.jacobi.sparsity, &mut ctx.rng)?;

    let start = Instant::now();
    let report = jacobi(&a, &b, &DVector::zeros(n), &ctx.config.jacobi.options())?;
    let elapsed = start.elapsed();

    println!(
        "n = {n}: {} iterations in {:.3?}, converged: {}, residual {:e}",
        report.iterations, elapsed, report.converged, report.residual
    );
    for (i, v) in report.solution.iter().take(10).enumerate() {
        println!("x[{i}] = {v:.6}");
    }
    Ok(())
}

fn format_roots(roots: Roots) -> String {
    match roots {
        Roots::None => "no real roots".to_string(),
        Roots::One(x) => format!("x = {x:.10e}"),
        Roots::Two(x1, x2) => format!("x1 = {x1:.10e}, x2 = {x2:.10e}"),
    }
}

pub fn quadratic(guess: f64) -> Result<()> {
    for [a, b, c] in data::QUADRATIC_CASES {
        println!("a = {a:.10e}, b = {b:.10e}, c = {c:.10e}");
        println!("  standard: {}", format_roots(standard_roots(a, b, c)));
        println!("  stable:   {}", format_roots(stable_roots(a, b, c)));
        match solve_quadratic(a, b, c, guess) {
            Ok((strategy, roots)) => println!("  chosen ({strategy}): {}", format_roots(roots)),
            Err(e) => println!("  chosen: {e}"),
        }
    }
    Ok(())
}

pub fn ellipse(ctx: &mut Context) -> Result<()> {
    let a = ctx.rng.random_range(0.0..100.0);
    let b = ctx.rng.random_range(0.0..100.0);
    let target = dvec2(
        ctx.rng.random_range(-1000.0..1000.0),
        ctx.rng.random_range(-1000.0..1000.0),
    );
    println!("x0: {:.6}, y0: {:.6}, a: {a:.6}, b: {b:.6}", target.x, target.y);

    let ellipse = Ellipse::new(Point2::ZERO, a, b)?;
    let Projection {
        point,
        distance,
        iterations,
        converged,
    } = ellipse.nearest_point(target, &ctx.config.ellipse)?;
    println!(
        "nearest point {} at distance {distance:.6} after {iterations} iterations{}",
        format_point(point),
        if converged { "" } else { " (iteration limit reached)" }
    );
    Ok(())
}

pub fn hausdorff_demo(ctx: &Context, input: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let (a, b) = match input {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let (a, b) = parse_counted_pair(&text).with_context(|| format!("parsing {}", path.display()))?;
            (BezierCurve::new(a.points)?, BezierCurve::new(b.points)?)
        }
        None => ControlSet::Small.curves()?,
    };

    let cfg = &ctx.config.hausdorff;
    let pa = a.sample(cfg.samples);
    let pb = b.sample(cfg.samples);

    let plain = hausdorff(&pa, &pb)?;
    let adaptive = hausdorff(
        &adaptive_resample(&pa, cfg.angle_threshold),
        &adaptive_resample(&pb, cfg.angle_threshold),
    )?;
    let aligned = align_by_descent(&pa, &pb, &cfg.align)?;
    let descent = hausdorff(&aligned.a, &aligned.b)?;

    println!("plain sampling:    {plain:.6}");
    println!("adaptive sampling: {adaptive:.6}");
    println!("gradient descent:  {descent:.6} ({} iterations)", aligned.iterations);

    if let Some(path) = output {
        fs::write(path, format!("Hausdorff Distance: {plain:.6}\n"))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub fn float_laws() -> Result<()> {
    let (a, b) = (2332432.2394923992034092348_f64, 3294829.24772394792389424_f64);
    println!("a + b = {}", a + b);
    println!("b + a = {}", b + a);
    println!("commutative: {}", a + b == b + a);

    let (a, b, c) = (1e-10_f64, 1e10_f64, -1e10_f64);
    println!("(a + b) + c = {:e}", (a + b) + c);
    println!("a + (b + c) = {:e}", a + (b + c));
    println!("associative: {}", (a + b) + c == a + (b + c));
    Ok(())
}

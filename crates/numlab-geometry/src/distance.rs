//! Hausdorff distance between finite point sets, and a descent-based alignment.

use numlab_core::{NumError, Result};
use numlab_math::Point2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

fn ensure_non_empty(a: &[Point2], b: &[Point2]) -> Result<()> {
    if a.is_empty() || b.is_empty() {
        return Err(NumError::invalid("Hausdorff distance needs two non-empty point sets"));
    }
    Ok(())
}

/// Index of the point of `set` closest to `p`. `set` must be non-empty.
fn nearest_index(p: Point2, set: &[Point2]) -> usize {
    set.iter()
        .map(|q| p.distance_squared(*q))
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
        .0
}

fn nearest_distance(p: Point2, set: &[Point2]) -> f64 {
    set.iter()
        .map(|q| p.distance(*q))
        .fold(f64::INFINITY, f64::min)
}

/// `max over p in a of min over q in b of |p - q|`.
pub fn directed_hausdorff(a: &[Point2], b: &[Point2]) -> Result<f64> {
    ensure_non_empty(a, b)?;
    Ok(a.par_iter()
        .map(|&p| nearest_distance(p, b))
        .reduce(|| 0.0, f64::max))
}

/// Symmetric Hausdorff distance `max(d(a, b), d(b, a))`.
pub fn hausdorff(a: &[Point2], b: &[Point2]) -> Result<f64> {
    Ok(directed_hausdorff(a, b)?.max(directed_hausdorff(b, a)?))
}

/// Step control for [`align_by_descent`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignOptions {
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once the summed squared nearest distances from `a` to `b` drop below this
    pub epsilon: f64,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_iter: 10_000,
            epsilon: 1e-6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Alignment {
    pub a: Vec<Point2>,
    pub b: Vec<Point2>,
    pub iterations: usize,
    /// Objective value at the returned positions
    pub loss: f64,
    pub converged: bool,
}

/// Sum over `a` of the squared distance to the nearest point of `b`.
pub fn nearest_squared_sum(a: &[Point2], b: &[Point2]) -> f64 {
    a.par_iter()
        .map(|&p| p.distance_squared(b[nearest_index(p, b)]))
        .sum()
}

/// Move both sets toward each other by gradient descent on the squared
/// nearest-neighbour distances.
///
/// Every point steps along `-2 (p - nearest)` where `nearest` is its closest
/// point in the other set; both gradients are taken before either set moves.
pub fn align_by_descent(a: &[Point2], b: &[Point2], options: &AlignOptions) -> Result<Alignment> {
    ensure_non_empty(a, b)?;
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    let lr = options.learning_rate;

    let mut loss = nearest_squared_sum(&a, &b);
    let mut iterations = 0;
    while iterations < options.max_iter && loss >= options.epsilon {
        let grad_a: Vec<Point2> = a
            .par_iter()
            .map(|&p| 2.0 * (p - b[nearest_index(p, &b)]))
            .collect();
        let grad_b: Vec<Point2> = b
            .par_iter()
            .map(|&p| 2.0 * (p - a[nearest_index(p, &a)]))
            .collect();

        for (p, g) in a.iter_mut().zip(&grad_a) {
            *p -= lr * *g;
        }
        for (p, g) in b.iter_mut().zip(&grad_b) {
            *p -= lr * *g;
        }

        iterations += 1;
        loss = nearest_squared_sum(&a, &b);
    }

    let converged = loss < options.epsilon;
    if converged {
        tracing::debug!(iterations, loss, "point-set alignment converged");
    } else {
        tracing::warn!(iterations, loss, "point-set alignment stopped before convergence");
    }

    Ok(Alignment {
        a,
        b,
        iterations,
        loss,
        converged,
    })
}

//! Axis-aligned ellipse and nearest-point search.

use std::f64::consts::PI;

use numlab_core::{NumError, Result};
use numlab_math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::Curve;

/// An axis-aligned ellipse `((x - cx) / a)^2 + ((y - cy) / b)^2 = 1`,
/// parameterized over `[0, 2*PI]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point2,
    /// Semi-axis along x
    pub a: f64,
    /// Semi-axis along y
    pub b: f64,
}

/// Step control for [`Ellipse::nearest_point`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DescentOptions {
    /// Gradient step length
    pub step: f64,
    /// Stop when both coordinates move less than this
    pub epsilon: f64,
    pub max_iter: usize,
}

impl Default for DescentOptions {
    fn default() -> Self {
        Self {
            step: 0.1,
            epsilon: 1e-6,
            max_iter: 100_000,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub point: Point2,
    pub distance: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl Ellipse {
    pub fn new(center: Point2, a: f64, b: f64) -> Result<Self> {
        if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
            return Err(NumError::invalid(format!(
                "ellipse semi-axes must be positive and finite, got a={a}, b={b}"
            )));
        }
        Ok(Self { center, a, b })
    }

    /// `sqrt(x^2/a^2 + y^2/b^2)` for a point relative to the center; 1 on the ellipse.
    fn radial_scale(&self, local: Vector2) -> f64 {
        ((local.x * local.x) / (self.a * self.a) + (local.y * local.y) / (self.b * self.b)).sqrt()
    }

    /// Approximate the point of the ellipse nearest to `target`.
    ///
    /// Starting from `(a, 0)`, each step moves down the gradient of the squared
    /// distance to `target` and then rescales radially back onto the ellipse.
    /// For circles the fixed point is the exact nearest point; for elongated
    /// ellipses it is the point whose radial projection is stationary.
    pub fn nearest_point(&self, target: Point2, options: &DescentOptions) -> Result<Projection> {
        let goal = target - self.center;
        let mut x = Vector2::new(self.a, 0.0);

        for iteration in 1..=options.max_iter {
            let gradient = 2.0 * (x - goal);
            let stepped = x - options.step * gradient;

            let scale = self.radial_scale(stepped);
            if scale == 0.0 || !scale.is_finite() {
                return Err(NumError::Convergence(format!(
                    "descent step collapsed onto the ellipse center at iteration {iteration}"
                )));
            }
            let next = stepped / scale;
            tracing::trace!(iteration, x = next.x, y = next.y, distance = (next - goal).length());

            let moved = (next - x).abs();
            x = next;
            if moved.x < options.epsilon && moved.y < options.epsilon {
                return Ok(self.projection(x, goal, iteration, true));
            }
        }

        tracing::warn!(max_iter = options.max_iter, "ellipse descent hit the iteration limit");
        Ok(self.projection(x, goal, options.max_iter, false))
    }

    fn projection(&self, local: Vector2, goal: Vector2, iterations: usize, converged: bool) -> Projection {
        Projection {
            point: self.center + local,
            distance: (local - goal).length(),
            iterations,
            converged,
        }
    }
}

impl Curve for Ellipse {
    fn point_at(&self, t: f64) -> Point2 {
        self.center + Vector2::new(self.a * t.cos(), self.b * t.sin())
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        Vector2::new(-self.a * t.sin(), self.b * t.cos())
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 2.0 * PI)
    }
}

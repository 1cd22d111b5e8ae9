//! Bezier curves in Bernstein form.

use numlab_core::traits::BoundingBox;
use numlab_core::{NumError, Result};
use numlab_math::{Aabb2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::Curve;

/// Binomial coefficient `C(n, k)` via the multiplicative formula.
///
/// Exact in `f64` for every `n` small enough to be a practical curve degree.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Bernstein basis polynomial `B_{i,n}(t)`.
fn bernstein(n: usize, i: usize, t: f64) -> f64 {
    binomial(n, i) * (1.0 - t).powi((n - i) as i32) * t.powi(i as i32)
}

/// A Bezier curve of degree `control_points.len() - 1` over `t` in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BezierCurve {
    control_points: Vec<Point2>,
}

impl BezierCurve {
    pub fn new(control_points: Vec<Point2>) -> Result<Self> {
        if control_points.is_empty() {
            return Err(NumError::invalid("Bezier curve needs at least one control point"));
        }
        if let Some(p) = control_points.iter().find(|p| !p.is_finite()) {
            return Err(NumError::invalid(format!("non-finite control point {p}")));
        }
        Ok(Self { control_points })
    }

    pub fn from_coords(coords: &[[f64; 2]]) -> Result<Self> {
        Self::new(coords.iter().map(|&[x, y]| Point2::new(x, y)).collect())
    }

    pub fn control_points(&self) -> &[Point2] {
        &self.control_points
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    /// Evaluate at `count` evenly spaced parameters in `[0, 1]`, endpoints included.
    pub fn sample(&self, count: usize) -> Vec<Point2> {
        crate::tessellate::sample_uniform(self, count)
    }
}

impl Curve for BezierCurve {
    fn point_at(&self, t: f64) -> Point2 {
        let n = self.degree();
        self.control_points
            .iter()
            .enumerate()
            .fold(Point2::ZERO, |acc, (i, &p)| acc + bernstein(n, i, t) * p)
    }

    /// Derivative through the hodograph, a degree `n - 1` curve on the
    /// control differences `n (P_{i+1} - P_i)`.
    fn tangent_at(&self, t: f64) -> Vector2 {
        let n = self.degree();
        if n == 0 {
            return Vector2::ZERO;
        }
        self.control_points
            .windows(2)
            .enumerate()
            .fold(Vector2::ZERO, |acc, (i, w)| {
                acc + bernstein(n - 1, i, t) * (w[1] - w[0])
            })
            * n as f64
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

impl BoundingBox for BezierCurve {
    type Point = Point2;

    /// Box of the control polygon, which contains the whole curve.
    fn bounding_box(&self) -> Option<(Point2, Point2)> {
        Aabb2::from_points(&self.control_points).map(|b| (b.min, b.max))
    }
}

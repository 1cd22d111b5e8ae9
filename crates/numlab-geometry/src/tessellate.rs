//! Discretization utilities for converting curves to point sequences.

use numlab_math::Point2;
use rayon::prelude::*;

use crate::curve::Curve;

/// Evaluate `curve` at `count` evenly spaced parameters spanning its domain.
///
/// `count == 1` yields the start point and `count == 0` yields nothing.
pub fn sample_uniform<C: Curve + ?Sized>(curve: &C, count: usize) -> Vec<Point2> {
    let (t_min, t_max) = curve.domain();
    match count {
        0 => Vec::new(),
        1 => vec![curve.point_at(t_min)],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .into_par_iter()
                .map(|j| {
                    // hit t_max exactly so closed-form endpoints are reproduced
                    let t = if j + 1 == count {
                        t_max
                    } else {
                        t_min + (t_max - t_min) * j as f64 / last
                    };
                    curve.point_at(t)
                })
                .collect()
        }
    }
}

/// Turning angle (radians) of the polyline `p0 -> p1 -> p2` at `p1`.
///
/// Zero-length legs have no direction and report no turn.
pub fn turning_angle(p0: Point2, p1: Point2, p2: Point2) -> f64 {
    let d1 = p1 - p0;
    let d2 = p2 - p1;
    let norm = d1.length() * d2.length();
    if norm == 0.0 {
        return 0.0;
    }
    (d1.dot(d2) / norm).clamp(-1.0, 1.0).acos()
}

/// Default turning angle above which [`adaptive_resample`] densifies.
pub const DEFAULT_ANGLE_THRESHOLD: f64 = 0.5;

/// Densify a point sequence where it bends sharply.
///
/// Walks consecutive triples, keeping the first point of each and inserting
/// the midpoint of its leading segment when the turn at the middle point
/// exceeds `angle_threshold`. The last two points are appended unchanged.
pub fn adaptive_resample(points: &[Point2], angle_threshold: f64) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len() * 2);
    for w in points.windows(3) {
        out.push(w[0]);
        if turning_angle(w[0], w[1], w[2]) > angle_threshold {
            out.push((w[0] + w[1]) * 0.5);
        }
    }
    out.extend_from_slice(&points[points.len() - 2..]);
    out
}

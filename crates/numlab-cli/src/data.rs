//! Built-in inputs for the demos.

use anyhow::Result;
use clap::ValueEnum;
use numlab_geometry::BezierCurve;

/// Four-point control polygons, also the reference sets for random points.
pub const SMALL_A: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 2.0], [3.0, 3.0], [4.0, 0.0]];
pub const SMALL_B: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 1.0], [3.0, 2.0], [4.0, 0.0]];

pub const LARGE_A: [[f64; 2]; 20] = [
    [0.0, 0.0], [0.2, 0.4], [0.4, 0.8], [0.6, 1.2], [0.8, 1.5], [1.0, 1.7],
    [1.2, 1.9], [1.4, 2.1], [1.6, 2.2], [1.8, 2.3], [2.0, 2.3], [2.2, 2.3],
    [2.4, 2.2], [2.6, 2.1], [2.8, 1.9], [3.0, 1.7], [3.2, 1.5], [3.4, 1.2],
    [3.6, 0.8], [4.0, 0.0],
];
pub const LARGE_B: [[f64; 2]; 20] = [
    [0.0, 0.0], [0.1, 0.2], [0.3, 0.5], [0.5, 0.8], [0.7, 1.0], [1.0, 1.2],
    [1.3, 1.3], [1.5, 1.4], [1.7, 1.4], [1.9, 1.3], [2.1, 1.2], [2.3, 1.0],
    [2.5, 0.9], [2.7, 0.7], [2.9, 0.5], [3.1, 0.3], [3.3, 0.1], [3.5, -0.1],
    [3.7, -0.3], [4.0, 0.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ControlSet {
    /// 4 control points per curve
    Small,
    /// 20 control points per curve
    Large,
}

impl ControlSet {
    pub fn curves(self) -> Result<(BezierCurve, BezierCurve)> {
        let (a, b): (&[[f64; 2]], &[[f64; 2]]) = match self {
            ControlSet::Small => (&SMALL_A, &SMALL_B),
            ControlSet::Large => (&LARGE_A, &LARGE_B),
        };
        Ok((BezierCurve::from_coords(a)?, BezierCurve::from_coords(b)?))
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ControlSet::Small => "bezier_small.svg",
            ControlSet::Large => "bezier_large.svg",
        }
    }
}

/// `(a, b, c)` triples spanning the quadratic solver's branches.
pub const QUADRATIC_CASES: [[f64; 3]; 6] = [
    [6e154, 4e154, -5e154],
    [0.0, 2.0, 2.0],
    [1.0, -1e6, 1.0],
    [1.0, -(1e8 + 1e-8), 1.5],
    [1e-154, -1e155, 1e155],
    [1.0, -5.0, 4.999999],
];

/// Augmented rows `[A | b]`; the solution is `(-7, 3, 2, 2)`.
pub const GAUSS_SYSTEM: [[f64; 5]; 4] = [
    [1.0, -1.0, 2.0, -1.0, -8.0],
    [2.0, -2.0, 3.0, -3.0, -20.0],
    [1.0, 1.0, 1.0, 0.0, -2.0],
    [1.0, -1.0, 4.0, 3.0, 4.0],
];

/// Column headings of the statistics heat map.
const STATS_COLUMNS: [&str; 5] = [
    "plain sampling",
    "adaptive sampling",
    "gradient descent",
    "mean",
    "variance",
];

/// `count` column labels, padded with generic names past the known headings.
pub fn stats_column_labels(count: usize) -> Vec<String> {
    (0..count)
        .map(|j| match STATS_COLUMNS.get(j) {
            Some(name) => name.to_string(),
            None => format!("column {}", j + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use numlab_geometry::Curve;

    #[test]
    fn test_control_sets_share_endpoints() {
        for set in [ControlSet::Small, ControlSet::Large] {
            let (a, b) = set.curves().unwrap();
            assert_eq!(a.point_at(0.0), b.point_at(0.0));
            assert_eq!(a.point_at(1.0), b.point_at(1.0));
        }
        assert_eq!(ControlSet::Large.curves().unwrap().0.degree(), 19);
    }

    #[test]
    fn test_stats_labels_are_padded() {
        let labels = stats_column_labels(6);
        assert_eq!(labels[0], "plain sampling");
        assert_eq!(labels[4], "variance");
        assert_eq!(labels[5], "column 6");
        assert_eq!(stats_column_labels(2).len(), 2);
    }
}

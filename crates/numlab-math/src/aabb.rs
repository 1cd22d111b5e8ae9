use crate::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: Point2,
    pub max: Point2,
}

impl Aabb2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let mut min = first;
        let mut max = first;
        for &p in rest {
            min = min.min(p);
            max = max.max(p);
        }
        Some(Self { min, max })
    }

    pub fn extents(&self) -> Vector2 {
        self.max - self.min
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expand(&self, amount: f64) -> Self {
        let offset = Vector2::splat(amount);
        Self {
            min: self.min - offset,
            max: self.max + offset,
        }
    }

    /// Grow each side by `fraction` of the box extent, with a floor for degenerate boxes.
    pub fn padded(&self, fraction: f64) -> Self {
        let ext = self.extents();
        let pad = Vector2::new(
            (ext.x * fraction).max(fraction),
            (ext.y * fraction).max(fraction),
        );
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }
}

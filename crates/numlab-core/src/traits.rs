use crate::error::Result;

/// Validate that an input object is usable before a computation starts.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Compute an axis-aligned bounding box.
pub trait BoundingBox {
    type Point;
    fn bounding_box(&self) -> Option<(Self::Point, Self::Point)>;
}

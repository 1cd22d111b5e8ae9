//! numlab geometry: parametric curves, point sets, and set distances.

pub mod curve;
pub mod distance;
pub mod pointset;
pub mod tessellate;

pub use curve::{BezierCurve, Curve, Ellipse};
pub use distance::{directed_hausdorff, hausdorff};
pub use pointset::PointSet;

pub mod aabb;
pub mod grid;
pub mod linalg;
pub mod polynomial;
pub mod roots;
pub mod stats;

pub use glam::{dvec2, DVec2};
pub use nalgebra::{DMatrix, DVector};
pub use aabb::Aabb2;
pub use grid::linspace;
pub use polynomial::Polynomial;

pub type Point2 = DVec2;
pub type Vector2 = DVec2;

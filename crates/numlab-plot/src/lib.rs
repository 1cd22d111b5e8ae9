//! numlab plotting: a small figure model rendered to SVG with plotters.

pub mod color;
pub mod figure;
pub mod heatmap;
pub mod render;

pub use color::{blues, Color};
pub use figure::{Figure, LineStyle, Series};
pub use heatmap::HeatMap;
pub use render::{render_figure, render_heatmap, PlotSize};

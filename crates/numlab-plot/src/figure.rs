use numlab_core::traits::{BoundingBox, Validate};
use numlab_core::{NumError, Result};
use numlab_math::{Aabb2, Point2};

use crate::color::{Color, PALETTE};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    /// Circle markers, no connecting line
    Markers,
}

/// A named sequence of points in a figure
#[derive(Debug, Clone)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<Point2>,
    pub color: Color,
    pub style: LineStyle,
}

impl Series {
    pub fn new(label: Option<&str>, points: Vec<Point2>, color: Color, style: LineStyle) -> Self {
        Self {
            label: label.map(str::to_string),
            points,
            color,
            style,
        }
    }
}

/// A 2D chart: titled axes holding any number of series.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub show_grid: bool,
    pub show_legend: bool,
}

impl Figure {
    /// Create an empty figure with `X` / `Y` axis labels, grid and legend on.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            series: Vec::new(),
            show_grid: true,
            show_legend: true,
        }
    }

    pub fn with_axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn add_series(&mut self, series: Series) -> &mut Self {
        self.series.push(series);
        self
    }

    pub fn add_line(&mut self, label: &str, points: Vec<Point2>, color: Color) -> &mut Self {
        self.add_series(Series::new(Some(label), points, color, LineStyle::Solid))
    }

    pub fn add_scatter(&mut self, label: &str, points: Vec<Point2>, color: Color) -> &mut Self {
        self.add_series(Series::new(Some(label), points, color, LineStyle::Markers))
    }

    /// Add a series with a palette color chosen by its position.
    pub fn add_auto_color(&mut self, label: &str, points: Vec<Point2>, style: LineStyle) -> &mut Self {
        let color = PALETTE[self.series.len() % PALETTE.len()];
        self.add_series(Series::new(Some(label), points, color, style))
    }

    /// Bounding box over every series.
    pub fn bounds(&self) -> Option<Aabb2> {
        self.series
            .iter()
            .filter_map(|s| Aabb2::from_points(&s.points))
            .reduce(|a, b| a.merge(&b))
    }

    pub fn total_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn has_labels(&self) -> bool {
        self.series.iter().any(|s| s.label.is_some())
    }
}

impl Validate for Figure {
    fn validate(&self) -> Result<()> {
        if self.total_points() == 0 {
            return Err(NumError::invalid(format!("figure {:?} has no points to draw", self.title)));
        }
        for s in &self.series {
            if s.points.iter().any(|p| !p.is_finite()) {
                return Err(NumError::invalid(format!(
                    "series {:?} of figure {:?} contains non-finite points",
                    s.label.as_deref().unwrap_or("<unnamed>"),
                    self.title
                )));
            }
        }
        Ok(())
    }
}

impl BoundingBox for Figure {
    type Point = Point2;

    fn bounding_box(&self) -> Option<(Point2, Point2)> {
        self.bounds().map(|b| (b.min, b.max))
    }
}

//! SVG rendering of [`Figure`]s and [`HeatMap`]s with plotters.

use std::fmt::Display;
use std::path::Path;

use numlab_core::traits::Validate;
use numlab_core::{NumError, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

use crate::color::{blues, Color as Rgb};
use crate::figure::{Figure, LineStyle};
use crate::heatmap::HeatMap;

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Width reserved on the right of a heat map for its color bar.
const COLORBAR_WIDTH: u32 = 130;
/// Number of bands in a color bar.
const COLORBAR_STEPS: usize = 64;
/// Fraction of the data extent left empty around a figure's series.
const FIGURE_PADDING: f64 = 0.05;
const MARKER_SIZE: i32 = 4;

fn render_error<E: Display>(err: E) -> NumError {
    NumError::Render(err.to_string())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Render a line/scatter chart to an SVG file at `path`.
pub fn render_figure(figure: &Figure, path: &Path, size: PlotSize) -> Result<()> {
    figure.validate()?;
    let bounds = figure
        .bounds()
        .ok_or_else(|| NumError::invalid("figure has no bounds"))?
        .padded(FIGURE_PADDING);

    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(figure.title.as_str(), ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(bounds.min.x..bounds.max.x, bounds.min.y..bounds.max.y)
        .map_err(render_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .label_style(("sans-serif", 14));
    if !figure.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(render_error)?;

    for series in &figure.series {
        let color = rgb(series.color);
        let stroke = color.stroke_width(2);
        let fill = color.filled();
        let points: Vec<(f64, f64)> = series.points.iter().map(|p| (p.x, p.y)).collect();

        let anno = match series.style {
            LineStyle::Solid => chart.draw_series(LineSeries::new(points, stroke)),
            LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(points, 10, 6, stroke)),
            LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(points, 2, 5, stroke)),
            LineStyle::Markers => chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, MARKER_SIZE, fill)),
            ),
        }
        .map_err(render_error)?;

        if let Some(label) = &series.label {
            let style = series.style;
            anno.label(label.as_str()).legend(move |(x, y)| match style {
                LineStyle::Markers => Circle::new((x + 10, y), MARKER_SIZE, fill).into_dyn(),
                _ => PathElement::new(vec![(x, y), (x + 20, y)], stroke).into_dyn(),
            });
        }
    }

    if figure.show_legend && figure.has_labels() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;
    tracing::info!(
        path = %path.display(),
        series = figure.series.len(),
        points = figure.total_points(),
        "wrote figure"
    );
    Ok(())
}

fn segment_label(value: &SegmentValue<usize>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels.get(*i).cloned().unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Render an annotated heat map with a color bar to an SVG file at `path`.
pub fn render_heatmap(map: &HeatMap, path: &Path, size: PlotSize) -> Result<()> {
    map.validate()?;
    let (rows, cols) = map.values.shape();
    let (lo, hi) = map.value_range();

    let root = SVGBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;
    let (main, bar) = root.split_horizontally(size.width.saturating_sub(COLORBAR_WIDTH));

    let mut chart = ChartBuilder::on(&main)
        .margin(16)
        .caption(map.title.as_str(), ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(110)
        // integer ranges are inclusive, so `0..n - 1` holds n segments
        .build_cartesian_2d((0..cols - 1).into_segmented(), (0..rows - 1).into_segmented())
        .map_err(render_error)?;

    // rows are listed top to bottom, the y axis grows upward
    let row_labels: Vec<String> = map.row_labels.iter().rev().cloned().collect();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&|v| segment_label(v, &map.col_labels))
        .y_label_formatter(&|v| segment_label(v, &row_labels))
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(render_error)?;

    let cells: Vec<(usize, usize, f64)> = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .map(|(r, c)| (rows - 1 - r, c, map.values[(r, c)]))
        .collect();

    chart
        .draw_series(cells.iter().map(|&(y, x, v)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                rgb(map.color_for(v)).filled(),
            )
        }))
        .map_err(render_error)?;

    let text = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    chart
        .draw_series(cells.iter().map(|&(y, x, v)| {
            let ink = if map.color_for(v).luminance() < 0.5 { &WHITE } else { &BLACK };
            Text::new(
                map.annotation(v),
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                text.color(ink),
            )
        }))
        .map_err(render_error)?;

    let mut colorbar = ChartBuilder::on(&bar)
        .margin_top(56)
        .margin_bottom(56)
        .margin_right(16)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, lo..hi)
        .map_err(render_error)?;
    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .label_style(("sans-serif", 12))
        .draw()
        .map_err(render_error)?;
    colorbar
        .draw_series((0..COLORBAR_STEPS).map(|i| {
            let t0 = i as f64 / COLORBAR_STEPS as f64;
            let t1 = (i + 1) as f64 / COLORBAR_STEPS as f64;
            let color = blues(0.5 * (t0 + t1));
            Rectangle::new(
                [(0.0, lo + (hi - lo) * t0), (1.0, lo + (hi - lo) * t1)],
                rgb(color).filled(),
            )
        }))
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    tracing::info!(path = %path.display(), rows, cols, "wrote heat map");
    Ok(())
}

impl Figure {
    pub fn save_svg(&self, path: &Path, size: PlotSize) -> Result<()> {
        render_figure(self, path, size)
    }
}

impl HeatMap {
    pub fn save_svg(&self, path: &Path, size: PlotSize) -> Result<()> {
        render_heatmap(self, path, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numlab_math::{dvec2, DMatrix};

    #[test]
    fn test_segment_label() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(segment_label(&SegmentValue::CenterOf(1), &labels), "b");
        assert_eq!(segment_label(&SegmentValue::Exact(0), &labels), "a");
        assert_eq!(segment_label(&SegmentValue::CenterOf(5), &labels), "");
        assert_eq!(segment_label(&SegmentValue::Last, &labels), "");
    }

    #[test]
    fn test_invalid_input_is_not_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        assert!(render_figure(&Figure::new("empty"), &path, PlotSize::default()).is_err());
        assert!(!path.exists());

        let map = HeatMap::new("bad", DMatrix::from_element(1, 1, f64::INFINITY));
        assert!(render_heatmap(&map, &path, PlotSize::default()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_single_point_figure_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point.svg");
        let mut fig = Figure::new("one point");
        fig.add_scatter("p", vec![dvec2(1.0, 1.0)], Rgb::BLUE);
        fig.save_svg(&path, PlotSize::default()).unwrap();
        assert!(path.exists());
    }
}

//! Planar point sets: random generation and whitespace-separated text IO.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use numlab_core::traits::BoundingBox;
use numlab_core::{NumError, Result};
use numlab_math::{Aabb2, Point2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An ordered set of points in the plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub points: Vec<Point2>,
}

impl PointSet {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[[f64; 2]]) -> Self {
        Self::new(coords.iter().map(|&[x, y]| Point2::new(x, y)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point2] {
        &self.points
    }

    pub fn aabb(&self) -> Option<Aabb2> {
        Aabb2::from_points(&self.points)
    }

    /// Draw `count` points uniformly from the bounding box of `reference`
    /// grown by `margin` on every side.
    pub fn generate_around<R: Rng + ?Sized>(
        reference: &[Point2],
        count: usize,
        margin: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(margin >= 0.0 && margin.is_finite()) {
            return Err(NumError::invalid(format!(
                "margin must be finite and non-negative, got {margin}"
            )));
        }
        let bounds = Aabb2::from_points(reference)
            .ok_or_else(|| NumError::invalid("reference point set is empty"))?
            .expand(margin);
        // the sampler needs a finite span on both axes
        if !bounds.extents().is_finite() {
            return Err(NumError::invalid(format!(
                "sampling box {:?}..{:?} is too large to sample",
                bounds.min, bounds.max
            )));
        }

        let points = (0..count)
            .map(|_| {
                Point2::new(
                    rng.random_range(bounds.min.x..=bounds.max.x),
                    rng.random_range(bounds.min.y..=bounds.max.y),
                )
            })
            .collect();
        Ok(Self { points })
    }

    /// Write one `"x y"` line per point.
    pub fn write_text<W: Write>(&self, mut out: W) -> Result<()> {
        for p in &self.points {
            writeln!(out, "{} {}", p.x, p.y)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the set to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path)?;
        self.write_text(BufWriter::new(file))
    }

    /// Parse `"x y"` lines; blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let points = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                let mut fields = line.split_whitespace();
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(x), Some(y), None) => parse_point(x, y, i + 1),
                    _ => Err(NumError::Parse(format!(
                        "line {}: expected two coordinates, got {line:?}",
                        i + 1
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }
}

fn parse_point(x: &str, y: &str, line: usize) -> Result<Point2> {
    let coord = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| NumError::Parse(format!("line {line}: bad coordinate {s:?}: {e}")))
    };
    Ok(Point2::new(coord(x)?, coord(y)?))
}

/// Parse two point sets, each given as a count followed by that many `x y` pairs.
pub fn parse_counted_pair(text: &str) -> Result<(PointSet, PointSet)> {
    let mut tokens = text.split_whitespace();
    let mut next_set = |name: &str| -> Result<PointSet> {
        let count: usize = tokens
            .next()
            .ok_or_else(|| NumError::Parse(format!("missing point count for set {name}")))?
            .parse()
            .map_err(|e| NumError::Parse(format!("point count for set {name}: {e}")))?;
        let mut points = Vec::with_capacity(count);
        for i in 0..count {
            match (tokens.next(), tokens.next()) {
                (Some(x), Some(y)) => points.push(parse_point(x, y, i + 1)?),
                _ => {
                    return Err(NumError::Parse(format!(
                        "set {name}: expected {count} points, found {i}"
                    )))
                }
            }
        }
        Ok(PointSet::new(points))
    };
    let a = next_set("A")?;
    let b = next_set("B")?;
    Ok((a, b))
}

impl BoundingBox for PointSet {
    type Point = Point2;

    fn bounding_box(&self) -> Option<(Point2, Point2)> {
        self.aabb().map(|b| (b.min, b.max))
    }
}

impl From<Vec<Point2>> for PointSet {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numlab_math::dvec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_points_stay_in_expanded_box() {
        let reference = PointSet::from_coords(&[[0.0, 0.0], [1.0, 2.0], [3.0, 3.0], [4.0, 0.0]]);
        let mut rng = StdRng::seed_from_u64(42);
        let set = PointSet::generate_around(reference.as_slice(), 100, 1.0, &mut rng).unwrap();
        assert_eq!(set.len(), 100);
        let bounds = Aabb2::new(dvec2(-1.0, -1.0), dvec2(5.0, 4.0));
        assert!(set.points.iter().all(|&p| bounds.contains_point(p)));
    }

    #[test]
    fn test_generate_is_reproducible_with_seed() {
        let reference = [dvec2(0.0, 0.0), dvec2(1.0, 1.0)];
        let a = PointSet::generate_around(&reference, 10, 1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = PointSet::generate_around(&reference, 10, 1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(PointSet::generate_around(&[], 5, 1.0, &mut rng).is_err());
        assert!(PointSet::generate_around(&[dvec2(0.0, 0.0)], 5, -1.0, &mut rng).is_err());
        assert!(PointSet::generate_around(&[dvec2(f64::NAN, 0.0)], 5, 1.0, &mut rng).is_err());
    }

    #[test]
    fn test_generate_rejects_overflowing_box() {
        let mut rng = StdRng::seed_from_u64(0);
        let wide = [dvec2(-1e308, 0.0), dvec2(1e308, 1.0)];
        assert!(matches!(
            PointSet::generate_around(&wide, 3, 1.0, &mut rng),
            Err(NumError::InvalidInput(_))
        ));
        let point = [dvec2(0.0, 0.0)];
        assert!(PointSet::generate_around(&point, 3, f64::MAX, &mut rng).is_err());
    }

    #[test]
    fn test_text_format() {
        let set = PointSet::from_coords(&[[0.5, -1.25], [3.0, 4.0]]);
        let mut buf = Vec::new();
        set.write_text(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0.5 -1.25\n3 4\n");
    }

    #[test]
    fn test_parse_skips_blank_lines_and_reports_errors() {
        let set = PointSet::parse("1 2\n\n  3.5   -4\n").unwrap();
        assert_eq!(set.points, vec![dvec2(1.0, 2.0), dvec2(3.5, -4.0)]);

        assert!(matches!(PointSet::parse("1 2 3\n"), Err(NumError::Parse(_))));
        assert!(matches!(PointSet::parse("1 x\n"), Err(NumError::Parse(_))));
    }

    #[test]
    fn test_parse_counted_pair() {
        let (a, b) = parse_counted_pair("2\n0 0\n1 1\n1\n5 5\n").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(b.points, vec![dvec2(5.0, 5.0)]);

        assert!(parse_counted_pair("3\n0 0\n1 1\n").is_err());
        assert!(parse_counted_pair("").is_err());
    }
}

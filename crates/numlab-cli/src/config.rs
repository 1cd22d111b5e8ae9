//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <file>` on the command line
//! 2. `$NUMLAB_CONFIG` environment variable
//! 3. `numlab.toml` in the working directory
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use numlab_approx::{QuadOptions, SimpsonOptions};
use numlab_geometry::curve::DescentOptions;
use numlab_geometry::distance::AlignOptions;
use numlab_geometry::tessellate::DEFAULT_ANGLE_THRESHOLD;
use numlab_math::linalg::JacobiOptions;
use numlab_plot::PlotSize;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for SVG and text outputs. Default: working directory.
    pub output_dir: Option<PathBuf>,
    /// RNG seed. Unseeded runs draw from OS entropy.
    pub seed: Option<u64>,
    pub bezier: BezierConfig,
    pub random: RandomConfig,
    pub stats: StatsConfig,
    pub chebyshev: ChebyshevConfig,
    pub fit: FitConfig,
    pub quadrature: QuadOptions,
    pub simpson: SimpsonOptions,
    pub gauss: GaussConfig,
    pub jacobi: JacobiConfig,
    pub ellipse: DescentOptions,
    pub hausdorff: HausdorffConfig,
    pub plot: PlotSize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BezierConfig {
    /// Points evaluated along each curve.
    pub samples: usize,
}

/// Random point sets around the reference control polygons.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub count: usize,
    /// Distance the reference bounding box is grown on every side.
    pub margin: f64,
    /// Points echoed to stdout per set.
    pub preview: usize,
}

/// Shape and value range of the random test-data cube.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub testcases: usize,
    pub rows: usize,
    pub columns: usize,
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChebyshevConfig {
    pub degrees: Vec<usize>,
    /// Evaluation points on `[-1, 1]` for plotting and RMS error.
    pub grid: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub points: usize,
    pub degree: usize,
}

/// Random systems for `gauss --size`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GaussConfig {
    /// Probability that an entry above the diagonal is non-zero.
    pub sparsity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct JacobiConfig {
    pub size: usize,
    /// Probability that an entry above the diagonal is non-zero.
    pub sparsity: f64,
    pub tol: f64,
    pub max_iter: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HausdorffConfig {
    pub samples: usize,
    /// Turning angle (radians) above which adaptive sampling densifies.
    pub angle_threshold: f64,
    pub align: AlignOptions,
}

// --- Defaults ---

impl Default for BezierConfig {
    fn default() -> Self {
        Self { samples: 100 }
    }
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            count: 100,
            margin: 1.0,
            preview: 10,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            testcases: 3,
            rows: 11,
            columns: 6,
            low: 0.0,
            high: 100.0,
        }
    }
}

impl Default for ChebyshevConfig {
    fn default() -> Self {
        Self {
            degrees: vec![8, 10],
            grid: 500,
        }
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            points: 30,
            degree: 5,
        }
    }
}

impl Default for GaussConfig {
    fn default() -> Self {
        Self { sparsity: 0.05 }
    }
}

impl Default for JacobiConfig {
    fn default() -> Self {
        let options = JacobiOptions::default();
        Self {
            size: 1000,
            sparsity: 0.05,
            tol: options.tol,
            max_iter: options.max_iter,
        }
    }
}

impl JacobiConfig {
    pub fn options(&self) -> JacobiOptions {
        JacobiOptions {
            tol: self.tol,
            max_iter: self.max_iter,
        }
    }
}

impl Default for HausdorffConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            angle_threshold: DEFAULT_ANGLE_THRESHOLD,
            align: AlignOptions::default(),
        }
    }
}

/// Load config from `explicit`, the environment, or the working directory.
/// Returns defaults if no config file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return read_config(p);
    }
    if let Ok(p) = std::env::var("NUMLAB_CONFIG") {
        return read_config(Path::new(&p));
    }
    let local = Path::new("numlab.toml");
    if local.exists() {
        return read_config(local);
    }
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bezier.samples, 100);
        assert_eq!(config.chebyshev.degrees, vec![8, 10]);
        assert_eq!(config.fit.degree, 5);
        assert_eq!(config.jacobi.size, 1000);
        assert_eq!(config.quadrature.limit, 200);
        assert_eq!(config.plot.width, 1024);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
seed = 7

[fit]
degree = 3
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.fit.degree, 3);
        // Other fields should be defaults
        assert_eq!(config.fit.points, 30);
        assert_eq!(config.random.margin, 1.0);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
output_dir = "out"
seed = 42

[bezier]
samples = 200

[random]
count = 50
margin = 2.0

[chebyshev]
degrees = [4, 6, 8]
grid = 100

[quadrature]
rtol = 1e-8
atol = 1e-10
limit = 50

[gauss]
sparsity = 0.2

[jacobi]
size = 10
sparsity = 0.5
tol = 1e-9
max_iter = 20

[ellipse]
step = 0.05

[hausdorff]
samples = 40
[hausdorff.align]
learning_rate = 0.02

[plot]
width = 640
height = 480
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output_dir.as_deref(), Some(Path::new("out")));
        assert_eq!(config.bezier.samples, 200);
        assert_eq!(config.chebyshev.degrees, vec![4, 6, 8]);
        assert_eq!(config.quadrature.limit, 50);
        assert_eq!(config.gauss.sparsity, 0.2);
        assert_eq!(config.jacobi.options().max_iter, 20);
        assert_eq!(config.ellipse.step, 0.05);
        assert_eq!(config.ellipse.max_iter, 100_000);
        assert_eq!(config.hausdorff.align.learning_rate, 0.02);
        assert_eq!(config.hausdorff.align.max_iter, 10_000);
        assert_eq!(config.plot.height, 480);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numlab.toml");
        std::fs::write(&path, "[random]\ncount = 5\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.random.count, 5);

        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
        std::fs::write(&path, "[random]\ncount = \"many\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}

//! Descriptive statistics over a `testcases x rows x columns` data cube.

use nalgebra::DMatrix;
use numlab_core::{NumError, Result};
use rand::Rng;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`).
pub fn variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64)
}

/// Root mean square of the pointwise differences `a - b`.
pub fn rms_error(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(NumError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let mse = mean_squared_error(a, b)?;
    Ok(mse.sqrt())
}

pub fn mean_squared_error(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(NumError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let sq: Vec<f64> = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).collect();
    mean(&sq).ok_or_else(|| NumError::invalid("cannot compute error of empty samples"))
}

/// Test data for several testcases with per-column summary statistics.
#[derive(Debug, Clone)]
pub struct StatsMatrix {
    /// One `rows x columns` matrix per testcase
    pub data: Vec<DMatrix<f64>>,
    /// `testcases x columns` column means
    pub means: DMatrix<f64>,
    /// `testcases x columns` population variances
    pub variances: DMatrix<f64>,
}

impl StatsMatrix {
    pub fn from_data(data: Vec<DMatrix<f64>>) -> Result<Self> {
        let first = data
            .first()
            .ok_or_else(|| NumError::invalid("no testcases"))?;
        let (rows, cols) = first.shape();
        if rows == 0 || cols == 0 {
            return Err(NumError::invalid("testcase matrices must be non-empty"));
        }
        for m in &data {
            if m.shape() != (rows, cols) {
                return Err(NumError::DimensionMismatch {
                    expected: rows * cols,
                    actual: m.len(),
                });
            }
        }

        let mut means = DMatrix::zeros(data.len(), cols);
        let mut variances = DMatrix::zeros(data.len(), cols);
        for (t, m) in data.iter().enumerate() {
            for c in 0..cols {
                let column: Vec<f64> = m.column(c).iter().copied().collect();
                // non-empty: rows > 0 was checked above
                means[(t, c)] = mean(&column).unwrap_or_default();
                variances[(t, c)] = variance(&column).unwrap_or_default();
            }
        }

        Ok(Self {
            data,
            means,
            variances,
        })
    }

    /// Uniform random values in `[low, high)`.
    pub fn random<R: Rng + ?Sized>(
        testcases: usize,
        rows: usize,
        cols: usize,
        low: f64,
        high: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if !(low < high) {
            return Err(NumError::invalid(format!("empty value range [{low}, {high})")));
        }
        if !(high - low).is_finite() {
            return Err(NumError::invalid(format!("value range [{low}, {high}) is too wide to sample")));
        }
        let data = (0..testcases)
            .map(|_| DMatrix::from_fn(rows, cols, |_, _| rng.random_range(low..high)))
            .collect();
        Self::from_data(data)
    }

    pub fn testcases(&self) -> usize {
        self.data.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data[0].shape()
    }
}

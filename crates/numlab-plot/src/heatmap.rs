use numlab_core::traits::Validate;
use numlab_core::{NumError, Result};
use numlab_math::DMatrix;

use crate::color::{blues, Color};

/// An annotated matrix plot. Row 0 is drawn at the top.
#[derive(Debug, Clone)]
pub struct HeatMap {
    pub title: String,
    pub values: DMatrix<f64>,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// Fixed color range; `None` spans the data
    pub range: Option<(f64, f64)>,
    /// Decimal places in cell annotations
    pub decimals: usize,
}

impl HeatMap {
    pub fn new(title: impl Into<String>, values: DMatrix<f64>) -> Self {
        let (rows, cols) = values.shape();
        Self {
            title: title.into(),
            row_labels: (1..=rows).map(|i| format!("Row {i}")).collect(),
            col_labels: (1..=cols).map(|j| format!("Column {j}")).collect(),
            values,
            range: None,
            decimals: 2,
        }
    }

    pub fn with_row_labels(mut self, labels: Vec<String>) -> Self {
        self.row_labels = labels;
        self
    }

    pub fn with_col_labels(mut self, labels: Vec<String>) -> Self {
        self.col_labels = labels;
        self
    }

    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.range = Some((lo, hi));
        self
    }

    /// Color range, widened around a constant matrix so it is never empty.
    pub fn value_range(&self) -> (f64, f64) {
        if let Some(range) = self.range {
            return range;
        }
        let lo = self.values.min();
        let hi = self.values.max();
        if hi > lo {
            (lo, hi)
        } else {
            (lo - 0.5, hi + 0.5)
        }
    }

    pub fn color_for(&self, value: f64) -> Color {
        let (lo, hi) = self.value_range();
        blues((value - lo) / (hi - lo))
    }

    pub fn annotation(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }
}

impl Validate for HeatMap {
    fn validate(&self) -> Result<()> {
        let (rows, cols) = self.values.shape();
        if rows == 0 || cols == 0 {
            return Err(NumError::invalid(format!("heat map {:?} is empty", self.title)));
        }
        if self.row_labels.len() != rows {
            return Err(NumError::DimensionMismatch {
                expected: rows,
                actual: self.row_labels.len(),
            });
        }
        if self.col_labels.len() != cols {
            return Err(NumError::DimensionMismatch {
                expected: cols,
                actual: self.col_labels.len(),
            });
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(NumError::invalid(format!("heat map {:?} has non-finite values", self.title)));
        }
        if let Some((lo, hi)) = self.range {
            if !(lo < hi) {
                return Err(NumError::invalid(format!("empty color range [{lo}, {hi}]")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_and_range() {
        let map = HeatMap::new("m", DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert_eq!(map.row_labels, vec!["Row 1", "Row 2"]);
        assert_eq!(map.col_labels.len(), 3);
        assert_eq!(map.value_range(), (1.0, 6.0));
        assert_eq!(map.color_for(6.0), blues(1.0));
        assert_eq!(map.annotation(2.0 / 3.0), "0.67");
        map.validate().unwrap();
    }

    #[test]
    fn test_constant_matrix_range() {
        let map = HeatMap::new("c", DMatrix::from_element(2, 2, 7.0));
        assert_eq!(map.value_range(), (6.5, 7.5));
        let fixed = map.with_range(0.0, 100.0);
        assert_eq!(fixed.value_range(), (0.0, 100.0));
    }

    #[test]
    fn test_validate_label_counts() {
        let map = HeatMap::new("m", DMatrix::zeros(2, 2)).with_col_labels(vec!["only".into()]);
        assert!(matches!(map.validate(), Err(NumError::DimensionMismatch { .. })));
        let map = HeatMap::new("m", DMatrix::zeros(2, 2)).with_range(1.0, 1.0);
        assert!(map.validate().is_err());
    }
}

//! Polynomials in the power basis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A polynomial `sum coeffs[i] * x^i` with coefficients in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    /// Coefficients ordered highest power first.
    pub fn descending(&self) -> Vec<f64> {
        self.coeffs.iter().rev().copied().collect()
    }

    /// Nominal degree, i.e. `coeffs.len() - 1` (0 for the empty polynomial).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Evaluate with Horner's scheme.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        for (i, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0.0 {
                continue;
            }
            if wrote {
                write!(f, " {} ", if c < 0.0 { '-' } else { '+' })?;
            } else if c < 0.0 {
                write!(f, "-")?;
            }
            let a = c.abs();
            match i {
                0 => write!(f, "{a}")?,
                1 => write!(f, "{a}x")?,
                _ => write!(f, "{a}x^{i}")?,
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_evaluate() {
        let p = Polynomial::new(vec![1.0, 2.5, -0.25]);
        assert_abs_diff_eq!(p.evaluate(2.1), 5.1475, epsilon = 1e-12);
        assert_abs_diff_eq!(p.evaluate(-3.14), -9.3149, epsilon = 1e-12);
        assert_abs_diff_eq!(p.evaluate(0.0), 1.0);
        assert_eq!(Polynomial::new(vec![]).evaluate(3.0), 0.0);
    }

    #[test]
    fn test_descending_order() {
        let p = Polynomial::new(vec![-1.0, 0.0, 2.0]);
        assert_eq!(p.coeffs, vec![-1.0, 0.0, 2.0]);
        assert_eq!(p.descending(), vec![2.0, 0.0, -1.0]);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn test_display() {
        let p = Polynomial::new(vec![-1.0, 0.0, 2.0]);
        assert_eq!(p.to_string(), "2x^2 - 1");
        assert_eq!(Polynomial::new(vec![0.0]).to_string(), "0");
    }
}

//! Dense linear solvers: Gaussian elimination and Jacobi iteration.

use nalgebra::{DMatrix, DVector};
use numlab_core::{NumError, Result, Tolerance};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

fn check_system(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<usize> {
    let n = a.nrows();
    if n == 0 {
        return Err(NumError::invalid("empty coefficient matrix"));
    }
    if a.ncols() != n {
        return Err(NumError::DimensionMismatch {
            expected: n,
            actual: a.ncols(),
        });
    }
    if b.len() != n {
        return Err(NumError::DimensionMismatch {
            expected: n,
            actual: b.len(),
        });
    }
    Ok(n)
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting.
///
/// A pivot no larger than `tol.relative` times the largest entry of `a` marks
/// the system as singular, so the test does not depend on the matrix scale.
pub fn gaussian_elimination(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    tol: Tolerance,
) -> Result<DVector<f64>> {
    let n = check_system(a, b)?;

    let pivot_floor = tol.relative * a.amax();
    let mut m = a.clone();
    let mut rhs = b.clone();

    for col in 0..n {
        let (offset, pivot_abs) = m
            .view((col, col), (n - col, 1))
            .iter()
            .map(|v| v.abs())
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
                if v > best.1 {
                    (i, v)
                } else {
                    best
                }
            });
        if !(pivot_abs > pivot_floor) {
            return Err(NumError::Singular(format!("zero pivot in column {col}")));
        }
        let pivot_row = col + offset;
        if pivot_row != col {
            m.swap_rows(col, pivot_row);
            rhs.swap_rows(col, pivot_row);
        }

        for row in col + 1..n {
            let rate = m[(row, col)] / m[(col, col)];
            if rate == 0.0 {
                continue;
            }
            for k in col..n {
                m[(row, k)] -= rate * m[(col, k)];
            }
            rhs[row] -= rate * rhs[col];
        }
    }

    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut acc = rhs[i];
        for j in i + 1..n {
            acc -= m[(i, j)] * x[j];
        }
        x[i] = acc / m[(i, i)];
    }

    Ok(x)
}

/// Split an augmented matrix `[A | b]` given as rows of `n + 1` values.
pub fn split_augmented(rows: &[Vec<f64>]) -> Result<(DMatrix<f64>, DVector<f64>)> {
    let n = rows.len();
    if n == 0 {
        return Err(NumError::invalid("augmented matrix has no rows"));
    }
    for row in rows {
        if row.len() != n + 1 {
            return Err(NumError::DimensionMismatch {
                expected: n + 1,
                actual: row.len(),
            });
        }
    }
    let a = DMatrix::from_fn(n, n, |i, j| rows[i][j]);
    let b = DVector::from_fn(n, |i, _| rows[i][n]);
    Ok((a, b))
}

/// Parse `n` followed by `n` rows of `n + 1` whitespace-separated numbers.
pub fn parse_augmented(text: &str) -> Result<(DMatrix<f64>, DVector<f64>)> {
    let mut tokens = text.split_whitespace();
    let n: usize = tokens
        .next()
        .ok_or_else(|| NumError::Parse("missing system size".into()))?
        .parse()
        .map_err(|e| NumError::Parse(format!("system size: {e}")))?;

    let values = tokens
        .map(|t| {
            t.parse::<f64>()
                .map_err(|e| NumError::Parse(format!("coefficient {t:?}: {e}")))
        })
        .collect::<Result<Vec<f64>>>()?;
    if values.len() != n * (n + 1) {
        return Err(NumError::DimensionMismatch {
            expected: n * (n + 1),
            actual: values.len(),
        });
    }

    let rows: Vec<Vec<f64>> = values.chunks(n + 1).map(|c| c.to_vec()).collect();
    split_augmented(&rows)
}

/// Stopping rule for [`jacobi`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct JacobiOptions {
    /// Stop once the L1 norm of an update is at most this value
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for JacobiOptions {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JacobiReport {
    pub solution: DVector<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// `sum |b - A x|` at the returned solution
    pub residual: f64,
}

/// Jacobi iteration for `a x = b` starting from `x0`.
pub fn jacobi(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    x0: &DVector<f64>,
    options: &JacobiOptions,
) -> Result<JacobiReport> {
    let n = check_system(a, b)?;
    if x0.len() != n {
        return Err(NumError::DimensionMismatch {
            expected: n,
            actual: x0.len(),
        });
    }
    if let Some(i) = (0..n).find(|&i| a[(i, i)] == 0.0) {
        return Err(NumError::Singular(format!("zero diagonal entry at row {i}")));
    }

    let mut x = x0.clone();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        let next: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|i| {
                let sum: f64 = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| a[(i, j)] * x[j])
                    .sum();
                (b[i] - sum) / a[(i, i)]
            })
            .collect();

        let change: f64 = next.iter().zip(x.iter()).map(|(new, old)| (new - old).abs()).sum();
        x = DVector::from_vec(next);
        iterations += 1;

        if change <= options.tol {
            converged = true;
            break;
        }
    }

    if converged {
        tracing::debug!(iterations, "jacobi converged");
    } else {
        tracing::warn!(
            max_iter = options.max_iter,
            "jacobi did not converge within the iteration limit"
        );
    }

    let residual = l1_residual(a, b, &x);
    Ok(JacobiReport {
        solution: x,
        iterations,
        converged,
        residual,
    })
}

/// `sum |b - A x|`.
pub fn l1_residual(a: &DMatrix<f64>, b: &DVector<f64>, x: &DVector<f64>) -> f64 {
    (b - a * x).iter().map(|v| v.abs()).sum()
}

/// Random sparse upper-triangular system with a dominant diagonal.
///
/// Diagonal entries are integers in `5..=14`, each strictly-upper entry is an
/// integer in `1..=5` with probability `sparsity`, and `b` holds integers in `1..=10`.
pub fn sparse_upper_triangular<R: Rng + ?Sized>(
    n: usize,
    sparsity: f64,
    rng: &mut R,
) -> Result<(DMatrix<f64>, DVector<f64>)> {
    if !(0.0..=1.0).contains(&sparsity) {
        return Err(NumError::invalid(format!(
            "sparsity must be in [0, 1], got {sparsity}"
        )));
    }

    let mut a = DMatrix::zeros(n, n);
    let mut b = DVector::zeros(n);
    for i in 0..n {
        b[i] = f64::from(rng.random_range(1..=10u32));
        a[(i, i)] = f64::from(rng.random_range(5..=14u32));
        for j in i + 1..n {
            if rng.random_bool(sparsity) {
                a[(i, j)] = f64::from(rng.random_range(1..=5u32));
            }
        }
    }
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn four_by_four_system() -> (DMatrix<f64>, DVector<f64>) {
        split_augmented(&[
            vec![1.0, -1.0, 2.0, -1.0, -8.0],
            vec![2.0, -2.0, 3.0, -3.0, -20.0],
            vec![1.0, 1.0, 1.0, 0.0, -2.0],
            vec![1.0, -1.0, 4.0, 3.0, 4.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_gauss_needs_pivoting() {
        // Column 1 eliminates to zero on the diagonal after the first step.
        let (a, b) = four_by_four_system();
        let x = gaussian_elimination(&a, &b, Tolerance::default()).unwrap();
        let expected = [-7.0, 3.0, 2.0, 2.0];
        for (xi, ei) in x.iter().zip(expected) {
            assert_abs_diff_eq!(*xi, ei, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_gauss_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        let err = gaussian_elimination(&a, &b, Tolerance::default()).unwrap_err();
        assert!(matches!(err, NumError::Singular(_)));
    }

    #[test]
    fn test_gauss_small_scale_is_not_singular() {
        let (a, b) = four_by_four_system();
        let x = gaussian_elimination(&(a * 1e-13), &(b * 1e-13), Tolerance::default()).unwrap();
        for (xi, ei) in x.iter().zip([-7.0, 3.0, 2.0, 2.0]) {
            assert_abs_diff_eq!(*xi, ei, epsilon = 1e-9);
        }

        let zero = DMatrix::zeros(2, 2);
        assert!(matches!(
            gaussian_elimination(&zero, &DVector::zeros(2), Tolerance::default()),
            Err(NumError::Singular(_))
        ));
    }

    #[test]
    fn test_gauss_dimension_mismatch() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            gaussian_elimination(&a, &b, Tolerance::default()),
            Err(NumError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_parse_augmented() {
        let text = "2\n2 1 5\n1 -1 1\n";
        let (a, b) = parse_augmented(text).unwrap();
        assert_eq!(a, DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, -1.0]));
        assert_eq!(b, DVector::from_vec(vec![5.0, 1.0]));

        assert!(matches!(parse_augmented("2\n1 2 3\n4 5"), Err(NumError::DimensionMismatch { .. })));
        assert!(matches!(parse_augmented("x"), Err(NumError::Parse(_))));
    }

    #[test]
    fn test_jacobi_diagonally_dominant() {
        let a = DMatrix::from_row_slice(3, 3, &[10.0, -1.0, 2.0, -1.0, 11.0, -1.0, 2.0, -1.0, 10.0]);
        let b = DVector::from_vec(vec![6.0, 25.0, -11.0]);
        let x0 = DVector::zeros(3);
        let report = jacobi(&a, &b, &x0, &JacobiOptions { tol: 1e-12, max_iter: 500 }).unwrap();
        assert!(report.converged);
        assert!(report.residual < 1e-9);

        let direct = gaussian_elimination(&a, &b, Tolerance::default()).unwrap();
        for (j, d) in report.solution.iter().zip(direct.iter()) {
            assert_abs_diff_eq!(*j, *d, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_jacobi_zero_diagonal() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let x0 = DVector::zeros(2);
        assert!(matches!(
            jacobi(&a, &b, &x0, &JacobiOptions::default()),
            Err(NumError::Singular(_))
        ));
    }

    #[test]
    fn test_jacobi_iteration_limit() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);
        let x0 = DVector::zeros(2);
        let report = jacobi(&a, &b, &x0, &JacobiOptions { tol: 1e-12, max_iter: 20 }).unwrap();
        assert!(!report.converged);
        assert_eq!(report.iterations, 20);
    }

    #[test]
    fn test_sparse_upper_triangular_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let (a, b) = sparse_upper_triangular(50, 0.05, &mut rng).unwrap();
        for i in 0..50 {
            assert!((5.0..=14.0).contains(&a[(i, i)]));
            assert!((1.0..=10.0).contains(&b[i]));
            for j in 0..i {
                assert_eq!(a[(i, j)], 0.0);
            }
        }

        let report = jacobi(&a, &b, &DVector::zeros(50), &JacobiOptions::default()).unwrap();
        assert!(report.converged);
        assert!(report.residual < 1e-4);
    }

    #[test]
    fn test_sparse_rejects_bad_sparsity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sparse_upper_triangular(3, 1.5, &mut rng).is_err());
    }
}

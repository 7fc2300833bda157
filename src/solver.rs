//! Linear solver for the reduced stiffness system
//!
//! The reduced stiffness matrix of a stable truss is symmetric positive
//! definite, so the default path is a Cholesky factorization `K = L Lᵀ`
//! that inspects every pivot as it goes. A pivot at or below
//! `pivot_tolerance * ‖K‖∞` means the structure has (numerically) no
//! stiffness along that DOF, and the solve stops there with the offending
//! row rather than returning garbage.

use serde::{Deserialize, Serialize};

use crate::error::SingularSystem;
use crate::math::{self, Mat, Vec as FEVec};

/// Factorization used for the reduced system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    /// Dense Cholesky with pivot monitoring
    #[default]
    Cholesky,
    /// Dense LU with partial pivoting
    Lu,
}

/// Displacements of the free DOFs plus pivot statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub displacements: FEVec,
    pub min_pivot: f64,
    pub max_pivot: f64,
    /// `max_pivot / min_pivot`, a cheap conditioning estimate
    pub pivot_ratio: f64,
}

impl Solution {
    fn new(displacements: FEVec, pivots: impl Iterator<Item = f64>) -> Self {
        let (min_pivot, max_pivot) = pivots.fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
        let pivot_ratio = if min_pivot > 0.0 && min_pivot.is_finite() {
            max_pivot / min_pivot
        } else {
            1.0
        };
        Self {
            displacements,
            min_pivot,
            max_pivot,
            pivot_ratio,
        }
    }
}

/// Solve `K u = F` for a square reduced system
pub fn solve(
    stiffness: &Mat,
    loads: &FEVec,
    method: SolverMethod,
    pivot_tolerance: f64,
) -> Result<Solution, SingularSystem> {
    let threshold = pivot_tolerance * math::infinity_norm(stiffness);
    match method {
        SolverMethod::Cholesky => solve_cholesky(stiffness, loads, threshold),
        SolverMethod::Lu => solve_lu(stiffness, loads, threshold),
    }
}

/// Dense Cholesky factor of a symmetric positive definite matrix
#[derive(Debug, Clone)]
pub struct CholeskyFactor {
    /// Lower triangular factor L
    l: Mat,
    /// Squared diagonal of L, the pivots of the elimination
    pivots: Vec<f64>,
}

impl CholeskyFactor {
    /// Factorize, failing at the first pivot at or below `threshold`
    pub fn new(a: &Mat, threshold: f64) -> Result<Self, SingularSystem> {
        let n = a.nrows();
        let mut l = Mat::zeros(n, n);
        let mut pivots = Vec::with_capacity(n);

        for j in 0..n {
            let mut diag = a[(j, j)];
            for k in 0..j {
                diag -= l[(j, k)] * l[(j, k)];
            }

            if !(diag > threshold) {
                return Err(SingularSystem {
                    row: j,
                    pivot: diag,
                    threshold,
                });
            }

            let ljj = diag.sqrt();
            l[(j, j)] = ljj;
            pivots.push(diag);

            for i in (j + 1)..n {
                let mut sum = a[(i, j)];
                for k in 0..j {
                    sum -= l[(i, k)] * l[(j, k)];
                }
                l[(i, j)] = sum / ljj;
            }
        }

        Ok(Self { l, pivots })
    }

    /// Solve L * L^T * x = b
    pub fn solve(&self, b: &FEVec) -> FEVec {
        let n = self.l.nrows();
        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..i {
                sum += self.l[(i, j)] * x[j];
            }
            x[i] = (x[i] - sum) / self.l[(i, i)];
        }

        // Backward substitution: L^T * x = y
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..n {
                sum += self.l[(j, i)] * x[j];
            }
            x[i] = (x[i] - sum) / self.l[(i, i)];
        }

        x
    }
}

fn solve_cholesky(a: &Mat, b: &FEVec, threshold: f64) -> Result<Solution, SingularSystem> {
    let factor = CholeskyFactor::new(a, threshold)?;
    let x = factor.solve(b);
    Ok(Solution::new(x, factor.pivots.iter().copied()))
}

fn solve_lu(a: &Mat, b: &FEVec, threshold: f64) -> Result<Solution, SingularSystem> {
    let lu = a.clone().lu();
    let u = lu.u();

    let pivots: Vec<f64> = u.diagonal().iter().map(|p| p.abs()).collect();
    if let Some((row, &pivot)) = pivots.iter().enumerate().find(|(_, p)| !(**p > threshold)) {
        return Err(SingularSystem {
            row,
            pivot,
            threshold,
        });
    }

    let x = lu.solve(b).ok_or_else(|| {
        let (row, pivot) = pivots
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::INFINITY), |acc, (i, p)| if p < acc.1 { (i, p) } else { acc });
        SingularSystem {
            row,
            pivot,
            threshold,
        }
    })?;

    Ok(Solution::new(x, pivots.into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spd() -> (Mat, FEVec) {
        let k = Mat::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, -1.0, 0.0, -1.0, 2.0]);
        let f = FEVec::from_vec(vec![1.0, 2.0, 3.0]);
        (k, f)
    }

    #[test]
    fn test_cholesky_solves_spd_system() {
        let (k, f) = spd();
        let solution = solve(&k, &f, SolverMethod::Cholesky, 1e-10).unwrap();
        let residual = &k * &solution.displacements - &f;
        assert!(residual.amax() < 1e-12);
        assert!(solution.pivot_ratio >= 1.0);
        assert_relative_eq!(solution.max_pivot, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lu_agrees_with_cholesky() {
        let (k, f) = spd();
        let chol = solve(&k, &f, SolverMethod::Cholesky, 1e-10).unwrap();
        let lu = solve(&k, &f, SolverMethod::Lu, 1e-10).unwrap();
        for (a, b) in chol.displacements.iter().zip(lu.displacements.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_pivot_reports_row() {
        // Second unknown is a copy of the first: no independent stiffness
        let k = Mat::from_row_slice(3, 3, &[1.0, -1.0, 0.0, -1.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
        let f = FEVec::from_vec(vec![1.0, 0.0, 0.0]);
        let err = solve(&k, &f, SolverMethod::Cholesky, 1e-10).unwrap_err();
        assert_eq!(err.row, 1);
        assert!(err.pivot.abs() <= err.threshold);
        assert_relative_eq!(err.threshold, 2e-10, epsilon = 1e-20);
    }

    #[test]
    fn test_zero_matrix_is_singular() {
        let k = Mat::zeros(2, 2);
        let f = FEVec::from_vec(vec![1.0, 0.0]);
        assert_eq!(
            solve(&k, &f, SolverMethod::Cholesky, 1e-10).unwrap_err().row,
            0
        );
        assert!(solve(&k, &f, SolverMethod::Lu, 1e-10).is_err());
    }

    #[test]
    fn test_method_serde() {
        let method: SolverMethod = serde_json::from_str("\"lu\"").unwrap();
        assert_eq!(method, SolverMethod::Lu);
    }
}

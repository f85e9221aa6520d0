//! Minimum-norm least squares via the SVD pseudo-inverse.
//!
//! The baseline strategy: fast, always well-defined (rank deficiency is
//! absorbed by the pseudo-inverse), and systematically biased away from the
//! sparse ground truth, which is what motivates the L1 strategies.

use super::{BlockSolver, Solution};
use crate::error::SolveError;
use log::warn;
use nalgebra::{DMatrix, DVector};

const PINV_EPS: f64 = 1e-12;

pub struct LeastSquares {
    a: DMatrix<f64>,
    pinv: DMatrix<f64>,
}

impl LeastSquares {
    /// Factor the matrix once; every block solve is then a single multiply.
    pub fn new(a: &DMatrix<f64>) -> Self {
        // pseudo_inverse only rejects a negative epsilon
        let pinv = a.clone().pseudo_inverse(PINV_EPS).unwrap_or_else(|_| {
            warn!("pseudo-inverse unavailable, falling back to transpose");
            a.transpose()
        });
        Self { a: a.clone(), pinv }
    }
}

impl BlockSolver for LeastSquares {
    fn solve(&self, measurement: &DVector<f64>) -> Result<Solution, SolveError> {
        let x = &self.pinv * measurement;
        let residual = (&self.a * &x - measurement).norm();
        Ok(Solution {
            coefficients: x,
            residual,
            relaxed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_matrix(m: usize, n: usize) -> DMatrix<f64> {
        let mut state = 0xDEADBEEFCAFEu64;
        DMatrix::from_fn(m, n, |_, _| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) - 1.0
        })
    }

    #[test]
    fn reproduces_a_minimum_norm_vector() {
        // Any vector in the row space of A is already minimum-norm for its
        // own measurement, so A⁺·A·x must reproduce it.
        let a = wide_matrix(6, 20);
        let solver = LeastSquares::new(&a);
        let w = DVector::from_fn(6, |i, _| (i as f64 - 2.5) / 3.0);
        let x_min = a.transpose() * w;
        let y = &a * &x_min;
        let sol = solver.solve(&y).unwrap();
        assert!(
            (&sol.coefficients - &x_min).norm() < 1e-8,
            "minimum-norm vector drifted by {:.3e}",
            (&sol.coefficients - &x_min).norm()
        );
        assert!(sol.residual < 1e-8);
        assert!(!sol.relaxed);
    }

    #[test]
    fn rank_deficiency_is_not_an_error() {
        // Two identical rows: rank 1. The pseudo-inverse still produces the
        // minimum-norm solution for consistent measurements.
        let mut a = DMatrix::zeros(2, 4);
        a[(0, 0)] = 1.0;
        a[(1, 0)] = 1.0;
        let solver = LeastSquares::new(&a);
        let y = DVector::from_vec(vec![2.0, 2.0]);
        let sol = solver.solve(&y).unwrap();
        assert!((sol.coefficients[0] - 2.0).abs() < 1e-10);
        assert!(sol.residual < 1e-10);
    }
}

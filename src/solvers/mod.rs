//! Continuous relaxation solvers for the underdetermined per-block system.
//!
//! All strategies solve `A·x = y` for the length-N DCT coefficient vector `x`
//! without assuming two-tone structure, behind one capability trait so each
//! is independently testable and selectable by configuration:
//!
//! - [`LeastSquares`] — minimum-norm solution via the SVD pseudo-inverse.
//!   Always succeeds; the baseline the sparse strategies improve on.
//! - [`BasisPursuit`] — L1 minimization under a bounded-residual constraint,
//!   run as a FISTA continuation on the penalized Lasso.
//! - [`RegularizedL1`] — basis pursuit plus a binary-range penalty and a 1-D
//!   total-variation term on the flattened coefficients.
//!
//! Solvers are pure with respect to the measurement: the only state is the
//! read-only matrix factorization cached at construction, so one solver
//! instance serves all blocks across worker threads.

mod basis_pursuit;
mod fista;
mod least_squares;
mod regularized;

pub use basis_pursuit::BasisPursuit;
pub use least_squares::LeastSquares;
pub use regularized::RegularizedL1;

use crate::error::SolveError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Outcome of a successful per-block relaxation solve.
#[derive(Clone, Debug)]
pub struct Solution {
    /// DCT-domain coefficients satisfying the (possibly relaxed) constraint.
    pub coefficients: DVector<f64>,
    /// Final residual norm `‖A·x − y‖₂`.
    pub residual: f64,
    /// Whether the relaxed tolerance (or a fallback objective) was needed.
    pub relaxed: bool,
}

/// One per-block relaxation strategy. Implementations must be shareable
/// across the worker pool.
pub trait BlockSolver: Send + Sync {
    /// Solve for the coefficient vector of one measurement.
    fn solve(&self, measurement: &DVector<f64>) -> Result<Solution, SolveError>;
}

/// Tuning knobs shared by the iterative solvers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Residual bound for the first solve attempt.
    pub residual_tol: f64,
    /// Relaxed bound used for the single retry before reporting infeasibility.
    pub relaxed_tol: f64,
    /// Weight of the total-variation term in the regularized strategy.
    pub tv_weight: f64,
    /// Weight of the binary-range penalty in the regularized strategy.
    pub binary_weight: f64,
    /// Huber smoothing width for the total-variation gradient.
    pub huber_mu: f64,
    /// Cap on the residual-weight schedule of the regularized strategy.
    pub max_residual_weight: f64,
    /// FISTA iterations per continuation stage.
    pub stage_iters: usize,
    /// Number of continuation stages (geometric L1-weight schedule).
    pub continuation_stages: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            residual_tol: 1e-4,
            relaxed_tol: 1e-3,
            tv_weight: 0.1,
            binary_weight: 1.0,
            huber_mu: 1e-3,
            max_residual_weight: 1e6,
            stage_iters: 400,
            continuation_stages: 8,
        }
    }
}

/// Continuous strategy selector carried by the run configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    LeastSquares,
    BasisPursuit,
    RegularizedL1,
}

/// Construct the configured solver over the shared projection matrix.
pub fn build_solver(
    kind: SolverKind,
    matrix: &DMatrix<f64>,
    opts: &SolverOptions,
) -> Box<dyn BlockSolver> {
    match kind {
        SolverKind::LeastSquares => Box::new(LeastSquares::new(matrix)),
        SolverKind::BasisPursuit => Box::new(BasisPursuit::new(matrix, *opts)),
        SolverKind::RegularizedL1 => Box::new(RegularizedL1::new(matrix, *opts)),
    }
}

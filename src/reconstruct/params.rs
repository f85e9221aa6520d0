//! Parameter types configuring the reconstruction pipeline.
//!
//! Defaults match the intended deployment: 8-px measurement blocks over a
//! 10-px module grid, exact discrete decoding, Otsu post-processing. For
//! tuning the relaxation strategies, start with the residual tolerances and
//! the continuation schedule in [`SolverOptions`].

use crate::postprocess::PostProcessOptions;
use crate::solvers::{SolverKind, SolverOptions};
use serde::{Deserialize, Serialize};

/// Per-block reconstruction strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Exhaustive two-tone candidate decoding (exact on noiseless input).
    Discrete,
    /// Minimum-norm least squares.
    LeastSquares,
    /// Basis pursuit (L1).
    BasisPursuit,
    /// Basis pursuit with binary-range and total-variation penalties.
    RegularizedL1,
}

impl Strategy {
    /// The continuous solver backing this strategy, if any.
    pub fn solver_kind(self) -> Option<SolverKind> {
        match self {
            Strategy::Discrete => None,
            Strategy::LeastSquares => Some(SolverKind::LeastSquares),
            Strategy::BasisPursuit => Some(SolverKind::BasisPursuit),
            Strategy::RegularizedL1 => Some(SolverKind::RegularizedL1),
        }
    }
}

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverParams {
    /// Measurement block edge in pixels.
    pub block_size: usize,
    /// Module edge in pixels.
    pub module_size: usize,
    /// Per-block reconstruction strategy.
    pub strategy: Strategy,
    /// Residual above which a discrete decode is flagged low-confidence.
    pub decode_tol: f64,
    /// Tuning for the continuous strategies.
    pub solver: SolverOptions,
    /// Post-processing policy; `None` skips binarization.
    pub postprocess: Option<PostProcessOptions>,
}

impl Default for RecoverParams {
    fn default() -> Self {
        Self {
            block_size: 8,
            module_size: 10,
            strategy: Strategy::Discrete,
            decode_tol: 1e-6,
            solver: SolverOptions::default(),
            postprocess: Some(PostProcessOptions::default()),
        }
    }
}

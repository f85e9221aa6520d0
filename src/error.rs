//! Error types for the reconstruction core.
//!
//! Fatal configuration problems abort the run; per-block solver failures are
//! isolated by the pipeline and surface as diagnostics instead.

use thiserror::Error;

/// Fatal setup/validation errors. Raised before or at the start of a run,
/// never per block.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The measurement list cannot tile a square canvas.
    #[error("block count {0} is not a perfect square")]
    NonSquareBlockCount(usize),

    /// Projection matrix width does not match the flattened block length.
    #[error("projection matrix has {cols} columns, expected {expected} (block_size²)")]
    MatrixWidth { cols: usize, expected: usize },

    /// Projection matrix has a zero dimension.
    #[error("projection matrix must be non-empty, got {rows}×{cols}")]
    EmptyMatrix { rows: usize, cols: usize },

    /// A measurement vector disagrees with the projection matrix row count.
    #[error("measurement {index} has length {len}, expected {expected} (matrix rows)")]
    MeasurementLength {
        index: usize,
        len: usize,
        expected: usize,
    },

    /// Block or module size of zero makes the grid degenerate.
    #[error("block and module sizes must be positive, got block={block} module={module}")]
    InvalidGeometry { block: usize, module: usize },
}

/// Per-block relaxation failure. Non-fatal: the pipeline fills the block with
/// a neutral placeholder and keeps going.
#[derive(Debug, Clone, Error)]
pub enum SolveError {
    /// The residual constraint stayed unsatisfied even after one relaxation.
    #[error("residual {residual:.3e} above tolerance {tolerance:.1e} after relaxation")]
    Infeasible { residual: f64, tolerance: f64 },
}

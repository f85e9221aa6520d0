//! Forward measurement model.
//!
//! A block is flattened row-major, pushed through the orthonormal 1-D DCT-II,
//! then projected by the fixed wide matrix down to the measurement vector:
//!
//! `y = A · DCT(flatten(block))`
//!
//! Deterministic and side-effect free. The relaxation solvers work in the
//! DCT-coefficient domain against `A` alone; [`ForwardModel::inverse_flatten`]
//! maps recovered coefficients back to pixel space with the transpose basis.

pub mod dct;

use crate::error::ConfigError;
use nalgebra::{DMatrix, DVector};

/// Immutable dense M×N projection matrix, loaded once per run.
#[derive(Clone, Debug)]
pub struct ProjectionMatrix {
    inner: DMatrix<f64>,
}

impl ProjectionMatrix {
    /// Wrap a dense matrix, rejecting empty dimensions.
    pub fn new(inner: DMatrix<f64>) -> Result<Self, ConfigError> {
        if inner.nrows() == 0 || inner.ncols() == 0 {
            return Err(ConfigError::EmptyMatrix {
                rows: inner.nrows(),
                cols: inner.ncols(),
            });
        }
        Ok(Self { inner })
    }

    /// Measurement length M.
    pub fn rows(&self) -> usize {
        self.inner.nrows()
    }

    /// Flattened block length N.
    pub fn cols(&self) -> usize {
        self.inner.ncols()
    }

    /// Borrow the underlying matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inner
    }
}

/// Cached forward transform: projection matrix plus the DCT basis sized to the
/// flattened block length.
pub struct ForwardModel {
    projection: DMatrix<f64>,
    dct: DMatrix<f64>,
    dct_t: DMatrix<f64>,
}

impl ForwardModel {
    /// Build the model, validating that the matrix width matches `block_len`
    /// (the flattened block length, block_size²).
    pub fn new(projection: ProjectionMatrix, block_len: usize) -> Result<Self, ConfigError> {
        if projection.cols() != block_len {
            return Err(ConfigError::MatrixWidth {
                cols: projection.cols(),
                expected: block_len,
            });
        }
        let dct = dct::dct2_orthonormal(block_len);
        let dct_t = dct.transpose();
        Ok(Self {
            projection: projection.inner,
            dct,
            dct_t,
        })
    }

    /// Measurement length M.
    pub fn measurement_len(&self) -> usize {
        self.projection.nrows()
    }

    /// Flattened block length N.
    pub fn block_len(&self) -> usize {
        self.projection.ncols()
    }

    /// The projection matrix the relaxation solvers invert against.
    pub fn projection(&self) -> &DMatrix<f64> {
        &self.projection
    }

    /// Forward-transform a flattened row-major pattern into its measurement.
    pub fn transform(&self, pattern: &[f64]) -> DVector<f64> {
        let flat = DVector::from_column_slice(pattern);
        &self.projection * (&self.dct * flat)
    }

    /// Map DCT-domain coefficients back to a flattened row-major patch.
    pub fn inverse_flatten(&self, coefficients: &DVector<f64>) -> Vec<f64> {
        let flat = &self.dct_t * coefficients;
        flat.iter().copied().collect()
    }
}

//! Reconstruction pipeline orchestrating per-block recovery.
//!
//! Overview
//! - Validates the projection matrix against the block geometry and the
//!   measurement list against the matrix (fatal [`ConfigError`]s).
//! - Runs the per-block stage: discrete candidate decoding or one of the
//!   continuous relaxation solvers, selected by [`Strategy`].
//! - Assembles the per-block patches into the canvas and optionally
//!   binarizes it under the configured post-processing policy.
//! - Collects per-block diagnostics and stage timings into a
//!   [`ReconstructionReport`].
//!
//! Per-block work is independent: the only shared state is the read-only
//! model and solver, so the loop fans out over a rayon pool when the
//! `parallel` feature is enabled and falls back to a sequential pass
//! otherwise. A block whose relaxation stays infeasible is filled with a
//! neutral mid-tone and reported as unresolved; the run always completes.
//!
//! Typical usage:
//! ```no_run
//! use blocksense::model::ProjectionMatrix;
//! use blocksense::reconstruct::{Reconstructor, RecoverParams};
//! use nalgebra::{DMatrix, DVector};
//!
//! # fn example(matrix: DMatrix<f64>, measurements: Vec<DVector<f64>>)
//! # -> Result<(), blocksense::ConfigError> {
//! let rec = Reconstructor::new(ProjectionMatrix::new(matrix)?, RecoverParams::default())?;
//! let report = rec.reconstruct(&measurements)?;
//! println!("unresolved blocks: {}", report.unresolved);
//! # Ok(())
//! # }
//! ```

mod params;

pub use params::{RecoverParams, Strategy};

use crate::assemble::{assemble, exact_square_side};
use crate::decoder::decode_block;
use crate::diagnostics::{BlockReport, BlockStatus, ReconstructionReport, TimingBreakdown};
use crate::error::ConfigError;
use crate::model::{ForwardModel, ProjectionMatrix};
use crate::postprocess;
use crate::solvers::{build_solver, BlockSolver};
use crate::topology::BlockGeometry;
use log::{debug, warn};
use nalgebra::DVector;
use std::time::Instant;

const NEUTRAL_FILL: f64 = 0.5;

/// End-to-end reconstruction engine over a fixed projection matrix.
pub struct Reconstructor {
    params: RecoverParams,
    model: ForwardModel,
    solver: Option<Box<dyn BlockSolver>>,
}

struct BlockOutcome {
    patch: Vec<f64>,
    report: BlockReport,
}

impl Reconstructor {
    /// Validate the configuration and cache the per-run state (DCT basis,
    /// solver factorization).
    pub fn new(projection: ProjectionMatrix, params: RecoverParams) -> Result<Self, ConfigError> {
        if params.block_size == 0 || params.module_size == 0 {
            return Err(ConfigError::InvalidGeometry {
                block: params.block_size,
                module: params.module_size,
            });
        }
        let block_len = params.block_size * params.block_size;
        let model = ForwardModel::new(projection, block_len)?;
        let solver = params
            .strategy
            .solver_kind()
            .map(|kind| build_solver(kind, model.projection(), &params.solver));
        Ok(Self {
            params,
            model,
            solver,
        })
    }

    /// Reconstruct the full canvas from measurements in raster block order.
    pub fn reconstruct(
        &self,
        measurements: &[DVector<f64>],
    ) -> Result<ReconstructionReport, ConfigError> {
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let blocks_per_side = exact_square_side(measurements.len())
            .ok_or(ConfigError::NonSquareBlockCount(measurements.len()))?;
        let expected = self.model.measurement_len();
        for (index, m) in measurements.iter().enumerate() {
            if m.len() != expected {
                return Err(ConfigError::MeasurementLength {
                    index,
                    len: m.len(),
                    expected,
                });
            }
        }

        let geometry = BlockGeometry {
            block_size: self.params.block_size,
            module_size: self.params.module_size,
            blocks_per_side,
        };
        debug!(
            "reconstructing {}×{} blocks ({} px canvas), strategy {:?}",
            blocks_per_side,
            blocks_per_side,
            geometry.canvas_size(),
            self.params.strategy
        );

        let stage_start = Instant::now();
        let outcomes = self.process_blocks(&geometry, measurements);
        timing.push("blocks", stage_start.elapsed().as_secs_f64() * 1e3);

        let stage_start = Instant::now();
        let (patches, blocks): (Vec<Vec<f64>>, Vec<BlockReport>) = outcomes
            .into_iter()
            .map(|o| (o.patch, o.report))
            .unzip();
        let canvas = assemble(&patches, self.params.block_size)?;
        timing.push("assemble", stage_start.elapsed().as_secs_f64() * 1e3);

        let binary = self.params.postprocess.as_ref().map(|opts| {
            let stage_start = Instant::now();
            let out = postprocess::binarize(&canvas, opts);
            timing.push("postprocess", stage_start.elapsed().as_secs_f64() * 1e3);
            out
        });

        let unresolved = blocks
            .iter()
            .filter(|b| b.status == BlockStatus::Unresolved)
            .count();
        let low_confidence = blocks
            .iter()
            .filter(|b| b.status == BlockStatus::LowConfidence)
            .count();
        timing.total_ms = total_start.elapsed().as_secs_f64() * 1e3;

        Ok(ReconstructionReport {
            canvas,
            binary,
            blocks_per_side,
            blocks,
            unresolved,
            low_confidence,
            timing,
        })
    }

    #[cfg(feature = "parallel")]
    fn process_blocks(
        &self,
        geometry: &BlockGeometry,
        measurements: &[DVector<f64>],
    ) -> Vec<BlockOutcome> {
        use rayon::prelude::*;
        (0..measurements.len())
            .into_par_iter()
            .map(|idx| self.process_block(geometry, idx, &measurements[idx]))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_blocks(
        &self,
        geometry: &BlockGeometry,
        measurements: &[DVector<f64>],
    ) -> Vec<BlockOutcome> {
        measurements
            .iter()
            .enumerate()
            .map(|(idx, m)| self.process_block(geometry, idx, m))
            .collect()
    }

    fn process_block(
        &self,
        geometry: &BlockGeometry,
        index: usize,
        measurement: &DVector<f64>,
    ) -> BlockOutcome {
        let row = index / geometry.blocks_per_side;
        let col = index % geometry.blocks_per_side;

        match &self.solver {
            None => {
                let candidates = geometry.candidate_patterns(row, col);
                let (patch, residual) = decode_block(&self.model, measurement, &candidates);
                let status = if residual <= self.params.decode_tol {
                    BlockStatus::Decoded
                } else {
                    warn!("block ({row},{col}) decode residual {residual:.3e} above tolerance");
                    BlockStatus::LowConfidence
                };
                BlockOutcome {
                    patch,
                    report: BlockReport {
                        row,
                        col,
                        status,
                        residual: Some(residual),
                    },
                }
            }
            Some(solver) => match solver.solve(measurement) {
                Ok(solution) => {
                    let patch = self.model.inverse_flatten(&solution.coefficients);
                    let status = if solution.relaxed {
                        BlockStatus::SolvedRelaxed
                    } else {
                        BlockStatus::Solved
                    };
                    BlockOutcome {
                        patch,
                        report: BlockReport {
                            row,
                            col,
                            status,
                            residual: Some(solution.residual),
                        },
                    }
                }
                Err(err) => {
                    warn!("block ({row},{col}) unresolved: {err}");
                    let len = self.params.block_size * self.params.block_size;
                    BlockOutcome {
                        patch: vec![NEUTRAL_FILL; len],
                        report: BlockReport {
                            row,
                            col,
                            status: BlockStatus::Unresolved,
                            residual: None,
                        },
                    }
                }
            },
        }
    }
}

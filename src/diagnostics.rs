//! Structured, serializable run diagnostics.
//!
//! Per-block outcomes plus a timing breakdown, written as JSON by the demo
//! driver. Canvas buffers are reported separately as images and skipped here.

use crate::image::ImageF64;
use serde::Serialize;

/// Outcome of one block's reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    /// Discrete decode with residual below the tolerance.
    Decoded,
    /// Discrete decode whose residual exceeded the tolerance; the best-seen
    /// candidate is still used.
    LowConfidence,
    /// Relaxation solve satisfied the strict residual bound.
    Solved,
    /// Relaxation solve needed the relaxed bound or a fallback objective.
    SolvedRelaxed,
    /// Relaxation stayed infeasible; the block holds the neutral fill.
    Unresolved,
}

/// Per-block diagnostic record, raster order.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReport {
    pub row: usize,
    pub col: usize,
    pub status: BlockStatus,
    /// Final residual norm; absent for unresolved blocks.
    pub residual: Option<f64>,
}

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Aggregated timing trace for the run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms,
        });
    }
}

/// Full result of a reconstruction run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionReport {
    /// Assembled continuous canvas.
    #[serde(skip)]
    pub canvas: ImageF64,
    /// Binarized canvas, present when post-processing was configured.
    #[serde(skip)]
    pub binary: Option<ImageF64>,
    pub blocks_per_side: usize,
    pub blocks: Vec<BlockReport>,
    /// Blocks left at the neutral fill after an infeasible solve.
    pub unresolved: usize,
    /// Discrete decodes whose residual exceeded the tolerance.
    pub low_confidence: usize,
    pub timing: TimingBreakdown,
}

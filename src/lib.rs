#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod assemble;
pub mod diagnostics;
pub mod image;
pub mod model;
pub mod postprocess;
pub mod reconstruct;

// “Expert” modules – still public, but considered unstable internals.
pub mod config;
pub mod decoder;
pub mod error;
pub mod solvers;
pub mod topology;

// --- High-level re-exports -------------------------------------------------

// Main entry points: reconstructor + report.
pub use crate::diagnostics::{BlockReport, BlockStatus, ReconstructionReport};
pub use crate::error::{ConfigError, SolveError};
pub use crate::model::{ForwardModel, ProjectionMatrix};
pub use crate::reconstruct::{Reconstructor, RecoverParams, Strategy};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::ImageF64;
    pub use crate::model::ProjectionMatrix;
    pub use crate::{ReconstructionReport, Reconstructor, RecoverParams, Strategy};
}

//! Runtime configuration and input loading for the demo driver.
//!
//! The core never touches the filesystem; this module is the external
//! collaborator that reads the JSON config, the projection matrix, and the
//! measurement list before the run starts. Matrix and measurements are plain
//! JSON arrays of rows.

use crate::model::ProjectionMatrix;
use crate::reconstruct::RecoverParams;
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Continuous canvas PNG.
    pub raw_out: Option<PathBuf>,
    /// Binarized canvas PNG.
    pub binary_out: Option<PathBuf>,
    /// Per-block diagnostics JSON.
    pub json_out: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Dense M×N projection matrix, JSON array of rows.
    pub matrix_path: PathBuf,
    /// Length-M measurement vectors in raster block order, JSON array of rows.
    pub measurements_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: RecoverParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

fn load_rows(path: &Path) -> Result<Vec<Vec<f64>>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let rows: Vec<Vec<f64>> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
    Ok(rows)
}

/// Load the projection matrix from a JSON array of equal-length rows.
pub fn load_projection_matrix(path: &Path) -> Result<ProjectionMatrix, String> {
    let rows = load_rows(path)?;
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(format!("Ragged matrix rows in {}", path.display()));
    }
    let mat = DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]);
    ProjectionMatrix::new(mat).map_err(|e| format!("Invalid matrix {}: {e}", path.display()))
}

/// Load the ordered measurement list from a JSON array of rows.
pub fn load_measurements(path: &Path) -> Result<Vec<DVector<f64>>, String> {
    let rows = load_rows(path)?;
    Ok(rows.into_iter().map(DVector::from_vec).collect())
}

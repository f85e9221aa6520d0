//! Canvas assembly from per-block reconstructions.
//!
//! Blocks tile the canvas fully and disjointly, so placement is a straight
//! copy: block (i, j) lands at pixel offset (block_size·i, block_size·j) in
//! raster block order.

use crate::error::ConfigError;
use crate::image::ImageF64;

/// Integer square root if `n` is a perfect square.
pub fn exact_square_side(n: usize) -> Option<usize> {
    let side = (n as f64).sqrt().round() as usize;
    (side * side == n).then_some(side)
}

/// Stitch flattened row-major block patches into the full canvas.
/// Fails iff the block count cannot tile a square.
pub fn assemble(blocks: &[Vec<f64>], block_size: usize) -> Result<ImageF64, ConfigError> {
    let blocks_per_side =
        exact_square_side(blocks.len()).ok_or(ConfigError::NonSquareBlockCount(blocks.len()))?;
    let canvas_size = blocks_per_side * block_size;
    let mut canvas = ImageF64::new(canvas_size, canvas_size);

    for (idx, patch) in blocks.iter().enumerate() {
        debug_assert_eq!(patch.len(), block_size * block_size);
        let bi = idx / blocks_per_side;
        let bj = idx % blocks_per_side;
        for y in 0..block_size {
            for x in 0..block_size {
                canvas.set(bj * block_size + x, bi * block_size + y, patch[y * block_size + x]);
            }
        }
    }
    Ok(canvas)
}

//! Synthetic two-tone inputs for the end-to-end tests.

use blocksense::model::{ForwardModel, ProjectionMatrix};
use blocksense::topology::BlockGeometry;
use nalgebra::{DMatrix, DVector};

/// Deterministic pseudo-random matrix with entries in `[-1, 1)`.
pub fn pseudo_random_matrix(m: usize, n: usize, seed: u64) -> DMatrix<f64> {
    let mut state = seed;
    DMatrix::from_fn(m, n, |_, _| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64 / (1u64 << 31) as f64) - 1.0
    })
}

/// Ground-truth canvas: a module-grid checkerboard, so both tones are always
/// present and module boundaries cut through measurement blocks.
pub fn two_tone_canvas(geometry: &BlockGeometry) -> Vec<f64> {
    let canvas = geometry.canvas_size();
    let module = geometry.module_size;
    (0..canvas * canvas)
        .map(|i| {
            let (x, y) = (i % canvas, i / canvas);
            ((x / module + y / module) % 2) as f64
        })
        .collect()
}

/// Forward-measure every block of the canvas in raster block order.
pub fn measure_canvas(
    model: &ForwardModel,
    geometry: &BlockGeometry,
    canvas: &[f64],
) -> Vec<DVector<f64>> {
    let bs = geometry.block_size;
    let width = geometry.canvas_size();
    let mut measurements = Vec::with_capacity(geometry.blocks_per_side.pow(2));
    for bi in 0..geometry.blocks_per_side {
        for bj in 0..geometry.blocks_per_side {
            let mut pattern = Vec::with_capacity(bs * bs);
            for y in 0..bs {
                for x in 0..bs {
                    pattern.push(canvas[(bi * bs + y) * width + bj * bs + x]);
                }
            }
            measurements.push(model.transform(&pattern));
        }
    }
    measurements
}

/// Convenience: model + geometry + ground truth + measurements in one call.
pub fn synthetic_scene(
    m: usize,
    block_size: usize,
    module_size: usize,
    blocks_per_side: usize,
    seed: u64,
) -> (ForwardModel, BlockGeometry, Vec<f64>, Vec<DVector<f64>>) {
    let n = block_size * block_size;
    let matrix = ProjectionMatrix::new(pseudo_random_matrix(m, n, seed)).unwrap();
    let model = ForwardModel::new(matrix, n).unwrap();
    let geometry = BlockGeometry {
        block_size,
        module_size,
        blocks_per_side,
    };
    let truth = two_tone_canvas(&geometry);
    let measurements = measure_canvas(&model, &geometry, &truth);
    (model, geometry, truth, measurements)
}

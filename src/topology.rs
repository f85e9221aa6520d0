//! Module-grid topology per measurement block.
//!
//! The two-tone image lives on a coarse square-module grid whose boundaries
//! do not align with the 8×8 measurement blocks. Each block therefore
//! intersects a small set of modules (at most four when the block is smaller
//! than a module), and every physically valid two-tone pattern the block can
//! show is one binary coloring of that set.
//!
//! Everything here is a pure function of the grid geometry; no state, no
//! failure modes.

use serde::{Deserialize, Serialize};

/// Geometry of the block grid over the module grid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BlockGeometry {
    /// Measurement block edge in pixels.
    pub block_size: usize,
    /// Module edge in pixels; larger than `block_size` in the intended setup.
    pub module_size: usize,
    /// Blocks per canvas edge.
    pub blocks_per_side: usize,
}

impl BlockGeometry {
    /// Canvas edge in pixels.
    pub fn canvas_size(&self) -> usize {
        self.block_size * self.blocks_per_side
    }

    /// Row stride for module ids. Strictly exceeds the maximum module-column
    /// index for this canvas, so `(row, col)` pairs map to unique ids.
    pub fn module_stride(&self) -> usize {
        self.canvas_size().div_ceil(self.module_size).max(1)
    }

    /// Module id of the absolute pixel (x, y):
    /// `floor(y / module) · stride + floor(x / module)`.
    #[inline]
    pub fn module_id(&self, x: usize, y: usize) -> usize {
        (y / self.module_size) * self.module_stride() + x / self.module_size
    }

    /// Distinct module ids intersecting block (`block_row`, `block_col`),
    /// sorted ascending.
    pub fn resolve(&self, block_row: usize, block_col: usize) -> Vec<usize> {
        let bs = self.block_size;
        let py = block_row * bs;
        let px = block_col * bs;
        let mut ids: Vec<usize> = (0..bs * bs)
            .map(|i| self.module_id(px + i % bs, py + i / bs))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// All 2^k binary colorings of the modules touched by a block, rendered
    /// as flattened row-major patterns. Bit `j` of the enumeration index
    /// colors the j-th id in sorted order, so ordering is deterministic.
    pub fn candidate_patterns(&self, block_row: usize, block_col: usize) -> Vec<Vec<f64>> {
        let bs = self.block_size;
        let py = block_row * bs;
        let px = block_col * bs;
        let ids = self.resolve(block_row, block_col);

        // Per-pixel slot into the sorted id list.
        let slots: Vec<usize> = (0..bs * bs)
            .map(|i| {
                let id = self.module_id(px + i % bs, py + i / bs);
                // ids is sorted and contains every id in the block
                ids.binary_search(&id).unwrap_or(0)
            })
            .collect();

        (0..1usize << ids.len())
            .map(|bits| {
                slots
                    .iter()
                    .map(|&s| ((bits >> s) & 1) as f64)
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(blocks_per_side: usize) -> BlockGeometry {
        BlockGeometry {
            block_size: 8,
            module_size: 10,
            blocks_per_side,
        }
    }

    #[test]
    fn stride_exceeds_max_module_column() {
        for bps in [1, 2, 5, 46] {
            let g = geometry(bps);
            let max_col = (g.canvas_size() - 1) / g.module_size;
            assert!(
                g.module_stride() > max_col,
                "stride {} must exceed max module column {max_col} for bps={bps}",
                g.module_stride()
            );
        }
    }

    #[test]
    fn module_ids_are_unique_across_the_canvas() {
        let g = geometry(3);
        let canvas = g.canvas_size();
        let mut seen = std::collections::HashMap::new();
        for y in 0..canvas {
            for x in 0..canvas {
                let id = g.module_id(x, y);
                let cell = (x / g.module_size, y / g.module_size);
                let prev = seen.insert(id, cell);
                assert!(prev.is_none() || prev == Some(cell), "id {id} collides");
            }
        }
    }

    #[test]
    fn candidate_count_is_two_to_the_k() {
        let g = geometry(6);
        for row in 0..g.blocks_per_side {
            for col in 0..g.blocks_per_side {
                let k = g.resolve(row, col).len();
                assert!((1..=4).contains(&k), "k={k} out of range at ({row},{col})");
                let candidates = g.candidate_patterns(row, col);
                assert_eq!(candidates.len(), 1 << k);
            }
        }
    }

    #[test]
    fn first_block_of_aligned_grid_touches_one_module() {
        // 8-px block fully inside the 10-px module at the origin.
        let g = geometry(2);
        assert_eq!(g.resolve(0, 0), vec![0]);
        let candidates = g.candidate_patterns(0, 0);
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].iter().all(|&v| v == 0.0));
        assert!(candidates[1].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn straddling_block_paints_module_boundaries() {
        // Block (1,1) spans pixels 8..16 on both axes, crossing the module
        // boundary at 10 and touching four modules.
        let g = geometry(2);
        let ids = g.resolve(1, 1);
        assert_eq!(ids.len(), 4);

        let candidates = g.candidate_patterns(1, 1);
        assert_eq!(candidates.len(), 16);
        // Coloring index 1 sets only the smallest id: the top-left module,
        // covering local pixels x<2, y<2.
        let pattern = &candidates[1];
        for y in 0..8 {
            for x in 0..8 {
                let expected = if x < 2 && y < 2 { 1.0 } else { 0.0 };
                assert_eq!(pattern[y * 8 + x], expected, "pixel ({x},{y})");
            }
        }
    }
}

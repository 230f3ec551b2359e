//! Spatial hash grid and proximity-line recompute.
//!
//! Node positions are bucketed into cells of `CONN_DIST` so the proximity
//! pass only tests the 27-cell neighborhood instead of all pairs. The grid
//! is rebuilt from scratch every `RECOMPUTE_EVERY` frames; connections are
//! allowed to lag by that much. The pass degrades by truncation when the
//! line budget fills, never by failing or growing.

use fnv::FnvHashMap;
use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::{CONN_DIST, MAX_LINES};

#[inline]
fn cell_key(cx: i32, cy: i32, cz: i32) -> i32 {
    // Fixed odd-prime XOR hash; collisions only cost extra distance tests.
    (cx.wrapping_mul(73_856_093)) ^ (cy.wrapping_mul(19_349_663)) ^ (cz.wrapping_mul(83_492_791))
}

/// Shared segment buffer with a strict offset protocol: proximity ("tensor")
/// segments occupy `[0, tensor_count)`, interaction segments are appended at
/// `[tensor_count, tensor_count + extra_count)`. The tensor region persists
/// between recomputes; the extra region is rewritten every frame.
pub struct LineBuffer {
    positions: Vec<f32>,
    tensor_count: usize,
    extra_count: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            positions: vec![0.0; MAX_LINES * 6],
            tensor_count: 0,
            extra_count: 0,
        }
    }

    pub fn begin_tensor(&mut self) {
        self.tensor_count = 0;
        self.extra_count = 0;
    }

    pub fn push_tensor(&mut self, a: Vec3, b: Vec3) -> bool {
        if self.tensor_count >= MAX_LINES {
            return false;
        }
        self.write(self.tensor_count, a, b);
        self.tensor_count += 1;
        true
    }

    pub fn begin_extra(&mut self) {
        self.extra_count = 0;
    }

    pub fn push_extra(&mut self, a: Vec3, b: Vec3) -> bool {
        let slot = self.tensor_count + self.extra_count;
        if slot >= MAX_LINES {
            return false;
        }
        self.write(slot, a, b);
        self.extra_count += 1;
        true
    }

    #[inline]
    fn write(&mut self, slot: usize, a: Vec3, b: Vec3) {
        let idx = slot * 6;
        self.positions[idx] = a.x;
        self.positions[idx + 1] = a.y;
        self.positions[idx + 2] = a.z;
        self.positions[idx + 3] = b.x;
        self.positions[idx + 4] = b.y;
        self.positions[idx + 5] = b.z;
    }

    #[inline]
    pub fn tensor_count(&self) -> usize {
        self.tensor_count
    }

    #[inline]
    pub fn extra_count(&self) -> usize {
        self.extra_count
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.tensor_count + self.extra_count
    }

    /// Two vertices per segment; this is the renderer's draw range.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.segment_count() * 2
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn segment(&self, slot: usize) -> (Vec3, Vec3) {
        let idx = slot * 6;
        (
            Vec3::new(
                self.positions[idx],
                self.positions[idx + 1],
                self.positions[idx + 2],
            ),
            Vec3::new(
                self.positions[idx + 3],
                self.positions[idx + 4],
                self.positions[idx + 5],
            ),
        )
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SpatialHashGrid {
    cells: FnvHashMap<i32, SmallVec<[u32; 16]>>,
}

impl SpatialHashGrid {
    pub fn new() -> Self {
        Self {
            cells: FnvHashMap::default(),
        }
    }

    /// Rebuild the grid over the first `node_count` particles and rewrite
    /// the tensor region of `lines` with every pair under the connection
    /// threshold, deduplicated by `j > i` and truncated at the budget.
    pub fn recompute(&mut self, positions: &[f32], node_count: usize, lines: &mut LineBuffer) {
        let inv_cell = 1.0 / CONN_DIST;
        let threshold_sq = CONN_DIST * CONN_DIST;

        self.cells.clear();
        for i in 0..node_count {
            let cx = (positions[i * 3] * inv_cell).floor() as i32;
            let cy = (positions[i * 3 + 1] * inv_cell).floor() as i32;
            let cz = (positions[i * 3 + 2] * inv_cell).floor() as i32;
            self.cells
                .entry(cell_key(cx, cy, cz))
                .or_default()
                .push(i as u32);
        }

        lines.begin_tensor();
        'outer: for i in 0..node_count {
            let ix = positions[i * 3];
            let iy = positions[i * 3 + 1];
            let iz = positions[i * 3 + 2];
            let cx = (ix * inv_cell).floor() as i32;
            let cy = (iy * inv_cell).floor() as i32;
            let cz = (iz * inv_cell).floor() as i32;

            for dcx in -1..=1 {
                for dcy in -1..=1 {
                    for dcz in -1..=1 {
                        let Some(cell) = self.cells.get(&cell_key(cx + dcx, cy + dcy, cz + dcz))
                        else {
                            continue;
                        };
                        for &j in cell {
                            let j = j as usize;
                            if j <= i {
                                continue;
                            }
                            let dx = ix - positions[j * 3];
                            let dy = iy - positions[j * 3 + 1];
                            let dz = iz - positions[j * 3 + 2];
                            if dx * dx + dy * dy + dz * dz < threshold_sq {
                                let a = Vec3::new(ix, iy, iz);
                                let b = Vec3::new(
                                    positions[j * 3],
                                    positions[j * 3 + 1],
                                    positions[j * 3 + 2],
                                );
                                if !lines.push_tensor(a, b) {
                                    break 'outer;
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new()
    }
}

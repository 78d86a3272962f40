//! Sparse cell-partitioned occupancy bitset
//!
//! Answers "is this voxel occupied" in O(1) amortized without allocating a
//! dense bitmap for the whole grid. Space is partitioned into 32^3 cells
//! (32768 bits each) that are created lazily on first write; reads of
//! untouched cells never allocate. The addressable space is 8x8x8 cells,
//! i.e. the engine's fixed 256^3 editing limit.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::UVec3;
use crate::math::morton;

/// Voxels per cell axis
const CELL_DIM_SHIFT: u32 = 5;
/// Bits per cell (32^3)
const CELL_BITS: usize = 32 * 32 * 32;
/// Addressable voxels per axis (8 cells of 32)
const LATTICE_DIM: u32 = 256;

/// Within-cell bit addressing scheme.
///
/// `Morton` trades encode cost for better cache locality on spatially-local
/// query patterns; the two layouts are functionally identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskLayout {
    #[default]
    Linear,
    Morton,
}

/// Sparse occupancy index over a 256^3 voxel lattice
#[derive(Clone, Debug, Default)]
pub struct OccupancyMask {
    layout: MaskLayout,
    cells: Vec<Option<BitBox>>,
}

impl OccupancyMask {
    pub fn new(layout: MaskLayout) -> Self {
        Self {
            layout,
            cells: Vec::new(),
        }
    }

    pub fn layout(&self) -> MaskLayout {
        self.layout
    }

    /// Set the occupancy state of a voxel; returns whether the state
    /// changed. Allocates the containing cell on first touch. Coordinates
    /// beyond the 256^3 lattice are ignored.
    pub fn set(&mut self, coord: UVec3, occupied: bool) -> bool {
        if coord.max_element() >= LATTICE_DIM {
            return false;
        }
        let cell_index = Self::cell_index(coord);
        if cell_index >= self.cells.len() {
            self.cells.resize_with(cell_index + 1, || None);
        }
        let bit = self.bit_index(coord);
        let bits = self.cells[cell_index].get_or_insert_with(|| bitbox![0; CELL_BITS]);

        let was_occupied = bits[bit];
        bits.set(bit, occupied);
        was_occupied != occupied
    }

    /// Occupancy state of a voxel; false for any cell never written
    pub fn get(&self, coord: UVec3) -> bool {
        if coord.max_element() >= LATTICE_DIM {
            return false;
        }
        match self.cells.get(Self::cell_index(coord)) {
            Some(Some(bits)) => bits[self.bit_index(coord)],
            _ => false,
        }
    }

    /// Drop all cells
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    fn cell_index(coord: UVec3) -> usize {
        let quant = coord >> CELL_DIM_SHIFT;
        (quant.x + (quant.y << 3) + (quant.z << 6)) as usize
    }

    fn bit_index(&self, coord: UVec3) -> usize {
        let local = coord & UVec3::splat(31);
        match self.layout {
            MaskLayout::Linear => (local.x + (local.y << 5) + (local.z << 10)) as usize,
            MaskLayout::Morton => morton::encode(local.x, local.y, local.z) as usize,
        }
    }
}

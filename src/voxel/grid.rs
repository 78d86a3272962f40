//! Bounds-checked views over host-owned voxel data
//!
//! The host hands out its dense grid as a plain byte slice; these views pair
//! it with the grid dimensions and keep every access inside the row-major
//! index formula `x + y*dx + z*dx*dy`. The data is only ever reborrowed,
//! never copied.

use crate::core::types::{IVec3, UVec3};
use crate::voxel::coord::{coord_in_dim, icoord_in_dim};

/// Row-major linear index into a grid of dimensions `dim`
pub fn linear_index(dim: UVec3, coord: UVec3) -> usize {
    (coord.x + coord.y * dim.x + coord.z * dim.x * dim.y) as usize
}

/// Read-only grid view
#[derive(Clone, Copy)]
pub struct Grid<'a> {
    dim: UVec3,
    data: &'a [u8],
}

impl<'a> Grid<'a> {
    pub fn new(dim: UVec3, data: &'a [u8]) -> Self {
        debug_assert_eq!(data.len(), (dim.x * dim.y * dim.z) as usize);
        Self { dim, data }
    }

    pub fn dim(&self) -> UVec3 {
        self.dim
    }

    pub fn get(&self, coord: UVec3) -> Option<u8> {
        coord_in_dim(coord, self.dim).then(|| self.data[linear_index(self.dim, coord)])
    }

    /// Signed lookup; anything outside the grid reads as empty
    pub fn sample(&self, coord: IVec3) -> u8 {
        if icoord_in_dim(coord, self.dim) {
            self.data[linear_index(self.dim, coord.as_uvec3())]
        } else {
            0
        }
    }
}

/// Mutable grid view
pub struct GridMut<'a> {
    dim: UVec3,
    data: &'a mut [u8],
}

impl<'a> GridMut<'a> {
    pub fn new(dim: UVec3, data: &'a mut [u8]) -> Self {
        debug_assert_eq!(data.len(), (dim.x * dim.y * dim.z) as usize);
        Self { dim, data }
    }

    pub fn dim(&self) -> UVec3 {
        self.dim
    }

    pub fn get(&self, coord: UVec3) -> Option<u8> {
        coord_in_dim(coord, self.dim).then(|| self.data[linear_index(self.dim, coord)])
    }

    /// Write a voxel; returns false (and does nothing) out of bounds
    pub fn set(&mut self, coord: UVec3, value: u8) -> bool {
        if coord_in_dim(coord, self.dim) {
            self.data[linear_index(self.dim, coord)] = value;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_index() {
        let dim = UVec3::new(4, 4, 4);
        assert_eq!(linear_index(dim, UVec3::new(1, 1, 1)), 21);
        assert_eq!(linear_index(dim, UVec3::new(3, 3, 3)), 63);
    }

    #[test]
    fn test_bounds() {
        let dim = UVec3::new(2, 2, 2);
        let mut data = vec![0u8; 8];
        let mut grid = GridMut::new(dim, &mut data);
        assert!(grid.set(UVec3::new(1, 1, 1), 9));
        assert!(!grid.set(UVec3::new(2, 0, 0), 9));
        assert_eq!(grid.get(UVec3::new(1, 1, 1)), Some(9));
        assert_eq!(grid.get(UVec3::new(0, 2, 0)), None);

        let grid = Grid::new(dim, &data);
        assert_eq!(grid.sample(IVec3::new(1, 1, 1)), 9);
        assert_eq!(grid.sample(IVec3::new(-1, 0, 0)), 0);
        assert_eq!(grid.sample(IVec3::new(0, 0, 2)), 0);
    }
}

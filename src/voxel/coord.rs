//! Voxel coordinates and the 32-bit packed entry encoding

use bytemuck::{Pod, Zeroable};

use crate::core::types::{IVec3, UVec3};

/// Packed voxel entry - exactly 4 bytes: `x | y << 8 | z << 16 | palette << 24`
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PackedVoxel(pub u32);

impl PackedVoxel {
    /// Pack a coordinate and palette index; the caller guarantees the u8
    /// domain, no range checks here
    pub fn pack(x: u8, y: u8, z: u8, palette_index: u8) -> Self {
        Self(x as u32 | (y as u32) << 8 | (z as u32) << 16 | (palette_index as u32) << 24)
    }

    pub fn coord(self) -> UVec3 {
        UVec3::new(self.0 & 0xff, (self.0 >> 8) & 0xff, (self.0 >> 16) & 0xff)
    }

    pub fn palette_index(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// True iff every axis of `coord` lies inside `dim`
pub fn coord_in_dim(coord: UVec3, dim: UVec3) -> bool {
    coord.x < dim.x && coord.y < dim.y && coord.z < dim.z
}

/// Signed variant; negative components are always outside
pub fn icoord_in_dim(coord: IVec3, dim: UVec3) -> bool {
    coord.x >= 0
        && coord.y >= 0
        && coord.z >= 0
        && (coord.x as u32) < dim.x
        && (coord.y as u32) < dim.y
        && (coord.z as u32) < dim.z
}

//! Voxel data structures and operations

pub mod coord;
pub mod face;
pub mod grid;
pub mod mask;
pub mod palette;
pub mod volume;

pub use coord::PackedVoxel;
pub use face::{Face, FaceFlags};
pub use grid::{Grid, GridMut};
pub use mask::{MaskLayout, OccupancyMask};
pub use palette::PaletteRange;
pub use volume::{AxisMask, Neighborhood, RegionGrow, RemoveMode, SparseVolume};

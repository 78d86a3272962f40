//! Host-facing contracts
//!
//! The hosting engine owns the voxel shapes, their transforms, the raycast
//! machinery and debug drawing. The editing core consumes those facilities
//! through the narrow traits below and never assumes anything about their
//! implementation. `host::sim` provides an in-memory implementation used by
//! tests and benches.

pub mod sim;

use crate::core::types::{IVec3, Quat, UVec3, Vec3, Vec4};
use crate::math::ray::Ray;
use crate::voxel::face::FaceFlags;
use crate::voxel::grid::{Grid, GridMut};

/// Stable identity of a host-owned voxel shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

/// Result of a voxel or bounds raycast
#[derive(Clone, Copy, Debug)]
pub struct RaycastHit {
    /// Hit voxel coordinate in grid space
    pub coord: UVec3,
    pub distance: f32,
    /// Surface normal in world space
    pub normal: Vec3,
    /// Surface normal in shape-local space
    pub normal_local: Vec3,
}

/// A host voxel shape: a dense grid of palette indices plus a spatial pose.
///
/// Grid values are 0 for empty and `palette index + 1` otherwise. Dimensions
/// may reach 65535 per axis host-side, but editing addresses at most 256 per
/// axis (coordinates pack into u8).
pub trait VoxelShape {
    fn id(&self) -> ShapeId;
    fn dim(&self) -> UVec3;
    fn voxel_data(&self) -> &[u8];
    fn voxel_data_mut(&mut self) -> &mut [u8];

    /// Queue re-meshing and collision rebuild; fire-and-forget
    fn voxelize(&mut self);
    /// Mark an edit history point for host-side serialization
    fn commit_snapshot(&mut self);

    fn to_world_space(&self, local: Vec3) -> Vec3;
    fn to_local_space(&self, world: Vec3) -> Vec3;
    fn to_local_dir(&self, world_dir: Vec3) -> Vec3;
    /// World position to integer grid coordinate (may be out of bounds)
    fn to_local_coord(&self, world: Vec3) -> IVec3;

    fn world_orientation(&self) -> Quat;
    /// World-space size of a single voxel
    fn voxel_world_size(&self) -> Vec3;

    /// Raycast against the shape's solid voxels
    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit>;
    /// Raycast against the shape's bounding box only
    fn raycast_bounds(&self, ray: &Ray, max_distance: f32, flip_winding: bool)
    -> Option<RaycastHit>;

    /// Bounds-checked read view of the voxel data
    fn grid(&self) -> Grid<'_> {
        Grid::new(self.dim(), self.voxel_data())
    }

    /// Bounds-checked write view of the voxel data
    fn grid_mut(&mut self) -> GridMut<'_> {
        let dim = self.dim();
        GridMut::new(dim, self.voxel_data_mut())
    }
}

/// Palette color lookup; `index` is the 0-based palette entry (the stored
/// grid value minus one)
pub trait Palette {
    fn color(&self, index: u8) -> Vec4;
}

/// Debug geometry sink for tool previews
pub trait DebugDraw {
    fn draw_box(
        &mut self,
        center: Vec3,
        orientation: Quat,
        extent: Vec3,
        color: Vec4,
        always_in_front: bool,
        faces: FaceFlags,
    );

    fn draw_solid_box(
        &mut self,
        center: Vec3,
        orientation: Quat,
        extent: Vec3,
        color: Vec4,
        always_in_front: bool,
        faces: FaceFlags,
    );
}

/// Host-level undo/redo registration point, complementary to the core's own
/// sparse-volume history
pub trait EditorHost {
    fn push_undo_redo_state(&mut self, label: &str, shape: ShapeId, skip_serialization: bool);
}

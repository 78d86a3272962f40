//! Raycast policy shared by the tools
//!
//! Voxel raycast first; in attach mode the hit shifts one voxel along the
//! dominant local normal so placement lands on air next to the hit surface.
//! If that shift leaves the grid, the frame is blocked. Tools that can work
//! without solid geometry fall back to a bounds raycast.

use crate::core::types::{IVec3, Vec3};
use crate::host::{RaycastHit, VoxelShape};
use crate::math::ray::Ray;
use crate::tools::Tool;
use crate::tools::params::{PlacementMode, ToolParams};
use crate::voxel::coord::icoord_in_dim;

pub fn trace_volume<S: VoxelShape>(
    shape: &S,
    ray: &Ray,
    tool: Tool,
    params: &ToolParams,
) -> Option<RaycastHit> {
    let dim = shape.dim();
    let attach = tool == Tool::Modify && params.placement_mode == PlacementMode::Attach;

    let mut hit = shape.raycast(ray, f32::MAX);

    if let Some(h) = hit.as_mut() {
        if attach {
            let normal = h.normal_local;
            let mut coord = h.coord.as_ivec3();
            if normal.x.abs() > 0.1 {
                coord.x += normal.x.signum() as i32;
            } else if normal.y.abs() > 0.1 {
                coord.y += normal.y.signum() as i32;
            } else if normal.z.abs() > 0.1 {
                coord.z += normal.z.signum() as i32;
            }

            if !icoord_in_dim(coord, dim) {
                // Shifted off the grid: block the frame entirely
                return None;
            }
            h.coord = coord.as_uvec3();
        }
        return hit;
    }

    let trace_bounds = attach || tool == Tool::SelectBox;
    if trace_bounds {
        return shape.raycast_bounds(ray, f32::MAX, true);
    }

    None
}

/// Dominant axis (0..3) of a local normal
pub fn dominant_axis(normal: Vec3) -> usize {
    let a = normal.abs();
    if a.y > 0.1 {
        1
    } else if a.z > 0.1 {
        2
    } else {
        0
    }
}

/// Offset one step along a normal's dominant axis
pub fn normal_step(normal: Vec3) -> IVec3 {
    let axis = dominant_axis(normal);
    let mut step = IVec3::ZERO;
    step[axis] = normal[axis].signum() as i32;
    step
}

//! Voxel brush: box or sphere footprints painted under the cursor
//!
//! While the button is held the per-frame footprint accumulates into a
//! paint volume; releasing the button commits the accumulated strokes as
//! one edit.

use crate::core::rng::Rng;
use crate::core::types::{IVec3, UVec3, Vec3};
use crate::edit::selection::commit_change;
use crate::host::{DebugDraw, EditorHost, Palette, RaycastHit, ShapeId, VoxelShape};
use crate::tools::params::{PlacementMode, ToolParams, ToolShape};
use crate::tools::trace::{dominant_axis, trace_volume};
use crate::tools::{Tool, ToolCtx};
use crate::voxel::volume::{RemoveMode, SparseVolume};

#[derive(Default)]
pub struct BrushTool {
    paint: SparseVolume,
    /// Shape the current stroke started on
    shape_id: Option<ShapeId>,
}

impl BrushTool {
    pub fn update<S, P, D, E>(&mut self, ctx: &mut ToolCtx<'_, S, P, D, E>, params: &mut ToolParams)
    where
        S: VoxelShape,
        P: Palette,
        D: DebugDraw,
        E: EditorHost,
    {
        if self.shape_id.is_some_and(|id| id != ctx.shape.id()) {
            return;
        }

        let dim = ctx.shape.dim();
        let mut voxels = params.new_volume();

        if let Some(hit) = trace_volume(ctx.shape, &ctx.input.ray, Tool::Modify, params) {
            let mut rng = Rng::from_coord(hit.coord);
            let density2 = params.density * params.density;

            match params.tool_shape {
                ToolShape::VoxelBox => {
                    stage_box(&mut voxels, &hit, params, &mut rng, density2, dim);
                }
                ToolShape::VoxelSphere => {
                    stage_sphere(&mut voxels, &hit, params, &mut rng, density2, dim);
                }
                // The drag-box footprint is handled by BoxTool
                ToolShape::Box => {}
            }
        }

        let solid_only = matches!(
            params.placement_mode,
            PlacementMode::Paint | PlacementMode::Erase
        );
        voxels.remove_voxels(
            ctx.shape,
            if solid_only {
                RemoveMode::NonSolid
            } else {
                RemoveMode::Solid
            },
        );
        voxels.mirror(ctx.shape, params.mirror_mask());

        if ctx.input.button.is_pressed() {
            self.shape_id = Some(ctx.shape.id());
            self.paint.add(&voxels, dim, IVec3::ZERO);
        } else if !self.paint.is_empty() {
            commit_change(ctx.history, ctx.editor, "Brush Shape", ctx.shape, &self.paint);
            self.paint.clear();
            self.shape_id = None;
        }

        if self.paint.is_empty() {
            voxels.cull_for_draw(ctx.shape);
            voxels.draw(ctx.shape, ctx.palette, ctx.draw, false, false);
        } else {
            self.paint.cull_for_draw(ctx.shape);
            self.paint.draw(ctx.shape, ctx.palette, ctx.draw, true, false);
        }
    }
}

fn brush_value(params: &ToolParams, rng: &mut Rng) -> u8 {
    if params.placement_mode != PlacementMode::Erase {
        params.palette_range.random(rng).wrapping_add(1)
    } else {
        0
    }
}

fn stage_box(
    voxels: &mut SparseVolume,
    hit: &RaycastHit,
    params: &ToolParams,
    rng: &mut Rng,
    density2: f32,
    dim: UVec3,
) {
    let mut offset = hit.coord.as_ivec3();
    let mut extent = IVec3::splat(params.extent);
    let axis = dominant_axis(hit.normal_local);

    if !params.tool_shape_is_3d {
        // Surface-aligned slice: flat along the hit normal, centered on the
        // other two axes
        extent[axis] = 1;
        for other in 0..3 {
            if other != axis {
                offset[other] -= extent[other] / 2;
            }
        }
    } else {
        // Grow away from the surface in attach mode, into it otherwise
        let mut shift = if hit.normal_local[axis] >= 0.0 { 1 } else { 0 };
        if params.placement_mode == PlacementMode::Attach {
            shift = 1 - shift;
        }
        offset[axis] -= shift * (extent[axis] - 1);
        for other in 0..3 {
            if other != axis {
                offset[other] -= extent[other] / 2;
            }
        }
    }

    for z in 0..extent.z {
        for y in 0..extent.y {
            for x in 0..extent.x {
                let r = rng.next_f32(0.0, 1.0);
                if density2 < r {
                    continue;
                }
                let value = brush_value(params, rng);
                voxels.set(offset + IVec3::new(x, y, z), value, dim);
            }
        }
    }
}

fn stage_sphere(
    voxels: &mut SparseVolume,
    hit: &RaycastHit,
    params: &ToolParams,
    rng: &mut Rng,
    density2: f32,
    dim: UVec3,
) {
    let radius = params.extent as f32 * 0.5;
    let coord = hit.coord.as_ivec3();
    let mut extent = IVec3::splat(params.extent);
    let mut offset = IVec3::new(
        (coord.x as f32 - radius).ceil() as i32,
        (coord.y as f32 - radius).ceil() as i32,
        (coord.z as f32 - radius).ceil() as i32,
    );

    if !params.tool_shape_is_3d {
        let axis = dominant_axis(hit.normal_local);
        extent[axis] = 1;
        offset[axis] = coord[axis];
    }

    let radius_final = extent.as_vec3() * 0.5;

    for z in 0..extent.z {
        for y in 0..extent.y {
            for x in 0..extent.x {
                let r = rng.next_f32(0.0, 1.0);
                if density2 < r {
                    continue;
                }

                let rel = (Vec3::new(x as f32, y as f32, z as f32) - radius_final + 0.5) / radius;
                if rel.length() >= 1.0 {
                    continue;
                }

                let value = brush_value(params, rng);
                voxels.set(offset + IVec3::new(x, y, z), value, dim);
            }
        }
    }
}

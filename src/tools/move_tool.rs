//! Move tool: detaches the selection and drags it along a surface axis
//!
//! Pressing on the shape erases the selected voxels (with undo), then the
//! drag follows whichever of two candidate axes lies closer to the mouse
//! ray; releasing re-applies the voxels at the dragged offset.

use crate::core::types::{IVec3, Vec3};
use crate::edit::selection::commit_change;
use crate::host::{DebugDraw, EditorHost, Palette, ShapeId, VoxelShape};
use crate::math::ray::{Ray, closest_point_on_axis, closest_point_on_ray};
use crate::tools::params::ToolParams;
use crate::tools::trace::trace_volume;
use crate::tools::{Tool, ToolCtx};
use crate::voxel::volume::SparseVolume;

#[derive(Default)]
pub struct MoveTool {
    to_move: SparseVolume,
    drag_normal: Vec3,
    drag_tangent: Vec3,
    drag_origin: Vec3,
    dragging: bool,
    shape_id: Option<ShapeId>,
}

impl MoveTool {
    pub fn update<S, P, D, E>(&mut self, ctx: &mut ToolCtx<'_, S, P, D, E>, params: &mut ToolParams)
    where
        S: VoxelShape,
        P: Palette,
        D: DebugDraw,
        E: EditorHost,
    {
        if self.dragging && self.shape_id.is_some_and(|id| id != ctx.shape.id()) {
            return;
        }

        let dim = ctx.shape.dim();

        if let Some(hit) = trace_volume(ctx.shape, &ctx.input.ray, Tool::Move, params) {
            if ctx.input.button.is_pressed() && !self.dragging {
                // Two candidate drag axes across the struck face
                let normal = hit.normal_local;
                if normal.x.abs() > 0.1 {
                    self.drag_normal = Vec3::Y;
                    self.drag_tangent = Vec3::Z;
                } else if normal.y.abs() > 0.1 {
                    self.drag_normal = Vec3::X;
                    self.drag_tangent = Vec3::Z;
                } else {
                    self.drag_normal = Vec3::X;
                    self.drag_tangent = Vec3::Y;
                }
                self.drag_origin = hit.coord.as_vec3() + 0.5;

                // Detach the selection from the grid
                self.to_move = params.new_volume();
                self.to_move.add(&params.selection, dim, IVec3::ZERO);
                self.to_move.update_from_shape(ctx.shape);
                params.selection.clear();

                let change = self.to_move.prepare_erase(ctx.shape);
                commit_change(ctx.history, ctx.editor, "Move Shape", ctx.shape, &change);

                self.dragging = true;
                self.shape_id = Some(ctx.shape.id());
            }
        }

        let mut preview = params.new_volume();

        if self.dragging {
            let ray_local = Ray::new(
                ctx.shape.to_local_space(ctx.input.ray.origin),
                ctx.shape.to_local_dir(ctx.input.ray.direction),
            );

            // Pick the candidate axis closer to the mouse ray
            let on_normal = closest_point_on_axis(&ray_local, self.drag_origin, self.drag_normal);
            let near_normal = closest_point_on_ray(&ray_local, self.drag_origin, self.drag_normal);
            let d_normal = on_normal.distance_squared(near_normal);

            let on_tangent = closest_point_on_axis(&ray_local, self.drag_origin, self.drag_tangent);
            let near_tangent =
                closest_point_on_ray(&ray_local, self.drag_origin, self.drag_tangent);
            let d_tangent = on_tangent.distance_squared(near_tangent);

            let (axis_dir, axis_point) = if d_tangent < d_normal {
                (self.drag_tangent, on_tangent)
            } else {
                (self.drag_normal, on_normal)
            };

            let axis = if axis_dir.y.abs() > 0.1 {
                1
            } else if axis_dir.z.abs() > 0.1 {
                2
            } else {
                0
            };
            let drag = (axis_point[axis] - self.drag_origin[axis]) as i32;

            preview.add(
                &self.to_move,
                dim,
                IVec3::new(
                    (axis_dir.x * drag as f32) as i32,
                    (axis_dir.y * drag as f32) as i32,
                    (axis_dir.z * drag as f32) as i32,
                ),
            );

            if !ctx.input.button.is_pressed() {
                commit_change(ctx.history, ctx.editor, "Move Shape", ctx.shape, &preview);
                params.selection = preview.clone();

                preview.clear();
                self.to_move.clear();
                self.dragging = false;
                self.shape_id = None;
            }
        }

        preview.cull_for_draw(ctx.shape);
        preview.draw(ctx.shape, ctx.palette, ctx.draw, true, false);
    }
}

//! Drag-box tool: paints, erases or selects an axis-aligned box
//!
//! While the button is held the box is recomputed every frame from the
//! anchor voxel and the current hit; releasing commits it to the grid
//! (modify mode) or to the selection (select mode).

use crate::core::rng::Rng;
use crate::core::types::IVec3;
use crate::edit::selection::commit_change;
use crate::host::{DebugDraw, EditorHost, Palette, ShapeId, VoxelShape};
use crate::tools::params::{PlacementMode, ToolParams};
use crate::tools::trace::trace_volume;
use crate::tools::{Tool, ToolCtx};
use crate::voxel::volume::{RemoveMode, SparseVolume};

#[derive(Default)]
pub struct BoxTool {
    volume: SparseVolume,
    box_min: IVec3,
    box_max: IVec3,
    dragging: bool,
    shape_id: Option<ShapeId>,
}

impl BoxTool {
    pub fn update<S, P, D, E>(
        &mut self,
        ctx: &mut ToolCtx<'_, S, P, D, E>,
        params: &mut ToolParams,
        tool: Tool,
    ) where
        S: VoxelShape,
        P: Palette,
        D: DebugDraw,
        E: EditorHost,
    {
        if self.dragging && self.shape_id.is_some_and(|id| id != ctx.shape.id()) {
            return;
        }

        let dim = ctx.shape.dim();
        let is_selection = tool == Tool::SelectBox;
        let should_erase =
            tool == Tool::Modify && params.placement_mode == PlacementMode::Erase;

        if let Some(hit) = trace_volume(ctx.shape, &ctx.input.ray, tool, params) {
            let mut rng = Rng::from_coord(hit.coord);

            if !ctx.input.button.is_pressed() {
                if self.dragging {
                    // Commit last frame's processed box
                    if is_selection {
                        if !ctx.input.shift {
                            params.selection = self.volume.clone();
                        } else {
                            params.selection.add(&self.volume, dim, IVec3::ZERO);
                        }
                    } else {
                        commit_change(
                            ctx.history,
                            ctx.editor,
                            "Box Shape",
                            ctx.shape,
                            &self.volume,
                        );
                    }
                    self.dragging = false;
                    self.shape_id = None;
                }
                self.box_min = hit.coord.as_ivec3();
                self.box_max = self.box_min;
            } else {
                self.dragging = true;
                self.shape_id = Some(ctx.shape.id());
                self.box_max = hit.coord.as_ivec3();
            }

            let min = self.box_min.min(self.box_max);
            let max = self.box_min.max(self.box_max);

            self.volume = params.new_volume();
            for z in min.z..=max.z {
                for y in min.y..=max.y {
                    for x in min.x..=max.x {
                        let value = if !should_erase && !is_selection {
                            params.palette_range.random(&mut rng).wrapping_add(1)
                        } else {
                            0
                        };
                        self.volume.set(IVec3::new(x, y, z), value, dim);
                    }
                }
            }
        } else if is_selection && ctx.input.button.is_clicked() {
            params.selection.clear();
        }

        let solid_only = is_selection
            || (tool == Tool::Modify
                && matches!(
                    params.placement_mode,
                    PlacementMode::Paint | PlacementMode::Erase
                ));

        self.volume.mirror(ctx.shape, params.mirror_mask());
        self.volume.remove_voxels(
            ctx.shape,
            if solid_only {
                RemoveMode::NonSolid
            } else {
                RemoveMode::Solid
            },
        );

        if is_selection {
            self.volume.update_from_shape(ctx.shape);
        }

        self.volume.cull_for_draw(ctx.shape);
        self.volume
            .draw(ctx.shape, ctx.palette, ctx.draw, false, is_selection);
    }
}

//! Eyedropper: picks the palette index of the voxel under the cursor

use crate::host::{DebugDraw, EditorHost, Palette, VoxelShape};
use crate::tools::params::ToolParams;
use crate::tools::trace::trace_volume;
use crate::tools::{Tool, ToolCtx};
use crate::voxel::palette::PaletteRange;

#[derive(Default)]
pub struct EyedropperTool;

impl EyedropperTool {
    pub fn update<S, P, D, E>(&mut self, ctx: &mut ToolCtx<'_, S, P, D, E>, params: &mut ToolParams)
    where
        S: VoxelShape,
        P: Palette,
        D: DebugDraw,
        E: EditorHost,
    {
        let dim = ctx.shape.dim();
        let mut voxels = params.new_volume();

        if let Some(hit) = trace_volume(ctx.shape, &ctx.input.ray, Tool::Eyedropper, params) {
            voxels.set(hit.coord.as_ivec3(), 0, dim);
            voxels.update_from_shape(ctx.shape);

            if ctx.input.button.is_clicked() {
                if let Some(entry) = voxels.entries().first() {
                    let value = entry.voxel.palette_index();
                    params.palette_range = PaletteRange::single(value.wrapping_sub(1));
                }
            }
        }

        voxels.cull_for_draw(ctx.shape);
        voxels.draw(ctx.shape, ctx.palette, ctx.draw, false, true);
    }
}

//! Wand select: picks a connected region or every voxel of a color

use crate::core::types::IVec3;
use crate::host::{DebugDraw, EditorHost, Palette, VoxelShape};
use crate::tools::params::{RegionMatch, ToolParams};
use crate::tools::trace::trace_volume;
use crate::tools::{Tool, ToolCtx};
use crate::voxel::volume::RegionGrow;

#[derive(Default)]
pub struct WandTool;

impl WandTool {
    pub fn update<S, P, D, E>(&mut self, ctx: &mut ToolCtx<'_, S, P, D, E>, params: &mut ToolParams)
    where
        S: VoxelShape,
        P: Palette,
        D: DebugDraw,
        E: EditorHost,
    {
        let dim = ctx.shape.dim();
        let mut voxels = params.new_volume();

        if let Some(hit) = trace_volume(ctx.shape, &ctx.input.ray, Tool::SelectWand, params) {
            match params.region_match {
                RegionMatch::Color => {
                    voxels.add_by_palette_index(ctx.shape, hit.coord);
                }
                RegionMatch::Region | RegionMatch::RegionColor => {
                    voxels.add_region(
                        ctx.shape,
                        ctx.palette,
                        hit.coord,
                        &RegionGrow {
                            neighborhood: params.region_neighborhood,
                            match_color: params.region_match == RegionMatch::RegionColor,
                            fuzziness: params.region_fuzziness,
                            ..Default::default()
                        },
                    );
                }
            }

            if ctx.input.button.is_clicked() {
                if !ctx.input.shift {
                    params.selection = voxels.clone();
                } else {
                    params.selection.add(&voxels, dim, IVec3::ZERO);
                }
            }
        } else if ctx.input.button.is_clicked() {
            params.selection.clear();
        }

        voxels.cull_for_draw(ctx.shape);
        voxels.draw(ctx.shape, ctx.palette, ctx.draw, false, true);
    }
}

//! Extrude and grass: drag a flood-filled face cap along its normal
//!
//! On the first hit the connected region of the struck face is captured as
//! the cap; while dragging, the mouse ray projects onto the locked axis to
//! derive an integer step count, and the strategy stamps the cap per step.

use crate::core::rng::Rng;
use crate::core::types::{IVec3, UVec3, Vec3};
use crate::edit::selection::commit_change;
use crate::host::{DebugDraw, EditorHost, Palette, ShapeId, VoxelShape};
use crate::math::ray::{Ray, closest_point_on_axis};
use crate::tools::params::{FaceMatch, PlacementMode, ToolParams};
use crate::tools::trace::{dominant_axis, normal_step, trace_volume};
use crate::tools::{Tool, ToolCtx};
use crate::voxel::volume::{AxisMask, RegionGrow, RemoveMode, SparseVolume};

/// Per-step stamping behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtrudeStrategy {
    /// Copy the whole cap at every step
    Extrude,
    /// Per seed voxel: density-gated column with random height attenuation
    Grass,
}

#[derive(Default)]
pub struct ExtrudeTool {
    cap: SparseVolume,
    extruded: SparseVolume,
    drag_normal: Vec3,
    drag_origin: Vec3,
    seed_coord: UVec3,
    dragging: bool,
    shape_id: Option<ShapeId>,
}

impl ExtrudeTool {
    pub fn update<S, P, D, E>(
        &mut self,
        ctx: &mut ToolCtx<'_, S, P, D, E>,
        params: &mut ToolParams,
        strategy: ExtrudeStrategy,
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
        let tool = match strategy {
            ExtrudeStrategy::Extrude => Tool::Extrude,
            ExtrudeStrategy::Grass => Tool::Grass,
        };

        if let Some(hit) = trace_volume(ctx.shape, &ctx.input.ray, tool, params) {
            if !self.dragging {
                // Capture the cap: the struck face's connected region,
                // excluding growth along the face normal
                let axis = dominant_axis(hit.normal_local);

                self.cap = params.new_volume();
                self.cap.add_region(
                    ctx.shape,
                    ctx.palette,
                    hit.coord,
                    &RegionGrow {
                        neighborhood: params.face_neighborhood,
                        axes: AxisMask::ALL.without_axis(axis),
                        exclude_dir: normal_step(hit.normal_local),
                        match_color: params.face_match == FaceMatch::RegionColor,
                        fuzziness: params.face_fuzziness,
                    },
                );
                if params.face_palette_fill {
                    let mut rng = Rng::from_coord(hit.coord);
                    self.cap =
                        self.cap
                            .prepare_fill(ctx.shape, &params.palette_range, &mut rng, true);
                }

                self.drag_normal = hit.normal_local;
                if matches!(
                    params.placement_mode,
                    PlacementMode::Erase | PlacementMode::Paint
                ) {
                    // Erase and paint drag into the surface
                    self.drag_normal = -self.drag_normal;
                }
                self.drag_origin = hit.coord.as_vec3() + 0.5;
                self.seed_coord = hit.coord;

                if ctx.input.button.is_pressed() {
                    self.dragging = true;
                    self.shape_id = Some(ctx.shape.id());
                }
            }
        } else if !self.dragging {
            self.cap.clear();
        }

        if self.dragging {
            let ray_local = Ray::new(
                ctx.shape.to_local_space(ctx.input.ray.origin),
                ctx.shape.to_local_dir(ctx.input.ray.direction),
            );

            let axis = dominant_axis(self.drag_normal);
            let axis_sign = self.drag_normal[axis].signum() as i32;

            let picked = closest_point_on_axis(&ray_local, self.drag_origin, self.drag_normal);
            let drag = (picked[axis] - self.drag_origin[axis]) as i32;
            let num_steps = if axis_sign > 0 {
                drag.max(0)
            } else {
                -(drag.min(0))
            } as u32;
            let skip_self = (params.placement_mode == PlacementMode::Attach) as i32;

            let mut rng = Rng::from_coord(self.seed_coord);
            self.extruded = params.new_volume();
            match strategy {
                ExtrudeStrategy::Extrude => {
                    for i in 0..num_steps {
                        let mut offset = IVec3::ZERO;
                        offset[axis] = axis_sign * i as i32 + skip_self * axis_sign;
                        self.extruded.add(&self.cap, dim, offset);
                    }
                }
                ExtrudeStrategy::Grass => {
                    if num_steps >= 1 {
                        for entry in self.cap.entries() {
                            let coord = entry.voxel.coord();
                            let mut value = entry.voxel.palette_index();

                            let keep = rng.next_f32(0.0, 1.0);
                            let height = rng.next_f32(0.0, 1.0);
                            if params.face_palette_fill {
                                value = params.palette_range.random(&mut rng).wrapping_add(1);
                            }
                            if keep > params.grass_density {
                                continue;
                            }

                            let steps = ((num_steps - 1) as f32 * height) as u32 + 1;
                            for i in 0..steps {
                                let mut blade = coord.as_ivec3();
                                blade[axis] += axis_sign * i as i32 + skip_self * axis_sign;
                                self.extruded.set(blade, value, dim);
                            }
                        }
                    }
                }
            }

            self.extruded.mirror(ctx.shape, params.mirror_mask());

            match params.placement_mode {
                PlacementMode::Erase => {
                    self.extruded = self.extruded.prepare_erase(ctx.shape);
                }
                PlacementMode::Paint => {
                    self.extruded = self.extruded.prepare_fill(
                        ctx.shape,
                        &params.palette_range,
                        &mut rng,
                        false,
                    );
                    self.extruded.remove_voxels(ctx.shape, RemoveMode::NonSolid);
                }
                PlacementMode::Attach => {}
            }

            if !ctx.input.button.is_pressed() {
                commit_change(
                    ctx.history,
                    ctx.editor,
                    "Extrude Shape",
                    ctx.shape,
                    &self.extruded,
                );
                self.extruded.clear();
                self.cap.clear();
                self.dragging = false;
                self.shape_id = None;
            }
        }

        let mut cap_preview = self.cap.clone();
        cap_preview.mirror(ctx.shape, params.mirror_mask());
        cap_preview.cull_for_draw(ctx.shape);
        cap_preview.draw(ctx.shape, ctx.palette, ctx.draw, false, true);

        self.extruded.cull_for_draw(ctx.shape);
        self.extruded
            .draw(ctx.shape, ctx.palette, ctx.draw, true, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{ButtonState, FrameInput};
    use crate::edit::undo::UndoRedoRegistry;
    use crate::host::sim::{DrawLog, SimEditor, SimPalette, SimShape};

    struct Fixture {
        shape: SimShape,
        palette: SimPalette,
        draw: DrawLog,
        editor: SimEditor,
        history: UndoRedoRegistry,
    }

    impl Fixture {
        /// 5x5 floor plate of value 2 at y=0
        fn with_plate() -> Self {
            let mut shape = SimShape::new(1, UVec3::new(8, 8, 8));
            for z in 0..5 {
                for x in 0..5 {
                    shape.set_voxel(UVec3::new(x, 0, z), 2);
                }
            }
            Self {
                shape,
                palette: SimPalette::grayscale(),
                draw: DrawLog::new(),
                editor: SimEditor::new(),
                history: UndoRedoRegistry::new(),
            }
        }

        fn run(
            &mut self,
            tool: &mut ExtrudeTool,
            params: &mut ToolParams,
            strategy: ExtrudeStrategy,
            button: ButtonState,
            ray: Ray,
        ) {
            let mut ctx = ToolCtx {
                shape: &mut self.shape,
                palette: &self.palette,
                draw: &mut self.draw,
                editor: &mut self.editor,
                history: &mut self.history,
                input: FrameInput::new(button, false, ray),
            };
            tool.update(&mut ctx, params, strategy);
        }
    }

    /// Ray straight down onto the plate at (x, z)
    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 20.0, z), Vec3::NEG_Y)
    }

    /// Horizontal ray crossing the drag axis at height y
    fn level_ray(y: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(50.0, y, z), Vec3::NEG_X)
    }

    #[test]
    fn test_extrude_two_steps_copies_plate() {
        let mut fx = Fixture::with_plate();
        let mut tool = ExtrudeTool::default();
        let mut params = ToolParams::default();

        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Clicked, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Pressed, down_ray(2.5, 2.5));
        // Drag up to y=2.5: two steps above the hit at (2,0,2)
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Pressed, level_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Released, level_ray(2.5, 2.5));

        // 25 plate voxels copied at y=1 and y=2 (attach skips the cap row)
        assert_eq!(fx.shape.solid_count(), 75);
        for z in 0..5 {
            for x in 0..5 {
                assert_eq!(fx.shape.voxel(UVec3::new(x, 1, z)), 2);
                assert_eq!(fx.shape.voxel(UVec3::new(x, 2, z)), 2);
            }
        }
        assert_eq!(fx.editor.states.len(), 1);
    }

    #[test]
    fn test_zero_length_drag_still_commits() {
        let mut fx = Fixture::with_plate();
        let mut tool = ExtrudeTool::default();
        let mut params = ToolParams::default();

        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Clicked, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Pressed, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Released, down_ray(2.5, 2.5));

        // Empty change committed; grid unchanged but history recorded
        assert_eq!(fx.shape.solid_count(), 25);
        assert_eq!(fx.editor.states.len(), 1);
    }

    #[test]
    fn test_extrude_erase_digs_down() {
        let mut fx = Fixture::with_plate();
        // A 1x1 tower at (2, 1..5, 2)
        for y in 1..5 {
            fx.shape.set_voxel(UVec3::new(2, y, 2), 3);
        }
        let mut tool = ExtrudeTool::default();
        let mut params = ToolParams::default();
        params.placement_mode = PlacementMode::Erase;

        // Hit the tower top (2,4,2); erase flips the drag downward
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Clicked, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Pressed, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Pressed, level_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Released, level_ray(2.5, 2.5));

        // Two steps down from the top: (2,4,2) and (2,3,2) erased
        assert_eq!(fx.shape.voxel(UVec3::new(2, 4, 2)), 0);
        assert_eq!(fx.shape.voxel(UVec3::new(2, 3, 2)), 0);
        assert_eq!(fx.shape.voxel(UVec3::new(2, 2, 2)), 3);
        assert_eq!(fx.shape.voxel(UVec3::new(2, 1, 2)), 3);
    }

    #[test]
    fn test_grass_full_density_covers_plate() {
        let mut fx = Fixture::with_plate();
        let mut tool = ExtrudeTool::default();
        let mut params = ToolParams::default();
        params.grass_density = 1.0;

        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Clicked, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Pressed, down_ray(2.5, 2.5));
        // Drag up to three steps
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Pressed, level_ray(3.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Released, level_ray(3.5, 2.5));

        // Every plate voxel grows a blade of height 1..=3 directly above
        let grown = fx.shape.solid_count() - 25;
        assert!(grown >= 25, "every seed grows at least one voxel");
        assert!(grown <= 75);
        for z in 0..5 {
            for x in 0..5 {
                assert_eq!(fx.shape.voxel(UVec3::new(x, 1, z)), 2);
            }
        }
    }

    #[test]
    fn test_grass_zero_density_grows_nothing() {
        let mut fx = Fixture::with_plate();
        let mut tool = ExtrudeTool::default();
        let mut params = ToolParams::default();
        params.grass_density = 0.0;

        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Clicked, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Pressed, down_ray(2.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Pressed, level_ray(3.5, 2.5));
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Grass, ButtonState::Released, level_ray(3.5, 2.5));

        assert_eq!(fx.shape.solid_count(), 25);
    }

    #[test]
    fn test_cap_captures_struck_face_region() {
        let mut fx = Fixture::with_plate();
        let mut tool = ExtrudeTool::default();
        let mut params = ToolParams::default();

        // Hover only: the cap covers the whole uncovered plate
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Released, down_ray(2.5, 2.5));
        assert_eq!(tool.cap.len(), 25);

        // A miss while not dragging clears the cap
        fx.run(&mut tool, &mut params, ExtrudeStrategy::Extrude, ButtonState::Released, down_ray(50.0, 50.0));
        assert!(tool.cap.is_empty());
    }
}

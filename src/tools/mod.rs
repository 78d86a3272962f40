//! Interactive editing tools
//!
//! Each tool is an explicit per-frame state machine driven by mouse-button
//! edge events and a raycast against the target shape. Tool state lives in
//! the [`ToolSet`] owned by the editor session - never in globals - and a
//! drag stays bound to the shape it started on.

pub mod params;
pub mod trace;
pub mod brush;
pub mod box_tool;
pub mod wand;
pub mod extrude;
pub mod move_tool;
pub mod eyedropper;

pub use params::{FaceMatch, PlacementMode, RegionMatch, ToolParams, ToolShape};

use crate::core::config::EditorConfig;
use crate::core::input::FrameInput;
use crate::edit::undo::UndoRedoRegistry;
use crate::host::{DebugDraw, EditorHost, Palette, VoxelShape};

use brush::BrushTool;
use box_tool::BoxTool;
use extrude::{ExtrudeStrategy, ExtrudeTool};
use eyedropper::EyedropperTool;
use move_tool::MoveTool;
use wand::WandTool;

/// The active editing tool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Modify,
    Extrude,
    Eyedropper,
    Move,
    Grass,
    SelectBox,
    SelectWand,
}

impl Tool {
    pub fn is_select(self) -> bool {
        matches!(self, Tool::SelectBox | Tool::SelectWand)
    }
}

/// Host services and input for one tool tick
pub struct ToolCtx<'a, S, P, D, E>
where
    S: VoxelShape,
    P: Palette,
    D: DebugDraw,
    E: EditorHost,
{
    pub shape: &'a mut S,
    pub palette: &'a P,
    pub draw: &'a mut D,
    pub editor: &'a mut E,
    pub history: &'a mut UndoRedoRegistry,
    pub input: FrameInput,
}

/// All tool state machines plus the shared parameters
#[derive(Default)]
pub struct ToolSet {
    pub active: Tool,
    pub params: ToolParams,
    brush: BrushTool,
    box_tool: BoxTool,
    wand: WandTool,
    extrude: ExtrudeTool,
    mover: MoveTool,
    eyedropper: EyedropperTool,
}

impl ToolSet {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            params: ToolParams::from_config(config),
            ..Default::default()
        }
    }

    /// Run the active tool for one frame
    pub fn update<S, P, D, E>(&mut self, ctx: &mut ToolCtx<'_, S, P, D, E>)
    where
        S: VoxelShape,
        P: Palette,
        D: DebugDraw,
        E: EditorHost,
    {
        match self.active {
            Tool::Modify => {
                if self.params.tool_shape == ToolShape::Box {
                    self.box_tool.update(ctx, &mut self.params, Tool::Modify);
                } else {
                    self.brush.update(ctx, &mut self.params);
                }
            }
            Tool::Extrude => {
                self.extrude
                    .update(ctx, &mut self.params, ExtrudeStrategy::Extrude);
            }
            Tool::Grass => {
                self.extrude
                    .update(ctx, &mut self.params, ExtrudeStrategy::Grass);
            }
            Tool::Eyedropper => self.eyedropper.update(ctx, &mut self.params),
            Tool::Move => self.mover.update(ctx, &mut self.params),
            Tool::SelectBox => {
                self.box_tool.update(ctx, &mut self.params, Tool::SelectBox);
            }
            Tool::SelectWand => self.wand.update(ctx, &mut self.params),
        }

        // The current selection is always shown on top of the active tool
        if !self.params.selection.is_empty() {
            self.params.selection.cull_for_draw(ctx.shape);
            self.params
                .selection
                .draw(ctx.shape, ctx.palette, ctx.draw, false, true);
        }
    }
}

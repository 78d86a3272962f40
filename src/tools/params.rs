//! Tool parameters shared by all editing tools

use crate::core::config::EditorConfig;
use crate::voxel::mask::MaskLayout;
use crate::voxel::palette::PaletteRange;
use crate::voxel::volume::{AxisMask, Neighborhood, SparseVolume};

/// How staged voxels interact with the existing grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlacementMode {
    /// Place new voxels onto surfaces; existing solids are untouched
    #[default]
    Attach,
    /// Recolor existing solids only
    Paint,
    /// Remove existing solids only
    Erase,
}

/// Footprint of the modify tool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolShape {
    /// Drag-defined box
    Box,
    /// Cursor-centered box of `extent` voxels
    #[default]
    VoxelBox,
    /// Cursor-centered sphere of `extent` voxels
    VoxelSphere,
}

/// What the wand selects
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionMatch {
    /// Every voxel of the seed's color, grid-wide
    Color,
    /// The connected region under the cursor
    #[default]
    Region,
    /// The connected region restricted to the seed's color
    RegionColor,
}

/// What the extrude tools flood-fill as the cap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceMatch {
    #[default]
    Region,
    RegionColor,
}

/// Mutable state shared by the tools for one editing session
#[derive(Clone, Debug)]
pub struct ToolParams {
    /// Footprint size in voxels
    pub extent: i32,
    /// Per-voxel keep probability for the modify tool, squared before use
    pub density: f32,
    pub placement_mode: PlacementMode,
    pub tool_shape: ToolShape,
    /// Full 3D footprint versus a surface-aligned slice
    pub tool_shape_is_3d: bool,

    pub region_neighborhood: Neighborhood,
    pub region_match: RegionMatch,
    pub region_fuzziness: f32,

    pub face_neighborhood: Neighborhood,
    pub face_match: FaceMatch,
    /// Repaint the extruded cap from the palette range instead of copying
    /// its colors
    pub face_palette_fill: bool,
    pub face_fuzziness: f32,

    pub palette_range: PaletteRange,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub mirror_z: bool,

    pub selection: SparseVolume,
    pub clipboard: SparseVolume,

    /// Per-seed keep probability for the grass tool
    pub grass_density: f32,
    /// Occupancy layout for volumes the tools create
    pub mask_layout: MaskLayout,
}

impl Default for ToolParams {
    fn default() -> Self {
        Self {
            extent: 1,
            density: 1.0,
            placement_mode: PlacementMode::Attach,
            tool_shape: ToolShape::VoxelBox,
            tool_shape_is_3d: true,
            region_neighborhood: Neighborhood::Faces,
            region_match: RegionMatch::Region,
            region_fuzziness: 0.0,
            face_neighborhood: Neighborhood::Faces,
            face_match: FaceMatch::Region,
            face_palette_fill: false,
            face_fuzziness: 0.0,
            palette_range: PaletteRange::default(),
            mirror_x: false,
            mirror_y: false,
            mirror_z: false,
            selection: SparseVolume::default(),
            clipboard: SparseVolume::default(),
            grass_density: 0.25,
            mask_layout: MaskLayout::Linear,
        }
    }
}

impl ToolParams {
    /// Seed tool defaults from the editor configuration
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            region_neighborhood: config.region_neighborhood,
            region_fuzziness: config.region_fuzziness,
            grass_density: config.grass_density,
            mask_layout: config.mask_layout,
            ..Default::default()
        }
    }

    pub fn mirror_mask(&self) -> AxisMask {
        AxisMask::from_flags(self.mirror_x, self.mirror_y, self.mirror_z)
    }

    /// Fresh staging volume with the configured occupancy layout
    pub fn new_volume(&self) -> SparseVolume {
        SparseVolume::with_layout(self.mask_layout)
    }
}

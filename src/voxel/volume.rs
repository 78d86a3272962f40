//! Sparse volume: the deduplicating change-set over a voxel grid
//!
//! A `SparseVolume` stages the voxels an editing gesture intends to write:
//! an insertion-ordered entry list plus an occupancy mask enforcing at most
//! one entry per coordinate. The first insertion for a coordinate wins;
//! later writes to the same coordinate are dropped. Volumes are transient -
//! built per gesture, previewed via the debug-draw contract, diffed against
//! the live grid for undo, then applied.

use log::debug;

use crate::core::rng::Rng;
use crate::core::types::{IVec3, UVec3, Vec4};
use crate::host::{DebugDraw, Palette, VoxelShape};
use crate::voxel::coord::{PackedVoxel, coord_in_dim, icoord_in_dim};
use crate::voxel::face::{Face, FaceFlags};
use crate::voxel::grid::linear_index;
use crate::voxel::mask::{MaskLayout, OccupancyMask};
use crate::voxel::palette::PaletteRange;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// Editing addresses at most 256 voxels per axis (coordinates pack into u8)
pub const MAX_EDIT_DIM: u32 = 256;

/// Bitmask of the three coordinate axes (bit 0 = x, bit 1 = y, bit 2 = z)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisMask(pub u8);

impl AxisMask {
    pub const NONE: AxisMask = AxisMask(0);
    pub const X: AxisMask = AxisMask(1);
    pub const Y: AxisMask = AxisMask(2);
    pub const Z: AxisMask = AxisMask(4);
    pub const ALL: AxisMask = AxisMask(7);

    pub fn from_flags(x: bool, y: bool, z: bool) -> Self {
        AxisMask(x as u8 | (y as u8) << 1 | (z as u8) << 2)
    }

    pub fn contains_axis(self, axis: usize) -> bool {
        self.0 & (1 << axis) != 0
    }

    pub fn without_axis(self, axis: usize) -> Self {
        AxisMask(self.0 & !(1 << axis))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Voxel connectivity model for region growing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// Face-adjacent only (6 neighbors)
    #[default]
    Faces,
    /// Face- and edge-adjacent (18 neighbors)
    FacesEdges,
    /// Face-, edge- and corner-adjacent (26 neighbors)
    FacesEdgesCorners,
}

/// Parameters for [`SparseVolume::add_region`]
#[derive(Clone, Copy, Debug)]
pub struct RegionGrow {
    pub neighborhood: Neighborhood,
    /// Axes traversal may move along; edge/corner steps require every axis
    /// they touch to be enabled
    pub axes: AxisMask,
    /// If nonzero, expansion stops at any voxel with a solid neighbor in
    /// this direction
    pub exclude_dir: IVec3,
    /// Restrict membership to voxels matching the seed's color
    pub match_color: bool,
    /// 0 = exact palette index match; otherwise squared-distance threshold
    /// in palette color space
    pub fuzziness: f32,
}

impl Default for RegionGrow {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::Faces,
            axes: AxisMask::ALL,
            exclude_dir: IVec3::ZERO,
            match_color: false,
            fuzziness: 0.0,
        }
    }
}

/// Which entries [`SparseVolume::remove_voxels`] drops
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveMode {
    /// Drop entries over empty grid voxels (keep only pre-existing solids)
    NonSolid,
    /// Drop entries over solid grid voxels (keep only placements into air)
    Solid,
}

/// One staged voxel edit
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub voxel: PackedVoxel,
    /// Exposed faces as of the last `cull_for_draw`
    pub faces: FaceFlags,
}

/// All 26 neighbor offsets with the axis bits each step requires. Faces
/// first, then the 12 edge diagonals, then the 8 corner diagonals.
static NEIGHBOR_OFFSETS: [(IVec3, u8); 26] = [
    (IVec3::new(1, 0, 0), 0b001),
    (IVec3::new(-1, 0, 0), 0b001),
    (IVec3::new(0, 1, 0), 0b010),
    (IVec3::new(0, -1, 0), 0b010),
    (IVec3::new(0, 0, 1), 0b100),
    (IVec3::new(0, 0, -1), 0b100),
    (IVec3::new(1, 1, 0), 0b011),
    (IVec3::new(-1, -1, 0), 0b011),
    (IVec3::new(1, -1, 0), 0b011),
    (IVec3::new(-1, 1, 0), 0b011),
    (IVec3::new(1, 0, 1), 0b101),
    (IVec3::new(-1, 0, -1), 0b101),
    (IVec3::new(1, 0, -1), 0b101),
    (IVec3::new(-1, 0, 1), 0b101),
    (IVec3::new(0, 1, 1), 0b110),
    (IVec3::new(0, -1, -1), 0b110),
    (IVec3::new(0, 1, -1), 0b110),
    (IVec3::new(0, -1, 1), 0b110),
    (IVec3::new(1, 1, 1), 0b111),
    (IVec3::new(-1, -1, -1), 0b111),
    (IVec3::new(1, 1, -1), 0b111),
    (IVec3::new(-1, -1, 1), 0b111),
    (IVec3::new(1, -1, 1), 0b111),
    (IVec3::new(-1, 1, -1), 0b111),
    (IVec3::new(-1, 1, 1), 0b111),
    (IVec3::new(1, -1, -1), 0b111),
];

fn neighbor_offsets(neighborhood: Neighborhood) -> &'static [(IVec3, u8)] {
    match neighborhood {
        Neighborhood::Faces => &NEIGHBOR_OFFSETS[..6],
        Neighborhood::FacesEdges => &NEIGHBOR_OFFSETS[..18],
        Neighborhood::FacesEdgesCorners => &NEIGHBOR_OFFSETS,
    }
}

/// Deduplicating, insertion-ordered set of voxel edits
#[derive(Clone, Debug, Default)]
pub struct SparseVolume {
    entries: Vec<Entry>,
    occupancy: OccupancyMask,
}

impl SparseVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volume whose occupancy mask uses the given in-cell layout
    pub fn with_layout(layout: MaskLayout) -> Self {
        Self {
            entries: Vec::new(),
            occupancy: OccupancyMask::new(layout),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.occupancy.clear();
    }

    /// Whether the volume holds an entry for `coord`
    pub fn contains(&self, coord: UVec3) -> bool {
        self.occupancy.get(coord)
    }

    /// Stage a voxel write. Out-of-range coordinates are dropped silently;
    /// a coordinate already present keeps its first value.
    pub fn set(&mut self, coord: IVec3, palette_index: u8, dim: UVec3) {
        let dim = dim.min(UVec3::splat(MAX_EDIT_DIM));
        if !icoord_in_dim(coord, dim) {
            return;
        }

        // First insertion for a coordinate wins
        if !self.occupancy.set(coord.as_uvec3(), true) {
            return;
        }

        self.entries.push(Entry {
            voxel: PackedVoxel::pack(
                coord.x as u8,
                coord.y as u8,
                coord.z as u8,
                palette_index,
            ),
            faces: FaceFlags::ALL,
        });
    }

    /// Stage every entry of `other`, translated by `offset`, subject to the
    /// same clamp and dedup rules
    pub fn add(&mut self, other: &SparseVolume, dim: UVec3, offset: IVec3) {
        for e in &other.entries {
            let coord = e.voxel.coord().as_ivec3() + offset;
            self.set(coord, e.voxel.palette_index(), dim);
        }
    }

    /// Reflect the staged voxels about the grid's center plane on each
    /// requested axis. Axes apply in sequence over a snapshot taken at the
    /// start of each pass, so an X+Y mirror produces the full 4-way set.
    pub fn mirror<S: VoxelShape>(&mut self, shape: &S, axes: AxisMask) {
        if axes.is_empty() {
            return;
        }

        let dim = shape.dim();
        let center = dim.as_vec3() * 0.5;

        for axis in 0..3 {
            if !axes.contains_axis(axis) {
                continue;
            }

            let snapshot = self.entries.clone();
            for e in snapshot {
                let coord = e.voxel.coord();
                let coord_f = coord.as_vec3() + 0.5;

                let mut mirrored = coord_f;
                mirrored[axis] = center[axis] - (coord_f[axis] - center[axis]);

                self.set(
                    IVec3::new(mirrored.x as i32, mirrored.y as i32, mirrored.z as i32),
                    e.voxel.palette_index(),
                    dim,
                );
            }
        }
    }

    /// Filter entries against the live grid; see [`RemoveMode`].
    /// Out-of-bounds entries are dropped unconditionally.
    pub fn remove_voxels<S: VoxelShape>(&mut self, shape: &S, mode: RemoveMode) {
        let grid = shape.grid();
        let dim = grid.dim();

        let mut kept = SparseVolume::with_layout(self.occupancy.layout());
        for e in &self.entries {
            let coord = e.voxel.coord();
            if !coord_in_dim(coord, dim) {
                continue;
            }
            let live = grid.sample(coord.as_ivec3());
            let keep = match mode {
                RemoveMode::NonSolid => live != 0,
                RemoveMode::Solid => live == 0,
            };
            if keep {
                kept.set(coord.as_ivec3(), e.voxel.palette_index(), dim);
            }
        }

        *self = kept;
    }

    /// Write every staged voxel into the live grid and request
    /// re-voxelization. This is the sole mutation point for the grid.
    pub fn apply<S: VoxelShape>(&self, shape: &mut S) {
        let dim = shape.dim();
        {
            let mut grid = shape.grid_mut();
            for e in &self.entries {
                let coord = e.voxel.coord();
                if coord_in_dim(coord, dim) {
                    grid.set(coord, e.voxel.palette_index());
                }
            }
        }
        shape.voxelize();
    }

    /// Re-read the current grid value at every staged coordinate, replacing
    /// the stored palette indices. Used to snapshot "before" state for undo.
    pub fn update_from_shape<S: VoxelShape>(&mut self, shape: &S) {
        let grid = shape.grid();
        let dim = grid.dim();

        let mut updated = SparseVolume::with_layout(self.occupancy.layout());
        updated.entries.reserve(self.entries.len());
        for e in &self.entries {
            let coord = e.voxel.coord();
            if !coord_in_dim(coord, dim) {
                continue;
            }
            updated.set(coord.as_ivec3(), grid.sample(coord.as_ivec3()), dim);
        }

        *self = updated;
    }

    /// Produce the change that fills this volume's coordinates with random
    /// picks from `range`. Voxels whose live value already equals the pick
    /// are skipped unless `force_identical` is set (undo bookkeeping needs
    /// the full set even when nothing would change).
    pub fn prepare_fill<S: VoxelShape>(
        &self,
        shape: &S,
        range: &PaletteRange,
        rng: &mut Rng,
        force_identical: bool,
    ) -> SparseVolume {
        let grid = shape.grid();
        let dim = grid.dim();

        let mut change = SparseVolume::with_layout(self.occupancy.layout());
        for e in &self.entries {
            let coord = e.voxel.coord();
            if !coord_in_dim(coord, dim) {
                continue;
            }
            let value = range.random(rng).wrapping_add(1);
            if grid.sample(coord.as_ivec3()) != value || force_identical {
                change.set(coord.as_ivec3(), value, dim);
            }
        }

        change
    }

    /// Produce the change that erases every currently-solid voxel of this
    /// volume
    pub fn prepare_erase<S: VoxelShape>(&self, shape: &S) -> SparseVolume {
        let grid = shape.grid();
        let dim = grid.dim();

        let mut change = SparseVolume::with_layout(self.occupancy.layout());
        for e in &self.entries {
            let coord = e.voxel.coord();
            if !coord_in_dim(coord, dim) {
                continue;
            }
            if grid.sample(coord.as_ivec3()) != 0 {
                change.set(coord.as_ivec3(), 0, dim);
            }
        }

        change
    }

    /// Global select-by-color: stage every voxel of the grid whose value
    /// equals the value at `start`. No connectivity requirement.
    pub fn add_by_palette_index<S: VoxelShape>(&mut self, shape: &S, start: UVec3) {
        let dim = shape.dim();
        if !coord_in_dim(start, dim) {
            return;
        }
        let start_value = shape.grid().sample(start.as_ivec3());

        let plane = (dim.x * dim.y) as usize;
        for (i, &value) in shape.voxel_data().iter().enumerate() {
            if value == start_value {
                let x = (i % dim.x as usize) as i32;
                let y = (i / dim.x as usize % dim.y as usize) as i32;
                let z = (i / plane) as i32;
                self.set(IVec3::new(x, y, z), value, dim);
            }
        }
    }

    /// Flood-fill over the live grid from `start`, confined to solid voxels.
    /// Each visited, matching voxel is staged into this volume.
    pub fn add_region<S: VoxelShape, P: Palette>(
        &mut self,
        shape: &S,
        palette: &P,
        start: UVec3,
        opts: &RegionGrow,
    ) {
        let grid = shape.grid();
        let dim = grid.dim();
        if !coord_in_dim(start, dim) {
            return;
        }

        let start_value = grid.sample(start.as_ivec3());
        let start_color = palette.color(start_value.wrapping_sub(1)).truncate();
        let fuzziness2 = opts.fuzziness * opts.fuzziness;
        let offsets = neighbor_offsets(opts.neighborhood);

        let mut stack = vec![start];
        let mut visited = bitvec![0; (dim.x * dim.y * dim.z) as usize];
        let before = self.entries.len();

        while let Some(coord) = stack.pop() {
            if opts.exclude_dir != IVec3::ZERO
                && grid.sample(coord.as_ivec3() + opts.exclude_dir) != 0
            {
                continue;
            }

            self.set(coord.as_ivec3(), grid.sample(coord.as_ivec3()), dim);

            for &(offset, required_axes) in offsets {
                if opts.axes.0 & required_axes != required_axes {
                    continue;
                }
                let neighbor = coord.as_ivec3() + offset;
                if !icoord_in_dim(neighbor, dim) {
                    continue;
                }
                let index = linear_index(dim, neighbor.as_uvec3());
                if visited[index] {
                    continue;
                }

                let value = grid.sample(neighbor);
                let mut matches = value != 0;
                if matches && opts.match_color {
                    if fuzziness2 > 0.0 {
                        let color = palette.color(value.wrapping_sub(1)).truncate();
                        matches = color.distance_squared(start_color) < fuzziness2;
                    } else {
                        matches = value == start_value;
                    }
                }

                if matches {
                    stack.push(neighbor.as_uvec3());
                    visited.set(index, true);
                }
            }
        }

        debug!(
            "region grow from {start} staged {} voxels",
            self.entries.len() - before
        );
    }

    /// Recompute each entry's exposed faces against this volume's own
    /// coordinate set - not the live grid. A face is exposed iff its
    /// neighbor is absent from the volume.
    pub fn cull_for_draw<S: VoxelShape>(&mut self, shape: &S) {
        let dim = shape.dim();

        let mut mask = OccupancyMask::new(self.occupancy.layout());
        for e in &self.entries {
            let coord = e.voxel.coord();
            if coord_in_dim(coord, dim) {
                mask.set(coord, true);
            }
        }

        for e in &mut self.entries {
            let coord = e.voxel.coord().as_ivec3();
            let mut faces = FaceFlags::NONE;
            for face in Face::ALL {
                let neighbor = coord + face.offset();
                let occupied = icoord_in_dim(neighbor, dim) && mask.get(neighbor.as_uvec3());
                if !occupied {
                    faces.insert(face);
                }
            }
            e.faces = faces;
        }
    }

    /// Emit debug-draw boxes for every entry with at least one exposed
    /// face, restricted to those faces. Entries staging an erase (index 0)
    /// draw in neutral gray.
    pub fn draw<S: VoxelShape, P: Palette, D: DebugDraw>(
        &self,
        shape: &S,
        palette: &P,
        sink: &mut D,
        disable_outlines: bool,
        disable_solids: bool,
    ) {
        const INFLATE: f32 = 0.001;

        let dim = shape.dim();
        let orientation = shape.world_orientation();
        let extent = shape.voxel_world_size() + INFLATE;

        for e in &self.entries {
            if e.faces.is_empty() {
                continue;
            }
            let coord = e.voxel.coord();
            if !coord_in_dim(coord, dim) {
                continue;
            }

            let center = shape.to_world_space(coord.as_vec3() + 0.5);
            let index = e.voxel.palette_index();
            let mut color = if index > 0 {
                palette.color(index - 1)
            } else {
                Vec4::new(0.5, 0.5, 0.5, 1.0)
            };

            if !disable_solids {
                sink.draw_solid_box(center, orientation, extent, color, false, e.faces);
            }
            if !disable_outlines {
                color.w = 0.75;
                sink.draw_box(center, orientation, extent, color, true, e.faces);
            }
        }
    }
}

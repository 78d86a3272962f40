//! Whole-grid editing operations
//!
//! These iterate the dense grid directly rather than staging a sparse
//! volume. Each operation registers a host-level undo state first and
//! commits a snapshot when done. Grid sweeps run over independent z-slabs
//! in parallel; every slab owns a disjoint region of the data.

use log::debug;
use rayon::prelude::*;

use crate::core::rng::Rng;
use crate::core::types::Vec3;
use crate::host::{EditorHost, VoxelShape};
use crate::voxel::palette::PaletteRange;

const UNDO_LABEL: &str = "Edit Voxel Shape";

/// Combine rule for [`global_boolean`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    /// Recolor solid voxels of the target where the operator is solid
    Replacement,
    /// Erase solid voxels of the target where the operator is solid
    Subtraction,
    /// Write the operator's solid voxels into the target
    Union,
    /// Erase solid voxels of the target where the operator is empty
    Intersection,
}

/// Per-slab generator derived from a base stream so parallel slabs stay
/// deterministic for a given seed
fn slab_rng(base: u64, z: usize) -> Rng {
    Rng::new(base ^ (z as u64).wrapping_mul(0x9e3779b97f4a7c15))
}

/// Fill every voxel, solid or not, with random picks from `range`
pub fn global_full<S: VoxelShape, E: EditorHost>(
    shape: &mut S,
    editor: &mut E,
    range: &PaletteRange,
    rng: &mut Rng,
) {
    editor.push_undo_redo_state(UNDO_LABEL, shape.id(), false);

    let dim = shape.dim();
    let plane = (dim.x * dim.y) as usize;
    if plane > 0 {
        let base = rng.next_u64();
        shape
            .voxel_data_mut()
            .par_chunks_mut(plane)
            .enumerate()
            .for_each(|(z, slab)| {
                let mut rng = slab_rng(base, z);
                for value in slab.iter_mut() {
                    *value = range.random(&mut rng).wrapping_add(1);
                }
            });
    }

    shape.commit_snapshot();
}

/// Repaint only the solid voxels with random picks from `range`
pub fn global_fill<S: VoxelShape, E: EditorHost>(
    shape: &mut S,
    editor: &mut E,
    range: &PaletteRange,
    rng: &mut Rng,
) {
    editor.push_undo_redo_state(UNDO_LABEL, shape.id(), false);

    let dim = shape.dim();
    let plane = (dim.x * dim.y) as usize;
    if plane > 0 {
        let base = rng.next_u64();
        shape
            .voxel_data_mut()
            .par_chunks_mut(plane)
            .enumerate()
            .for_each(|(z, slab)| {
                let mut rng = slab_rng(base, z);
                for value in slab.iter_mut() {
                    let pick = range.random(&mut rng).wrapping_add(1);
                    if *value != 0 {
                        *value = pick;
                    }
                }
            });
    }

    shape.commit_snapshot();
}

/// Swap solid and empty: solids become empty, empties get random picks
pub fn global_invert<S: VoxelShape, E: EditorHost>(
    shape: &mut S,
    editor: &mut E,
    range: &PaletteRange,
    rng: &mut Rng,
) {
    editor.push_undo_redo_state(UNDO_LABEL, shape.id(), false);

    let dim = shape.dim();
    let plane = (dim.x * dim.y) as usize;
    if plane > 0 {
        let base = rng.next_u64();
        shape
            .voxel_data_mut()
            .par_chunks_mut(plane)
            .enumerate()
            .for_each(|(z, slab)| {
                let mut rng = slab_rng(base, z);
                for value in slab.iter_mut() {
                    let pick = range.random(&mut rng).wrapping_add(1);
                    *value = if *value != 0 { 0 } else { pick };
                }
            });
    }

    shape.commit_snapshot();
}

/// Erase the whole grid
pub fn global_erase<S: VoxelShape, E: EditorHost>(shape: &mut S, editor: &mut E) {
    editor.push_undo_redo_state(UNDO_LABEL, shape.id(), false);
    shape.voxel_data_mut().fill(0);
    shape.commit_snapshot();
}

/// Combine `shape` with a second operator shape, pairing each voxel with
/// the operator voxel at the same world position. Samples outside the
/// operator's bounds read as empty.
pub fn global_boolean<S, T, E>(op: BoolOp, shape: &mut S, operator: &T, editor: &mut E)
where
    S: VoxelShape + Sync,
    T: VoxelShape + Sync,
    E: EditorHost,
{
    editor.push_undo_redo_state(UNDO_LABEL, shape.id(), false);

    let dim = shape.dim();
    let plane = (dim.x * dim.y) as usize;
    if plane == 0 || dim.z == 0 {
        shape.commit_snapshot();
        return;
    }

    // Resolve the spatially-corresponding operator value for every voxel
    // first; the write pass then needs no transforms.
    let mut operator_values = vec![0u8; plane * dim.z as usize];
    {
        let shape_ref = &*shape;
        operator_values
            .par_chunks_mut(plane)
            .enumerate()
            .for_each(|(z, slab)| {
                for y in 0..dim.y {
                    for x in 0..dim.x {
                        let world =
                            shape_ref.to_world_space(Vec3::new(x as f32, y as f32, z as f32));
                        let coord = operator.to_local_coord(world);
                        slab[(x + y * dim.x) as usize] = operator.grid().sample(coord);
                    }
                }
            });
    }

    shape
        .voxel_data_mut()
        .par_iter_mut()
        .zip(operator_values.par_iter())
        .for_each(|(value, &op_value)| match op {
            BoolOp::Replacement => {
                if *value != 0 && op_value != 0 {
                    *value = op_value;
                }
            }
            BoolOp::Subtraction => {
                if *value != 0 && op_value != 0 {
                    *value = 0;
                }
            }
            BoolOp::Union => {
                if op_value != 0 {
                    *value = op_value;
                }
            }
            BoolOp::Intersection => {
                if *value != 0 && op_value == 0 {
                    *value = 0;
                }
            }
        });

    debug!("boolean {op:?} applied to shape {:?}", shape.id());
    shape.commit_snapshot();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UVec3;
    use crate::host::sim::{SimEditor, SimShape};

    fn dim() -> UVec3 {
        UVec3::new(4, 4, 4)
    }

    #[test]
    fn test_global_full() {
        let mut shape = SimShape::new(1, dim());
        let mut editor = SimEditor::new();
        let mut rng = Rng::new(1);

        global_full(&mut shape, &mut editor, &PaletteRange::single(6), &mut rng);

        assert!(shape.voxel_data().iter().all(|&v| v == 7));
        assert_eq!(editor.states.len(), 1);
        assert_eq!(shape.snapshot_count(), 1);
    }

    #[test]
    fn test_global_fill_touches_only_solids() {
        let mut shape = SimShape::new(1, dim());
        shape.set_voxel(UVec3::new(1, 1, 1), 3);
        let mut editor = SimEditor::new();
        let mut rng = Rng::new(1);

        global_fill(&mut shape, &mut editor, &PaletteRange::single(8), &mut rng);

        assert_eq!(shape.voxel(UVec3::new(1, 1, 1)), 9);
        assert_eq!(shape.solid_count(), 1);
    }

    #[test]
    fn test_global_invert() {
        let mut shape = SimShape::new(1, dim());
        shape.set_voxel(UVec3::new(0, 0, 0), 3);
        let mut editor = SimEditor::new();
        let mut rng = Rng::new(1);

        global_invert(&mut shape, &mut editor, &PaletteRange::single(2), &mut rng);

        assert_eq!(shape.voxel(UVec3::new(0, 0, 0)), 0);
        assert_eq!(shape.solid_count(), 63);
        assert!(
            shape
                .voxel_data()
                .iter()
                .filter(|&&v| v != 0)
                .all(|&v| v == 3)
        );
    }

    #[test]
    fn test_global_erase() {
        let mut shape = SimShape::filled(1, dim(), 9);
        let mut editor = SimEditor::new();

        global_erase(&mut shape, &mut editor);
        assert_eq!(shape.solid_count(), 0);
        assert_eq!(shape.snapshot_count(), 1);
    }

    #[test]
    fn test_boolean_subtraction_full_operands_clears_target() {
        let mut shape = SimShape::filled(1, dim(), 5);
        let operator = SimShape::filled(2, dim(), 3);
        let mut editor = SimEditor::new();

        global_boolean(BoolOp::Subtraction, &mut shape, &operator, &mut editor);
        assert_eq!(shape.solid_count(), 0);
    }

    #[test]
    fn test_boolean_replacement_keeps_empties() {
        let mut shape = SimShape::new(1, dim());
        shape.set_voxel(UVec3::new(0, 0, 0), 5);
        let operator = SimShape::filled(2, dim(), 3);
        let mut editor = SimEditor::new();

        global_boolean(BoolOp::Replacement, &mut shape, &operator, &mut editor);
        assert_eq!(shape.voxel(UVec3::new(0, 0, 0)), 3);
        assert_eq!(shape.solid_count(), 1);
    }

    #[test]
    fn test_boolean_union_adds_operator_voxels() {
        let mut shape = SimShape::new(1, dim());
        let mut operator = SimShape::new(2, dim());
        operator.set_voxel(UVec3::new(2, 2, 2), 7);
        let mut editor = SimEditor::new();

        global_boolean(BoolOp::Union, &mut shape, &operator, &mut editor);
        assert_eq!(shape.voxel(UVec3::new(2, 2, 2)), 7);
        assert_eq!(shape.solid_count(), 1);
    }

    #[test]
    fn test_boolean_intersection_keeps_overlap() {
        let mut shape = SimShape::filled(1, dim(), 5);
        let mut operator = SimShape::new(2, dim());
        operator.set_voxel(UVec3::new(1, 1, 1), 1);
        let mut editor = SimEditor::new();

        global_boolean(BoolOp::Intersection, &mut shape, &operator, &mut editor);
        assert_eq!(shape.solid_count(), 1);
        assert_eq!(shape.voxel(UVec3::new(1, 1, 1)), 5);
    }

    #[test]
    fn test_boolean_respects_operator_transform() {
        // Operator shifted +2 along X: only the overlapping half interacts
        let mut shape = SimShape::filled(1, dim(), 5);
        let operator =
            SimShape::filled(2, dim(), 3).with_origin(crate::core::types::Vec3::new(2.0, 0.0, 0.0));
        let mut editor = SimEditor::new();

        global_boolean(BoolOp::Subtraction, &mut shape, &operator, &mut editor);

        for x in 0..4u32 {
            let value = shape.voxel(UVec3::new(x, 0, 0));
            if x < 2 {
                assert_eq!(value, 5, "x={x} outside the operator should survive");
            } else {
                assert_eq!(value, 0, "x={x} under the operator should be erased");
            }
        }
    }
}

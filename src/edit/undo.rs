//! Swap-based undo/redo over sparse volume snapshots
//!
//! Each stack slot holds the grid state at its coordinates from the far
//! side of the cursor: `undo` captures the current state, applies the
//! stored one and stores the capture back into the slot it leaves, so one
//! volume per edit serves both directions.

use std::collections::HashMap;

use log::debug;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::host::{ShapeId, VoxelShape};
use crate::voxel::volume::SparseVolume;

/// History of one voxel shape
#[derive(Default)]
pub struct UndoRedoStack {
    stack: Vec<SparseVolume>,
    /// Slot `undo` would apply next; `None` when fully unwound
    cursor: Option<usize>,
}

impl UndoRedoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            None => !self.stack.is_empty(),
            Some(i) => i + 1 < self.stack.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Append a change, discarding any redo future past the cursor
    pub fn push(&mut self, change: SparseVolume) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.stack.truncate(keep);
        self.stack.push(change);
        self.cursor = Some(self.stack.len() - 1);
    }

    /// Swap the current grid state with the stored one at the cursor and
    /// step back. Fails when the history is exhausted.
    pub fn undo<S: VoxelShape>(&mut self, shape: &mut S) -> Result<()> {
        let index = self.cursor.ok_or(Error::History("nothing to undo"))?;

        let mut current = self.stack[index].clone();
        current.update_from_shape(shape);
        self.stack[index].apply(shape);
        self.stack[index] = current;

        self.cursor = index.checked_sub(1);
        debug!("undo applied, cursor at {:?}", self.cursor);
        Ok(())
    }

    /// Inverse of [`undo`](Self::undo): step forward and swap
    pub fn redo<S: VoxelShape>(&mut self, shape: &mut S) -> Result<()> {
        let index = match self.cursor {
            None if !self.stack.is_empty() => 0,
            Some(i) if i + 1 < self.stack.len() => i + 1,
            _ => return Err(Error::History("nothing to redo")),
        };

        let mut previous = self.stack[index].clone();
        previous.update_from_shape(shape);
        self.stack[index].apply(shape);
        self.stack[index] = previous;

        self.cursor = Some(index);
        debug!("redo applied, cursor at {:?}", self.cursor);
        Ok(())
    }
}

/// Per-shape history table, created lazily on first access.
///
/// Hosts must call [`remove`](Self::remove) when a shape is destroyed;
/// stacks are never dropped implicitly.
#[derive(Default)]
pub struct UndoRedoRegistry {
    stacks: HashMap<ShapeId, UndoRedoStack>,
}

impl UndoRedoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stack for a shape, creating it on first access
    pub fn stack_for(&mut self, shape: ShapeId) -> &mut UndoRedoStack {
        self.stacks.entry(shape).or_default()
    }

    pub fn can_undo(&self, shape: ShapeId) -> bool {
        self.stacks.get(&shape).is_some_and(|s| s.can_undo())
    }

    pub fn can_redo(&self, shape: ShapeId) -> bool {
        self.stacks.get(&shape).is_some_and(|s| s.can_redo())
    }

    pub fn push(&mut self, shape: ShapeId, change: SparseVolume) {
        self.stack_for(shape).push(change);
    }

    pub fn undo<S: VoxelShape>(&mut self, shape: &mut S) -> Result<()> {
        self.stack_for(shape.id()).undo(shape)
    }

    pub fn redo<S: VoxelShape>(&mut self, shape: &mut S) -> Result<()> {
        self.stack_for(shape.id()).redo(shape)
    }

    /// Lifecycle hook: drop a destroyed shape's history. Returns whether a
    /// stack existed.
    pub fn remove(&mut self, shape: ShapeId) -> bool {
        self.stacks.remove(&shape).is_some()
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IVec3, UVec3};
    use crate::host::sim::SimShape;

    fn dim() -> UVec3 {
        UVec3::new(4, 4, 4)
    }

    /// Stage `value` at (x,0,0), snapshot the pre-state, push it and apply
    fn commit_edit(stack: &mut UndoRedoStack, shape: &mut SimShape, x: i32, value: u8) {
        let mut change = SparseVolume::new();
        change.set(IVec3::new(x, 0, 0), value, dim());

        let mut prev = change.clone();
        prev.update_from_shape(shape);
        stack.push(prev);
        change.apply(shape);
    }

    #[test]
    fn test_empty_stack_guards() {
        let mut stack = UndoRedoStack::new();
        let mut shape = SimShape::new(1, dim());

        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert!(stack.undo(&mut shape).is_err());
        assert!(stack.redo(&mut shape).is_err());
    }

    #[test]
    fn test_undo_redo_symmetry() {
        let mut stack = UndoRedoStack::new();
        let mut shape = SimShape::new(1, dim());

        for (i, value) in [5u8, 6, 7].iter().enumerate() {
            commit_edit(&mut stack, &mut shape, i as i32, *value);
        }
        let after_edits: Vec<u8> = shape.voxel_data().to_vec();

        // Fully unwind
        for _ in 0..3 {
            stack.undo(&mut shape).expect("undo");
        }
        assert!(!stack.can_undo());
        assert!(shape.voxel_data().iter().all(|&v| v == 0));

        // Fully replay
        for _ in 0..3 {
            stack.redo(&mut shape).expect("redo");
        }
        assert!(!stack.can_redo());
        assert_eq!(shape.voxel_data(), &after_edits[..]);
    }

    #[test]
    fn test_undo_restores_intermediate_states() {
        let mut stack = UndoRedoStack::new();
        let mut shape = SimShape::new(1, dim());

        commit_edit(&mut stack, &mut shape, 0, 5);
        commit_edit(&mut stack, &mut shape, 0, 9);
        assert_eq!(shape.voxel(UVec3::ZERO), 9);

        stack.undo(&mut shape).expect("undo");
        assert_eq!(shape.voxel(UVec3::ZERO), 5);
        stack.undo(&mut shape).expect("undo");
        assert_eq!(shape.voxel(UVec3::ZERO), 0);

        stack.redo(&mut shape).expect("redo");
        assert_eq!(shape.voxel(UVec3::ZERO), 5);
        stack.redo(&mut shape).expect("redo");
        assert_eq!(shape.voxel(UVec3::ZERO), 9);
    }

    #[test]
    fn test_push_truncates_redo_future() {
        let mut stack = UndoRedoStack::new();
        let mut shape = SimShape::new(1, dim());

        commit_edit(&mut stack, &mut shape, 0, 5);
        commit_edit(&mut stack, &mut shape, 1, 6);
        stack.undo(&mut shape).expect("undo");
        assert!(stack.can_redo());

        commit_edit(&mut stack, &mut shape, 2, 7);
        assert!(!stack.can_redo());
        assert_eq!(stack.len(), 2);

        // The new edit undoes cleanly
        stack.undo(&mut shape).expect("undo");
        assert_eq!(shape.voxel(UVec3::new(2, 0, 0)), 0);
    }

    #[test]
    fn test_registry_per_shape_and_removal() {
        let mut registry = UndoRedoRegistry::new();
        let mut shape_a = SimShape::new(1, dim());
        let shape_b = ShapeId(2);

        assert!(!registry.can_undo(shape_a.id()));

        let mut change = SparseVolume::new();
        change.set(IVec3::ZERO, 3, dim());
        let mut prev = change.clone();
        prev.update_from_shape(&shape_a);
        registry.push(shape_a.id(), prev);
        change.apply(&mut shape_a);

        assert!(registry.can_undo(shape_a.id()));
        assert!(!registry.can_undo(shape_b));

        registry.undo(&mut shape_a).expect("undo");
        assert_eq!(shape_a.voxel(UVec3::ZERO), 0);

        assert!(registry.remove(shape_a.id()));
        assert!(!registry.remove(shape_a.id()));
        assert!(!registry.can_redo(shape_a.id()));
    }
}

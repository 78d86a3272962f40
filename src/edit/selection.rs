//! Selection and clipboard operations
//!
//! All mutating operations follow the same commit pattern: build the change
//! volume, capture the pre-state at its coordinates, push that onto the
//! shape's history (core and host level), then apply.

use log::debug;

use crate::core::rng::Rng;
use crate::edit::undo::UndoRedoRegistry;
use crate::host::{EditorHost, VoxelShape};
use crate::voxel::palette::PaletteRange;
use crate::voxel::volume::SparseVolume;

/// Capture the pre-state of `change`, register undo at both levels, then
/// apply the change and commit the snapshot
pub fn commit_change<S: VoxelShape, E: EditorHost>(
    history: &mut UndoRedoRegistry,
    editor: &mut E,
    label: &str,
    shape: &mut S,
    change: &SparseVolume,
) {
    let mut previous = change.clone();
    previous.update_from_shape(shape);

    editor.push_undo_redo_state(label, shape.id(), false);
    history.push(shape.id(), previous);

    change.apply(shape);
    shape.commit_snapshot();
    debug!("{label}: committed {} voxels to {:?}", change.len(), shape.id());
}

/// Fill the selected voxels with random picks from `range`
pub fn fill_selection<S: VoxelShape, E: EditorHost>(
    history: &mut UndoRedoRegistry,
    editor: &mut E,
    shape: &mut S,
    selection: &SparseVolume,
    range: &PaletteRange,
    rng: &mut Rng,
) {
    let change = selection.prepare_fill(shape, range, rng, false);
    commit_change(history, editor, "Fill Selection", shape, &change);
}

/// Erase the selected voxels
pub fn erase_selection<S: VoxelShape, E: EditorHost>(
    history: &mut UndoRedoRegistry,
    editor: &mut E,
    shape: &mut S,
    selection: &SparseVolume,
) {
    let change = selection.prepare_erase(shape);
    commit_change(history, editor, "Erase Selection", shape, &change);
}

/// Copy the selected voxels, with their live values, into a clipboard
/// volume
pub fn copy_selection<S: VoxelShape>(shape: &S, selection: &SparseVolume) -> SparseVolume {
    let mut clipboard = selection.clone();
    clipboard.update_from_shape(shape);
    clipboard
}

/// Copy the selected voxels and erase them from the grid
pub fn cut_selection<S: VoxelShape, E: EditorHost>(
    history: &mut UndoRedoRegistry,
    editor: &mut E,
    shape: &mut S,
    selection: &SparseVolume,
) -> SparseVolume {
    let clipboard = copy_selection(shape, selection);
    let change = clipboard.prepare_erase(shape);
    commit_change(history, editor, "Cut Selection", shape, &change);
    clipboard
}

/// Write a previously copied/cut clipboard back into the grid
pub fn paste_clipboard<S: VoxelShape, E: EditorHost>(
    history: &mut UndoRedoRegistry,
    editor: &mut E,
    shape: &mut S,
    clipboard: &SparseVolume,
) {
    commit_change(history, editor, "Paste Clipboard", shape, clipboard);
}

//! Editing operations built on sparse volumes

pub mod undo;
pub mod global;
pub mod selection;

pub use global::BoolOp;
pub use undo::{UndoRedoRegistry, UndoRedoStack};

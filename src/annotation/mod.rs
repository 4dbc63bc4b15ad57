//! Per-frame annotation state engine.
//!
//! Every discrete video frame owns an independent, undoable history of shape-sets.
//! Nothing in here knows about rendering, input handling or video decoding; the
//! editor layer drives it from Bevy systems.
//!
//! ## Module Structure
//!
//! - [`shape`] - Geometry model (Shape, Geometry, ShapeDraft, ShapeId, ShapeKind)
//! - [`frame_history`] - Undo/redo stack of one frame
//! - [`store`] - FrameHistoryStore resource owning all committed shapes
//! - [`polygon_builder`] - In-progress polygon with point-level undo/redo
//! - [`propagation`] - Copying a shape to adjacent frames or frame ranges
//! - [`clipboard`] - Copied shape buffer
//! - [`frame_index`] - Playback time to frame index mapping
//!
//! ## Mutation Discipline
//!
//! [`FrameHistoryStore::commit`] is the only path that changes a frame. Undo and redo
//! only move the frame's cursor. Builders and copy operations produce [`ShapeDraft`]s
//! and the store assigns ids when committing them.

mod clipboard;
mod frame_history;
mod frame_index;
mod polygon_builder;
mod propagation;
mod shape;
mod store;


// Re-exports - Geometry
pub use shape::{Geometry, Shape, ShapeDraft, ShapeId};

// Re-exports - State
pub use clipboard::ShapeClipboard;
pub use polygon_builder::ActivePolygonBuilder;
pub use store::FrameHistoryStore;

// Re-exports - Operations
pub use frame_index::{FrameIndex, frame_index, frame_seek_time, total_frames};
pub use propagation::{PropagationDirection, adjacent_frame, paste_to_frame, propagate};

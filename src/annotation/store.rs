//! Frame history store: the owner of every committed shape.

use std::collections::HashMap;

use bevy::prelude::*;

use super::frame_history::FrameHistory;
use super::frame_index::FrameIndex;
use super::shape::{Shape, ShapeDraft, ShapeId, ShapeIdAllocator};

/// Per-frame annotation state for the current video session.
///
/// Entries are created lazily on the first write to a frame; reading a frame that
/// was never edited yields an empty set and leaves the store untouched. Every edit
/// goes through [`FrameHistoryStore::commit`] so undo/redo stay consistent.
#[derive(Resource, Default, Debug)]
pub struct FrameHistoryStore {
    frames: HashMap<FrameIndex, FrameHistory>,
    ids: ShapeIdAllocator,
}

impl FrameHistoryStore {
    /// Active shape-set of `frame`
    pub fn current_shapes(&self, frame: FrameIndex) -> &[Shape] {
        self.frames
            .get(&frame)
            .map(FrameHistory::current)
            .unwrap_or(&[])
    }

    /// Replace the active shape-set of `frame`, discarding any redo tail
    pub fn commit(&mut self, frame: FrameIndex, shapes: Vec<Shape>) {
        let entry = self.frames.entry(frame).or_default();
        entry.commit(shapes);
        debug!(
            "Committed {} shape(s) to frame {} (snapshot {})",
            entry.current().len(),
            frame,
            entry.current_index()
        );
    }

    pub fn undo(&mut self, frame: FrameIndex) -> bool {
        self.frames.get_mut(&frame).is_some_and(FrameHistory::undo)
    }

    pub fn redo(&mut self, frame: FrameIndex) -> bool {
        self.frames.get_mut(&frame).is_some_and(FrameHistory::redo)
    }

    /// Commit an empty set. Clearing an already empty frame does nothing.
    pub fn clear(&mut self, frame: FrameIndex) -> bool {
        if self.current_shapes(frame).is_empty() {
            return false;
        }
        self.commit(frame, Vec::new());
        true
    }

    pub fn can_undo(&self, frame: FrameIndex) -> bool {
        self.frames.get(&frame).is_some_and(FrameHistory::can_undo)
    }

    pub fn can_redo(&self, frame: FrameIndex) -> bool {
        self.frames.get(&frame).is_some_and(FrameHistory::can_redo)
    }

    /// Snapshot count for `frame`; unvisited frames report the implicit empty snapshot
    pub fn history_len(&self, frame: FrameIndex) -> usize {
        self.frames.get(&frame).map(FrameHistory::len).unwrap_or(1)
    }

    /// Whether `frame` has a materialized history entry
    #[cfg(test)]
    pub fn has_entry(&self, frame: FrameIndex) -> bool {
        self.frames.contains_key(&frame)
    }

    /// Assign an id to `draft` and append it to the frame
    pub fn add_shape(&mut self, frame: FrameIndex, draft: ShapeDraft) -> ShapeId {
        let id = self.ids.allocate();
        let mut shapes = self.current_shapes(frame).to_vec();
        shapes.push(draft.into_shape(id));
        self.commit(frame, shapes);
        id
    }

    /// Apply `edit` to a copy of the shape and commit the result
    pub fn update_shape(
        &mut self,
        frame: FrameIndex,
        id: ShapeId,
        edit: impl FnOnce(&mut Shape),
    ) -> bool {
        let mut shapes = self.current_shapes(frame).to_vec();
        let Some(shape) = shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let before = shape.clone();
        edit(shape);
        // Ids are owned by the store
        shape.id = id;
        if *shape == before {
            return false;
        }
        self.commit(frame, shapes);
        true
    }

    pub fn translate_shape(&mut self, frame: FrameIndex, id: ShapeId, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.update_shape(frame, id, |shape| shape.geometry.translate(delta))
    }

    pub fn remove_shape(&mut self, frame: FrameIndex, id: ShapeId) -> bool {
        let shapes = self.current_shapes(frame);
        if !shapes.iter().any(|s| s.id == id) {
            return false;
        }
        let remaining: Vec<Shape> = shapes.iter().filter(|s| s.id != id).cloned().collect();
        self.commit(frame, remaining);
        true
    }

    pub fn find_shape(&self, frame: FrameIndex, id: ShapeId) -> Option<&Shape> {
        self.current_shapes(frame).iter().find(|s| s.id == id)
    }

    /// Topmost shape under `point` (last drawn wins)
    pub fn shape_at(&self, frame: FrameIndex, point: Vec2, tolerance: f32) -> Option<&Shape> {
        self.current_shapes(frame)
            .iter()
            .rev()
            .find(|s| s.geometry.contains(point, tolerance))
    }

    /// Sorted frames whose active shape-set is non-empty
    pub fn annotated_frames(&self) -> Vec<FrameIndex> {
        let mut frames: Vec<FrameIndex> = self
            .frames
            .iter()
            .filter(|(_, history)| !history.current().is_empty())
            .map(|(frame, _)| *frame)
            .collect();
        frames.sort_unstable();
        frames
    }

    /// Drop every frame and restart id allocation (new video)
    pub fn reset(&mut self) {
        info!("Resetting annotation store ({} frame(s))", self.frames.len());
        self.frames.clear();
        self.ids.reset();
    }
}

//! Undo/redo stack of shape-set snapshots for a single frame.

use super::shape::Shape;

/// Snapshot history of one frame.
///
/// `history[0]` is always the empty set the frame was born with, and
/// `history[current_index]` is the shape-set currently shown for the frame.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    history: Vec<Vec<Shape>>,
    current_index: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self {
            history: vec![Vec::new()],
            current_index: 0,
        }
    }
}

impl FrameHistory {
    /// The active shape-set
    pub fn current(&self) -> &[Shape] {
        &self.history[self.current_index]
    }

    /// Drop the redo tail and append `shapes` as the new active snapshot
    pub fn commit(&mut self, shapes: Vec<Shape>) {
        self.history.truncate(self.current_index + 1);
        self.history.push(shapes);
        self.current_index = self.history.len() - 1;
    }

    pub fn undo(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.current_index + 1 >= self.history.len() {
            return false;
        }
        self.current_index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.history.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of snapshots, including the initial empty one
    pub fn len(&self) -> usize {
        self.history.len()
    }
}

//! In-progress polygon with its own point-level undo/redo.
//!
//! Vertices placed while drawing do not touch the frame history. The frame only
//! receives one commit when the polygon is closed or finalized as an open polygon.

use bevy::prelude::*;

use super::shape::{Geometry, ShapeDraft};

/// Minimum vertex count for a closed polygon
pub const MIN_CLOSED_POLYGON_POINTS: usize = 3;

#[derive(Resource, Debug, Clone)]
pub struct ActivePolygonBuilder {
    points: Vec<Vec2>,
    history: Vec<Vec<Vec2>>,
    history_index: usize,
}

impl Default for ActivePolygonBuilder {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            history: vec![Vec::new()],
            history_index: 0,
        }
    }
}

impl ActivePolygonBuilder {
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn add_point(&mut self, point: Vec2) {
        self.points.push(point);
        self.history.truncate(self.history_index + 1);
        self.history.push(self.points.clone());
        self.history_index = self.history.len() - 1;
    }

    pub fn undo_point(&mut self) -> bool {
        if self.history_index == 0 {
            return false;
        }
        self.history_index -= 1;
        self.points = self.history[self.history_index].clone();
        true
    }

    pub fn redo_point(&mut self) -> bool {
        if self.history_index + 1 >= self.history.len() {
            return false;
        }
        self.history_index += 1;
        self.points = self.history[self.history_index].clone();
        true
    }

    pub fn can_undo_point(&self) -> bool {
        self.history_index > 0
    }

    pub fn can_redo_point(&self) -> bool {
        self.history_index + 1 < self.history.len()
    }

    pub fn can_close(&self) -> bool {
        self.points.len() >= MIN_CLOSED_POLYGON_POINTS
    }

    /// Whether `point` lands on the first vertex (the closing gesture)
    pub fn near_first_point(&self, point: Vec2, radius: f32) -> bool {
        self.points
            .first()
            .is_some_and(|first| first.distance(point) <= radius)
    }

    /// Closed polygon from the pending points. Fewer than three points is rejected.
    ///
    /// The builder is left untouched; the caller commits the draft and then resets.
    pub fn close(&self, label: &str, color: Color) -> Option<ShapeDraft> {
        if !self.can_close() {
            return None;
        }
        Some(ShapeDraft::new(
            label,
            color,
            Geometry::Polygon {
                points: self.points.clone(),
                is_closed: true,
            },
        ))
    }

    /// Open polygon from whatever points are pending, so abandoning the tool keeps the work
    pub fn finalize_open(&self, label: &str, color: Color) -> Option<ShapeDraft> {
        if self.points.is_empty() {
            return None;
        }
        Some(ShapeDraft::new(
            label,
            color,
            Geometry::Polygon {
                points: self.points.clone(),
                is_closed: false,
            },
        ))
    }

    pub fn reset(&mut self) {
        self.points.clear();
        self.history.clear();
        self.history.push(Vec::new());
        self.history_index = 0;
    }
}

//! Single-slot buffer holding the most recently copied shape.

use bevy::prelude::*;

use super::shape::Shape;

/// Copied shape, held outside of any frame history.
///
/// Pasting and propagation read it without consuming it.
#[derive(Resource, Default, Debug)]
pub struct ShapeClipboard {
    shape: Option<Shape>,
}

impl ShapeClipboard {
    pub fn copy(&mut self, shape: &Shape) {
        self.shape = Some(shape.clone());
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_none()
    }

    pub fn clear(&mut self) {
        self.shape = None;
    }
}

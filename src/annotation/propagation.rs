//! Copying a shape into other frames.
//!
//! Propagation is additive: every touched frame gets a fresh copy with a new id,
//! and running it twice leaves two copies per frame. Geometry is copied verbatim;
//! nothing is interpolated between frames.

use std::ops::Range;

use bevy::prelude::*;

use super::frame_index::FrameIndex;
use super::shape::{Shape, ShapeId};
use super::store::FrameHistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationDirection {
    /// Frames after the current one, up to the end of the video
    Forward,
    /// Frames before the current one, down to frame 0
    Backward,
}

impl PropagationDirection {
    pub fn display_name(&self) -> &'static str {
        match self {
            PropagationDirection::Forward => "next",
            PropagationDirection::Backward => "previous",
        }
    }
}

/// Open range of frames reached from `from_frame`, never including `from_frame` itself
pub fn propagation_range(
    from_frame: FrameIndex,
    total_frames: u32,
    direction: PropagationDirection,
) -> Range<FrameIndex> {
    match direction {
        PropagationDirection::Forward => from_frame.saturating_add(1)..total_frames,
        PropagationDirection::Backward => 0..from_frame.min(total_frames),
    }
}

/// The neighbouring frame in `direction`, if it exists
pub fn adjacent_frame(
    from_frame: FrameIndex,
    total_frames: u32,
    direction: PropagationDirection,
) -> Option<FrameIndex> {
    match direction {
        PropagationDirection::Forward => from_frame
            .checked_add(1)
            .filter(|frame| *frame < total_frames),
        PropagationDirection::Backward => from_frame.checked_sub(1),
    }
}

/// Append a fresh copy of `shape` to a single frame
pub fn paste_to_frame(store: &mut FrameHistoryStore, shape: &Shape, frame: FrameIndex) -> ShapeId {
    store.add_shape(frame, shape.to_draft())
}

/// Append a fresh copy of `shape` to every frame in the open range from `from_frame`.
///
/// Each frame receives exactly one commit. Returns the number of frames touched.
pub fn propagate(
    store: &mut FrameHistoryStore,
    shape: &Shape,
    from_frame: FrameIndex,
    total_frames: u32,
    direction: PropagationDirection,
) -> usize {
    let range = propagation_range(from_frame, total_frames, direction);
    if range.is_empty() {
        return 0;
    }

    let touched = range.len();
    for frame in range {
        store.add_shape(frame, shape.to_draft());
    }
    info!(
        "Propagated {} '{}' to {} {} frame(s) from frame {}",
        shape.kind().display_name(),
        shape.label,
        touched,
        direction.display_name(),
        from_frame
    );
    touched
}

//! Pointer handling for the polygon, rectangle and circle tools.
//!
//! Polygon vertices go into the [`ActivePolygonBuilder`](crate::annotation::ActivePolygonBuilder)
//! and only reach the frame history once the polygon is closed (click on the first
//! vertex or press Enter) or abandoned. Rectangles and circles take two clicks: the
//! first one is kept in [`PendingShape`](super::state::PendingShape), the second one
//! commits.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::{FrameIndex, Geometry, ShapeDraft, ShapeId};
use crate::constants::POLYGON_CLOSE_RADIUS;

use super::params::{CameraParams, is_cursor_over_ui};
use super::session::VideoSession;
use super::state::EditingState;
use super::tools::{AnnotationTool, CurrentTool};

pub fn handle_drawing(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    session: Res<VideoSession>,
    mut editing: EditingState,
    camera: CameraParams,
    mut contexts: EguiContexts,
) {
    let tool = current_tool.tool;
    if !tool.is_drawing_tool() {
        return;
    }

    let frame = session.current_frame();

    // Right click abandons the current shape
    if mouse_button.just_pressed(MouseButton::Right) {
        editing.settle(frame);
        return;
    }

    if !mouse_button.just_pressed(MouseButton::Left) || is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(pos) = camera.cursor_video_pos(session.video_size) else {
        return;
    };

    match tool {
        AnnotationTool::Polygon => {
            if editing.builder.can_close()
                && editing.builder.near_first_point(pos, POLYGON_CLOSE_RADIUS)
            {
                close_polygon(frame, &mut editing);
            } else {
                editing.builder.add_point(pos);
            }
        }
        AnnotationTool::Rectangle | AnnotationTool::Circle => {
            let Some(anchor) = editing.pending.anchor.take() else {
                editing.pending.anchor = Some(pos);
                return;
            };
            let geometry = if tool == AnnotationTool::Rectangle {
                Geometry::rectangle_from_corners(anchor, pos)
            } else {
                Geometry::circle_through(anchor, pos)
            };
            let draft = ShapeDraft::new(
                editing.settings.new_shape_label(),
                editing.settings.color,
                geometry,
            );
            commit_drawn_shape(frame, &mut editing, draft);
        }
        AnnotationTool::Select => {}
    }
}

/// Close the pending polygon into `frame`. Rejected (no-op) below three points.
pub(crate) fn close_polygon(frame: FrameIndex, editing: &mut EditingState) -> Option<ShapeId> {
    let Some(draft) = editing
        .builder
        .close(&editing.settings.new_shape_label(), editing.settings.color)
    else {
        debug!(
            "Polygon close rejected with {} point(s)",
            editing.builder.points().len()
        );
        return None;
    };
    editing.builder.reset();
    commit_drawn_shape(frame, editing, draft)
}

fn commit_drawn_shape(
    frame: FrameIndex,
    editing: &mut EditingState,
    draft: ShapeDraft,
) -> Option<ShapeId> {
    if draft.geometry.is_degenerate() {
        debug!("Discarded degenerate {}", draft.geometry.kind().display_name());
        return None;
    }
    let kind = draft.geometry.kind();
    let id = editing.store.add_shape(frame, draft);
    info!("Added {} {} on frame {}", kind.display_name(), id, frame);
    Some(id)
}

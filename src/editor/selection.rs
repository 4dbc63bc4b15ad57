//! Click-to-select and drag-to-move for the select tool.
//!
//! Runs only while the select tool is active (see the plugin's run conditions).

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::{FrameHistoryStore, FrameIndex};
use crate::constants::HIT_TOLERANCE;

use super::params::{CameraParams, is_cursor_over_ui};
use super::session::VideoSession;
use super::state::{ActiveDrag, DragState, EditingState};

pub fn handle_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    session: Res<VideoSession>,
    mut editing: EditingState,
    camera: CameraParams,
    mut contexts: EguiContexts,
) {
    let frame = session.current_frame();
    let cursor = camera.cursor_video_pos(session.video_size);

    // A drag released outside the window still has to end
    advance_drag(
        &mut editing.drag,
        &mut editing.store,
        frame,
        cursor,
        mouse_button.pressed(MouseButton::Left),
    );

    let Some(pos) = cursor else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) {
        if is_cursor_over_ui(&mut contexts) {
            return;
        }
        let hit = editing
            .store
            .shape_at(frame, pos, HIT_TOLERANCE)
            .map(|shape| shape.id);
        editing.selection.shape = hit;
        editing.drag.active = hit.map(|shape| ActiveDrag {
            shape,
            start: pos,
            offset: Vec2::ZERO,
        });
    }
}

/// Follow the cursor while the button is held; commit the last known offset on release.
///
/// Without a cursor position the offset is left as it was.
pub(crate) fn advance_drag(
    drag: &mut DragState,
    store: &mut FrameHistoryStore,
    frame: FrameIndex,
    cursor: Option<Vec2>,
    held: bool,
) {
    let Some(mut active) = drag.active else {
        return;
    };
    if let Some(pos) = cursor {
        active.offset = pos - active.start;
    }

    if held {
        drag.active = Some(active);
        return;
    }

    // Released: one commit for the whole move
    drag.active = None;
    if store.translate_shape(frame, active.shape, active.offset) {
        debug!(
            "Moved {} by {:?} on frame {}",
            active.shape, active.offset, frame
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Geometry, ShapeDraft, ShapeId};

    fn store_with_rect() -> (FrameHistoryStore, ShapeId) {
        let mut store = FrameHistoryStore::default();
        let id = store.add_shape(
            0,
            ShapeDraft::new(
                "car",
                Color::WHITE,
                Geometry::rectangle_from_corners(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0)),
            ),
        );
        (store, id)
    }

    fn dragging(shape: ShapeId) -> DragState {
        DragState {
            active: Some(ActiveDrag {
                shape,
                start: Vec2::new(15.0, 15.0),
                offset: Vec2::ZERO,
            }),
        }
    }

    #[test]
    fn test_release_outside_window_commits_last_offset() {
        let (mut store, id) = store_with_rect();
        let mut drag = dragging(id);

        advance_drag(&mut drag, &mut store, 0, Some(Vec2::new(25.0, 15.0)), true);
        advance_drag(&mut drag, &mut store, 0, None, false);

        assert!(drag.active.is_none());
        assert_eq!(store.history_len(0), 3);
        let (min, _) = store.find_shape(0, id).unwrap().geometry.bounds();
        assert_eq!(min, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_held_drag_keeps_offset_without_cursor() {
        let (mut store, id) = store_with_rect();
        let mut drag = dragging(id);

        advance_drag(&mut drag, &mut store, 0, Some(Vec2::new(15.0, 25.0)), true);
        advance_drag(&mut drag, &mut store, 0, None, true);

        let active = drag.active.unwrap();
        assert_eq!(active.offset, Vec2::new(0.0, 10.0));
        assert_eq!(store.history_len(0), 2);
    }

    #[test]
    fn test_no_drag_is_noop() {
        let (mut store, _) = store_with_rect();
        let mut drag = DragState::default();
        advance_drag(&mut drag, &mut store, 0, None, false);
        assert_eq!(store.history_len(0), 2);
    }
}

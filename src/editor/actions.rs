//! Frame-level edit actions.
//!
//! Keyboard shortcuts and the egui panels both express edits as [`EditRequest`]
//! messages; a single system applies them so that every path into the store shares
//! the same routing rules. Each request names the frame it was issued on, since a
//! panel click is only applied on the next tick, after playback may have moved on.

use bevy::prelude::*;

use crate::annotation::{
    FrameIndex, PropagationDirection, ShapeId, adjacent_frame, paste_to_frame, propagate,
};

use super::drawing::close_polygon;
use super::session::VideoSession;
use super::state::EditingState;

#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    Undo,
    Redo,
    ClearFrame,
    CopySelected,
    /// Paste the copied shape into the current frame
    PasteHere,
    /// Paste the copied shape into the previous or next frame
    PasteAdjacent(PropagationDirection),
    /// Paste the copied shape into every frame in one direction
    Propagate(PropagationDirection),
    DeleteSelected,
    Select(Option<ShapeId>),
    Restyle {
        id: ShapeId,
        label: String,
        color: Color,
    },
    ClosePolygon,
}

/// An edit together with the frame that was on screen when it was issued
#[derive(Message, Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub frame: FrameIndex,
    pub action: EditAction,
}

impl EditRequest {
    pub fn new(frame: FrameIndex, action: EditAction) -> Self {
        Self { frame, action }
    }
}

pub fn apply_edit_actions(
    mut requests: MessageReader<EditRequest>,
    session: Res<VideoSession>,
    mut editing: EditingState,
) {
    let total = session.total_frames();

    for request in requests.read() {
        let frame = request.frame.min(session.last_frame());
        // Drawing state and the selection only ever belong to the frame on screen
        let on_screen = frame == session.current_frame();

        match &request.action {
            EditAction::Undo => {
                // A half-placed rectangle or circle goes first, then polygon points
                if on_screen && editing.pending.anchor.take().is_some() {
                    continue;
                }
                if on_screen && editing.builder.undo_point() {
                    continue;
                }
                if editing.store.undo(frame) {
                    editing.selection.clear();
                    editing.drag.active = None;
                } else {
                    debug!("Nothing to undo on frame {}", frame);
                }
            }
            EditAction::Redo => {
                if on_screen && !editing.builder.is_empty() && editing.builder.redo_point() {
                    continue;
                }
                if editing.store.redo(frame) {
                    editing.selection.clear();
                    editing.drag.active = None;
                } else if !(on_screen && editing.builder.redo_point()) {
                    debug!("Nothing to redo on frame {}", frame);
                }
            }
            EditAction::ClearFrame => {
                if editing.store.clear(frame) {
                    editing.selection.clear();
                    editing.drag.active = None;
                    info!("Cleared frame {}", frame);
                }
            }
            EditAction::CopySelected => {
                let Some(id) = editing.selection.shape.filter(|_| on_screen) else {
                    continue;
                };
                let Some(shape) = editing.store.find_shape(frame, id).cloned() else {
                    continue;
                };
                debug!("Copied {} '{}'", shape.kind().display_name(), shape.label);
                editing.clipboard.copy(&shape);
            }
            EditAction::PasteHere => {
                let Some(shape) = editing.clipboard.shape().cloned() else {
                    debug!("Paste ignored, nothing copied");
                    continue;
                };
                let id = paste_to_frame(&mut editing.store, &shape, frame);
                if on_screen {
                    editing.selection.shape = Some(id);
                }
            }
            EditAction::PasteAdjacent(direction) => {
                let Some(shape) = editing.clipboard.shape().cloned() else {
                    debug!("Paste ignored, nothing copied");
                    continue;
                };
                let Some(target) = adjacent_frame(frame, total, *direction) else {
                    debug!("No {} frame after frame {}", direction.display_name(), frame);
                    continue;
                };
                let id = paste_to_frame(&mut editing.store, &shape, target);
                info!("Pasted {} into frame {}", id, target);
            }
            EditAction::Propagate(direction) => {
                let Some(shape) = editing.clipboard.shape().cloned() else {
                    debug!("Propagation ignored, nothing copied");
                    continue;
                };
                propagate(&mut editing.store, &shape, frame, total, *direction);
            }
            EditAction::DeleteSelected => {
                if !on_screen {
                    continue;
                }
                let Some(id) = editing.selection.shape.take() else {
                    continue;
                };
                editing.drag.active = None;
                if editing.store.remove_shape(frame, id) {
                    info!("Deleted {} from frame {}", id, frame);
                }
            }
            EditAction::Select(id) => {
                if !on_screen {
                    continue;
                }
                editing.selection.shape =
                    (*id).filter(|id| editing.store.find_shape(frame, *id).is_some());
            }
            EditAction::Restyle { id, label, color } => {
                let label = editing.settings.resolve_label(label);
                let changed = editing.store.update_shape(frame, *id, |shape| {
                    shape.label = label;
                    shape.color = *color;
                });
                if changed {
                    debug!("Restyled {} on frame {}", id, frame);
                }
            }
            EditAction::ClosePolygon => {
                if on_screen {
                    close_polygon(frame, &mut editing);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{
        ActivePolygonBuilder, FrameHistoryStore, Geometry, ShapeClipboard, ShapeDraft,
    };
    use crate::constants::DEFAULT_LABEL;
    use crate::editor::session::sync_current_frame;
    use crate::editor::state::{Selection, ShapeSettings, editing_test_app};

    fn test_app() -> App {
        let mut app = editing_test_app();
        app.add_message::<EditRequest>()
            .add_systems(Update, (sync_current_frame, apply_edit_actions).chain());
        app
    }

    fn run(app: &mut App, action: EditAction) {
        let frame = app.world().resource::<VideoSession>().current_frame();
        app.world_mut().write_message(EditRequest::new(frame, action));
        app.update();
    }

    fn rect_draft() -> ShapeDraft {
        ShapeDraft::new(
            "car",
            Color::srgb(1.0, 0.0, 0.0),
            Geometry::rectangle_from_corners(Vec2::new(10.0, 10.0), Vec2::new(60.0, 60.0)),
        )
    }

    fn store(app: &App) -> &FrameHistoryStore {
        app.world().resource::<FrameHistoryStore>()
    }

    #[test]
    fn test_undo_prefers_polygon_points() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(0, rect_draft());
        {
            let mut builder = app.world_mut().resource_mut::<ActivePolygonBuilder>();
            builder.add_point(Vec2::new(0.0, 0.0));
            builder.add_point(Vec2::new(10.0, 0.0));
        }

        run(&mut app, EditAction::Undo);
        assert_eq!(app.world().resource::<ActivePolygonBuilder>().points().len(), 1);
        assert_eq!(store(&app).current_shapes(0).len(), 1);

        run(&mut app, EditAction::Undo);
        run(&mut app, EditAction::Undo);
        assert!(app.world().resource::<ActivePolygonBuilder>().is_empty());
        assert!(store(&app).current_shapes(0).is_empty());
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut app = test_app();
        let id = app
            .world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(0, rect_draft());
        app.world_mut().resource_mut::<Selection>().shape = Some(id);

        run(&mut app, EditAction::Undo);
        assert!(app.world().resource::<Selection>().shape.is_none());

        run(&mut app, EditAction::Redo);
        assert_eq!(store(&app).current_shapes(0)[0].id, id);
    }

    #[test]
    fn test_copy_then_paste_selects_new_shape() {
        let mut app = test_app();
        let id = app
            .world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(0, rect_draft());

        run(&mut app, EditAction::Select(Some(id)));
        run(&mut app, EditAction::CopySelected);
        run(&mut app, EditAction::PasteHere);

        let shapes = store(&app).current_shapes(0);
        assert_eq!(shapes.len(), 2);
        assert_ne!(shapes[1].id, id);
        assert_eq!(shapes[1].geometry, shapes[0].geometry);
        assert_eq!(
            app.world().resource::<Selection>().shape,
            Some(shapes[1].id)
        );
    }

    #[test]
    fn test_paste_without_copy_is_noop() {
        let mut app = test_app();
        run(&mut app, EditAction::PasteHere);
        run(&mut app, EditAction::Propagate(PropagationDirection::Forward));
        assert!(store(&app).annotated_frames().is_empty());
    }

    #[test]
    fn test_paste_to_next_frame_and_propagate() {
        let mut app = test_app();
        let shape = {
            let mut store = app.world_mut().resource_mut::<FrameHistoryStore>();
            let id = store.add_shape(0, rect_draft());
            store.find_shape(0, id).cloned().unwrap()
        };
        app.world_mut().resource_mut::<ShapeClipboard>().copy(&shape);

        run(&mut app, EditAction::PasteAdjacent(PropagationDirection::Forward));
        assert_eq!(store(&app).current_shapes(1).len(), 1);

        // Nothing before frame 0
        run(&mut app, EditAction::PasteAdjacent(PropagationDirection::Backward));
        assert_eq!(store(&app).annotated_frames(), vec![0, 1]);

        run(&mut app, EditAction::Propagate(PropagationDirection::Forward));
        let total = app.world().resource::<VideoSession>().total_frames();
        assert_eq!(store(&app).annotated_frames().len() as u32, total);
        assert_eq!(store(&app).current_shapes(1).len(), 2);
    }

    #[test]
    fn test_delete_selected() {
        let mut app = test_app();
        let id = app
            .world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(0, rect_draft());
        run(&mut app, EditAction::Select(Some(id)));
        run(&mut app, EditAction::DeleteSelected);

        assert!(store(&app).current_shapes(0).is_empty());
        assert!(app.world().resource::<Selection>().shape.is_none());
        assert_eq!(store(&app).history_len(0), 3);
    }

    #[test]
    fn test_select_ignores_unknown_ids() {
        let mut app = test_app();
        run(&mut app, EditAction::Select(Some(ShapeId(99))));
        assert!(app.world().resource::<Selection>().shape.is_none());
    }

    #[test]
    fn test_restyle_blank_label_uses_configured_default() {
        let mut app = test_app();
        app.world_mut().resource_mut::<ShapeSettings>().default_label = "vehicle".to_string();
        let id = app
            .world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(0, rect_draft());

        run(
            &mut app,
            EditAction::Restyle {
                id,
                label: "  ".to_string(),
                color: Color::srgb(0.0, 1.0, 0.0),
            },
        );
        let shape = store(&app).find_shape(0, id).unwrap();
        assert_eq!(shape.label, "vehicle");
        assert_eq!(shape.color, Color::srgb(0.0, 1.0, 0.0));

        // Without a configured default the built-in label is used
        app.world_mut().resource_mut::<ShapeSettings>().default_label = String::new();
        run(
            &mut app,
            EditAction::Restyle {
                id,
                label: String::new(),
                color: Color::srgb(0.0, 1.0, 0.0),
            },
        );
        assert_eq!(store(&app).find_shape(0, id).unwrap().label, DEFAULT_LABEL);
    }

    #[test]
    fn test_close_polygon_commits_closed_shape() {
        let mut app = test_app();
        {
            let mut builder = app.world_mut().resource_mut::<ActivePolygonBuilder>();
            builder.add_point(Vec2::new(0.0, 0.0));
            builder.add_point(Vec2::new(10.0, 0.0));
        }
        run(&mut app, EditAction::ClosePolygon);
        assert!(store(&app).current_shapes(0).is_empty());

        app.world_mut()
            .resource_mut::<ActivePolygonBuilder>()
            .add_point(Vec2::new(10.0, 10.0));
        run(&mut app, EditAction::ClosePolygon);

        let shapes = store(&app).current_shapes(0);
        assert!(matches!(
            shapes[0].geometry,
            Geometry::Polygon {
                is_closed: true,
                ..
            }
        ));
        assert!(app.world().resource::<ActivePolygonBuilder>().is_empty());
    }

    #[test]
    fn test_clear_frame() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(0, rect_draft());
        run(&mut app, EditAction::ClearFrame);
        assert!(store(&app).current_shapes(0).is_empty());
        assert!(store(&app).can_undo(0));
    }

    #[test]
    fn test_request_applies_to_issuing_frame_after_playhead_moves() {
        let mut app = test_app();
        let shape = {
            let mut store = app.world_mut().resource_mut::<FrameHistoryStore>();
            let id = store.add_shape(0, rect_draft());
            store.find_shape(0, id).cloned().unwrap()
        };
        app.world_mut().resource_mut::<ShapeClipboard>().copy(&shape);

        // Issued on frame 0, then playback moves on before the request is applied
        app.world_mut().write_message(EditRequest::new(0, EditAction::PasteHere));
        app.world_mut().write_message(EditRequest::new(0, EditAction::ClearFrame));
        app.world_mut().resource_mut::<VideoSession>().seek_frame(5);
        app.update();

        assert_eq!(app.world().resource::<VideoSession>().current_frame(), 5);
        assert!(store(&app).current_shapes(0).is_empty());
        assert!(!store(&app).can_redo(0));
        assert_eq!(store(&app).history_len(0), 4);
        assert!(store(&app).current_shapes(5).is_empty());
        assert!(store(&app).annotated_frames().is_empty());
    }

    #[test]
    fn test_stale_request_leaves_on_screen_state_alone() {
        let mut app = test_app();
        let id = app
            .world_mut()
            .resource_mut::<FrameHistoryStore>()
            .add_shape(3, rect_draft());
        app.world_mut().resource_mut::<VideoSession>().seek_frame(3);
        app.update();
        app.world_mut().resource_mut::<Selection>().shape = Some(id);
        app.world_mut()
            .resource_mut::<ActivePolygonBuilder>()
            .add_point(Vec2::new(1.0, 1.0));

        // Undo issued on frame 0 must not eat the point drawn on frame 3
        app.world_mut().write_message(EditRequest::new(0, EditAction::Undo));
        app.world_mut().write_message(EditRequest::new(0, EditAction::DeleteSelected));
        app.update();

        assert_eq!(app.world().resource::<ActivePolygonBuilder>().points().len(), 1);
        assert_eq!(store(&app).current_shapes(3).len(), 1);
        assert_eq!(app.world().resource::<Selection>().shape, Some(id));
    }
}

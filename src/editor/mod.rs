//! Interactive annotation editor: playback clock, drawing tools, selection and
//! gizmo rendering on top of the [`annotation`](crate::annotation) engine.

pub mod actions;
mod camera;
mod conditions;
mod drawing;
pub mod params;
mod rendering;
mod selection;
pub mod session;
mod shortcuts;
pub mod state;
pub mod tools;

pub use actions::{EditAction, EditRequest};
pub use session::{NewSessionRequest, VideoSession};
pub use state::{Selection, ShapeSettings};
pub use tools::{AnnotationTool, CurrentTool};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::annotation::{ActivePolygonBuilder, FrameHistoryStore, ShapeClipboard};
use crate::config::ConfigLoaded;
use crate::ui::DialogState;

use conditions::{drawing_tool_active, no_dialog_open, tool_is};

/// Ordering of the editor's per-frame work.
///
/// The playback step settles pending work against the frame it was drawn on before
/// any input handler gets a chance to commit.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorSystems {
    Playback,
    Input,
    Render,
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameHistoryStore>()
            .init_resource::<ActivePolygonBuilder>()
            .init_resource::<ShapeClipboard>()
            .init_resource::<VideoSession>()
            .init_resource::<CurrentTool>()
            .init_resource::<ShapeSettings>()
            .init_resource::<Selection>()
            .init_resource::<state::PendingShape>()
            .init_resource::<state::DragState>()
            .init_resource::<DialogState>()
            .add_message::<NewSessionRequest>()
            .add_message::<EditRequest>()
            .init_gizmo_group::<rendering::AnnotationGizmoGroup>()
            .configure_sets(
                Update,
                (
                    EditorSystems::Playback,
                    EditorSystems::Input,
                    EditorSystems::Render,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (
                    rendering::configure_annotation_gizmos,
                    (
                        camera::spawn_camera,
                        session::apply_config_defaults,
                        camera::fit_camera_to_video,
                    )
                        .chain()
                        .after(ConfigLoaded),
                ),
            )
            .add_systems(
                Update,
                (
                    shortcuts::handle_playback_shortcuts.run_if(no_dialog_open),
                    session::advance_playback,
                    session::sync_current_frame,
                    tools::handle_tool_shortcuts.run_if(no_dialog_open),
                    tools::settle_on_tool_change,
                    session::reset_session.run_if(on_message::<NewSessionRequest>),
                )
                    .chain()
                    .in_set(EditorSystems::Playback),
            )
            .add_systems(
                Update,
                (
                    shortcuts::handle_edit_shortcuts.run_if(no_dialog_open),
                    actions::apply_edit_actions.run_if(on_message::<EditRequest>),
                    drawing::handle_drawing
                        .run_if(drawing_tool_active)
                        .run_if(no_dialog_open),
                    selection::handle_selection
                        .run_if(tool_is(AnnotationTool::Select))
                        .run_if(no_dialog_open),
                )
                    .chain()
                    .in_set(EditorSystems::Input),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan_zoom,
                    tools::update_cursor_icon,
                    rendering::draw_video_frame,
                    rendering::render_shapes,
                    rendering::render_draw_preview,
                )
                    .in_set(EditorSystems::Render),
            )
            .add_systems(EguiPrimaryContextPass, rendering::render_shape_labels);
    }
}

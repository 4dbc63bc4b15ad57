mod dialogs;
mod shapes_panel;
mod timeline;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// Aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    config_reset: Res<ConfigResetNotification>,
    timeline: Res<timeline::TimelineState>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = config_reset.show || timeline.confirm_new_session;
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<timeline::TimelineState>()
            .init_resource::<shapes_panel::ShapeEditBuffer>()
            // Top and bottom panels span the full width, the side panel fits between them
            .add_systems(
                EguiPrimaryContextPass,
                (
                    toolbar::toolbar_ui,
                    timeline::timeline_ui,
                    shapes_panel::shapes_panel_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    dialogs::config_reset_notification_ui,
                    timeline::new_session_confirmation_ui,
                )
                    .after(shapes_panel::shapes_panel_ui),
            )
            .add_systems(First, update_dialog_state);
    }
}

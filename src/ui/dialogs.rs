use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::ConfigResetNotification;

/// Tell the user their configuration file could not be used
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuration Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.colored_label(
                egui::Color32::from_rgb(255, 190, 60),
                "Default settings are being used",
            );
            ui.add_space(8.0);
            if let Some(ref reason) = notification.reason {
                ui.label(reason);
                ui.add_space(8.0);
            }
            ui.label(
                egui::RichText::new("Saving defaults from the toolbar will overwrite the file.")
                    .weak()
                    .size(11.0),
            );
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });
    Ok(())
}

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::RememberDefaultsRequest;
use crate::editor::params::to_egui_color;
use crate::editor::{AnnotationTool, CurrentTool, ShapeSettings, VideoSession};

/// Swatches offered for new shapes and for restyling
pub const PALETTE: [(&str, Color); 8] = [
    ("Red", Color::srgb(1.0, 0.0, 0.0)),
    ("Blue", Color::srgb(0.0, 0.4, 1.0)),
    ("Green", Color::srgb(0.0, 0.8, 0.0)),
    ("Yellow", Color::srgb(1.0, 1.0, 0.0)),
    ("Orange", Color::srgb(1.0, 0.5, 0.0)),
    ("Purple", Color::srgb(0.6, 0.2, 0.8)),
    ("Cyan", Color::srgb(0.0, 0.9, 0.9)),
    ("White", Color::srgb(1.0, 1.0, 1.0)),
];

fn same_rgb(a: Color, b: Color) -> bool {
    let (a, b) = (a.to_srgba(), b.to_srgba());
    (a.red - b.red).abs() < 0.01
        && (a.green - b.green).abs() < 0.01
        && (a.blue - b.blue).abs() < 0.01
}

/// Row of palette buttons. Returns true when `color` was changed.
pub fn color_swatches(ui: &mut egui::Ui, color: &mut Color) -> bool {
    let mut changed = false;
    for (name, swatch) in PALETTE {
        let is_selected = same_rgb(*color, swatch);
        let button = egui::Button::new("")
            .fill(to_egui_color(swatch))
            .min_size(egui::vec2(18.0, 18.0))
            .stroke(if is_selected {
                egui::Stroke::new(2.0, egui::Color32::WHITE)
            } else {
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY)
            });

        let response = ui.add(button);
        if response.clicked() && !is_selected {
            *color = swatch;
            changed = true;
        }
        response.on_hover_text(name);
    }
    changed
}

/// Main toolbar: tools, label and color for new shapes
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_tool: ResMut<CurrentTool>,
    mut settings: ResMut<ShapeSettings>,
    session: Res<VideoSession>,
    mut remember_events: MessageWriter<RememberDefaultsRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                for tool in AnnotationTool::all() {
                    let button = egui::Button::new(
                        egui::RichText::new(tool.button_label()).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(current_tool.tool == *tool);

                    let response = ui.add(button);
                    if response.clicked() {
                        current_tool.tool = *tool;
                    }
                    response.on_hover_text(tool.display_name());
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                ui.label("Label:");
                ui.add(egui::TextEdit::singleline(&mut settings.label).desired_width(120.0));

                ui.add_space(8.0);
                ui.label("Color:");
                color_swatches(ui, &mut settings.color);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if ui
                    .button("Save as defaults")
                    .on_hover_text("Use this label, color, frame rate and duration for new sessions")
                    .clicked()
                {
                    let label = settings.new_shape_label();
                    settings.default_label = label.clone();
                    remember_events.write(RememberDefaultsRequest {
                        fps: session.fps(),
                        duration_secs: session.duration_secs(),
                        label,
                        color: settings.color,
                    });
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(
                            "Enter: close polygon | Esc: cancel | Ctrl+C/V: copy/paste",
                        )
                        .color(egui::Color32::GRAY)
                        .size(11.0),
                    );
                });
            });
        });
    Ok(())
}

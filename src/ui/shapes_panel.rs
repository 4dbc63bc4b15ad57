//! Right panel listing the shapes of the current frame.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::annotation::{FrameHistoryStore, ShapeClipboard, ShapeId};
use crate::editor::params::to_egui_color;
use crate::editor::{EditAction, EditRequest, Selection, VideoSession};

use super::toolbar::color_swatches;

/// Edit buffer for the selected shape's label and color.
///
/// Edits only reach the store when applied, as a single commit.
#[derive(Resource, Default)]
pub struct ShapeEditBuffer {
    pub shape: Option<ShapeId>,
    pub label: String,
    pub color: Color,
}

pub fn shapes_panel_ui(
    mut contexts: EguiContexts,
    session: Res<VideoSession>,
    store: Res<FrameHistoryStore>,
    selection: Res<Selection>,
    clipboard: Res<ShapeClipboard>,
    mut buffer: ResMut<ShapeEditBuffer>,
    mut requests: MessageWriter<EditRequest>,
) -> Result {
    let frame = session.current_frame();
    let shapes = store.current_shapes(frame);
    let selected = selection
        .shape
        .and_then(|id| shapes.iter().find(|shape| shape.id == id));

    // Refill the buffer whenever a different shape gets selected
    if buffer.shape != selected.map(|shape| shape.id) {
        match selected {
            Some(shape) => {
                buffer.shape = Some(shape.id);
                buffer.label = shape.label.clone();
                buffer.color = shape.color;
            }
            None => *buffer = ShapeEditBuffer::default(),
        }
    }

    egui::SidePanel::right("shapes_panel")
        .default_width(220.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(format!("Frame {}", frame)).heading().size(18.0));
            ui.label(
                egui::RichText::new(format!(
                    "{} shape(s), {} revision(s)",
                    shapes.len(),
                    store.history_len(frame) - 1
                ))
                .weak()
                .size(11.0),
            );
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            if shapes.is_empty() {
                ui.label(egui::RichText::new("No shapes on this frame").weak().italics());
            }

            egui::ScrollArea::vertical()
                .max_height(ui.available_height() * 0.5)
                .show(ui, |ui| {
                    for shape in shapes {
                        let is_selected = selection.shape == Some(shape.id);
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new("■").color(to_egui_color(shape.color)));
                            let text = format!(
                                "{} {} ({})",
                                shape.label,
                                shape.id,
                                shape.kind().display_name()
                            );
                            if ui.selectable_label(is_selected, text).clicked() {
                                let target = if is_selected { None } else { Some(shape.id) };
                                requests.write(EditRequest::new(frame, EditAction::Select(target)));
                            }
                        });
                    }
                });

            if let Some(id) = buffer.shape {
                ui.add_space(8.0);
                ui.separator();
                ui.label(egui::RichText::new(format!("Selected {}", id)).strong());
                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    ui.label("Label:");
                    ui.text_edit_singleline(&mut buffer.label);
                });
                ui.horizontal_wrapped(|ui| {
                    color_swatches(ui, &mut buffer.color);
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let dirty = selected
                        .is_some_and(|shape| shape.label != buffer.label || shape.color != buffer.color);
                    if ui.add_enabled(dirty, egui::Button::new("Apply")).clicked() {
                        requests.write(EditRequest::new(
                            frame,
                            EditAction::Restyle {
                                id,
                                label: buffer.label.clone(),
                                color: buffer.color,
                            },
                        ));
                    }
                    if ui.button("Copy").on_hover_text("Ctrl+C").clicked() {
                        requests.write(EditRequest::new(frame, EditAction::CopySelected));
                    }
                    if ui.button("Delete").on_hover_text("Delete / Backspace").clicked() {
                        requests.write(EditRequest::new(frame, EditAction::DeleteSelected));
                    }
                });
            }

            ui.add_space(8.0);
            ui.separator();
            let copied = match clipboard.shape() {
                Some(shape) => format!(
                    "Copied: {} ({})",
                    shape.label,
                    shape.kind().display_name()
                ),
                None => "Nothing copied".to_string(),
            };
            ui.label(egui::RichText::new(copied).weak().size(11.0));
        });
    Ok(())
}

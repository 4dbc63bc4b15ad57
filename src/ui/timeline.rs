//! Bottom panel: playback controls, frame scrubbing and frame-level edits.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::annotation::{
    ActivePolygonBuilder, FrameHistoryStore, FrameIndex, PropagationDirection, ShapeClipboard,
};
use crate::constants::{MAX_DURATION_SECS, MAX_FPS};
use crate::editor::state::PendingShape;
use crate::editor::{EditAction, EditRequest, NewSessionRequest, VideoSession};

const MARKER_STRIP_HEIGHT: f32 = 8.0;
const MARKER_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 190, 60);
const PLAYHEAD_COLOR: egui::Color32 = egui::Color32::WHITE;

#[derive(Resource, Default)]
pub struct TimelineState {
    pub confirm_new_session: bool,
}

/// Frame at horizontal position `x` of a strip spanning `rect`
fn frame_at(x: f32, rect: egui::Rect, total_frames: u32) -> FrameIndex {
    if total_frames == 0 || rect.width() <= 0.0 {
        return 0;
    }
    let t = ((x - rect.left()) / rect.width()).clamp(0.0, 1.0);
    ((t * total_frames as f32) as FrameIndex).min(total_frames - 1)
}

fn frame_x(frame: FrameIndex, rect: egui::Rect, total_frames: u32) -> f32 {
    let t = (frame as f32 + 0.5) / total_frames.max(1) as f32;
    rect.left() + t * rect.width()
}

/// Thin strip with a tick for every frame that holds shapes. Click to seek.
fn annotated_frame_strip(
    ui: &mut egui::Ui,
    annotated: &[FrameIndex],
    current: FrameIndex,
    total_frames: u32,
) -> Option<FrameIndex> {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), MARKER_STRIP_HEIGHT),
        egui::Sense::click(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, egui::Color32::from_gray(40));

    for frame in annotated {
        let x = frame_x(*frame, rect, total_frames);
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            egui::Stroke::new(2.0, MARKER_COLOR),
        );
    }
    let x = frame_x(current, rect, total_frames);
    painter.line_segment(
        [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
        egui::Stroke::new(1.0, PLAYHEAD_COLOR),
    );

    let response = response.on_hover_text(format!("{} annotated frame(s)", annotated.len()));
    if response.clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        return Some(frame_at(pos.x, rect, total_frames));
    }
    None
}

#[allow(clippy::too_many_arguments)]
pub fn timeline_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<VideoSession>,
    mut timeline: ResMut<TimelineState>,
    store: Res<FrameHistoryStore>,
    builder: Res<ActivePolygonBuilder>,
    pending: Res<PendingShape>,
    clipboard: Res<ShapeClipboard>,
    mut requests: MessageWriter<EditRequest>,
) -> Result {
    let frame = session.current_frame();
    let total = session.total_frames();
    let annotated = store.annotated_frames();

    egui::TopBottomPanel::bottom("timeline")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            // Playback row
            ui.horizontal(|ui| {
                if ui.button("|<").on_hover_text("Previous frame (Left)").clicked() {
                    session.step_frames(-1);
                }
                let play_label = if session.playing { "Pause" } else { "Play" };
                if ui
                    .add(egui::Button::new(play_label).min_size(egui::vec2(52.0, 0.0)))
                    .on_hover_text("Play/Pause (Space)")
                    .clicked()
                {
                    session.toggle_playing();
                }
                if ui.button(">|").on_hover_text("Next frame (Right)").clicked() {
                    session.step_frames(1);
                }

                ui.add_space(8.0);

                let mut scrub = session.playhead_frame();
                let readout_width = 190.0;
                ui.spacing_mut().slider_width = (ui.available_width() - readout_width).max(50.0);
                let slider = ui.add(
                    egui::Slider::new(&mut scrub, 0..=session.last_frame()).show_value(false),
                );
                if slider.changed() {
                    session.playing = false;
                    session.seek_frame(scrub);
                }

                ui.label(
                    egui::RichText::new(format!(
                        "Frame {} / {}  ({:.2}s)",
                        frame,
                        total,
                        session.time_secs
                    ))
                    .monospace(),
                );
            });

            if let Some(target) = annotated_frame_strip(ui, &annotated, frame, total) {
                session.playing = false;
                session.seek_frame(target);
            }

            ui.add_space(4.0);

            // Settings and edit row
            ui.horizontal(|ui| {
                ui.label("FPS:");
                let mut fps = session.fps();
                if ui
                    .add(egui::DragValue::new(&mut fps).range(1..=MAX_FPS).speed(0.2))
                    .on_hover_text("Changing the frame rate does not move existing annotations")
                    .changed()
                {
                    session.set_fps(fps);
                }

                ui.label("Duration:");
                let mut duration = session.duration_secs();
                if ui
                    .add(
                        egui::DragValue::new(&mut duration)
                            .range(0.0..=MAX_DURATION_SECS)
                            .speed(0.1)
                            .suffix(" s"),
                    )
                    .changed()
                {
                    session.set_duration(duration);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let can_undo =
                    pending.anchor.is_some() || builder.can_undo_point() || store.can_undo(frame);
                if ui
                    .add_enabled(can_undo, egui::Button::new("Undo"))
                    .on_hover_text("Ctrl+Z")
                    .clicked()
                {
                    requests.write(EditRequest::new(frame, EditAction::Undo));
                }
                let can_redo = store.can_redo(frame) || builder.can_redo_point();
                if ui
                    .add_enabled(can_redo, egui::Button::new("Redo"))
                    .on_hover_text("Ctrl+Y / Ctrl+Shift+Z")
                    .clicked()
                {
                    requests.write(EditRequest::new(frame, EditAction::Redo));
                }
                if ui
                    .add_enabled(
                        !store.current_shapes(frame).is_empty(),
                        egui::Button::new("Clear frame"),
                    )
                    .clicked()
                {
                    requests.write(EditRequest::new(frame, EditAction::ClearFrame));
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                ui.add_enabled_ui(!clipboard.is_empty(), |ui| {
                    if ui
                        .button("Paste to previous")
                        .on_hover_text("Shift+Left")
                        .clicked()
                    {
                        requests.write(EditRequest::new(
                            frame,
                            EditAction::PasteAdjacent(PropagationDirection::Backward),
                        ));
                    }
                    if ui.button("Paste").on_hover_text("Ctrl+V").clicked() {
                        requests.write(EditRequest::new(frame, EditAction::PasteHere));
                    }
                    if ui
                        .button("Paste to next")
                        .on_hover_text("Shift+Right")
                        .clicked()
                    {
                        requests.write(EditRequest::new(
                            frame,
                            EditAction::PasteAdjacent(PropagationDirection::Forward),
                        ));
                    }

                    ui.add_space(4.0);

                    if ui
                        .button("Propagate to all previous")
                        .on_hover_text("Paste into every frame before this one")
                        .clicked()
                    {
                        requests.write(EditRequest::new(
                            frame,
                            EditAction::Propagate(PropagationDirection::Backward),
                        ));
                    }
                    if ui
                        .button("Propagate to all next")
                        .on_hover_text("Paste into every frame after this one")
                        .clicked()
                    {
                        requests.write(EditRequest::new(
                            frame,
                            EditAction::Propagate(PropagationDirection::Forward),
                        ));
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("New Session").clicked() {
                        timeline.confirm_new_session = true;
                    }
                });
            });
        });
    Ok(())
}

pub fn new_session_confirmation_ui(
    mut contexts: EguiContexts,
    mut timeline: ResMut<TimelineState>,
    store: Res<FrameHistoryStore>,
    mut new_session_events: MessageWriter<NewSessionRequest>,
) -> Result {
    if !timeline.confirm_new_session {
        return Ok(());
    }

    let annotated = store.annotated_frames().len();
    egui::Window::new("New Session")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(format!(
                "Discard all annotations ({} annotated frame(s)) and start over?",
                annotated
            ));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Discard").clicked() {
                    new_session_events.write(NewSessionRequest);
                    timeline.confirm_new_session = false;
                }
                if ui.button("Cancel").clicked() {
                    timeline.confirm_new_session = false;
                }
            });
        });
    Ok(())
}

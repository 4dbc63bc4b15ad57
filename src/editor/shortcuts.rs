//! Keyboard shortcuts for editing and playback.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::PropagationDirection;

use super::actions::{EditAction, EditRequest};
use super::params::is_typing_in_ui;
use super::session::VideoSession;
use super::state::EditingState;

/// Map the current key state to at most one edit action
fn edit_action_for_keys(keyboard: &ButtonInput<KeyCode>) -> Option<EditAction> {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl {
        if keyboard.just_pressed(KeyCode::KeyZ) {
            return Some(if shift {
                EditAction::Redo
            } else {
                EditAction::Undo
            });
        }
        if keyboard.just_pressed(KeyCode::KeyY) {
            return Some(EditAction::Redo);
        }
        if keyboard.just_pressed(KeyCode::KeyC) {
            return Some(EditAction::CopySelected);
        }
        if keyboard.just_pressed(KeyCode::KeyV) {
            return Some(EditAction::PasteHere);
        }
        return None;
    }

    if shift {
        if keyboard.just_pressed(KeyCode::ArrowLeft) {
            return Some(EditAction::PasteAdjacent(PropagationDirection::Backward));
        }
        if keyboard.just_pressed(KeyCode::ArrowRight) {
            return Some(EditAction::PasteAdjacent(PropagationDirection::Forward));
        }
    }

    if keyboard.just_pressed(KeyCode::Enter) || keyboard.just_pressed(KeyCode::NumpadEnter) {
        return Some(EditAction::ClosePolygon);
    }
    if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        return Some(EditAction::DeleteSelected);
    }
    None
}

pub fn handle_edit_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<VideoSession>,
    mut requests: MessageWriter<EditRequest>,
    mut contexts: EguiContexts,
) {
    // Don't trigger if typing in UI
    if is_typing_in_ui(&mut contexts) {
        return;
    }

    if let Some(action) = edit_action_for_keys(&keyboard) {
        requests.write(EditRequest::new(session.current_frame(), action));
    }
}

/// Space toggles playback, Left/Right step one frame, Escape abandons the current shape
pub fn handle_playback_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<VideoSession>,
    mut editing: EditingState,
    mut contexts: EguiContexts,
) {
    if is_typing_in_ui(&mut contexts) {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    if ctrl {
        return;
    }

    if keyboard.just_pressed(KeyCode::Space) {
        session.toggle_playing();
    }

    // Shift+arrows are paste shortcuts
    if !shift {
        if keyboard.just_pressed(KeyCode::ArrowLeft) {
            session.step_frames(-1);
        } else if keyboard.just_pressed(KeyCode::ArrowRight) {
            session.step_frames(1);
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        editing.settle(session.current_frame());
    }
}

//! Run conditions for the editor's input systems.

use bevy::prelude::*;

use crate::editor::tools::{AnnotationTool, CurrentTool};
use crate::ui::DialogState;

/// Run condition: returns true when the current tool matches the specified tool.
///
/// Usage: `.run_if(tool_is(AnnotationTool::Select))`
pub fn tool_is(tool: AnnotationTool) -> impl FnMut(Res<CurrentTool>) -> bool + Clone {
    move |current: Res<CurrentTool>| current.tool == tool
}

/// Run condition: returns true while one of the shape drawing tools is active
pub fn drawing_tool_active(current: Res<CurrentTool>) -> bool {
    current.tool.is_drawing_tool()
}

/// Run condition: returns true when no modal dialog is open.
///
/// Keeps clicks and shortcuts aimed at a dialog from reaching the video.
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}

use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use super::params::{is_cursor_over_ui, is_typing_in_ui};
use super::session::VideoSession;
use super::state::EditingState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationTool {
    /// Drawing disabled; click to select and drag to move
    #[default]
    Select,
    Polygon,
    Rectangle,
    Circle,
}

impl AnnotationTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnnotationTool::Select => "Select (V)",
            AnnotationTool::Polygon => "Polygon (P)",
            AnnotationTool::Rectangle => "Rectangle (R)",
            AnnotationTool::Circle => "Circle (C)",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            AnnotationTool::Select => "Select [V]",
            AnnotationTool::Polygon => "Polygon [P]",
            AnnotationTool::Rectangle => "Rectangle [R]",
            AnnotationTool::Circle => "Circle [C]",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            AnnotationTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            AnnotationTool::Polygon | AnnotationTool::Rectangle | AnnotationTool::Circle => {
                CursorIcon::System(SystemCursorIcon::Crosshair)
            }
        }
    }

    pub fn all() -> &'static [AnnotationTool] {
        &[
            AnnotationTool::Select,
            AnnotationTool::Polygon,
            AnnotationTool::Rectangle,
            AnnotationTool::Circle,
        ]
    }

    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, AnnotationTool::Select)
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: AnnotationTool,
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if is_typing_in_ui(&mut contexts) {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if ctrl {
        return;
    }

    let new_tool = if keyboard.just_pressed(KeyCode::KeyV) {
        Some(AnnotationTool::Select)
    } else if keyboard.just_pressed(KeyCode::KeyP) {
        Some(AnnotationTool::Polygon)
    } else if keyboard.just_pressed(KeyCode::KeyR) {
        Some(AnnotationTool::Rectangle)
    } else if keyboard.just_pressed(KeyCode::KeyC) {
        Some(AnnotationTool::Circle)
    } else {
        None
    };

    if let Some(tool) = new_tool
        && tool != current_tool.tool
    {
        current_tool.tool = tool;
    }
}

/// Settle pending drawing work whenever the tool changes, whoever changed it
pub fn settle_on_tool_change(
    current_tool: Res<CurrentTool>,
    mut previous: Local<AnnotationTool>,
    session: Res<VideoSession>,
    mut editing: EditingState,
) {
    if current_tool.tool == *previous {
        return;
    }
    debug!("Tool {:?} -> {:?}", *previous, current_tool.tool);
    *previous = current_tool.tool;
    editing.settle(session.current_frame());
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok(entity) = window_query.single() else {
        return;
    };

    // Use default cursor over UI, tool cursor over the video
    let icon = if is_cursor_over_ui(&mut contexts) {
        CursorIcon::System(SystemCursorIcon::Default)
    } else {
        current_tool.tool.cursor_icon()
    };
    commands.entity(entity).insert(icon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{ActivePolygonBuilder, FrameHistoryStore};
    use crate::editor::state::{PendingShape, ShapeSettings, editing_test_app};

    fn tool_change_app() -> App {
        let mut app = editing_test_app();
        app.init_resource::<CurrentTool>()
            .add_systems(Update, settle_on_tool_change);
        app
    }

    fn switch_tool(app: &mut App, tool: AnnotationTool) {
        app.world_mut().resource_mut::<CurrentTool>().tool = tool;
        app.update();
    }

    #[test]
    fn test_display_names_contain_shortcuts() {
        for tool in AnnotationTool::all() {
            let name = tool.display_name();
            assert!(name.contains('('), "Display name should contain shortcut: {}", name);
            assert!(name.contains(')'), "Display name should contain shortcut: {}", name);
        }
    }

    #[test]
    fn test_default_tool_is_select() {
        assert_eq!(AnnotationTool::default(), AnnotationTool::Select);
        assert_eq!(CurrentTool::default().tool, AnnotationTool::Select);
    }

    #[test]
    fn test_select_is_the_only_non_drawing_tool() {
        let drawing: Vec<_> = AnnotationTool::all()
            .iter()
            .filter(|tool| tool.is_drawing_tool())
            .collect();
        assert_eq!(drawing.len(), 3);
        assert!(!AnnotationTool::Select.is_drawing_tool());
    }

    #[test]
    fn test_drawing_tools_have_crosshair() {
        for tool in [
            AnnotationTool::Polygon,
            AnnotationTool::Rectangle,
            AnnotationTool::Circle,
        ] {
            assert_eq!(
                tool.cursor_icon(),
                CursorIcon::System(SystemCursorIcon::Crosshair)
            );
        }
    }

    #[test]
    fn test_tool_change_discards_pending_anchor() {
        let mut app = tool_change_app();
        switch_tool(&mut app, AnnotationTool::Rectangle);
        app.world_mut().resource_mut::<PendingShape>().anchor = Some(Vec2::new(5.0, 5.0));

        switch_tool(&mut app, AnnotationTool::Circle);

        assert!(app.world().resource::<PendingShape>().anchor.is_none());
        assert!(app.world().resource::<FrameHistoryStore>().annotated_frames().is_empty());
    }

    #[test]
    fn test_tool_change_finalizes_polygon_on_current_frame() {
        let mut app = tool_change_app();
        switch_tool(&mut app, AnnotationTool::Polygon);
        {
            let mut builder = app.world_mut().resource_mut::<ActivePolygonBuilder>();
            builder.add_point(Vec2::new(0.0, 0.0));
            builder.add_point(Vec2::new(30.0, 0.0));
        }

        switch_tool(&mut app, AnnotationTool::Select);

        assert!(app.world().resource::<ActivePolygonBuilder>().is_empty());
        let store = app.world().resource::<FrameHistoryStore>();
        assert_eq!(store.annotated_frames(), vec![0]);
        assert_eq!(store.current_shapes(0)[0].label, ShapeSettings::default().label);
    }

    #[test]
    fn test_same_tool_keeps_pending_anchor() {
        let mut app = tool_change_app();
        switch_tool(&mut app, AnnotationTool::Rectangle);
        app.world_mut().resource_mut::<PendingShape>().anchor = Some(Vec2::new(5.0, 5.0));

        app.update();

        assert!(app.world().resource::<PendingShape>().anchor.is_some());
    }
}

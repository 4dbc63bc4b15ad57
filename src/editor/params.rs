//! Cursor access and the mapping between world space and video pixel space.
//!
//! The video frame is drawn centered on the world origin. Video space has its origin
//! at the frame's top-left corner with y pointing down; world space is Bevy's y-up.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContexts, egui};

use super::camera::EditorCamera;

pub fn video_to_world(point: Vec2, video_size: Vec2) -> Vec2 {
    Vec2::new(point.x - video_size.x / 2.0, video_size.y / 2.0 - point.y)
}

pub fn world_to_video(point: Vec2, video_size: Vec2) -> Vec2 {
    Vec2::new(point.x + video_size.x / 2.0, video_size.y / 2.0 - point.y)
}

/// Bundled camera and window queries for cursor-to-video calculations
#[derive(SystemParam)]
pub struct CameraParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<EditorCamera>>,
}

impl CameraParams<'_, '_> {
    /// Get the world position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Cursor position in video pixels, clamped to the frame
    pub fn cursor_video_pos(&self, video_size: Vec2) -> Option<Vec2> {
        let world = self.cursor_world_pos()?;
        Some(world_to_video(world, video_size).clamp(Vec2::ZERO, video_size))
    }

    /// Screen position of a video-space point (for egui overlays)
    pub fn video_to_screen(&self, point: Vec2, video_size: Vec2) -> Option<Vec2> {
        let (camera, transform) = self.camera.single().ok()?;
        let world = video_to_world(point, video_size);
        camera.world_to_viewport(transform, world.extend(0.0)).ok()
    }
}

pub fn to_egui_color(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Check if egui is consuming keyboard input (e.g. a focused text field)
pub fn is_typing_in_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_video_origin_is_top_left_of_frame() {
        assert_eq!(video_to_world(Vec2::ZERO, SIZE), Vec2::new(-640.0, 360.0));
        assert_eq!(video_to_world(SIZE, SIZE), Vec2::new(640.0, -360.0));
    }

    #[test]
    fn test_world_video_round_trip() {
        let point = Vec2::new(123.0, 456.0);
        assert_eq!(world_to_video(video_to_world(point, SIZE), SIZE), point);
    }
}

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::params::is_cursor_over_ui;
use super::session::VideoSession;

/// Extra room around the video frame when fitting the view
const FIT_MARGIN: f32 = 1.25;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

#[derive(Component)]
pub struct EditorCamera;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Zoom out far enough that the whole frame fits the window
pub fn fit_camera_to_video(
    session: Res<VideoSession>,
    windows: Query<&Window>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<EditorCamera>>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    let fit = (session.video_size / window.size()).max_element() * FIT_MARGIN;
    if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scale = fit.clamp(MIN_ZOOM, MAX_ZOOM);
    }
    transform.translation.x = 0.0;
    transform.translation.y = 0.0;
}

/// Middle mouse drag pans, wheel zooms
pub fn camera_pan_zoom(
    mouse_button: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<EditorCamera>>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };
    let Projection::Orthographic(ref mut ortho) = *projection else {
        return;
    };

    if mouse_button.pressed(MouseButton::Middle) {
        let delta = motion.delta * ortho.scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
    }

    let scroll_amount = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y * 0.1,
        MouseScrollUnit::Pixel => scroll.delta.y * 0.001,
    };
    if scroll_amount != 0.0 && !is_cursor_over_ui(&mut contexts) {
        ortho.scale = (ortho.scale * (1.0 - scroll_amount)).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

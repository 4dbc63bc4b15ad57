//! Gizmo rendering of the current frame's shapes and of in-progress drawing.
//!
//! Nothing here mutates annotation state. Drag offsets and builder points are shown
//! as previews; they only reach the store through a commit.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::annotation::{ActivePolygonBuilder, FrameHistoryStore, Geometry, Shape};
use crate::constants::POLYGON_CLOSE_RADIUS;

use super::params::{CameraParams, to_egui_color, video_to_world};
use super::session::VideoSession;
use super::state::{DragState, PendingShape, Selection, ShapeSettings};
use super::tools::{AnnotationTool, CurrentTool};

const FRAME_OUTLINE_COLOR: Color = Color::srgba(0.8, 0.8, 0.8, 0.6);
const SELECTION_COLOR: Color = Color::srgb(1.0, 0.85, 0.1);
const VERTEX_RADIUS: f32 = 3.0;
const SELECTION_PADDING: f32 = 4.0;

/// Gizmo group for annotation shapes
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct AnnotationGizmoGroup;

pub fn configure_annotation_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<AnnotationGizmoGroup>();
    config.line.width = 2.0;
}

/// Draw `geometry` (video space) as world-space gizmos
fn draw_geometry(
    gizmos: &mut Gizmos<AnnotationGizmoGroup>,
    geometry: &Geometry,
    video_size: Vec2,
    color: Color,
) {
    match geometry {
        Geometry::Polygon { points, is_closed } => {
            let mut world: Vec<Vec2> = points
                .iter()
                .map(|p| video_to_world(*p, video_size))
                .collect();
            if *is_closed && let Some(first) = world.first().copied() {
                world.push(first);
            }
            gizmos.linestrip_2d(world, color);
        }
        Geometry::Rectangle { origin, size } => {
            let center = video_to_world(*origin + *size / 2.0, video_size);
            gizmos.rect_2d(Isometry2d::from_translation(center), *size, color);
        }
        Geometry::Circle { center, radius } => {
            let center = video_to_world(*center, video_size);
            gizmos.circle_2d(Isometry2d::from_translation(center), *radius, color);
        }
    }
}

/// Geometry as currently displayed, including an in-flight drag
fn displayed_geometry(shape: &Shape, drag: &DragState) -> Geometry {
    let mut geometry = shape.geometry.clone();
    if let Some(active) = drag.active
        && active.shape == shape.id
    {
        geometry.translate(active.offset);
    }
    geometry
}

pub fn draw_video_frame(mut gizmos: Gizmos<AnnotationGizmoGroup>, session: Res<VideoSession>) {
    gizmos.rect_2d(
        Isometry2d::IDENTITY,
        session.video_size,
        FRAME_OUTLINE_COLOR,
    );
}

pub fn render_shapes(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    session: Res<VideoSession>,
    store: Res<FrameHistoryStore>,
    selection: Res<Selection>,
    drag: Res<DragState>,
) {
    let frame = session.current_frame();
    for shape in store.current_shapes(frame) {
        let geometry = displayed_geometry(shape, &drag);
        draw_geometry(&mut gizmos, &geometry, session.video_size, shape.color);

        if selection.shape == Some(shape.id) {
            let (min, max) = geometry.bounds();
            let padding = Vec2::splat(SELECTION_PADDING);
            let bounds = Geometry::rectangle_from_corners(min - padding, max + padding);
            draw_geometry(&mut gizmos, &bounds, session.video_size, SELECTION_COLOR);
        }
    }
}

/// Preview of the polygon being built and of a half-placed rectangle or circle
pub fn render_draw_preview(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    current_tool: Res<CurrentTool>,
    session: Res<VideoSession>,
    builder: Res<ActivePolygonBuilder>,
    pending: Res<PendingShape>,
    settings: Res<ShapeSettings>,
    camera: CameraParams,
) {
    let video_size = session.video_size;
    let color = settings.color;
    let preview_color = color.with_alpha(0.5);
    let cursor = camera.cursor_video_pos(video_size);

    let points = builder.points();
    if let Some(first) = points.first().copied() {
        draw_geometry(
            &mut gizmos,
            &Geometry::Polygon {
                points: points.to_vec(),
                is_closed: false,
            },
            video_size,
            color,
        );
        for point in points {
            gizmos.circle_2d(
                Isometry2d::from_translation(video_to_world(*point, video_size)),
                VERTEX_RADIUS,
                color,
            );
        }

        if let Some(cursor) = cursor
            && current_tool.tool == AnnotationTool::Polygon
        {
            let closing = builder.can_close()
                && builder.near_first_point(cursor, POLYGON_CLOSE_RADIUS);
            let target = if closing { first } else { cursor };
            if let Some(last) = points.last() {
                gizmos.line_2d(
                    video_to_world(*last, video_size),
                    video_to_world(target, video_size),
                    preview_color,
                );
            }
            if closing {
                gizmos.circle_2d(
                    Isometry2d::from_translation(video_to_world(first, video_size)),
                    POLYGON_CLOSE_RADIUS,
                    SELECTION_COLOR,
                );
            }
        }
    }

    render_pending_shape(
        &mut gizmos,
        &pending,
        current_tool.tool,
        cursor,
        video_size,
        preview_color,
    );
}

fn render_pending_shape(
    gizmos: &mut Gizmos<AnnotationGizmoGroup>,
    pending: &PendingShape,
    tool: AnnotationTool,
    cursor: Option<Vec2>,
    video_size: Vec2,
    color: Color,
) {
    let (Some(anchor), Some(cursor)) = (pending.anchor, cursor) else {
        return;
    };
    let geometry = match tool {
        AnnotationTool::Rectangle => Geometry::rectangle_from_corners(anchor, cursor),
        AnnotationTool::Circle => Geometry::circle_through(anchor, cursor),
        AnnotationTool::Select | AnnotationTool::Polygon => return,
    };
    draw_geometry(gizmos, &geometry, video_size, color);
}

/// Shape labels drawn with egui next to each shape's top-left corner
#[allow(clippy::too_many_arguments)]
pub fn render_shape_labels(
    mut contexts: EguiContexts,
    session: Res<VideoSession>,
    store: Res<FrameHistoryStore>,
    builder: Res<ActivePolygonBuilder>,
    selection: Res<Selection>,
    drag: Res<DragState>,
    settings: Res<ShapeSettings>,
    camera: CameraParams,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let frame = session.current_frame();
    for shape in store.current_shapes(frame) {
        let geometry = displayed_geometry(shape, &drag);
        let (min, _) = geometry.bounds();
        let Some(screen_pos) = camera.video_to_screen(min, session.video_size) else {
            continue;
        };

        let mut text = egui::RichText::new(format!("{} {}", shape.label, shape.id))
            .color(to_egui_color(shape.color))
            .size(13.0);
        if selection.shape == Some(shape.id) {
            text = text.strong();
        }

        egui::Area::new(egui::Id::new(("shape_label", shape.id.0)))
            .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y))
            .pivot(egui::Align2::LEFT_BOTTOM)
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(text);
            });
    }

    // Label the polygon in progress with the label it will receive
    if let Some(first) = builder.points().first()
        && let Some(screen_pos) = camera.video_to_screen(*first, session.video_size)
    {
        egui::Area::new(egui::Id::new("pending_polygon_label"))
            .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y))
            .pivot(egui::Align2::LEFT_BOTTOM)
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(&settings.label)
                        .color(to_egui_color(settings.color.with_alpha(0.5)))
                        .italics()
                        .size(13.0),
                );
            });
    }
}

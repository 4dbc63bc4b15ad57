//! Geometry model for frame annotations.
//!
//! All coordinates are in native video pixel space: origin at the top-left of the
//! frame, y growing downwards. Converting to screen/world space is the job of the
//! editor layer.

use std::fmt;

use bevy::prelude::*;

use crate::constants::{DEFAULT_LABEL, MIN_SHAPE_SIZE};

/// Session-unique identifier of a committed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out monotonically increasing shape ids
#[derive(Debug, Default)]
pub struct ShapeIdAllocator {
    next: u64,
}

impl ShapeIdAllocator {
    pub fn allocate(&mut self) -> ShapeId {
        self.next += 1;
        ShapeId(self.next)
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Polygon,
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
        }
    }
}

/// The geometric part of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Ordered vertices. `is_closed == false` is a polygon that was finalized
    /// without an explicit closing click.
    Polygon { points: Vec<Vec2>, is_closed: bool },
    /// `origin` is the top-left corner
    Rectangle { origin: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl Geometry {
    /// Rectangle spanning two arbitrary corners, normalized so the size is non-negative
    pub fn rectangle_from_corners(a: Vec2, b: Vec2) -> Self {
        Geometry::Rectangle {
            origin: a.min(b),
            size: (a - b).abs(),
        }
    }

    /// Circle centered on `center` passing through `edge`
    pub fn circle_through(center: Vec2, edge: Vec2) -> Self {
        Geometry::Circle {
            center,
            radius: center.distance(edge),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Polygon { .. } => ShapeKind::Polygon,
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Zero-area rectangles and circles (e.g. from a double click on one spot)
    pub fn is_degenerate(&self) -> bool {
        match self {
            Geometry::Polygon { points, .. } => points.is_empty(),
            Geometry::Rectangle { size, .. } => {
                size.x < MIN_SHAPE_SIZE || size.y < MIN_SHAPE_SIZE
            }
            Geometry::Circle { radius, .. } => *radius < MIN_SHAPE_SIZE,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Geometry::Polygon { points, .. } => {
                for p in points.iter_mut() {
                    *p += delta;
                }
            }
            Geometry::Rectangle { origin, .. } => *origin += delta,
            Geometry::Circle { center, .. } => *center += delta,
        }
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match self {
            Geometry::Polygon { points, .. } => {
                let Some(first) = points.first() else {
                    return (Vec2::ZERO, Vec2::ZERO);
                };
                points
                    .iter()
                    .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)))
            }
            Geometry::Rectangle { origin, size } => (*origin, *origin + *size),
            Geometry::Circle { center, radius } => {
                (*center - Vec2::splat(*radius), *center + Vec2::splat(*radius))
            }
        }
    }

    /// Hit test in video space. Open polygons are hit along their edges only.
    pub fn contains(&self, point: Vec2, tolerance: f32) -> bool {
        match self {
            Geometry::Polygon { points, is_closed } => {
                if *is_closed && points.len() >= 3 && point_in_polygon(point, points) {
                    return true;
                }
                if points.len() == 1 {
                    return points[0].distance(point) <= tolerance;
                }
                let closing = if *is_closed {
                    points.last().zip(points.first())
                } else {
                    None
                };
                points
                    .windows(2)
                    .map(|w| (&w[0], &w[1]))
                    .chain(closing)
                    .any(|(a, b)| point_near_segment(point, *a, *b, tolerance))
            }
            Geometry::Rectangle { origin, size } => {
                let min = *origin - Vec2::splat(tolerance);
                let max = *origin + *size + Vec2::splat(tolerance);
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
            Geometry::Circle { center, radius } => center.distance(point) <= radius + tolerance,
        }
    }
}

/// Even-odd ray casting test
fn point_in_polygon(point: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn point_near_segment(point: Vec2, seg_start: Vec2, seg_end: Vec2, threshold: f32) -> bool {
    let line_vec = seg_end - seg_start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        return point.distance(seg_start) <= threshold;
    }

    let t = ((point - seg_start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    point.distance(seg_start + line_vec * t) <= threshold
}

/// A shape that has not been committed yet and therefore has no id
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub label: String,
    pub color: Color,
    pub geometry: Geometry,
}

impl ShapeDraft {
    pub fn new(label: impl Into<String>, color: Color, geometry: Geometry) -> Self {
        let label = label.into();
        let label = if label.trim().is_empty() {
            DEFAULT_LABEL.to_string()
        } else {
            label
        };
        Self {
            label,
            color,
            geometry,
        }
    }

    pub(crate) fn into_shape(self, id: ShapeId) -> Shape {
        Shape {
            id,
            label: self.label,
            color: self.color,
            geometry: self.geometry,
        }
    }
}

/// A completed annotation owned by a frame's history
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub label: String,
    pub color: Color,
    pub geometry: Geometry,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Copy of this shape without its id, ready to be committed elsewhere
    pub fn to_draft(&self) -> ShapeDraft {
        ShapeDraft {
            label: self.label.clone(),
            color: self.color,
            geometry: self.geometry.clone(),
        }
    }
}

//! Centralized constants used across the application.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Frame rate used when the config does not provide one
pub const DEFAULT_FPS: u32 = 30;

/// Upper bound for the user-adjustable frame rate
pub const MAX_FPS: u32 = 240;

/// Video length used for a fresh session, in seconds
pub const DEFAULT_DURATION_SECS: f64 = 10.0;

/// Longest video the session panel accepts, in seconds
pub const MAX_DURATION_SECS: f64 = 6.0 * 60.0 * 60.0;

/// Native resolution of the annotated video, in pixels
pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

/// Smallest rectangle side or circle radius that is kept, in video pixels.
/// Anything smaller is treated as an accidental double click.
pub const MIN_SHAPE_SIZE: f32 = 2.0;

/// Clicking within this distance of a polygon's first vertex closes it (video pixels)
pub const POLYGON_CLOSE_RADIUS: f32 = 8.0;

/// Pointer slack for selecting shapes (video pixels)
pub const HIT_TOLERANCE: f32 = 4.0;

/// Default label and color for new shapes
pub const DEFAULT_LABEL: &str = "object";
pub const DEFAULT_COLOR_HEX: &str = "#FF0000";

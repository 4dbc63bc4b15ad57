//! Mapping between playback time and discrete frame indices.
//!
//! Frame indices are never stored alongside a time; they are recomputed from the
//! current playback position and frame rate. Changing the frame rate after annotating
//! therefore makes existing annotations show up on different perceived frames. Stored
//! shapes are intentionally left where they are.

/// Discrete annotation context derived from playback time
pub type FrameIndex = u32;

/// `floor(time * fps)`. Negative or non-finite times and a zero frame rate map to frame 0.
pub fn frame_index(time_secs: f64, fps: u32) -> FrameIndex {
    if fps == 0 || !time_secs.is_finite() || time_secs <= 0.0 {
        return 0;
    }
    let frame = (time_secs * f64::from(fps)).floor();
    if frame >= f64::from(FrameIndex::MAX) {
        FrameIndex::MAX
    } else {
        frame as FrameIndex
    }
}

/// Number of whole frames in a video of the given duration
pub fn total_frames(duration_secs: f64, fps: u32) -> u32 {
    frame_index(duration_secs, fps)
}

/// Playback time in the middle of `frame`, so seeking is immune to rounding at frame edges
pub fn frame_seek_time(frame: FrameIndex, fps: u32) -> f64 {
    if fps == 0 {
        return 0.0;
    }
    (f64::from(frame) + 0.5) / f64::from(fps)
}

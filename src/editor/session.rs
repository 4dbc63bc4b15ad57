//! Playback clock of the current video session.
//!
//! No pixels are decoded; the session only tracks the playback position, duration and
//! frame rate that the frame index is derived from. Each tick advances the clock,
//! recomputes the frame and settles pending drawing work against the frame it
//! belonged to before anything else gets to commit.

use bevy::prelude::*;

use crate::annotation::{FrameIndex, frame_index, frame_seek_time, total_frames};
use crate::config::{AppConfig, AppConfigData};
use crate::constants::{MAX_DURATION_SECS, MAX_FPS};

use super::state::{EditingState, ShapeSettings};

#[derive(Resource, Debug, Clone)]
pub struct VideoSession {
    /// Playback position in seconds
    pub time_secs: f64,
    pub playing: bool,
    /// Native resolution of the video, in pixels
    pub video_size: Vec2,
    duration_secs: f64,
    fps: u32,
    current_frame: FrameIndex,
}

impl Default for VideoSession {
    fn default() -> Self {
        Self::from_config(&AppConfigData::default())
    }
}

impl VideoSession {
    pub fn from_config(data: &AppConfigData) -> Self {
        let mut session = Self {
            time_secs: 0.0,
            playing: false,
            video_size: data.video_size(),
            duration_secs: 0.0,
            fps: data.default_fps.clamp(1, MAX_FPS),
            current_frame: 0,
        };
        session.set_duration(data.default_duration_secs);
        session
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Change the frame rate (clamped to `1..=MAX_FPS`).
    ///
    /// Annotations stay under their stored frame numbers, so after a change they show
    /// up at different playback times.
    pub fn set_fps(&mut self, fps: u32) -> u32 {
        let fps = fps.clamp(1, MAX_FPS);
        if fps != self.fps {
            info!(
                "Frame rate changed from {} to {} fps; stored annotations keep their frame numbers",
                self.fps, fps
            );
            self.fps = fps;
        }
        fps
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn set_duration(&mut self, duration_secs: f64) {
        let duration = if duration_secs.is_finite() {
            duration_secs.clamp(0.0, MAX_DURATION_SECS)
        } else {
            0.0
        };
        self.duration_secs = duration;
        self.time_secs = self.time_secs.clamp(0.0, duration);
    }

    /// Number of frames in the video; at least one so there is always a frame to annotate
    pub fn total_frames(&self) -> u32 {
        total_frames(self.duration_secs, self.fps).max(1)
    }

    pub fn last_frame(&self) -> FrameIndex {
        self.total_frames() - 1
    }

    /// The frame pending work and edits are attributed to
    pub fn current_frame(&self) -> FrameIndex {
        self.current_frame
    }

    /// Frame under the playhead right now (may differ from `current_frame` until synced)
    pub fn playhead_frame(&self) -> FrameIndex {
        frame_index(self.time_secs, self.fps).min(self.last_frame())
    }

    pub fn seek(&mut self, time_secs: f64) {
        self.time_secs = if time_secs.is_finite() {
            time_secs.clamp(0.0, self.duration_secs)
        } else {
            0.0
        };
    }

    pub fn seek_frame(&mut self, frame: FrameIndex) {
        let frame = frame.min(self.last_frame());
        self.seek(frame_seek_time(frame, self.fps));
    }

    pub fn step_frames(&mut self, delta: i64) {
        let target = (i64::from(self.playhead_frame()) + delta).clamp(0, i64::from(self.last_frame()));
        self.playing = false;
        self.seek_frame(target as FrameIndex);
    }

    /// Advance the clock while playing. Stops at the end of the video.
    pub fn advance(&mut self, delta_secs: f64) {
        if !self.playing {
            return;
        }
        let next = self.time_secs + delta_secs;
        if next >= self.duration_secs {
            self.time_secs = self.duration_secs;
            self.playing = false;
        } else {
            self.time_secs = next;
        }
    }

    pub fn toggle_playing(&mut self) {
        if !self.playing && self.time_secs >= self.duration_secs {
            self.time_secs = 0.0;
        }
        self.playing = !self.playing;
    }

    fn set_current_frame(&mut self, frame: FrameIndex) {
        self.current_frame = frame;
    }

    /// Back to the start of a fresh video
    pub fn restart(&mut self) {
        self.time_secs = 0.0;
        self.playing = false;
        self.current_frame = 0;
    }
}

/// Message to discard every annotation and start over (new video)
#[derive(Message)]
pub struct NewSessionRequest;

/// Startup system copying config defaults into the session and shape settings
pub fn apply_config_defaults(
    config: Res<AppConfig>,
    mut session: ResMut<VideoSession>,
    mut settings: ResMut<ShapeSettings>,
) {
    *session = VideoSession::from_config(&config.data);
    settings.label = config.data.default_label.clone();
    settings.default_label = config.data.default_label.clone();
    settings.color = config.data.default_color();
    info!(
        "Session: {}x{} video, {:.1}s at {} fps ({} frames)",
        session.video_size.x,
        session.video_size.y,
        session.duration_secs(),
        session.fps(),
        session.total_frames()
    );
}

pub fn advance_playback(time: Res<Time>, mut session: ResMut<VideoSession>) {
    if session.playing {
        session.advance(time.delta_secs_f64());
    }
}

/// Recompute the frame index and, when it changed, settle pending work on the old frame
pub fn sync_current_frame(mut session: ResMut<VideoSession>, mut editing: EditingState) {
    let frame = session.playhead_frame();
    let previous = session.current_frame();
    if frame == previous {
        return;
    }

    editing.settle(previous);
    session.set_current_frame(frame);
    debug!("Frame {} -> {}", previous, frame);
}

pub fn reset_session(
    mut events: MessageReader<NewSessionRequest>,
    mut session: ResMut<VideoSession>,
    mut editing: EditingState,
) {
    if events.read().count() == 0 {
        return;
    }
    editing.reset_all();
    session.restart();
    info!(
        "Started new session: {:.1}s at {} fps",
        session.duration_secs(),
        session.fps()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(duration: f64, fps: u32) -> VideoSession {
        let mut session = VideoSession::default();
        session.set_fps(fps);
        session.set_duration(duration);
        session
    }

    #[test]
    fn test_defaults_from_config() {
        let session = VideoSession::default();
        assert_eq!(session.fps(), 30);
        assert_eq!(session.total_frames(), 300);
        assert_eq!(session.current_frame(), 0);
    }

    #[test]
    fn test_seek_one_second_at_thirty_fps() {
        let mut session = session(10.0, 30);
        session.seek(1.0);
        assert_eq!(session.playhead_frame(), 30);
    }

    #[test]
    fn test_end_of_video_maps_to_last_frame() {
        let mut session = session(2.0, 10);
        session.seek(100.0);
        assert_eq!(session.time_secs, 2.0);
        assert_eq!(session.playhead_frame(), 19);
    }

    #[test]
    fn test_step_frames_clamps() {
        let mut session = session(1.0, 10);
        session.step_frames(-1);
        assert_eq!(session.playhead_frame(), 0);
        session.step_frames(3);
        assert_eq!(session.playhead_frame(), 3);
        session.step_frames(100);
        assert_eq!(session.playhead_frame(), 9);
    }

    #[test]
    fn test_fps_is_clamped() {
        let mut session = VideoSession::default();
        assert_eq!(session.set_fps(0), 1);
        assert_eq!(session.set_fps(10_000), MAX_FPS);
    }

    #[test]
    fn test_fps_change_moves_playhead_frame_not_time() {
        let mut session = session(10.0, 10);
        session.seek(2.0);
        assert_eq!(session.playhead_frame(), 20);
        session.set_fps(25);
        assert_eq!(session.time_secs, 2.0);
        assert_eq!(session.playhead_frame(), 50);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut session = session(1.0, 10);
        session.toggle_playing();
        session.advance(0.4);
        assert!(session.playing);
        session.advance(1.0);
        assert!(!session.playing);
        assert_eq!(session.time_secs, 1.0);

        // Playing again from the end rewinds
        session.toggle_playing();
        assert_eq!(session.time_secs, 0.0);
    }

    #[test]
    fn test_advance_ignored_when_paused() {
        let mut session = session(1.0, 10);
        session.advance(0.5);
        assert_eq!(session.time_secs, 0.0);
    }

    #[test]
    fn test_zero_duration_still_has_one_frame() {
        let session = session(0.0, 30);
        assert_eq!(session.total_frames(), 1);
        assert_eq!(session.last_frame(), 0);
    }

    #[test]
    fn test_seek_commits_open_polygon_to_frame_it_was_drawn_on() {
        use crate::annotation::{ActivePolygonBuilder, FrameHistoryStore, Geometry};
        use crate::editor::state::editing_test_app;

        let mut app = editing_test_app();
        app.add_systems(Update, sync_current_frame);
        {
            let mut builder = app.world_mut().resource_mut::<ActivePolygonBuilder>();
            builder.add_point(Vec2::new(10.0, 10.0));
            builder.add_point(Vec2::new(40.0, 10.0));
        }

        app.world_mut().resource_mut::<VideoSession>().seek_frame(5);
        app.update();

        assert_eq!(app.world().resource::<VideoSession>().current_frame(), 5);
        assert!(app.world().resource::<ActivePolygonBuilder>().is_empty());
        let store = app.world().resource::<FrameHistoryStore>();
        let shapes = store.current_shapes(0);
        assert_eq!(shapes.len(), 1);
        assert!(matches!(
            shapes[0].geometry,
            Geometry::Polygon {
                is_closed: false,
                ..
            }
        ));
        assert!(store.current_shapes(5).is_empty());
        assert_eq!(store.annotated_frames(), vec![0]);
    }

    #[test]
    fn test_unchanged_frame_keeps_pending_work() {
        use crate::annotation::ActivePolygonBuilder;
        use crate::editor::state::{PendingShape, editing_test_app};

        let mut app = editing_test_app();
        app.add_systems(Update, sync_current_frame);
        app.world_mut()
            .resource_mut::<ActivePolygonBuilder>()
            .add_point(Vec2::new(10.0, 10.0));
        app.world_mut().resource_mut::<PendingShape>().anchor = Some(Vec2::ONE);

        app.update();

        assert_eq!(app.world().resource::<ActivePolygonBuilder>().points().len(), 1);
        assert!(app.world().resource::<PendingShape>().anchor.is_some());
    }
}

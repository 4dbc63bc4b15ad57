//! State resources for the drawing and selection tools.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::annotation::{
    ActivePolygonBuilder, FrameHistoryStore, FrameIndex, ShapeClipboard, ShapeId,
};
use crate::config::AppConfigData;
use crate::constants::DEFAULT_LABEL;

/// Label and color applied to newly drawn shapes
#[derive(Resource)]
pub struct ShapeSettings {
    pub label: String,
    pub color: Color,
    /// Configured label used whenever a label is left blank
    pub default_label: String,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        let defaults = AppConfigData::default();
        Self {
            color: defaults.default_color(),
            label: defaults.default_label.clone(),
            default_label: defaults.default_label,
        }
    }
}

impl ShapeSettings {
    /// Trimmed `label`, or the configured default if blank, or [`DEFAULT_LABEL`]
    pub fn resolve_label(&self, label: &str) -> String {
        [label, self.default_label.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|label| !label.is_empty())
            .unwrap_or(DEFAULT_LABEL)
            .to_string()
    }

    /// Label for the next shape drawn
    pub fn new_shape_label(&self) -> String {
        self.resolve_label(&self.label)
    }
}

/// First click of a rectangle (corner) or circle (center), in video space
#[derive(Resource, Default)]
pub struct PendingShape {
    pub anchor: Option<Vec2>,
}

/// Currently selected shape on the current frame.
///
/// Cleared whenever the active shape-set can change underneath it (undo, redo,
/// frame navigation, tool switch), since the id may not exist in the new set.
#[derive(Resource, Default)]
pub struct Selection {
    pub shape: Option<ShapeId>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.shape = None;
    }
}

/// In-flight move of the selected shape. Committed once on release.
#[derive(Resource, Default)]
pub struct DragState {
    pub active: Option<ActiveDrag>,
}

#[derive(Clone, Copy, Debug)]
pub struct ActiveDrag {
    pub shape: ShapeId,
    /// Pointer position at press, video space
    pub start: Vec2,
    /// Current offset from `start`
    pub offset: Vec2,
}

/// Everything that holds uncommitted or frame-specific editing state
#[derive(SystemParam)]
pub struct EditingState<'w> {
    pub store: ResMut<'w, FrameHistoryStore>,
    pub builder: ResMut<'w, ActivePolygonBuilder>,
    pub pending: ResMut<'w, PendingShape>,
    pub selection: ResMut<'w, Selection>,
    pub drag: ResMut<'w, DragState>,
    pub clipboard: ResMut<'w, ShapeClipboard>,
    pub settings: Res<'w, ShapeSettings>,
}

impl EditingState<'_> {
    /// Settle pending work on `frame` before leaving it. See [`settle_pending_work`].
    pub fn settle(&mut self, frame: FrameIndex) -> Option<ShapeId> {
        let settled = settle_pending_work(
            frame,
            &mut self.store,
            &mut self.builder,
            &mut self.pending,
            &self.settings,
        );
        self.selection.clear();
        self.drag.active = None;
        settled
    }

    /// Drop every annotation and all transient state (new video)
    pub fn reset_all(&mut self) {
        self.store.reset();
        self.builder.reset();
        self.pending.anchor = None;
        self.selection.clear();
        self.drag.active = None;
        self.clipboard.clear();
    }
}

/// Finalize or discard in-progress drawing so nothing is left dangling.
///
/// A polygon with pending points is committed to `frame` as an open polygon; a
/// half-placed rectangle or circle is discarded. Returns the id of the committed
/// polygon, if any.
pub fn settle_pending_work(
    frame: FrameIndex,
    store: &mut FrameHistoryStore,
    builder: &mut ActivePolygonBuilder,
    pending: &mut PendingShape,
    settings: &ShapeSettings,
) -> Option<ShapeId> {
    pending.anchor = None;
    let draft = builder.finalize_open(&settings.new_shape_label(), settings.color);
    builder.reset();
    let id = store.add_shape(frame, draft?);
    debug!("Finalized open polygon {} on frame {}", id, frame);
    Some(id)
}

/// App with every editing resource and a default session, for system-level tests
#[cfg(test)]
pub(crate) fn editing_test_app() -> App {
    let mut app = App::new();
    app.init_resource::<FrameHistoryStore>()
        .init_resource::<ActivePolygonBuilder>()
        .init_resource::<PendingShape>()
        .init_resource::<Selection>()
        .init_resource::<DragState>()
        .init_resource::<ShapeClipboard>()
        .init_resource::<ShapeSettings>()
        .init_resource::<super::session::VideoSession>();
    app
}

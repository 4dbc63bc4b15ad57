use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_COLOR_HEX, DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_LABEL, DEFAULT_VIDEO_HEIGHT,
    DEFAULT_VIDEO_WIDTH, MAX_DURATION_SECS, MAX_FPS,
};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigData {
    /// Frame rate for new sessions
    pub default_fps: u32,
    /// Video length for new sessions, in seconds
    pub default_duration_secs: f64,
    /// Label given to newly drawn shapes
    pub default_label: String,
    /// Color of newly drawn shapes as `#RRGGBB`
    pub default_color: String,
    /// Native video resolution, in pixels
    pub video_width: u32,
    pub video_height: u32,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            default_fps: DEFAULT_FPS,
            default_duration_secs: DEFAULT_DURATION_SECS,
            default_label: DEFAULT_LABEL.to_string(),
            default_color: DEFAULT_COLOR_HEX.to_string(),
            video_width: DEFAULT_VIDEO_WIDTH,
            video_height: DEFAULT_VIDEO_HEIGHT,
        }
    }
}

impl AppConfigData {
    /// Clamp values that a hand-edited file could have pushed out of range
    pub fn sanitized(mut self) -> Self {
        self.default_fps = self.default_fps.clamp(1, MAX_FPS);
        if !self.default_duration_secs.is_finite() || self.default_duration_secs <= 0.0 {
            self.default_duration_secs = DEFAULT_DURATION_SECS;
        }
        self.default_duration_secs = self.default_duration_secs.min(MAX_DURATION_SECS);
        if self.default_label.trim().is_empty() {
            self.default_label = DEFAULT_LABEL.to_string();
        }
        if color_from_hex(&self.default_color).is_none() {
            warn!(
                "Invalid default color '{}' in config, using {}",
                self.default_color, DEFAULT_COLOR_HEX
            );
            self.default_color = DEFAULT_COLOR_HEX.to_string();
        }
        self.video_width = self.video_width.max(1);
        self.video_height = self.video_height.max(1);
        self
    }

    pub fn default_color(&self) -> Color {
        color_from_hex(&self.default_color).unwrap_or(Color::srgb(1.0, 0.0, 0.0))
    }

    pub fn video_size(&self) -> Vec2 {
        Vec2::new(self.video_width as f32, self.video_height as f32)
    }
}

/// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional)
pub fn color_from_hex(hex: &str) -> Option<Color> {
    Srgba::hex(hex.trim()).ok().map(Color::from)
}

/// Format a color as `#RRGGBB`
pub fn color_to_hex(color: Color) -> String {
    let srgba = color.to_srgba();
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        channel(srgba.red),
        channel(srgba.green),
        channel(srgba.blue)
    )
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to store the current session settings as defaults for new sessions
#[derive(Message)]
pub struct RememberDefaultsRequest {
    pub fps: u32,
    pub duration_secs: f64,
    pub label: String,
    pub color: Color,
}

/// Parse config JSON. On failure returns defaults plus a human readable reason.
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str::<AppConfigData>(json) {
        Ok(data) => (data.sanitized(), None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config(config_path: &Path) -> (AppConfigData, Option<String>) {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return (AppConfigData::default(), None);
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => {
            let (data, reason) = parse_config(&json);
            if reason.is_none() {
                info!("Loaded config from {:?}", config_path);
            }
            (data, reason)
        }
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let (data, reset_reason) = load_config(&config.config_path);
    config.data = data;
    config.dirty = false;

    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

fn remember_defaults_system(
    mut events: MessageReader<RememberDefaultsRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        let updated = AppConfigData {
            default_fps: event.fps,
            default_duration_secs: event.duration_secs,
            default_label: event.label.clone(),
            default_color: color_to_hex(event.color),
            ..config.data.clone()
        }
        .sanitized();

        if updated != config.data {
            config.data = updated;
            config.dirty = true;
            save_events.write(SaveConfigRequest);
            info!(
                "Remembered defaults: {} fps, {:.1}s, '{}' {}",
                config.data.default_fps,
                config.data.default_duration_secs,
                config.data.default_label,
                config.data.default_color
            );
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<RememberDefaultsRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    remember_defaults_system.run_if(on_message::<RememberDefaultsRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.default_fps, DEFAULT_FPS);
        assert_eq!(data.default_label, DEFAULT_LABEL);
        assert_eq!(data.default_color, DEFAULT_COLOR_HEX);
        assert_eq!(data.video_size(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            default_fps: 25,
            default_duration_secs: 42.5,
            default_label: "pedestrian".to_string(),
            default_color: "#00FF00".to_string(),
            video_width: 1920,
            video_height: 1080,
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let (data, reason) = parse_config(r#"{ "default_fps": 60 }"#);
        assert!(reason.is_none());
        assert_eq!(data.default_fps, 60);
        assert_eq!(data.default_label, DEFAULT_LABEL);
        assert_eq!(data.video_width, DEFAULT_VIDEO_WIDTH);
    }

    #[test]
    fn test_corrupted_config_resets_with_reason() {
        let (data, reason) = parse_config("{ not json");
        assert_eq!(data, AppConfigData::default());
        assert!(reason.unwrap().contains("corrupted"));
    }

    #[test]
    fn test_sanitized_clamps_out_of_range_values() {
        let data = AppConfigData {
            default_fps: 0,
            default_duration_secs: -3.0,
            default_label: "   ".to_string(),
            default_color: "not a color".to_string(),
            video_width: 0,
            video_height: 480,
        }
        .sanitized();

        assert_eq!(data.default_fps, 1);
        assert_eq!(data.default_duration_secs, DEFAULT_DURATION_SECS);
        assert_eq!(data.default_label, DEFAULT_LABEL);
        assert_eq!(data.default_color, DEFAULT_COLOR_HEX);
        assert_eq!(data.video_width, 1);
    }

    #[test]
    fn test_hex_color_round_trip() {
        let color = color_from_hex("#FF8000").unwrap();
        assert_eq!(color_to_hex(color), "#FF8000");
        assert_eq!(color_to_hex(Color::srgb(0.0, 0.0, 1.0)), "#0000FF");
        assert!(color_from_hex("#GG0000").is_none());
    }
}

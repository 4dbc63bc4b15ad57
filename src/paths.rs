//! Platform-appropriate locations for the config file and logs.
//!
//! Development runs (cargo run, debug builds) keep everything in the working
//! directory. Installed builds use:
//! - Windows: `%APPDATA%\framemark\`
//! - macOS: `~/Library/Application Support/framemark/`
//! - Linux: `~/.config/framemark/` (config), `~/.local/share/framemark/` (logs)

use std::path::PathBuf;

const APP_DIR_NAME: &str = "framemark";

/// True under `cargo run` or in debug builds
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

pub fn config_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME))
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

pub fn data_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    dirs::data_dir().map(|p| p.join(APP_DIR_NAME))
}

/// `{config_dir}/framemark.json`
pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join("framemark.json"))
        .unwrap_or_else(|| PathBuf::from("framemark.json"))
}

/// `{data_dir}/logs/`
pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Create the config and log directories if they are missing
pub fn ensure_directories() -> std::io::Result<()> {
    if let Some(config) = config_dir() {
        std::fs::create_dir_all(config)?;
    }
    std::fs::create_dir_all(logs_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name() {
        assert!(config_file().ends_with("framemark.json"));
    }

    #[test]
    fn test_logs_dir_name() {
        assert!(logs_dir().ends_with("logs"));
    }

    #[test]
    fn test_dev_mode_uses_working_directory() {
        // Tests build with debug assertions
        assert!(is_dev_mode());
        assert_eq!(config_dir(), Some(PathBuf::from(".")));
        assert_eq!(data_dir(), Some(PathBuf::from(".")));
    }
}

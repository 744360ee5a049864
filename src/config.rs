//! Configuration file handling for glyphcast.
//!
//! Loads configuration from `~/.config/glyphcast/config.toml` or a custom
//! path. Every value here is a default that the corresponding CLI flag
//! overrides; nothing in the core reads these paths directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file structure for glyphcast.
/// Loaded from ~/.config/glyphcast/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

/// Where metric tables live and which font builds them.
#[derive(Debug, Deserialize, Default)]
pub struct MetricsConfig {
    /// Directory holding metric table artifacts
    pub dir: Option<PathBuf>,
    /// Font file used by `build-metrics` when --font is not given
    pub font: Option<PathBuf>,
}

/// Render-time defaults.
#[derive(Debug, Deserialize, Default)]
pub struct RenderConfig {
    /// Output columns (unset = fit the terminal)
    pub cols: Option<u16>,
    /// Terminal character aspect ratio
    pub char_aspect: Option<f32>,
    /// Live target frame rate
    pub fps: Option<f32>,
    #[serde(default)]
    pub color: bool,
}

/// Capture defaults.
#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    /// Device indices probed before giving up
    pub max_devices: Option<u32>,
    #[serde(default)]
    pub mirror: bool,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Metrics directory: configured value or the per-user data dir.
    pub fn metrics_dir(&self) -> PathBuf {
        self.metrics
            .dir
            .clone()
            .unwrap_or_else(default_metrics_dir)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("glyphcast")
        .join("config.toml")
}

/// Default directory for metric table artifacts.
pub fn default_metrics_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glyphcast")
        .join("metrics")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_no_file() {
        let config = Config::load(Some(Path::new("/nonexistent/glyphcast.toml"))).unwrap();
        assert!(config.metrics.dir.is_none());
        assert!(config.render.cols.is_none());
        assert!(!config.render.color);
        assert!(!config.camera.mirror);
    }

    #[test]
    fn test_parse_sections() {
        let toml = r#"
            [metrics]
            dir = "/tmp/metrics"
            font = "/fonts/Mono.ttf"

            [render]
            cols = 120
            char_aspect = 2.2
            fps = 10.0
            color = true

            [camera]
            max_devices = 3
            mirror = true
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.metrics.dir.as_deref(), Some(Path::new("/tmp/metrics")));
        assert_eq!(config.render.cols, Some(120));
        assert_eq!(config.render.fps, Some(10.0));
        assert!(config.render.color);
        assert_eq!(config.camera.max_devices, Some(3));
        assert!(config.camera.mirror);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[render]\ncols = 40\n").unwrap();
        assert_eq!(config.render.cols, Some(40));
        assert!(config.metrics.font.is_none());
        assert!(!config.camera.mirror);
    }

    #[test]
    fn test_default_paths_end_sensibly() {
        assert!(default_path().ends_with("glyphcast/config.toml"));
        assert!(default_metrics_dir().ends_with("glyphcast/metrics"));
    }
}

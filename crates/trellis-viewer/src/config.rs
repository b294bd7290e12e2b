//! Configuration loading and validation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use trellis_scene::DeviceTier;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial window width in logical pixels
    #[serde(default = "default_width")]
    pub width: f32,
    /// Initial window height in logical pixels
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_title() -> String {
    "Trellis IFC Viewer".to_string()
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    /// Force a device tier instead of deriving one from the window width
    #[serde(default)]
    pub tier: Option<DeviceTier>,
    /// Override the tier's frame-rate cap
    #[serde(default)]
    pub target_fps: Option<u32>,
}

impl Config {
    /// Tier to run with, honoring a forced tier from the config file.
    pub fn resolve_tier(&self, window_width: f32) -> DeviceTier {
        self.viewer
            .tier
            .unwrap_or_else(|| DeviceTier::from_width(window_width))
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.window.title, "Trellis IFC Viewer");
        assert_eq!(config.window.width, 1280.0);
        assert!(config.viewer.tier.is_none());
        assert!(config.viewer.target_fps.is_none());
    }

    #[test]
    fn test_forced_tier() {
        let config: Config = toml::from_str(
            r#"
            [viewer]
            tier = "mobile"
            "#,
        )
        .unwrap();
        assert_eq!(config.resolve_tier(1920.0), DeviceTier::Mobile);
    }

    #[test]
    fn test_tier_from_window_width() {
        let config = Config::default();
        assert_eq!(config.resolve_tier(375.0), DeviceTier::Mobile);
        assert_eq!(config.resolve_tier(800.0), DeviceTier::Tablet);
        assert_eq!(config.resolve_tier(1920.0), DeviceTier::Desktop);
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        assert!(toml::from_str::<Config>("window = 3").is_err());
        assert!(toml::from_str::<Config>("[viewer]\ntier = \"phone\"").is_err());
    }

    #[test]
    fn test_partial_window_section() {
        let config: Config = toml::from_str(
            r#"
            [window]
            width = 390.0
            height = 844.0
            "#,
        )
        .unwrap();
        assert_eq!(config.window.width, 390.0);
        assert_eq!(config.window.title, "Trellis IFC Viewer");
    }
}

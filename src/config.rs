use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::avatar::DEFAULT_QUALITY;
use crate::ui::theme::ThemePreset;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub avatar: AvatarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            appearance: AppearanceConfig::default(),
            avatar: AvatarConfig::default(),
        }
    }
}

/// Appearance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Color theme preset
    #[serde(default)]
    pub theme: ThemePreset,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: ThemePreset::default(),
        }
    }
}

/// Avatar pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// JPEG re-encode quality (0.0-1.0)
    #[serde(default = "default_quality")]
    pub jpeg_quality: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_quality(),
        }
    }
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "visage", "Visage")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.appearance.theme, config.appearance.theme);
        assert_eq!(parsed.avatar.jpeg_quality, config.avatar.jpeg_quality);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.avatar.jpeg_quality, DEFAULT_QUALITY);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let parsed: Config = toml::from_str("[avatar]\njpeg_quality = 0.5\n").unwrap();
        assert_eq!(parsed.avatar.jpeg_quality, 0.5);
        assert_eq!(parsed.appearance.theme, ThemePreset::default());
    }
}

//! Configuration management for the keyboard emulator
//!
//! Settings live in a TOML file in the platform config directory.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keyboard-emulator/config.toml` |
//! | macOS | `~/Library/Application Support/keyboard-emulator/config.toml` |
//! | Windows | `%APPDATA%\keyboard-emulator\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keyboard_emulator::{Config, Platform};
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.emulation.platform = Platform::Mac;
//! config.playback.key_interval_ms = 100;
//! config.save().expect("config is writable");
//! ```

use crate::keyboard::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Application directory name inside the platform config directory
const APP_DIR: &str = "keyboard-emulator";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    config_path_in(&config_dir)
}

/// Config file path under `config_dir`, creating the application directory.
pub fn config_path_in(config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let app_dir = config_dir.join(APP_DIR);

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Emulation settings
    #[serde(default)]
    pub emulation: EmulationConfig,
    /// Timed key-press playback
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Corpus analytics
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Emulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmulationConfig {
    /// Host platform, selecting the AltGr convention
    #[serde(default)]
    pub platform: Platform,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between two played key presses, in ms
    pub key_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            key_interval_ms: 250,
        }
    }
}

/// Analytics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Type line breaks with the Enter key
    pub map_enter_key: bool,
    /// Decimal places of reported percentages
    pub precision: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            map_enter_key: true,
            precision: 2,
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get playback interval as Duration
    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback.key_interval_ms)
    }
}

//! Configuration and settings management for dronepath
//!
//! Provides configuration file handling, settings management, and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Connection settings (drone address, bind address, response timeout)
//! - Flight defaults (step distance, speed, flight area, start point)
//! - Playback timing (per-command delays used by the autopilot)
//! - Camera follow placement

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Directory name used under the platform config directory
pub const APP_DIR_NAME: &str = "dronepath";
/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Maximum number of recent flight files remembered
pub const RECENT_FILES_LIMIT: usize = 10;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Drone SDK command address
    pub drone_address: String,
    /// Local address the command socket binds to
    pub bind_address: String,
    /// How long to wait for `ok`/`error` from the drone
    pub response_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            drone_address: "192.168.10.1:8889".to_string(),
            bind_address: "0.0.0.0:8889".to_string(),
            response_timeout_ms: 7000,
        }
    }
}

/// Flight building defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSettings {
    /// Step distance in metres
    pub distance: f64,
    /// Move speed in cm/s
    pub speed: u32,
    /// Edge length of the flight area in metres
    pub scale: f64,
    /// Post-takeoff start point (x, y, z)
    pub start: [f64; 3],
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            distance: 0.5,
            speed: 20,
            scale: 10.0,
            start: [0.0, 1.0, 0.0],
        }
    }
}

/// Autopilot replay timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub takeoff_delay_ms: u64,
    pub move_delay_ms: u64,
    pub rotate_delay_ms: u64,
    /// Time between touchdown and returning the model to the start point
    pub land_settle_ms: u64,
    /// Time between starting the recording and starting the flight
    pub record_warmup_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            takeoff_delay_ms: 5000,
            move_delay_ms: 3000,
            rotate_delay_ms: 3000,
            land_settle_ms: 10000,
            record_warmup_ms: 5000,
        }
    }
}

/// Follow camera placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub follow_distance: f64,
    pub follow_height: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow_distance: 7.0,
            follow_height: 2.0,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Recent flight files, newest first
    pub recent_files: Vec<PathBuf>,
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Flight building defaults
    pub flight: FlightSettings,
    /// Replay timing
    pub playback: PlaybackSettings,
    /// Camera placement
    pub camera: CameraSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for dronepath
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config or home directory".to_string())
            })
    }

    /// Default location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.drone_address.trim().is_empty() {
            return Err(ConfigError::MissingKey("connection.drone_address".to_string()).into());
        }

        if self.connection.response_timeout_ms == 0 {
            return Err(out_of_range("connection.response_timeout_ms", 0));
        }

        let flight = &self.flight;
        if !(flight.distance.is_finite() && flight.distance > 0.0) {
            return Err(out_of_range("flight.distance", flight.distance));
        }

        if !(10..=100).contains(&flight.speed) {
            return Err(out_of_range("flight.speed", flight.speed));
        }

        if !(flight.scale.is_finite() && flight.scale >= 2.0) {
            return Err(out_of_range("flight.scale", flight.scale));
        }

        if flight.start.iter().any(|v| !v.is_finite()) {
            return Err(out_of_range("flight.start", format!("{:?}", flight.start)));
        }

        if self.playback.land_settle_ms == 0 {
            return Err(out_of_range("playback.land_settle_ms", 0));
        }

        if !(self.camera.follow_distance.is_finite() && self.camera.follow_distance > 0.0) {
            return Err(out_of_range(
                "camera.follow_distance",
                self.camera.follow_distance,
            ));
        }

        if !self.camera.follow_height.is_finite() {
            return Err(out_of_range("camera.follow_height", self.camera.follow_height));
        }

        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(RECENT_FILES_LIMIT);
    }
}

fn out_of_range(key: &str, value: impl ToString) -> SettingsError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

//! dronepath Settings Crate
//!
//! Handles application configuration: defaults, validation, and persistence
//! as JSON or TOML under the platform config directory.

pub mod config;
pub mod error;

pub use config::{
    CameraSettings, Config, ConnectionSettings, FlightSettings, PlaybackSettings, APP_DIR_NAME,
    CONFIG_FILE_NAME, RECENT_FILES_LIMIT,
};
pub use error::{ConfigError, SettingsError, SettingsResult};

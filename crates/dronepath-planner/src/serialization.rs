//! Serialization and deserialization for flight files.
//!
//! Flight plans are exported as pretty-printed JSON holding the instruction
//! list together with the build settings used to create it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::instruction::FlightInstruction;
use crate::store::validate_sequence;

/// Flight file format version
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete flight file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightFile {
    pub version: String,
    pub metadata: FlightMetadata,
    #[serde(default)]
    pub settings: FlightSettingsData,
    pub instructions: Vec<FlightInstruction>,
}

/// Flight metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Build settings stored alongside the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSettingsData {
    /// Step distance in metres
    #[serde(default = "default_distance")]
    pub distance: f64,
    /// Move speed in cm/s
    #[serde(default = "default_speed")]
    pub speed: u32,
}

fn default_distance() -> f64 {
    0.5
}
fn default_speed() -> u32 {
    20
}

impl Default for FlightSettingsData {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            speed: default_speed(),
        }
    }
}

impl FlightFile {
    /// Create a flight file holding only the markers
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: FlightMetadata {
                name: name.into(),
                created: now,
                modified: now,
            },
            settings: FlightSettingsData::default(),
            instructions: vec![FlightInstruction::Takeoff, FlightInstruction::Land],
        }
    }

    /// Create a flight file for an existing plan
    pub fn from_instructions(
        name: impl Into<String>,
        instructions: Vec<FlightInstruction>,
        settings: FlightSettingsData,
    ) -> Self {
        Self {
            settings,
            instructions,
            ..Self::new(name)
        }
    }

    /// Save flight to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize flight")?;

        std::fs::write(path.as_ref(), json).context("Failed to write flight file")?;

        Ok(())
    }

    /// Load flight from file
    ///
    /// The instruction list is validated before the file is returned.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read flight file")?;

        let mut flight: FlightFile =
            serde_json::from_str(&content).context("Failed to parse flight file")?;

        validate_sequence(&flight.instructions).context("Invalid flight instructions")?;

        flight.metadata.modified = Utc::now();

        Ok(flight)
    }
}

//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{ConnectionStatus, Point3D};

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Drone link events
    Connection(ConnectionEvent),
    /// Instruction list changes
    Flight(FlightEvent),
    /// Autopilot replay progress
    Playback(PlaybackEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Connection(_) => EventCategory::Connection,
            AppEvent::Flight(_) => EventCategory::Flight,
            AppEvent::Playback(_) => EventCategory::Playback,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Connection(e) => e.description(),
            AppEvent::Flight(e) => e.description(),
            AppEvent::Playback(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Drone link events.
    Connection,
    /// Instruction list events.
    Flight,
    /// Autopilot replay events.
    Playback,
    /// Error events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Connection => write!(f, "Connection"),
            EventCategory::Flight => write!(f, "Flight"),
            EventCategory::Playback => write!(f, "Playback"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Connection-related events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConnectionEvent {
    /// Connect requested.
    Connecting {
        /// Drone address being connected to.
        address: String,
    },
    /// Host reported a new link status.
    StatusChanged {
        /// The new status.
        status: ConnectionStatus,
    },
    /// Connection attempt failed.
    ConnectionFailed {
        /// Drone address that failed.
        address: String,
        /// Error message describing the failure.
        error: String,
    },
}

impl ConnectionEvent {
    fn description(&self) -> String {
        match self {
            ConnectionEvent::Connecting { address } => format!("Connecting to {}", address),
            ConnectionEvent::StatusChanged { status } => format!("Connection state: {}", status),
            ConnectionEvent::ConnectionFailed { address, error } => {
                format!("Connection failed to {}: {}", address, error)
            }
        }
    }
}

/// Instruction list events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlightEvent {
    /// The instruction list was edited.
    InstructionsChanged {
        /// Number of entries including markers.
        count: usize,
    },
    /// The list was reset to the markers.
    Cleared,
    /// A flight file was loaded.
    Imported {
        /// Source file.
        path: PathBuf,
        /// Number of entries loaded.
        count: usize,
    },
    /// A flight file was written.
    Exported {
        /// Destination file.
        path: PathBuf,
        /// Number of entries written.
        count: usize,
    },
}

impl FlightEvent {
    fn description(&self) -> String {
        match self {
            FlightEvent::InstructionsChanged { count } => {
                format!("Flight instructions changed ({} entries)", count)
            }
            FlightEvent::Cleared => "Flight instructions cleared".to_string(),
            FlightEvent::Imported { path, count } => {
                format!("Imported {} entries from {}", count, path.display())
            }
            FlightEvent::Exported { path, count } => {
                format!("Exported {} entries to {}", count, path.display())
            }
        }
    }
}

/// Autopilot replay events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Replay started.
    Started {
        /// Number of steps to replay.
        steps: usize,
        /// Wall-clock start time.
        started_at: DateTime<Utc>,
    },
    /// One instruction was applied to the drone state.
    Step {
        /// Step index.
        index: usize,
        /// Instruction label.
        label: String,
        /// Position after the step.
        position: Point3D,
        /// Rotation after the step.
        rotation: f64,
    },
    /// Replay paused before `index`.
    Paused {
        /// Next step index.
        index: usize,
    },
    /// Replay resumed at `index`.
    Resumed {
        /// Next step index.
        index: usize,
    },
    /// All steps applied, waiting for the drone to settle.
    Completed,
    /// Drone model returned to the start point.
    Settled,
    /// Replay cancelled before `index`.
    Cancelled {
        /// Next step index that was not applied.
        index: usize,
    },
}

impl PlaybackEvent {
    fn description(&self) -> String {
        match self {
            PlaybackEvent::Started { steps, .. } => format!("Flight started ({} steps)", steps),
            PlaybackEvent::Step {
                index,
                label,
                position,
                ..
            } => format!("Step {}: {} -> {}", index, label, position),
            PlaybackEvent::Paused { index } => format!("Flight paused at step {}", index),
            PlaybackEvent::Resumed { index } => format!("Flight resumed at step {}", index),
            PlaybackEvent::Completed => "Flight completed".to_string(),
            PlaybackEvent::Settled => "Drone returned to start".to_string(),
            PlaybackEvent::Cancelled { index } => format!("Flight cancelled at step {}", index),
        }
    }
}

/// Error events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// Link to the drone or host failed.
    Link {
        /// Error message.
        message: String,
    },
    /// Flight file could not be read or written.
    File {
        /// File involved.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::Link { message } => format!("Link error: {}", message),
            ErrorEvent::File { path, message } => {
                format!("File error ({}): {}", path.display(), message)
            }
        }
    }
}

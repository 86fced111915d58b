//! Error handling for dronepath
//!
//! Provides error types for all layers of the application:
//! - Flight errors (instruction sequence validation)
//! - Connection errors (drone/host link)
//! - Playback errors (autopilot replay lifecycle)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Flight instruction error type
///
/// Raised when an instruction sequence coming from outside the builder
/// (an imported file, a host message) does not have the required shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlightError {
    /// Sequence is shorter than the two markers
    #[error("Flight sequence has {len} entries, at least takeoff and land are required")]
    TooShort {
        /// The length of the rejected sequence.
        len: usize,
    },

    /// A required marker is missing from its fixed slot
    #[error("Flight sequence must {position} with {marker}")]
    MissingMarker {
        /// The marker that was expected.
        marker: String,
        /// Where it was expected ("start" or "end").
        position: String,
    },

    /// A marker appears somewhere other than its fixed slot
    #[error("Marker {marker} found at index {index}")]
    MisplacedMarker {
        /// The misplaced marker.
        marker: String,
        /// Index of the offending entry.
        index: usize,
    },

    /// An instruction carries a value outside the accepted range
    #[error("Invalid instruction at index {index}: {reason}")]
    InvalidInstruction {
        /// Index of the offending entry.
        index: usize,
        /// Why it was rejected.
        reason: String,
    },

    /// A move would leave the flight area
    #[error("{label} would leave the flight area")]
    OutOfBounds {
        /// Label of the rejected move.
        label: String,
    },
}

/// Connection error type
///
/// Represents errors related to the link with the host process or the drone.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// Link is not connected
    #[error("Drone not connected")]
    NotConnected,

    /// Address could not be parsed or resolved
    #[error("Invalid address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// No response within the configured timeout
    #[error("No response to '{command}' after {timeout_ms}ms")]
    Timeout {
        /// The command that went unanswered.
        command: String,
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The drone answered with an error
    #[error("Command '{command}' rejected: {response}")]
    Rejected {
        /// The rejected command.
        command: String,
        /// The raw response text.
        response: String,
    },

    /// Socket I/O failure
    #[error("I/O error: {reason}")]
    IoError {
        /// The reason for the I/O error.
        reason: String,
    },

    /// Message is not supported by this link
    #[error("Unsupported message: {message}")]
    Unsupported {
        /// The unsupported message name.
        message: String,
    },
}

/// Playback error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// A run is already in progress
    #[error("A flight is already running")]
    AlreadyRunning,

    /// No run is in progress
    #[error("No flight is running")]
    NotRunning,
}

/// Main error type for dronepath
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Flight sequence error
    #[error(transparent)]
    Flight(#[from] FlightError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Playback error
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Connection(ConnectionError::Timeout { .. }))
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a flight sequence error
    pub fn is_flight_error(&self) -> bool {
        matches!(self, Error::Flight(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_error_display() {
        let err = FlightError::MissingMarker {
            marker: "Land".to_string(),
            position: "end".to_string(),
        };
        assert_eq!(err.to_string(), "Flight sequence must end with Land");

        let err = FlightError::TooShort { len: 1 };
        assert!(err.to_string().contains("1 entries"));
    }

    #[test]
    fn test_error_classification() {
        let err: Error = ConnectionError::Timeout {
            command: "takeoff".to_string(),
            timeout_ms: 7000,
        }
        .into();
        assert!(err.is_timeout());
        assert!(err.is_connection_error());
        assert!(!err.is_flight_error());

        let err: Error = FlightError::TooShort { len: 0 }.into();
        assert!(err.is_flight_error());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

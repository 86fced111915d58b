//! # dronepath Communication
//!
//! Links to the host process and the drone, host event handling, and the
//! autopilot that replays a flight plan in step with the real drone.

pub mod host;
pub mod link;
pub mod playback;
pub mod session;

pub use host::{HostEvent, HostMessage, SDK_MODE_COMMAND};
pub use link::{HostLink, NoOpLink, RecordingLink, UdpDroneLink, UdpLinkConfig};
pub use playback::{
    Autopilot, PlaybackOutcome, PlaybackScheduler, PlaybackState, PlaybackStep, PlaybackTiming,
    TAKEOFF_HEIGHT,
};
pub use session::FlightSession;

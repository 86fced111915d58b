//! Messages exchanged with the host process.
//!
//! Outbound messages are one-way: the link either delivers them or fails,
//! there is no reply on the same channel. The host answers through
//! [`HostEvent`]s, which the session handles.

use dronepath_planner::FlightInstruction;
use serde::{Deserialize, Serialize};

/// SDK command that switches the drone into SDK mode
pub const SDK_MODE_COMMAND: &str = "command";

/// Command sent from the application to the host or drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum HostMessage {
    /// Open the link to the drone
    Connect,
    /// One SDK command, e.g. `command` or `land`
    SingleInstruction(String),
    /// The whole flight as SDK commands, run in order by the host
    Autopilot(Vec<String>),
    StartRecording,
    StopRecording,
    /// `streamon`
    EnableVideoStream,
    /// `streamoff`
    DisableVideoStream,
    /// Reply to [`HostEvent::RequestFlightInstructions`]
    FlightInstructions(Vec<FlightInstruction>),
}

impl HostMessage {
    /// Channel name used on the wire
    pub fn channel(&self) -> &'static str {
        match self {
            HostMessage::Connect => "connect",
            HostMessage::SingleInstruction(_) => "single-instruction",
            HostMessage::Autopilot(_) => "autopilot",
            HostMessage::StartRecording => "start-recording",
            HostMessage::StopRecording => "stop-recording",
            HostMessage::EnableVideoStream => "enable-video-stream",
            HostMessage::DisableVideoStream => "disable-video-stream",
            HostMessage::FlightInstructions(_) => "flight-instructions",
        }
    }
}

/// Notification received from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum HostEvent {
    /// The drone link came up (`true`) or went down
    DroneConnection(bool),
    /// A flight file was opened on the host side
    FileOpened(Vec<FlightInstruction>),
    /// The host wants the current instruction list
    RequestFlightInstructions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        assert_eq!(HostMessage::Connect.channel(), "connect");
        assert_eq!(
            HostMessage::SingleInstruction("land".to_string()).channel(),
            "single-instruction"
        );
        assert_eq!(HostMessage::EnableVideoStream.channel(), "enable-video-stream");
    }
}

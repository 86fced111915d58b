use dronepath_communication::{HostEvent, HostMessage};
use dronepath_planner::FlightInstruction;
use serde_json::json;

#[test]
fn test_message_wire_shape() {
    assert_eq!(
        serde_json::to_value(HostMessage::Connect).unwrap(),
        json!({ "channel": "connect" })
    );
    assert_eq!(
        serde_json::to_value(HostMessage::SingleInstruction("land".to_string())).unwrap(),
        json!({ "channel": "single-instruction", "payload": "land" })
    );
    assert_eq!(
        serde_json::to_value(HostMessage::Autopilot(vec![
            "command".to_string(),
            "takeoff".to_string()
        ]))
        .unwrap(),
        json!({ "channel": "autopilot", "payload": ["command", "takeoff"] })
    );
}

#[test]
fn test_event_parses_from_host() {
    let event: HostEvent =
        serde_json::from_value(json!({ "channel": "drone-connection", "payload": true })).unwrap();
    assert_eq!(event, HostEvent::DroneConnection(true));

    let event: HostEvent = serde_json::from_value(json!({
        "channel": "file-opened",
        "payload": [{ "kind": "takeoff" }, { "kind": "land" }]
    }))
    .unwrap();
    assert_eq!(
        event,
        HostEvent::FileOpened(vec![FlightInstruction::Takeoff, FlightInstruction::Land])
    );
}

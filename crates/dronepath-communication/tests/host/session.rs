use std::sync::Arc;

use dronepath_communication::{FlightSession, HostEvent, HostMessage, RecordingLink};
use dronepath_core::{thread_safe_rw, ConnectionError, ConnectionStatus, DroneState, Error};
use dronepath_planner::{Direction, FlightBuilder, FlightInstruction, Horizontal, Vertical};

fn session(link: Arc<RecordingLink>) -> FlightSession {
    FlightSession::new(
        FlightBuilder::default(),
        thread_safe_rw(DroneState::default()),
        link,
    )
}

fn command() -> HostMessage {
    HostMessage::SingleInstruction("command".to_string())
}

#[tokio::test]
async fn test_connect_enters_sdk_mode() {
    let link = Arc::new(RecordingLink::new());
    let mut session = session(link.clone());

    session.connect().await.unwrap();

    assert_eq!(session.connection(), ConnectionStatus::Connected);
    assert_eq!(link.messages(), vec![HostMessage::Connect, command()]);
}

#[tokio::test]
async fn test_failed_connect_leaves_disconnected() {
    let link = Arc::new(RecordingLink::new());
    link.fail_next(ConnectionError::IoError {
        reason: "network unreachable".to_string(),
    });
    let mut session = session(link.clone());

    let result = session.connect().await;
    assert!(matches!(result, Err(Error::Connection(_))));
    assert_eq!(session.connection(), ConnectionStatus::Disconnected);
    assert!(link.messages().is_empty());
}

#[tokio::test]
async fn test_drone_connection_events() {
    let link = Arc::new(RecordingLink::connected());
    let mut session = session(link.clone());

    session
        .handle_event(HostEvent::DroneConnection(true))
        .await
        .unwrap();
    assert_eq!(session.connection(), ConnectionStatus::Connected);
    assert_eq!(link.messages(), vec![command()]);

    session
        .handle_event(HostEvent::DroneConnection(false))
        .await
        .unwrap();
    assert_eq!(session.connection(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_file_opened_replaces_plan() {
    let mut session = session(Arc::new(RecordingLink::connected()));
    let opened = vec![
        FlightInstruction::Takeoff,
        FlightInstruction::hold(2.0),
        FlightInstruction::Land,
    ];

    session
        .handle_event(HostEvent::FileOpened(opened.clone()))
        .await
        .unwrap();
    assert_eq!(session.builder().instructions(), opened.as_slice());

    let broken = vec![FlightInstruction::Takeoff, FlightInstruction::hold(1.0)];
    let result = session.handle_event(HostEvent::FileOpened(broken)).await;
    assert!(matches!(result, Err(Error::Flight(_))));
    assert_eq!(session.builder().instructions(), opened.as_slice());
}

#[tokio::test]
async fn test_request_replies_with_instructions() {
    let link = Arc::new(RecordingLink::connected());
    let mut session = session(link.clone());
    session
        .builder_mut()
        .add_move(Direction::new(Vertical::Up, Horizontal::None).unwrap())
        .unwrap();

    session
        .handle_event(HostEvent::RequestFlightInstructions)
        .await
        .unwrap();

    let expected = session.builder().instructions().to_vec();
    assert_eq!(expected.len(), 3);
    assert_eq!(link.messages(), vec![HostMessage::FlightInstructions(expected)]);
}

//! UdpDroneLink against a fake drone on the loopback interface

use std::net::SocketAddr;
use std::time::Duration;

use dronepath_communication::{HostLink, HostMessage, UdpDroneLink, UdpLinkConfig};
use dronepath_core::ConnectionError;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Answers `ok` to everything except `flip x`, stops after `land`
async fn fake_drone() -> (SocketAddr, JoinHandle<Vec<String>>) {
    fake_drone_with(|_| Duration::ZERO).await
}

/// Like [`fake_drone`], but waits `reply_delay(command)` before answering
async fn fake_drone_with(
    reply_delay: fn(&str) -> Duration,
) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
            let command = String::from_utf8_lossy(&buf[..len]).to_string();
            tokio::time::sleep(reply_delay(&command)).await;
            let reply = if command == "flip x" {
                "error Not joystick"
            } else {
                "ok"
            };
            socket.send_to(reply.as_bytes(), peer).await.unwrap();
            received.push(command.clone());
            if command == "land" {
                return received;
            }
        }
    });

    (addr, handle)
}

fn link_to(addr: SocketAddr, timeout: Duration) -> UdpDroneLink {
    UdpDroneLink::new(UdpLinkConfig {
        drone_address: addr.to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        response_timeout: timeout,
    })
}

#[tokio::test]
async fn test_autopilot_commands_sent_in_order() {
    let (addr, drone) = fake_drone().await;
    let link = link_to(addr, Duration::from_secs(2));

    link.send(HostMessage::Connect).await.unwrap();
    assert!(link.is_connected());

    link.send(HostMessage::Autopilot(vec![
        "takeoff".to_string(),
        "go 100 0 0 20".to_string(),
        "land".to_string(),
    ]))
    .await
    .unwrap();

    assert_eq!(
        drone.await.unwrap(),
        vec!["command", "takeoff", "go 100 0 0 20", "land"]
    );
}

#[tokio::test]
async fn test_video_stream_and_ignored_recording() {
    let (addr, drone) = fake_drone().await;
    let link = link_to(addr, Duration::from_secs(2));

    link.send(HostMessage::Connect).await.unwrap();
    link.send(HostMessage::EnableVideoStream).await.unwrap();
    link.send(HostMessage::StartRecording).await.unwrap();
    link.send(HostMessage::SingleInstruction("land".to_string()))
        .await
        .unwrap();

    assert_eq!(drone.await.unwrap(), vec!["command", "streamon", "land"]);
}

#[tokio::test]
async fn test_error_response_is_rejected() {
    let (addr, _drone) = fake_drone().await;
    let link = link_to(addr, Duration::from_secs(2));
    link.send(HostMessage::Connect).await.unwrap();

    let result = link.command("flip x").await;
    match result {
        Err(ConnectionError::Rejected { command, response }) => {
            assert_eq!(command, "flip x");
            assert_eq!(response, "error Not joystick");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_silent_drone_times_out() {
    let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let link = link_to(silent.local_addr().unwrap(), Duration::from_millis(200));

    let result = link.send(HostMessage::Connect).await;
    assert!(matches!(
        result,
        Err(ConnectionError::Timeout { ref command, timeout_ms: 200 }) if command == "command"
    ));
    assert!(!link.is_connected());
}

fn commands(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_go_wait_covers_travel_time() {
    // 100 cm at 100 cm/s answers after a second, well past the base timeout
    let (addr, drone) = fake_drone_with(|command| {
        if command.starts_with("go") {
            Duration::from_millis(600)
        } else {
            Duration::ZERO
        }
    })
    .await;
    let link = link_to(addr, Duration::from_millis(300));
    link.send(HostMessage::Connect).await.unwrap();

    link.send(HostMessage::Autopilot(commands(&[
        "takeoff",
        "go 100 0 0 100",
        "land",
    ])))
    .await
    .unwrap();

    assert_eq!(
        drone.await.unwrap(),
        vec!["command", "takeoff", "go 100 0 0 100", "land"]
    );
}

#[tokio::test]
async fn test_failed_command_still_lands() {
    let (addr, drone) = fake_drone().await;
    let link = link_to(addr, Duration::from_secs(2));
    link.send(HostMessage::Connect).await.unwrap();

    let result = link
        .send(HostMessage::Autopilot(commands(&[
            "takeoff",
            "flip x",
            "go 100 0 0 20",
            "land",
        ])))
        .await;
    assert!(matches!(result, Err(ConnectionError::Rejected { ref command, .. }) if command == "flip x"));

    assert_eq!(
        drone.await.unwrap(),
        vec!["command", "takeoff", "flip x", "land"]
    );
}

#[tokio::test]
async fn test_timed_out_command_still_lands() {
    let (addr, drone) = fake_drone_with(|command| {
        if command == "takeoff" {
            Duration::from_millis(500)
        } else {
            Duration::ZERO
        }
    })
    .await;
    let link = link_to(addr, Duration::from_millis(200));
    link.send(HostMessage::Connect).await.unwrap();

    let result = link
        .send(HostMessage::Autopilot(commands(&[
            "takeoff",
            "go 200 0 0 20",
            "land",
        ])))
        .await;
    assert!(matches!(result, Err(ConnectionError::Timeout { ref command, .. }) if command == "takeoff"));

    assert_eq!(drone.await.unwrap(), vec!["command", "takeoff", "land"]);
}

//! Autopilot replay against paused tokio time

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dronepath_communication::{
    Autopilot, HostLink, HostMessage, PlaybackOutcome, PlaybackState, PlaybackTiming,
    RecordingLink,
};
use dronepath_core::{
    thread_safe_rw, ConnectionError, DroneState, Error, FlightPhase, PlaybackError, Point3D,
    SharedDroneState,
};
use dronepath_planner::{Direction, FlightInstruction, Horizontal, Rotation, RotationAngle, Vertical};
use parking_lot::Mutex;
use tokio::time::sleep;

/// Link that needs four seconds per flight command, like a drone
/// acknowledging each move once it has flown it
#[derive(Default)]
struct SlowLink {
    sent: Mutex<Vec<String>>,
}

impl SlowLink {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl HostLink for SlowLink {
    fn name(&self) -> &str {
        "slow"
    }

    async fn send(&self, message: HostMessage) -> Result<(), ConnectionError> {
        match message {
            HostMessage::Autopilot(commands) => {
                for command in commands {
                    sleep(Duration::from_secs(4)).await;
                    self.sent.lock().push(command);
                }
            }
            HostMessage::SingleInstruction(command) => {
                self.sent.lock().push(format!("single:{}", command));
            }
            _ => {}
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

fn forward(distance: f64) -> FlightInstruction {
    FlightInstruction::step(
        Direction::new(Vertical::Level, Horizontal::Forward).unwrap(),
        distance,
        20,
    )
}

fn plan() -> Vec<FlightInstruction> {
    vec![FlightInstruction::Takeoff, forward(1.0), FlightInstruction::Land]
}

fn setup() -> (Arc<Autopilot>, Arc<RecordingLink>, SharedDroneState) {
    let link = Arc::new(RecordingLink::connected());
    let drone = thread_safe_rw(DroneState::new(Point3D::ORIGIN));
    let pilot = Autopilot::new(
        drone.clone(),
        link.clone(),
        Point3D::ORIGIN,
        PlaybackTiming::default(),
    );
    (Arc::new(pilot), link, drone)
}

fn position(drone: &SharedDroneState) -> Point3D {
    drone.read().position()
}

fn expected_commands() -> HostMessage {
    HostMessage::Autopilot(
        ["command", "takeoff", "go 100 0 0 20", "land"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_positions_follow_steps_in_order() {
    let (pilot, link, drone) = setup();
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 1.0, 0.0));

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 1.0, 1.0));

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 0.0, 1.0));
    assert_eq!(drone.read().phase(), FlightPhase::Landed);

    assert_eq!(run.await.unwrap().unwrap(), PlaybackOutcome::Completed);
    assert_eq!(pilot.state(), PlaybackState::Settling);
    assert_eq!(link.messages(), vec![expected_commands()]);

    sleep(Duration::from_millis(10_000)).await;
    assert_eq!(position(&drone), Point3D::ORIGIN);
    assert_eq!(drone.read().rotation(), std::f64::consts::PI);
    assert_eq!(drone.read().phase(), FlightPhase::Grounded);
    assert_eq!(pilot.state(), PlaybackState::Complete);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_remaining_steps() {
    let (pilot, link, drone) = setup();
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };

    sleep(Duration::from_millis(1000)).await;
    pilot.cancel().await.unwrap();

    assert_eq!(
        run.await.unwrap().unwrap(),
        PlaybackOutcome::Cancelled { index: 1 }
    );

    sleep(Duration::from_secs(30)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 1.0, 0.0));
    assert_eq!(pilot.state(), PlaybackState::Cancelled);
    assert_eq!(
        link.messages(),
        vec![
            expected_commands(),
            HostMessage::SingleInstruction("land".to_string())
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_until_resume() {
    let (pilot, _link, drone) = setup();
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };

    sleep(Duration::from_millis(1000)).await;
    pilot.pause().unwrap();
    assert_eq!(pilot.state(), PlaybackState::Paused);

    sleep(Duration::from_millis(10_000)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 1.0, 0.0));

    pilot.resume().unwrap();
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 1.0, 1.0));

    assert_eq!(run.await.unwrap().unwrap(), PlaybackOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_second_run_refused_until_settled() {
    let (pilot, _link, _drone) = setup();
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };

    sleep(Duration::from_millis(100)).await;
    assert!(matches!(
        pilot.run(&plan()).await,
        Err(Error::Playback(PlaybackError::AlreadyRunning))
    ));

    run.await.unwrap().unwrap();
    assert!(matches!(
        pilot.run(&plan()).await,
        Err(Error::Playback(PlaybackError::AlreadyRunning))
    ));

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(pilot.state(), PlaybackState::Complete);
    let again = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };
    assert_eq!(again.await.unwrap().unwrap(), PlaybackOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_recording_wraps_the_flight() {
    let (pilot, link, drone) = setup();
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run_and_record(&plan()).await })
    };

    sleep(Duration::from_millis(2000)).await;
    assert!(pilot.is_recording());
    assert_eq!(link.messages(), vec![HostMessage::StartRecording]);
    assert_eq!(position(&drone), Point3D::ORIGIN);

    sleep(Duration::from_millis(4000)).await;
    assert_eq!(position(&drone), Point3D::new(0.0, 1.0, 0.0));
    assert_eq!(
        link.messages(),
        vec![HostMessage::StartRecording, expected_commands()]
    );

    assert_eq!(run.await.unwrap().unwrap(), PlaybackOutcome::Completed);
    assert!(pilot.is_recording());

    sleep(Duration::from_millis(11_000)).await;
    assert!(!pilot.is_recording());
    assert_eq!(link.messages().last(), Some(&HostMessage::StopRecording));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_drops_undelivered_commands() {
    let link = Arc::new(SlowLink::default());
    let pilot = Arc::new(Autopilot::new(
        thread_safe_rw(DroneState::new(Point3D::ORIGIN)),
        link.clone(),
        Point3D::ORIGIN,
        PlaybackTiming::default(),
    ));
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };

    sleep(Duration::from_millis(1000)).await;
    pilot.cancel().await.unwrap();
    run.await.unwrap().unwrap();

    sleep(Duration::from_secs(60)).await;
    assert_eq!(link.sent(), vec!["single:land"]);
}

#[tokio::test(start_paused = true)]
async fn test_run_after_cancel_starts_from_initial_facing() {
    let (pilot, _link, drone) = setup();
    let turned = vec![
        FlightInstruction::Takeoff,
        FlightInstruction::rotate(Rotation::Cw, RotationAngle::Quarter),
        forward(1.0),
        FlightInstruction::Land,
    ];
    let run = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&turned).await })
    };

    // takeoff 5 s, then the rotation has been applied
    sleep(Duration::from_millis(6000)).await;
    pilot.cancel().await.unwrap();
    run.await.unwrap().unwrap();
    assert_ne!(drone.read().rotation(), std::f64::consts::PI);

    let again = {
        let pilot = pilot.clone();
        tokio::spawn(async move { pilot.run(&plan()).await })
    };
    sleep(Duration::from_millis(5500)).await;
    assert!(position(&drone).approx_eq(&Point3D::new(0.0, 1.0, 1.0)));
    assert_eq!(again.await.unwrap().unwrap(), PlaybackOutcome::Completed);
}

//! Autopilot replay.
//!
//! Sends the whole flight to the link as one `Autopilot` dispatch, then
//! walks the [`PlaybackScheduler`] with real delays so the shared drone
//! state follows the real drone. The land settle phase runs in a spawned
//! task after `run` has returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dronepath_core::event_bus::{ErrorEvent, PlaybackEvent};
use dronepath_core::{
    emit, AppEvent, ConnectionError, PlaybackError, Point3D, Result, SharedDroneState,
};
use dronepath_planner::{validate_sequence, FlightInstruction};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::scheduler::{PlaybackScheduler, PlaybackState, PlaybackTiming};
use crate::host::{HostMessage, SDK_MODE_COMMAND};
use crate::link::HostLink;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every step was applied; settling continues in the background
    Completed,
    /// Cancelled before step `index` was applied
    Cancelled { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Play,
    Pause,
    Cancel,
}

/// Replays flight plans against the shared drone state
pub struct Autopilot {
    drone: SharedDroneState,
    link: Arc<dyn HostLink>,
    ground_start: Point3D,
    timing: PlaybackTiming,
    scheduler: Arc<Mutex<PlaybackScheduler>>,
    control: watch::Sender<Control>,
    dispatch_task: Arc<RwLock<Option<JoinHandle<()>>>>,
    settle_task: Arc<RwLock<Option<JoinHandle<()>>>>,
    recording: Arc<AtomicBool>,
}

impl Autopilot {
    pub fn new(
        drone: SharedDroneState,
        link: Arc<dyn HostLink>,
        ground_start: Point3D,
        timing: PlaybackTiming,
    ) -> Self {
        let (control, _) = watch::channel(Control::Play);
        Self {
            drone,
            link,
            ground_start,
            timing,
            scheduler: Arc::new(Mutex::new(PlaybackScheduler::default())),
            control,
            dispatch_task: Arc::new(RwLock::new(None)),
            settle_task: Arc::new(RwLock::new(None)),
            recording: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.scheduler.lock().state()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    pub fn timing(&self) -> &PlaybackTiming {
        &self.timing
    }

    /// Replay `instructions`, returning once `Land` has been applied
    pub async fn run(&self, instructions: &[FlightInstruction]) -> Result<PlaybackOutcome> {
        let control = self.begin(instructions)?;
        self.drive(instructions, control).await
    }

    /// Start recording, wait for the warm-up, then replay
    ///
    /// Recording stops when the drone has settled after landing.
    pub async fn run_and_record(
        &self,
        instructions: &[FlightInstruction],
    ) -> Result<PlaybackOutcome> {
        let mut control = self.begin(instructions)?;

        if let Err(e) = self.link.send(HostMessage::StartRecording).await {
            self.scheduler.lock().cancel().ok();
            return Err(e.into());
        }
        self.recording.store(true, Ordering::SeqCst);
        info!("Recording started, flight begins in {:?}", self.timing.record_warmup);

        tokio::select! {
            _ = tokio::time::sleep(self.timing.record_warmup) => {}
            _ = control.wait_for(|c| *c == Control::Cancel) => {
                return Ok(PlaybackOutcome::Cancelled { index: 0 });
            }
        }

        self.drive(instructions, control).await
    }

    /// Hold before the next step
    pub fn pause(&self) -> std::result::Result<(), PlaybackError> {
        let index = {
            let mut scheduler = self.scheduler.lock();
            scheduler.pause()?;
            scheduler.index()
        };
        self.control.send_replace(Control::Pause);
        info!("Flight paused at step {}", index);
        emit!(AppEvent::Playback(PlaybackEvent::Paused { index }));
        Ok(())
    }

    pub fn resume(&self) -> std::result::Result<(), PlaybackError> {
        let index = {
            let mut scheduler = self.scheduler.lock();
            scheduler.resume()?;
            scheduler.index()
        };
        self.control.send_replace(Control::Play);
        info!("Flight resumed at step {}", index);
        emit!(AppEvent::Playback(PlaybackEvent::Resumed { index }));
        Ok(())
    }

    /// Stop the replay and tell the drone to land
    ///
    /// Commands of the cancelled flight still waiting on the link are
    /// dropped before `land` goes out. Also aborts a pending settle and
    /// stops any recording.
    pub async fn cancel(&self) -> Result<()> {
        let index = {
            let mut scheduler = self.scheduler.lock();
            scheduler.cancel()?;
            scheduler.index()
        };
        self.control.send_replace(Control::Cancel);
        if let Some(handle) = self.settle_task.write().take() {
            handle.abort();
        }
        let dispatch = self.dispatch_task.write().take();
        if let Some(handle) = dispatch {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Dispatch task failed: {}", e);
                }
            }
        }
        warn!("Flight cancelled at step {}", index);
        emit!(AppEvent::Playback(PlaybackEvent::Cancelled { index }));

        let landed = self
            .link
            .send(HostMessage::SingleInstruction(
                FlightInstruction::Land.drone_command(),
            ))
            .await;
        if self.recording.swap(false, Ordering::SeqCst) {
            if let Err(e) = self.link.send(HostMessage::StopRecording).await {
                report_link_error(&e);
            }
        }
        landed.map_err(Into::into)
    }

    fn begin(&self, instructions: &[FlightInstruction]) -> Result<watch::Receiver<Control>> {
        if !self.link.is_connected() {
            return Err(ConnectionError::NotConnected.into());
        }
        validate_sequence(instructions)?;

        let mut scheduler = self.scheduler.lock();
        if scheduler.state().is_active() {
            return Err(PlaybackError::AlreadyRunning.into());
        }
        *scheduler = PlaybackScheduler::new(instructions.to_vec(), self.ground_start, self.timing);
        scheduler.start()?;
        self.control.send_replace(Control::Play);
        Ok(self.control.subscribe())
    }

    async fn drive(
        &self,
        instructions: &[FlightInstruction],
        mut control: watch::Receiver<Control>,
    ) -> Result<PlaybackOutcome> {
        let commands: Vec<String> = std::iter::once(SDK_MODE_COMMAND.to_string())
            .chain(instructions.iter().map(FlightInstruction::drone_command))
            .collect();
        self.dispatch(commands);

        info!("Flight started with {} steps", instructions.len());
        emit!(AppEvent::Playback(PlaybackEvent::Started {
            steps: instructions.len(),
            started_at: Utc::now(),
        }));

        loop {
            if *control.borrow_and_update() == Control::Pause {
                let resumed = control.wait_for(|c| *c != Control::Pause).await;
                if resumed.map(|c| *c == Control::Cancel).unwrap_or(true) {
                    return Ok(self.cancelled());
                }
            }

            let (step, state) = {
                let mut scheduler = self.scheduler.lock();
                let mut drone = self.drone.write();
                (scheduler.next_step(&mut drone), scheduler.state())
            };

            let Some(step) = step else {
                match state {
                    // paused between the check above and the step
                    PlaybackState::Paused => continue,
                    PlaybackState::Cancelled => return Ok(self.cancelled()),
                    _ => return Ok(PlaybackOutcome::Completed),
                }
            };

            let (position, rotation) = {
                let drone = self.drone.read();
                (drone.position(), drone.rotation())
            };
            debug!("Step {}: {} -> {}", step.index, step.instruction, position);
            emit!(AppEvent::Playback(PlaybackEvent::Step {
                index: step.index,
                label: step.instruction.message(),
                position,
                rotation,
            }));

            if state == PlaybackState::Settling {
                self.spawn_settle();
                info!("Flight completed, settling for {:?}", step.delay);
                emit!(AppEvent::Playback(PlaybackEvent::Completed));
                return Ok(PlaybackOutcome::Completed);
            }

            tokio::select! {
                _ = tokio::time::sleep(step.delay) => {}
                _ = control.wait_for(|c| *c == Control::Cancel) => {
                    return Ok(self.cancelled());
                }
            }
        }
    }

    fn cancelled(&self) -> PlaybackOutcome {
        PlaybackOutcome::Cancelled {
            index: self.scheduler.lock().index(),
        }
    }

    /// Hand the command list to the link without waiting for the drone
    fn dispatch(&self, commands: Vec<String>) {
        let link = self.link.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = link.send(HostMessage::Autopilot(commands)).await {
                report_link_error(&e);
            }
        });

        if let Some(previous) = self.dispatch_task.write().replace(handle) {
            previous.abort();
        }
    }

    fn spawn_settle(&self) {
        let scheduler = self.scheduler.clone();
        let drone = self.drone.clone();
        let link = self.link.clone();
        let recording = self.recording.clone();
        let delay = self.timing.land_settle;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let settled = {
                let mut scheduler = scheduler.lock();
                let mut drone = drone.write();
                scheduler.finish_settling(&mut drone)
            };
            if !settled {
                return;
            }
            if recording.swap(false, Ordering::SeqCst) {
                if let Err(e) = link.send(HostMessage::StopRecording).await {
                    report_link_error(&e);
                }
            }
            info!("Drone returned to start");
            emit!(AppEvent::Playback(PlaybackEvent::Settled));
        });

        if let Some(previous) = self.settle_task.write().replace(handle) {
            previous.abort();
        }
    }
}

fn report_link_error(e: &ConnectionError) {
    error!("Link error: {}", e);
    emit!(AppEvent::Error(ErrorEvent::Link {
        message: e.to_string(),
    }));
}

impl std::fmt::Debug for Autopilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autopilot")
            .field("link", &self.link.name())
            .field("state", &self.state())
            .field("timing", &self.timing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::RecordingLink;
    use dronepath_core::{thread_safe_rw, DroneState, Error};

    fn autopilot(link: Arc<RecordingLink>) -> Autopilot {
        Autopilot::new(
            thread_safe_rw(DroneState::new(Point3D::ORIGIN)),
            link,
            Point3D::ORIGIN,
            PlaybackTiming::default(),
        )
    }

    #[tokio::test]
    async fn test_requires_connected_link() {
        let pilot = autopilot(Arc::new(RecordingLink::new()));
        let result = pilot
            .run(&[FlightInstruction::Takeoff, FlightInstruction::Land])
            .await;
        assert!(matches!(
            result,
            Err(Error::Connection(ConnectionError::NotConnected))
        ));
    }

    #[tokio::test]
    async fn test_rejects_malformed_plan() {
        let pilot = autopilot(Arc::new(RecordingLink::connected()));
        let result = pilot.run(&[FlightInstruction::Land]).await;
        assert!(matches!(result, Err(Error::Flight(_))));
        assert_eq!(pilot.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_pause_without_run() {
        let pilot = autopilot(Arc::new(RecordingLink::connected()));
        assert_eq!(pilot.pause(), Err(PlaybackError::NotRunning));
        assert_eq!(pilot.resume(), Err(PlaybackError::NotRunning));
    }
}

//! Step scheduler for flight replay.
//!
//! Owns the step index and replay state. Each call to
//! [`PlaybackScheduler::next_step`] applies one instruction to the drone
//! state and says how long to wait before the next one. Nothing here
//! sleeps; the autopilot does the waiting.

use std::time::Duration;

use dronepath_core::{DroneState, PlaybackError, Point3D};
use dronepath_planner::projector::world_offset;
use dronepath_planner::{FlightInstruction, Rotation};

/// Height gained by the takeoff command, in metres
pub const TAKEOFF_HEIGHT: f64 = 1.0;

/// Delays applied after each kind of step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub takeoff: Duration,
    pub movement: Duration,
    pub rotation: Duration,
    /// Time between touchdown and returning the model to the start point
    pub land_settle: Duration,
    /// Time between starting a recording and starting the flight
    pub record_warmup: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self::from_millis(5000, 3000, 3000, 10000, 5000)
    }
}

impl PlaybackTiming {
    pub fn from_millis(
        takeoff: u64,
        movement: u64,
        rotation: u64,
        land_settle: u64,
        record_warmup: u64,
    ) -> Self {
        Self {
            takeoff: Duration::from_millis(takeoff),
            movement: Duration::from_millis(movement),
            rotation: Duration::from_millis(rotation),
            land_settle: Duration::from_millis(land_settle),
            record_warmup: Duration::from_millis(record_warmup),
        }
    }

    /// Delay after applying `instruction`
    pub fn delay_for(&self, instruction: &FlightInstruction) -> Duration {
        match instruction {
            FlightInstruction::Takeoff => self.takeoff,
            FlightInstruction::Move { .. } => self.movement,
            FlightInstruction::Rotate { .. } => self.rotation,
            FlightInstruction::Hold { seconds } => Duration::from_secs_f64(seconds.max(0.0)),
            FlightInstruction::Land => self.land_settle,
        }
    }
}

/// Replay lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Landed, waiting to return the model to the start point
    Settling,
    Complete,
    Cancelled,
}

impl PlaybackState {
    /// True while a run owns the drone state
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PlaybackState::Running | PlaybackState::Paused | PlaybackState::Settling
        )
    }
}

/// One applied instruction
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStep {
    pub index: usize,
    pub instruction: FlightInstruction,
    /// Wait before the next step
    pub delay: Duration,
}

/// Explicit step scheduler over a flight plan
#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    instructions: Vec<FlightInstruction>,
    timing: PlaybackTiming,
    ground_start: Point3D,
    index: usize,
    state: PlaybackState,
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(Vec::new(), Point3D::ORIGIN, PlaybackTiming::default())
    }
}

impl PlaybackScheduler {
    /// Schedule `instructions` for a drone standing at `ground_start`
    pub fn new(
        instructions: Vec<FlightInstruction>,
        ground_start: Point3D,
        timing: PlaybackTiming,
    ) -> Self {
        Self {
            instructions,
            timing,
            ground_start,
            index: 0,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the next step to apply
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn timing(&self) -> &PlaybackTiming {
        &self.timing
    }

    pub fn ground_start(&self) -> Point3D {
        self.ground_start
    }

    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Idle {
            return Err(PlaybackError::AlreadyRunning);
        }
        self.state = PlaybackState::Running;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Running {
            return Err(PlaybackError::NotRunning);
        }
        self.state = PlaybackState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Paused {
            return Err(PlaybackError::NotRunning);
        }
        self.state = PlaybackState::Running;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), PlaybackError> {
        if !self.state.is_active() {
            return Err(PlaybackError::NotRunning);
        }
        self.state = PlaybackState::Cancelled;
        Ok(())
    }

    /// Apply the next instruction to `drone`
    ///
    /// Returns `None` unless the scheduler is running. Applying `Land`
    /// moves the scheduler to `Settling`.
    pub fn next_step(&mut self, drone: &mut DroneState) -> Option<PlaybackStep> {
        if self.state != PlaybackState::Running {
            return None;
        }
        let Some(instruction) = self.instructions.get(self.index).cloned() else {
            self.state = PlaybackState::Complete;
            return None;
        };

        match &instruction {
            FlightInstruction::Takeoff => {
                // a cancelled run leaves the last facing behind
                drone.reset_to(self.ground_start);
                drone.take_off(self.ground_start + Point3D::new(0.0, TAKEOFF_HEIGHT, 0.0));
            }
            FlightInstruction::Move { .. } => {
                if let Some(delta) = world_offset(drone.heading(), &instruction) {
                    drone.translate(delta);
                }
            }
            FlightInstruction::Rotate { rotation, angle } => match rotation {
                Rotation::Cw => drone.rotate_by(-angle.radians()),
                Rotation::Ccw => drone.rotate_by(angle.radians()),
            },
            FlightInstruction::Hold { .. } => {}
            FlightInstruction::Land => {
                drone.land(self.ground_start.y);
                self.state = PlaybackState::Settling;
            }
        }

        let step = PlaybackStep {
            index: self.index,
            delay: self.timing.delay_for(&instruction),
            instruction,
        };
        self.index += 1;
        if self.state == PlaybackState::Running && self.index >= self.instructions.len() {
            self.state = PlaybackState::Complete;
        }
        Some(step)
    }

    /// Return the drone to the ground start once the settle delay is over
    ///
    /// Returns false when there was nothing to settle.
    pub fn finish_settling(&mut self, drone: &mut DroneState) -> bool {
        if self.state != PlaybackState::Settling {
            return false;
        }
        drone.reset_to(self.ground_start);
        self.state = PlaybackState::Complete;
        true
    }
}

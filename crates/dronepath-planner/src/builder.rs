//! Flight builder state.
//!
//! Owns the instruction store and the build settings, and answers the
//! questions the build screen asks: where the path ends, which way the drone
//! faces, and which controls are still usable.

use std::path::{Path, PathBuf};

use dronepath_core::event_bus::{AppEvent, FlightEvent};
use dronepath_core::{emit, FlightError, Heading, Point3D};
use tracing::{debug, info};

use crate::instruction::{
    Direction, FlightInstruction, Rotation, RotationAngle, MAX_SPEED, MIN_SPEED,
};
use crate::limits::{ControlLimits, FlightLimits};
use crate::projector::{Projection, Projector};
use crate::serialization::{FlightFile, FlightSettingsData};
use crate::store::InstructionStore;

/// Shortest step the builder accepts, in metres
pub const MIN_DISTANCE: f64 = 0.1;
/// Longest step the builder accepts, in metres
pub const MAX_DISTANCE: f64 = 5.0;

/// Settings for building a flight
#[derive(Clone, Debug, PartialEq)]
pub struct BuildSettings {
    /// Step distance in metres
    pub distance: f64,
    /// Move speed in cm/s
    pub speed: u32,
    /// Edge length of the flight area in metres
    pub scale: f64,
    /// Post-takeoff start point
    pub start: Point3D,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            distance: 0.5,
            speed: 20,
            scale: 10.0,
            start: Point3D::new(0.0, 1.0, 0.0),
        }
    }
}

/// Flight plan under construction
#[derive(Clone, Debug)]
pub struct FlightBuilder {
    store: InstructionStore,
    settings: BuildSettings,
    projector: Projector,
    limits: FlightLimits,
    pub flight_name: String,
    pub current_file_path: Option<PathBuf>,
    pub is_modified: bool,
}

impl Default for FlightBuilder {
    fn default() -> Self {
        Self::new(BuildSettings::default())
    }
}

impl FlightBuilder {
    pub fn new(settings: BuildSettings) -> Self {
        Self {
            store: InstructionStore::new(),
            projector: Projector::new(settings.start),
            limits: FlightLimits::from_scale(settings.scale),
            settings,
            flight_name: "Untitled".to_string(),
            current_file_path: None,
            is_modified: false,
        }
    }

    pub fn store(&self) -> &InstructionStore {
        &self.store
    }

    pub fn instructions(&self) -> &[FlightInstruction] {
        self.store.as_slice()
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn limits(&self) -> &FlightLimits {
        &self.limits
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Set the step distance, clamped to the accepted range
    pub fn set_distance(&mut self, distance: f64) {
        self.settings.distance = if distance.is_finite() {
            distance.clamp(MIN_DISTANCE, MAX_DISTANCE)
        } else {
            BuildSettings::default().distance
        };
    }

    /// Set the move speed, clamped to what the drone accepts
    pub fn set_speed(&mut self, speed: u32) {
        self.settings.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Add one step in `direction` using the current distance and speed
    ///
    /// Fails without touching the plan if the step would leave the flight
    /// area.
    pub fn add_move(&mut self, direction: Direction) -> Result<(), FlightError> {
        let instruction =
            FlightInstruction::step(direction, self.settings.distance, self.settings.speed);
        let projection = self.projection();
        let offset = direction.offset(self.settings.distance);
        let target = projection.tip()
            + projection
                .heading
                .body_to_world(offset.forward, offset.left, offset.up);

        if !self.limits.contains(&target) {
            debug!("Rejected {}: {} is outside the flight area", direction, target);
            return Err(FlightError::OutOfBounds {
                label: direction.label(),
            });
        }

        self.push(instruction);
        Ok(())
    }

    pub fn add_rotation(&mut self, rotation: Rotation, angle: RotationAngle) {
        self.push(FlightInstruction::rotate(rotation, angle));
    }

    /// Hover in place for `seconds`
    pub fn add_hold(&mut self, seconds: f64) -> Result<(), FlightError> {
        let instruction = FlightInstruction::hold(seconds);
        instruction
            .validate()
            .map_err(|reason| FlightError::InvalidInstruction {
                index: self.store.len() - 1,
                reason,
            })?;
        self.push(instruction);
        Ok(())
    }

    pub fn delete_last(&mut self) -> Option<FlightInstruction> {
        let removed = self.store.delete_last();
        if let Some(instruction) = &removed {
            debug!("Deleted {}", instruction);
            self.mark_changed();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.is_modified = true;
        emit!(AppEvent::Flight(FlightEvent::Cleared));
    }

    /// Replace the plan with an externally supplied sequence
    pub fn replace_instructions(
        &mut self,
        instructions: Vec<FlightInstruction>,
    ) -> Result<(), FlightError> {
        self.store.replace_all(instructions)?;
        self.mark_changed();
        Ok(())
    }

    pub fn projection(&self) -> Projection {
        self.projector.project(self.store.as_slice())
    }

    pub fn path(&self) -> Vec<Point3D> {
        self.projector.project_path(self.store.as_slice())
    }

    pub fn current_point(&self) -> Point3D {
        self.projector.current_point(self.store.as_slice())
    }

    pub fn heading(&self) -> Heading {
        self.projector.final_heading(self.store.as_slice())
    }

    /// Controls that must be disabled for the current plan
    pub fn control_limits(&self) -> ControlLimits {
        let projection = self.projection();
        ControlLimits::from_point(&self.limits, projection.tip(), projection.heading)
            .with_empty_plan(self.store.has_no_moves())
    }

    /// Save the plan to a flight file
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = FlightFile::from_instructions(
            &self.flight_name,
            self.store.to_vec(),
            FlightSettingsData {
                distance: self.settings.distance,
                speed: self.settings.speed,
            },
        );
        file.save_to_file(&path)?;

        info!("Exported flight to {}", path.as_ref().display());
        emit!(AppEvent::Flight(FlightEvent::Exported {
            path: path.as_ref().to_path_buf(),
            count: self.store.len(),
        }));

        self.current_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Load a plan from a flight file, replacing the current one
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = FlightFile::load_from_file(&path)?;

        self.store.replace_all(file.instructions)?;
        self.set_distance(file.settings.distance);
        self.set_speed(file.settings.speed);
        self.flight_name = file.metadata.name;

        info!("Imported flight from {}", path.as_ref().display());
        emit!(AppEvent::Flight(FlightEvent::Imported {
            path: path.as_ref().to_path_buf(),
            count: self.store.len(),
        }));

        self.current_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    fn push(&mut self, instruction: FlightInstruction) {
        self.store.add(instruction);
        self.mark_changed();
    }

    fn mark_changed(&mut self) {
        self.is_modified = true;
        emit!(AppEvent::Flight(FlightEvent::InstructionsChanged {
            count: self.store.len(),
        }));
    }
}

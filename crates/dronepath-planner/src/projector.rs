//! Coordinate projection.
//!
//! Folds an instruction sequence into absolute render-space points. Moves are
//! body-frame offsets, so the fold carries the heading along and rotates each
//! offset before accumulating it.

use crate::instruction::{FlightInstruction, Rotation};
use dronepath_core::{Heading, Point3D};

/// Result of projecting a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Start point followed by one point per move
    pub points: Vec<Point3D>,
    /// Facing after every rotation has been applied
    pub heading: Heading,
}

impl Projection {
    /// The last projected point
    pub fn tip(&self) -> Point3D {
        // points always holds at least the start point
        self.points.last().copied().unwrap_or_default()
    }
}

/// Heading after applying one rotation instruction
pub fn apply_rotation(heading: Heading, instruction: &FlightInstruction) -> Heading {
    match instruction {
        FlightInstruction::Rotate {
            rotation: Rotation::Cw,
            angle,
        } => heading.turn_cw(angle.quarters()),
        FlightInstruction::Rotate {
            rotation: Rotation::Ccw,
            angle,
        } => heading.turn_ccw(angle.quarters()),
        _ => heading,
    }
}

/// Render-space delta of a move instruction at a given heading
pub fn world_offset(heading: Heading, instruction: &FlightInstruction) -> Option<Point3D> {
    match instruction {
        FlightInstruction::Move { offset, .. } => {
            Some(heading.body_to_world(offset.forward, offset.left, offset.up))
        }
        _ => None,
    }
}

/// Projects sequences from a fixed post-takeoff start point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    start: Point3D,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(Point3D::new(0.0, 1.0, 0.0))
    }
}

impl Projector {
    pub fn new(start: Point3D) -> Self {
        Self { start }
    }

    pub fn start(&self) -> Point3D {
        self.start
    }

    /// Fold the sequence into points and a final heading
    pub fn project(&self, sequence: &[FlightInstruction]) -> Projection {
        let mut points = vec![self.start];
        let mut current = self.start;
        let mut heading = Heading::INITIAL;

        for instruction in sequence.iter().filter(|i| !i.is_marker()) {
            match instruction {
                FlightInstruction::Move { .. } => {
                    if let Some(delta) = world_offset(heading, instruction) {
                        current += delta;
                        points.push(current);
                    }
                }
                FlightInstruction::Rotate { .. } => {
                    heading = apply_rotation(heading, instruction);
                }
                _ => {}
            }
        }

        Projection { points, heading }
    }

    pub fn project_path(&self, sequence: &[FlightInstruction]) -> Vec<Point3D> {
        self.project(sequence).points
    }

    pub fn current_point(&self, sequence: &[FlightInstruction]) -> Point3D {
        self.project(sequence).tip()
    }

    pub fn final_heading(&self, sequence: &[FlightInstruction]) -> Heading {
        self.project(sequence).heading
    }
}

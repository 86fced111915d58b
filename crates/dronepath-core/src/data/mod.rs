//! Data models for positions, orientation and drone state
//!
//! This module provides:
//! - Absolute render-space positions (`Point3D`, y is up)
//! - The four-bucket heading used for camera follow and rotation math
//! - The shared drone state read by the renderer and written by the
//!   builder and the autopilot

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

/// Tolerance used when comparing positions against limits
pub const POSITION_EPSILON: f64 = 1e-6;

/// Absolute position in render space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point3D {
    /// Lateral axis
    pub x: f64,
    /// Vertical axis
    pub y: f64,
    /// Depth axis
    pub z: f64,
}

impl Point3D {
    /// The render-space origin
    pub const ORIGIN: Point3D = Point3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Point3D axes must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// Calculate distance to another point
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Component-wise comparison within [`POSITION_EPSILON`]
    pub fn approx_eq(&self, other: &Point3D) -> bool {
        (self.x - other.x).abs() < POSITION_EPSILON
            && (self.y - other.y).abs() < POSITION_EPSILON
            && (self.z - other.z).abs() < POSITION_EPSILON
    }

    /// Same point with a different height
    pub fn with_y(&self, y: f64) -> Self {
        Self { y, ..*self }
    }

    /// Coordinates as an array
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl std::ops::Add for Point3D {
    type Output = Point3D;

    fn add(self, other: Point3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::AddAssign for Point3D {
    fn add_assign(&mut self, other: Point3D) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.2} Y:{:.2} Z:{:.2}", self.x, self.y, self.z)
    }
}

/// One of four cardinal facings
///
/// Bucket 0 faces +z (the direction the drone faces after takeoff).
/// Each clockwise quarter turn advances the bucket by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Heading(u8);

impl Heading {
    /// Facing +z
    pub const INITIAL: Heading = Heading(0);

    /// Build a heading from any bucket number (wrapped into 0..4)
    pub fn new(bucket: i64) -> Self {
        Self(bucket.rem_euclid(4) as u8)
    }

    /// The bucket number, 0..=3
    pub fn bucket(&self) -> u8 {
        self.0
    }

    /// Turn clockwise by a number of quarter turns
    pub fn turn_cw(&self, quarters: u8) -> Self {
        Self::new(self.0 as i64 + quarters as i64)
    }

    /// Turn counter-clockwise by a number of quarter turns
    pub fn turn_ccw(&self, quarters: u8) -> Self {
        Self::new(self.0 as i64 - quarters as i64)
    }

    /// Nearest bucket for a model rotation in radians
    ///
    /// Rotation `π` is the initial facing; clockwise turns subtract.
    pub fn from_rotation(rotation: f64) -> Self {
        let quarters = ((PI - rotation) / FRAC_PI_2).round();
        Self::new(quarters as i64)
    }

    /// Model rotation about the vertical axis for this heading
    pub fn yaw(&self) -> f64 {
        PI - FRAC_PI_2 * self.0 as f64
    }

    /// Convert a body-frame offset (forward, left, up) to a render-space delta
    pub fn body_to_world(&self, forward: f64, left: f64, up: f64) -> Point3D {
        let (fx, fz, lx, lz) = match self.0 {
            0 => (0.0, 1.0, 1.0, 0.0),
            1 => (-1.0, 0.0, 0.0, 1.0),
            2 => (0.0, -1.0, -1.0, 0.0),
            _ => (1.0, 0.0, 0.0, -1.0),
        };
        Point3D {
            x: forward * fx + left * lx,
            y: up,
            z: forward * fz + left * lz,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0 => "+Z",
            1 => "-X",
            2 => "-Z",
            _ => "+X",
        };
        write!(f, "{}", name)
    }
}

/// Link status as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConnectionStatus {
    /// No link
    #[default]
    Disconnected,
    /// Connect requested, waiting for the host
    Connecting,
    /// Drone is in SDK mode and accepting commands
    Connected,
}

impl ConnectionStatus {
    /// Check if commands can be sent
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

/// Where the drone is in its flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FlightPhase {
    /// On the ground at the start point
    #[default]
    Grounded,
    /// In the air
    Airborne,
    /// Touched down, waiting to be returned to the start point
    Landed,
}

/// Current drone position, orientation and link status
///
/// Shared between the builder, the autopilot and the renderer. Fields are
/// private; all writes go through the named operations below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneState {
    position: Point3D,
    rotation: f64,
    heading: Heading,
    connection: ConnectionStatus,
    phase: FlightPhase,
}

impl Default for DroneState {
    fn default() -> Self {
        Self::new(Point3D::ORIGIN)
    }
}

impl DroneState {
    /// Create a grounded drone at `start` facing the initial heading
    pub fn new(start: Point3D) -> Self {
        Self {
            position: start,
            rotation: PI,
            heading: Heading::INITIAL,
            connection: ConnectionStatus::Disconnected,
            phase: FlightPhase::Grounded,
        }
    }

    /// Current position
    pub fn position(&self) -> Point3D {
        self.position
    }

    /// Current model rotation in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Current heading bucket
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Current link status
    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    /// Current flight phase
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Lift off to `point`
    pub fn take_off(&mut self, point: Point3D) {
        self.position = point;
        self.phase = FlightPhase::Airborne;
    }

    /// Move to an absolute point
    pub fn move_to(&mut self, point: Point3D) {
        self.position = point;
    }

    /// Move by a render-space delta
    pub fn translate(&mut self, delta: Point3D) {
        self.position += delta;
    }

    /// Rotate by `delta` radians (negative is clockwise)
    pub fn rotate_by(&mut self, delta: f64) {
        self.set_rotation(self.rotation + delta);
    }

    /// Set the model rotation, keeping the heading bucket in step
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.heading = Heading::from_rotation(rotation);
    }

    /// Descend to `ground_y` directly below the current position
    pub fn land(&mut self, ground_y: f64) {
        self.position = self.position.with_y(ground_y);
        self.phase = FlightPhase::Landed;
    }

    /// Return to the start point facing the initial heading
    pub fn reset_to(&mut self, start: Point3D) {
        self.position = start;
        self.set_rotation(PI);
        self.phase = FlightPhase::Grounded;
    }

    /// Update the link status
    pub fn set_connection(&mut self, status: ConnectionStatus) {
        self.connection = status;
    }
}

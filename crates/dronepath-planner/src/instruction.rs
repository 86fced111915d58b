//! Flight instruction types.
//!
//! Every entry of a flight plan is a [`FlightInstruction`]. Moves carry a
//! body-frame offset in metres (forward, left, up) relative to the drone's
//! current facing; the projector turns those into render-space points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slowest speed the drone accepts for `go`, in cm/s
pub const MIN_SPEED: u32 = 10;
/// Fastest speed the drone accepts for `go`, in cm/s
pub const MAX_SPEED: u32 = 100;
/// Largest offset per axis the drone accepts for `go`, in cm
pub const MAX_GO_CM: i32 = 500;

/// Vertical part of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Up,
    Level,
    Down,
}

impl Vertical {
    fn sign(&self) -> f64 {
        match self {
            Vertical::Up => 1.0,
            Vertical::Level => 0.0,
            Vertical::Down => -1.0,
        }
    }

    fn label(&self) -> Option<&'static str> {
        match self {
            Vertical::Up => Some("Up"),
            Vertical::Level => None,
            Vertical::Down => Some("Down"),
        }
    }
}

/// Horizontal part of a move, relative to the drone's facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizontal {
    None,
    Forward,
    Reverse,
    Left,
    Right,
    ForwardLeft,
    ForwardRight,
    ReverseLeft,
    ReverseRight,
}

impl Horizontal {
    /// (forward, left) signs
    fn signs(&self) -> (f64, f64) {
        match self {
            Horizontal::None => (0.0, 0.0),
            Horizontal::Forward => (1.0, 0.0),
            Horizontal::Reverse => (-1.0, 0.0),
            Horizontal::Left => (0.0, 1.0),
            Horizontal::Right => (0.0, -1.0),
            Horizontal::ForwardLeft => (1.0, 1.0),
            Horizontal::ForwardRight => (1.0, -1.0),
            Horizontal::ReverseLeft => (-1.0, 1.0),
            Horizontal::ReverseRight => (-1.0, -1.0),
        }
    }

    fn label(&self) -> Option<&'static str> {
        match self {
            Horizontal::None => None,
            Horizontal::Forward => Some("Forward"),
            Horizontal::Reverse => Some("Reverse"),
            Horizontal::Left => Some("Left"),
            Horizontal::Right => Some("Right"),
            Horizontal::ForwardLeft => Some("Forward Left"),
            Horizontal::ForwardRight => Some("Forward Right"),
            Horizontal::ReverseLeft => Some("Reverse Left"),
            Horizontal::ReverseRight => Some("Reverse Right"),
        }
    }
}

/// Direction of a move; also the merge category of moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Direction {
    /// Create a direction. Returns `None` for `Level` + `None`, which does
    /// not move the drone.
    pub fn new(vertical: Vertical, horizontal: Horizontal) -> Option<Self> {
        if vertical == Vertical::Level && horizontal == Horizontal::None {
            return None;
        }
        Some(Self {
            vertical,
            horizontal,
        })
    }

    /// Offset for a step of `distance` metres along this direction.
    ///
    /// Each active axis moves by the full distance, so diagonals cover
    /// more ground than straight moves.
    pub fn offset(&self, distance: f64) -> Offset {
        let (forward, left) = self.horizontal.signs();
        Offset::new(
            forward * distance,
            left * distance,
            self.vertical.sign() * distance,
        )
    }

    /// Human-readable name, e.g. "Up Forward Left"
    pub fn label(&self) -> String {
        [self.vertical.label(), self.horizontal.label()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Body-frame offset in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Offset {
    pub forward: f64,
    pub left: f64,
    pub up: f64,
}

impl Offset {
    pub fn new(forward: f64, left: f64, up: f64) -> Self {
        Self { forward, left, up }
    }

    /// Offset in whole centimetres, as sent to the drone
    pub fn to_centimeters(&self) -> (i32, i32, i32) {
        let cm = |m: f64| (m * 100.0).round() as i32;
        (cm(self.forward), cm(self.left), cm(self.up))
    }

    pub fn is_finite(&self) -> bool {
        self.forward.is_finite() && self.left.is_finite() && self.up.is_finite()
    }

    /// Whether a single `go` can cover this offset
    pub fn within_go_range(&self) -> bool {
        let (forward, left, up) = self.to_centimeters();
        [forward, left, up].iter().all(|cm| cm.abs() <= MAX_GO_CM)
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, other: Offset) -> Offset {
        Offset {
            forward: self.forward + other.forward,
            left: self.left + other.left,
            up: self.up + other.up,
        }
    }
}

/// Rotation sense, seen from above
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Cw,
    Ccw,
}

impl Rotation {
    pub fn label(&self) -> &'static str {
        match self {
            Rotation::Cw => "Clockwise",
            Rotation::Ccw => "Counter-Clockwise",
        }
    }

    /// SDK command word
    pub fn command(&self) -> &'static str {
        match self {
            Rotation::Cw => "cw",
            Rotation::Ccw => "ccw",
        }
    }
}

/// Supported rotation angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RotationAngle {
    Quarter,
    Half,
    ThreeQuarter,
}

impl RotationAngle {
    /// Angle for a number of degrees, wrapped into a full turn.
    /// Returns `None` when the result is not 90, 180 or 270.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            90 => Some(RotationAngle::Quarter),
            180 => Some(RotationAngle::Half),
            270 => Some(RotationAngle::ThreeQuarter),
            _ => None,
        }
    }

    pub fn degrees(&self) -> u32 {
        self.quarters() as u32 * 90
    }

    pub fn quarters(&self) -> u8 {
        match self {
            RotationAngle::Quarter => 1,
            RotationAngle::Half => 2,
            RotationAngle::ThreeQuarter => 3,
        }
    }

    pub fn radians(&self) -> f64 {
        (self.degrees() as f64).to_radians()
    }
}

impl TryFrom<u32> for RotationAngle {
    type Error = String;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        if degrees == 0 || degrees >= 360 {
            return Err(format!("unsupported rotation angle {}", degrees));
        }
        RotationAngle::from_degrees(degrees)
            .ok_or_else(|| format!("unsupported rotation angle {}", degrees))
    }
}

impl From<RotationAngle> for u32 {
    fn from(angle: RotationAngle) -> u32 {
        angle.degrees()
    }
}

/// Merge class of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Takeoff,
    Land,
    Move(Direction),
    Rotate(Rotation),
    Hold,
}

/// One discrete drone command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlightInstruction {
    Takeoff,
    Land,
    Move {
        direction: Direction,
        offset: Offset,
        /// Speed in cm/s
        speed: u32,
        /// Cumulative distance in metres, as shown in the label
        distance: f64,
    },
    Rotate {
        rotation: Rotation,
        angle: RotationAngle,
    },
    Hold {
        seconds: f64,
    },
}

impl FlightInstruction {
    /// A single step of `distance` metres along `direction`
    pub fn step(direction: Direction, distance: f64, speed: u32) -> Self {
        FlightInstruction::Move {
            direction,
            offset: direction.offset(distance),
            speed,
            distance,
        }
    }

    pub fn rotate(rotation: Rotation, angle: RotationAngle) -> Self {
        FlightInstruction::Rotate { rotation, angle }
    }

    pub fn hold(seconds: f64) -> Self {
        FlightInstruction::Hold { seconds }
    }

    pub fn category(&self) -> Category {
        match self {
            FlightInstruction::Takeoff => Category::Takeoff,
            FlightInstruction::Land => Category::Land,
            FlightInstruction::Move { direction, .. } => Category::Move(*direction),
            FlightInstruction::Rotate { rotation, .. } => Category::Rotate(*rotation),
            FlightInstruction::Hold { .. } => Category::Hold,
        }
    }

    /// True for the fixed takeoff and land entries
    pub fn is_marker(&self) -> bool {
        matches!(self, FlightInstruction::Takeoff | FlightInstruction::Land)
    }

    /// Human-readable label with cumulative amount
    pub fn message(&self) -> String {
        match self {
            FlightInstruction::Takeoff => "Takeoff".to_string(),
            FlightInstruction::Land => "Land".to_string(),
            FlightInstruction::Move {
                direction,
                distance,
                ..
            } => format!("{} --> {:.1} m", direction.label(), distance),
            FlightInstruction::Rotate { rotation, angle } => {
                format!("Rotate {} --> {} deg", rotation.label(), angle.degrees())
            }
            FlightInstruction::Hold { seconds } => format!("Hold --> {:.1} s", seconds),
        }
    }

    /// SDK text command sent to the drone
    pub fn drone_command(&self) -> String {
        match self {
            FlightInstruction::Takeoff => "takeoff".to_string(),
            FlightInstruction::Land => "land".to_string(),
            FlightInstruction::Move { offset, speed, .. } => {
                let (forward, left, up) = offset.to_centimeters();
                format!("go {} {} {} {}", forward, left, up, speed)
            }
            FlightInstruction::Rotate { rotation, angle } => {
                format!("{} {}", rotation.command(), angle.degrees())
            }
            // Hover in place; the duration is realised by the dispatcher
            FlightInstruction::Hold { .. } => "stop".to_string(),
        }
    }

    /// Check the values an imported instruction carries
    pub fn validate(&self) -> Result<(), String> {
        match self {
            FlightInstruction::Move {
                offset,
                speed,
                distance,
                ..
            } => {
                if !offset.is_finite() || !distance.is_finite() {
                    return Err("move offset must be finite".to_string());
                }
                if *distance <= 0.0 {
                    return Err(format!("move distance {} must be positive", distance));
                }
                if !(MIN_SPEED..=MAX_SPEED).contains(speed) {
                    return Err(format!(
                        "speed {} outside {}..={} cm/s",
                        speed, MIN_SPEED, MAX_SPEED
                    ));
                }
                if !offset.within_go_range() {
                    return Err(format!(
                        "move offset {:?} cm exceeds {} cm per axis",
                        offset.to_centimeters(),
                        MAX_GO_CM
                    ));
                }
                Ok(())
            }
            FlightInstruction::Hold { seconds } => {
                if !seconds.is_finite() || *seconds <= 0.0 {
                    return Err(format!("hold duration {} must be positive", seconds));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for FlightInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

//! Plan editing operations as typed on the command line.
//!
//! ```text
//! forward  up  down-left  up-forward-right   move one step
//! cw:90  ccw:270                             rotate
//! hold:2.5                                   hover for 2.5 s
//! undo                                       delete the newest entry
//! clear                                      back to takeoff + land
//! ```

use std::fmt;
use std::str::FromStr;

use dronepath_core::FlightError;
use dronepath_planner::{Direction, FlightBuilder, Horizontal, Rotation, RotationAngle, Vertical};

/// One editing operation on a flight plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOp {
    Move(Direction),
    Rotate(Rotation, RotationAngle),
    Hold(f64),
    DeleteLast,
    Clear,
}

impl PlanOp {
    /// Apply to `builder`
    pub fn apply(&self, builder: &mut FlightBuilder) -> Result<(), FlightError> {
        match self {
            PlanOp::Move(direction) => builder.add_move(*direction),
            PlanOp::Rotate(rotation, angle) => {
                builder.add_rotation(*rotation, *angle);
                Ok(())
            }
            PlanOp::Hold(seconds) => builder.add_hold(*seconds),
            PlanOp::DeleteLast => {
                builder.delete_last();
                Ok(())
            }
            PlanOp::Clear => {
                builder.clear();
                Ok(())
            }
        }
    }
}

fn parse_horizontal(words: &[&str]) -> Option<Horizontal> {
    let horizontal = match words {
        [] => Horizontal::None,
        ["forward"] => Horizontal::Forward,
        ["reverse" | "back"] => Horizontal::Reverse,
        ["left"] => Horizontal::Left,
        ["right"] => Horizontal::Right,
        ["forward", "left"] => Horizontal::ForwardLeft,
        ["forward", "right"] => Horizontal::ForwardRight,
        ["reverse" | "back", "left"] => Horizontal::ReverseLeft,
        ["reverse" | "back", "right"] => Horizontal::ReverseRight,
        _ => return None,
    };
    Some(horizontal)
}

fn parse_move(text: &str) -> Result<PlanOp, String> {
    let words: Vec<&str> = text.split('-').collect();
    let (vertical, rest) = match words.split_first() {
        Some((&"up", rest)) => (Vertical::Up, rest),
        Some((&"down", rest)) => (Vertical::Down, rest),
        _ => (Vertical::Level, &words[..]),
    };

    let horizontal =
        parse_horizontal(rest).ok_or_else(|| format!("unknown operation '{}'", text))?;
    Direction::new(vertical, horizontal)
        .map(PlanOp::Move)
        .ok_or_else(|| format!("'{}' is not a movement, use hold:<seconds>", text))
}

impl FromStr for PlanOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        match text.split_once(':') {
            Some(("cw", degrees)) | Some(("ccw", degrees)) => {
                let rotation = if text.starts_with("cw") {
                    Rotation::Cw
                } else {
                    Rotation::Ccw
                };
                let angle = degrees
                    .parse::<u32>()
                    .ok()
                    .and_then(RotationAngle::from_degrees)
                    .ok_or_else(|| format!("rotation must be 90, 180 or 270, got '{}'", degrees))?;
                Ok(PlanOp::Rotate(rotation, angle))
            }
            Some(("hold", seconds)) => seconds
                .parse::<f64>()
                .map(PlanOp::Hold)
                .map_err(|_| format!("invalid hold duration '{}'", seconds)),
            Some(_) => Err(format!("unknown operation '{}'", s)),
            None => match text.as_str() {
                "undo" => Ok(PlanOp::DeleteLast),
                "clear" => Ok(PlanOp::Clear),
                _ => parse_move(&text),
            },
        }
    }
}

impl fmt::Display for PlanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanOp::Move(direction) => write!(f, "{}", direction),
            PlanOp::Rotate(rotation, angle) => {
                write!(f, "{}:{}", rotation.command(), angle.degrees())
            }
            PlanOp::Hold(seconds) => write!(f, "hold:{}", seconds),
            PlanOp::DeleteLast => write!(f, "undo"),
            PlanOp::Clear => write!(f, "clear"),
        }
    }
}

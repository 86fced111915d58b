//! Flight area limits and control availability.

use crate::instruction::{Direction, Horizontal, Vertical};
use dronepath_core::data::POSITION_EPSILON;
use dronepath_core::{Heading, Point3D};

/// Axis-aligned box the path must stay inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightLimits {
    pub min: Point3D,
    pub max: Point3D,
}

impl FlightLimits {
    /// Limits for a scene of the given scale
    ///
    /// Height starts at 1 so the drone never dips below its takeoff height.
    pub fn from_scale(scale: f64) -> Self {
        let half = scale / 2.0;
        Self {
            min: Point3D::new(-half, 1.0, -half),
            max: Point3D::new(half, scale, half),
        }
    }

    /// True if `point` lies inside the box (with tolerance)
    pub fn contains(&self, point: &Point3D) -> bool {
        let inside = |value: f64, min: f64, max: f64| {
            value >= min - POSITION_EPSILON && value <= max + POSITION_EPSILON
        };
        inside(point.x, self.min.x, self.max.x)
            && inside(point.y, self.min.y, self.max.y)
            && inside(point.z, self.min.z, self.max.z)
    }

    /// True if moving from `point` along `delta` pushes further past a
    /// limit the point already sits on
    fn blocks(&self, point: &Point3D, delta: &Point3D) -> bool {
        let at_max = |value: f64, max: f64| value >= max - POSITION_EPSILON;
        let at_min = |value: f64, min: f64| value <= min + POSITION_EPSILON;

        (delta.x > 0.0 && at_max(point.x, self.max.x))
            || (delta.x < 0.0 && at_min(point.x, self.min.x))
            || (delta.y > 0.0 && at_max(point.y, self.max.y))
            || (delta.y < 0.0 && at_min(point.y, self.min.y))
            || (delta.z > 0.0 && at_max(point.z, self.max.z))
            || (delta.z < 0.0 && at_min(point.z, self.min.z))
    }
}

/// A builder control that can be disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Forward,
    Reverse,
    Up,
    Down,
    DeleteLast,
    Clear,
}

impl Control {
    pub const MOVEMENT: [Control; 6] = [
        Control::Left,
        Control::Right,
        Control::Forward,
        Control::Reverse,
        Control::Up,
        Control::Down,
    ];

    pub const ALL: [Control; 8] = [
        Control::Left,
        Control::Right,
        Control::Forward,
        Control::Reverse,
        Control::Up,
        Control::Down,
        Control::DeleteLast,
        Control::Clear,
    ];

    fn direction(&self) -> Option<Direction> {
        let (vertical, horizontal) = match self {
            Control::Left => (Vertical::Level, Horizontal::Left),
            Control::Right => (Vertical::Level, Horizontal::Right),
            Control::Forward => (Vertical::Level, Horizontal::Forward),
            Control::Reverse => (Vertical::Level, Horizontal::Reverse),
            Control::Up => (Vertical::Up, Horizontal::None),
            Control::Down => (Vertical::Down, Horizontal::None),
            Control::DeleteLast | Control::Clear => return None,
        };
        Direction::new(vertical, horizontal)
    }
}

/// Which controls are currently unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlLimits {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub reverse: bool,
    pub up: bool,
    pub down: bool,
    pub delete_last: bool,
    pub clear: bool,
}

impl ControlLimits {
    /// Disabled movement controls for a path tip
    ///
    /// A control is disabled when the tip already sits on the limit it would
    /// move towards. The heading decides which render axis each body
    /// direction maps to; at the initial heading left pushes +x and forward
    /// pushes +z.
    pub fn from_point(limits: &FlightLimits, point: Point3D, heading: Heading) -> Self {
        let mut result = Self::default();
        for control in Control::MOVEMENT {
            let Some(direction) = control.direction() else {
                continue;
            };
            let offset = direction.offset(1.0);
            let delta = heading.body_to_world(offset.forward, offset.left, offset.up);
            result.set(control, limits.blocks(&point, &delta));
        }
        result
    }

    /// Also disable delete and clear when the plan has nothing to remove
    pub fn with_empty_plan(mut self, empty: bool) -> Self {
        self.delete_last = empty;
        self.clear = empty;
        self
    }

    pub fn is_disabled(&self, control: Control) -> bool {
        match control {
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Forward => self.forward,
            Control::Reverse => self.reverse,
            Control::Up => self.up,
            Control::Down => self.down,
            Control::DeleteLast => self.delete_last,
            Control::Clear => self.clear,
        }
    }

    fn set(&mut self, control: Control, disabled: bool) {
        match control {
            Control::Left => self.left = disabled,
            Control::Right => self.right = disabled,
            Control::Forward => self.forward = disabled,
            Control::Reverse => self.reverse = disabled,
            Control::Up => self.up = disabled,
            Control::Down => self.down = disabled,
            Control::DeleteLast => self.delete_last = disabled,
            Control::Clear => self.clear = disabled,
        }
    }
}

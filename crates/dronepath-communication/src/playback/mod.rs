//! Autopilot replay of flight plans.
//!
//! - [`scheduler`]: pure step scheduler with pause and cancel
//! - [`autopilot`]: async driver applying steps with real delays

pub mod autopilot;
pub mod scheduler;

pub use autopilot::{Autopilot, PlaybackOutcome};
pub use scheduler::{
    PlaybackScheduler, PlaybackState, PlaybackStep, PlaybackTiming, TAKEOFF_HEIGHT,
};

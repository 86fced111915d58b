//! # dronepath Planner
//!
//! Builds autonomous flight plans for a toy drone.
//!
//! ## Core Components
//!
//! - **Instructions**: typed takeoff, move, rotate, hold and land commands
//! - **Store**: the ordered instruction list with fixed takeoff/land markers
//! - **Merger**: folds a repeated command into the previous entry
//! - **Projector**: replays the list into absolute render-space points
//! - **Limits**: flight-area bounds and which controls they disable
//! - **Builder**: the editing session tying the above together
//! - **Serialization**: flight file export/import
//!
//! ```text
//! FlightBuilder
//!   ├── InstructionStore ── merger::add_instruction
//!   ├── Projector (path, current point, heading)
//!   └── FlightLimits → ControlLimits
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dronepath_planner::{BuildSettings, Direction, FlightBuilder, Horizontal, Vertical};
//!
//! let mut builder = FlightBuilder::new(BuildSettings::default());
//! builder.add_move(Direction::new(Vertical::Level, Horizontal::Forward).unwrap())?;
//! let tip = builder.current_point();
//! ```

pub mod builder;
pub mod instruction;
pub mod limits;
pub mod merger;
pub mod projector;
pub mod serialization;
pub mod store;

pub use builder::{BuildSettings, FlightBuilder};
pub use instruction::{
    Category, Direction, FlightInstruction, Horizontal, Offset, Rotation, RotationAngle, Vertical,
    MAX_GO_CM,
};
pub use limits::{Control, ControlLimits, FlightLimits};
pub use merger::add_instruction;
pub use projector::{Projection, Projector};
pub use serialization::{FlightFile, FlightMetadata, FlightSettingsData};
pub use store::{validate_sequence, InstructionStore};

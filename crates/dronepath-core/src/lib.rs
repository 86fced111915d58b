//! # dronepath Core
//!
//! Core types, errors, and utilities for dronepath.
//! Provides the shared drone state, geometry primitives, the application
//! event bus, and the error types used by every other crate.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;

pub use data::{ConnectionStatus, DroneState, FlightPhase, Heading, Point3D};

pub use error::{ConnectionError, Error, FlightError, PlaybackError, Result};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, AppEvent, EventBus, EventBusConfig, EventCategory, EventFilter, SubscriptionId,
};

pub use types::{thread_safe_rw, SharedDroneState, ThreadSafeRw};

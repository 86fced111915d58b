//! # dronepath Visualizer
//!
//! Turns a flight plan and the live drone state into a 3D scene: ground
//! grid, flight-area cube, takeoff and landing lines, the planned path, the
//! drone model and a camera that follows it.
//!
//! The GPU side is not part of this crate. Any retained-mode renderer can
//! implement [`SceneRenderer`] and be kept up to date by a
//! [`SceneSynchronizer`].

pub mod visualizer;

pub use visualizer::{
    Camera, DroneModel, Primitive, PrimitiveId, RetainedScene, SceneConfig, SceneDescription,
    SceneMode, SceneRenderer, SceneStats, SceneSynchronizer, Shape, SyncReport,
};

//! 3D scene module
//!
//! This module provides:
//! - Pure scene descriptions derived from a flight plan (scene)
//! - Follow camera (camera)
//! - Diff-based renderer reconciliation (synchronizer)
//! - An in-memory renderer with statistics (retained)

pub mod camera;
pub mod retained;
pub mod scene;
pub mod synchronizer;

pub use camera::Camera;
pub use retained::{RetainedScene, SceneStats};
pub use scene::{
    DroneModel, Primitive, PrimitiveId, SceneConfig, SceneDescription, SceneMode, Shape,
};
pub use synchronizer::{SceneRenderer, SceneSynchronizer, SyncReport};

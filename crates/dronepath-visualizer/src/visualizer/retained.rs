//! # Retained Scene
//!
//! In-memory [`SceneRenderer`] that keeps what it was given. Used headless
//! and in tests, and as the model a GPU renderer uploads from.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use super::camera::Camera;
use super::scene::{DroneModel, Primitive, PrimitiveId};
use super::synchronizer::SceneRenderer;

/// Retained primitives plus the latest drone pose and camera
#[derive(Debug, Default)]
pub struct RetainedScene {
    primitives: HashMap<PrimitiveId, Primitive>,
    drone: Option<DroneModel>,
    camera: Option<Camera>,
    bounds_min: Vec3,
    bounds_max: Vec3,
    adds: usize,
    removes: usize,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id)
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(&id)
    }

    pub fn drone(&self) -> Option<&DroneModel> {
        self.drone.as_ref()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Get scene statistics
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            primitive_count: self.primitives.len(),
            total_vertices: self.primitives.values().map(|p| p.shape.vertex_count()).sum(),
            adds: self.adds,
            removes: self.removes,
            bounds: (self.bounds_min, self.bounds_max),
        }
    }

    /// Clear all content
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.drone = None;
        self.camera = None;
        self.bounds_min = Vec3::ZERO;
        self.bounds_max = Vec3::ZERO;
    }

    /// Update scene bounds to encompass all primitives
    fn update_bounds(&mut self) {
        let mut min_bounds = Vec3::splat(f32::MAX);
        let mut max_bounds = Vec3::splat(f32::MIN);
        let mut has_objects = false;

        for primitive in self.primitives.values() {
            if let Some((lo, hi)) = primitive.shape.bounds() {
                min_bounds = min_bounds.min(lo);
                max_bounds = max_bounds.max(hi);
                has_objects = true;
            }
        }

        if has_objects {
            self.bounds_min = min_bounds;
            self.bounds_max = max_bounds;
        } else {
            self.bounds_min = Vec3::ZERO;
            self.bounds_max = Vec3::ZERO;
        }
    }
}

impl SceneRenderer for RetainedScene {
    fn add_primitive(&mut self, primitive: &Primitive) {
        if self.primitives.insert(primitive.id, primitive.clone()).is_some() {
            debug!("Primitive {:?} replaced without removal", primitive.id);
        }
        self.adds += 1;
        self.update_bounds();
    }

    fn remove_primitive(&mut self, id: PrimitiveId) {
        if self.primitives.remove(&id).is_some() {
            self.removes += 1;
            self.update_bounds();
        }
    }

    fn set_drone(&mut self, drone: &DroneModel) {
        self.drone = Some(*drone);
    }

    fn set_camera(&mut self, camera: &Camera) {
        self.camera = Some(*camera);
    }
}

/// Statistics about the retained scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStats {
    pub primitive_count: usize,
    pub total_vertices: usize,
    /// Primitives added since creation
    pub adds: usize,
    /// Primitives removed since creation
    pub removes: usize,
    pub bounds: (Vec3, Vec3),
}

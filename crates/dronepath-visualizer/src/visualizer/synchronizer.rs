//! Renderer reconciliation.
//!
//! The synchronizer remembers the last description it pushed and sends a
//! renderer only what changed. Primitives that disappeared are removed,
//! changed ones are removed and re-added, identical ones are left alone.
//! The drone pose and the camera are pushed on every sync.

use std::collections::BTreeMap;

use tracing::trace;

use super::camera::Camera;
use super::scene::{DroneModel, Primitive, PrimitiveId, SceneDescription};

/// A retained-mode renderer driven by [`SceneSynchronizer`]
pub trait SceneRenderer {
    fn add_primitive(&mut self, primitive: &Primitive);
    fn remove_primitive(&mut self, id: PrimitiveId);
    fn set_drone(&mut self, drone: &DroneModel);
    fn set_camera(&mut self, camera: &Camera);
}

/// What one sync changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<PrimitiveId>,
    pub removed: Vec<PrimitiveId>,
    pub unchanged: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SceneSynchronizer {
    pushed: BTreeMap<PrimitiveId, Primitive>,
}

impl SceneSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring `renderer` in line with `description`
    pub fn sync<R: SceneRenderer + ?Sized>(
        &mut self,
        description: &SceneDescription,
        renderer: &mut R,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        let next: BTreeMap<PrimitiveId, &Primitive> =
            description.primitives.iter().map(|p| (p.id, p)).collect();

        let stale: Vec<PrimitiveId> = self
            .pushed
            .iter()
            .filter(|(id, old)| next.get(*id).is_none_or(|new| *new != *old))
            .map(|(id, _)| *id)
            .collect();

        for id in stale {
            renderer.remove_primitive(id);
            self.pushed.remove(&id);
            report.removed.push(id);
        }

        for (id, primitive) in next {
            if self.pushed.contains_key(&id) {
                report.unchanged += 1;
                continue;
            }
            renderer.add_primitive(primitive);
            self.pushed.insert(id, primitive.clone());
            report.added.push(id);
        }

        renderer.set_drone(&description.drone);
        renderer.set_camera(&description.camera);

        trace!(
            added = report.added.len(),
            removed = report.removed.len(),
            unchanged = report.unchanged,
            "Scene synchronized"
        );
        report
    }

    /// Forget what was pushed; the next sync re-adds everything
    pub fn reset(&mut self) {
        self.pushed.clear();
    }

    pub fn pushed_ids(&self) -> Vec<PrimitiveId> {
        self.pushed.keys().copied().collect()
    }
}

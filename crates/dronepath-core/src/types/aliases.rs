//! Type aliases for commonly used complex types.
//!
//! Shared state crosses task boundaries (the autopilot task writes, the
//! renderer reads), so everything here is `Send + Sync` and built on
//! `parking_lot` locks.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::data::DroneState;

/// A thread-safe read-write lock wrapper for read-heavy cross-thread state.
///
/// # Example
/// ```rust,ignore
/// let state: ThreadSafeRw<DroneState> = thread_safe_rw(DroneState::default());
/// let position = state.read().position();
/// ```
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Drone state shared between the builder, the autopilot and the renderer.
pub type SharedDroneState = ThreadSafeRw<DroneState>;

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Point3D;

    #[test]
    fn test_shared_state_visible_across_clones() {
        let state: SharedDroneState = thread_safe_rw(DroneState::default());
        let writer = state.clone();
        writer.write().move_to(Point3D::new(1.0, 2.0, 3.0));
        assert_eq!(state.read().position(), Point3D::new(1.0, 2.0, 3.0));
    }
}

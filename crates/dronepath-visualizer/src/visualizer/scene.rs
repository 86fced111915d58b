//! # Scene Description
//!
//! A pure, renderer-independent description of everything the 3D view shows
//! for a flight plan: the ground grid, the flight-area cube, the takeoff and
//! landing lines, the flight path, the drone model and the follow camera.
//!
//! Building a description never touches a renderer; the
//! [`SceneSynchronizer`](super::SceneSynchronizer) pushes the differences.

use dronepath_core::{DroneState, Heading, Point3D};
use dronepath_planner::{InstructionStore, Projector};
use glam::Vec3;

use super::camera::Camera;

const GRID_COLOR: [f32; 4] = [0.28, 0.51, 0.52, 1.0];
const PATH_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const TAKEOFF_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
const LANDING_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Which screen the scene is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneMode {
    /// Drone sits at the tip of the planned path
    #[default]
    Build,
    /// Drone follows the live drone state
    Run,
}

/// Scene geometry settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Edge length of the flight area cube, in metres
    pub scale: f64,
    /// Height of the ground plane
    pub ground_y: f64,
    /// Post-takeoff start point
    pub start: Point3D,
    /// Horizontal distance from the camera to the drone
    pub follow_distance: f64,
    /// Height of the camera above the drone
    pub follow_height: f64,
    /// Uniform scale applied to the drone model
    pub drone_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scale: 10.0,
            ground_y: 0.0,
            start: Point3D::new(0.0, 1.0, 0.0),
            follow_distance: 7.0,
            follow_height: 2.0,
            drone_scale: 0.1,
        }
    }
}

/// Stable identity of a scene primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveId {
    Grid,
    BoundingCube,
    TakeoffLine,
    FlightPath,
    LandingLine,
}

/// Geometry of a primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Square grid on the ground plane
    Grid {
        center: Vec3,
        size: f32,
        divisions: u32,
    },
    /// Wireframe box
    Cube { min: Vec3, max: Vec3 },
    /// Connected line through the points
    Polyline { points: Vec<Vec3> },
}

impl Shape {
    /// Number of vertices a line renderer needs for this shape
    pub fn vertex_count(&self) -> usize {
        match self {
            // two endpoints per line, divisions + 1 lines in each direction
            Shape::Grid { divisions, .. } => (*divisions as usize + 1) * 4,
            // twelve edges
            Shape::Cube { .. } => 24,
            Shape::Polyline { points } => points.len(),
        }
    }

    /// Axis-aligned bounds, if the shape has any extent
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        match self {
            Shape::Grid { center, size, .. } => {
                let half = Vec3::new(size / 2.0, 0.0, size / 2.0);
                Some((*center - half, *center + half))
            }
            Shape::Cube { min, max } => Some((*min, *max)),
            Shape::Polyline { points } => {
                let first = points.first()?;
                Some(
                    points
                        .iter()
                        .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
                )
            }
        }
    }
}

/// A drawable item with identity, geometry and colour
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: PrimitiveId,
    pub shape: Shape,
    pub color: [f32; 4],
}

/// Pose of the drone model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneModel {
    pub position: Vec3,
    /// Rotation about the vertical axis, radians
    pub yaw: f32,
    pub scale: f32,
}

/// Everything the 3D view shows for one moment
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub primitives: Vec<Primitive>,
    pub drone: DroneModel,
    pub camera: Camera,
}

pub(crate) fn to_vec3(point: Point3D) -> Vec3 {
    Vec3::new(point.x as f32, point.y as f32, point.z as f32)
}

impl SceneDescription {
    /// Derive the scene for a plan and the current drone state
    pub fn build(
        store: &InstructionStore,
        drone_state: &DroneState,
        config: &SceneConfig,
        mode: SceneMode,
    ) -> Self {
        let projection = Projector::new(config.start).project(store.as_slice());
        let tip = projection.tip();

        let half = config.scale as f32 / 2.0;
        let ground = config.ground_y as f32;
        let ground_below = |p: Point3D| to_vec3(p.with_y(config.ground_y));

        let mut primitives = vec![
            Primitive {
                id: PrimitiveId::Grid,
                shape: Shape::Grid {
                    center: Vec3::new(0.0, ground, 0.0),
                    size: config.scale as f32,
                    divisions: config.scale.round().max(1.0) as u32,
                },
                color: GRID_COLOR,
            },
            Primitive {
                id: PrimitiveId::BoundingCube,
                shape: Shape::Cube {
                    min: Vec3::new(-half, ground, -half),
                    max: Vec3::new(half, ground + config.scale as f32, half),
                },
                color: GRID_COLOR,
            },
            Primitive {
                id: PrimitiveId::TakeoffLine,
                shape: Shape::Polyline {
                    points: vec![ground_below(config.start), to_vec3(config.start)],
                },
                color: TAKEOFF_COLOR,
            },
            Primitive {
                id: PrimitiveId::FlightPath,
                shape: Shape::Polyline {
                    points: projection.points.iter().copied().map(to_vec3).collect(),
                },
                color: PATH_COLOR,
            },
        ];

        if !tip.approx_eq(&config.start) {
            primitives.push(Primitive {
                id: PrimitiveId::LandingLine,
                shape: Shape::Polyline {
                    points: vec![to_vec3(tip), ground_below(tip)],
                },
                color: LANDING_COLOR,
            });
        }

        let (position, yaw, heading) = match mode {
            SceneMode::Build => (tip, projection.heading.yaw(), projection.heading),
            SceneMode::Run => (
                drone_state.position(),
                drone_state.rotation(),
                drone_state.heading(),
            ),
        };

        let drone = DroneModel {
            position: to_vec3(position),
            yaw: yaw as f32,
            scale: config.drone_scale,
        };

        Self {
            primitives,
            drone,
            camera: follow_camera(drone.position, heading, config),
        }
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.id == id)
    }

    pub fn has_primitive(&self, id: PrimitiveId) -> bool {
        self.primitive(id).is_some()
    }
}

fn follow_camera(target: Vec3, heading: Heading, config: &SceneConfig) -> Camera {
    Camera::following(
        target,
        heading,
        config.follow_distance as f32,
        config.follow_height as f32,
    )
}

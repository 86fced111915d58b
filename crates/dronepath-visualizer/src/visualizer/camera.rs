use dronepath_core::Heading;
use glam::Vec3;

/// Orbit camera in render space (y is up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,   // radians, measured from +x towards +z
    pub pitch: f32, // radians
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 15.0,
            yaw: -90.0f32.to_radians(),
            pitch: 20.0f32.to_radians(),
        }
    }
}

impl Camera {
    /// Camera behind and above `target`, looking the way the drone faces
    ///
    /// `follow_distance` is measured horizontally and `follow_height`
    /// vertically from the target.
    pub fn following(
        target: Vec3,
        heading: Heading,
        follow_distance: f32,
        follow_height: f32,
    ) -> Self {
        let mut camera = Self::default();
        camera.follow(target, heading, follow_distance, follow_height);
        camera
    }

    /// Move behind and above `target` for the given heading
    pub fn follow(
        &mut self,
        target: Vec3,
        heading: Heading,
        follow_distance: f32,
        follow_height: f32,
    ) {
        let (x, z) = match heading.bucket() {
            0 => (0.0, -follow_distance),
            1 => (follow_distance, 0.0),
            2 => (0.0, follow_distance),
            _ => (-follow_distance, 0.0),
        };

        self.target = target;
        self.distance = (follow_distance * follow_distance + follow_height * follow_height).sqrt();
        self.yaw = z.atan2(x);
        self.pitch = follow_height.atan2(follow_distance);
    }

    /// Unit vector from target to eye
    fn offset_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn get_eye_position(&self) -> Vec3 {
        self.target + self.offset_direction() * self.distance
    }
}

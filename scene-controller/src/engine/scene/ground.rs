use crate::engine::picking::PickRay;
use bevy::math::Vec3;
use constants::render_settings::GROUND_PLANE_SIZE;

/// Square ground plane at a fixed height, used only as a picking backstop.
///
/// The ground is not part of the scene graph, so generic entity picks can
/// never report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub size: f32,
    pub height: f32,
}

impl GroundPlane {
    pub fn new(size: f32) -> Self {
        Self { size, height: 0.0 }
    }

    pub fn half_size(&self) -> f32 {
        self.size * 0.5
    }

    /// Intersection of `ray` with the ground, if it lands inside the plane.
    pub fn intersect(&self, ray: &PickRay) -> Option<Vec3> {
        if ray.direction.z.abs() < 0.001 {
            return None;
        }
        let t = (self.height - ray.origin.z) / ray.direction.z;
        if t <= 0.0 {
            return None;
        }

        let hit = ray.at(t);
        let half = self.half_size();
        if hit.x.abs() > half || hit.y.abs() > half {
            return None;
        }
        Some(Vec3::new(hit.x, hit.y, self.height))
    }
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::new(GROUND_PLANE_SIZE)
    }
}

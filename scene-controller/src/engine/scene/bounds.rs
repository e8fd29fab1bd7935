use bevy::math::{Mat4, Vec3};

/// Axis-aligned bounding box in a single coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Component-wise min/max of both boxes.
    pub fn union(self, other: Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// Box enclosing this box after transformation by `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = self.corners().map(|corner| matrix.transform_point3(corner));
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.min(*corner);
            max = max.max(*corner);
        }
        Aabb { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Quat;

    #[test]
    fn new_orders_corners() {
        let aabb = Aabb::new(Vec3::new(1.0, -1.0, 3.0), Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn union_is_componentwise() {
        let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(-2.0, 0.5, 0.5), Vec3::new(0.5, 4.0, 0.75));

        let union = a.union(b);

        assert_eq!(union.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(union.max, Vec3::new(1.0, 4.0, 1.0));
    }

    #[test]
    fn translation_moves_box() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        assert_eq!(moved.center(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(moved.size(), Vec3::splat(2.0));
    }

    #[test]
    fn rotation_grows_enclosing_box() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let rotated =
            aabb.transformed(&Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)));

        let expected = 2.0_f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-4);
        assert!((rotated.max.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn contains_is_inclusive() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains(Vec3::ONE));
        assert!(!aabb.contains(Vec3::new(1.01, 0.5, 0.5)));
    }
}

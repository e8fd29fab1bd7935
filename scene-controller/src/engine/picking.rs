//! Pick rays and hit tests.
//!
//! Rays are built from the pointer by un-projecting it at the near and far
//! planes of the active camera. Meshes are hit-tested against their world
//! AABB; the ground plane has its own test in [`crate::engine::scene::ground`].

use crate::engine::scene::{MeshId, SceneGraph, SceneMesh};
use crate::engine::transform::unproject;
use bevy::math::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Outcome of an entity pick. A miss is a regular result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickResult {
    pub hit: bool,
    pub entity_id: String,
}

impl PickResult {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn hit(entity_id: impl Into<String>) -> Self {
        Self {
            hit: true,
            entity_id: entity_id.into(),
        }
    }
}

/// World-space ray with a normalised direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    /// Ray through a screen point for the given camera matrices.
    pub fn from_screen(screen: Vec2, surface: Vec2, view: Mat4, projection: Mat4) -> Option<Self> {
        if surface.x <= 0.0 || surface.y <= 0.0 {
            return None;
        }
        let near = unproject(screen, 0.0, surface, Mat4::IDENTITY, view, projection);
        let far = unproject(screen, 1.0, surface, Mat4::IDENTITY, view, projection);
        let direction = (far - near).try_normalize()?;
        Some(Self {
            origin: near,
            direction,
        })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        if ray_direction[axis] == 0.0 {
            // Parallel to this slab: inside or never.
            if ray_origin[axis] < min[axis] || ray_origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / ray_direction[axis];
        let mut t0 = (min[axis] - ray_origin[axis]) * inv;
        let mut t1 = (max[axis] - ray_origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

/// Ray–plane intersection distance, `None` when parallel or behind the origin.
pub fn ray_plane_hit_t(ray: &PickRay, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(plane_normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    if t >= 0.0 { Some(t) } else { None }
}

/// Closest mesh hit by `ray` among meshes accepted by `predicate`.
pub fn pick_nearest(
    scene: &SceneGraph,
    ray: &PickRay,
    predicate: impl Fn(MeshId, &SceneMesh) -> bool,
) -> Option<(MeshId, f32)> {
    let mut best: Option<(MeshId, f32)> = None;
    for (id, mesh) in scene.iter() {
        if !predicate(id, mesh) {
            continue;
        }
        let bounds = mesh.world_aabb();
        if let Some(t) = ray_aabb_hit_t(ray.origin, ray.direction, bounds.min, bounds.max) {
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((id, t));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::Aabb;

    fn down_ray(x: f32, y: f32) -> PickRay {
        PickRay {
            origin: Vec3::new(x, y, 50.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn slab_hits_box_in_front() {
        let t = ray_aabb_hit_t(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::splat(-1.0), Vec3::ONE);
        assert_eq!(t, Some(9.0));
    }

    #[test]
    fn slab_reports_exit_when_origin_inside() {
        let t = ray_aabb_hit_t(Vec3::ZERO, Vec3::X, Vec3::splat(-1.0), Vec3::ONE);
        assert_eq!(t, Some(1.0));
    }

    #[test]
    fn slab_misses_box_behind_or_beside() {
        assert_eq!(
            ray_aabb_hit_t(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::splat(-1.0), Vec3::ONE),
            None
        );
        assert_eq!(
            ray_aabb_hit_t(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::splat(-1.0), Vec3::ONE),
            None
        );
    }

    #[test]
    fn slab_handles_negative_and_axis_parallel_directions() {
        let diagonal = Vec3::new(-1.0, -1.0, 0.0).normalize();
        let t = ray_aabb_hit_t(Vec3::new(3.0, 3.0, 0.5), diagonal, Vec3::ZERO, Vec3::ONE);
        assert!(t.is_some_and(|t| (t - 2.0 * 2.0_f32.sqrt()).abs() < 1e-4));

        // Moving along x only, resting on the box's top face.
        let grazing = ray_aabb_hit_t(Vec3::new(-2.0, 0.5, 1.0), Vec3::X, Vec3::ZERO, Vec3::ONE);
        assert_eq!(grazing, Some(2.0));
        let above = ray_aabb_hit_t(Vec3::new(-2.0, 0.5, 1.01), Vec3::X, Vec3::ZERO, Vec3::ONE);
        assert_eq!(above, None);
    }

    #[test]
    fn plane_hit_requires_facing_ray() {
        let ray = down_ray(3.0, 4.0);
        let t = ray_plane_hit_t(&ray, Vec3::ZERO, Vec3::Z);
        assert_eq!(t, Some(50.0));
        assert_eq!(ray.at(50.0), Vec3::new(3.0, 4.0, 0.0));

        let away = PickRay {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::Z,
        };
        assert_eq!(ray_plane_hit_t(&away, Vec3::ZERO, Vec3::Z), None);

        let parallel = PickRay {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::X,
        };
        assert_eq!(ray_plane_hit_t(&parallel, Vec3::ZERO, Vec3::Z), None);
    }

    #[test]
    fn nearest_mesh_wins_and_predicate_filters() {
        let mut scene = SceneGraph::new();
        let low = scene.add_mesh(
            SceneMesh::new("low", Aabb::new(Vec3::splat(-1.0), Vec3::new(1.0, 1.0, 1.0)))
                .with_entity_id("low"),
        );
        let high = scene.add_mesh(
            SceneMesh::new("high", Aabb::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 6.0)))
                .with_entity_id("high"),
        );

        let ray = down_ray(0.0, 0.0);
        assert_eq!(pick_nearest(&scene, &ray, |_, _| true).map(|(id, _)| id), Some(high));
        assert_eq!(
            pick_nearest(&scene, &ray, |id, _| id != high).map(|(id, _)| id),
            Some(low)
        );
    }

    #[test]
    fn ray_from_top_down_ortho_points_down() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.1, 1000.0);

        let ray = PickRay::from_screen(Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0), view, projection);

        let ray = ray.expect("ray through surface center");
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!(ray.origin.x.abs() < 1e-4 && ray.origin.y.abs() < 1e-4);
    }
}

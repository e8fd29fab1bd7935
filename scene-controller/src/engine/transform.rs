//! Screen/world coordinate conversion.
//!
//! Screen space has its origin at the top-left corner of the render surface
//! with y growing downward. NDC depth follows the wgpu convention: 0 at the
//! near plane, 1 at the far plane.

use bevy::math::{Mat4, Vec2, Vec3};

/// Camera viewport expressed as fractions of the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// The whole render surface.
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to a pixel rectangle for a surface of the given size.
    pub fn to_global(&self, surface: Vec2) -> PixelRect {
        PixelRect {
            x: self.x * surface.x,
            y: self.y * surface.y,
            width: self.width * surface.x,
            height: self.height * surface.y,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

/// Viewport rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Un-project a screen point at `depth` back into world space.
///
/// The full surface is used as the viewport. Degenerate surfaces or matrices
/// yield the origin.
pub fn unproject(
    screen: Vec2,
    depth: f32,
    surface: Vec2,
    model: Mat4,
    view: Mat4,
    projection: Mat4,
) -> Vec3 {
    if surface.x <= 0.0 || surface.y <= 0.0 {
        return Vec3::ZERO;
    }

    let ndc = Vec3::new(
        screen.x / surface.x * 2.0 - 1.0,
        1.0 - screen.y / surface.y * 2.0,
        depth,
    );

    let inverse = (projection * view * model).inverse();
    let world = inverse * ndc.extend(1.0);
    if world.w.abs() <= f32::EPSILON {
        return Vec3::ZERO;
    }

    let point = world.truncate() / world.w;
    if point.is_finite() { point } else { Vec3::ZERO }
}

/// Project a world point into screen space inside `viewport`.
pub fn project(world: Vec3, model: Mat4, view_projection: Mat4, viewport: PixelRect) -> Vec2 {
    let clip = view_projection * model * world.extend(1.0);
    if clip.w.abs() <= f32::EPSILON {
        return Vec2::ZERO;
    }

    let ndc = clip.truncate() / clip.w;
    let screen = Vec2::new(
        viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.y + (1.0 - ndc.y) * 0.5 * viewport.height,
    );
    if screen.is_finite() { screen } else { Vec2::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_down_camera() -> (Mat4, Mat4) {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::orthographic_rh(-8.0, 8.0, -4.5, 4.5, 0.1, 100.0);
        (view, projection)
    }

    #[test]
    fn surface_center_unprojects_onto_camera_axis() {
        let (view, projection) = top_down_camera();
        let surface = Vec2::new(1600.0, 900.0);

        let near = unproject(surface * 0.5, 0.0, surface, Mat4::IDENTITY, view, projection);

        assert!(near.x.abs() < 1e-4);
        assert!(near.y.abs() < 1e-4);
        assert!((near.z - 9.9).abs() < 1e-3);
    }

    #[test]
    fn top_left_corner_maps_to_negative_x_positive_y() {
        let (view, projection) = top_down_camera();
        let surface = Vec2::new(1600.0, 900.0);

        let corner = unproject(Vec2::ZERO, 0.0, surface, Mat4::IDENTITY, view, projection);

        assert!((corner.x + 8.0).abs() < 1e-3);
        assert!((corner.y - 4.5).abs() < 1e-3);
    }

    #[test]
    fn project_inverts_unproject_on_full_viewport() {
        let (view, projection) = top_down_camera();
        let surface = Vec2::new(1600.0, 900.0);
        let screen = Vec2::new(400.0, 700.0);

        let world = unproject(screen, 0.5, surface, Mat4::IDENTITY, view, projection);
        let back = project(
            world,
            Mat4::IDENTITY,
            projection * view,
            Viewport::FULL.to_global(surface),
        );

        assert!((back - screen).length() < 1e-2);
    }

    #[test]
    fn viewport_offsets_shift_projection() {
        let (view, projection) = top_down_camera();
        let surface = Vec2::new(1000.0, 1000.0);
        let half = Viewport::new(0.5, 0.0, 0.5, 1.0).to_global(surface);

        let origin = project(Vec3::ZERO, Mat4::IDENTITY, projection * view, half);

        assert!((origin.x - 750.0).abs() < 1e-3);
        assert!((origin.y - 500.0).abs() < 1e-3);
    }

    #[test]
    fn zero_sized_surface_falls_back_to_origin() {
        let (view, projection) = top_down_camera();
        let point = unproject(Vec2::new(10.0, 10.0), 0.0, Vec2::ZERO, Mat4::IDENTITY, view, projection);
        assert_eq!(point, Vec3::ZERO);
    }
}

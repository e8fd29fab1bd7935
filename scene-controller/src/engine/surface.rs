use bevy::math::Vec2;
use constants::render_settings::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};

/// The canvas/window the scene renders into, in physical-independent pixels.
///
/// The pointer is tracked here rather than queried from the window so the
/// controller stays usable without one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSurface {
    width: f32,
    height: f32,
    pointer: Vec2,
}

impl RenderSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pointer: Vec2::ZERO,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Height over width, 0 for a zero-width surface.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width <= 0.0 {
            return 0.0;
        }
        self.height / self.width
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Whether `point` lies on the surface. The right and bottom edges are
    /// outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.width && point.y < self.height
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_is_height_over_width() {
        let surface = RenderSurface::new(1600.0, 900.0);
        assert_eq!(surface.aspect_ratio(), 0.5625);
        assert_eq!(RenderSurface::new(0.0, 900.0).aspect_ratio(), 0.0);
    }

    #[test]
    fn contains_excludes_far_edges_and_negatives() {
        let surface = RenderSurface::new(100.0, 50.0);
        assert!(surface.contains(Vec2::ZERO));
        assert!(surface.contains(Vec2::new(99.5, 49.5)));
        assert!(!surface.contains(Vec2::new(100.0, 10.0)));
        assert!(!surface.contains(Vec2::new(-1.0, 10.0)));
    }
}

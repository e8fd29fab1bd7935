use super::{CameraInput, SceneCamera};
use crate::engine::transform::Viewport;
use bevy::math::{Mat4, Vec2, Vec3};
use constants::camera::{
    ORTHO_CAMERA_HEIGHT, ORTHO_FAR, ORTHO_HALF_WIDTH, ORTHO_MAX_HALF_WIDTH, ORTHO_MIN_HALF_WIDTH,
    ORTHO_NEAR, ZOOM_SENSITIVITY,
};

/// Top-down orthographic camera looking along -Z at the ground plane.
///
/// The horizontal extent is fixed by `half_width`; the vertical extent follows
/// the surface aspect ratio (height / width) and is recomputed on resize.
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    pub center: Vec2,
    pub height: f32,
    pub half_width: f32,
    pub near: f32,
    pub far: f32,
    pub viewport: Viewport,
    pub zoom_sensitivity: f32,
    vertical_ratio: f32,
    attached: bool,
    input_enabled: bool,
}

impl OrthographicCamera {
    pub fn new(half_width: f32, height: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            height,
            half_width,
            near: ORTHO_NEAR,
            far: ORTHO_FAR,
            viewport: Viewport::FULL,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            vertical_ratio: 1.0,
            attached: false,
            input_enabled: false,
        }
    }

    /// Set top/bottom from the surface height/width ratio.
    pub fn set_ortho_top_bottom(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.vertical_ratio = ratio;
        }
    }

    pub fn top(&self) -> f32 {
        self.half_width * self.vertical_ratio
    }

    pub fn bottom(&self) -> f32 {
        -self.top()
    }

    pub fn vertical_ratio(&self) -> f32 {
        self.vertical_ratio
    }

    fn world_units_per_pixel(&self, surface: Vec2) -> f32 {
        if surface.x <= 0.0 {
            return 0.0;
        }
        self.half_width * 2.0 / surface.x
    }
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new(ORTHO_HALF_WIDTH, ORTHO_CAMERA_HEIGHT)
    }
}

impl SceneCamera for OrthographicCamera {
    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn enable_input(&mut self) {
        self.input_enabled = true;
    }

    fn disable_input(&mut self) {
        self.input_enabled = false;
    }

    fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    fn view_matrix(&self) -> Mat4 {
        let eye = self.center.extend(self.height);
        Mat4::look_at_rh(eye, self.center.extend(0.0), Vec3::Y)
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            self.bottom(),
            self.top(),
            self.near,
            self.far,
        )
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, surface: Vec2) {
        if surface.x > 0.0 {
            self.set_ortho_top_bottom(surface.y / surface.x);
        }
    }

    fn apply_input(&mut self, input: CameraInput, surface: Vec2) -> bool {
        if !self.input_enabled {
            return false;
        }

        match input {
            CameraInput::Pan(delta) => {
                // Dragging moves the ground with the pointer; screen y points down.
                let scale = self.world_units_per_pixel(surface);
                self.center += Vec2::new(-delta.x, delta.y) * scale;
                true
            }
            CameraInput::Zoom(steps) => {
                let factor = (1.0 - steps * self.zoom_sensitivity).clamp(0.2, 5.0);
                self.half_width =
                    (self.half_width * factor).clamp(ORTHO_MIN_HALF_WIDTH, ORTHO_MAX_HALF_WIDTH);
                true
            }
            CameraInput::Orbit(_) => false,
        }
    }
}

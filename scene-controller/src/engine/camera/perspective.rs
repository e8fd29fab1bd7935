use super::{CameraInput, SceneCamera};
use crate::engine::transform::Viewport;
use bevy::math::{Mat4, Vec2, Vec3};
use constants::camera::{
    ORBIT_DISTANCE, ORBIT_MAX_DISTANCE, ORBIT_MAX_PITCH, ORBIT_MIN_DISTANCE, ORBIT_MIN_PITCH,
    ORBIT_PITCH, ORBIT_YAW, PERSPECTIVE_FAR, PERSPECTIVE_FOV_DEGREES, PERSPECTIVE_NEAR,
    ROTATE_SENSITIVITY, ZOOM_SENSITIVITY,
};

/// Perspective orbit camera around a target point, Z-up.
///
/// `yaw` is measured from +X in the ground plane, `pitch` is the elevation
/// above the ground plane.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub viewport: Viewport,
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    aspect_ratio: f32,
    attached: bool,
    input_enabled: bool,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            distance,
            yaw,
            pitch: pitch.clamp(ORBIT_MIN_PITCH, ORBIT_MAX_PITCH),
            fov,
            near: PERSPECTIVE_NEAR,
            far: PERSPECTIVE_FAR,
            viewport: Viewport::FULL,
            rotate_sensitivity: ROTATE_SENSITIVITY,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            aspect_ratio: 16.0 / 9.0,
            attached: false,
            input_enabled: false,
        }
    }

    /// Camera position derived from the orbit parameters.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch) * self.distance
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn pan(&mut self, delta: Vec2, surface: Vec2) {
        if surface.y <= 0.0 {
            return;
        }
        let view = self.view_matrix();
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        // Scale so the target tracks the pointer at the target depth.
        let world_per_pixel = 2.0 * self.distance * (self.fov * 0.5).tan() / surface.y;
        self.target += (-right * delta.x + up * delta.y) * world_per_pixel;
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(
            PERSPECTIVE_FOV_DEGREES.to_radians(),
            ORBIT_DISTANCE,
            ORBIT_YAW,
            ORBIT_PITCH,
        )
    }
}

impl SceneCamera for PerspectiveCamera {
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
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Z)
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, surface: Vec2) {
        if surface.x > 0.0 && surface.y > 0.0 {
            self.aspect_ratio = surface.x / surface.y;
        }
    }

    fn apply_input(&mut self, input: CameraInput, surface: Vec2) -> bool {
        if !self.input_enabled {
            return false;
        }

        match input {
            CameraInput::Orbit(delta) => {
                self.yaw -= delta.x * self.rotate_sensitivity;
                self.pitch = (self.pitch + delta.y * self.rotate_sensitivity)
                    .clamp(ORBIT_MIN_PITCH, ORBIT_MAX_PITCH);
            }
            CameraInput::Pan(delta) => self.pan(delta, surface),
            CameraInput::Zoom(steps) => {
                let factor = (1.0 - steps * self.zoom_sensitivity).clamp(0.2, 5.0);
                self.distance =
                    (self.distance * factor).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
            }
        }
        true
    }
}

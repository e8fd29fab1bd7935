//! Scene cameras and the camera mode state machine.
//!
//! Both cameras live for the whole controller lifetime. The mode decides which
//! one is attached (drives rendering and projection math); input handling is a
//! separate gate that the mode switch never touches.

/// Orthographic top-down camera used in 2D mode.
pub mod orthographic;

/// Perspective orbit camera used in 3D mode.
pub mod perspective;

/// Camera mode enumeration and the rig that switches between the cameras.
pub mod mode;

pub use mode::{CameraMode, CameraRig};
pub use orthographic::OrthographicCamera;
pub use perspective::PerspectiveCamera;

use crate::engine::transform::Viewport;
use bevy::math::{Mat4, Vec2};

/// Pointer input forwarded to the attached camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraInput {
    /// Rotate around the target, in surface pixels.
    Orbit(Vec2),
    /// Translate the view, in surface pixels.
    Pan(Vec2),
    /// Wheel steps, positive zooms in.
    Zoom(f32),
}

/// Capabilities shared by the 2D and 3D cameras.
pub trait SceneCamera {
    /// Make this camera the active viewpoint.
    fn attach(&mut self);

    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    fn enable_input(&mut self);

    fn disable_input(&mut self);

    fn input_enabled(&self) -> bool;

    fn view_matrix(&self) -> Mat4;

    fn projection_matrix(&self) -> Mat4;

    fn viewport(&self) -> Viewport;

    /// Recompute projection parameters for a new surface size.
    fn resize(&mut self, surface: Vec2);

    /// Apply pointer input. Returns `false` when input is disabled or the
    /// camera ignores this kind of input.
    fn apply_input(&mut self, input: CameraInput, surface: Vec2) -> bool;

    fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

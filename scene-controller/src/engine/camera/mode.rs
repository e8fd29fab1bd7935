use super::{CameraInput, OrthographicCamera, PerspectiveCamera, SceneCamera};
use crate::engine::transform::Viewport;
use bevy::log::info;
use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// Which camera drives rendering and projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMode {
    #[serde(rename = "2d")]
    Mode2D,
    #[serde(rename = "3d")]
    Mode3D,
}

impl CameraMode {
    /// Convert string identifier to camera mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "2d" => Some(Self::Mode2D),
            "3d" => Some(Self::Mode3D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mode2D => "2d",
            Self::Mode3D => "3d",
        }
    }
}

/// Owns both cameras and the mode that selects between them.
///
/// Both cameras are constructed eagerly and resized together. Switching only
/// moves the attachment; input enable state is managed separately through
/// [`CameraRig::set_input_enabled`].
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    camera_2d: OrthographicCamera,
    camera_3d: PerspectiveCamera,
}

impl CameraRig {
    /// Build the rig and attach the 2D camera.
    pub fn new(camera_2d: OrthographicCamera, camera_3d: PerspectiveCamera) -> Self {
        let mut rig = Self {
            mode: CameraMode::Mode2D,
            camera_2d,
            camera_3d,
        };
        rig.switch_to_2d();
        rig
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn switch_to_2d(&mut self) {
        self.camera_3d.detach();
        self.camera_2d.attach();
        self.mode = CameraMode::Mode2D;
        info!("Camera mode: 2D");
    }

    pub fn switch_to_3d(&mut self) {
        self.camera_2d.detach();
        self.camera_3d.attach();
        self.mode = CameraMode::Mode3D;
        info!("Camera mode: 3D");
    }

    pub fn switch_to(&mut self, mode: CameraMode) {
        match mode {
            CameraMode::Mode2D => self.switch_to_2d(),
            CameraMode::Mode3D => self.switch_to_3d(),
        }
    }

    /// The attached camera.
    pub fn active(&self) -> &dyn SceneCamera {
        match self.mode {
            CameraMode::Mode2D => &self.camera_2d,
            CameraMode::Mode3D => &self.camera_3d,
        }
    }

    pub fn active_mut(&mut self) -> &mut dyn SceneCamera {
        match self.mode {
            CameraMode::Mode2D => &mut self.camera_2d,
            CameraMode::Mode3D => &mut self.camera_3d,
        }
    }

    /// Viewport of the camera that belongs to the current mode.
    pub fn mode_viewport(&self) -> Viewport {
        match self.mode {
            CameraMode::Mode2D => self.camera_2d.viewport(),
            CameraMode::Mode3D => self.camera_3d.viewport(),
        }
    }

    pub fn camera_2d(&self) -> &OrthographicCamera {
        &self.camera_2d
    }

    pub fn camera_2d_mut(&mut self) -> &mut OrthographicCamera {
        &mut self.camera_2d
    }

    pub fn camera_3d(&self) -> &PerspectiveCamera {
        &self.camera_3d
    }

    pub fn camera_3d_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera_3d
    }

    /// Gate input on both cameras at once, independent of the mode.
    pub fn set_input_enabled(&mut self, enabled: bool) {
        if enabled {
            self.camera_2d.enable_input();
            self.camera_3d.enable_input();
        } else {
            self.camera_2d.disable_input();
            self.camera_3d.disable_input();
        }
    }

    pub fn resize(&mut self, surface: Vec2) {
        self.camera_2d.resize(surface);
        self.camera_3d.resize(surface);
    }

    /// Route input to the attached camera.
    pub fn apply_input(&mut self, input: CameraInput, surface: Vec2) -> bool {
        self.active_mut().apply_input(input, surface)
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(OrthographicCamera::default(), PerspectiveCamera::default())
    }
}

//! Typed publish/subscribe signals between the controller and its host.

/// Subscription registry and per-subscriber mailboxes.
pub mod bus;

pub use bus::{SignalBus, SubscriptionId};

use serde::{Deserialize, Serialize};

/// Signal names as seen by the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    WindowResize,
    CameraSwitch2d,
    CameraSwitch3d,
    PointerWheelStart,
    PointerWheelEnd,
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WindowResize => "WINDOW_RESIZE",
            Self::CameraSwitch2d => "CAMERA_SWITCH_2D",
            Self::CameraSwitch3d => "CAMERA_SWITCH_3D",
            Self::PointerWheelStart => "POINTER_WHEEL_START",
            Self::PointerWheelEnd => "POINTER_WHEEL_END",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    WindowResize { width: f32, height: f32 },
    CameraSwitch2d,
    CameraSwitch3d,
    PointerWheelStart,
    PointerWheelEnd,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::WindowResize { .. } => SignalKind::WindowResize,
            Self::CameraSwitch2d => SignalKind::CameraSwitch2d,
            Self::CameraSwitch3d => SignalKind::CameraSwitch3d,
            Self::PointerWheelStart => SignalKind::PointerWheelStart,
            Self::PointerWheelEnd => SignalKind::PointerWheelEnd,
        }
    }
}

//! Scene controller for a Bevy-hosted 2D/3D viewport.
//!
//! The controller sits between application code and the rendering engine. It
//! owns the camera mode (orthographic 2D or perspective 3D), converts between
//! screen and world coordinates through whichever camera is active, picks
//! entities and ground positions under the pointer, and turns raw wheel events
//! into `POINTER_WHEEL_START` / `POINTER_WHEEL_END` gestures.
//!
//! ## Layout
//!
//! ```text
//! engine/
//!   camera/      SceneCamera trait, 2D + 3D cameras, mode state machine
//!   scene/       scene graph, bounds, ground plane
//!   transform    project / unproject
//!   picking      pick rays and hit tests
//!   controller   SceneController, the orchestrator
//!   context      SceneContext, the explicit single-instance handle
//!   core/        Bevy plugins and app creation
//! input/         scheduler + wheel gesture detector
//! signals/       typed publish/subscribe bus
//! rpc/           JSON-RPC bridge to a web frontend
//! ```

/// Cameras, scene graph, coordinate transforms, picking and the controller.
pub mod engine;

/// Deferred task scheduling and wheel gesture detection.
pub mod input;

/// JSON-RPC 2.0 bridge for frontend integration.
pub mod rpc;

/// Publish/subscribe signal bus connecting the controller to the host.
pub mod signals;

pub use engine::camera::CameraMode;
pub use engine::context::SceneContext;
pub use engine::controller::SceneController;
pub use engine::picking::PickResult;
pub use engine::settings::SceneSettings;
pub use signals::{Signal, SignalBus, SignalKind};

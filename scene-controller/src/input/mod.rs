/// Cancellable deferred tasks keyed by a monotonic timestamp.
pub mod scheduler;

/// Wheel debounce turning raw wheel events into start/end gestures.
pub mod gesture;

pub use gesture::{GestureTimerState, WheelGesture, WheelGestureDetector};
pub use scheduler::{Scheduler, TaskHandle};

/// Deferred work owned by the scene controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTask {
    WheelGestureTimeout,
}

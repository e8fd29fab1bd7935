/// Maximum gap between wheel events that still belong to the same gesture.
pub const WHEEL_GESTURE_THRESHOLD_MS: u64 = 300;

//! Compile-time defaults shared by the scene controller crates.
//!
//! Every value here can be overridden at runtime through `SceneSettings`;
//! these are the fallbacks used when no settings file is present.

/// Orthographic and perspective camera defaults.
pub mod camera;

/// Wheel gesture timing.
pub mod gesture;

/// Asset paths.
pub mod path;

/// Highlight colours, ground plane and clear colour.
pub mod render_settings;

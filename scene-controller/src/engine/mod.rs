//! Scene orchestration on top of the rendering engine.
//!
//! Everything below `core` is engine-agnostic and works on `bevy::math`
//! types only; `core` binds the controller to Bevy windows, input and cameras.

pub mod camera;
pub mod context;
pub mod controller;
pub mod core;
pub mod highlight;
pub mod import;
pub mod picking;
pub mod scene;
pub mod settings;
pub mod surface;
pub mod transform;

//! Engine-side scene model: meshes, their bounds and the ground plane.

/// Axis-aligned bounding boxes.
pub mod bounds;

/// Mesh registry with parent/child links and world-space bounds.
pub mod graph;

/// Ground plane used as the backstop for world-position picks.
pub mod ground;

pub use bounds::Aabb;
pub use graph::{MeshId, SceneGraph, SceneMesh};
pub use ground::GroundPlane;

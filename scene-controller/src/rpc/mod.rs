//! JSON-RPC 2.0 communication layer for web frontend integration.
//!
//! When the scene runs inside an iframe, the parent page drives it through
//! `postMessage`. Requests carry an `id` and get a response; notifications
//! flow one way.
//!
//! ```text
//! Frontend (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ SceneController / SignalBus
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤  pointer_wheel_start / _end
//! ```
//!
//! ## Methods
//!
//! ### Camera
//! - `camera_switch { mode: "2d" | "3d" }`: queue a camera switch on the signal bus
//! - `get_camera_mode`: current mode
//! - `set_camera_input { enabled }`: gate camera input for both cameras
//!
//! ### Coordinates and picking
//! - `pick_entity`: entity under the pointer
//! - `get_ground_position`: ground point under the pointer
//! - `screen_to_world { x, y }`
//! - `world_to_screen { x, y, z }`
//!
//! ### Highlight
//! - `set_highlight { style: "hover" | "select" }`
//!
//! ### Meshes
//! - `import_mesh { base_url, mesh_name, entity_id }`: load a `*.mesh.json`
//!   description and import it; the response arrives once the import finishes
//!   with `{ entity_id, roots }`
//!
//! ## Error codes
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error (e.g. controller not initialized)
//! - `-32000`: Mesh import failed; `data.kind` is `load`, `parse` or `released`

/// JSON-RPC 2.0 message types, request dispatch and the Bevy plugin.
pub mod web_rpc;

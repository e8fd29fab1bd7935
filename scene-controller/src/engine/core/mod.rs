/// Bevy app assembly.
pub mod app_setup;

/// Mesh description assets and the import queue feeding the controller.
pub mod mesh_import;

/// Headless plugin binding the controller to Bevy input, windows and events.
pub mod plugin;

/// Cameras, ground mesh and bounding-box gizmos.
pub mod render_plugin;

/// Settings asset loading and hot reload.
pub mod settings_loader;

/// Primary window configuration per target.
pub mod window_config;

/// Settings file loaded from the asset directory at startup and hot-reloaded.
pub const SETTINGS_ASSET_PATH: &str = "settings.scene.json";

/// Extension registered for settings assets.
pub const SETTINGS_EXTENSION: &str = "scene.json";

/// Extension registered for mesh description assets.
pub const MESH_EXTENSION: &str = "mesh.json";

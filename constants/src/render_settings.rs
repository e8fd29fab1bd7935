/// Bounding box colour while an entity is hovered.
pub const HOVER_COLOR_HEX: &str = "#479ef5";

/// Bounding box colour while an entity is selected.
pub const SELECT_COLOR_HEX: &str = "#5b5fc7";

/// Edge length of the square ground plane used as a picking backstop.
pub const GROUND_PLANE_SIZE: f32 = 1_000_000.0;

/// Spacing of the grid lines drawn on the ground plane.
pub const GROUND_GRID_RATIO: f32 = 1000.0;

/// Opacity of the ground plane material.
pub const GROUND_OPACITY: f32 = 0.5;

/// Scene clear colour (linear RGBA).
pub const CLEAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Render surface size assumed until the host reports a real one.
pub const DEFAULT_SURFACE_WIDTH: f32 = 1280.0;
pub const DEFAULT_SURFACE_HEIGHT: f32 = 720.0;

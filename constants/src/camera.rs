/// Half of the horizontal world extent visible through the 2D camera.
pub const ORTHO_HALF_WIDTH: f32 = 50.0;

/// Height of the 2D camera above the ground plane (world units, +Z).
pub const ORTHO_CAMERA_HEIGHT: f32 = 100.0;

/// Near/far clip distances for the 2D camera.
pub const ORTHO_NEAR: f32 = 0.1;
pub const ORTHO_FAR: f32 = 10_000.0;

/// Zoom limits for the 2D camera half width.
pub const ORTHO_MIN_HALF_WIDTH: f32 = 0.5;
pub const ORTHO_MAX_HALF_WIDTH: f32 = 100_000.0;

/// Vertical field of view of the 3D camera, in degrees.
pub const PERSPECTIVE_FOV_DEGREES: f32 = 45.0;

/// Near/far clip distances for the 3D camera.
pub const PERSPECTIVE_NEAR: f32 = 0.1;
pub const PERSPECTIVE_FAR: f32 = 100_000.0;

/// Initial orbit of the 3D camera around the world origin.
pub const ORBIT_DISTANCE: f32 = 100.0;
pub const ORBIT_YAW: f32 = -std::f32::consts::FRAC_PI_2;
pub const ORBIT_PITCH: f32 = std::f32::consts::FRAC_PI_4;

/// Orbit distance limits.
pub const ORBIT_MIN_DISTANCE: f32 = 1.0;
pub const ORBIT_MAX_DISTANCE: f32 = 50_000.0;

/// Pitch is kept strictly above the ground and below the zenith.
pub const ORBIT_MIN_PITCH: f32 = 0.01;
pub const ORBIT_MAX_PITCH: f32 = 1.55;

/// Input sensitivities shared by both cameras.
pub const ROTATE_SENSITIVITY: f32 = 0.005;
pub const ZOOM_SENSITIVITY: f32 = 0.1;

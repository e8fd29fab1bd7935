//! Runtime configuration.
//!
//! Every field falls back to the compile-time default from the `constants`
//! crate, so a settings file only needs to name what it overrides.

use bevy::color::Srgba;
use bevy::prelude::*;
use constants::camera::{
    ORBIT_DISTANCE, ORTHO_CAMERA_HEIGHT, ORTHO_HALF_WIDTH, PERSPECTIVE_FOV_DEGREES,
};
use constants::gesture::WHEEL_GESTURE_THRESHOLD_MS;
use constants::render_settings::{
    CLEAR_COLOR, GROUND_PLANE_SIZE, HOVER_COLOR_HEX, SELECT_COLOR_HEX,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field} colour {value:?}")]
    InvalidColor { field: &'static str, value: String },
}

/// Scene controller settings as a Bevy asset. Mirrors the JSON file.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath)]
#[serde(default)]
pub struct SceneSettings {
    pub wheel_gesture_threshold_ms: u64,
    pub hover_color: String,
    pub select_color: String,
    pub ground_size: f32,
    pub ortho_half_width: f32,
    pub ortho_camera_height: f32,
    pub perspective_fov_degrees: f32,
    pub orbit_distance: f32,
    pub clear_color: [f32; 4],
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            wheel_gesture_threshold_ms: WHEEL_GESTURE_THRESHOLD_MS,
            hover_color: HOVER_COLOR_HEX.to_string(),
            select_color: SELECT_COLOR_HEX.to_string(),
            ground_size: GROUND_PLANE_SIZE,
            ortho_half_width: ORTHO_HALF_WIDTH,
            ortho_camera_height: ORTHO_CAMERA_HEIGHT,
            perspective_fov_degrees: PERSPECTIVE_FOV_DEGREES,
            orbit_distance: ORBIT_DISTANCE,
            clear_color: CLEAR_COLOR,
        }
    }
}

impl SceneSettings {
    /// Parse and validate settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every field that cannot be validated by deserialization alone.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.hover_srgba()?;
        self.select_srgba()?;
        Ok(())
    }

    pub fn hover_srgba(&self) -> Result<Srgba, SettingsError> {
        parse_color("hover_color", &self.hover_color)
    }

    pub fn select_srgba(&self) -> Result<Srgba, SettingsError> {
        parse_color("select_color", &self.select_color)
    }

    pub fn wheel_gesture_threshold(&self) -> Duration {
        Duration::from_millis(self.wheel_gesture_threshold_ms)
    }

    pub fn clear_color(&self) -> Color {
        let [r, g, b, a] = self.clear_color;
        Color::linear_rgba(r, g, b, a)
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Srgba, SettingsError> {
    Srgba::hex(value).map_err(|_| SettingsError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

use bevy::color::Srgba;
use bevy::log::debug;
use constants::render_settings::{HOVER_COLOR_HEX, SELECT_COLOR_HEX};
use serde::{Deserialize, Serialize};

/// Which highlight the bounding-box renderer currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    #[default]
    Hover,
    Select,
}

impl HighlightKind {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hover" => Some(Self::Hover),
            "select" => Some(Self::Select),
            _ => None,
        }
    }
}

/// Colours used for the outline of meshes with a visible bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBoxStyle {
    pub front_color: Srgba,
    pub back_color: Srgba,
}

impl BoundingBoxStyle {
    pub fn solid(color: Srgba) -> Self {
        Self {
            front_color: color,
            back_color: color,
        }
    }
}

/// Bounding-box renderer state: the two palette entries and the active one.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    pub hover: Srgba,
    pub select: Srgba,
    kind: HighlightKind,
    bounding_box: BoundingBoxStyle,
}

impl HighlightStyle {
    pub fn new(hover: Srgba, select: Srgba) -> Self {
        Self {
            hover,
            select,
            kind: HighlightKind::Hover,
            bounding_box: BoundingBoxStyle::solid(hover),
        }
    }

    pub fn set_hover(&mut self) {
        self.apply(HighlightKind::Hover);
    }

    pub fn set_select(&mut self) {
        self.apply(HighlightKind::Select);
    }

    pub fn apply(&mut self, kind: HighlightKind) {
        let color = match kind {
            HighlightKind::Hover => self.hover,
            HighlightKind::Select => self.select,
        };
        self.kind = kind;
        self.bounding_box = BoundingBoxStyle::solid(color);
        debug!("Bounding box highlight: {:?} ({})", kind, color.to_hex());
    }

    pub fn kind(&self) -> HighlightKind {
        self.kind
    }

    pub fn bounding_box(&self) -> BoundingBoxStyle {
        self.bounding_box
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::new(
            Srgba::hex(HOVER_COLOR_HEX).unwrap_or(Srgba::BLUE),
            Srgba::hex(SELECT_COLOR_HEX).unwrap_or(Srgba::BLUE),
        )
    }
}

//! Geometry of a sculpture card on the canvas.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Minimum card width in pixels.
pub const MIN_WIDTH: f64 = 50.0;
/// Width given to cards that have never been positioned.
pub const DEFAULT_WIDTH: f64 = 300.0;
/// Height given to cards that have never been positioned.
pub const DEFAULT_HEIGHT: f64 = 300.0;

/// Absolute card geometry, in pixels relative to the canvas top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Position {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Build a position from optionally stored fields, filling gaps with defaults.
    pub fn from_stored(
        top: Option<f64>,
        left: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            top: top.unwrap_or(defaults.top),
            left: left.unwrap_or(defaults.left),
            width: width.unwrap_or(defaults.width),
            height: height.unwrap_or(defaults.height),
        }
    }

    /// Bounding box in canvas coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(
            Point::new(self.left, self.top),
            Size::new(self.width, self.height),
        )
    }

    /// Bottom edge in canvas coordinates.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Copy with every pixel value rounded to two decimals.
    pub fn rounded(&self) -> Self {
        Self {
            top: round2(self.top),
            left: round2(self.left),
            width: round2(self.width),
            height: round2(self.height),
        }
    }
}

/// A card geometry attached to a content store identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedItem {
    pub id: String,
    pub position: Position,
    /// Image width / height, once the image's natural size is known.
    pub aspect_ratio: Option<f64>,
}

impl PositionedItem {
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            aspect_ratio: None,
        }
    }

    /// Record the natural size of the card image and derive the layout height from it.
    pub fn set_image_size(&mut self, natural_width: f64, natural_height: f64) {
        if natural_width > 0.0 && natural_height > 0.0 {
            let ratio = natural_width / natural_height;
            self.aspect_ratio = Some(ratio);
            self.position.height = self.position.width / ratio;
        }
    }
}

/// One geometry write, as sent to `/api/updateSculptureDimensions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionsUpdate {
    pub id: String,
    pub top: f64,
    pub left: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_percentage: Option<String>,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_percentage: Option<String>,
    pub height: f64,
}

impl DimensionsUpdate {
    /// Package a final position, deriving percentages from `canvas_width`.
    pub fn from_position(id: impl Into<String>, position: Position, canvas_width: f64) -> Self {
        let position = position.rounded();
        Self {
            id: id.into(),
            top: position.top,
            left: position.left,
            left_percentage: percentage_of(position.left, canvas_width),
            width: position.width,
            width_percentage: percentage_of(position.width, canvas_width),
            height: position.height,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.top, self.left, self.width, self.height)
    }

    /// Field set to patch into the stored document. Absent percentages are left out.
    pub fn to_patch(&self) -> serde_json::Map<String, serde_json::Value> {
        let rounded = self.position().rounded();
        let mut set = serde_json::Map::new();
        set.insert("top".into(), rounded.top.into());
        set.insert("left".into(), rounded.left.into());
        set.insert("width".into(), rounded.width.into());
        set.insert("height".into(), rounded.height.into());
        if let Some(value) = &self.left_percentage {
            set.insert("left_percentage".into(), value.clone().into());
        }
        if let Some(value) = &self.width_percentage {
            set.insert("width_percentage".into(), value.clone().into());
        }
        set
    }
}

/// Round to two decimals, halves away from zero.
///
/// Values too large to scale are already integral and returned as is.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Express `value` as a percentage string of `total`, e.g. `"12.50%"`.
pub fn percentage_of(value: f64, total: f64) -> Option<String> {
    (total > 0.0).then(|| format!("{:.2}%", value / total * 100.0))
}

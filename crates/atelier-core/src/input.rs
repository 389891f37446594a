//! Pointer events delivered to the canvas editor.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Which part of a card the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerTarget {
    /// The card body (starts a move).
    Body,
    /// The resize affordance in the card's corner (starts a resize).
    ResizeHandle,
}

/// Pointer event in page coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        item_id: String,
        target: PointerTarget,
        position: Point,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
}

impl PointerEvent {
    /// Page position carried by the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}

/// Layout events that may change the required canvas height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutEvent {
    /// Initial data load finished.
    DataLoaded,
    /// A card image finished loading with its natural size.
    ImageLoaded {
        item_id: String,
        natural_width: f64,
        natural_height: f64,
    },
    /// A card image failed to load.
    ImageFailed { item_id: String },
    /// The browser window changed size.
    WindowResized { viewport_height: f64 },
    /// The canvas content box changed size.
    ContentResized { width: f64 },
}

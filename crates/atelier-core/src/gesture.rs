//! Move and resize gestures on a single card.

use crate::input::PointerTarget;
use crate::position::{MIN_WIDTH, Position};
use crate::snap::{GRID_SIZE, SnapMode};
use kurbo::{Point, Vec2};

/// Kind of gesture, decided on pointer down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Move,
    Resize,
}

impl From<PointerTarget> for GestureKind {
    fn from(target: PointerTarget) -> Self {
        match target {
            PointerTarget::Body => GestureKind::Move,
            PointerTarget::ResizeHandle => GestureKind::Resize,
        }
    }
}

/// Bounds of the canvas in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    /// Page position of the canvas top-left corner.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }
}

/// State of an active gesture, scoped to one pointer-down/up sequence.
#[derive(Debug, Clone)]
pub struct GestureState {
    /// The card being manipulated.
    pub item_id: String,
    pub kind: GestureKind,
    /// Pointer offset from the card's top-left corner at pointer down.
    pub grab_offset: Vec2,
    /// Geometry when the gesture started.
    pub original: Position,
    /// Current pointer position in page coordinates.
    pub current_point: Point,
}

impl GestureState {
    /// Start a gesture at `pointer` on a card currently at `position`.
    pub fn new(
        item_id: impl Into<String>,
        kind: GestureKind,
        pointer: Point,
        position: Position,
        canvas: &CanvasBounds,
    ) -> Self {
        let card_origin = Point::new(
            canvas.origin.x + position.left,
            canvas.origin.y + position.top,
        );
        Self {
            item_id: item_id.into(),
            kind,
            grab_offset: pointer - card_origin,
            original: position,
            current_point: pointer,
        }
    }
}

/// Compute the card position for a move step.
///
/// The grab offset keeps the cursor at the same spot on the card. Left is
/// clamped to the canvas width; top only to zero since the canvas grows.
pub fn apply_move(
    position: Position,
    pointer: Point,
    grab_offset: Vec2,
    canvas: &CanvasBounds,
    snap: SnapMode,
) -> Position {
    let raw_left = pointer.x - canvas.origin.x - grab_offset.x;
    let raw_top = pointer.y - canvas.origin.y - grab_offset.y;

    let left = clamp_left(snap.apply(raw_left, GRID_SIZE), position.width, canvas.width);
    let top = snap.apply(raw_top, GRID_SIZE).max(0.0);

    Position {
        top,
        left,
        ..position
    }
}

/// Compute the card position for a resize step.
///
/// Only the width follows the pointer. The height tracks the image aspect
/// ratio when it is known and is left alone otherwise.
pub fn apply_resize(
    position: Position,
    pointer: Point,
    canvas: &CanvasBounds,
    snap: SnapMode,
    aspect_ratio: Option<f64>,
) -> Position {
    let card_left = canvas.origin.x + position.left;
    let raw_width = pointer.x - card_left;
    let width = clamp_width(snap.apply(raw_width, GRID_SIZE), position.left, canvas.width);
    let height = match aspect_ratio {
        Some(ratio) if ratio > 0.0 => width / ratio,
        _ => position.height,
    };

    Position {
        width,
        height,
        ..position
    }
}

/// Keep a card's left edge inside `[0, canvas_width - width]`.
pub fn clamp_left(left: f64, width: f64, canvas_width: f64) -> f64 {
    left.min(canvas_width - width).max(0.0)
}

/// Keep a width inside `[MIN_WIDTH, canvas_width - left]`, the minimum winning.
pub fn clamp_width(width: f64, left: f64, canvas_width: f64) -> f64 {
    width.min(canvas_width - left).max(MIN_WIDTH)
}

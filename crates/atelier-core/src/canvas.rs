//! Canvas state: positioned cards, the active gesture and the canvas height.

use crate::autosize::{AutosizeTrigger, CanvasAutosizer};
use crate::gesture::{
    CanvasBounds, GestureKind, GestureState, apply_move, apply_resize, clamp_left, clamp_width,
};
use crate::input::{LayoutEvent, PointerEvent, PointerTarget};
use crate::position::{DimensionsUpdate, Position, PositionedItem};
use crate::snap::{GRID_SIZE, SnapMode};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// The editor canvas.
///
/// Geometry changes are applied immediately on every pointer move; a
/// [`DimensionsUpdate`] is produced once, when the gesture ends.
#[derive(Debug, Clone)]
pub struct Canvas {
    origin: Point,
    width: f64,
    items: HashMap<String, PositionedItem>,
    /// Render order (back to front).
    order: Vec<String>,
    gesture: Option<GestureState>,
    snap_mode: SnapMode,
    autosizer: CanvasAutosizer,
}

impl Canvas {
    /// Create an empty canvas at page position `origin`.
    pub fn new(origin: Point, width: f64, viewport_height: f64) -> Self {
        Self {
            origin,
            width,
            items: HashMap::new(),
            order: Vec::new(),
            gesture: None,
            snap_mode: SnapMode::None,
            autosizer: CanvasAutosizer::new(viewport_height),
        }
    }

    pub fn with_snap_mode(mut self, snap_mode: SnapMode) -> Self {
        self.snap_mode = snap_mode;
        self
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.snap_mode
    }

    pub fn set_snap_mode(&mut self, snap_mode: SnapMode) {
        self.snap_mode = snap_mode;
    }

    /// Current bounds in page coordinates.
    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds::new(self.origin, self.width, self.autosizer.height())
    }

    pub fn height(&self) -> f64 {
        self.autosizer.height()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Replace all cards with freshly loaded data.
    pub fn load_items(&mut self, items: impl IntoIterator<Item = PositionedItem>) {
        self.items.clear();
        self.order.clear();
        self.gesture = None;
        for item in items {
            self.insert(item);
        }
        self.relayout(AutosizeTrigger::DataLoaded);
    }

    /// Add or replace a single card.
    pub fn insert(&mut self, item: PositionedItem) {
        if !self.items.contains_key(&item.id) {
            self.order.push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
    }

    pub fn item(&self, id: &str) -> Option<&PositionedItem> {
        self.items.get(id)
    }

    /// Cards in render order.
    pub fn items_ordered(&self) -> impl Iterator<Item = &PositionedItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Active gesture, if any.
    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    /// Card bounding boxes in page coordinates.
    fn page_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        let offset = self.origin.to_vec2();
        self.items.values().map(move |item| item.position.rect() + offset)
    }

    fn relayout(&mut self, trigger: AutosizeTrigger) -> bool {
        let rects: Vec<Rect> = self.page_rects().collect();
        self.autosizer.recompute(trigger, self.origin.y, rects)
    }

    /// Start a gesture. Returns false if the card is unknown or a gesture is already running.
    pub fn pointer_down(&mut self, item_id: &str, target: PointerTarget, pointer: Point) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(item) = self.items.get(item_id) else {
            return false;
        };
        let bounds = self.bounds();
        self.gesture = Some(GestureState::new(
            item_id,
            GestureKind::from(target),
            pointer,
            item.position,
            &bounds,
        ));
        true
    }

    /// Apply one move step of the active gesture and return the card's new geometry.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Position> {
        let bounds = self.bounds();
        let snap_mode = self.snap_mode;
        let gesture = self.gesture.as_mut()?;
        gesture.current_point = pointer;
        let item = self.items.get_mut(&gesture.item_id)?;

        item.position = match gesture.kind {
            GestureKind::Move => {
                apply_move(item.position, pointer, gesture.grab_offset, &bounds, snap_mode)
            }
            GestureKind::Resize => {
                apply_resize(item.position, pointer, &bounds, snap_mode, item.aspect_ratio)
            }
        };
        let position = item.position;
        self.autosizer.grow_to_fit(position.bottom());
        Some(position)
    }

    /// End the active gesture and package the final geometry for persistence.
    ///
    /// The gesture is cleared whatever happens to the returned update.
    pub fn pointer_up(&mut self, pointer: Point) -> Option<DimensionsUpdate> {
        let mut gesture = self.gesture.take()?;
        gesture.current_point = pointer;
        let item = self.items.get_mut(&gesture.item_id)?;

        // Snapping can push a clamped edge past the canvas, so clamp again.
        // A resize keeps the card's top-left corner where it is.
        let snap = self.snap_mode;
        let current = item.position;
        let (top, left, width) = match gesture.kind {
            GestureKind::Move => {
                let width = clamp_width(snap.apply(current.width, GRID_SIZE), 0.0, self.width);
                let left = clamp_left(snap.apply(current.left, GRID_SIZE), width, self.width);
                (snap.apply(current.top, GRID_SIZE).max(0.0), left, width)
            }
            GestureKind::Resize => {
                let width = clamp_width(snap.apply(current.width, GRID_SIZE), current.left, self.width);
                (current.top, current.left, width)
            }
        };
        let height = match item.aspect_ratio {
            Some(ratio) if ratio > 0.0 => width / ratio,
            _ => snap.apply(current.height, GRID_SIZE),
        };
        let final_position = Position {
            top,
            left,
            width,
            height,
        };
        item.position = final_position;
        Some(DimensionsUpdate::from_position(
            item.id.clone(),
            final_position,
            self.width,
        ))
    }

    /// Drop the active gesture without producing an update.
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            if let Some(item) = self.items.get_mut(&gesture.item_id) {
                item.position = gesture.original;
            }
        }
    }

    /// Route a pointer event. Returns an update only when a gesture completes.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<DimensionsUpdate> {
        match event {
            PointerEvent::Down {
                item_id,
                target,
                position,
            } => {
                self.pointer_down(&item_id, target, position);
                None
            }
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                None
            }
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    /// React to a layout-affecting event. Returns true if the canvas height changed.
    pub fn handle_layout_event(&mut self, event: LayoutEvent) -> bool {
        match event {
            LayoutEvent::DataLoaded => self.relayout(AutosizeTrigger::DataLoaded),
            LayoutEvent::ImageLoaded {
                item_id,
                natural_width,
                natural_height,
            } => {
                if let Some(item) = self.items.get_mut(&item_id) {
                    item.set_image_size(natural_width, natural_height);
                }
                self.relayout(AutosizeTrigger::ImageLoaded)
            }
            LayoutEvent::ImageFailed { .. } => self.relayout(AutosizeTrigger::ImageFailed),
            LayoutEvent::WindowResized { viewport_height } => {
                self.autosizer.set_viewport_height(viewport_height);
                self.relayout(AutosizeTrigger::WindowResized)
            }
            LayoutEvent::ContentResized { width } => {
                self.width = width;
                self.relayout(AutosizeTrigger::ContentResized)
            }
        }
    }
}

//! Keeps the canvas tall enough for its positioned cards.

use kurbo::Rect;

/// Space kept below the lowest card.
pub const BOTTOM_PADDING: f64 = 40.0;
/// Height of the fixed page header above the canvas.
pub const HEADER_HEIGHT: f64 = 80.0;

/// What caused a height recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosizeTrigger {
    DataLoaded,
    ImageLoaded,
    ImageFailed,
    WindowResized,
    ContentResized,
    DragStep,
}

/// Height the canvas needs so every child fits, and at least the visible viewport.
///
/// `children` are bounding boxes in page coordinates; `canvas_top` is the
/// canvas's page offset.
pub fn required_height<I>(canvas_top: f64, children: I, viewport_height: f64) -> f64
where
    I: IntoIterator<Item = Rect>,
{
    let content = children
        .into_iter()
        .map(|rect| rect.y1 - canvas_top)
        .fold(0.0_f64, f64::max);
    (content + BOTTOM_PADDING).max(viewport_height - HEADER_HEIGHT)
}

/// Canvas height tracker.
#[derive(Debug, Clone)]
pub struct CanvasAutosizer {
    viewport_height: f64,
    height: f64,
    last_trigger: Option<AutosizeTrigger>,
}

impl CanvasAutosizer {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            height: (viewport_height - HEADER_HEIGHT).max(0.0),
            last_trigger: None,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
    }

    pub fn last_trigger(&self) -> Option<AutosizeTrigger> {
        self.last_trigger
    }

    /// Recompute the height from scratch. Returns true if it changed.
    pub fn recompute<I>(&mut self, trigger: AutosizeTrigger, canvas_top: f64, children: I) -> bool
    where
        I: IntoIterator<Item = Rect>,
    {
        self.last_trigger = Some(trigger);
        let height = required_height(canvas_top, children, self.viewport_height);
        let changed = height != self.height;
        if changed {
            log::debug!("canvas height {:.1} -> {:.1} ({:?})", self.height, height, trigger);
            self.height = height;
        }
        changed
    }

    /// Grow (never shrink) so a card bottom at `bottom` plus padding fits.
    ///
    /// Used on every drag step, where a full recompute is not needed.
    pub fn grow_to_fit(&mut self, bottom: f64) -> bool {
        self.last_trigger = Some(AutosizeTrigger::DragStep);
        let needed = bottom + BOTTOM_PADDING;
        if needed > self.height {
            self.height = needed;
            true
        } else {
            false
        }
    }
}

//! Grid snapping for card geometry.

/// Grid size for snapping, in canvas pixels.
pub const GRID_SIZE: f64 = 10.0;

/// Snap mode for the canvas editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    #[default]
    None,
    Grid,
}

impl SnapMode {
    /// Snap a single value if the mode calls for it.
    pub fn apply(self, value: f64, grid_size: f64) -> f64 {
        match self {
            SnapMode::None => value,
            SnapMode::Grid => snap_value(value, grid_size),
        }
    }
}

/// Round a value to the nearest multiple of `grid_size`.
///
/// A non-positive grid size leaves the value untouched.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

//! Input event primitives delivered by the root surface.

/// Keyboard primitives.
pub mod key;
/// Mouse primitives.
pub mod mouse;

/// A scroll-wheel or trackpad delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollDelta {
    /// Horizontal scroll amount.
    pub x: f32,
    /// Vertical scroll amount.
    pub y: f32,
}

impl ScrollDelta {
    /// Construct a new scroll delta.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

//! Integer geometry primitives used by the widget tree.

/// Width/height size type.
mod expanse;
/// Signed point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;

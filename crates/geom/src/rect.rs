use super::{Expanse, Point};

/// A rectangle with a signed origin and an unsigned extent.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a new rectangle.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// Build a rectangle from an origin and a size.
    pub fn at(tl: Point, size: Expanse) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// Return a zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Half-open containment: `tl <= p < tl + (w, h)` on both axes.
    pub fn contains_point(&self, p: impl Into<Point>) -> bool {
        let p = p.into();
        let dx = i64::from(p.x) - i64::from(self.tl.x);
        let dy = i64::from(p.y) - i64::from(self.tl.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.w) && dy < i64::from(self.h)
    }

    /// Shift the rectangle by an offset.
    pub fn shift(&self, offset: Point) -> Self {
        Self {
            tl: self.tl + offset,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 20, 5, 5);
        assert!(r.contains_point((10, 20)));
        assert!(r.contains_point((14, 24)));
        assert!(!r.contains_point((15, 24)));
        assert!(!r.contains_point((14, 25)));
        assert!(!r.contains_point((9, 20)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::new(0, 0, 0, 10);
        assert!(!r.contains_point((0, 0)));
    }

    proptest! {
        #[test]
        fn shift_preserves_containment(
            x in -100i32..100, y in -100i32..100,
            w in 0u32..50, h in 0u32..50,
            px in -200i32..200, py in -200i32..200,
            ox in -50i32..50, oy in -50i32..50,
        ) {
            let r = Rect::new(x, y, w, h);
            let off = Point::new(ox, oy);
            prop_assert_eq!(
                r.contains_point((px, py)),
                r.shift(off).contains_point(Point::new(px, py) + off)
            );
        }
    }
}

use super::{Point, Rect};

/// An `Expanse` is a rectangle that has a width and height but no location.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Expanse {
    /// Construct a new expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// True if both dimensions are zero.
    pub fn is_zero(&self) -> bool {
        self.w == 0 && self.h == 0
    }

    /// Return a `Rect` with the same dimensions as the `Expanse`, but a location at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// The expanse as a signed vector, saturating at `i32::MAX`.
    pub fn to_point(&self) -> Point {
        Point {
            x: i32::try_from(self.w).unwrap_or(i32::MAX),
            y: i32::try_from(self.h).unwrap_or(i32::MAX),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }

    /// True if this size can completely enclose the target size in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_point_saturates() {
        assert_eq!(Expanse::new(4, 9).to_point(), Point::new(4, 9));
        assert_eq!(Expanse::new(u32::MAX, 1).to_point(), Point::new(i32::MAX, 1));
    }

    #[test]
    fn max_and_contains() {
        let a = Expanse::new(10, 2);
        let b = Expanse::new(3, 8);
        assert_eq!(a.max(b), Expanse::new(10, 8));
        assert!(a.max(b).contains(&a));
        assert!(!a.contains(&b));
    }
}

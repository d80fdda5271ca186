use std::ops::{BitOr, BitOrAssign};

/// Mouse button codes.
#[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Button {
    /// Left mouse button. This is the primary button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button.
    Middle,
}

impl Button {
    /// Is this the primary button?
    pub fn is_primary(&self) -> bool {
        *self == Self::Left
    }

    /// Bit used for this button in a [`Buttons`] mask.
    fn bit(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 1 << 1,
            Self::Middle => 1 << 2,
        }
    }
}

/// The set of mouse buttons currently held down.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Buttons(u8);

impl Buttons {
    /// No buttons held.
    pub fn none() -> Self {
        Self(0)
    }

    /// Is the button held?
    pub fn contains(&self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    /// Mark the button as held.
    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    /// Mark the button as released.
    pub fn remove(&mut self, button: Button) {
        self.0 &= !button.bit();
    }

    /// True when no button is held.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<Button> for Buttons {
    fn from(b: Button) -> Self {
        Self(b.bit())
    }
}

impl BitOr<Button> for Buttons {
    type Output = Self;

    fn bitor(self, other: Button) -> Self {
        Self(self.0 | other.bit())
    }
}

impl BitOrAssign<Button> for Buttons {
    fn bitor_assign(&mut self, other: Button) {
        self.insert(other);
    }
}

//! This module contains the core primitives to represent keyboard input.

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
    /// Super/command is active.
    pub super_key: bool,
}

/// Key codes delivered by the platform layer.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up key.
    PageUp,
    /// Page down key.
    PageDown,
    /// Tab key.
    Tab,
    /// Delete key.
    Delete,
    /// Function key.
    F(u8),
    /// A printable key.
    Char(char),
    /// Escape key.
    Esc,
    /// A key the platform could not name.
    Unknown,
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// Key transition kinds.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Action {
    /// Key went down.
    Press,
    /// Key went up.
    Release,
    /// Key is auto-repeating.
    Repeat,
}

/// A raw keyboard event.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyEvent {
    /// Logical key.
    pub key: KeyCode,
    /// Platform scancode.
    pub scancode: i32,
    /// Transition kind.
    pub action: Action,
    /// Modifier state.
    pub mods: Mods,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn press(key: impl Into<KeyCode>) -> Self {
        Self {
            key: key.into(),
            scancode: 0,
            action: Action::Press,
            mods: Mods::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_defaults() {
        let e = KeyEvent::press('q');
        assert_eq!(e.key, KeyCode::Char('q'));
        assert_eq!(e.action, Action::Press);
        assert_eq!(e.mods, Mods::default());
    }
}

use super::render::RecordingRenderer;
use crate::{
    Core, NodeId, Screen,
    error::Result,
    event::{
        ScrollDelta,
        key::{KeyEvent, Mods},
        mouse::Button,
    },
    geom::{Expanse, Point},
    theme::Theme,
    widget::EventOutcome,
};

/// A [`Screen`] and a [`RecordingRenderer`]. Tests drive the screen the way a
/// window system would and inspect the tree and the recorded paint stream.
pub struct Harness {
    /// The screen under test.
    pub screen: Screen,
    /// Renderer that records each frame.
    pub renderer: RecordingRenderer,
}

impl Harness {
    /// A harness with the default theme.
    pub fn new(size: impl Into<Expanse>) -> Self {
        Self::with_theme(size, Theme::default())
    }

    /// A harness with a custom theme.
    pub fn with_theme(size: impl Into<Expanse>, theme: Theme) -> Self {
        Self {
            screen: Screen::new(size, theme),
            renderer: RecordingRenderer::new(),
        }
    }

    /// The surface node.
    pub fn root(&self) -> NodeId {
        self.screen.root()
    }

    /// The arena.
    pub fn core(&self) -> &Core {
        self.screen.core()
    }

    /// The arena, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        self.screen.core_mut()
    }

    /// Move the pointer.
    pub fn move_to(&mut self, p: impl Into<Point>) -> Result<EventOutcome> {
        self.screen.cursor_pos_event(p)
    }

    /// Press a button at the current pointer position.
    pub fn press(&mut self, button: Button) -> Result<EventOutcome> {
        self.screen.mouse_button_event(button, true, Mods::default())
    }

    /// Release a button at the current pointer position.
    pub fn release(&mut self, button: Button) -> Result<EventOutcome> {
        self.screen.mouse_button_event(button, false, Mods::default())
    }

    /// Move to `p` and click the primary button there.
    pub fn click(&mut self, p: impl Into<Point>) -> Result<()> {
        self.move_to(p)?;
        self.press(Button::Left)?;
        self.release(Button::Left)?;
        Ok(())
    }

    /// Press the primary button at `from`, move to `to`, and release.
    pub fn drag(&mut self, from: impl Into<Point>, to: impl Into<Point>) -> Result<()> {
        self.move_to(from)?;
        self.press(Button::Left)?;
        self.move_to(to)?;
        self.release(Button::Left)?;
        Ok(())
    }

    /// Scroll at the current pointer position.
    pub fn scroll(&mut self, x: f32, y: f32) -> Result<EventOutcome> {
        self.screen.scroll_event(ScrollDelta::new(x, y))
    }

    /// Send a key event.
    pub fn key(&mut self, key: KeyEvent) -> Result<EventOutcome> {
        self.screen.key_event(&key)
    }

    /// Type a string as character events.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.screen.char_event(c)?;
        }
        Ok(())
    }

    /// Lay out the whole tree.
    pub fn layout(&mut self) -> Result<()> {
        self.screen.perform_layout(&mut self.renderer)
    }

    /// Draw a fresh frame, discarding the previous one.
    pub fn draw(&mut self) -> Result<()> {
        self.renderer.clear();
        self.screen.draw_all(&mut self.renderer)
    }
}

use crate::{
    core::{
        focus::FocusManager,
        id::{IdSource, NodeId},
        node::Cursor,
        theme::Theme,
        windows::WindowManager,
        world::Core,
    },
    error::Result,
    event::{
        ScrollDelta,
        key::{KeyEvent, Mods},
        mouse::{Button, Buttons},
    },
    geom::{Expanse, Point},
    render::Renderer,
    widget::{EventOutcome, Widget},
};

/// Widget behind the root surface node. All hooks use the defaults.
pub(crate) struct RootSurface;

impl Widget for RootSurface {
    fn name(&self) -> String {
        "screen".into()
    }
}

/// The reference root surface: owns the arena and turns raw window-system
/// input into tree dispatch.
///
/// Coordinates passed to the input pump are in surface space. The screen
/// tracks the pointer, the held buttons, the modifier state, and the cursor
/// shape requested by the widget under the pointer.
pub struct Screen {
    /// The arena. Its root is the surface node.
    core: Core,
    /// Last pointer position.
    mouse_pos: Point,
    /// Buttons currently held.
    buttons: Buttons,
    /// Modifier state from the last button event.
    mods: Mods,
    /// Cursor shape currently shown.
    cursor: Cursor,
}

impl Screen {
    /// A screen of the given size.
    pub fn new(size: impl Into<Expanse>, theme: Theme) -> Self {
        Self::from_core(Core::new(size.into(), theme))
    }

    /// A screen whose nodes draw serials from `ids`.
    pub fn with_ids(size: impl Into<Expanse>, theme: Theme, ids: Box<dyn IdSource>) -> Self {
        Self::from_core(Core::with_ids(size.into(), theme, ids))
    }

    /// Wrap an existing core.
    fn from_core(core: Core) -> Self {
        Self {
            core,
            mouse_pos: Point::zero(),
            buttons: Buttons::none(),
            mods: Mods::default(),
            cursor: Cursor::default(),
        }
    }

    /// The arena.
    pub fn core(&self) -> &Core {
        &self.core
    }

    /// The arena, mutably.
    pub fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    /// The surface node.
    pub fn root(&self) -> NodeId {
        self.core.root_id()
    }

    /// Size of the surface.
    pub fn size(&self) -> Result<Expanse> {
        Ok(self.core.get(self.root())?.size())
    }

    /// Cursor shape currently shown.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Last pointer position.
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// Buttons currently held.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Widget that receives drag events, if a drag is active.
    pub fn drag_target(&self) -> Option<NodeId> {
        self.core.drag_target
    }

    /// Is input outside the top-level window on the focus path swallowed
    /// because that window is modal?
    fn blocked_by_modal(&self) -> Result<bool> {
        let path = self.core.focus_path();
        if path.len() < 2 {
            return Ok(false);
        }
        let top = path[path.len() - 2];
        let modal = self.core.window(top).is_ok_and(|w| w.modal);
        Ok(modal && !self.core.contains(top, self.mouse_pos)?)
    }

    /// Show the cursor requested by `widget`.
    fn update_cursor(&mut self, widget: Option<NodeId>) {
        if let Some(c) = widget.and_then(|w| self.core.node(w)).map(|n| n.cursor())
            && c != self.cursor
        {
            tracing::trace!("cursor {:?} -> {c:?}", self.cursor);
            self.cursor = c;
        }
    }

    /// Origin of the coordinate space a node's events are expressed in: its
    /// parent's absolute position.
    fn event_origin(&self, id: NodeId) -> Result<Point> {
        match self.core.get(id)?.parent() {
            Some(parent) => self.core.absolute_position(parent),
            None => Ok(Point::zero()),
        }
    }

    /// The drag target, if it still resolves.
    fn live_drag_target(&mut self) -> Option<NodeId> {
        let target = self.core.drag_target?;
        if self.core.is_alive(target) {
            Some(target)
        } else {
            tracing::warn!("drag target {target:?} vanished");
            self.core.drag_target = None;
            None
        }
    }

    /// The pointer moved to `p`.
    ///
    /// During a drag the motion is first offered to the drag target as a drag
    /// event; otherwise the cursor follows the widget under the pointer.
    /// Unhandled motion is then dispatched to the tree.
    pub fn cursor_pos_event(&mut self, p: impl Into<Point>) -> Result<EventOutcome> {
        let p = p.into();
        let rel = p - self.mouse_pos;
        let root = self.root();
        let mut outcome = EventOutcome::Ignore;

        match self.live_drag_target() {
            Some(target) => {
                let local = p - self.event_origin(target)?;
                outcome = self
                    .core
                    .mouse_drag_event(target, local, rel, self.buttons, self.mods)?;
            }
            None => {
                let hit = self.core.find_widget(root, p)?;
                self.update_cursor(hit);
            }
        }

        if !outcome.is_handled() {
            outcome = self
                .core
                .mouse_motion_event(root, p, rel, self.buttons, self.mods)?;
        }
        self.mouse_pos = p;
        Ok(outcome)
    }

    /// A button went down or up at the current pointer position.
    pub fn mouse_button_event(&mut self, button: Button, down: bool, mods: Mods) -> Result<EventOutcome> {
        self.mods = mods;
        if self.blocked_by_modal()? {
            tracing::trace!("button {button:?} swallowed by modal window");
            return Ok(EventOutcome::Ignore);
        }
        if down {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(button);
        }

        let root = self.root();
        let p = self.mouse_pos;
        let drop = self.core.find_widget(root, p)?;
        if !down
            && let Some(target) = self.live_drag_target()
            && drop != Some(target)
        {
            let local = p - self.event_origin(target)?;
            self.core.mouse_button_event(target, local, button, false, mods)?;
        }
        self.update_cursor(drop);

        if down && matches!(button, Button::Left | Button::Right) {
            let target = self.core.find_widget(root, p)?.filter(|t| *t != root);
            self.core.drag_target = target;
            tracing::trace!("drag target {target:?}");
            if target.is_none() {
                self.core.update_focus(None)?;
            }
        } else {
            self.core.drag_target = None;
        }

        self.core.mouse_button_event(root, p, button, down, mods)
    }

    /// A scroll at the current pointer position.
    pub fn scroll_event(&mut self, delta: ScrollDelta) -> Result<EventOutcome> {
        if self.blocked_by_modal()? {
            return Ok(EventOutcome::Ignore);
        }
        let root = self.root();
        self.core.scroll_event(root, self.mouse_pos, delta)
    }

    /// A key event, delivered to the focused leaf only.
    pub fn key_event(&mut self, key: &KeyEvent) -> Result<EventOutcome> {
        match self.core.focused_leaf() {
            Some(leaf) if self.core.is_alive(leaf) => self.core.keyboard_event(leaf, key),
            _ => Ok(EventOutcome::Ignore),
        }
    }

    /// A text character, delivered to the focused leaf only.
    pub fn char_event(&mut self, c: char) -> Result<EventOutcome> {
        match self.core.focused_leaf() {
            Some(leaf) if self.core.is_alive(leaf) => self.core.keyboard_character_event(leaf, c),
            _ => Ok(EventOutcome::Ignore),
        }
    }

    /// The surface was resized: record the size, lay out and redraw.
    pub fn resize_event(&mut self, size: impl Into<Expanse>, r: &mut dyn Renderer) -> Result<()> {
        let size = size.into();
        let root = self.root();
        self.core.get_mut(root)?.set_size(size);
        tracing::debug!("surface resized to {size:?}");
        self.perform_layout(r)?;
        self.draw_all(r)
    }

    /// Lay out the whole tree.
    pub fn perform_layout(&mut self, r: &mut dyn Renderer) -> Result<()> {
        let root = self.root();
        self.core.perform_layout(root, r)
    }

    /// Draw the whole tree.
    pub fn draw_all(&mut self, r: &mut dyn Renderer) -> Result<()> {
        let root = self.root();
        self.core.draw(root, r)
    }

    /// Move focus to `target`, or clear it.
    pub fn update_focus(&mut self, target: Option<NodeId>) -> Result<()> {
        self.core.update_focus(target)
    }

    /// Remove a window and its subtree from the surface.
    pub fn dispose_window(&mut self, window: NodeId) -> Result<()> {
        self.core.dispose_window(window)
    }

    /// Center a window on the surface.
    pub fn center_window(&mut self, window: NodeId, r: &mut dyn Renderer) -> Result<()> {
        self.core.center_window(window, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Panel, Window};

    #[test]
    fn root_is_the_surface() -> Result<()> {
        let screen = Screen::new((640, 480), Theme::default());
        let root = screen.core().get(screen.root())?;
        assert!(root.is_surface());
        assert_eq!(root.name(), "screen");
        assert_eq!(screen.size()?, Expanse::new(640, 480));
        Ok(())
    }

    #[test]
    fn press_on_empty_surface_clears_focus() -> Result<()> {
        let mut screen = Screen::new((200, 200), Theme::default());
        let root = screen.root();
        let panel = screen.core_mut().make(root, Panel::new())?;
        screen.core_mut().get_mut(panel)?.set_size((10, 10));
        screen.update_focus(Some(panel))?;
        assert_eq!(screen.core().focused_leaf(), Some(panel));

        screen.cursor_pos_event((100, 100))?;
        screen.mouse_button_event(Button::Left, true, Mods::default())?;
        assert_eq!(screen.drag_target(), None);
        assert!(!screen.core().get(panel)?.focused());
        Ok(())
    }

    #[test]
    fn modal_window_swallows_outside_presses() -> Result<()> {
        let mut screen = Screen::new((200, 200), Theme::default());
        let root = screen.root();
        let w = Window::make(screen.core_mut(), root, "modal")?;
        screen.core_mut().get_mut(w)?.set_size((50, 50));
        screen.core_mut().window_mut(w)?.modal = true;
        screen.update_focus(Some(w))?;

        screen.cursor_pos_event((150, 150))?;
        let out = screen.mouse_button_event(Button::Left, true, Mods::default())?;
        assert_eq!(out, EventOutcome::Ignore);
        assert!(screen.buttons().is_empty());
        assert_eq!(screen.core().focused_leaf(), Some(w));
        Ok(())
    }

    #[test]
    fn cursor_follows_widget() -> Result<()> {
        let mut screen = Screen::new((200, 200), Theme::default());
        let root = screen.root();
        let panel = screen.core_mut().make(root, Panel::new())?;
        let node = screen.core_mut().get_mut(panel)?;
        node.set_size((20, 20));
        node.set_cursor(Cursor::Hand);

        screen.cursor_pos_event((5, 5))?;
        assert_eq!(screen.cursor(), Cursor::Hand);
        screen.cursor_pos_event((100, 100))?;
        assert_eq!(screen.cursor(), Cursor::Arrow);
        Ok(())
    }
}

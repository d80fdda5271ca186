//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use crate::{
    Context,
    error::Result,
    event::{
        ScrollDelta,
        key::{KeyEvent, Mods},
        mouse::{Button, Buttons},
    },
    geom::{Expanse, Point},
    render::Renderer,
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was processed and propagation stops.
    Handle,
    /// The event was not handled and will be offered elsewhere.
    Ignore,
}

impl EventOutcome {
    /// Did the handler consume the event?
    pub fn is_handled(self) -> bool {
        self == Self::Handle
    }
}

impl From<bool> for EventOutcome {
    fn from(handled: bool) -> Self {
        if handled { Self::Handle } else { Self::Ignore }
    }
}

/// Widgets are the behavior attached to nodes in the Core arena.
///
/// Every hook has a default body that runs the generic node algorithm, so a
/// widget overrides only what it specializes. Hooks receive a [`Context`]
/// bound to the widget's own node; the widget itself is out of its arena slot
/// for the duration of the call.
pub trait Widget: Any {
    /// Preferred size: the layout delegate's answer, or the current size.
    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        ctx.default_preferred_size(r)
    }

    /// Position and size the children.
    fn perform_layout(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        ctx.default_perform_layout(r)
    }

    /// Paint this widget and its children. The drawing origin is the
    /// parent's origin.
    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        ctx.default_draw(r)
    }

    /// A mouse button changed state at `p` (parent coordinates).
    fn mouse_button_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        button: Button,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        ctx.default_mouse_button_event(p, button, down, mods)
    }

    /// The pointer moved to `p` (parent coordinates) by `rel`.
    fn mouse_motion_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        ctx.default_mouse_motion_event(p, rel, buttons, mods)
    }

    /// The pointer moved while this widget is the drag target.
    fn mouse_drag_event(
        &mut self,
        _ctx: &mut Context,
        _p: Point,
        _rel: Point,
        _buttons: Buttons,
        _mods: Mods,
    ) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// The pointer entered or left this widget.
    fn mouse_enter_event(&mut self, ctx: &mut Context, _p: Point, enter: bool) -> Result<EventOutcome> {
        ctx.default_mouse_enter_event(enter)
    }

    /// A scroll event at `p` (parent coordinates).
    fn scroll_event(&mut self, ctx: &mut Context, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        ctx.default_scroll_event(p, delta)
    }

    /// This widget gained or lost focus.
    fn focus_event(&mut self, ctx: &mut Context, focused: bool) -> Result<EventOutcome> {
        ctx.default_focus_event(focused)
    }

    /// A key event, delivered only to the focused widget.
    fn keyboard_event(&mut self, _ctx: &mut Context, _key: &KeyEvent) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// A text input character, delivered only to the focused widget.
    fn keyboard_character_event(&mut self, _ctx: &mut Context, _c: char) -> Result<EventOutcome> {
        Ok(EventOutcome::Ignore)
    }

    /// Recompute any placement derived from other nodes. Runs before draw.
    fn refresh_relative_placement(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Second construction phase, run once after the node is wired into its
    /// parent. The node can refer to itself as a shared entity from here on.
    fn on_associate(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Called exactly once after the node has left the arena.
    fn on_disposed(&mut self) {}

    /// Name used in logs and tree dumps.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_lowercase()
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Widget for Plain {}

    #[test]
    fn default_name_is_short_type_name() {
        assert_eq!(Plain.name(), "plain");
    }

    #[test]
    fn outcome_from_bool() {
        assert!(EventOutcome::from(true).is_handled());
        assert!(!EventOutcome::from(false).is_handled());
    }
}

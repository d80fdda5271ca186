use std::{cell::RefCell, rc::Rc};

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
    widget::{EventOutcome, Widget},
};

/// A shared, append-only record of hook invocations.
///
/// Entries have the form `name@hook` or `name@hook->outcome`.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    /// A copy of every entry so far.
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Entries that start with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of entries equal to `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// An instrumented widget.
///
/// Every hook runs the default behavior, then logs itself. A probe can be
/// told to report input events as handled, and to ask for a fixed preferred
/// size.
pub struct Probe {
    /// Name used in log entries.
    name: String,
    /// Shared log.
    log: EventLog,
    /// Report input events as handled.
    handles: bool,
    /// Preferred size override.
    preferred: Option<Expanse>,
}

impl Probe {
    /// A probe logging to `log` under `name`.
    pub fn new(name: impl Into<String>, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            handles: false,
            preferred: None,
        }
    }

    /// Report input events as handled.
    pub fn handling(mut self) -> Self {
        self.handles = true;
        self
    }

    /// Ask for a fixed preferred size.
    pub fn with_preferred_size(mut self, size: impl Into<Expanse>) -> Self {
        self.preferred = Some(size.into());
        self
    }

    /// Log an input event and settle its outcome.
    fn record(&self, hook: &str, default: EventOutcome) -> EventOutcome {
        let outcome = if self.handles {
            EventOutcome::Handle
        } else {
            default
        };
        let tag = if outcome.is_handled() { "handle" } else { "ignore" };
        self.log.push(format!("{}@{hook}->{tag}", self.name));
        outcome
    }
}

impl Widget for Probe {
    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        match self.preferred {
            Some(size) => Ok(size),
            None => ctx.default_preferred_size(r),
        }
    }

    fn perform_layout(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        self.log.push(format!("{}@layout", self.name));
        ctx.default_perform_layout(r)
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        self.log.push(format!("{}@draw", self.name));
        ctx.default_draw(r)
    }

    fn mouse_button_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        button: Button,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let out = ctx.default_mouse_button_event(p, button, down, mods)?;
        let hook = if down { "down" } else { "up" };
        Ok(self.record(hook, out))
    }

    fn mouse_motion_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let out = ctx.default_mouse_motion_event(p, rel, buttons, mods)?;
        Ok(self.record("motion", out))
    }

    fn mouse_drag_event(
        &mut self,
        _ctx: &mut Context,
        p: Point,
        rel: Point,
        _buttons: Buttons,
        _mods: Mods,
    ) -> Result<EventOutcome> {
        let hook = format!("drag({},{})+({},{})", p.x, p.y, rel.x, rel.y);
        Ok(self.record(&hook, EventOutcome::Ignore))
    }

    fn mouse_enter_event(&mut self, ctx: &mut Context, _p: Point, enter: bool) -> Result<EventOutcome> {
        ctx.default_mouse_enter_event(enter)?;
        self.log
            .push(format!("{}@{}", self.name, if enter { "enter" } else { "leave" }));
        Ok(EventOutcome::Ignore)
    }

    fn scroll_event(&mut self, ctx: &mut Context, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        let out = ctx.default_scroll_event(p, delta)?;
        Ok(self.record("scroll", out))
    }

    fn focus_event(&mut self, ctx: &mut Context, focused: bool) -> Result<EventOutcome> {
        ctx.default_focus_event(focused)?;
        self.log
            .push(format!("{}@focus({focused})", self.name));
        Ok(EventOutcome::Ignore)
    }

    fn keyboard_event(&mut self, _ctx: &mut Context, _key: &KeyEvent) -> Result<EventOutcome> {
        Ok(self.record("key", EventOutcome::Ignore))
    }

    fn keyboard_character_event(&mut self, _ctx: &mut Context, c: char) -> Result<EventOutcome> {
        Ok(self.record(&format!("char({c})"), EventOutcome::Ignore))
    }

    fn on_associate(&mut self, _ctx: &mut Context) -> Result<()> {
        self.log.push(format!("{}@associate", self.name));
        Ok(())
    }

    fn on_disposed(&mut self) {
        self.log.push(format!("{}@disposed", self.name));
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Core, theme::Theme};

    #[test]
    fn probe_logs_lifecycle() -> Result<()> {
        let log = EventLog::new();
        let mut core = Core::new(Expanse::new(10, 10), Theme::default());
        let root = core.root_id();
        let id = core.make(root, Probe::new("p", &log))?;
        assert_eq!(core.get(id)?.name(), "p");
        core.remove_subtree(id)?;
        assert_eq!(log.entries(), vec!["p@associate", "p@disposed"]);
        Ok(())
    }
}

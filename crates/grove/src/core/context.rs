use std::rc::Rc;

use crate::{
    core::{focus::FocusManager, id::NodeId, node::Node, theme::Theme, world::Core},
    error::Result,
    event::{
        ScrollDelta,
        key::Mods,
        mouse::{Button, Buttons},
    },
    geom::{Expanse, Point},
    render::Renderer,
    widget::EventOutcome,
};

/// A widget's view of the arena for the duration of one hook call.
pub struct Context<'a> {
    /// The arena.
    core: &'a mut Core,
    /// The node whose widget is executing.
    id: NodeId,
}

impl<'a> Context<'a> {
    /// Bind a context to a node.
    pub fn new(core: &'a mut Core, id: NodeId) -> Self {
        Self { core, id }
    }

    /// The node this context is bound to.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Mutable access to the whole arena.
    pub fn core(&mut self) -> &mut Core {
        &mut *self.core
    }

    /// Shared access to the whole arena.
    pub fn core_ref(&self) -> &Core {
        &*self.core
    }

    /// This node's data.
    pub fn node(&self) -> Result<&Node> {
        self.core.get(self.id)
    }

    /// This node's data, mutably.
    pub fn node_mut(&mut self) -> Result<&mut Node> {
        self.core.get_mut(self.id)
    }

    /// Is this node still in the arena?
    pub fn alive(&self) -> bool {
        self.core.node(self.id).is_some()
    }

    /// This node's theme.
    pub fn theme(&self) -> Result<Rc<Theme>> {
        Ok(self.node()?.theme())
    }

    /// Ask the root surface to focus this node.
    pub fn request_focus(&mut self) -> Result<()> {
        self.core.request_focus(self.id)
    }

    /// See [`Core::default_preferred_size`].
    pub fn default_preferred_size(&mut self, r: &mut dyn Renderer) -> Result<Expanse> {
        self.core.default_preferred_size(self.id, r)
    }

    /// See [`Core::default_perform_layout`].
    pub fn default_perform_layout(&mut self, r: &mut dyn Renderer) -> Result<()> {
        self.core.default_perform_layout(self.id, r)
    }

    /// See [`Core::default_draw`].
    pub fn default_draw(&mut self, r: &mut dyn Renderer) -> Result<()> {
        self.core.default_draw(self.id, r)
    }

    /// See [`Core::default_mouse_button_event`].
    pub fn default_mouse_button_event(
        &mut self,
        p: Point,
        button: Button,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.core
            .default_mouse_button_event(self.id, p, button, down, mods)
    }

    /// See [`Core::default_mouse_motion_event`].
    pub fn default_mouse_motion_event(
        &mut self,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.core
            .default_mouse_motion_event(self.id, p, rel, buttons, mods)
    }

    /// See [`Core::default_scroll_event`].
    pub fn default_scroll_event(&mut self, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        self.core.default_scroll_event(self.id, p, delta)
    }

    /// See [`Core::default_mouse_enter_event`].
    pub fn default_mouse_enter_event(&mut self, enter: bool) -> Result<EventOutcome> {
        self.core.default_mouse_enter_event(self.id, enter)
    }

    /// See [`Core::default_focus_event`].
    pub fn default_focus_event(&mut self, focused: bool) -> Result<EventOutcome> {
        self.core.default_focus_event(self.id, focused)
    }
}

use std::{
    any::{Any, type_name},
    collections::HashSet,
    rc::Rc,
};

use slotmap::SlotMap;

use crate::{
    core::{
        context::Context,
        focus::FocusManager,
        id::{IdSource, NodeId, SequentialIds},
        node::Node,
        screen::RootSurface,
        theme::Theme,
    },
    error::{Error, Result},
    event::{
        ScrollDelta,
        key::{KeyEvent, Mods},
        mouse::{Button, Buttons},
    },
    geom::{Expanse, Point},
    render::{PaintOp, Renderer},
    widget::{EventOutcome, Widget},
};

/// Core state for the arena, focus, and drag tracking.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root surface node.
    pub(crate) root: NodeId,
    /// Serial source for new nodes.
    ids: Box<dyn IdSource>,
    /// Theme handed to nodes created without a parent.
    theme: Rc<Theme>,
    /// Current focus path, leaf first and root last.
    pub(crate) focus_path: Vec<NodeId>,
    /// Focus change requested while widgets were in use. `Some(None)`
    /// clears focus.
    pub(crate) pending_focus: Option<Option<NodeId>>,
    /// Number of widget calls currently on the stack.
    borrow_depth: usize,
    /// Set while deferred focus is being applied.
    flushing: bool,
    /// Widget receiving drag events, chosen at button press.
    pub(crate) drag_target: Option<NodeId>,
}

impl Core {
    /// Create a core whose root surface has the given size.
    pub fn new(size: Expanse, theme: Theme) -> Self {
        Self::with_ids(size, theme, Box::new(SequentialIds::default()))
    }

    /// Create a core drawing node serials from `ids`.
    pub fn with_ids(size: Expanse, theme: Theme, mut ids: Box<dyn IdSource>) -> Self {
        let theme = Rc::new(theme);
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new(
            Box::new(RootSurface),
            ids.next_serial(),
            None,
            Rc::clone(&theme),
        );
        root.surface = true;
        root.associated = true;
        root.size = size;
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            ids,
            theme,
            focus_path: Vec::new(),
            pending_focus: None,
            borrow_depth: 0,
            flushing: false,
            drag_target: None,
        }
    }

    /// Root surface node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The theme shared by the root surface.
    pub fn theme(&self) -> Rc<Theme> {
        Rc::clone(&self.theme)
    }

    /// Number of nodes in the arena, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty apart from the root?
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Borrow a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Borrow a node, failing if it does not exist.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Borrow a node mutably, failing if it does not exist.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Does the node still exist?
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// A node's children in paint order.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(id)?.children)
    }

    /// A node's parent.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(id)?.parent)
    }

    /// Phase one of construction: put a widget in the arena with a
    /// back-reference to its intended parent and the parent's theme, without
    /// wiring it into the parent's children.
    pub fn create<W>(&mut self, parent: NodeId, widget: W) -> Result<NodeId>
    where
        W: Widget + 'static,
    {
        self.create_boxed(Some(parent), Box::new(widget))
    }

    /// Create a node with no parent. It takes the root surface's theme.
    pub fn create_detached<W>(&mut self, widget: W) -> Result<NodeId>
    where
        W: Widget + 'static,
    {
        self.create_boxed(None, Box::new(widget))
    }

    /// Boxed variant of [`Core::create`].
    pub fn create_boxed(&mut self, parent: Option<NodeId>, widget: Box<dyn Widget>) -> Result<NodeId> {
        let theme = match parent {
            Some(p) => self.get(p)?.theme(),
            None => Rc::clone(&self.theme),
        };
        let serial = self.ids.next_serial();
        let id = self.nodes.insert(Node::new(widget, serial, parent, theme));
        tracing::trace!("created {id:?} serial {serial} under {parent:?}");
        Ok(id)
    }

    /// Phase two of construction: append the node to its parent's children
    /// and run the widget's `on_associate` hook.
    pub fn associate(&mut self, id: NodeId) -> Result<()> {
        let node = self.get(id)?;
        if node.associated {
            return Err(Error::AlreadyAssociated(id));
        }
        let parent = node.parent;
        if let Some(p) = parent {
            let siblings = &self.get(p)?.children;
            if !siblings.contains(&id) {
                self.get_mut(p)?.children.push(id);
            }
        }
        self.get_mut(id)?.associated = true;
        tracing::debug!("associated {id:?} with {parent:?}");
        self.ensure_invariants();
        self.with_widget_mut(id, |w, core| w.on_associate(&mut Context::new(core, id)))
    }

    /// Both construction phases in one call.
    pub fn make<W>(&mut self, parent: NodeId, widget: W) -> Result<NodeId>
    where
        W: Widget + 'static,
    {
        let id = self.create(parent, widget)?;
        self.associate(id)?;
        Ok(id)
    }

    /// Create a window affordance: a node positioned, drawn and hit-tested by
    /// `window` itself. It points at the window as its parent but is never a
    /// member of the window's children.
    pub(crate) fn create_affordance(
        &mut self,
        window: NodeId,
        widget: Box<dyn Widget>,
    ) -> Result<NodeId> {
        let id = self.create_boxed(Some(window), widget)?;
        let node = self.get_mut(id)?;
        node.affordance_of = Some(window);
        node.associated = true;
        Ok(id)
    }

    /// Is `id` present in its parent's child sequence?
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .is_some_and(|p| p.children.contains(&id))
    }

    /// Is `ancestor` a strict ancestor of `id`?
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes.get(n).and_then(|n| n.parent);
        }
        false
    }

    /// Append a child to a parent's sequence, making it topmost.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        let node = self.get(child)?;
        if node.affordance_of.is_some() {
            return Err(Error::InvalidOperation(format!(
                "{child:?} is a window affordance"
            )));
        }
        if self.is_attached(child) {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        tracing::debug!("attached {child:?} to {parent:?}");
        self.ensure_invariants();
        Ok(())
    }

    /// Remove a node from its parent's sequence, keeping it in the arena.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        let parent = self.get(child)?.parent;
        if let Some(p) = parent
            && let Some(node) = self.nodes.get_mut(p)
        {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.nodes.get_mut(child)
            && node.affordance_of.is_none()
        {
            node.parent = None;
        }
        tracing::debug!("detached {child:?} from {parent:?}");
        self.ensure_invariants();
        Ok(())
    }

    /// Drop `child` from `parent`'s sequence, releasing it and its subtree.
    /// Does nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.get(parent)?.children.contains(&child) {
            self.remove_subtree(child)?;
        }
        Ok(())
    }

    /// Drop the child at `index`, releasing it and its subtree.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        let child = self
            .get(parent)?
            .children
            .get(index)
            .copied()
            .ok_or_else(|| {
                Error::InvalidOperation(format!("no child at index {index} of {parent:?}"))
            })?;
        self.remove_subtree(child)?;
        Ok(child)
    }

    /// Free a node, its descendants and any window affordances among them.
    ///
    /// Widgets still in their slots observe `on_disposed` immediately; widgets
    /// that are executing observe it when their call returns.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidOperation("cannot remove the root surface".into()));
        }
        let parent = self.get(id)?.parent;
        if let Some(p) = parent
            && let Some(node) = self.nodes.get_mut(p)
        {
            node.children.retain(|c| *c != id);
        }

        let doomed = self.subtree_pre_order(id);
        let gone: HashSet<NodeId> = doomed.iter().copied().collect();
        self.focus_path.retain(|n| !gone.contains(n));
        if self.pending_focus.flatten().is_some_and(|n| gone.contains(&n)) {
            self.pending_focus = None;
        }
        if self.drag_target.is_some_and(|n| gone.contains(&n)) {
            self.drag_target = None;
        }

        let mut widgets = Vec::new();
        for n in doomed.iter().rev() {
            if let Some(node) = self.nodes.remove(*n)
                && let Some(widget) = node.widget
            {
                widgets.push(widget);
            }
        }
        for node in self.nodes.values_mut() {
            if let Some(window) = node.window.as_deref_mut() {
                window.owned.retain(|o| !gone.contains(o));
            }
        }
        tracing::debug!("removed {id:?} and {} descendants", doomed.len() - 1);

        for mut widget in widgets {
            widget.on_disposed();
        }
        self.ensure_invariants();
        Ok(())
    }

    /// Collect a subtree in pre-order, including the root and affordances.
    fn subtree_pre_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            if let Some(window) = node.window.as_deref() {
                stack.extend(window.roll_button);
                stack.extend(window.close_button);
            }
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Sum of this node's position and the positions of all its ancestors.
    pub fn absolute_position(&self, id: NodeId) -> Result<Point> {
        let mut node = self.get(id)?;
        let mut pos = node.position;
        while let Some(p) = node.parent {
            let Some(parent) = self.nodes.get(p) else {
                break;
            };
            pos += parent.position;
            node = parent;
        }
        Ok(pos)
    }

    /// True if this node and every ancestor are visible.
    pub fn visible_recursive(&self, id: NodeId) -> Result<bool> {
        let mut current = Some(self.get(id)?);
        while let Some(node) = current {
            if !node.visible {
                return Ok(false);
            }
            current = node.parent.and_then(|p| self.nodes.get(p));
        }
        Ok(true)
    }

    /// The top of the node's parent chain.
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        let mut node = self.get(id)?;
        while let Some(p) = node.parent {
            let Some(parent) = self.nodes.get(p) else {
                break;
            };
            current = p;
            node = parent;
        }
        Ok(current)
    }

    /// The root surface above a node.
    pub fn surface_of(&self, id: NodeId) -> Result<NodeId> {
        let root = self.root_of(id)?;
        if self.get(root)?.surface {
            Ok(root)
        } else {
            Err(Error::NoSurface(id))
        }
    }

    /// The nearest window at or above a node.
    pub fn window_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.get(n)?;
            if node.window.is_some() {
                return Ok(n);
            }
            current = node.parent;
        }
        Err(Error::NoEnclosingWindow(id))
    }

    /// Test a point in the parent's coordinates against a node's bounds.
    pub fn contains(&self, id: NodeId, p: Point) -> Result<bool> {
        Ok(self.get(id)?.contains(p))
    }

    /// The deepest visible node under `p`, given in the coordinates of
    /// `id`'s parent. Children are tested topmost first.
    pub fn find_widget(&self, id: NodeId, p: Point) -> Result<Option<NodeId>> {
        let node = self.get(id)?;
        let local = p - node.position;
        for child in node.children.iter().rev() {
            let Some(c) = self.nodes.get(*child) else {
                continue;
            };
            if c.visible && c.contains(local) {
                return self.find_widget(*child, local);
            }
        }
        Ok(node.contains(p).then_some(id))
    }

    /// Take a widget out of its slot for a single call.
    ///
    /// If the node is freed during the call, the widget receives
    /// `on_disposed` instead of being restored. Focus requests made while any
    /// widget is out are applied once the outermost call returns.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> Result<R>,
    ) -> Result<R> {
        let mut widget = self
            .get_mut(id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(id))?;
        self.borrow_depth += 1;
        let out = f(widget.as_mut(), self);
        self.borrow_depth -= 1;
        match self.nodes.get_mut(id) {
            Some(node) => node.widget = Some(widget),
            None => widget.on_disposed(),
        }
        if self.borrow_depth == 0 && !self.flushing {
            self.flushing = true;
            let flushed = self.flush_pending_focus();
            self.flushing = false;
            let out = out?;
            flushed?;
            return Ok(out);
        }
        out
    }

    /// Is any widget currently executing?
    pub(crate) fn in_dispatch(&self) -> bool {
        self.borrow_depth > 0
    }

    /// Run a closure with mutable access to a widget of type `W`.
    pub fn with_widget<W, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut W, &mut Context) -> Result<R>,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        self.with_widget_mut(id, |widget, core| {
            let any = widget as &mut dyn Any;
            let widget = any.downcast_mut::<W>().ok_or_else(|| {
                Error::InvalidOperation(format!("{id:?} is not a {}", type_name::<W>()))
            })?;
            f(widget, &mut Context::new(core, id))
        })
    }

    /// Like [`Core::with_widget`], but returns `None` when the widget is not a
    /// `W`.
    pub fn try_with_widget<W, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut W, &mut Context) -> Result<R>,
    ) -> Result<Option<R>>
    where
        W: Widget + 'static,
    {
        self.with_widget_mut(id, |widget, core| {
            let any = widget as &mut dyn Any;
            match any.downcast_mut::<W>() {
                Some(widget) => f(widget, &mut Context::new(core, id)).map(Some),
                None => Ok(None),
            }
        })
    }

    /// Ask a node's widget for its preferred size.
    pub fn preferred_size(&mut self, id: NodeId, r: &mut dyn Renderer) -> Result<Expanse> {
        self.with_widget_mut(id, |w, core| {
            w.preferred_size(&mut Context::new(core, id), r)
        })
    }

    /// Lay out a node's children.
    pub fn perform_layout(&mut self, id: NodeId, r: &mut dyn Renderer) -> Result<()> {
        self.with_widget_mut(id, |w, core| {
            w.perform_layout(&mut Context::new(core, id), r)
        })
    }

    /// Draw a node.
    pub fn draw(&mut self, id: NodeId, r: &mut dyn Renderer) -> Result<()> {
        self.with_widget_mut(id, |w, core| w.draw(&mut Context::new(core, id), r))
    }

    /// Deliver a mouse button event to a node.
    pub fn mouse_button_event(
        &mut self,
        id: NodeId,
        p: Point,
        button: Button,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let outcome = self.with_widget_mut(id, |w, core| {
            w.mouse_button_event(&mut Context::new(core, id), p, button, down, mods)
        })?;
        tracing::trace!("button {button:?} down={down} at {p:?} on {id:?}: {outcome:?}");
        Ok(outcome)
    }

    /// Deliver a mouse motion event to a node.
    pub fn mouse_motion_event(
        &mut self,
        id: NodeId,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.mouse_motion_event(&mut Context::new(core, id), p, rel, buttons, mods)
        })
    }

    /// Deliver a drag event to a node.
    pub fn mouse_drag_event(
        &mut self,
        id: NodeId,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.mouse_drag_event(&mut Context::new(core, id), p, rel, buttons, mods)
        })
    }

    /// Tell a node the pointer entered or left it.
    pub fn mouse_enter_event(&mut self, id: NodeId, p: Point, enter: bool) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.mouse_enter_event(&mut Context::new(core, id), p, enter)
        })
    }

    /// Deliver a scroll event to a node.
    pub fn scroll_event(&mut self, id: NodeId, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.scroll_event(&mut Context::new(core, id), p, delta)
        })
    }

    /// Tell a node it gained or lost focus.
    pub fn focus_event(&mut self, id: NodeId, focused: bool) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.focus_event(&mut Context::new(core, id), focused)
        })
    }

    /// Deliver a key event to a node.
    pub fn keyboard_event(&mut self, id: NodeId, key: &KeyEvent) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.keyboard_event(&mut Context::new(core, id), key)
        })
    }

    /// Deliver a text character to a node.
    pub fn keyboard_character_event(&mut self, id: NodeId, c: char) -> Result<EventOutcome> {
        self.with_widget_mut(id, |w, core| {
            w.keyboard_character_event(&mut Context::new(core, id), c)
        })
    }

    /// Let a node recompute placement derived from other nodes.
    pub fn refresh_relative_placement(&mut self, id: NodeId) -> Result<()> {
        self.with_widget_mut(id, |w, core| {
            w.refresh_relative_placement(&mut Context::new(core, id))
        })
    }

    /// The layout delegate's preferred size, or the node's current size.
    pub fn default_preferred_size(&mut self, id: NodeId, r: &mut dyn Renderer) -> Result<Expanse> {
        let node = self.get(id)?;
        let (layout, size) = (node.layout(), node.size);
        match layout {
            Some(layout) => layout.preferred_size(self, id, r),
            None => Ok(size),
        }
    }

    /// Run the layout delegate; without one, give every child its preferred
    /// size (per-axis fixed size overrides win) and recurse.
    pub fn default_perform_layout(&mut self, id: NodeId, r: &mut dyn Renderer) -> Result<()> {
        let node = self.get(id)?;
        let (layout, children) = (node.layout(), node.children.clone());
        if let Some(layout) = layout {
            return layout.perform_layout(self, id, r);
        }
        for child in children {
            if !self.is_alive(child) {
                continue;
            }
            let pref = self.preferred_size(child, r)?;
            let node = self.get_mut(child)?;
            let fix = node.fixed_size;
            node.size = Expanse::new(
                if fix.w != 0 { fix.w } else { pref.w },
                if fix.h != 0 { fix.h } else { pref.h },
            );
            self.perform_layout(child, r)?;
        }
        Ok(())
    }

    /// Offer a button event to children topmost first. If none handles it, a
    /// primary press requests focus for this node unless it is, or is about
    /// to be, on the focus path. The event is still reported unhandled.
    pub fn default_mouse_button_event(
        &mut self,
        id: NodeId,
        p: Point,
        button: Button,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let node = self.get(id)?;
        let local = p - node.position;
        let children = node.children.clone();
        for child in children.into_iter().rev() {
            let hit = self
                .nodes
                .get(child)
                .is_some_and(|c| c.visible && c.contains(local));
            if hit
                && self
                    .mouse_button_event(child, local, button, down, mods)?
                    .is_handled()
            {
                return Ok(EventOutcome::Handle);
            }
        }
        // A deferred focus change decides which nodes will be focused.
        let focused = match self.pending_focus {
            Some(target) => target.is_some_and(|t| t == id || self.is_ancestor(id, t)),
            None => self.nodes.get(id).is_none_or(|n| n.focused),
        };
        if button.is_primary() && down && !focused {
            self.request_focus(id)?;
        }
        Ok(EventOutcome::Ignore)
    }

    /// Update enter/leave state on every visible child, then offer the motion
    /// to children that contain the pointer now or did before the move.
    pub fn default_mouse_motion_event(
        &mut self,
        id: NodeId,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let node = self.get(id)?;
        let local = p - node.position;
        let children = node.children.clone();
        for child in children.into_iter().rev() {
            let Some(c) = self.nodes.get(child) else {
                continue;
            };
            if !c.visible {
                continue;
            }
            let contained = c.contains(local);
            let prev_contained = c.contains(local - rel);
            if contained != prev_contained {
                self.mouse_enter_event(child, p, contained)?;
            }
            if (contained || prev_contained)
                && self.is_alive(child)
                && self
                    .mouse_motion_event(child, local, rel, buttons, mods)?
                    .is_handled()
            {
                return Ok(EventOutcome::Handle);
            }
        }
        Ok(EventOutcome::Ignore)
    }

    /// Offer a scroll event to the topmost visible child under the pointer.
    pub fn default_scroll_event(
        &mut self,
        id: NodeId,
        p: Point,
        delta: ScrollDelta,
    ) -> Result<EventOutcome> {
        let node = self.get(id)?;
        let local = p - node.position;
        let children = node.children.clone();
        for child in children.into_iter().rev() {
            let hit = self
                .nodes
                .get(child)
                .is_some_and(|c| c.visible && c.contains(local));
            if hit && self.scroll_event(child, local, delta)?.is_handled() {
                return Ok(EventOutcome::Handle);
            }
        }
        Ok(EventOutcome::Ignore)
    }

    /// Record the hover flag.
    pub fn default_mouse_enter_event(&mut self, id: NodeId, enter: bool) -> Result<EventOutcome> {
        self.get_mut(id)?.hovered = enter;
        Ok(EventOutcome::Ignore)
    }

    /// Record the focus flag.
    pub fn default_focus_event(&mut self, id: NodeId, focused: bool) -> Result<EventOutcome> {
        self.get_mut(id)?.focused = focused;
        Ok(EventOutcome::Ignore)
    }

    /// Draw visible children in sequence order, translated to this node's
    /// origin.
    pub fn default_draw(&mut self, id: NodeId, r: &mut dyn Renderer) -> Result<()> {
        let node = self.get(id)?;
        if node.children.is_empty() {
            return Ok(());
        }
        let pos = node.position;
        let children = node.children.clone();
        r.paint(PaintOp::Translate(pos));
        for child in children {
            if self.nodes.get(child).is_some_and(|c| c.visible) {
                self.draw(child, r)?;
            }
        }
        r.paint(PaintOp::Translate(-pos));
        Ok(())
    }

    /// Check tree invariants after a structural change.
    fn ensure_invariants(&self) {
        self.debug_assert_tree_invariants();
    }

    /// Assert structural invariants on the node tree in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_tree_invariants(&self) {
        debug_assert!(self.nodes.contains_key(self.root), "root node missing");
        if let Some(root) = self.nodes.get(self.root) {
            debug_assert!(root.parent.is_none(), "root has parent");
        }
        for (id, node) in self.nodes.iter() {
            self.debug_assert_node_links(id, node);
            self.debug_assert_no_cycle(id);
        }
        for id in &self.focus_path {
            debug_assert!(
                self.nodes.contains_key(*id),
                "focus path holds missing node {id:?}"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_assert_tree_invariants(&self) {}

    /// Assert parent/child link invariants for a specific node in debug builds.
    #[cfg(debug_assertions)]
    fn debug_assert_node_links(&self, id: NodeId, node: &Node) {
        let mut seen = HashSet::with_capacity(node.children.len());
        for child in &node.children {
            debug_assert!(
                seen.insert(*child),
                "duplicate child {child:?} under {id:?}"
            );
            let child_node = self.nodes.get(*child);
            debug_assert!(child_node.is_some(), "child {child:?} missing");
            if let Some(child_node) = child_node {
                debug_assert!(
                    child_node.parent == Some(id),
                    "child {child:?} parent mismatch under {id:?}"
                );
                debug_assert!(
                    child_node.affordance_of.is_none(),
                    "affordance {child:?} in child sequence of {id:?}"
                );
            }
        }

        // Pending nodes and affordances hold a back-reference without being
        // in the parent's sequence.
        if let Some(parent) = node.parent
            && let Some(parent_node) = self.nodes.get(parent)
            && node.associated
            && node.affordance_of.is_none()
        {
            debug_assert!(
                parent_node.children.contains(&id),
                "parent {parent:?} missing child {id:?}"
            );
        }
    }

    /// Assert that the parent chain for a node contains no cycles.
    #[cfg(debug_assertions)]
    fn debug_assert_no_cycle(&self, start: NodeId) {
        debug_assert!(
            !self.parent_chain_has_cycle(start),
            "cycle detected from {start:?}"
        );
    }

    /// Return true if a node's parent chain contains a cycle.
    #[cfg(debug_assertions)]
    fn parent_chain_has_cycle(&self, start: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }
}

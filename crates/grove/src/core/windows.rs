//! Window and popup state, and the surface operations that act on windows.

use crate::{
    core::{id::NodeId, world::Core},
    error::{Error, Result},
    geom::Point,
    render::Renderer,
};

/// Decides whether a window may close. Returning `false` vetoes the close.
pub type CloseCallback = Box<dyn FnMut(&mut Core, NodeId) -> Result<bool>>;

/// Decides whether a window may change its rolled state to the given value.
pub type RollCallback = Box<dyn FnMut(&mut Core, NodeId, bool) -> Result<bool>>;

/// Popup component: the owner relation and anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    /// Window this popup is anchored to. Not necessarily its parent.
    pub(crate) owner: NodeId,
    /// Anchor offset from the owner's position.
    pub anchor: Point,
    /// Height of the anchor stem.
    pub anchor_height: i32,
}

impl PopupState {
    /// State for a popup anchored to `owner`.
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            anchor: Point::zero(),
            anchor_height: 30,
        }
    }

    /// The owner window.
    pub fn owner(&self) -> NodeId {
        self.owner
    }
}

/// Window component carried by window and popup nodes.
pub struct WindowState {
    /// Title text.
    pub title: String,
    /// Modal windows swallow input outside their bounds.
    pub modal: bool,
    /// Is the close affordance active?
    pub closeable: bool,
    /// Is the roll affordance active?
    pub rollable: bool,
    /// Rolled (header only) state.
    pub(crate) rolled: bool,
    /// Close affordance.
    pub(crate) close_button: Option<NodeId>,
    /// Roll affordance.
    pub(crate) roll_button: Option<NodeId>,
    /// Windows disposed along with this one, in insertion order.
    pub(crate) owned: Vec<NodeId>,
    /// Close approval hook.
    pub(crate) close_callback: Option<CloseCallback>,
    /// Roll approval hook.
    pub(crate) roll_callback: Option<RollCallback>,
    /// Popup component.
    pub(crate) popup: Option<PopupState>,
}

impl WindowState {
    /// A closeable, rollable window with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            modal: false,
            closeable: true,
            rollable: true,
            rolled: false,
            close_button: None,
            roll_button: None,
            owned: Vec::new(),
            close_callback: None,
            roll_callback: None,
            popup: None,
        }
    }

    /// Popup state: untitled, without affordances.
    pub fn popup(owner: NodeId) -> Self {
        Self {
            closeable: false,
            rollable: false,
            popup: Some(PopupState::new(owner)),
            ..Self::new("")
        }
    }

    /// Is the window rolled up to its header?
    pub fn rolled(&self) -> bool {
        self.rolled
    }

    /// Close affordance node.
    pub fn close_button(&self) -> Option<NodeId> {
        self.close_button
    }

    /// Roll affordance node.
    pub fn roll_button(&self) -> Option<NodeId> {
        self.roll_button
    }

    /// Windows owned by this one.
    pub fn owned(&self) -> &[NodeId] {
        &self.owned
    }

    /// Popup component, if this is a popup.
    pub fn popup_state(&self) -> Option<&PopupState> {
        self.popup.as_ref()
    }

    /// Mutable popup component.
    pub fn popup_state_mut(&mut self) -> Option<&mut PopupState> {
        self.popup.as_mut()
    }

    /// Install the close approval hook.
    pub fn set_close_callback(
        &mut self,
        f: impl FnMut(&mut Core, NodeId) -> Result<bool> + 'static,
    ) {
        self.close_callback = Some(Box::new(f));
    }

    /// Install the roll approval hook.
    pub fn set_roll_callback(
        &mut self,
        f: impl FnMut(&mut Core, NodeId, bool) -> Result<bool> + 'static,
    ) {
        self.roll_callback = Some(Box::new(f));
    }
}

/// Window management on the arena: ownership, disposal, placement, z-order.
pub trait WindowManager {
    /// Window state of a node.
    fn window(&self, id: NodeId) -> Result<&WindowState>;

    /// Mutable window state of a node.
    fn window_mut(&mut self, id: NodeId) -> Result<&mut WindowState>;

    /// Popup state of a node.
    fn popup(&self, id: NodeId) -> Result<&PopupState>;

    /// Mutable popup state of a node.
    fn popup_mut(&mut self, id: NodeId) -> Result<&mut PopupState>;

    /// Dispose a window: popups leave their owner's set and their parent,
    /// owned windows are disposed from a snapshot of the set, then the root
    /// surface releases the window.
    fn dispose(&mut self, window: NodeId) -> Result<()>;

    /// Ask the root surface to center a window.
    fn center(&mut self, window: NodeId, r: &mut dyn Renderer) -> Result<()>;

    /// Surface operation: drop focus and drag state that involve the window,
    /// then free it and its subtree.
    fn dispose_window(&mut self, window: NodeId) -> Result<()>;

    /// Surface operation: size a zero-sized window to its preferred size, then
    /// place it in the middle of the surface.
    fn center_window(&mut self, window: NodeId, r: &mut dyn Renderer) -> Result<()>;

    /// Surface operation: make a window topmost among its siblings, then raise
    /// every popup it owns above it.
    fn move_window_to_front(&mut self, window: NodeId) -> Result<()>;

    /// Add a window to an owner's set. Adding twice is a no-op.
    fn add_owned_window(&mut self, owner: NodeId, window: NodeId) -> Result<()>;

    /// Remove a window from an owner's set.
    fn remove_owned_window(&mut self, owner: NodeId, window: NodeId) -> Result<()>;

    /// The windows an owner will dispose along with itself.
    fn owned_windows(&self, owner: NodeId) -> Result<&[NodeId]>;

    /// Request a change of rolled state through the roll callback. Returns
    /// whether the change was approved.
    fn set_rolled(&mut self, window: NodeId, rolled: bool) -> Result<bool>;

    /// Request a close through the close callback, disposing the window if
    /// approved. Returns whether it was approved.
    fn request_close(&mut self, window: NodeId) -> Result<bool>;

    /// Recompute a popup's placement from its owner: refresh the owner first,
    /// gate visibility on the owner's recursive visibility, then position the
    /// popup at `owner.position + anchor - (0, anchor_height)`.
    fn place_popup(&mut self, popup: NodeId) -> Result<()>;
}

/// Dispose a window after the windows it owns. Owned windows go first, so a
/// popup parented under another popup is still attached when disposed.
fn dispose_cascade(core: &mut Core, window: NodeId) -> Result<()> {
    let owner = core.window(window)?.popup.as_ref().map(|p| p.owner);
    if let Some(owner) = owner
        && core.is_alive(owner)
    {
        core.remove_owned_window(owner, window)?;
    }

    let owned = core.window(window)?.owned.clone();
    for w in owned {
        if core.is_alive(w) {
            dispose_cascade(core, w)?;
        }
    }
    if !core.is_alive(window) {
        return Ok(());
    }
    core.window_mut(window)?.owned.clear();
    if owner.is_some() {
        core.detach(window)?;
    }
    tracing::debug!("disposing window {window:?}");
    core.dispose_window(window)
}

impl WindowManager for Core {
    fn window(&self, id: NodeId) -> Result<&WindowState> {
        self.get(id)?
            .window_state()
            .ok_or(Error::NotAWindow(id))
    }

    fn window_mut(&mut self, id: NodeId) -> Result<&mut WindowState> {
        self.get_mut(id)?
            .window_state_mut()
            .ok_or(Error::NotAWindow(id))
    }

    fn popup(&self, id: NodeId) -> Result<&PopupState> {
        self.window(id)
            .ok()
            .and_then(|w| w.popup.as_ref())
            .ok_or(Error::NotAPopup(id))
    }

    fn popup_mut(&mut self, id: NodeId) -> Result<&mut PopupState> {
        self.get_mut(id)?
            .window_state_mut()
            .and_then(|w| w.popup.as_mut())
            .ok_or(Error::NotAPopup(id))
    }

    fn dispose(&mut self, window: NodeId) -> Result<()> {
        // Checked once, before anything leaves the tree.
        self.surface_of(window)?;
        self.window(window)?;
        dispose_cascade(self, window)
    }

    fn center(&mut self, window: NodeId, r: &mut dyn Renderer) -> Result<()> {
        self.surface_of(window)?;
        self.center_window(window, r)
    }

    fn dispose_window(&mut self, window: NodeId) -> Result<()> {
        self.window(window)?;
        if self.focus_path.contains(&window) {
            self.focus_path.clear();
        }
        if self
            .drag_target
            .is_some_and(|d| d == window || self.is_ancestor(window, d))
        {
            self.drag_target = None;
        }
        self.remove_subtree(window)
    }

    fn center_window(&mut self, window: NodeId, r: &mut dyn Renderer) -> Result<()> {
        let surface = self.surface_of(window)?;
        self.window(window)?;
        if self.get(window)?.size().is_zero() {
            let size = self.preferred_size(window, r)?;
            self.get_mut(window)?.set_size(size);
            self.perform_layout(window, r)?;
        }
        let surface = self.get(surface)?.size().to_point();
        let size = self.get(window)?.size().to_point();
        let pos = Point::new((surface.x - size.x) / 2, (surface.y - size.y) / 2);
        self.get_mut(window)?.set_position(pos);
        tracing::debug!("centered window {window:?} at {pos:?}");
        Ok(())
    }

    fn move_window_to_front(&mut self, window: NodeId) -> Result<()> {
        self.window(window)?;
        if !self.is_attached(window) {
            return Ok(());
        }
        let Some(parent) = self.get(window)?.parent() else {
            return Ok(());
        };
        let siblings = &mut self.get_mut(parent)?.children;
        siblings.retain(|c| *c != window);
        siblings.push(window);
        tracing::debug!("raised window {window:?}");

        loop {
            let siblings = self.children(parent)?;
            let base = siblings.iter().position(|c| *c == window).unwrap_or(0);
            let below = siblings[..base].iter().copied().find(|c| {
                self.popup(*c).is_ok_and(|p| p.owner == window)
            });
            match below {
                Some(popup) => self.move_window_to_front(popup)?,
                None => break,
            }
        }
        Ok(())
    }

    fn add_owned_window(&mut self, owner: NodeId, window: NodeId) -> Result<()> {
        self.window(window)?;
        let owned = &mut self.window_mut(owner)?.owned;
        if !owned.contains(&window) {
            owned.push(window);
        }
        Ok(())
    }

    fn remove_owned_window(&mut self, owner: NodeId, window: NodeId) -> Result<()> {
        self.window_mut(owner)?.owned.retain(|w| *w != window);
        Ok(())
    }

    fn owned_windows(&self, owner: NodeId) -> Result<&[NodeId]> {
        Ok(&self.window(owner)?.owned)
    }

    fn set_rolled(&mut self, window: NodeId, rolled: bool) -> Result<bool> {
        let callback = self.window_mut(window)?.roll_callback.take();
        let approved = match callback {
            Some(mut cb) => {
                let approved = cb(self, window, rolled);
                if let Ok(state) = self.window_mut(window)
                    && state.roll_callback.is_none()
                {
                    state.roll_callback = Some(cb);
                }
                approved?
            }
            None => true,
        };
        if approved && let Ok(state) = self.window_mut(window) {
            state.rolled = rolled;
            tracing::debug!("window {window:?} rolled={rolled}");
        }
        Ok(approved)
    }

    fn request_close(&mut self, window: NodeId) -> Result<bool> {
        let callback = self.window_mut(window)?.close_callback.take();
        let approved = match callback {
            Some(mut cb) => {
                let approved = cb(self, window);
                if let Ok(state) = self.window_mut(window)
                    && state.close_callback.is_none()
                {
                    state.close_callback = Some(cb);
                }
                approved?
            }
            None => true,
        };
        if approved && self.is_alive(window) {
            self.dispose(window)?;
        }
        Ok(approved)
    }

    fn place_popup(&mut self, popup: NodeId) -> Result<()> {
        let state = self.popup(popup)?;
        let (owner, anchor, anchor_height) = (state.owner, state.anchor, state.anchor_height);
        let owner_node = self.node(owner).ok_or(Error::OwnerMissing(popup))?;
        if owner_node.in_use() {
            tracing::trace!("owner {owner:?} of {popup:?} is executing; not refreshed");
        } else {
            self.refresh_relative_placement(owner)?;
        }
        let owner_visible = self.visible_recursive(owner)?;
        let owner_pos = self.get(owner)?.position();
        let node = self.get_mut(popup)?;
        node.visible &= owner_visible;
        node.position = owner_pos + anchor - Point::new(0, anchor_height);
        Ok(())
    }
}

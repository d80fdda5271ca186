use std::mem;

use crate::{
    core::{id::NodeId, windows::WindowManager, world::Core},
    error::Result,
};

/// Trait for managing the focus path.
///
/// The focus path runs from the focused leaf up to the root surface. Every
/// node on it has its focus flag set.
pub trait FocusManager {
    /// Ask the root surface above `node` to focus it.
    fn request_focus(&mut self, node: NodeId) -> Result<()>;

    /// Move focus to `target`, or clear it.
    ///
    /// Nodes on the old path that are still focused receive
    /// `focus_event(false)`. The new path receives `focus_event(true)` from the
    /// root down. The outermost window on the new path is raised together with
    /// the popups it owns. Called while widgets are executing, the change is
    /// applied when the outermost call returns.
    fn update_focus(&mut self, target: Option<NodeId>) -> Result<()>;

    /// The current focus path, leaf first.
    fn focus_path(&self) -> &[NodeId];

    /// The focused leaf, if any.
    fn focused_leaf(&self) -> Option<NodeId>;

    /// Is the node on the focus path?
    fn is_on_focus_path(&self, node: NodeId) -> bool;

    /// Apply a focus change that was deferred during dispatch.
    fn flush_pending_focus(&mut self) -> Result<()>;
}

impl FocusManager for Core {
    fn request_focus(&mut self, node: NodeId) -> Result<()> {
        self.surface_of(node)?;
        self.update_focus(Some(node))
    }

    fn update_focus(&mut self, target: Option<NodeId>) -> Result<()> {
        if self.in_dispatch() {
            tracing::trace!("deferring focus change to {target:?}");
            self.pending_focus = Some(target);
            return Ok(());
        }
        if let Some(t) = target {
            self.surface_of(t)?;
        }

        for id in mem::take(&mut self.focus_path) {
            if self.node(id).is_some_and(|n| n.focused()) {
                self.focus_event(id, false)?;
            }
        }

        let mut path = Vec::new();
        let mut window = None;
        let mut current = target;
        while let Some(id) = current {
            let node = self.get(id)?;
            path.push(id);
            if node.is_window() {
                window = Some(id);
            }
            current = node.parent();
        }
        self.focus_path.clone_from(&path);
        for id in path.iter().rev() {
            if self.is_alive(*id) {
                self.focus_event(*id, true)?;
            }
        }
        tracing::debug!("focus moved to {target:?}");

        if let Some(w) = window
            && self.is_alive(w)
        {
            self.move_window_to_front(w)?;
        }
        Ok(())
    }

    fn focus_path(&self) -> &[NodeId] {
        &self.focus_path
    }

    fn focused_leaf(&self) -> Option<NodeId> {
        self.focus_path.first().copied()
    }

    fn is_on_focus_path(&self, node: NodeId) -> bool {
        self.focus_path.contains(&node)
    }

    fn flush_pending_focus(&mut self) -> Result<()> {
        match self.pending_focus.take() {
            Some(target) => self.update_focus(target),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        geom::Expanse,
        theme::Theme,
        widgets::{Panel, Window},
    };

    #[test]
    fn path_runs_leaf_to_root() -> Result<()> {
        let mut core = Core::new(Expanse::new(100, 100), Theme::default());
        let root = core.root_id();
        let a = core.make(root, Panel::new())?;
        let b = core.make(a, Panel::new())?;

        core.request_focus(b)?;
        assert_eq!(core.focus_path(), &[b, a, root]);
        assert_eq!(core.focused_leaf(), Some(b));
        assert!(core.get(a)?.focused());

        core.update_focus(None)?;
        assert!(core.focus_path().is_empty());
        assert!(!core.get(b)?.focused());
        assert!(!core.get(root)?.focused());
        Ok(())
    }

    #[test]
    fn focus_raises_outermost_window() -> Result<()> {
        let mut core = Core::new(Expanse::new(100, 100), Theme::default());
        let root = core.root_id();
        let w1 = Window::make(&mut core, root, "one")?;
        let w2 = Window::make(&mut core, root, "two")?;
        let leaf = core.make(w1, Panel::new())?;
        assert_eq!(core.children(root)?, &[w1, w2]);

        core.request_focus(leaf)?;
        assert_eq!(core.children(root)?, &[w2, w1]);
        Ok(())
    }

    #[test]
    fn detached_nodes_cannot_take_focus() -> Result<()> {
        let mut core = Core::new(Expanse::new(100, 100), Theme::default());
        let loose = core.create_detached(Panel::new())?;
        core.associate(loose)?;
        assert_eq!(core.request_focus(loose), Err(Error::NoSurface(loose)));
        Ok(())
    }
}

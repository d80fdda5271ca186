//! Layout strategies.
//!
//! A [`Layout`] is attached to a node and negotiates sizes for it: it reports
//! the node's preferred size and positions the node's children. Strategies
//! hold no per-node state, so one instance may be shared by many nodes.

use crate::{
    core::{Core, NodeId},
    error::Result,
    geom::{Expanse, Point},
    render::Renderer,
};

/// A pluggable size negotiation strategy.
///
/// `preferred_size` must not assign sizes to children; only `perform_layout`
/// mutates them.
pub trait Layout {
    /// Compute the preferred size of `node`.
    fn preferred_size(&self, core: &mut Core, node: NodeId, r: &mut dyn Renderer) -> Result<Expanse>;

    /// Position and size the children of `node`.
    fn perform_layout(&self, core: &mut Core, node: NodeId, r: &mut dyn Renderer) -> Result<()>;
}

/// Stacking direction of a [`BoxLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Children are placed left to right.
    #[default]
    Horizontal,
    /// Children are placed top to bottom.
    Vertical,
}

/// Cross-axis placement of children in a [`BoxLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Flush with the start edge.
    Minimum,
    /// Centered.
    #[default]
    Middle,
    /// Flush with the end edge.
    Maximum,
    /// Stretched to the container.
    Fill,
}

/// Stacks visible children along one axis.
///
/// Inside a titled window the header band is kept clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxLayout {
    /// Main axis.
    pub orientation: Orientation,
    /// Cross-axis alignment.
    pub alignment: Alignment,
    /// Space around the children.
    pub margin: i32,
    /// Space between children.
    pub spacing: i32,
}

impl BoxLayout {
    /// A layout with no margin or spacing.
    pub fn new(orientation: Orientation, alignment: Alignment) -> Self {
        Self {
            orientation,
            alignment,
            margin: 0,
            spacing: 0,
        }
    }

    /// Set the margin.
    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the spacing.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Index of the main axis in `[x, y]`.
    fn axis(&self) -> usize {
        match self.orientation {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }

    /// Header height to keep clear, if `node` is a titled window.
    fn header(core: &Core, node: NodeId) -> Result<Option<i32>> {
        let n = core.get(node)?;
        Ok(n
            .window_state()
            .filter(|w| !w.title.is_empty())
            .map(|_| to_i32(n.theme().window_header_height)))
    }

    /// Visible children with the size each one asks for: its preferred size,
    /// overridden per axis by a nonzero fixed size.
    fn targets(core: &mut Core, node: NodeId, r: &mut dyn Renderer) -> Result<Vec<Target>> {
        let children = core.children(node)?.to_vec();
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            if !core.get(child)?.visible() {
                continue;
            }
            let pref = core.preferred_size(child, r)?;
            let fix = core.get(child)?.fixed_size();
            let target = [
                if fix.w != 0 { fix.w } else { pref.w },
                if fix.h != 0 { fix.h } else { pref.h },
            ];
            out.push(Target {
                id: child,
                size: [to_i32(target[0]), to_i32(target[1])],
                fixed: [fix.w, fix.h],
            });
        }
        Ok(out)
    }
}

/// A child and the size it asks for.
struct Target {
    /// Child node.
    id: NodeId,
    /// Requested size as `[w, h]`.
    size: [i32; 2],
    /// Fixed size override as `[w, h]`.
    fixed: [u32; 2],
}

/// Saturating conversion of a size component.
fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Clamp a computed component to a size.
fn to_u32(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

impl Layout for BoxLayout {
    fn preferred_size(&self, core: &mut Core, node: NodeId, r: &mut dyn Renderer) -> Result<Expanse> {
        let (a1, a2) = (self.axis(), 1 - self.axis());
        let edge = self.margin.saturating_mul(2);
        let mut size = [edge, edge];
        let mut y_offset = 0;
        if let Some(header) = Self::header(core, node)? {
            match self.orientation {
                Orientation::Vertical => {
                    size[1] = size[1].saturating_add(header.saturating_sub(self.margin / 2));
                }
                Orientation::Horizontal => y_offset = header,
            }
        }

        for (i, t) in Self::targets(core, node, r)?.into_iter().enumerate() {
            if i > 0 {
                size[a1] = size[a1].saturating_add(self.spacing);
            }
            size[a1] = size[a1].saturating_add(t.size[a1]);
            size[a2] = size[a2].max(t.size[a2].saturating_add(edge));
        }
        Ok(Expanse::new(to_u32(size[0]), to_u32(size[1].saturating_add(y_offset))))
    }

    fn perform_layout(&self, core: &mut Core, node: NodeId, r: &mut dyn Renderer) -> Result<()> {
        let (a1, a2) = (self.axis(), 1 - self.axis());
        let n = core.get(node)?;
        let fixed = n.fixed_size();
        let mut container = [
            to_i32(if fixed.w != 0 { fixed.w } else { n.width() }),
            to_i32(if fixed.h != 0 { fixed.h } else { n.height() }),
        ];
        let mut position = self.margin;
        let mut y_offset = 0;
        if let Some(header) = Self::header(core, node)? {
            match self.orientation {
                Orientation::Vertical => {
                    position = position.saturating_add(header.saturating_sub(self.margin / 2));
                }
                Orientation::Horizontal => {
                    y_offset = header;
                    container[1] = container[1].saturating_sub(y_offset);
                }
            }
        }

        let edge = self.margin.saturating_mul(2);
        for (i, t) in Self::targets(core, node, r)?.into_iter().enumerate() {
            let (child, mut target, fix) = (t.id, t.size, t.fixed);
            if i > 0 {
                position = position.saturating_add(self.spacing);
            }
            let mut pos = [0, y_offset];
            pos[a1] = position;
            match self.alignment {
                Alignment::Minimum => pos[a2] = pos[a2].saturating_add(self.margin),
                Alignment::Middle => {
                    pos[a2] = pos[a2].saturating_add(container[a2].saturating_sub(target[a2]) / 2);
                }
                Alignment::Maximum => {
                    let room = container[a2].saturating_sub(target[a2]).saturating_sub(edge);
                    pos[a2] = pos[a2].saturating_add(room);
                }
                Alignment::Fill => {
                    pos[a2] = pos[a2].saturating_add(self.margin);
                    target[a2] = if fix[a2] != 0 {
                        to_i32(fix[a2])
                    } else {
                        container[a2].saturating_sub(edge)
                    };
                }
            }
            let c = core.get_mut(child)?;
            c.set_position(Point::new(pos[0], pos[1]));
            c.set_size(Expanse::new(to_u32(target[0]), to_u32(target[1])));
            core.perform_layout(child, r)?;
            position = position.saturating_add(target[a1]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{testing::RecordingRenderer, theme::Theme, widgets::Panel};

    fn fixed_child(core: &mut Core, parent: NodeId, w: u32, h: u32) -> Result<NodeId> {
        let id = core.make(parent, Panel::new())?;
        core.get_mut(id)?.set_fixed_size((w, h));
        Ok(id)
    }

    #[test]
    fn vertical_stack() -> Result<()> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let parent = core.make(root, Panel::new())?;
        let layout = BoxLayout::new(Orientation::Vertical, Alignment::Minimum)
            .with_margin(5)
            .with_spacing(2);
        core.get_mut(parent)?.set_layout(Some(Rc::new(layout)));
        let a = fixed_child(&mut core, parent, 30, 10)?;
        let b = fixed_child(&mut core, parent, 50, 20)?;

        let mut r = RecordingRenderer::new();
        let pref = core.preferred_size(parent, &mut r)?;
        assert_eq!(pref, Expanse::new(60, 42));

        core.get_mut(parent)?.set_size(pref);
        core.perform_layout(parent, &mut r)?;
        assert_eq!(core.get(a)?.position(), Point::new(5, 5));
        assert_eq!(core.get(b)?.position(), Point::new(5, 17));
        assert_eq!(core.get(b)?.size(), Expanse::new(50, 20));
        Ok(())
    }

    #[test]
    fn fill_stretches_cross_axis() -> Result<()> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let parent = core.make(root, Panel::new())?;
        core.get_mut(parent)?
            .set_layout(Some(Rc::new(BoxLayout::new(Orientation::Horizontal, Alignment::Fill))));
        core.get_mut(parent)?.set_size((100, 80));
        let a = fixed_child(&mut core, parent, 30, 0)?;

        let mut r = RecordingRenderer::new();
        core.perform_layout(parent, &mut r)?;
        assert_eq!(core.get(a)?.size(), Expanse::new(30, 80));
        Ok(())
    }

    #[test]
    fn oversized_children_saturate() -> Result<()> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let parent = core.make(root, Panel::new())?;
        let layout = BoxLayout::new(Orientation::Horizontal, Alignment::Middle)
            .with_margin(3)
            .with_spacing(2);
        core.get_mut(parent)?.set_layout(Some(Rc::new(layout)));
        fixed_child(&mut core, parent, u32::MAX, 10)?;
        let b = fixed_child(&mut core, parent, u32::MAX, 10)?;

        let mut r = RecordingRenderer::new();
        let pref = core.preferred_size(parent, &mut r)?;
        assert_eq!(pref, Expanse::new(i32::MAX as u32, 16));

        core.get_mut(parent)?.set_size(pref);
        core.perform_layout(parent, &mut r)?;
        assert_eq!(core.get(b)?.position(), Point::new(i32::MAX, 3));
        Ok(())
    }

    #[test]
    fn hidden_children_are_skipped() -> Result<()> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let parent = core.make(root, Panel::new())?;
        core.get_mut(parent)?
            .set_layout(Some(Rc::new(BoxLayout::new(Orientation::Horizontal, Alignment::Minimum))));
        fixed_child(&mut core, parent, 30, 10)?;
        let hidden = fixed_child(&mut core, parent, 40, 10)?;
        core.get_mut(hidden)?.set_visible(false);

        let mut r = RecordingRenderer::new();
        assert_eq!(core.preferred_size(parent, &mut r)?, Expanse::new(30, 10));
        Ok(())
    }
}

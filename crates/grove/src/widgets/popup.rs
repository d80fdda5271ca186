use crate::{
    Context, Core, NodeId, WindowManager, WindowState,
    error::Result,
    event::{
        ScrollDelta,
        key::Mods,
        mouse::{Button as MouseButton, Buttons},
    },
    geom::{Expanse, Point, Rect},
    render::{PaintOp, RectF, Renderer, RendererExt},
    widget::{EventOutcome, Widget},
    widgets::Window,
};

/// A window anchored to an owner window and drawn with a pointing stem.
///
/// Popups follow their owner: every draw recomputes the position from the
/// owner's position and the anchor, and a popup is hidden whenever its owner
/// is. A popup is disposed with its owner.
#[derive(Debug, Default)]
pub struct Popup {
    /// Window behavior shared with top-level windows.
    window: Window,
}

impl Popup {
    /// Construct the widget. Use [`Popup::create`] or [`Popup::make`].
    pub fn new() -> Self {
        Self {
            window: Window::new(),
        }
    }

    /// Phase one: create a popup under `parent`, anchored to the window
    /// `owner`. The owner is usually not the parent: popups are placed on the
    /// surface so that they draw above their owner.
    pub fn create(core: &mut Core, parent: NodeId, owner: NodeId) -> Result<NodeId> {
        core.window(owner)?;
        let id = core.create(parent, Self::new())?;
        core.get_mut(id)?.window = Some(Box::new(WindowState::popup(owner)));
        Ok(id)
    }

    /// Create and associate a popup.
    pub fn make(core: &mut Core, parent: NodeId, owner: NodeId) -> Result<NodeId> {
        let id = Self::create(core, parent, owner)?;
        core.associate(id)?;
        Ok(id)
    }
}

impl Widget for Popup {
    fn on_associate(&mut self, ctx: &mut Context) -> Result<()> {
        Window::build_affordances(ctx)?;
        let id = ctx.id();
        let core = ctx.core();
        let owner = core.popup(id)?.owner();
        if core.is_alive(owner) {
            core.add_owned_window(owner, id)?;
        }
        Ok(())
    }

    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        self.window.preferred_size(ctx, r)
    }

    fn perform_layout(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let node = ctx.node()?;
        let only = match node.children() {
            [child] if node.layout().is_none() => Some(*child),
            _ => None,
        };
        let Some(child) = only else {
            return ctx.default_perform_layout(r);
        };
        let size = node.size();
        let core = ctx.core();
        let c = core.get_mut(child)?;
        c.set_position(Point::zero());
        c.set_size(size);
        core.perform_layout(child, r)
    }

    fn refresh_relative_placement(&mut self, ctx: &mut Context) -> Result<()> {
        let id = ctx.id();
        ctx.core().place_popup(id)
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        self.refresh_relative_placement(ctx)?;
        let node = ctx.node()?;
        if !node.visible() {
            return Ok(());
        }
        let theme = node.theme();
        let ah = ctx.core_ref().popup(ctx.id())?.anchor_height as f32;
        let Rect { tl, w, h } = node.rect();
        let rect = RectF::new(tl.x as f32, tl.y as f32, w as f32, h as f32);
        let cr = theme.window_corner_radius as f32;

        r.drop_shadow(
            rect,
            cr,
            theme.window_drop_shadow_size as f32,
            theme.drop_shadow,
            theme.transparent,
        );

        r.paint(PaintOp::BeginPath);
        r.paint(PaintOp::RoundedRect(rect, cr));
        r.paint(PaintOp::MoveTo(rect.x - 15.0, rect.y + ah));
        r.paint(PaintOp::LineTo(rect.x + 1.0, rect.y + ah - 15.0));
        r.paint(PaintOp::LineTo(rect.x + 1.0, rect.y + ah + 15.0));
        r.paint(PaintOp::FillColor(theme.window_popup));
        r.paint(PaintOp::Fill);

        ctx.default_draw(r)
    }

    fn mouse_button_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        button: MouseButton,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.window.mouse_button_event(ctx, p, button, down, mods)
    }

    fn mouse_drag_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        rel: Point,
        buttons: Buttons,
        mods: Mods,
    ) -> Result<EventOutcome> {
        self.window.mouse_drag_event(ctx, p, rel, buttons, mods)
    }

    fn scroll_event(&mut self, ctx: &mut Context, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        self.window.scroll_event(ctx, p, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        testing::RecordingRenderer,
        theme::Theme,
        widgets::Panel,
    };

    #[test]
    fn owner_must_be_a_window() -> Result<()> {
        let mut core = Core::new(Expanse::new(100, 100), Theme::default());
        let root = core.root_id();
        let panel = core.make(root, Panel::new())?;
        assert_eq!(Popup::make(&mut core, root, panel), Err(Error::NotAWindow(panel)));
        Ok(())
    }

    #[test]
    fn single_child_fills_popup() -> Result<()> {
        let mut core = Core::new(Expanse::new(400, 400), Theme::default());
        let root = core.root_id();
        let owner = Window::make(&mut core, root, "owner")?;
        let popup = Popup::make(&mut core, root, owner)?;
        core.get_mut(popup)?.set_size((120, 80));
        let child = core.make(popup, Panel::new())?;
        core.get_mut(child)?.set_position((7, 7));

        let mut r = RecordingRenderer::new();
        core.perform_layout(popup, &mut r)?;
        assert_eq!(core.get(child)?.position(), Point::zero());
        assert_eq!(core.get(child)?.size(), Expanse::new(120, 80));
        Ok(())
    }

    #[test]
    fn draw_follows_owner() -> Result<()> {
        let mut core = Core::new(Expanse::new(400, 400), Theme::default());
        let root = core.root_id();
        let owner = Window::make(&mut core, root, "owner")?;
        core.get_mut(owner)?.set_position((50, 60));
        let popup = Popup::make(&mut core, root, owner)?;
        core.popup_mut(popup)?.anchor = Point::new(100, 40);

        let mut r = RecordingRenderer::new();
        core.draw(popup, &mut r)?;
        assert_eq!(core.get(popup)?.position(), Point::new(150, 70));

        core.get_mut(owner)?.set_visible(false);
        core.draw(popup, &mut r)?;
        assert!(!core.get(popup)?.visible());
        Ok(())
    }
}

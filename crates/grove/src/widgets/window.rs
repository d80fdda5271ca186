use crate::{
    Context, Core, NodeId, WindowManager, WindowState,
    error::{Error, Result},
    event::{
        ScrollDelta,
        key::Mods,
        mouse::{Button as MouseButton, Buttons},
    },
    geom::{Expanse, Point},
    render::{FontSpec, Paint, PaintOp, RectF, Renderer, RendererExt, TextAlign},
    widget::{EventOutcome, Widget},
    widgets::{Button, ButtonKind},
};

/// Glyph of the close affordance.
pub const ICON_CLOSE: char = '\u{f00d}';
/// Glyph of the roll affordance.
pub const ICON_ROLL: char = '\u{f068}';

/// A top-level window: a titled header with close and roll affordances,
/// dragged by its header.
///
/// The window's title, flags and owned windows live in the node's
/// [`WindowState`]; this widget only tracks the drag gesture.
#[derive(Debug, Default)]
pub struct Window {
    /// A primary press landed in the header and has not been released.
    drag: bool,
}

impl Window {
    /// Construct the widget. Use [`Window::create`] or [`Window::make`] to
    /// put a window in the arena.
    pub fn new() -> Self {
        Self { drag: false }
    }

    /// Phase one: create a closeable, rollable window under `parent`.
    pub fn create(core: &mut Core, parent: NodeId, title: impl Into<String>) -> Result<NodeId> {
        let id = core.create(parent, Self::new())?;
        core.get_mut(id)?.window = Some(Box::new(WindowState::new(title)));
        Ok(id)
    }

    /// Create and associate a window.
    pub fn make(core: &mut Core, parent: NodeId, title: impl Into<String>) -> Result<NodeId> {
        let id = Self::create(core, parent, title)?;
        core.associate(id)?;
        Ok(id)
    }

    /// Is a header drag in progress?
    pub fn dragging(&self) -> bool {
        self.drag
    }

    /// Build the close and roll affordances. They point at the window as
    /// their parent but stay out of its child sequence.
    pub(crate) fn build_affordances(ctx: &mut Context) -> Result<()> {
        let id = ctx.id();
        let bh = ctx.theme()?.window_header_height.saturating_sub(8);

        let close = Button::new("")
            .with_icon(ICON_CLOSE)
            .on_click(move |core| core.request_close(id).map(|_| ()));
        let roll = Button::new("")
            .with_icon(ICON_ROLL)
            .with_kind(ButtonKind::Toggle)
            .on_change(move |core, pushed| core.set_rolled(id, pushed).map(|_| ()));

        let core = ctx.core();
        let mut ids = [None, None];
        for (slot, button) in ids.iter_mut().zip([close, roll]) {
            let b = core.create_affordance(id, Box::new(button))?;
            let node = core.get_mut(b)?;
            node.set_size((bh, bh));
            node.set_font_size(Some(bh));
            *slot = Some(b);
        }
        let state = core.window_mut(id)?;
        state.close_button = ids[0];
        state.roll_button = ids[1];
        tracing::debug!("built affordances for window {id:?}");
        Ok(())
    }

    /// Draw the header band: drop shadow, gradient, separators, title and
    /// the active affordances.
    fn draw_title(ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let node = ctx.node()?;
        let theme = node.theme();
        let state = node.window_state().ok_or(Error::NotAWindow(ctx.id()))?;
        let (pos, size, focused) = (node.position(), node.size(), node.focused());
        let title = state.title.clone();
        let mut affordances = Vec::new();
        if state.closeable {
            affordances.extend(state.close_button);
        }
        if state.rollable {
            affordances.extend(state.roll_button);
        }

        let (x, y, w) = (pos.x as f32, pos.y as f32, size.w as f32);
        let hh = theme.window_header_height as f32;
        let cr = theme.window_corner_radius as f32;
        let ds = theme.window_drop_shadow_size as f32;
        let header = RectF::new(x, y, w, hh);

        r.paint(PaintOp::Save);
        r.drop_shadow(header, cr, ds, theme.drop_shadow, theme.transparent);

        if !title.is_empty() {
            r.paint(PaintOp::BeginPath);
            r.paint(PaintOp::RoundedRect(header, cr));
            r.paint(PaintOp::FillPaint(Paint::LinearGradient {
                start: (x, y),
                end: (x, y + hh),
                from: theme.window_header_gradient_top,
                to: theme.window_header_gradient_bot,
            }));
            r.paint(PaintOp::Fill);

            r.paint(PaintOp::BeginPath);
            r.paint(PaintOp::RoundedRect(header, cr));
            r.paint(PaintOp::StrokeColor(theme.window_header_sep_top));
            r.paint(PaintOp::Scissor(RectF::new(x, y, w, 0.5)));
            r.paint(PaintOp::Stroke);
            r.paint(PaintOp::ResetScissor);

            r.paint(PaintOp::BeginPath);
            r.paint(PaintOp::MoveTo(x + 0.5, y + hh - 1.5));
            r.paint(PaintOp::LineTo(x + w - 0.5, y + hh - 1.5));
            r.paint(PaintOp::StrokeColor(theme.window_header_sep_bot));
            r.paint(PaintOp::Stroke);

            let font = FontSpec::new(theme.fonts.bold.name.clone(), theme.window_title_font_size);
            let (tx, ty) = (x + w / 2.0, y + hh / 2.0);
            r.paint(PaintOp::FillColor(theme.drop_shadow));
            r.text(font.clone().with_blur(2.0), TextAlign::CenterMiddle, tx, ty, &title);
            let color = if focused {
                theme.window_title_focused
            } else {
                theme.window_title_unfocused
            };
            r.paint(PaintOp::FillColor(color));
            r.text(font, TextAlign::CenterMiddle, tx, ty - 1.0, &title);
        }

        r.paint(PaintOp::Translate(pos));
        for b in affordances {
            ctx.core().draw(b, r)?;
        }
        r.paint(PaintOp::Restore);
        Ok(())
    }

    /// Width of an affordance, or zero.
    fn affordance_width(core: &Core, id: Option<NodeId>) -> u32 {
        id.and_then(|b| core.node(b)).map_or(0, |n| n.width())
    }
}

impl Widget for Window {
    fn on_associate(&mut self, ctx: &mut Context) -> Result<()> {
        Self::build_affordances(ctx)
    }

    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        let result = ctx.default_preferred_size(r)?;
        let node = ctx.node()?;
        let theme = node.theme();
        let state = node.window_state().ok_or(Error::NotAWindow(ctx.id()))?;
        let core = ctx.core_ref();
        let buttons = Self::affordance_width(core, state.close_button)
            + Self::affordance_width(core, state.roll_button);
        let font = FontSpec::new(theme.fonts.bold.name.clone(), theme.window_title_font_size);
        let bounds = r.text_bounds(&font, &state.title).bounds;
        let title = Expanse::new(
            (bounds.w + buttons as f32 + 6.0) as u32,
            bounds.h as u32,
        );
        Ok(result.max(title))
    }

    fn perform_layout(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        ctx.default_perform_layout(r)?;
        let id = ctx.id();
        let core = ctx.core();
        let width = i32::try_from(core.get(id)?.width()).unwrap_or(i32::MAX);
        let state = core.window(id)?;
        let (close, roll) = (state.close_button, state.roll_button);

        // Close sits 4px from the right edge; roll sits 2px left of close.
        let mut at = Point::new(width, 4);
        for (b, gap) in [(close, 4), (roll, 2)] {
            let Some(b) = b else {
                continue;
            };
            let node = core.get_mut(b)?;
            at.x -= i32::try_from(node.width()).unwrap_or(0) + gap;
            node.set_position(at);
        }
        Ok(())
    }

    fn mouse_button_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        button: MouseButton,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let id = ctx.id();
        let node = ctx.node()?;
        let pos = node.position();
        let header = i32::try_from(node.theme().window_header_height).unwrap_or(i32::MAX);
        let state = node.window_state().ok_or(Error::NotAWindow(id))?;
        let affordances = [
            (state.closeable, state.close_button),
            (state.rollable, state.roll_button),
        ];

        let local = p - pos;
        let core = ctx.core();
        for (active, b) in affordances {
            let Some(b) = b.filter(|_| active) else {
                continue;
            };
            if core.contains(b, local)?
                && core
                    .mouse_button_event(b, local, button, down, mods)?
                    .is_handled()
            {
                return Ok(EventOutcome::Handle);
            }
        }

        if ctx
            .default_mouse_button_event(p, button, down, mods)?
            .is_handled()
        {
            return Ok(EventOutcome::Handle);
        }
        if button.is_primary() {
            self.drag = down && (p.y - pos.y) < header;
            return Ok(EventOutcome::Handle);
        }
        Ok(EventOutcome::Ignore)
    }

    fn mouse_drag_event(
        &mut self,
        ctx: &mut Context,
        _p: Point,
        rel: Point,
        buttons: Buttons,
        _mods: Mods,
    ) -> Result<EventOutcome> {
        if !self.drag || !buttons.contains(MouseButton::Left) {
            return Ok(EventOutcome::Ignore);
        }
        let node = ctx.node()?;
        let size = node.size().to_point();
        let bound = node
            .parent()
            .and_then(|p| ctx.core_ref().node(p))
            .map(|p| p.size().to_point() - size);
        let mut pos = (node.position() + rel).max(Point::zero());
        if let Some(bound) = bound {
            pos = pos.min(bound);
        }
        ctx.node_mut()?.set_position(pos);
        Ok(EventOutcome::Handle)
    }

    fn scroll_event(&mut self, ctx: &mut Context, p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        ctx.default_scroll_event(p, delta)?;
        Ok(EventOutcome::Handle)
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let node = ctx.node()?;
        if !node.visible() {
            return Ok(());
        }
        let theme = node.theme();
        let state = node.window_state().ok_or(Error::NotAWindow(ctx.id()))?;
        if state.rollable && state.rolled {
            return Self::draw_title(ctx, r);
        }

        let (pos, size) = (node.position(), node.size());
        let rect = RectF::new(pos.x as f32, pos.y as f32, size.w as f32, size.h as f32);
        let cr = theme.window_corner_radius as f32;
        let fill = if node.hovered() {
            theme.window_fill_focused
        } else {
            theme.window_fill_unfocused
        };
        r.paint(PaintOp::Save);
        r.fill_rounded_rect(rect, cr, fill);
        r.drop_shadow(
            rect,
            cr,
            theme.window_drop_shadow_size as f32,
            theme.drop_shadow,
            theme.transparent,
        );
        r.paint(PaintOp::Restore);

        Self::draw_title(ctx, r)?;
        ctx.default_draw(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        FocusManager,
        testing::{EventLog, Probe, RecordingRenderer},
        theme::Theme,
    };

    fn setup() -> Result<(Core, NodeId)> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let w = Window::make(&mut core, root, "title")?;
        core.get_mut(w)?.set_size((100, 100));
        core.perform_layout(w, &mut RecordingRenderer::new())?;
        Ok((core, w))
    }

    fn affordances(core: &Core, w: NodeId) -> Result<(NodeId, NodeId)> {
        let state = core.window(w)?;
        let missing = || Error::InvalidOperation("affordance missing".into());
        Ok((
            state.close_button().ok_or_else(missing)?,
            state.roll_button().ok_or_else(missing)?,
        ))
    }

    #[test]
    fn affordances_are_not_children() -> Result<()> {
        let (core, w) = setup()?;
        let (close, roll) = affordances(&core, w)?;
        assert!(core.children(w)?.is_empty());
        for b in [close, roll] {
            let node = core.get(b)?;
            assert_eq!(node.parent(), Some(w));
            assert_eq!(node.affordance_of(), Some(w));
            assert_eq!(node.size(), Expanse::new(22, 22));
        }
        Ok(())
    }

    #[test]
    fn layout_pins_affordances_right() -> Result<()> {
        let (mut core, w) = setup()?;
        core.get_mut(w)?.set_size((200, 100));
        let mut r = RecordingRenderer::new();
        core.perform_layout(w, &mut r)?;
        let (close, roll) = affordances(&core, w)?;
        assert_eq!(core.get(close)?.position(), Point::new(174, 4));
        assert_eq!(core.get(roll)?.position(), Point::new(150, 4));
        Ok(())
    }

    #[test]
    fn header_drag_is_clamped_to_parent() -> Result<()> {
        let (mut core, w) = setup()?;
        core.get_mut(w)?.set_position((10, 10));
        let left = Buttons::from(MouseButton::Left);

        core.mouse_button_event(w, Point::new(20, 15), MouseButton::Left, true, Mods::default())?;
        core.mouse_drag_event(w, Point::new(25, 20), Point::new(5, 5), left, Mods::default())?;
        assert_eq!(core.get(w)?.position(), Point::new(15, 15));

        core.mouse_drag_event(w, Point::new(0, 0), Point::new(500, -500), left, Mods::default())?;
        assert_eq!(core.get(w)?.position(), Point::new(100, 0));
        Ok(())
    }

    #[test]
    fn body_press_does_not_drag() -> Result<()> {
        let (mut core, w) = setup()?;
        let left = Buttons::from(MouseButton::Left);
        core.mouse_button_event(w, Point::new(50, 80), MouseButton::Left, true, Mods::default())?;
        let out = core.mouse_drag_event(w, Point::new(55, 85), Point::new(5, 5), left, Mods::default())?;
        assert_eq!(out, EventOutcome::Ignore);
        assert_eq!(core.get(w)?.position(), Point::zero());
        assert_eq!(core.focused_leaf(), Some(w));
        Ok(())
    }

    #[test]
    fn rolled_window_skips_children() -> Result<()> {
        let (mut core, w) = setup()?;
        let log = EventLog::new();
        core.make(w, Probe::new("child", &log))?;
        let mut r = RecordingRenderer::new();

        core.draw(w, &mut r)?;
        assert_eq!(log.count("child@draw"), 1);

        assert!(core.set_rolled(w, true)?);
        r.clear();
        core.draw(w, &mut r)?;
        assert_eq!(log.count("child@draw"), 1);
        let (close, roll) = (ICON_CLOSE.to_string(), ICON_ROLL.to_string());
        assert_eq!(
            r.texts(),
            ["title", "title", close.as_str(), "", "", roll.as_str(), "", ""]
        );
        assert_eq!(r.depth(), 0);
        Ok(())
    }

    #[test]
    fn close_button_disposes_window() -> Result<()> {
        let (mut core, w) = setup()?;
        let log = EventLog::new();
        let child = core.make(w, Probe::new("child", &log))?;

        let p = Point::new(80, 10);
        core.mouse_button_event(w, p, MouseButton::Left, true, Mods::default())?;
        assert!(core.is_alive(w));
        core.mouse_button_event(w, p, MouseButton::Left, false, Mods::default())?;
        assert!(!core.is_alive(w));
        assert!(!core.is_alive(child));
        assert_eq!(log.count("child@disposed"), 1);
        assert!(core.focus_path().is_empty());
        Ok(())
    }

    #[test]
    fn scroll_is_always_handled() -> Result<()> {
        let (mut core, w) = setup()?;
        let out = core.scroll_event(w, Point::new(5, 50), ScrollDelta::new(0.0, 1.0))?;
        assert_eq!(out, EventOutcome::Handle);
        Ok(())
    }
}

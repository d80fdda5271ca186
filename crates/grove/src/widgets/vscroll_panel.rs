use crate::{
    Context, Core,
    error::Result,
    event::{ScrollDelta, key::Mods, mouse::Buttons},
    geom::{Expanse, Point},
    render::{Color, Paint, PaintOp, RectF, Renderer},
    widget::{EventOutcome, Widget},
};

/// Width of the scroll thumb.
const THUMB_WIDTH: u32 = 12;
/// Horizontal space left and right of the thumb.
const MARGIN_H: u32 = 4;
/// Vertical space above and below the track.
const MARGIN_V: u32 = 4;
/// Width reserved for the scrollbar beside the content.
const SCROLLBAR_WIDTH: u32 = THUMB_WIDTH + 2 * MARGIN_H;

/// Runs after the scroll position changes.
pub type ScrollCallback = Box<dyn FnMut(&mut Core, f32) -> Result<()>>;

/// Shows the top of a tall first child and a vertical scrollbar beside it.
///
/// The child is laid out at its preferred size. The scroll position is a
/// fraction in `0.0..=1.0` of the overflow, moved by the wheel and by dragging
/// anywhere on the panel that the child does not cover.
#[derive(Default)]
pub struct VScrollPanel {
    /// Scroll position as a fraction of the overflow.
    scroll: f32,
    /// Preferred height of the child, from the last layout or draw.
    child_height: u32,
    /// Cap on the preferred height.
    max_height: Option<u32>,
    /// Scroll handler.
    callback: Option<ScrollCallback>,
}

impl VScrollPanel {
    /// A panel scrolled to the top with no height cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the preferred height.
    pub fn with_max_height(mut self, max: u32) -> Self {
        self.max_height = Some(max);
        self
    }

    /// Set the scroll handler.
    pub fn on_scroll(mut self, f: impl FnMut(&mut Core, f32) -> Result<()> + 'static) -> Self {
        self.callback = Some(Box::new(f));
        self
    }

    /// Cap on the preferred height, if any.
    pub fn max_height(&self) -> Option<u32> {
        self.max_height
    }

    /// Set or clear the cap on the preferred height.
    pub fn set_max_height(&mut self, max: Option<u32>) {
        self.max_height = max;
    }

    /// Scroll position in `0.0..=1.0`.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Set the scroll position, clamped to `0.0..=1.0`.
    pub fn set_scroll(&mut self, scroll: f32) {
        self.scroll = scroll.clamp(0.0, 1.0);
    }

    /// Length of the thumb for a panel `h` pixels tall.
    fn thumb_length(&self, h: f32) -> f32 {
        h * (h / self.child_height as f32).min(1.0)
    }

    /// Move the thumb by `delta` pixels along a track `h` pixels tall, then
    /// run the handler.
    fn scroll_by(&mut self, core: &mut Core, h: f32, delta: f32) -> Result<()> {
        let track = h - (2 * MARGIN_V) as f32 - self.thumb_length(h);
        if track > 0.0 {
            self.set_scroll(self.scroll + delta / track);
        }
        if let Some(cb) = self.callback.as_mut() {
            cb(core, self.scroll)?;
        }
        Ok(())
    }
}

impl Widget for VScrollPanel {
    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        let Some(child) = ctx.node()?.children().first().copied() else {
            return Ok(Expanse::default());
        };
        let pref = ctx.core().preferred_size(child, r)?;
        let h = self.max_height.map_or(pref.h, |max| pref.h.min(max));
        Ok(Expanse::new(pref.w.saturating_add(SCROLLBAR_WIDTH), h))
    }

    fn perform_layout(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let Some(child) = ctx.node()?.children().first().copied() else {
            return Ok(());
        };
        let core = ctx.core();
        let pref = core.preferred_size(child, r)?;
        self.child_height = pref.h;
        let c = core.get_mut(child)?;
        c.set_position(Point::zero());
        c.set_size(pref);
        core.perform_layout(child, r)
    }

    fn mouse_drag_event(
        &mut self,
        ctx: &mut Context,
        _p: Point,
        rel: Point,
        _buttons: Buttons,
        _mods: Mods,
    ) -> Result<EventOutcome> {
        let node = ctx.node()?;
        if node.children().is_empty() {
            return Ok(EventOutcome::Ignore);
        }
        let h = node.height() as f32;
        self.scroll_by(ctx.core(), h, rel.y as f32)?;
        Ok(EventOutcome::Handle)
    }

    fn scroll_event(&mut self, ctx: &mut Context, _p: Point, delta: ScrollDelta) -> Result<EventOutcome> {
        let h = ctx.node()?.height() as f32;
        self.scroll_by(ctx.core(), h, -delta.y * (h / 20.0))?;
        Ok(EventOutcome::Handle)
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let Some(child) = ctx.node()?.children().first().copied() else {
            return Ok(());
        };
        let pref = ctx.core().preferred_size(child, r)?;
        self.child_height = pref.h;
        let node = ctx.node()?;
        let (pos, size) = (node.position(), node.size());
        let (w, h) = (size.w as f32, size.h as f32);
        let thumb = self.thumb_length(h);
        let offset = -self.scroll * (pref.h as f32 - h);

        let core = ctx.core();
        core.get_mut(child)?.set_position(Point::new(0, offset as i32));
        let visible = core.get(child)?.visible();

        r.paint(PaintOp::Save);
        r.paint(PaintOp::Translate(pos));

        r.paint(PaintOp::Save);
        r.paint(PaintOp::Scissor(RectF::new(0.0, 0.0, w - THUMB_WIDTH as f32, h)));
        if visible {
            core.draw(child, r)?;
        }
        r.paint(PaintOp::Restore);

        let (tw, mh, mv) = (THUMB_WIDTH as f32, MARGIN_H as f32, MARGIN_V as f32);
        let bar_x = w - SCROLLBAR_WIDTH as f32 + mh;
        r.paint(PaintOp::BeginPath);
        r.paint(PaintOp::RoundedRect(RectF::new(bar_x, mv, tw, h - 2.0 * mv), 3.0));
        r.paint(PaintOp::FillPaint(Paint::BoxGradient {
            rect: RectF::new(bar_x + 1.0, mv + 1.0, tw - mh, h - 2.0 * mv),
            radius: 3.0,
            feather: 4.0,
            inner: Color::gray(0, 32),
            outer: Color::gray(0, 92),
        }));
        r.paint(PaintOp::Fill);

        let start = (mv + 1.0 + (h - 2.0 * mv - thumb) * self.scroll).max(mv);
        let len = (thumb - 2.0).min(h - 2.0 * mv);
        r.paint(PaintOp::BeginPath);
        r.paint(PaintOp::RoundedRect(RectF::new(bar_x + 1.0, start, tw - 1.0, len), 2.0));
        r.paint(PaintOp::FillPaint(Paint::BoxGradient {
            rect: RectF::new(bar_x - 1.0, start - 2.0, tw - mh - 1.0, len + 2.0),
            radius: 3.0,
            feather: 4.0,
            inner: Color::gray(220, 100),
            outer: Color::gray(128, 100),
        }));
        r.paint(PaintOp::Fill);

        r.paint(PaintOp::Restore);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        NodeId,
        event::mouse::Button,
        testing::{EventLog, Harness, Probe, RecordingRenderer},
        theme::Theme,
    };

    /// A 100x100 panel at the origin over a 80x400 child.
    fn setup(h: &mut Harness, panel: VScrollPanel, log: &EventLog) -> Result<(NodeId, NodeId)> {
        let root = h.root();
        let sp = h.screen.core_mut().make(root, panel)?;
        let child = h
            .screen
            .core_mut()
            .make(sp, Probe::new("content", log).with_preferred_size((80, 400)))?;
        h.screen.core_mut().get_mut(sp)?.set_size((100, 100));
        h.screen.core_mut().perform_layout(sp, &mut h.renderer)?;
        Ok((sp, child))
    }

    fn offset(h: &mut Harness, child: NodeId) -> Result<i32> {
        h.draw()?;
        Ok(h.core().get(child)?.position().y)
    }

    #[test]
    fn preferred_size_adds_scrollbar_and_caps_height() -> Result<()> {
        let log = EventLog::new();
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let empty = core.make(root, VScrollPanel::new())?;
        let capped = core.make(root, VScrollPanel::new().with_max_height(150))?;
        core.make(capped, Probe::new("c", &log).with_preferred_size((80, 400)))?;

        let mut r = RecordingRenderer::new();
        assert_eq!(core.preferred_size(empty, &mut r)?, Expanse::default());
        assert_eq!(core.preferred_size(capped, &mut r)?, Expanse::new(100, 150));
        core.with_widget::<VScrollPanel, _>(capped, |p, _| {
            p.set_max_height(None);
            Ok(())
        })?;
        assert_eq!(core.preferred_size(capped, &mut r)?, Expanse::new(100, 400));
        Ok(())
    }

    #[test]
    fn layout_gives_child_its_preferred_size() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((300, 300));
        let (_, child) = setup(&mut h, VScrollPanel::new(), &log)?;
        let c = h.core().get(child)?;
        assert_eq!(c.position(), Point::zero());
        assert_eq!(c.size(), Expanse::new(80, 400));
        Ok(())
    }

    #[test]
    fn wheel_scrolls_and_clamps() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((300, 300));
        let (sp, child) = setup(&mut h, VScrollPanel::new(), &log)?;
        h.move_to((50, 50))?;

        // One notch moves 5px along a 67px track: 100 - 8 - 25.
        assert!(h.scroll(0.0, -1.0)?.is_handled());
        assert_eq!(offset(&mut h, child)?, -22);

        h.scroll(0.0, 100.0)?;
        assert_eq!(offset(&mut h, child)?, 0);
        h.scroll(0.0, -100.0)?;
        assert_eq!(offset(&mut h, child)?, -300);
        let scroll = h
            .screen
            .core_mut()
            .with_widget::<VScrollPanel, _>(sp, |p, _| Ok(p.scroll()))?;
        assert_eq!(scroll, 1.0);
        Ok(())
    }

    #[test]
    fn dragging_the_bar_scrolls() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((300, 300));
        let seen = Rc::new(Cell::new(0.0));
        let s = Rc::clone(&seen);
        let panel = VScrollPanel::new().on_scroll(move |_, v| {
            s.set(v);
            Ok(())
        });
        let (sp, child) = setup(&mut h, panel, &log)?;

        h.move_to((90, 20))?;
        h.press(Button::Left)?;
        assert_eq!(h.screen.drag_target(), Some(sp));
        h.move_to((90, 87))?;
        h.release(Button::Left)?;
        assert_eq!(seen.get(), 1.0);
        assert_eq!(offset(&mut h, child)?, -300);
        Ok(())
    }

    #[test]
    fn short_content_does_not_scroll() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((300, 300));
        let root = h.root();
        let sp = h.screen.core_mut().make(root, VScrollPanel::new())?;
        let child = h
            .screen
            .core_mut()
            .make(sp, Probe::new("content", &log).with_preferred_size((80, 50)))?;
        h.screen.core_mut().get_mut(sp)?.set_size((100, 100));
        h.screen.core_mut().perform_layout(sp, &mut h.renderer)?;

        h.move_to((50, 20))?;
        h.scroll(0.0, -3.0)?;
        assert_eq!(offset(&mut h, child)?, 0);
        Ok(())
    }

    #[test]
    fn draw_clips_child_and_balances_state() -> Result<()> {
        let log = EventLog::new();
        let mut h = Harness::new((300, 300));
        let (sp, _) = setup(&mut h, VScrollPanel::new(), &log)?;
        h.screen.core_mut().get_mut(sp)?.set_position((10, 10));

        h.draw()?;
        assert_eq!(log.count("content@draw"), 1);
        assert!(
            h.renderer
                .ops()
                .contains(&PaintOp::Scissor(RectF::new(0.0, 0.0, 88.0, 100.0)))
        );
        assert_eq!(h.renderer.count(|op| matches!(op, PaintOp::Fill)), 2);
        assert_eq!(h.renderer.depth(), 0);
        assert_eq!(h.renderer.translation(), Point::zero());
        Ok(())
    }
}

use crate::{
    Context, Core,
    error::Result,
    event::{key::Mods, mouse::Button as MouseButton},
    geom::{Expanse, Point},
    render::{Color, FontSpec, Paint, PaintOp, RectF, Renderer, RendererExt, TextAlign},
    widget::{EventOutcome, Widget},
    widgets::PopupButton,
};

/// Runs when a button is released over itself.
pub type ClickCallback = Box<dyn FnMut(&mut Core) -> Result<()>>;

/// Runs when a button's pushed state changes.
pub type ChangeCallback = Box<dyn FnMut(&mut Core, bool) -> Result<()>>;

/// How a button responds to presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    /// Pushed while held.
    #[default]
    Normal,
    /// Each press flips the pushed state.
    Toggle,
    /// A toggle that releases other popup buttons among its siblings.
    Popup,
}

/// A push button with a caption and an optional icon glyph.
pub struct Button {
    /// Caption text.
    caption: String,
    /// Icon glyph, drawn with the icon font.
    icon: Option<char>,
    /// Press behavior.
    kind: ButtonKind,
    /// Pushed state.
    pushed: bool,
    /// Click handler.
    callback: Option<ClickCallback>,
    /// Pushed-state handler.
    change_callback: Option<ChangeCallback>,
}

impl Button {
    /// A normal button with a caption.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            icon: None,
            kind: ButtonKind::Normal,
            pushed: false,
            callback: None,
            change_callback: None,
        }
    }

    /// Set the icon glyph.
    pub fn with_icon(mut self, icon: char) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the press behavior.
    pub fn with_kind(mut self, kind: ButtonKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the click handler.
    pub fn on_click(mut self, f: impl FnMut(&mut Core) -> Result<()> + 'static) -> Self {
        self.callback = Some(Box::new(f));
        self
    }

    /// Set the pushed-state handler.
    pub fn on_change(mut self, f: impl FnMut(&mut Core, bool) -> Result<()> + 'static) -> Self {
        self.change_callback = Some(Box::new(f));
        self
    }

    /// Replace the pushed-state handler.
    pub fn set_change_callback(&mut self, f: impl FnMut(&mut Core, bool) -> Result<()> + 'static) {
        self.change_callback = Some(Box::new(f));
    }

    /// Caption text.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Press behavior.
    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    /// Pushed state.
    pub fn pushed(&self) -> bool {
        self.pushed
    }

    /// Set the pushed state, running the change handler if it changed.
    pub fn set_pushed(&mut self, core: &mut Core, pushed: bool) -> Result<()> {
        let was = self.pushed;
        self.pushed = pushed;
        if was != pushed {
            self.changed(core)?;
        }
        Ok(())
    }

    /// Clear the pushed state without running handlers.
    pub(crate) fn clear_pushed(&mut self) {
        self.pushed = false;
    }

    /// Run the change handler with the current state.
    fn changed(&mut self, core: &mut Core) -> Result<()> {
        if let Some(cb) = self.change_callback.as_mut() {
            cb(core, self.pushed)?;
        }
        Ok(())
    }

    /// Release every pushed popup button among this node's siblings.
    fn release_popup_siblings(ctx: &mut Context) -> Result<()> {
        let id = ctx.id();
        let Some(parent) = ctx.node()?.parent() else {
            return Ok(());
        };
        let siblings = ctx.core().children(parent)?.to_vec();
        for sibling in siblings.into_iter().filter(|s| *s != id) {
            let core = ctx.core();
            let released = core.try_with_widget::<PopupButton, _>(sibling, |b, ctx| {
                b.button_mut().set_pushed(ctx.core(), false)
            })?;
            if released.is_none() {
                core.try_with_widget::<Self, _>(sibling, |b, ctx| {
                    if b.kind == ButtonKind::Popup {
                        b.set_pushed(ctx.core(), false)?;
                    }
                    Ok(())
                })?;
            }
        }
        Ok(())
    }

    /// Size of the caption font for this node.
    fn font_size(ctx: &Context) -> Result<u32> {
        let node = ctx.node()?;
        Ok(node
            .font_size_override()
            .unwrap_or(node.theme().button_font_size))
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl Widget for Button {
    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        let font_size = Self::font_size(ctx)?;
        let theme = ctx.theme()?;
        let ih = font_size as f32;
        let tw = r
            .text_bounds(&FontSpec::new(theme.fonts.bold.name.clone(), ih), &self.caption)
            .advance;
        let iw = match self.icon {
            Some(icon) => {
                let font = FontSpec::new(theme.fonts.icons.name.clone(), ih);
                let w = r.text_bounds(&font, &icon.to_string()).advance;
                w + w * 0.15
            }
            None => 0.0,
        };
        Ok(Expanse::new((tw + iw) as u32 + 20, font_size + 10))
    }

    fn mouse_button_event(
        &mut self,
        ctx: &mut Context,
        p: Point,
        button: MouseButton,
        down: bool,
        mods: Mods,
    ) -> Result<EventOutcome> {
        let node = ctx.node()?;
        let (enabled, inside) = (node.enabled(), node.contains(p));
        ctx.default_mouse_button_event(p, button, down, mods)?;
        if !button.is_primary() || !enabled {
            return Ok(EventOutcome::Ignore);
        }

        let was = self.pushed;
        if down {
            if self.kind == ButtonKind::Popup {
                Self::release_popup_siblings(ctx)?;
            }
            self.pushed = match self.kind {
                ButtonKind::Normal => true,
                ButtonKind::Toggle | ButtonKind::Popup => !self.pushed,
            };
        } else if self.pushed {
            if inside && let Some(cb) = self.callback.as_mut() {
                cb(ctx.core())?;
            }
            if self.kind == ButtonKind::Normal {
                self.pushed = false;
            }
        }
        if was != self.pushed {
            self.changed(ctx.core())?;
        }
        Ok(EventOutcome::Handle)
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let node = ctx.node()?;
        let theme = node.theme();
        let (pos, size) = (node.position(), node.size());
        let (enabled, hovered) = (node.enabled(), node.hovered());
        let font_size = Self::font_size(ctx)?;
        let (x, y, w, h) = (pos.x as f32, pos.y as f32, size.w as f32, size.h as f32);
        let cr = theme.button_corner_radius as f32;

        let (top, bot) = if self.pushed {
            (theme.button_gradient_top_pushed, theme.button_gradient_bot_pushed)
        } else if hovered && enabled {
            (theme.button_gradient_top_focused, theme.button_gradient_bot_focused)
        } else {
            (theme.button_gradient_top_unfocused, theme.button_gradient_bot_unfocused)
        };
        r.paint(PaintOp::BeginPath);
        r.paint(PaintOp::RoundedRect(RectF::new(x, y, w - 2.0, h - 2.0), cr - 1.0));
        r.paint(PaintOp::FillPaint(Paint::LinearGradient {
            start: (x, y),
            end: (x, y + h),
            from: top,
            to: bot,
        }));
        r.paint(PaintOp::Fill);

        let inset = if self.pushed { 0.5 } else { 1.5 };
        r.paint(PaintOp::BeginPath);
        r.paint(PaintOp::RoundedRect(
            RectF::new(x + 0.5, y + inset, w - 1.0, h - 1.0 - (inset - 0.5)),
            cr,
        ));
        r.paint(PaintOp::StrokeColor(theme.border_light));
        r.paint(PaintOp::Stroke);
        r.paint(PaintOp::BeginPath);
        r.paint(PaintOp::RoundedRect(RectF::new(x + 0.5, y + 0.5, w - 1.0, h - 2.0), cr));
        r.paint(PaintOp::StrokeColor(theme.border_dark));
        r.paint(PaintOp::Stroke);

        let fs = font_size as f32;
        let caption_font = FontSpec::new(theme.fonts.bold.name.clone(), fs);
        let tw = r.text_bounds(&caption_font, &self.caption).advance;
        let (cx, cy) = (x + w * 0.5, y + h * 0.5);
        let (mut tx, ty) = (cx - tw * 0.5, cy - 1.0);
        let text_color: Color = if enabled {
            theme.text_color
        } else {
            theme.disabled_text_color
        };

        if let Some(icon) = self.icon {
            let icon = icon.to_string();
            let icon_font = FontSpec::new(theme.fonts.icons.name.clone(), fs);
            let mut iw = r.text_bounds(&icon_font, &icon).advance;
            if !self.caption.is_empty() {
                iw += h * 0.15;
            }
            r.paint(PaintOp::FillColor(text_color));
            let ix = cx - (tw + iw) * 0.5;
            tx += iw * 0.5;
            r.text(icon_font, TextAlign::LeftMiddle, ix, cy, &icon);
        }

        r.paint(PaintOp::FillColor(theme.text_color_shadow));
        r.text(caption_font.clone(), TextAlign::LeftMiddle, tx, ty, &self.caption);
        r.paint(PaintOp::FillColor(text_color));
        r.text(caption_font, TextAlign::LeftMiddle, tx, ty + 1.0, &self.caption);
        Ok(())
    }
}

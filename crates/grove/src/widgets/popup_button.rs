use crate::{
    Context, NodeId, WindowManager,
    error::{Error, Result},
    event::{key::Mods, mouse::Button as MouseButton},
    geom::{Expanse, Point},
    render::{FontSpec, PaintOp, Renderer, RendererExt, TextAlign},
    widget::{EventOutcome, Widget},
    widgets::{Button, ButtonKind, Popup},
};

/// Glyph drawn at the right edge of a popup button.
pub const ICON_CHEVRON: char = '\u{f054}';

/// Default size of the popup a [`PopupButton`] opens.
const POPUP_SIZE: (u32, u32) = (320, 250);

/// A toggle button that shows and hides a popup anchored to its window.
///
/// The popup is created when the button is associated. It lives on the
/// window's parent and is owned by the window, so it is disposed with it.
pub struct PopupButton {
    /// Underlying button, always of kind [`ButtonKind::Popup`].
    button: Button,
    /// Chevron glyph, if any.
    chevron: Option<char>,
    /// The popup, once associated.
    popup: Option<NodeId>,
}

impl PopupButton {
    /// A popup button with a caption and the default chevron.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            button: Button::new(caption).with_kind(ButtonKind::Popup),
            chevron: Some(ICON_CHEVRON),
            popup: None,
        }
    }

    /// Set the button icon.
    pub fn with_icon(mut self, icon: char) -> Self {
        self.button = self.button.with_icon(icon);
        self
    }

    /// Set or remove the chevron glyph.
    pub fn with_chevron(mut self, chevron: Option<char>) -> Self {
        self.chevron = chevron;
        self
    }

    /// The underlying button.
    pub fn button(&self) -> &Button {
        &self.button
    }

    /// The underlying button, mutably.
    pub fn button_mut(&mut self) -> &mut Button {
        &mut self.button
    }

    /// The popup this button controls. `None` until associated.
    pub fn popup(&self) -> Option<NodeId> {
        self.popup
    }

    /// Font size for the chevron, matching the caption.
    fn font_size(ctx: &Context) -> Result<f32> {
        let node = ctx.node()?;
        Ok(node
            .font_size_override()
            .unwrap_or(node.theme().button_font_size) as f32)
    }
}

impl Widget for PopupButton {
    fn on_associate(&mut self, ctx: &mut Context) -> Result<()> {
        let id = ctx.id();
        let core = ctx.core();
        let window = core.window_of(id)?;
        let host = core
            .parent(window)?
            .ok_or_else(|| Error::InvalidOperation(format!("window {window:?} has no parent")))?;
        let popup = Popup::make(core, host, window)?;
        let node = core.get_mut(popup)?;
        node.set_size(POPUP_SIZE);
        node.set_visible(false);
        self.popup = Some(popup);

        self.button.set_change_callback(move |core, pushed| {
            if let Some(node) = core.node_mut(popup) {
                node.set_visible(pushed);
            }
            Ok(())
        });
        tracing::debug!("popup button {id:?} opens {popup:?}");
        Ok(())
    }

    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        let size = self.button.preferred_size(ctx, r)?;
        let Some(chevron) = self.chevron else {
            return Ok(size);
        };
        let font = FontSpec::new(ctx.theme()?.fonts.icons.name.clone(), Self::font_size(ctx)?);
        let w = r.text_bounds(&font, &chevron.to_string()).advance;
        Ok(Expanse::new(size.w + w as u32, size.h))
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let id = ctx.id();
        if !ctx.node()?.enabled() && self.button.pushed() {
            self.button.clear_pushed();
        }

        let core = ctx.core();
        let window = core.window_of(id)?;
        let abs = core.absolute_position(id)?;
        let win = core.get(window)?;
        let (win_w, win_y) = (i32::try_from(win.width()).unwrap_or(i32::MAX), win.position().y);
        let half = i32::try_from(core.get(id)?.height() / 2).unwrap_or(0);
        if let Some(popup) = self.popup
            && let Ok(state) = core.popup_mut(popup)
        {
            state.anchor = Point::new(win_w + 15, abs.y - win_y + half);
        }

        self.button.draw(ctx, r)?;

        let Some(chevron) = self.chevron else {
            return Ok(());
        };
        let node = ctx.node()?;
        let theme = node.theme();
        let (pos, size) = (node.position(), node.size());
        let color = if node.enabled() {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        let font = FontSpec::new(theme.fonts.icons.name.clone(), Self::font_size(ctx)?);
        let icon = chevron.to_string();
        let iw = r.text_bounds(&font, &icon).advance;
        r.paint(PaintOp::FillColor(color));
        r.text(
            font,
            TextAlign::LeftMiddle,
            pos.x as f32 + size.w as f32 - iw - 8.0,
            pos.y as f32 + size.h as f32 * 0.5,
            &icon,
        );
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
        self.button.mouse_button_event(ctx, p, button, down, mods)
    }
}

use crate::{
    Context,
    error::Result,
    geom::Expanse,
    render::{Color, FontSpec, PaintOp, Renderer, RendererExt, TextAlign},
    theme::Theme,
    widget::Widget,
};

/// Which theme face a label draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFont {
    /// Regular text.
    #[default]
    Normal,
    /// Bold text.
    Bold,
    /// Icon glyphs.
    Icons,
}

/// A single line of static text.
///
/// The font size comes from the node's override, falling back to the theme's
/// standard size. A nonzero fixed width replaces the measured width.
#[derive(Debug, Clone, Default)]
pub struct Label {
    /// Text to draw.
    caption: String,
    /// Theme face.
    font: LabelFont,
    /// Text colour; the theme's text colour if unset.
    color: Option<Color>,
}

impl Label {
    /// A label in the regular face.
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            font: LabelFont::Normal,
            color: None,
        }
    }

    /// Set the face.
    pub fn with_font(mut self, font: LabelFont) -> Self {
        self.font = font;
        self
    }

    /// Set the text colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Text to draw.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Replace the text.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// The font selection for this node.
    fn font_spec(&self, ctx: &Context) -> Result<FontSpec> {
        let node = ctx.node()?;
        let theme = node.theme();
        let size = node
            .font_size_override()
            .unwrap_or(theme.standard_font_size);
        Ok(FontSpec::new(self.face(&theme), size as f32))
    }

    /// Face name in `theme`.
    fn face(&self, theme: &Theme) -> String {
        let face = match self.font {
            LabelFont::Normal => &theme.fonts.normal,
            LabelFont::Bold => &theme.fonts.bold,
            LabelFont::Icons => &theme.fonts.icons,
        };
        face.name.clone()
    }
}

impl Widget for Label {
    fn preferred_size(&self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<Expanse> {
        let font = self.font_spec(ctx)?;
        let fixed = ctx.node()?.fixed_size().w;
        let w = if fixed != 0 {
            fixed
        } else {
            r.text_bounds(&font, &self.caption).advance as u32
        };
        Ok(Expanse::new(w, font.size as u32))
    }

    fn draw(&mut self, ctx: &mut Context, r: &mut dyn Renderer) -> Result<()> {
        let font = self.font_spec(ctx)?;
        let node = ctx.node()?;
        let (pos, size) = (node.position(), node.size());
        let color = if node.enabled() {
            self.color.unwrap_or(node.theme().text_color)
        } else {
            node.theme().disabled_text_color
        };
        r.paint(PaintOp::FillColor(color));
        r.text(
            font,
            TextAlign::LeftMiddle,
            pos.x as f32,
            pos.y as f32 + size.h as f32 / 2.0,
            &self.caption,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Core, testing::RecordingRenderer};

    #[test]
    fn measures_caption_or_fixed_width() -> Result<()> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let plain = core.make(root, Label::new("abcd"))?;
        let fixed = core.make(root, Label::new("abcd"))?;
        core.get_mut(fixed)?.set_fixed_size((120, 0));
        let icon = core.make(root, Label::new("x").with_font(LabelFont::Icons))?;
        core.get_mut(icon)?.set_font_size(Some(50));

        let mut r = RecordingRenderer::new();
        assert_eq!(core.preferred_size(plain, &mut r)?, Expanse::new(32, 16));
        assert_eq!(core.preferred_size(fixed, &mut r)?, Expanse::new(120, 16));
        assert_eq!(core.preferred_size(icon, &mut r)?, Expanse::new(25, 50));
        Ok(())
    }

    #[test]
    fn draws_in_its_face() -> Result<()> {
        let mut core = Core::new(Expanse::new(200, 200), Theme::default());
        let root = core.root_id();
        let l = core.make(root, Label::new("hi").with_font(LabelFont::Bold))?;
        core.get_mut(l)?.set_position((10, 20));
        core.get_mut(l)?.set_size((40, 16));

        let mut r = RecordingRenderer::new();
        core.draw(l, &mut r)?;
        assert_eq!(r.texts(), vec!["hi"]);
        assert!(r.ops().contains(&PaintOp::Font(FontSpec::new("sans-bold", 16.0))));
        assert!(r.ops().contains(&PaintOp::Text(10.0, 28.0, "hi".into())));
        Ok(())
    }
}

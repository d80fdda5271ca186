use std::path::Path;

use crate::{
    error::{Error, Result},
    geom::Point,
    render::{FontSpec, PaintOp, RectF, Renderer, TextBounds},
};

/// Advance of one character, as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// A renderer that records every operation it receives.
///
/// Text is measured with a monospace metric: each character advances by half
/// the font size and the bounds are one font size tall. The renderer tracks
/// the translation in effect so tests can check where things land.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Operations in the order received.
    ops: Vec<PaintOp>,
    /// Current accumulated translation.
    translation: Point,
    /// Translations saved by `Save`.
    saved: Vec<Point>,
    /// Registered font faces.
    fonts: Vec<String>,
    /// Make every font load fail.
    fail_fonts: bool,
}

impl RecordingRenderer {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder on which every font load fails.
    pub fn failing_fonts() -> Self {
        Self {
            fail_fonts: true,
            ..Self::default()
        }
    }

    /// Operations recorded so far.
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Forget recorded operations and reset the drawing state.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.saved.clear();
        self.translation = Point::zero();
    }

    /// Number of unmatched `Save` operations.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Translation currently in effect.
    pub fn translation(&self) -> Point {
        self.translation
    }

    /// Text runs drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text(_, _, s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Count operations matching a predicate.
    pub fn count(&self, f: impl Fn(&PaintOp) -> bool) -> usize {
        self.ops.iter().filter(|op| f(op)).count()
    }

    /// Font faces registered with this renderer.
    pub fn fonts(&self) -> &[String] {
        &self.fonts
    }
}

impl Renderer for RecordingRenderer {
    fn paint(&mut self, op: PaintOp) {
        match &op {
            PaintOp::Save => self.saved.push(self.translation),
            PaintOp::Restore => {
                if let Some(t) = self.saved.pop() {
                    self.translation = t;
                }
            }
            PaintOp::Translate(p) => self.translation += *p,
            _ => {}
        }
        self.ops.push(op);
    }

    fn text_bounds(&mut self, font: &FontSpec, text: &str) -> TextBounds {
        let advance = text.chars().count() as f32 * font.size * GLYPH_ADVANCE;
        TextBounds {
            advance,
            bounds: RectF::new(0.0, 0.0, advance, font.size),
        }
    }

    fn load_font(&mut self, name: &str, path: &Path) -> Result<()> {
        if self.fail_fonts {
            return Err(Error::Resource(format!("cannot read {}", path.display())));
        }
        self.fonts.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::theme::{FontFace, Theme};

    #[test]
    fn tracks_translation_through_save_restore() {
        let mut r = RecordingRenderer::new();
        r.paint(PaintOp::Translate(Point::new(5, 5)));
        r.paint(PaintOp::Save);
        r.paint(PaintOp::Translate(Point::new(10, 0)));
        assert_eq!(r.translation(), Point::new(15, 5));
        assert_eq!(r.depth(), 1);
        r.paint(PaintOp::Restore);
        assert_eq!(r.translation(), Point::new(5, 5));
        assert_eq!(r.depth(), 0);
        assert_eq!(r.ops().len(), 4);
    }

    #[test]
    fn monospace_metric() {
        let mut r = RecordingRenderer::new();
        let b = r.text_bounds(&FontSpec::new("sans", 10.0), "abc");
        assert_eq!(b.advance, 15.0);
        assert_eq!(b.bounds.h, 10.0);
    }

    #[test]
    fn font_load_failure_is_resource_error() -> Result<()> {
        let mut theme = Theme::default();
        theme.fonts.icons = FontFace {
            name: "icons".into(),
            path: Some(PathBuf::from("missing.ttf")),
        };

        let mut ok = RecordingRenderer::new();
        theme.load_fonts(&mut ok)?;
        assert_eq!(ok.fonts(), &["icons".to_string()]);

        let mut bad = RecordingRenderer::failing_fonts();
        assert!(matches!(theme.load_fonts(&mut bad), Err(Error::Resource(_))));
        Ok(())
    }
}

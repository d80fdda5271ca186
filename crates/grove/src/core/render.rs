//! The abstract drawing contract.
//!
//! Widgets never talk to a concrete vector backend. They issue [`PaintOp`]s
//! against a [`Renderer`] and ask it for text metrics; a backend adapter
//! translates these into whatever its drawing API needs.

use std::path::Path;

use serde::Deserialize;

use crate::{error::Result, geom::Point};

/// An RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Construct from floating point components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Construct from 8-bit components.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// A grey of the given 8-bit intensity and alpha.
    pub fn gray(intensity: u8, alpha: u8) -> Self {
        Self::rgba8(intensity, intensity, intensity, alpha)
    }
}

/// A rectangle in floating point drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl RectF {
    /// Construct a new rectangle.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Grow the rectangle by `d` on every side.
    pub fn outset(&self, d: f32) -> Self {
        Self {
            x: self.x - d,
            y: self.y - d,
            w: self.w + 2.0 * d,
            h: self.h + 2.0 * d,
        }
    }
}

/// A gradient fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// A feathered rounded box, used for drop shadows.
    BoxGradient {
        /// Box bounds.
        rect: RectF,
        /// Corner radius.
        radius: f32,
        /// Feather width.
        feather: f32,
        /// Colour inside the box.
        inner: Color,
        /// Colour outside the feather.
        outer: Color,
    },
    /// A linear gradient between two points.
    LinearGradient {
        /// Start point.
        start: (f32, f32),
        /// End point.
        end: (f32, f32),
        /// Colour at the start point.
        from: Color,
        /// Colour at the end point.
        to: Color,
    },
}

/// Path winding for the sub-path just added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Filled region.
    Solid,
    /// Cut-out region.
    Hole,
}

/// Horizontal and vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Left-aligned, vertically centred.
    LeftMiddle,
    /// Centred on both axes.
    CenterMiddle,
}

/// Font selection for text drawing and measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Registered face name.
    pub face: String,
    /// Size in pixels.
    pub size: f32,
    /// Blur radius; zero for crisp text.
    pub blur: f32,
}

impl FontSpec {
    /// A crisp font of the given face and size.
    pub fn new(face: impl Into<String>, size: f32) -> Self {
        Self {
            face: face.into(),
            size,
            blur: 0.0,
        }
    }

    /// Set the blur radius.
    pub fn with_blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }
}

/// Horizontal advance and bounding box of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    /// Horizontal advance.
    pub advance: f32,
    /// Bounding box relative to the text origin.
    pub bounds: RectF,
}

/// An abstract paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Push the drawing state.
    Save,
    /// Pop the drawing state.
    Restore,
    /// Translate the drawing origin.
    Translate(Point),
    /// Start a new path.
    BeginPath,
    /// Add a rectangle to the path.
    Rect(RectF),
    /// Add a rounded rectangle to the path.
    RoundedRect(RectF, f32),
    /// Move the pen.
    MoveTo(f32, f32),
    /// Add a line segment to the path.
    LineTo(f32, f32),
    /// Set the winding of the last sub-path.
    PathWinding(Winding),
    /// Set a solid fill colour.
    FillColor(Color),
    /// Set a gradient fill.
    FillPaint(Paint),
    /// Fill the current path.
    Fill,
    /// Set the stroke colour.
    StrokeColor(Color),
    /// Set the stroke width.
    StrokeWidth(f32),
    /// Stroke the current path.
    Stroke,
    /// Clip subsequent drawing to a rectangle.
    Scissor(RectF),
    /// Remove the clip.
    ResetScissor,
    /// Select a font.
    Font(FontSpec),
    /// Set text alignment.
    TextAlign(TextAlign),
    /// Draw text at a point.
    Text(f32, f32, String),
}

/// The drawing backend handle passed through every draw and layout call.
pub trait Renderer {
    /// Issue a paint operation.
    fn paint(&mut self, op: PaintOp);

    /// Measure a text run in the given font.
    fn text_bounds(&mut self, font: &FontSpec, text: &str) -> TextBounds;

    /// Register a font face from a file.
    fn load_font(&mut self, name: &str, path: &Path) -> Result<()>;
}

/// Convenience painting helpers over any renderer.
pub trait RendererExt: Renderer {
    /// Fill a rounded rectangle with a solid colour.
    fn fill_rounded_rect(&mut self, rect: RectF, radius: f32, color: Color) {
        self.paint(PaintOp::BeginPath);
        self.paint(PaintOp::RoundedRect(rect, radius));
        self.paint(PaintOp::FillColor(color));
        self.paint(PaintOp::Fill);
    }

    /// Paint a feathered drop shadow around `rect`.
    fn drop_shadow(&mut self, rect: RectF, radius: f32, size: f32, shadow: Color, clear: Color) {
        self.paint(PaintOp::BeginPath);
        self.paint(PaintOp::Rect(rect.outset(size)));
        self.paint(PaintOp::RoundedRect(rect, radius));
        self.paint(PaintOp::PathWinding(Winding::Hole));
        self.paint(PaintOp::FillPaint(Paint::BoxGradient {
            rect,
            radius: radius * 2.0,
            feather: size * 2.0,
            inner: shadow,
            outer: clear,
        }));
        self.paint(PaintOp::Fill);
    }

    /// Draw a text run.
    fn text(&mut self, font: FontSpec, align: TextAlign, x: f32, y: f32, text: &str) {
        self.paint(PaintOp::Font(font));
        self.paint(PaintOp::TextAlign(align));
        self.paint(PaintOp::Text(x, y, text.to_string()));
    }
}

impl<R: Renderer + ?Sized> RendererExt for R {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_is_uniform() {
        let c = Color::gray(255, 0);
        assert_eq!(c, Color::rgba(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn outset_grows_every_side() {
        let r = RectF::new(10.0, 10.0, 4.0, 6.0).outset(2.0);
        assert_eq!(r, RectF::new(8.0, 8.0, 8.0, 10.0));
    }
}

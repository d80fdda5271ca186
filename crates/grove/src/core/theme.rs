//! Theme metrics, colours, and font configuration.
//!
//! A theme is built once per root surface and shared by reference with every
//! node. It deserializes from JSON with every field optional, so a document
//! only needs to name the values it overrides.

use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    render::{Color, Renderer},
};

/// A font face the theme expects to be registered with the renderer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FontFace {
    /// Face name used in font selections.
    pub name: String,
    /// File to load the face from. Faces without a path are assumed to be
    /// provided by the backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl FontFace {
    /// A face provided by the backend.
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }
}

/// The font faces used by the core widgets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontSet {
    /// Regular text.
    pub normal: FontFace,
    /// Bold text, used for window titles.
    pub bold: FontFace,
    /// Icon glyphs.
    pub icons: FontFace,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            normal: FontFace::builtin("sans"),
            bold: FontFace::builtin("sans-bold"),
            icons: FontFace::builtin("icons"),
        }
    }
}

/// Shared metrics and colours.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Default font size for widgets without an override.
    pub standard_font_size: u32,
    /// Font size for button captions.
    pub button_font_size: u32,
    /// Window title font size.
    pub window_title_font_size: f32,
    /// Window corner radius.
    pub window_corner_radius: u32,
    /// Height of the window header band.
    pub window_header_height: u32,
    /// Size of the window drop shadow.
    pub window_drop_shadow_size: u32,
    /// Button corner radius.
    pub button_corner_radius: u32,

    /// Drop shadow colour.
    pub drop_shadow: Color,
    /// Fully transparent.
    pub transparent: Color,
    /// Dark border.
    pub border_dark: Color,
    /// Light border.
    pub border_light: Color,
    /// Medium border.
    pub border_medium: Color,
    /// Regular text.
    pub text_color: Color,
    /// Text on disabled widgets.
    pub disabled_text_color: Color,
    /// Text shadow.
    pub text_color_shadow: Color,

    /// Button gradient top, hovered.
    pub button_gradient_top_focused: Color,
    /// Button gradient bottom, hovered.
    pub button_gradient_bot_focused: Color,
    /// Button gradient top, idle.
    pub button_gradient_top_unfocused: Color,
    /// Button gradient bottom, idle.
    pub button_gradient_bot_unfocused: Color,
    /// Button gradient top, pushed.
    pub button_gradient_top_pushed: Color,
    /// Button gradient bottom, pushed.
    pub button_gradient_bot_pushed: Color,

    /// Window body, not hovered.
    pub window_fill_unfocused: Color,
    /// Window body, hovered.
    pub window_fill_focused: Color,
    /// Title text, window not focused.
    pub window_title_unfocused: Color,
    /// Title text, window focused.
    pub window_title_focused: Color,
    /// Header gradient top.
    pub window_header_gradient_top: Color,
    /// Header gradient bottom.
    pub window_header_gradient_bot: Color,
    /// Separator line above the header.
    pub window_header_sep_top: Color,
    /// Separator line below the header.
    pub window_header_sep_bot: Color,
    /// Popup body.
    pub window_popup: Color,
    /// Popup body, fully transparent.
    pub window_popup_transparent: Color,

    /// Font faces.
    pub fonts: FontSet,
}

impl Default for Theme {
    fn default() -> Self {
        let button_gradient_top_unfocused = Color::gray(74, 255);
        let button_gradient_bot_unfocused = Color::gray(58, 255);
        let border_light = Color::gray(92, 255);
        let border_dark = Color::gray(29, 255);
        Self {
            standard_font_size: 16,
            button_font_size: 20,
            window_title_font_size: 18.0,
            window_corner_radius: 2,
            window_header_height: 30,
            window_drop_shadow_size: 10,
            button_corner_radius: 2,

            drop_shadow: Color::gray(0, 128),
            transparent: Color::gray(0, 0),
            border_dark,
            border_light,
            border_medium: Color::gray(35, 255),
            text_color: Color::gray(255, 160),
            disabled_text_color: Color::gray(255, 80),
            text_color_shadow: Color::gray(0, 160),

            button_gradient_top_focused: Color::gray(64, 255),
            button_gradient_bot_focused: Color::gray(48, 255),
            button_gradient_top_unfocused,
            button_gradient_bot_unfocused,
            button_gradient_top_pushed: Color::gray(32, 255),
            button_gradient_bot_pushed: Color::gray(16, 255),

            window_fill_unfocused: Color::gray(43, 250),
            window_fill_focused: Color::gray(45, 250),
            window_title_unfocused: Color::gray(220, 255),
            window_title_focused: Color::gray(255, 255),
            window_header_gradient_top: button_gradient_top_unfocused,
            window_header_gradient_bot: button_gradient_bot_unfocused,
            window_header_sep_top: border_light,
            window_header_sep_bot: border_dark,
            window_popup: Color::gray(50, 255),
            window_popup_transparent: Color::gray(50, 0),

            fonts: FontSet::default(),
        }
    }
}

impl Theme {
    /// Parse a theme from JSON, filling unspecified fields from the defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Register every font face that names a file with the renderer.
    ///
    /// Any failure is fatal for start-up and is reported as
    /// [`Error::Resource`].
    pub fn load_fonts(&self, r: &mut dyn Renderer) -> Result<()> {
        for face in [&self.fonts.normal, &self.fonts.bold, &self.fonts.icons] {
            if let Some(path) = &face.path {
                r.load_font(&face.name, path).map_err(|e| {
                    Error::Resource(format!(
                        "could not load font {:?} from {}: {e}",
                        face.name,
                        path.display()
                    ))
                })?;
                tracing::debug!("loaded font {} from {}", face.name, path.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let theme = Theme::from_json(r#"{"window_header_height": 40}"#)?;
        assert_eq!(theme.window_header_height, 40);
        assert_eq!(theme.window_drop_shadow_size, 10);
        assert_eq!(theme.fonts, FontSet::default());
        Ok(())
    }

    #[test]
    fn nested_fonts_and_colors() -> Result<()> {
        let theme = Theme::from_json(
            r#"{
                "window_popup": {"r": 0.5, "g": 0.5, "b": 0.5, "a": 1.0},
                "fonts": {"bold": {"name": "heavy", "path": "fonts/heavy.ttf"}}
            }"#,
        )?;
        assert_eq!(theme.window_popup, Color::rgba(0.5, 0.5, 0.5, 1.0));
        assert_eq!(theme.fonts.bold.name, "heavy");
        assert_eq!(theme.fonts.normal.name, "sans");
        Ok(())
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = Theme::from_json("{ nope").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}

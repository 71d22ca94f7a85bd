//! Text layer payload.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Font families offered by the editor: (display name, CSS font-family value).
pub const FONT_FAMILIES: &[(&str, &str)] = &[
    ("Inter", "Inter"),
    ("Arial", "Arial"),
    ("Helvetica", "Helvetica Neue"),
    ("Times New Roman", "Times New Roman"),
    ("Georgia", "Georgia"),
    ("Roboto", "'Roboto', sans-serif"),
    ("Open Sans", "'Open Sans', sans-serif"),
    ("Lato", "'Lato', sans-serif"),
    ("Montserrat", "'Montserrat', sans-serif"),
    ("Poppins", "'Poppins', sans-serif"),
    ("Ubuntu", "'Ubuntu', sans-serif"),
    ("Playfair Display", "'Playfair Display', serif"),
    ("Merriweather", "'Merriweather', serif"),
    ("Raleway", "'Raleway', sans-serif"),
    ("Dancing Script", "'Dancing Script', cursive"),
];

/// Font sizes offered in the toolbar.
pub const FONT_SIZES: [f64; 13] = [
    12.0, 14.0, 16.0, 18.0, 20.0, 24.0, 28.0, 32.0, 36.0, 42.0, 48.0, 56.0, 64.0,
];

pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Line height relative to the font size, used to size new text boxes.
pub const LINE_HEIGHT: f64 = 1.5;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Optional style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextStyles {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

/// A block of styled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<TextStyles>,
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

impl TextLayer {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_family: default_font_family(),
            color: Color::black(),
            text_align: TextAlign::Left,
            styles: None,
        }
    }

    pub fn styles(&self) -> TextStyles {
        self.styles.unwrap_or_default()
    }

    pub(crate) fn apply(&mut self, patch: TextPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(font_family) = patch.font_family {
            self.font_family = font_family;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(text_align) = patch.text_align {
            self.text_align = text_align;
        }
        if let Some(styles) = patch.styles {
            self.styles = styles;
        }
    }
}

/// Partial update for a [`TextLayer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<Color>,
    pub text_align: Option<TextAlign>,
    /// `Some(None)` drops the style flags.
    pub styles: Option<Option<TextStyles>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_text_defaults() {
        let text = TextLayer::new("Hello", 24.0);
        assert_eq!(text.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(text.styles(), TextStyles::default());
        assert!(FONT_SIZES.contains(&DEFAULT_FONT_SIZE));
        assert!(FONT_FAMILIES.iter().any(|(name, _)| *name == DEFAULT_FONT_FAMILY));
    }

    #[test]
    fn test_patch_sets_and_clears_styles() {
        let mut text = TextLayer::new("Hello", 24.0);
        let bold = TextStyles { bold: true, ..Default::default() };
        text.apply(TextPatch {
            styles: Some(Some(bold)),
            text_align: Some(TextAlign::Center),
            ..Default::default()
        });
        assert_eq!(text.styles, Some(bold));
        assert_eq!(text.text_align, TextAlign::Center);

        // Untouched when the patch leaves styles out
        text.apply(TextPatch { text: Some("Bye".into()), ..Default::default() });
        assert_eq!(text.styles, Some(bold));

        text.apply(TextPatch { styles: Some(None), ..Default::default() });
        assert_eq!(text.styles, None);
        assert_eq!(text.text, "Bye");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let text: TextLayer = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(text.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(text.font_family, "Inter");
        assert_eq!(text.styles, None);
    }
}

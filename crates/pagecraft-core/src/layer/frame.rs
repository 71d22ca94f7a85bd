//! Frame layer payload.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Gradient presets for frame backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientStyle {
    Horizontal,
    Vertical,
    Diagonal,
    Radial,
}

impl GradientStyle {
    /// CSS background for this gradient between two colors.
    pub fn css(self, from: Color, to: Color) -> String {
        match self {
            GradientStyle::Horizontal => format!("linear-gradient(to right, {from}, {to})"),
            GradientStyle::Vertical => format!("linear-gradient(to bottom, {from}, {to})"),
            GradientStyle::Diagonal => {
                format!("linear-gradient(to bottom right, {from}, {to})")
            }
            GradientStyle::Radial => format!("radial-gradient(circle, {from}, {to})"),
        }
    }
}

/// Frame fill: a solid color or a gradient preset.
///
/// Both travel as a plain string; gradient names are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Background {
    Gradient(GradientStyle),
    Solid(Color),
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::white())
    }
}

impl From<Color> for Background {
    fn from(color: Color) -> Self {
        Background::Solid(color)
    }
}

impl From<GradientStyle> for Background {
    fn from(style: GradientStyle) -> Self {
        Background::Gradient(style)
    }
}

/// A container box with a background and optional image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameLayer {
    #[serde(default)]
    pub background: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl FrameLayer {
    pub fn new(background: impl Into<Background>) -> Self {
        Self {
            background: background.into(),
            padding: None,
            image: None,
        }
    }

    pub(crate) fn apply(&mut self, patch: FramePatch) {
        if let Some(background) = patch.background {
            self.background = background;
        }
        if let Some(padding) = patch.padding {
            self.padding = padding.map(|p| p.max(0.0));
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

/// Partial update for a [`FrameLayer`]. Optional fields take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePatch {
    pub background: Option<Background>,
    pub padding: Option<Option<f64>>,
    pub image: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_serde() {
        let gradient: Background = serde_json::from_str("\"radial\"").unwrap();
        assert_eq!(gradient, Background::Gradient(GradientStyle::Radial));

        let solid: Background = serde_json::from_str("\"#ff0000\"").unwrap();
        assert_eq!(solid, Background::Solid(Color::rgb(255, 0, 0)));

        assert_eq!(
            serde_json::to_string(&Background::Gradient(GradientStyle::Diagonal)).unwrap(),
            "\"diagonal\""
        );
        assert!(serde_json::from_str::<Background>("\"plaid\"").is_err());
    }

    #[test]
    fn test_gradient_css() {
        let css = GradientStyle::Horizontal.css(Color::black(), Color::white());
        assert_eq!(css, "linear-gradient(to right, #000000, #ffffff)");
    }

    #[test]
    fn test_patch() {
        let mut frame = FrameLayer::new(Color::white());
        frame.apply(FramePatch {
            background: Some(GradientStyle::Vertical.into()),
            padding: Some(Some(-4.0)),
            ..Default::default()
        });
        assert_eq!(frame.background, Background::Gradient(GradientStyle::Vertical));
        assert_eq!(frame.padding, Some(0.0));
        assert_eq!(frame.image, None);
    }
}

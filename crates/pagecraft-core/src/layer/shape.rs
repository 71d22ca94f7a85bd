//! Shape layer payload.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Built-in shape outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Pentagon,
    Hexagon,
    Octagon,
    Arrow,
    Star,
    Chat,
}

impl ShapeType {
    pub const ALL: [ShapeType; 9] = [
        ShapeType::Rectangle,
        ShapeType::Circle,
        ShapeType::Triangle,
        ShapeType::Pentagon,
        ShapeType::Hexagon,
        ShapeType::Octagon,
        ShapeType::Arrow,
        ShapeType::Star,
        ShapeType::Chat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "Rectangle",
            ShapeType::Circle => "Circle",
            ShapeType::Triangle => "Triangle",
            ShapeType::Pentagon => "Pentagon",
            ShapeType::Hexagon => "Hexagon",
            ShapeType::Octagon => "Octagon",
            ShapeType::Arrow => "Arrow",
            ShapeType::Star => "Star",
            ShapeType::Chat => "Chat",
        }
    }

    /// CSS clip path drawn when a shape carries no explicit `clipPath`.
    pub fn default_clip_path(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "inset(0)",
            ShapeType::Circle => "circle(50% at 50% 50%)",
            ShapeType::Triangle => "polygon(50% 0%, 100% 100%, 0% 100%)",
            ShapeType::Pentagon => "polygon(50% 0%, 100% 38%, 82% 100%, 18% 100%, 0% 38%)",
            ShapeType::Hexagon => {
                "polygon(25% 0%, 75% 0%, 100% 50%, 75% 100%, 25% 100%, 0% 50%)"
            }
            ShapeType::Octagon => {
                "polygon(30% 0%, 70% 0%, 100% 30%, 100% 70%, 70% 100%, 30% 100%, 0% 70%, 0% 30%)"
            }
            ShapeType::Arrow => {
                "polygon(0% 30%, 60% 30%, 60% 0%, 100% 50%, 60% 100%, 60% 70%, 0% 70%)"
            }
            ShapeType::Star => {
                "polygon(50% 0%, 61% 35%, 98% 35%, 68% 57%, 79% 91%, 50% 70%, 21% 91%, 32% 57%, 2% 35%, 39% 35%)"
            }
            ShapeType::Chat => {
                "polygon(0% 0%, 100% 0%, 100% 75%, 75% 75%, 75% 100%, 50% 75%, 0% 75%)"
            }
        }
    }
}

/// Outline stroke style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    None,
}

/// A filled geometric shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    #[serde(default)]
    pub shape_type: ShapeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<String>,
    #[serde(default = "Color::shape_default")]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
}

impl ShapeLayer {
    pub fn new(shape_type: ShapeType) -> Self {
        Self {
            shape_type,
            clip_path: None,
            color: Color::shape_default(),
            border_style: None,
            border_width: None,
            border_color: None,
        }
    }

    /// Clip path to render with: the explicit one, else the shape's default.
    pub fn effective_clip_path(&self) -> &str {
        self.clip_path
            .as_deref()
            .unwrap_or_else(|| self.shape_type.default_clip_path())
    }

    /// Whether a visible outline should be drawn.
    pub fn has_border(&self) -> bool {
        !matches!(self.border_style, None | Some(BorderStyle::None))
            && self.border_width.is_some_and(|w| w > 0.0)
    }

    pub(crate) fn apply(&mut self, patch: ShapePatch) {
        if let Some(shape_type) = patch.shape_type {
            self.shape_type = shape_type;
        }
        if let Some(clip_path) = patch.clip_path {
            self.clip_path = clip_path;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(border_style) = patch.border_style {
            self.border_style = border_style;
        }
        if let Some(border_width) = patch.border_width {
            self.border_width = border_width.map(|w| w.max(0.0));
        }
        if let Some(border_color) = patch.border_color {
            self.border_color = border_color;
        }
    }
}

/// Partial update for a [`ShapeLayer`]. Optional fields take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePatch {
    pub shape_type: Option<ShapeType>,
    pub clip_path: Option<Option<String>>,
    pub color: Option<Color>,
    pub border_style: Option<Option<BorderStyle>>,
    pub border_width: Option<Option<f64>>,
    pub border_color: Option<Option<Color>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_clip_path() {
        let mut star = ShapeLayer::new(ShapeType::Star);
        assert!(star.effective_clip_path().starts_with("polygon("));

        star.apply(ShapePatch {
            clip_path: Some(Some("circle(40%)".into())),
            ..Default::default()
        });
        assert_eq!(star.effective_clip_path(), "circle(40%)");
    }

    #[test]
    fn test_every_shape_has_clip_path() {
        for shape in ShapeType::ALL {
            assert!(!shape.default_clip_path().is_empty(), "{}", shape.name());
        }
    }

    #[test]
    fn test_border_visibility() {
        let mut shape = ShapeLayer::new(ShapeType::Rectangle);
        assert!(!shape.has_border());

        shape.apply(ShapePatch {
            border_style: Some(Some(BorderStyle::Dashed)),
            border_width: Some(Some(2.0)),
            ..Default::default()
        });
        assert!(shape.has_border());

        shape.apply(ShapePatch {
            border_style: Some(Some(BorderStyle::None)),
            ..Default::default()
        });
        assert!(!shape.has_border());
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(ShapeLayer::new(ShapeType::Hexagon)).unwrap();
        assert_eq!(json["shapeType"], "hexagon");
        assert_eq!(json["color"], "#4f46e5");
        assert!(json.get("clipPath").is_none());
    }
}

//! Layers: the placeable elements of a page.
//!
//! Every layer shares a base (id, box, opacity, z-index, hierarchy hooks) and
//! carries one variant payload. Layers are changed through [`LayerPatch`],
//! which can never alter the id or the variant.

mod frame;
mod image;
mod shape;
mod text;

pub use frame::{Background, FrameLayer, FramePatch, GradientStyle};
pub use image::{ImageFormat, ImageLayer, ImagePatch};
pub use shape::{BorderStyle, ShapeLayer, ShapePatch, ShapeType};
pub use text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FONT_FAMILIES, FONT_SIZES, LINE_HEIGHT, TextAlign,
    TextLayer, TextPatch, TextStyles,
};

use crate::geometry::BoxData;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unique identifier for layers.
pub type LayerId = String;

/// Generate a fresh layer id.
pub fn generate_layer_id() -> LayerId {
    Uuid::new_v4().to_string()
}

/// Where newly created layers are placed on the page.
pub const DEFAULT_LAYER_POSITION: Point = Point::new(100.0, 100.0);

/// Offset applied to a duplicated layer.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Discriminant of a layer's variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Text,
    Image,
    Shape,
    Frame,
}

impl LayerType {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerType::Text => "text",
            LayerType::Image => "image",
            LayerType::Shape => "shape",
            LayerType::Frame => "frame",
        }
    }
}

/// Variant payload of a layer. Serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    Text(TextLayer),
    Image(ImageLayer),
    Shape(ShapeLayer),
    Frame(FrameLayer),
}

impl LayerKind {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerKind::Text(_) => LayerType::Text,
            LayerKind::Image(_) => LayerType::Image,
            LayerKind::Shape(_) => LayerType::Shape,
            LayerKind::Frame(_) => LayerType::Frame,
        }
    }
}

fn default_opacity() -> f64 {
    1.0
}

fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        1.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

fn deserialize_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_opacity)
}

/// A placeable design element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default)]
    pub(crate) id: LayerId,
    pub box_data: BoxData,
    #[serde(
        default = "default_opacity",
        deserialize_with = "deserialize_opacity"
    )]
    opacity: f64,
    /// Paint order key; ties are broken by insertion order on the page.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<LayerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayerId>,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    /// Create a layer with a generated id.
    pub fn new(box_data: BoxData, kind: LayerKind) -> Self {
        Self::with_id(generate_layer_id(), box_data, kind)
    }

    /// Create a layer with a caller-chosen id.
    pub fn with_id(id: impl Into<LayerId>, box_data: BoxData, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            box_data,
            opacity: 1.0,
            z_index: 0,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// A text layer at the default position, sized for one line.
    pub fn text(text: impl Into<String>, font_size: f64) -> Self {
        let size = Size::new(300.0, font_size * LINE_HEIGHT);
        Self::new(
            BoxData::new(DEFAULT_LAYER_POSITION, size),
            LayerKind::Text(TextLayer::new(text, font_size)),
        )
    }

    /// A 300x200 image layer.
    pub fn image(url: impl Into<String>) -> Self {
        Self::new(
            BoxData::new(DEFAULT_LAYER_POSITION, Size::new(300.0, 200.0)),
            LayerKind::Image(ImageLayer::new(url)),
        )
    }

    /// A 100x100 shape layer.
    pub fn shape(shape_type: ShapeType) -> Self {
        Self::new(
            BoxData::new(DEFAULT_LAYER_POSITION, Size::new(100.0, 100.0)),
            LayerKind::Shape(ShapeLayer::new(shape_type)),
        )
    }

    /// A 300x200 frame layer.
    pub fn frame(background: impl Into<Background>) -> Self {
        Self::new(
            BoxData::new(DEFAULT_LAYER_POSITION, Size::new(300.0, 200.0)),
            LayerKind::Frame(FrameLayer::new(background)),
        )
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// The layer's id. Fixed for the layer's lifetime.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Label shown in the layer panel.
    ///
    /// Text layers show up to their first 15 characters, shapes their type
    /// and images "Image".
    pub fn display_name(&self) -> String {
        match &self.kind {
            LayerKind::Text(text) if !text.text.is_empty() => {
                text.text.chars().take(15).collect()
            }
            LayerKind::Text(_) => "Text Layer".to_string(),
            LayerKind::Shape(shape) => shape.shape_type.name().to_string(),
            LayerKind::Image(_) => "Image".to_string(),
            LayerKind::Frame(_) => "Layer".to_string(),
        }
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
    }

    /// Only image layers keep their aspect ratio while resizing.
    pub fn locks_aspect_ratio(&self) -> bool {
        matches!(self.kind, LayerKind::Image(_))
    }

    /// A copy with a new id, offset by [`DUPLICATE_OFFSET`].
    pub fn duplicate(&self) -> Layer {
        let mut copy = self.clone();
        copy.id = generate_layer_id();
        copy.box_data.position += DUPLICATE_OFFSET;
        copy
    }

    /// Text payload, if this is a text layer.
    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeLayer> {
        match &self.kind {
            LayerKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameLayer> {
        match &self.kind {
            LayerKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Merge a patch into this layer.
    ///
    /// Base fields always apply. The variant patch applies only when its kind
    /// matches this layer; otherwise it is dropped.
    pub fn apply(&mut self, patch: LayerPatch) {
        if let Some(box_data) = patch.box_data {
            self.box_data = box_data;
        }
        if let Some(opacity) = patch.opacity {
            self.set_opacity(opacity);
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(parent) = patch.parent {
            self.parent = parent;
        }
        if let Some(children) = patch.children {
            self.children = children;
        }

        match (&mut self.kind, patch.kind) {
            (_, None) => {}
            (LayerKind::Text(layer), Some(KindPatch::Text(p))) => layer.apply(p),
            (LayerKind::Image(layer), Some(KindPatch::Image(p))) => layer.apply(p),
            (LayerKind::Shape(layer), Some(KindPatch::Shape(p))) => layer.apply(p),
            (LayerKind::Frame(layer), Some(KindPatch::Frame(p))) => layer.apply(p),
            (_, Some(_)) => {}
        }
    }
}

/// Variant-specific part of a [`LayerPatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum KindPatch {
    Text(TextPatch),
    Image(ImagePatch),
    Shape(ShapePatch),
    Frame(FramePatch),
}

/// Partial update of a layer. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    /// New position, size and rotation.
    pub box_data: Option<BoxData>,
    /// New opacity, clamped to `0..=1` when applied.
    pub opacity: Option<f64>,
    /// New stacking key.
    pub z_index: Option<i64>,
    /// New parent; `Some(None)` detaches the layer.
    pub parent: Option<Option<LayerId>>,
    /// New child list.
    pub children: Option<Vec<LayerId>>,
    /// Variant fields. Ignored when the variant does not match the layer.
    pub kind: Option<KindPatch>,
}

impl LayerPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position, size and rotation.
    pub fn with_box_data(mut self, box_data: BoxData) -> Self {
        self.box_data = Some(box_data);
        self
    }

    /// Set the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set the stacking key.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Set or clear the parent.
    pub fn with_parent(mut self, parent: Option<LayerId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Replace the child list.
    pub fn with_children(mut self, children: Vec<LayerId>) -> Self {
        self.children = Some(children);
        self
    }

    /// Patch text fields.
    pub fn with_text(mut self, patch: TextPatch) -> Self {
        self.kind = Some(KindPatch::Text(patch));
        self
    }

    /// Patch image fields.
    pub fn with_image(mut self, patch: ImagePatch) -> Self {
        self.kind = Some(KindPatch::Image(patch));
        self
    }

    /// Patch shape fields.
    pub fn with_shape(mut self, patch: ShapePatch) -> Self {
        self.kind = Some(KindPatch::Shape(patch));
        self
    }

    /// Patch frame fields.
    pub fn with_frame(mut self, patch: FramePatch) -> Self {
        self.kind = Some(KindPatch::Frame(patch));
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

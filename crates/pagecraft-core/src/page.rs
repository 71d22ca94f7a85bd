//! The page: the single document holding all layers.

use crate::layer::{Layer, LayerId};
use kurbo::{Point, Size};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_PAGE_NAME: &str = "My design";
pub const DEFAULT_PAGE_SIZE: Size = Size::new(800.0, 600.0);

/// Layers keyed by id, remembering insertion order.
///
/// Serialized as a JSON object in insertion order. When deserializing, the
/// map key is the layer's id, whatever the entry's own `id` says.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMap {
    layers: HashMap<LayerId, Layer>,
    order: Vec<LayerId>,
}

impl LayerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.get_mut(id)
    }

    /// Insert a layer keyed by its id.
    ///
    /// A layer with the same id is replaced in place and returned; its
    /// insertion position is kept.
    pub fn insert(&mut self, layer: Layer) -> Option<Layer> {
        let id = layer.id().to_string();
        let previous = self.layers.insert(id.clone(), layer);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn remove(&mut self, id: &str) -> Option<Layer> {
        let removed = self.layers.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Layer ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &LayerId> {
        self.order.iter()
    }

    /// Layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    /// Layers sorted for painting: `z_index` ascending, ties in insertion order.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.iter().collect();
        // Stable sort keeps insertion order among equal keys
        layers.sort_by_key(|layer| layer.z_index);
        layers
    }

    /// Z-index that places a new layer above every existing one.
    pub fn next_z_index(&self) -> i64 {
        self.layers
            .values()
            .map(|layer| layer.z_index)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Topmost layer containing the page-space point.
    pub fn layer_at(&self, point: Point) -> Option<&Layer> {
        self.layers_at(point).into_iter().next()
    }

    /// All layers containing the point, topmost first.
    pub fn layers_at(&self, point: Point) -> Vec<&Layer> {
        let mut hits: Vec<&Layer> = self
            .paint_order()
            .into_iter()
            .filter(|layer| layer.box_data.contains(point))
            .collect();
        hits.reverse();
        hits
    }
}

impl FromIterator<Layer> for LayerMap {
    fn from_iter<T: IntoIterator<Item = Layer>>(iter: T) -> Self {
        let mut map = LayerMap::new();
        for layer in iter {
            map.insert(layer);
        }
        map
    }
}

impl Serialize for LayerMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for layer in self.iter() {
            map.serialize_entry(layer.id(), layer)?;
        }
        map.end()
    }
}

struct LayerMapVisitor;

impl<'de> Visitor<'de> for LayerMapVisitor {
    type Value = LayerMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of layer id to layer")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = LayerMap::new();
        while let Some((key, mut layer)) = access.next_entry::<LayerId, Layer>()? {
            layer.id = key;
            map.insert(layer);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for LayerMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LayerMapVisitor)
    }
}

/// The design document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub notes: String,
    pub size: Size,
    #[serde(default)]
    pub layers: LayerMap,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NAME, DEFAULT_PAGE_SIZE)
    }
}

impl Page {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            notes: String::new(),
            size,
            layers: LayerMap::new(),
        }
    }

    /// Shallow merge: every set field replaces the page's field wholesale.
    pub fn apply(&mut self, patch: PagePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(layers) = patch.layers {
            self.layers = layers;
        }
    }
}

/// Partial update of a [`Page`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePatch {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub size: Option<Size>,
    pub layers: Option<LayerMap>,
}

impl PagePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Default::default()
        }
    }

    pub fn layers(layers: LayerMap) -> Self {
        Self {
            layers: Some(layers),
            ..Default::default()
        }
    }
}

//! Pointer and keyboard interactions built on top of the store.
//!
//! Every helper here brackets its edit with exactly one `saveToHistory`, taken
//! before the first change, so one undo reverts the whole interaction.

use crate::config::clamp_scale;
use crate::geometry::{BoxData, Direction, HANDLE_HIT_TOLERANCE};
use crate::layer::{Layer, LayerId, LayerPatch};
use crate::state::EditorState;
use crate::store::EditorStore;
use kurbo::{Point, Vec2};

/// Arrow-key nudge distance.
pub const NUDGE_STEP: f64 = 1.0;
/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;
/// Scale change per ctrl + wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;
/// Z-index spacing assigned by the layer panel.
pub const LAYER_PANEL_Z_STEP: i64 = 10;

/// An in-progress move of the selected layers.
#[derive(Debug, Clone)]
pub struct DragGesture {
    start_point: Point,
    scale: f64,
    /// Box of each moved layer at pointer-down.
    original_boxes: Vec<(LayerId, BoxData)>,
}

impl DragGesture {
    /// Pointer-down on a layer.
    ///
    /// An unselected layer becomes the selection (or joins it when
    /// `extend_selection` is set). Returns `None` if the layer does not exist.
    pub fn begin(
        store: &mut EditorStore,
        layer_id: &str,
        cursor: Point,
        extend_selection: bool,
    ) -> Option<Self> {
        if !store.state().page().layers.contains(layer_id) {
            return None;
        }
        if !store.state().is_selected(layer_id) {
            if !extend_selection {
                store.deselect_all_layers();
            }
            store.select_layer(layer_id);
        }

        store.save_to_history();

        let state = store.state();
        let original_boxes = state
            .selected_layers()
            .map(|layer| (layer.id().to_string(), layer.box_data))
            .collect();
        Some(Self {
            start_point: cursor,
            scale: state.scale(),
            original_boxes,
        })
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &LayerId> {
        self.original_boxes.iter().map(|(id, _)| id)
    }

    /// Page-space movement for the given cursor position.
    pub fn delta(&self, cursor: Point) -> Vec2 {
        (cursor - self.start_point) / self.scale
    }

    /// Pointer-move: place every dragged layer relative to where it started.
    pub fn update(&self, store: &mut EditorStore, cursor: Point) {
        for (id, original) in &self.original_boxes {
            let moved = original.moved(self.start_point, cursor, self.scale);
            store.update_layer(id.as_str(), LayerPatch::new().with_box_data(moved));
        }
    }

    /// Pointer-up. The last update is final.
    pub fn finish(self) {}
}

/// An in-progress resize of one layer by one handle.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    layer_id: LayerId,
    direction: Direction,
    start_point: Point,
    scale: f64,
    original: BoxData,
    lock_allowed: bool,
}

impl ResizeGesture {
    /// Pointer-down on a resize handle. Returns `None` if the layer does not exist.
    pub fn begin(
        store: &mut EditorStore,
        layer_id: &str,
        direction: Direction,
        cursor: Point,
    ) -> Option<Self> {
        let layer = store.state().page().layers.get(layer_id)?;
        let original = layer.box_data;
        let lock_allowed = layer.locks_aspect_ratio();
        let scale = store.state().scale();

        store.save_to_history();

        Some(Self {
            layer_id: layer_id.to_string(),
            direction,
            start_point: cursor,
            scale,
            original,
            lock_allowed,
        })
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Box for the given cursor. `keep_aspect` only affects image layers.
    pub fn resized_box(&self, cursor: Point, keep_aspect: bool) -> BoxData {
        self.original.resized(
            self.direction,
            self.start_point,
            cursor,
            self.scale,
            keep_aspect && self.lock_allowed,
        )
    }

    /// Pointer-move.
    pub fn update(&self, store: &mut EditorStore, cursor: Point, keep_aspect: bool) {
        let resized = self.resized_box(cursor, keep_aspect);
        store.update_layer(
            self.layer_id.as_str(),
            LayerPatch::new().with_box_data(resized),
        );
    }

    pub fn finish(self) {}
}

/// An in-progress rotation of one layer around its center.
#[derive(Debug, Clone)]
pub struct RotateGesture {
    layer_id: LayerId,
    original: BoxData,
}

impl RotateGesture {
    pub fn begin(store: &mut EditorStore, layer_id: &str) -> Option<Self> {
        let original = store.state().page().layers.get(layer_id)?.box_data;
        store.save_to_history();
        Some(Self {
            layer_id: layer_id.to_string(),
            original,
        })
    }

    /// Pointer-move: point the layer's top at the cursor (page space).
    pub fn update(&self, store: &mut EditorStore, cursor: Point, snap: bool) {
        let rotated = self
            .original
            .with_rotation(self.original.rotation_toward(cursor, snap));
        store.update_layer(
            self.layer_id.as_str(),
            LayerPatch::new().with_box_data(rotated),
        );
    }

    pub fn finish(self) {}
}

/// Find the resize handle of a selected layer under a page-space point.
///
/// The hit tolerance is constant in screen pixels, so it shrinks in page
/// units as the viewport zooms in.
pub fn handle_at(state: &EditorState, point: Point) -> Option<(LayerId, Direction)> {
    let tolerance = HANDLE_HIT_TOLERANCE / state.scale();
    state.selected_layers().find_map(|layer| {
        layer
            .box_data
            .hit_test_handles(point, tolerance)
            .map(|direction| (layer.id().to_string(), direction))
    })
}

/// Arrow keys that move the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowKey {
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(ArrowKey::Up),
            "ArrowDown" => Some(ArrowKey::Down),
            "ArrowLeft" => Some(ArrowKey::Left),
            "ArrowRight" => Some(ArrowKey::Right),
            _ => None,
        }
    }

    fn unit(self) -> Vec2 {
        match self {
            ArrowKey::Up => Vec2::new(0.0, -1.0),
            ArrowKey::Down => Vec2::new(0.0, 1.0),
            ArrowKey::Left => Vec2::new(-1.0, 0.0),
            ArrowKey::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Move every selected layer by one nudge step. Returns false with no selection.
pub fn nudge_selection(store: &mut EditorStore, key: ArrowKey, large: bool) -> bool {
    let step = if large { NUDGE_STEP_LARGE } else { NUDGE_STEP };
    let offset = key.unit() * step;

    let moves: Vec<(LayerId, BoxData)> = store
        .state()
        .selected_layers()
        .map(|layer| {
            let mut moved = layer.box_data;
            moved.position += offset;
            (layer.id().to_string(), moved)
        })
        .collect();
    if moves.is_empty() {
        return false;
    }

    store.save_to_history();
    for (id, moved) in moves {
        store.update_layer(id, LayerPatch::new().with_box_data(moved));
    }
    true
}

/// Add a freshly created layer above every existing one and select it.
pub fn add_new_layer(store: &mut EditorStore, layer: Layer) -> LayerId {
    let z_index = store.state().page().layers.next_z_index();
    store.save_to_history();
    store.add_layer(layer.with_z_index(z_index))
}

/// Duplicate every selected layer as one undoable step.
///
/// Copies are offset, stacked above all layers in selection order, and
/// become the new selection. Returns their ids.
pub fn duplicate_selected(store: &mut EditorStore) -> Vec<LayerId> {
    let copies: Vec<Layer> = store.state().selected_layers().map(Layer::duplicate).collect();
    if copies.is_empty() {
        return Vec::new();
    }

    let base_z = store.state().page().layers.next_z_index();
    store.save_to_history();
    let ids: Vec<LayerId> = copies
        .into_iter()
        .zip(base_z..)
        .map(|(copy, z_index)| store.add_layer(copy.with_z_index(z_index)))
        .collect();

    // add_layer leaves only the last copy selected
    store.deselect_all_layers();
    for id in &ids {
        store.select_layer(id.as_str());
    }
    ids
}

/// Delete a layer as one undoable step.
pub fn delete_layer(store: &mut EditorStore, id: &str) -> bool {
    if !store.state().page().layers.contains(id) {
        return false;
    }
    store.save_to_history();
    store.delete_layer(id);
    true
}

/// Layers as listed in the layer panel: topmost first.
pub fn layer_panel_order(state: &EditorState) -> Vec<&Layer> {
    let mut layers = state.page().layers.paint_order();
    layers.reverse();
    layers
}

/// Apply a layer panel ordering (topmost first) by rewriting z-indices.
///
/// Unknown ids are skipped.
pub fn reorder_layers(store: &mut EditorStore, top_to_bottom: &[LayerId]) {
    let known: Vec<&LayerId> = top_to_bottom
        .iter()
        .filter(|id| store.state().page().layers.contains(id))
        .collect();
    if known.is_empty() {
        return;
    }

    let count = known.len() as i64;
    let updates: Vec<(LayerId, i64)> = known
        .into_iter()
        .enumerate()
        .map(|(index, id)| (id.clone(), (count - index as i64) * LAYER_PANEL_Z_STEP))
        .collect();

    store.save_to_history();
    for (id, z_index) in updates {
        store.update_layer(id, LayerPatch::new().with_z_index(z_index));
    }
}

/// Ctrl + wheel zoom: scrolling down zooms out by one step.
pub fn wheel_zoom(store: &mut EditorStore, wheel_delta_y: f64) {
    let step = if wheel_delta_y > 0.0 {
        -WHEEL_ZOOM_STEP
    } else {
        WHEEL_ZOOM_STEP
    };
    if let Some(scale) = clamp_scale(store.state().scale() + step) {
        store.set_scale(scale);
    }
}

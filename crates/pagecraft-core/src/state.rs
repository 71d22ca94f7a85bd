//! Editor state and snapshot history.

use crate::config::{EditorConfig, clamp_scale};
use crate::layer::{Layer, LayerId};
use crate::page::Page;
use serde::{Deserialize, Serialize};

/// A copy of the editor state without its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The document.
    pub page: Page,
    /// Selected layer ids in selection order.
    pub selected_layer_ids: Vec<LayerId>,
    /// Layer under the pointer, if any.
    pub hovered_layer: Option<LayerId>,
    /// Viewport zoom.
    pub scale: f64,
    /// Active side bar panel.
    pub side_bar_tab: Option<String>,
    pub settings_open: bool,
    /// Legacy page-independent notes.
    pub notes: String,
    pub notes_open: bool,
    pub side_bar_open: bool,
}

/// Undo and redo stacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    /// Maximum number of undo steps kept (unbounded if `None`).
    limit: Option<usize>,
}

impl History {
    /// Create empty stacks keeping at most `limit` undo steps.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Undo stack, oldest first.
    pub fn past(&self) -> &[Snapshot] {
        &self.past
    }

    /// Redo stack, most recently undone last.
    pub fn future(&self) -> &[Snapshot] {
        &self.future
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Push a snapshot onto the undo stack and discard the redo stack.
    pub fn save(&mut self, current: Snapshot) {
        self.push_past(current);
        self.future.clear();
    }

    /// Pop the latest undo snapshot, parking `current` on the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Pop the latest redo snapshot, parking `current` on the undo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.push_past(current);
        Some(next)
    }

    fn push_past(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        if let Some(limit) = self.limit {
            let overflow = self.past.len().saturating_sub(limit);
            if overflow > 0 {
                self.past.drain(..overflow);
            }
        }
    }
}

/// Everything the editor UI renders from.
///
/// Fields are read through accessors; changes go through intents.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub(crate) page: Page,
    pub(crate) selected_layer_ids: Vec<LayerId>,
    pub(crate) hovered_layer: Option<LayerId>,
    pub(crate) scale: f64,
    pub(crate) side_bar_tab: Option<String>,
    pub(crate) settings_open: bool,
    /// Legacy page-independent notes.
    pub(crate) notes: String,
    pub(crate) notes_open: bool,
    pub(crate) side_bar_open: bool,
    pub(crate) history: History,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl EditorState {
    /// Initial state: an empty page sized and named from `config`.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            page: Page::new(config.page_name.clone(), config.page_size),
            selected_layer_ids: Vec::new(),
            hovered_layer: None,
            scale: clamp_scale(config.scale).unwrap_or(1.0),
            side_bar_tab: None,
            settings_open: false,
            notes: String::new(),
            notes_open: false,
            side_bar_open: config.side_bar_open,
            history: History::new(config.history_limit),
        }
    }

    /// The document being edited.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Selected layer ids in selection order.
    pub fn selected_layer_ids(&self) -> &[LayerId] {
        &self.selected_layer_ids
    }

    /// Check if a layer is part of the selection.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_layer_ids.iter().any(|selected| selected == id)
    }

    /// The first selected layer, which toolbars edit.
    pub fn primary_selection(&self) -> Option<&Layer> {
        self.selected_layer_ids
            .first()
            .and_then(|id| self.page.layers.get(id))
    }

    /// Selected layers in selection order.
    pub fn selected_layers(&self) -> impl Iterator<Item = &Layer> {
        self.selected_layer_ids
            .iter()
            .filter_map(|id| self.page.layers.get(id))
    }

    /// Id of the layer under the pointer.
    pub fn hovered_layer(&self) -> Option<&str> {
        self.hovered_layer.as_deref()
    }

    /// Viewport zoom, always within `[MIN_SCALE, MAX_SCALE]`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Active side bar panel, if one is open.
    pub fn side_bar_tab(&self) -> Option<&str> {
        self.side_bar_tab.as_deref()
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Legacy notes. Prefer `page().notes` when it is set.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn notes_open(&self) -> bool {
        self.notes_open
    }

    pub fn side_bar_open(&self) -> bool {
        self.side_bar_open
    }

    /// Undo and redo stacks.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Copy everything but the history.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            page: self.page.clone(),
            selected_layer_ids: self.selected_layer_ids.clone(),
            hovered_layer: self.hovered_layer.clone(),
            scale: self.scale,
            side_bar_tab: self.side_bar_tab.clone(),
            settings_open: self.settings_open,
            notes: self.notes.clone(),
            notes_open: self.notes_open,
            side_bar_open: self.side_bar_open,
        }
    }

    /// Replace everything but the history.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            page,
            selected_layer_ids,
            hovered_layer,
            scale,
            side_bar_tab,
            settings_open,
            notes,
            notes_open,
            side_bar_open,
        } = snapshot;
        self.page = page;
        self.selected_layer_ids = selected_layer_ids;
        self.hovered_layer = hovered_layer;
        self.scale = scale;
        self.side_bar_tab = side_bar_tab;
        self.settings_open = settings_open;
        self.notes = notes;
        self.notes_open = notes_open;
        self.side_bar_open = side_bar_open;
    }

    /// Drop selection and hover ids that no longer name a layer.
    pub(crate) fn prune_stale_ids(&mut self) {
        let layers = &self.page.layers;
        self.selected_layer_ids.retain(|id| layers.contains(id));
        if self
            .hovered_layer
            .as_deref()
            .is_some_and(|id| !layers.contains(id))
        {
            self.hovered_layer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::ShapeType;

    fn snapshot_named(name: &str) -> Snapshot {
        let mut state = EditorState::default();
        state.page.name = name.to_string();
        state.snapshot()
    }

    #[test]
    fn test_initial_state() {
        let state = EditorState::default();
        assert_eq!(state.page().name, "My design");
        assert_eq!(state.scale(), 1.0);
        assert!(state.side_bar_open());
        assert!(!state.settings_open());
        assert!(state.selected_layer_ids().is_empty());
        assert!(!state.history().can_undo());
        assert!(!state.history().can_redo());
    }

    #[test]
    fn test_save_clears_future() {
        let mut history = History::default();
        history.save(snapshot_named("a"));
        let restored = history.undo(snapshot_named("b")).unwrap();
        assert_eq!(restored.page.name, "a");
        assert!(history.can_redo());

        history.save(snapshot_named("c"));
        assert!(!history.can_redo());
        assert_eq!(history.past().len(), 1);
    }

    #[test]
    fn test_undo_redo_guarded() {
        let mut history = History::default();
        assert!(history.undo(snapshot_named("x")).is_none());
        assert!(history.redo(snapshot_named("x")).is_none());
        assert!(history.past().is_empty());
        assert!(history.future().is_empty());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(Some(2));
        for name in ["one", "two", "three"] {
            history.save(snapshot_named(name));
        }
        let names: Vec<&str> = history.past().iter().map(|s| s.page.name.as_str()).collect();
        assert_eq!(names, vec!["two", "three"]);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut state = EditorState::default();
        let before = state.snapshot();

        let layer = Layer::shape(ShapeType::Circle);
        let id = layer.id().to_string();
        state.page.layers.insert(layer);
        state.selected_layer_ids.push(id.clone());
        state.scale = 2.0;
        assert_ne!(state.snapshot(), before);

        state.restore(before.clone());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_prune_stale_ids() {
        let mut state = EditorState::default();
        let layer = Layer::shape(ShapeType::Circle);
        let id = layer.id().to_string();
        state.page.layers.insert(layer);
        state.selected_layer_ids = vec![id.clone(), "ghost".into()];
        state.hovered_layer = Some("ghost".into());

        state.prune_stale_ids();
        assert_eq!(state.selected_layer_ids(), &[id]);
        assert_eq!(state.hovered_layer(), None);
    }
}

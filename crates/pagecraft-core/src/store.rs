//! The editor store: sole owner of [`EditorState`].
//!
//! Collaborators hold a `&mut EditorStore`, call intents on it, and re-render
//! from [`EditorStore::state`] when notified.

use crate::action::{Action, reduce};
use crate::config::EditorConfig;
use crate::design::{self, DesignError, ImportedDesign};
use crate::layer::{Layer, LayerId, LayerPatch};
use crate::page::PagePatch;
use crate::state::EditorState;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Handle returned by [`EditorStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&EditorState)>;

/// Owns the editor state and the callbacks watching it.
pub struct EditorStore {
    state: EditorState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EditorStore {
    /// Create a store holding the initial state for `config`.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            state: EditorState::new(&config),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current state, for rendering.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Apply an intent, notifying subscribers if the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let changed = reduce(&mut self.state, action);
        if changed {
            self.notify();
        }
        changed
    }

    /// Register a callback run after every state change.
    pub fn subscribe(&mut self, callback: impl FnMut(&EditorState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Drop all subscribers and hand back the final state.
    pub fn dispose(self) -> EditorState {
        log::debug!("Disposing store with {} subscribers", self.subscribers.len());
        self.state
    }

    fn notify(&mut self) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state);
        }
    }

    /// Switch the side bar panel (`None` closes it).
    pub fn set_sidebar_tab(&mut self, tab: Option<String>) {
        self.dispatch(Action::SetSidebarTab(tab));
    }

    /// Show or hide the settings panel.
    pub fn set_settings_open(&mut self, open: bool) {
        self.dispatch(Action::SetSettingsOpen(open));
    }

    /// Expand or collapse the side bar.
    pub fn set_sidebar_open(&mut self, open: bool) {
        self.dispatch(Action::SetSidebarOpen(open));
    }

    /// Add a layer to the selection. Unknown ids are ignored.
    pub fn select_layer(&mut self, id: impl Into<LayerId>) {
        self.dispatch(Action::SelectLayer(id.into()));
    }

    /// Remove a layer from the selection.
    pub fn deselect_layer(&mut self, id: impl Into<LayerId>) {
        self.dispatch(Action::DeselectLayer(id.into()));
    }

    /// Clear the selection.
    pub fn deselect_all_layers(&mut self) {
        self.dispatch(Action::DeselectAll);
    }

    /// Set the viewport zoom, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn set_scale(&mut self, scale: f64) {
        self.dispatch(Action::SetScale(scale));
    }

    /// Insert a layer and select it. Returns its id.
    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id().to_string();
        self.dispatch(Action::AddLayer(layer));
        id
    }

    /// Apply a patch to one layer.
    pub fn update_layer(&mut self, id: impl Into<LayerId>, patch: LayerPatch) {
        self.dispatch(Action::UpdateLayer {
            id: id.into(),
            patch,
        });
    }

    /// Remove a layer, dropping it from the selection and hover.
    pub fn delete_layer(&mut self, id: impl Into<LayerId>) {
        self.dispatch(Action::DeleteLayer(id.into()));
    }

    /// Show or hide the notes panel.
    pub fn toggle_notes(&mut self) {
        self.dispatch(Action::ToggleNotes);
    }

    /// Replace the legacy notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.dispatch(Action::SetNotes(notes.into()));
    }

    /// Mark the layer under the pointer.
    pub fn hover_layer(&mut self, id: Option<LayerId>) {
        self.dispatch(Action::HoverLayer(id));
    }

    /// Record the current state as an undo step and clear redo.
    pub fn save_to_history(&mut self) {
        self.dispatch(Action::SaveHistory);
    }

    /// Step back one snapshot. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.dispatch(Action::Undo)
    }

    /// Step forward one snapshot. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.dispatch(Action::Redo)
    }

    /// Replace the page with an imported design, recording an undo step.
    pub fn import_design(&mut self, design: ImportedDesign) {
        self.dispatch(Action::ImportDesign(design));
    }

    /// Shallow-merge page fields.
    pub fn update_page_state(&mut self, patch: PagePatch) {
        self.dispatch(Action::UpdatePageState(patch));
    }

    /// Export the current design as packed JSON.
    pub fn export_json(&self) -> Result<String, DesignError> {
        design::export_design(&self.state).inspect_err(|e| {
            log::error!("Failed to export design: {e}");
        })
    }

    /// Parse packed JSON and import it. The state is untouched on error.
    pub fn import_json(&mut self, json: &str) -> Result<(), DesignError> {
        let design = design::import_design(json).inspect_err(|e| {
            log::error!("Failed to import design: {e}");
        })?;
        self.import_design(design);
        Ok(())
    }

    /// Save the exported design into `dir`, named after the page.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_design_to_dir(&self, dir: &Path) -> Result<PathBuf, DesignError> {
        design::save_design_to_dir(&self.state, dir).inspect_err(|e| {
            log::error!("Failed to save design to {}: {e}", dir.display());
        })
    }

    /// Load a design file and import it. The state is untouched on error.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_design_file(&mut self, path: &Path) -> Result<(), DesignError> {
        let design = design::load_design_file(path).inspect_err(|e| {
            log::error!("Failed to load design from {}: {e}", path.display());
        })?;
        self.import_design(design);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{ShapeType, TextPatch};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_text_opacity_scenario() {
        init_logger();
        let mut store = EditorStore::default();

        let a = store.add_layer(Layer::text("A", 24.0));
        assert_eq!(store.state().selected_layer_ids(), &[a.clone()]);

        store.save_to_history();
        store.update_layer(&a, LayerPatch::new().with_opacity(0.5));
        let opacity = |store: &EditorStore| store.state().page().layers.get(&a).unwrap().opacity();
        assert_eq!(opacity(&store), 0.5);

        assert!(store.undo());
        assert_eq!(opacity(&store), 1.0);
        assert!(store.redo());
        assert_eq!(opacity(&store), 0.5);
    }

    #[test]
    fn test_subscribers_notified_on_change_only() {
        let mut store = EditorStore::default();
        let calls = Rc::new(Cell::new(0));
        let seen_scale = Rc::new(RefCell::new(Vec::new()));

        let counter = Rc::clone(&calls);
        let scales = Rc::clone(&seen_scale);
        let id = store.subscribe(move |state| {
            counter.set(counter.get() + 1);
            scales.borrow_mut().push(state.scale());
        });

        store.set_scale(2.0);
        store.set_scale(2.0);
        store.select_layer("missing");
        assert_eq!(calls.get(), 1);
        assert_eq!(*seen_scale.borrow(), vec![2.0]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_scale(3.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_dispose_returns_final_state() {
        let mut store = EditorStore::default();
        store.subscribe(|_| {});
        let id = store.add_layer(Layer::shape(ShapeType::Hexagon));
        let state = store.dispose();
        assert!(state.page().layers.contains(&id));
    }

    #[test]
    fn test_failed_import_leaves_state_untouched() {
        init_logger();
        let mut store = EditorStore::default();
        store.add_layer(Layer::text("keep", 16.0));
        let before = store.state().clone();

        assert!(store.import_json("{\"a\": \"no size\"}").is_err());
        assert!(store.import_json("not json").is_err());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_export_import_through_store() {
        let mut source = EditorStore::default();
        let id = source.add_layer(Layer::text("hello", 32.0));
        source.update_layer(
            &id,
            LayerPatch::new().with_text(TextPatch {
                text: Some("hello world".into()),
                ..Default::default()
            }),
        );
        source.set_notes("remember the logo");
        let json = source.export_json().unwrap();

        let mut target = EditorStore::default();
        target.import_json(&json).unwrap();
        assert_eq!(target.state().page().layers, source.state().page().layers);
        assert_eq!(target.state().notes(), "remember the logo");
        assert!(target.state().selected_layer_ids().is_empty());
        assert!(target.state().history().can_undo());
    }

    #[test]
    fn test_history_limit_from_config() {
        let mut store = EditorStore::new(EditorConfig::default().with_history_limit(2));
        for i in 0..5 {
            store.save_to_history();
            store.set_notes(format!("note {i}"));
        }
        assert_eq!(store.state().history().past().len(), 2);
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.state().notes(), "note 2");
    }
}

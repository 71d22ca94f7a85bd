//! Intents and the reducer that applies them.

use crate::config::clamp_scale;
use crate::design::ImportedDesign;
use crate::layer::{Layer, LayerId, LayerPatch};
use crate::page::PagePatch;
use crate::state::EditorState;

/// A discrete request to change the editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSidebarTab(Option<String>),
    SetSettingsOpen(bool),
    SetSidebarOpen(bool),
    SelectLayer(LayerId),
    DeselectLayer(LayerId),
    DeselectAll,
    SetScale(f64),
    AddLayer(Layer),
    UpdateLayer { id: LayerId, patch: LayerPatch },
    DeleteLayer(LayerId),
    ToggleNotes,
    SetNotes(String),
    HoverLayer(Option<LayerId>),
    SaveHistory,
    Undo,
    Redo,
    ImportDesign(ImportedDesign),
    UpdatePageState(PagePatch),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetSidebarTab(_) => "setSidebarTab",
            Action::SetSettingsOpen(_) => "setSettingsOpen",
            Action::SetSidebarOpen(_) => "setSidebarOpen",
            Action::SelectLayer(_) => "selectLayer",
            Action::DeselectLayer(_) => "deselectLayer",
            Action::DeselectAll => "deselectAllLayers",
            Action::SetScale(_) => "setScale",
            Action::AddLayer(_) => "addLayer",
            Action::UpdateLayer { .. } => "updateLayer",
            Action::DeleteLayer(_) => "deleteLayer",
            Action::ToggleNotes => "toggleNotes",
            Action::SetNotes(_) => "setNotes",
            Action::HoverLayer(_) => "hoverLayer",
            Action::SaveHistory => "saveToHistory",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::ImportDesign(_) => "importDesign",
            Action::UpdatePageState(_) => "updatePageState",
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Apply one intent to the state.
///
/// Returns whether the state changed. Intents with input that does not fit the
/// current state (unknown ids, non-finite scale, empty stacks) change nothing.
pub fn reduce(state: &mut EditorState, action: Action) -> bool {
    let name = action.name();
    let changed = match action {
        Action::SetSidebarTab(tab) => replace(&mut state.side_bar_tab, tab),
        Action::SetSettingsOpen(open) => replace(&mut state.settings_open, open),
        Action::SetSidebarOpen(open) => replace(&mut state.side_bar_open, open),
        Action::SelectLayer(id) => {
            if state.page.layers.contains(&id) && !state.is_selected(&id) {
                state.selected_layer_ids.push(id);
                true
            } else {
                false
            }
        }
        Action::DeselectLayer(id) => {
            let before = state.selected_layer_ids.len();
            state.selected_layer_ids.retain(|selected| *selected != id);
            state.selected_layer_ids.len() != before
        }
        Action::DeselectAll => {
            let changed = !state.selected_layer_ids.is_empty();
            state.selected_layer_ids.clear();
            changed
        }
        Action::SetScale(scale) => match clamp_scale(scale) {
            Some(scale) => replace(&mut state.scale, scale),
            None => false,
        },
        Action::AddLayer(layer) => {
            let id = layer.id().to_string();
            state.page.layers.insert(layer);
            state.selected_layer_ids = vec![id];
            true
        }
        Action::UpdateLayer { id, patch } => match state.page.layers.get_mut(&id) {
            Some(layer) => {
                let before = layer.clone();
                layer.apply(patch);
                *layer != before
            }
            None => false,
        },
        Action::DeleteLayer(id) => {
            if state.page.layers.remove(&id).is_some() {
                state.prune_stale_ids();
                true
            } else {
                false
            }
        }
        Action::ToggleNotes => {
            state.notes_open = !state.notes_open;
            true
        }
        Action::SetNotes(notes) => replace(&mut state.notes, notes),
        Action::HoverLayer(id) => replace(&mut state.hovered_layer, id),
        Action::SaveHistory => {
            let snapshot = state.snapshot();
            state.history.save(snapshot);
            log::debug!("History saved ({} undo steps)", state.history.past().len());
            true
        }
        Action::Undo => {
            let current = state.snapshot();
            match state.history.undo(current) {
                Some(previous) => {
                    state.restore(previous);
                    log::debug!("Undo ({} steps left)", state.history.past().len());
                    true
                }
                None => false,
            }
        }
        Action::Redo => {
            let current = state.snapshot();
            match state.history.redo(current) {
                Some(next) => {
                    state.restore(next);
                    log::debug!("Redo ({} steps left)", state.history.future().len());
                    true
                }
                None => false,
            }
        }
        Action::ImportDesign(ImportedDesign { page, notes }) => {
            let snapshot = state.snapshot();
            state.history.save(snapshot);
            state.page = page;
            if !notes.is_empty() {
                state.notes = notes;
            }
            state.selected_layer_ids.clear();
            state.hovered_layer = None;
            true
        }
        Action::UpdatePageState(patch) => {
            let before = state.page.clone();
            state.page.apply(patch);
            state.prune_stale_ids();
            state.page != before
        }
    };

    if changed {
        log::debug!("Applied {name}");
    }
    changed
}

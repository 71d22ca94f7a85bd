//! Design file export and import.
//!
//! Designs travel as pretty-printed JSON whose field names are shortened with
//! a fixed dictionary (`name` -> `a`, `layers` -> `c`, ...). Layer ids used as
//! keys of the `layers` object are never shortened.

use crate::layer::Layer;
use crate::page::{LayerMap, Page};
use crate::state::EditorState;
use kurbo::Size;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Download name used by the raster exporter.
pub const PNG_EXPORT_FILE_NAME: &str = "canvas-design.png";

/// Page name given to imported designs that carry none.
pub const IMPORTED_DESIGN_NAME: &str = "Imported Design";

/// Field name shortening dictionary: (full name, packed name).
pub const KEY_DICTIONARY: [(&str, &str); 41] = [
    ("name", "a"),
    ("notes", "b"),
    ("layers", "c"),
    ("ROOT", "d"),
    ("type", "e"),
    ("resolvedName", "f"),
    ("props", "g"),
    ("boxSize", "h"),
    ("width", "i"),
    ("height", "j"),
    ("position", "k"),
    ("x", "l"),
    ("y", "m"),
    ("rotate", "n"),
    ("color", "o"),
    ("image", "p"),
    ("gradientBackground", "q"),
    ("locked", "r"),
    ("child", "s"),
    ("parent", "t"),
    ("scale", "u"),
    ("text", "v"),
    ("fonts", "w"),
    ("family", "x"),
    ("url", "y"),
    ("style", "z"),
    ("styles", "aa"),
    ("colors", "ab"),
    ("fontSizes", "ac"),
    ("effect", "ad"),
    ("settings", "ae"),
    ("thickness", "af"),
    ("transparency", "ag"),
    ("clipPath", "ah"),
    ("shapeSize", "ai"),
    ("thumb", "aj"),
    ("offset", "ak"),
    ("direction", "al"),
    ("blur", "am"),
    ("border", "an"),
    ("weight", "ao"),
];

/// Errors from reading or writing design files.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Invalid design JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid design file format: missing `{0}`")]
    MissingKey(&'static str),
    #[error("Invalid layer {id:?}: {source}")]
    InvalidLayer {
        id: String,
        source: serde_json::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully parsed design, ready for the `importDesign` intent.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDesign {
    pub page: Page,
    pub notes: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DesignDocument<'a> {
    name: &'a str,
    page_size: Size,
    layers: &'a LayerMap,
    notes: &'a str,
}

pub fn pack_key(key: &str) -> &str {
    KEY_DICTIONARY
        .iter()
        .find(|(full, _)| *full == key)
        .map_or(key, |&(_, packed)| packed)
}

pub fn unpack_key(key: &str) -> &str {
    KEY_DICTIONARY
        .iter()
        .find(|(_, packed)| *packed == key)
        .map_or(key, |&(full, _)| full)
}

/// Rename object keys recursively. Keys of the `layers` object are kept.
fn rename_keys(value: Value, rename: fn(&str) -> &str, in_layers: bool) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| rename_keys(item, rename, false))
                .collect(),
        ),
        Value::Object(entries) => {
            let mut renamed = Map::with_capacity(entries.len());
            for (key, child) in entries {
                if in_layers {
                    renamed.insert(key, rename_keys(child, rename, false));
                    continue;
                }
                let new_key = rename(&key).to_string();
                // Either side of the rename may be the full name
                let child_is_layers = key == "layers" || new_key == "layers";
                renamed.insert(new_key, rename_keys(child, rename, child_is_layers));
            }
            Value::Object(renamed)
        }
        other => other,
    }
}

/// Shorten every field name.
pub fn pack(value: Value) -> Value {
    rename_keys(value, pack_key, false)
}

/// Restore every shortened field name.
pub fn unpack(value: Value) -> Value {
    rename_keys(value, unpack_key, false)
}

/// Serialize the current page and notes to packed, pretty-printed JSON.
pub fn export_design(state: &EditorState) -> Result<String, DesignError> {
    let page = state.page();
    // Page notes supersede the legacy top-level notes
    let notes = if page.notes.is_empty() {
        state.notes()
    } else {
        page.notes.as_str()
    };
    let document = DesignDocument {
        name: &page.name,
        page_size: page.size,
        layers: &page.layers,
        notes,
    };
    let json = serde_json::to_string_pretty(&pack(serde_json::to_value(&document)?))?;
    log::info!(
        "Exported design {:?} with {} layers",
        page.name,
        page.layers.len()
    );
    Ok(json)
}

fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Parse packed design JSON.
///
/// `pageSize` and `layers` are required. Each layer's id is its key in the
/// `layers` object.
pub fn import_design(json: &str) -> Result<ImportedDesign, DesignError> {
    let unpacked = unpack(serde_json::from_str(json)?);
    let Value::Object(mut root) = unpacked else {
        return Err(DesignError::MissingKey("pageSize"));
    };

    if is_missing(root.get("pageSize")) {
        return Err(DesignError::MissingKey("pageSize"));
    }
    if is_missing(root.get("layers")) {
        return Err(DesignError::MissingKey("layers"));
    }

    let size: Size = serde_json::from_value(root.remove("pageSize").unwrap_or_default())?;
    let Some(Value::Object(entries)) = root.remove("layers") else {
        return Err(DesignError::MissingKey("layers"));
    };

    let mut layers = LayerMap::new();
    for (key, entry) in entries {
        let mut layer: Layer = serde_json::from_value(entry)
            .map_err(|source| DesignError::InvalidLayer { id: key.clone(), source })?;
        layer.id = key;
        layers.insert(layer);
    }

    let name = match root.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => IMPORTED_DESIGN_NAME.to_string(),
    };
    let notes = root
        .get("notes")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    log::info!("Imported design {:?} with {} layers", name, layers.len());

    Ok(ImportedDesign {
        page: Page {
            name,
            notes: notes.clone(),
            size,
            layers,
        },
        notes,
    })
}

/// File name for a saved design: non-alphanumerics become `_`, lowercased.
pub fn design_file_name(page_name: &str) -> String {
    let stem: String = page_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.json")
}

/// Write the exported design into `dir` under [`design_file_name`].
#[cfg(not(target_arch = "wasm32"))]
pub fn save_design_to_dir(
    state: &EditorState,
    dir: &std::path::Path,
) -> Result<std::path::PathBuf, DesignError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(design_file_name(&state.page().name));
    std::fs::write(&path, export_design(state)?)?;
    log::info!("Saved design to {}", path.display());
    Ok(path)
}

/// Read and parse a design file.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_design_file(path: &std::path::Path) -> Result<ImportedDesign, DesignError> {
    let json = std::fs::read_to_string(path)?;
    import_design(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, reduce};
    use crate::layer::{GradientStyle, ShapeType, TextStyles};
    use crate::color::Color;
    use crate::layer::{LayerPatch, ShapePatch, TextPatch};
    use crate::page::PagePatch;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_state() -> EditorState {
        let mut state = EditorState::default();
        let text = Layer::text("Headline", 32.0).with_z_index(2);
        let text_id = text.id().to_string();
        let shape = Layer::shape(ShapeType::Star).with_z_index(1);
        let shape_id = shape.id().to_string();
        reduce(&mut state, Action::AddLayer(text));
        reduce(&mut state, Action::AddLayer(shape));
        reduce(&mut state, Action::AddLayer(Layer::image("/placeholder.svg")));
        reduce(&mut state, Action::AddLayer(Layer::frame(GradientStyle::Radial)));
        reduce(
            &mut state,
            Action::UpdateLayer {
                id: text_id,
                patch: LayerPatch::new().with_text(TextPatch {
                    styles: Some(Some(TextStyles { bold: true, ..Default::default() })),
                    ..Default::default()
                }),
            },
        );
        reduce(
            &mut state,
            Action::UpdateLayer {
                id: shape_id,
                patch: LayerPatch::new().with_shape(ShapePatch {
                    clip_path: Some(Some("circle(40%)".into())),
                    border_color: Some(Some(Color::white())),
                    ..Default::default()
                }),
            },
        );
        reduce(&mut state, Action::SetNotes("Print on A4".into()));
        state
    }

    #[test]
    fn test_key_dictionary_is_bijective() {
        for (full, packed) in KEY_DICTIONARY {
            assert_eq!(pack_key(full), packed);
            assert_eq!(unpack_key(packed), full);
        }
        assert_eq!(pack_key("fontSize"), "fontSize");
        assert_eq!(unpack_key("zz"), "zz");
    }

    #[test]
    fn test_pack_keeps_layer_ids() {
        let value = json!({
            "name": "x",
            "layers": {
                "a": {"type": "shape", "text": "hi"},
                "x": {"position": {"x": 1, "y": 2}}
            }
        });
        let packed = pack(value.clone());
        assert_eq!(
            packed,
            json!({
                "a": "x",
                "c": {
                    "a": {"e": "shape", "v": "hi"},
                    "x": {"k": {"l": 1, "m": 2}}
                }
            })
        );
        assert_eq!(unpack(packed), value);
    }

    #[test]
    fn test_export_is_packed_and_pretty() {
        let json = export_design(&sample_state()).unwrap();
        assert!(json.contains('\n'));
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["a"], "My design");
        assert_eq!(value["b"], "Print on A4");
        assert_eq!(value["pageSize"]["i"], 800.0);
        assert_eq!(value["c"].as_object().unwrap().len(), 4);
        assert!(value.get("layers").is_none());
    }

    #[test]
    fn test_export_import_round_trip() {
        let state = sample_state();
        let imported = import_design(&export_design(&state).unwrap()).unwrap();
        assert_eq!(imported.page.layers, state.page().layers);
        assert_eq!(imported.page.size, state.page().size);
        assert_eq!(imported.page.name, state.page().name);
        assert_eq!(imported.notes, "Print on A4");
    }

    #[test]
    fn test_import_requires_page_size_and_layers() {
        let no_size = import_design(r#"{"a": "Poster", "c": {}}"#);
        assert!(matches!(no_size, Err(DesignError::MissingKey("pageSize"))));

        let no_layers = import_design(r#"{"pageSize": {"i": 10, "j": 10}}"#);
        assert!(matches!(no_layers, Err(DesignError::MissingKey("layers"))));

        assert!(matches!(import_design("[1, 2"), Err(DesignError::Json(_))));
        assert!(matches!(import_design("[]"), Err(DesignError::MissingKey(_))));
    }

    #[test]
    fn test_import_defaults() {
        let json = r##"{
            "pageSize": {"i": 1080, "j": 1080},
            "c": {
                "s1": {
                    "e": "shape",
                    "shapeType": "circle",
                    "o": "#ff0000",
                    "boxData": {"k": {"l": 5, "m": 6}, "h": {"i": 50, "j": 40}}
                }
            }
        }"##;
        let imported = import_design(json).unwrap();
        assert_eq!(imported.page.name, IMPORTED_DESIGN_NAME);
        assert_eq!(imported.notes, "");
        assert_eq!(imported.page.size, Size::new(1080.0, 1080.0));

        let layer = imported.page.layers.get("s1").unwrap();
        assert_eq!(layer.id(), "s1");
        assert_eq!(layer.opacity(), 1.0);
        assert_eq!(layer.z_index, 0);
        assert_eq!(layer.box_data.rotate, 0.0);
        assert_eq!(layer.as_shape().unwrap().color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_page_notes_round_trip() {
        let mut state = sample_state();
        reduce(
            &mut state,
            Action::UpdatePageState(PagePatch::notes("Bleed 3mm")),
        );
        let imported = import_design(&export_design(&state).unwrap()).unwrap();
        assert_eq!(imported.page.notes, "Bleed 3mm");
        assert_eq!(imported.notes, "Bleed 3mm");

        // Without page notes the top-level notes are exported
        let legacy = import_design(&export_design(&sample_state()).unwrap()).unwrap();
        assert_eq!(legacy.page.notes, "Print on A4");
    }

    #[test]
    fn test_import_keys_layers_by_map_key() {
        let entry = json!({
            "id": "same",
            "e": "shape",
            "shapeType": "star",
            "boxData": {"k": {"l": 0, "m": 0}, "h": {"i": 10, "j": 10}}
        });
        let json = json!({
            "pageSize": {"i": 100, "j": 100},
            "c": {"one": entry.clone(), "two": entry}
        })
        .to_string();

        let imported = import_design(&json).unwrap();
        let ids: Vec<&str> = imported.page.layers.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["one", "two"]);
        assert!(!imported.page.layers.contains("same"));
    }

    #[test]
    fn test_import_reports_bad_layer() {
        let json = r#"{"pageSize": {"i": 1, "j": 1}, "c": {"bad": {"e": "hologram"}}}"#;
        match import_design(json) {
            Err(DesignError::InvalidLayer { id, .. }) => assert_eq!(id, "bad"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_design_file_name() {
        assert_eq!(design_file_name("My design"), "my_design.json");
        assert_eq!(design_file_name("Café Menu #2"), "caf__menu__2.json");
        assert_eq!(PNG_EXPORT_FILE_NAME, "canvas-design.png");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let state = sample_state();

        let path = save_design_to_dir(&state, &dir.path().join("designs")).unwrap();
        assert_eq!(path.file_name().unwrap(), "my_design.json");

        let loaded = load_design_file(&path).unwrap();
        assert_eq!(loaded.page.layers, state.page().layers);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_design_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(DesignError::Io(_))));
    }
}

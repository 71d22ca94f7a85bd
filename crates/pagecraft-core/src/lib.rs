//! Pagecraft Core Library
//!
//! Document model, editor state store and snapshot history for the Pagecraft
//! design editor. Renderers and panels read [`EditorState`] and change it only
//! through the intents on [`EditorStore`].

pub mod action;
pub mod color;
pub mod config;
pub mod design;
pub mod geometry;
pub mod gesture;
pub mod layer;
pub mod page;
pub mod state;
pub mod store;

pub use action::{Action, reduce};
pub use color::{Color, ColorParseError};
pub use config::{EditorConfig, MAX_SCALE, MIN_SCALE};
pub use design::{
    DesignError, ImportedDesign, PNG_EXPORT_FILE_NAME, design_file_name, export_design,
    import_design,
};
pub use geometry::{BoxData, Direction, MIN_BOX_SIZE};
pub use gesture::{DragGesture, ResizeGesture, RotateGesture};
pub use layer::{Layer, LayerId, LayerKind, LayerPatch, LayerType};
pub use page::{LayerMap, Page, PagePatch};
pub use state::{EditorState, History, Snapshot};
pub use store::{EditorStore, SubscriptionId};

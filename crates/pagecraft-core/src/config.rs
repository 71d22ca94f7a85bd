//! Editor configuration.

use crate::page::{DEFAULT_PAGE_NAME, DEFAULT_PAGE_SIZE};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Minimum viewport scale.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum viewport scale.
pub const MAX_SCALE: f64 = 5.0;

/// Clamp a requested viewport scale. Non-finite input yields `None`.
pub fn clamp_scale(scale: f64) -> Option<f64> {
    scale.is_finite().then(|| scale.clamp(MIN_SCALE, MAX_SCALE))
}

/// Settings used to create the initial editor state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub page_name: String,
    pub page_size: Size,
    pub scale: f64,
    pub side_bar_open: bool,
    /// Maximum number of undo snapshots kept; `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            page_name: DEFAULT_PAGE_NAME.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            scale: 1.0,
            side_bar_open: true,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_page_size(mut self, size: Size) -> Self {
        self.page_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.page_name, "My design");
        assert_eq!(config.page_size, Size::new(800.0, 600.0));
        assert_eq!(config.scale, 1.0);
        assert!(config.side_bar_open);
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn test_from_partial_json() {
        let config = EditorConfig::from_json(r#"{"historyLimit": 50, "pageName": "Flyer"}"#).unwrap();
        assert_eq!(config.history_limit, Some(50));
        assert_eq!(config.page_name, "Flyer");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(EditorConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_clamp_scale() {
        assert_eq!(clamp_scale(0.01), Some(MIN_SCALE));
        assert_eq!(clamp_scale(12.0), Some(MAX_SCALE));
        assert_eq!(clamp_scale(2.5), Some(2.5));
        assert_eq!(clamp_scale(f64::NAN), None);
        assert_eq!(clamp_scale(f64::INFINITY), None);
    }
}

//! Layout Tunables
//!
//! The single-line thresholds were tuned by eye for a typical inspector
//! width. They are kept as data so hosts can adjust them without touching the
//! synthesis code.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shape::TypeCache;

/// Process-wide settings consulted by element synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Composite types with more fields than this never render inline.
    pub single_line_max_fields: usize,

    /// Longest field name (in chars) that still counts as "short".
    pub single_line_max_name_len: usize,

    /// Slider range used when an integer slider has no explicit bounds.
    pub default_int_range: (i64, i64),

    /// Slider range used when a float slider has no explicit bounds.
    pub default_float_range: (f64, f64),

    /// Caption prefix for list items ("Item 0", "Item 1", ...).
    pub list_item_label_prefix: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            single_line_max_fields: 3,
            single_line_max_name_len: 5,
            default_int_range: (0, 100),
            default_float_range: (0.0, 1.0),
            list_item_label_prefix: "Item".to_string(),
        }
    }
}

static CURRENT: OnceLock<RwLock<Arc<UiConfig>>> = OnceLock::new();

fn slot() -> &'static RwLock<Arc<UiConfig>> {
    CURRENT.get_or_init(|| RwLock::new(Arc::new(UiConfig::default())))
}

impl UiConfig {
    /// Parse a config from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The config currently in effect.
    pub fn current() -> Arc<UiConfig> {
        slot().read().clone()
    }

    /// Replace the process-wide config.
    ///
    /// Memoized single-line decisions depend on the thresholds, so they are
    /// dropped here.
    pub fn install(config: UiConfig) {
        tracing::debug!(?config, "installing ui config");
        *slot().write() = Arc::new(config);
        TypeCache::clear_single_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = UiConfig::from_json(r#"{ "single_line_max_fields": 4 }"#).unwrap();
        assert_eq!(config.single_line_max_fields, 4);
        assert_eq!(config.single_line_max_name_len, 5);
        assert_eq!(config.list_item_label_prefix, "Item");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(UiConfig::from_json("{ not json").is_err());
    }
}

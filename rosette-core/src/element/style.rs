//! Style overrides.

use serde::{Deserialize, Serialize};

use crate::shape::Rgba;

/// Optional size and color overrides. `None` leaves the view's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub color: Option<Rgba>,
    pub background: Option<Rgba>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

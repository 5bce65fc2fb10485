//! Transferable UI State
//!
//! The part of an element subtree's state that belongs to the user rather
//! than to the bound data: which folds are open. Captured in depth-first
//! order so it can be replayed onto a rebuilt subtree of the same shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Open flags of every fold in the subtree, depth-first.
    pub folds: Vec<bool>,
}

impl ElementState {
    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }
}

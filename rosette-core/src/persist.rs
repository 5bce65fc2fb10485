//! State Persistence Boundary
//!
//! The core never stores anything itself. Hosts that want fold states to
//! survive a restart provide a [`StateStore`]; element state crosses that
//! boundary as MessagePack bytes.

use std::collections::HashMap;

use crate::element::{Element, ElementState};
use crate::error::Result;

/// String-keyed byte storage owned by the host.
pub trait StateStore {
    fn load(&self, key: &str) -> Option<Vec<u8>>;

    fn store(&mut self, key: &str, bytes: Vec<u8>);
}

impl StateStore for HashMap<String, Vec<u8>> {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: &str, bytes: Vec<u8>) {
        self.insert(key.to_string(), bytes);
    }
}

impl ElementState {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Capture the UI state of `element` and write it under `key`.
pub fn save_state(element: &Element, key: &str, store: &mut dyn StateStore) -> Result<()> {
    let bytes = element.capture_state().to_bytes()?;
    tracing::debug!(key, len = bytes.len(), "saving element state");
    store.store(key, bytes);
    Ok(())
}

/// Apply the state stored under `key`, if any. Returns whether it was found.
pub fn restore_state(element: &Element, key: &str, store: &dyn StateStore) -> Result<bool> {
    let Some(bytes) = store.load(key) else {
        return Ok(false);
    };
    let state = ElementState::from_bytes(&bytes)?;
    element.apply_state(&state);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiError;
    use crate::ui;

    fn folds() -> Element {
        let inner = ui::fold("Inner", vec![ui::space()]).unwrap();
        ui::fold("Outer", vec![inner]).unwrap()
    }

    #[test]
    fn state_survives_the_store() {
        let mut store: HashMap<String, Vec<u8>> = HashMap::new();

        let original = folds();
        original.child(1).unwrap().as_fold().unwrap().set_open(true);
        save_state(&original, "inspector", &mut store).unwrap();

        let rebuilt = folds();
        assert!(restore_state(&rebuilt, "inspector", &store).unwrap());
        assert_eq!(rebuilt.capture_state().folds, vec![false, true]);
    }

    #[test]
    fn missing_key_is_not_an_error() {
        let store: HashMap<String, Vec<u8>> = HashMap::new();
        assert!(!restore_state(&folds(), "nothing", &store).unwrap());
    }

    #[test]
    fn corrupt_bytes_are_reported() {
        let mut store: HashMap<String, Vec<u8>> = HashMap::new();
        store.store("bad", vec![0xc1]);

        assert!(matches!(
            restore_state(&folds(), "bad", &store),
            Err(UiError::StateDecode(_))
        ));
    }
}

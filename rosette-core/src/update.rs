//! Update Loop
//!
//! The host calls [`UpdateLoop::tick`] once per frame. Each tick:
//!
//! 1. Drops roots that were destroyed since the last tick
//! 2. Runs [`Element::update`] on every remaining root, in registration order
//!
//! Everything happens on the calling thread. The element graph must not be
//! mutated from elsewhere during a tick.

use crate::element::Element;

/// Owner of the root elements driven every frame.
#[derive(Debug, Default)]
pub struct UpdateLoop {
    roots: Vec<Element>,
    ticks: u64,
}

impl UpdateLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root. Registering the same root twice has no effect.
    pub fn register(&mut self, root: Element) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    /// Remove a root without destroying it.
    pub fn unregister(&mut self, root: &Element) -> bool {
        let before = self.roots.len();
        self.roots.retain(|r| r != root);
        before != self.roots.len()
    }

    /// Run one update sweep.
    pub fn tick(&mut self) {
        self.roots.retain(|root| !root.is_destroyed());

        for root in &self.roots {
            root.update();
        }

        self.ticks += 1;
        tracing::trace!(tick = self.ticks, roots = self.roots.len(), "update sweep");
    }

    /// Number of completed sweeps.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::shape::Shared;
    use crate::ui;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn tick_updates_roots_and_prunes_destroyed_ones() {
        let pulls = Arc::new(AtomicI32::new(0));
        let pulls_clone = pulls.clone();
        let root = ui::field_unlabeled(Binder::read_only(move || {
            pulls_clone.fetch_add(1, Ordering::SeqCst)
        }));

        let built = pulls.load(Ordering::SeqCst);

        let mut update_loop = UpdateLoop::new();
        update_loop.register(root.clone());
        update_loop.register(root.clone());
        assert_eq!(update_loop.len(), 1);

        update_loop.tick();
        update_loop.tick();
        assert_eq!(pulls.load(Ordering::SeqCst), built + 2);
        assert_eq!(update_loop.tick_count(), 2);

        root.destroy();
        update_loop.tick();
        assert!(update_loop.is_empty());
        assert_eq!(pulls.load(Ordering::SeqCst), built + 2);
    }

    #[test]
    fn unregister_keeps_the_root_alive() {
        let value = Shared::new(1i32);
        let root = ui::field("value", Binder::from_shared(&value));

        let mut update_loop = UpdateLoop::new();
        update_loop.register(root.clone());

        assert!(update_loop.unregister(&root));
        assert!(!update_loop.unregister(&root));
        assert!(!root.is_destroyed());
    }
}

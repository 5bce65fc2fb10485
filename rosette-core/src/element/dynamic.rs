//! Dynamic Elements
//!
//! A dynamic element holds a single child built by a closure and rebuilds it
//! whenever a key function changes value. Null guards, self-describing values
//! and shared references use it so that swapping the bound object swaps the
//! subtree.
//!
//! The recursion context active when the element was created is captured and
//! replayed around every rebuild, so cycle detection still sees the ancestors
//! even though rebuilds happen later, from the update sweep.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Element;
use crate::build::RecursionSnapshot;
use crate::reactive::{Notifier, Subscription};
use crate::shape::ObjectId;

/// What a dynamic element's content depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuildKey {
    Null,
    Present,
    Object(ObjectId),
}

impl RebuildKey {
    pub fn of_presence(present: bool) -> Self {
        if present {
            RebuildKey::Present
        } else {
            RebuildKey::Null
        }
    }

    pub fn of_identity(id: Option<ObjectId>) -> Self {
        id.map_or(RebuildKey::Null, RebuildKey::Object)
    }
}

type KeyFn = dyn Fn() -> RebuildKey + Send + Sync;
type BuildFn = dyn Fn() -> Element + Send + Sync;

pub struct DynamicData {
    key: Arc<KeyFn>,
    build: Arc<BuildFn>,
    recursion: RecursionSnapshot,
    current: Mutex<Option<RebuildKey>>,
    rebuilt: Notifier<Element>,
}

impl DynamicData {
    pub(crate) fn new<K, B>(key: K, build: B) -> Self
    where
        K: Fn() -> RebuildKey + Send + Sync + 'static,
        B: Fn() -> Element + Send + Sync + 'static,
    {
        Self {
            key: Arc::new(key),
            build: Arc::new(build),
            recursion: RecursionSnapshot::capture(),
            current: Mutex::new(None),
            rebuilt: Notifier::new(),
        }
    }

    /// Key of the content currently built, if any.
    pub fn content_key(&self) -> Option<RebuildKey> {
        *self.current.lock()
    }

    /// Recursion context replayed around rebuilds.
    pub fn recursion(&self) -> &RecursionSnapshot {
        &self.recursion
    }

    /// Called with the new content after every rebuild.
    pub fn subscribe_rebuilt<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        self.rebuilt.subscribe(callback)
    }

    /// Rebuild the content of `owner` if the key changed.
    pub(crate) fn refresh(&self, owner: &Element) -> bool {
        let key = (self.key)();
        {
            let mut current = self.current.lock();
            if *current == Some(key) {
                return false;
            }
            *current = Some(key);
        }

        for stale in owner.children() {
            stale.destroy();
        }

        let content = {
            let _replay = self.recursion.apply();
            (self.build)()
        };
        owner.adopt(content.clone());

        tracing::debug!(id = owner.id().raw(), ?key, "dynamic element rebuilt");
        self.rebuilt.notify(&content);
        true
    }

    pub(crate) fn release(&self) {
        self.rebuilt.clear();
    }
}

impl fmt::Debug for DynamicData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicData")
            .field("key", &self.content_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

    #[test]
    fn rebuilds_only_when_the_key_changes() {
        let present = Arc::new(AtomicBool::new(false));
        let builds = Arc::new(AtomicI32::new(0));

        let present_key = present.clone();
        let builds_clone = builds.clone();
        let element = ui::dynamic(
            move || RebuildKey::of_presence(present_key.load(Ordering::SeqCst)),
            move || {
                builds_clone.fetch_add(1, Ordering::SeqCst);
                ui::space()
            },
        );
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        element.update();
        element.update();
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        let first = element.child(0).unwrap();
        present.store(true, Ordering::SeqCst);
        element.update();

        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert!(first.is_destroyed());
        assert_eq!(element.child_count(), 1);
        assert_eq!(
            element.as_dynamic().unwrap().content_key(),
            Some(RebuildKey::Present)
        );
    }
}

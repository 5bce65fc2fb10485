//! Subscriber identities and subscription handles.
//!
//! Every callback registered on a reactive value gets a `SubscriberId`.
//! Registration hands back a `Subscription`; dropping it removes the
//! callback, so an element that owns its subscriptions releases them at
//! teardown without any extra bookkeeping.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// A live registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriberId,
    dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wrap a disposer that removes the callback identified by `id`.
    pub fn new<F>(id: SubscriberId, dispose: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            id,
            dispose: Some(Box::new(dispose)),
        }
    }

    /// A subscription that owns nothing.
    pub fn empty() -> Self {
        Self {
            id: SubscriberId::new(),
            dispose: None,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Unsubscribe now.
    pub fn release(mut self) {
        self.run_dispose();
    }

    /// Keep the callback registered for the lifetime of the source.
    pub fn forget(mut self) {
        self.dispose = None;
    }

    fn run_dispose(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

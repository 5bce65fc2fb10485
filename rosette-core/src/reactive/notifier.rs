//! Callback lists.
//!
//! `Notifier<A>` is the plain event primitive underneath every reactive
//! value and view bridge: an ordered list of `(SubscriberId, callback)` pairs.
//! The list is cloned out of its lock before callbacks run, so a callback may
//! subscribe, unsubscribe or notify again without deadlocking.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use super::subscriber::{SubscriberId, Subscription};

type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;
type Entries<A> = SmallVec<[(SubscriberId, Callback<A>); 2]>;

/// An ordered set of callbacks taking `&A`.
pub struct Notifier<A: 'static> {
    entries: Arc<Mutex<Entries<A>>>,
}

impl<A: 'static> Notifier<A> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(SmallVec::new())),
        }
    }

    /// Register a callback. The returned handle unsubscribes on drop.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let id = SubscriberId::new();
        self.entries.lock().push((id, Arc::new(callback)));

        let weak: Weak<Mutex<Entries<A>>> = Arc::downgrade(&self.entries);
        Subscription::new(id, move || {
            if let Some(entries) = weak.upgrade() {
                entries.lock().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Remove a single callback by id.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.entries.lock().retain(|(entry_id, _)| *entry_id != id);
    }

    /// Remove every callback.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Invoke every callback in registration order.
    pub fn notify(&self, arg: &A) {
        let snapshot: Entries<A> = self.entries.lock().clone();
        for (_, callback) in snapshot.iter() {
            callback(arg);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<A: 'static> Default for Notifier<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> fmt::Debug for Notifier<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.len())
            .finish()
    }
}

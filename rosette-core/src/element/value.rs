//! View Bridges
//!
//! The narrow interface between a leaf element and the widget bound to it.
//! The core pulls the bound value every sweep and hands it to subscribers;
//! comparing against what the widget already shows is the view's job.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use super::node::WeakElement;
use crate::binder::Binder;
use crate::reactive::{Notifier, Subscription};

/// Value synchronization point for one bound value.
pub struct ViewBridge<V>
where
    V: Clone + Send + Sync + 'static,
{
    owner: WeakElement,
    binder: Binder<V>,
    changed: Notifier<V>,
    primed: AtomicBool,
}

impl<V> ViewBridge<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(owner: &WeakElement, binder: Binder<V>) -> Self {
        Self {
            owner: owner.clone(),
            binder,
            changed: Notifier::new(),
            primed: AtomicBool::new(false),
        }
    }

    /// Current bound value.
    pub fn value(&self) -> V {
        self.binder.get()
    }

    pub fn binder(&self) -> &Binder<V> {
        &self.binder
    }

    pub fn is_read_only(&self) -> bool {
        self.binder.is_read_only()
    }

    pub fn is_const(&self) -> bool {
        self.binder.is_const()
    }

    /// Receive every pulled value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        self.changed.subscribe(callback)
    }

    /// Receive the current value now, then every pulled value.
    pub fn subscribe_and_call_once<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        callback(&self.value());
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe_all(&self) {
        self.changed.clear();
    }

    /// Write an edit made in the view.
    ///
    /// Returns `false` and writes nothing when the binder is read-only.
    /// Otherwise the owning element and each of its ancestors raise their
    /// view-value-changed notification once.
    pub fn set_value_from_view(&self, value: V) -> bool {
        if self.binder.is_read_only() {
            tracing::warn!(
                value_type = self.binder.value_type_name(),
                "view wrote to a read-only binder"
            );
            return false;
        }

        self.binder.set(value);
        if let Some(owner) = self.owner.upgrade() {
            owner.notify_view_value_changed();
        }
        true
    }

    /// Read the bound value and hand it to subscribers.
    ///
    /// Constant binders are read once.
    pub(crate) fn pull(&self) {
        if self.binder.is_const() && self.primed.swap(true, Ordering::Relaxed) {
            return;
        }
        let value = self.binder.get();
        self.changed.notify(&value);
    }
}

impl<V> fmt::Debug for ViewBridge<V>
where
    V: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewBridge")
            .field("value", &self.value())
            .field("is_read_only", &self.is_read_only())
            .field("subscribers", &self.changed.len())
            .finish()
    }
}

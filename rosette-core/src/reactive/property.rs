//! ReactiveProperty Implementation
//!
//! A `ReactiveProperty` is a single observable value. It carries UI metadata
//! (enabled, interactable, fold-open, style) from the element graph to the
//! view layer without the view polling every frame.
//!
//! # Semantics
//!
//! 1. `set` stores the value and notifies subscribers only when the new value
//!    differs from the old one (`PartialEq`).
//!
//! 2. `subscribe_and_call_once` replays the current value to the new
//!    subscriber immediately, so a freshly bound widget never shows a stale
//!    frame.
//!
//! 3. Clones share state.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::RwLock;

use super::notifier::Notifier;
use super::subscriber::Subscription;

/// An observable scalar.
pub struct ReactiveProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    value: Arc<RwLock<T>>,
    changed: Arc<Notifier<T>>,
}

impl<T> ReactiveProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            changed: Arc::new(Notifier::new()),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Store `value`, notifying subscribers if it differs from the current one.
    ///
    /// Returns whether a change happened.
    pub fn set(&self, value: T) -> bool {
        {
            let mut guard = self.value.write();
            if *guard == value {
                return false;
            }
            *guard = value.clone();
        }
        self.changed.notify(&value);
        true
    }

    /// Update the value using a function of the current one.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Register a callback invoked on every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.subscribe(callback)
    }

    /// Register a callback and invoke it once with the current value.
    pub fn subscribe_and_call_once<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let current = self.get();
        callback(&current);
        self.changed.subscribe(callback)
    }

    /// Drop every subscriber. Used at element teardown.
    pub fn clear_subscribers(&self) {
        self.changed.clear();
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.changed.len()
    }
}

impl<T> Clone for ReactiveProperty<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            changed: Arc::clone(&self.changed),
        }
    }
}

impl<T> Default for ReactiveProperty<T>
where
    T: Clone + PartialEq + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Debug for ReactiveProperty<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveProperty")
            .field("value", &self.get())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn property_get_and_set() {
        let property = ReactiveProperty::new(0);
        assert_eq!(property.get(), 0);

        assert!(property.set(42));
        assert_eq!(property.get(), 42);
    }

    #[test]
    fn equal_value_does_not_notify() {
        let property = ReactiveProperty::new(1);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let _sub = property.subscribe(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!property.set(1));
        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        assert!(property.set(2));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribe_and_call_once_replays_current_value() {
        let property = ReactiveProperty::new(7);
        let seen = Arc::new(AtomicI32::new(-1));
        let seen_clone = seen.clone();

        let _sub = property.subscribe_and_call_once(move |v| {
            seen_clone.store(*v, Ordering::SeqCst);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 7);

        property.set(9);
        assert_eq!(seen.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let property = ReactiveProperty::new(false);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let sub = property.subscribe(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        property.set(true);
        drop(sub);
        property.set(false);

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert_eq!(property.subscriber_count(), 0);
    }

    #[test]
    fn clone_shares_state() {
        let a = ReactiveProperty::new(0);
        let b = a.clone();

        a.set(42);
        assert_eq!(b.get(), 42);

        b.update(|v| *v += 1);
        assert_eq!(a.get(), 43);
    }
}

//! Custom Presenter Registry
//!
//! Hosts register, per exact value type, a function that builds the element
//! for a binder of that type. Registered presenters win over every built-in
//! presentation, except while the presenter for the same type is already
//! running (see `PresenterScope`).

use std::any::{type_name, Any, TypeId};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::binder::Binder;
use crate::element::{Element, LabelElement};
use crate::shape::UiValue;

type Presenter<T> = dyn Fn(Option<LabelElement>, Binder<T>) -> Element + Send + Sync;

struct Entry {
    type_name: &'static str,
    single_line: bool,
    presenter: Arc<dyn Any + Send + Sync>,
}

static ENTRIES: OnceLock<RwLock<IndexMap<TypeId, Entry>>> = OnceLock::new();

fn entries() -> &'static RwLock<IndexMap<TypeId, Entry>> {
    ENTRIES.get_or_init(|| RwLock::new(IndexMap::new()))
}

/// Process-wide registry of custom presenters.
pub struct PresenterRegistry;

impl PresenterRegistry {
    /// Register `presenter` for `T`, replacing any previous one.
    ///
    /// `single_line` tells layout heuristics whether the presenter's output
    /// fits on one row.
    pub fn register<T, F>(single_line: bool, presenter: F)
    where
        T: UiValue,
        F: Fn(Option<LabelElement>, Binder<T>) -> Element + Send + Sync + 'static,
    {
        let presenter: Arc<Presenter<T>> = Arc::new(presenter);
        let entry = Entry {
            type_name: type_name::<T>(),
            single_line,
            presenter: Arc::new(presenter),
        };
        tracing::debug!(type_name = entry.type_name, single_line, "registering presenter");
        entries().write().insert(TypeId::of::<T>(), entry);
    }

    /// Remove the presenter for `T`. Returns whether one was registered.
    pub fn unregister<T: UiValue>() -> bool {
        entries().write().shift_remove(&TypeId::of::<T>()).is_some()
    }

    pub fn is_registered<T: UiValue>() -> bool {
        entries().read().contains_key(&TypeId::of::<T>())
    }

    /// Names of every registered type, in registration order.
    pub fn registered_types() -> Vec<&'static str> {
        entries()
            .read()
            .values()
            .map(|entry| entry.type_name)
            .collect()
    }

    pub(crate) fn lookup<T: UiValue>() -> Option<Arc<Presenter<T>>> {
        let entries = entries().read();
        let entry = entries.get(&TypeId::of::<T>())?;
        entry
            .presenter
            .downcast_ref::<Arc<Presenter<T>>>()
            .cloned()
    }

    pub(crate) fn single_line_flag<T: UiValue>() -> Option<bool> {
        entries()
            .read()
            .get(&TypeId::of::<T>())
            .map(|entry| entry.single_line)
    }
}

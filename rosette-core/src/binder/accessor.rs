//! Binder Implementation
//!
//! A `Binder<T>` is a `Getter<T>` plus an optional writer. When no writer
//! exists the binder is read-only and `set` does nothing.
//!
//! # Composition
//!
//! Child binders derive a value from a parent binder through an
//! `(extract, reinject)` pair:
//!
//! - read:  `extract(&parent.get())`
//! - write: `let mut p = parent.get(); reinject(&mut p, value); parent.set(p)`
//!
//! Writes always go back through the whole parent value. Members of value
//! types are copies, so mutating only the leaf would silently lose the edit.
//!
//! Field access, list items, option unwrapping, numeric casts and min/max
//! projections are all expressed as child binders.

use std::any::{type_name, TypeId};
use std::fmt::{self, Debug};
use std::sync::Arc;

use super::getter::{Getter, ReadFn};
use crate::shape::{Shared, UiValue};

pub(crate) type WriteFn<T> = dyn Fn(T) + Send + Sync;

/// A typed read/write accessor bound to one live location.
pub struct Binder<T> {
    getter: Getter<T>,
    write: Option<Arc<WriteFn<T>>>,
}

impl<T> Binder<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A binder over a read function and a write function.
    pub fn new<R, W>(read: R, write: W) -> Self
    where
        R: Fn() -> T + Send + Sync + 'static,
        W: Fn(T) + Send + Sync + 'static,
    {
        Self {
            getter: Getter::new(read),
            write: Some(Arc::new(write)),
        }
    }

    /// A binder whose writer could not be synthesized.
    pub fn read_only<R>(read: R) -> Self
    where
        R: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            getter: Getter::new(read),
            write: None,
        }
    }

    /// A computed expression. Never assignable.
    pub fn computed<R>(read: R) -> Self
    where
        R: Fn() -> T + Send + Sync + 'static,
    {
        Self::read_only(read)
    }

    /// A constant, read-only binder.
    pub fn constant(value: T) -> Self {
        Self::from_getter(Getter::constant(value))
    }

    /// Promote a getter to a read-only binder.
    pub fn from_getter(getter: Getter<T>) -> Self {
        Self {
            getter,
            write: None,
        }
    }

    /// Bind a shared location. Reads clone the value, writes replace it.
    pub fn from_shared(shared: &Shared<T>) -> Self {
        let read_from = shared.clone();
        let write_to = shared.clone();
        Self::new(move || read_from.get(), move |value| write_to.set(value))
    }

    /// Read the current value.
    pub fn get(&self) -> T {
        self.getter.get()
    }

    /// Write a value. Does nothing when the binder is read-only.
    pub fn set(&self, value: T) {
        if let Some(write) = &self.write {
            write(value);
        }
    }

    /// Read, modify, write back.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        if self.write.is_some() {
            let mut value = self.get();
            f(&mut value);
            self.set(value);
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.write.is_none()
    }

    pub fn is_const(&self) -> bool {
        self.getter.is_const()
    }

    pub fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    pub fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    /// The read half.
    pub fn getter(&self) -> &Getter<T> {
        &self.getter
    }

    /// Drop the writer.
    pub fn into_read_only(self) -> Self {
        Self {
            getter: self.getter,
            write: None,
        }
    }

    /// Derive a child binder.
    ///
    /// The child is read-only when the parent is.
    pub fn child<C, E, R>(&self, extract: E, reinject: R) -> Binder<C>
    where
        C: Clone + Send + Sync + 'static,
        E: Fn(&T) -> C + Send + Sync + 'static,
        R: Fn(&mut T, C) + Send + Sync + 'static,
    {
        let parent_read = self.getter.read_fn();
        let read: Arc<ReadFn<C>> = Arc::new(move || extract(&parent_read()));

        let write: Option<Arc<WriteFn<C>>> = self.write.as_ref().map(|parent_write| {
            let parent_read = self.getter.read_fn();
            let parent_write = Arc::clone(parent_write);
            let write: Arc<WriteFn<C>> = Arc::new(move |value: C| {
                let mut parent = parent_read();
                reinject(&mut parent, value);
                parent_write(parent);
            });
            write
        });

        Binder {
            getter: Getter::from_parts(read, self.is_const()),
            write,
        }
    }

    /// Derive a read-only child binder.
    pub fn child_read_only<C, E>(&self, extract: E) -> Binder<C>
    where
        C: Clone + Send + Sync + 'static,
        E: Fn(&T) -> C + Send + Sync + 'static,
    {
        Binder::from_getter(self.getter.map(move |parent| extract(&parent)))
    }

    /// View the value through a lossless-enough conversion pair.
    ///
    /// Used to present every integer type through an `i64` field, every
    /// float through `f64`, and so on.
    pub fn cast<V>(&self, to: fn(&T) -> V, from: fn(V) -> T) -> Binder<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.child(to, move |target, value| *target = from(value))
    }
}

impl<U> Binder<Option<U>>
where
    U: Clone + Default + Send + Sync + 'static,
{
    /// Unwrap an optional value.
    ///
    /// Reads yield `U::default()` while the parent is `None`, and writes are
    /// dropped until a value exists.
    pub fn unwrap_or_default(&self) -> Binder<U> {
        let parent_read = self.getter.read_fn();
        let read: Arc<ReadFn<U>> = Arc::new(move || parent_read().unwrap_or_default());

        let write: Option<Arc<WriteFn<U>>> = self.write.as_ref().map(|parent_write| {
            let parent_read = self.getter.read_fn();
            let parent_write = Arc::clone(parent_write);
            let write: Arc<WriteFn<U>> = Arc::new(move |value: U| {
                if parent_read().is_some() {
                    parent_write(Some(value));
                }
            });
            write
        });

        Binder {
            getter: Getter::from_parts(read, self.is_const()),
            write,
        }
    }
}

impl<U: UiValue> Binder<Shared<U>> {
    /// Follow a shared reference.
    ///
    /// Writes go straight into the shared cell; the reference itself is not
    /// replaced, so no write-back to the parent is needed.
    pub fn deref_shared(&self) -> Binder<U> {
        let read_from = self.getter.read_fn();
        let read: Arc<ReadFn<U>> = Arc::new(move || read_from().get());

        let write: Option<Arc<WriteFn<U>>> = if self.is_read_only() {
            None
        } else {
            let target = self.getter.read_fn();
            let write: Arc<WriteFn<U>> = Arc::new(move |value: U| target().set(value));
            Some(write)
        };

        Binder {
            getter: Getter::from_parts(read, false),
            write,
        }
    }
}

impl<T> Clone for Binder<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            getter: self.getter.clone(),
            write: self.write.clone(),
        }
    }
}

impl<T> Debug for Binder<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("value", &self.get())
            .field("is_read_only", &self.is_read_only())
            .field("is_const", &self.is_const())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn read_only_set_is_a_noop() {
        let binder = Binder::read_only(|| 5);
        assert!(binder.is_read_only());

        for v in 0..10 {
            binder.set(v);
            assert_eq!(binder.get(), 5);
        }
    }

    #[test]
    fn shared_binder_writes_through() {
        let shared = Shared::new(1);
        let binder = Binder::from_shared(&shared);

        binder.set(9);
        assert_eq!(shared.get(), 9);
        assert!(!binder.is_read_only());
    }

    #[test]
    fn child_binder_writes_whole_parent_back() {
        let shared = Shared::new(Point { x: 1, y: 2 });
        let parent = Binder::from_shared(&shared);
        let x = parent.child(|p: &Point| p.x, |p, v| p.x = v);

        x.set(10);

        assert_eq!(shared.get(), Point { x: 10, y: 2 });
        assert_eq!(x.get(), 10);
    }

    #[test]
    fn child_of_read_only_parent_is_read_only() {
        let parent = Binder::constant(Point { x: 3, y: 4 });
        let y = parent.child(|p: &Point| p.y, |p, v| p.y = v);

        assert!(y.is_read_only());
        assert!(y.is_const());
        y.set(100);
        assert_eq!(y.get(), 4);
    }

    #[test]
    fn cast_converts_both_ways() {
        let shared = Shared::new(7u8);
        let wide = Binder::from_shared(&shared).cast(|v: &u8| i64::from(*v), |v| v.clamp(0, 255) as u8);

        assert_eq!(wide.get(), 7);
        wide.set(300);
        assert_eq!(shared.get(), 255);
    }

    #[test]
    fn unwrap_on_none_yields_default_and_ignores_writes() {
        let shared = Shared::new(None::<i32>);
        let inner = Binder::from_shared(&shared).unwrap_or_default();

        assert_eq!(inner.get(), 0);
        inner.set(4);
        assert_eq!(shared.get(), None);

        shared.set(Some(1));
        inner.set(4);
        assert_eq!(shared.get(), Some(4));
    }

    #[test]
    fn deref_shared_writes_into_the_cell() {
        let cell = Shared::new(3i32);
        let holder = Shared::new(cell.clone());
        let inner = Binder::from_shared(&holder).deref_shared();

        inner.set(8);
        assert_eq!(cell.get(), 8);
        assert!(holder.get().ptr_eq(&cell));
    }
}

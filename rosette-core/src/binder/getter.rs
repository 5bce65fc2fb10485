//! Getter Implementation
//!
//! A `Getter<T>` wraps a zero-argument read function. Constant getters are
//! flagged so value elements can skip pulling them on every sweep.

use std::any::{type_name, TypeId};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::shape::UiValue;

pub(crate) type ReadFn<T> = dyn Fn() -> T + Send + Sync;

/// A typed, side-effect-free read accessor.
pub struct Getter<T> {
    read: Arc<ReadFn<T>>,
    is_const: bool,
}

impl<T> Getter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wrap a read function.
    pub fn new<F>(read: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            is_const: false,
        }
    }

    /// A getter that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self {
            read: Arc::new(move || value.clone()),
            is_const: true,
        }
    }

    pub(crate) fn from_parts(read: Arc<ReadFn<T>>, is_const: bool) -> Self {
        Self { read, is_const }
    }

    /// Read the current value.
    pub fn get(&self) -> T {
        (self.read)()
    }

    /// Whether the value can never change.
    pub fn is_const(&self) -> bool {
        self.is_const
    }

    /// Runtime type tag of the value.
    pub fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    pub fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    /// Derive a getter by transforming every read. Constness is preserved.
    pub fn map<U, F>(&self, f: F) -> Getter<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let read = Arc::clone(&self.read);
        Getter {
            read: Arc::new(move || f(read())),
            is_const: self.is_const,
        }
    }

    pub(crate) fn read_fn(&self) -> Arc<ReadFn<T>> {
        Arc::clone(&self.read)
    }
}

impl<T: UiValue> Getter<T> {
    /// Whether the current value is a null (absent) value.
    pub fn is_null(&self) -> bool {
        self.get().is_null()
    }

    /// Whether values of this type can be null at all.
    pub fn is_nullable(&self) -> bool {
        T::NULLABLE
    }
}

impl<T> Clone for Getter<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            read: Arc::clone(&self.read),
            is_const: self.is_const,
        }
    }
}

impl<T> From<T> for Getter<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Getter::constant(value)
    }
}

impl<T> Debug for Getter<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("value", &self.get())
            .field("is_const", &self.is_const)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn constant_getter_is_const() {
        let getter = Getter::constant(3);
        assert!(getter.is_const());
        assert_eq!(getter.get(), 3);
    }

    #[test]
    fn function_getter_reads_live_value() {
        let source = Arc::new(AtomicI32::new(1));
        let source_clone = source.clone();
        let getter = Getter::new(move || source_clone.load(Ordering::SeqCst));

        assert!(!getter.is_const());
        assert_eq!(getter.get(), 1);
        source.store(5, Ordering::SeqCst);
        assert_eq!(getter.get(), 5);
    }

    #[test]
    fn map_preserves_constness() {
        let doubled = Getter::constant(4).map(|v| v * 2);
        assert!(doubled.is_const());
        assert_eq!(doubled.get(), 8);
    }

    #[test]
    fn nullability_follows_the_value_type() {
        let some = Getter::constant(Some(1i32));
        let none = Getter::constant(None::<i32>);
        let plain = Getter::constant(1i32);

        assert!(some.is_nullable());
        assert!(!some.is_null());
        assert!(none.is_null());
        assert!(!plain.is_nullable());
    }
}

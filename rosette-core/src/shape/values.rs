//! Value types with special meaning to element synthesis.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

use crate::element::{Element, LabelElement};

/// Identity of a live shared object, used by the circular-reference guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// A reference-semantics cell.
///
/// Clones point at the same value, so object graphs built from `Shared`
/// may contain cycles. Identity is the allocation address.
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    pub fn set(&self, value: T) {
        *self.0.write() = value;
    }

    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0) as *const () as usize)
    }
}

impl<T: Clone> Shared<T> {
    pub fn get(&self) -> T {
        self.0.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.object_id()).finish()
    }
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// An ordered pair edited by a min/max slider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

impl<T> MinMax<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// A value that knows how to present itself.
///
/// Synthesis calls this instead of reflecting over members, and calls it
/// again whenever the bound reference changes identity.
pub trait ElementCreator: Send + Sync {
    fn create_element(&self, label: Option<LabelElement>) -> Element;
}

/// A nullable, polymorphic self-describing value.
#[derive(Clone, Default)]
pub struct Creator(Option<Arc<dyn ElementCreator>>);

impl Creator {
    pub fn new<C: ElementCreator + 'static>(creator: C) -> Self {
        Self(Some(Arc::new(creator)))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&Arc<dyn ElementCreator>> {
        self.0.as_ref()
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        self.0
            .as_ref()
            .map(|creator| ObjectId(Arc::as_ptr(creator) as *const () as usize))
    }
}

impl From<Arc<dyn ElementCreator>> for Creator {
    fn from(creator: Arc<dyn ElementCreator>) -> Self {
        Self(Some(creator))
    }
}

impl Debug for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Creator").field(&self.object_id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_clones_share_identity() {
        let a = Shared::new(1);
        let b = a.clone();
        let c = Shared::new(1);

        assert_eq!(a.object_id(), b.object_id());
        assert_ne!(a.object_id(), c.object_id());
        assert_eq!(a, b);
        assert_ne!(a, c);

        b.set(5);
        assert_eq!(a.get(), 5);
    }
}

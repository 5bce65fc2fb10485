//! Recursion Tracking
//!
//! Synthesis recurses through the bound object graph. Shared references can
//! make that graph cyclic, so every object being expanded is pushed onto a
//! thread-local stack and a reference already on the stack is not expanded
//! again.
//!
//! # Scopes
//!
//! The stack is only touched through guards that pop on drop, so it stays
//! balanced on every exit path, including unwinding.
//!
//! # Snapshots
//!
//! List items and dynamic content are built later, from the update sweep,
//! outside the call chain that created their container. The container
//! captures a [`RecursionSnapshot`] when it is created and applies it around
//! each deferred build, so the ancestors are still visible to the guard.

use std::any::TypeId;
use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::shape::ObjectId;

thread_local! {
    static ACTIVE: RefCell<Vec<ObjectId>> = const { RefCell::new(Vec::new()) };
    static PRESENTERS: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Guard marking an object as being expanded.
pub struct RecursionScope {
    id: ObjectId,
}

impl RecursionScope {
    /// Push `id`. It is popped when the guard drops.
    pub fn enter(id: ObjectId) -> Self {
        ACTIVE.with(|stack| stack.borrow_mut().push(id));
        Self { id }
    }

    /// Whether `id` is being expanded further up the current chain.
    pub fn contains(id: ObjectId) -> bool {
        ACTIVE.with(|stack| stack.borrow().contains(&id))
    }

    pub fn depth() -> usize {
        ACTIVE.with(|stack| stack.borrow().len())
    }
}

impl Drop for RecursionScope {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(
                popped,
                Some(self.id),
                "RecursionScope mismatch: expected {:?}, got {:?}",
                self.id,
                popped
            );
        });
    }
}

/// A copy of the recursion stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursionSnapshot {
    stack: Vec<ObjectId>,
}

impl RecursionSnapshot {
    pub fn capture() -> Self {
        Self {
            stack: ACTIVE.with(|stack| stack.borrow().clone()),
        }
    }

    /// Replace the current stack with this snapshot until the guard drops.
    pub fn apply(&self) -> SnapshotScope {
        let previous = ACTIVE.with(|stack| stack.replace(self.stack.clone()));
        SnapshotScope { previous }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.stack.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Guard restoring the stack that was active before a snapshot was applied.
pub struct SnapshotScope {
    previous: Vec<ObjectId>,
}

impl Drop for SnapshotScope {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        ACTIVE.with(|stack| {
            stack.replace(previous);
        });
    }
}

/// Guard marking a custom presenter as running for a type.
///
/// While it is held, synthesis of the same type falls back to the built-in
/// presentation, so a presenter may decorate the default one.
pub(crate) struct PresenterScope {
    type_id: TypeId,
}

impl PresenterScope {
    pub(crate) fn try_enter<T: 'static>() -> Option<Self> {
        let type_id = TypeId::of::<T>();
        PRESENTERS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&type_id) {
                None
            } else {
                stack.push(type_id);
                Some(Self { type_id })
            }
        })
    }

    /// Whether the presenter for `T` is running on this thread.
    pub(crate) fn is_active<T: 'static>() -> bool {
        let type_id = TypeId::of::<T>();
        PRESENTERS.with(|stack| stack.borrow().contains(&type_id))
    }
}

impl Drop for PresenterScope {
    fn drop(&mut self) {
        PRESENTERS.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.type_id));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shared;

    #[test]
    fn scope_tracks_objects() {
        let first = Shared::new(1);
        let second = Shared::new(2);
        let (a, b) = (first.object_id(), second.object_id());
        assert_ne!(a, b);

        assert!(!RecursionScope::contains(a));
        {
            let _outer = RecursionScope::enter(a);
            assert!(RecursionScope::contains(a));
            {
                let _inner = RecursionScope::enter(b);
                assert_eq!(RecursionScope::depth(), 2);
            }
            assert!(!RecursionScope::contains(b));
        }
        assert_eq!(RecursionScope::depth(), 0);
    }

    #[test]
    fn snapshot_replays_and_restores() {
        let first = Shared::new(1);
        let second = Shared::new(2);
        let (a, b) = (first.object_id(), second.object_id());
        assert_ne!(a, b);

        let snapshot = {
            let _scope = RecursionScope::enter(a);
            RecursionSnapshot::capture()
        };
        assert!(snapshot.contains(a));
        assert!(!RecursionScope::contains(a));

        let _current = RecursionScope::enter(b);
        {
            let _replay = snapshot.apply();
            assert!(RecursionScope::contains(a));
            assert!(!RecursionScope::contains(b));
        }
        assert!(RecursionScope::contains(b));
        assert!(!RecursionScope::contains(a));
    }

    #[test]
    fn presenter_scope_blocks_reentry() {
        let outer = PresenterScope::try_enter::<u8>();
        assert!(outer.is_some());
        assert!(PresenterScope::try_enter::<u8>().is_none());
        assert!(PresenterScope::try_enter::<u16>().is_some());
        drop(outer);
        assert!(PresenterScope::try_enter::<u8>().is_some());
    }

    #[test]
    fn presenter_scope_reports_the_running_type() {
        assert!(!PresenterScope::is_active::<u32>());
        {
            let _running = PresenterScope::try_enter::<u32>();
            assert!(PresenterScope::is_active::<u32>());
            assert!(!PresenterScope::is_active::<u64>());
        }
        assert!(!PresenterScope::is_active::<u32>());
    }
}

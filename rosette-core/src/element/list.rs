//! List Item Container
//!
//! Presents a dynamically sized sequence. Item elements are built lazily,
//! the first time an index is requested, and are kept keyed by index.
//!
//! # Reindexing
//!
//! Item elements are bound to an index, not to a value, so after a
//! structural edit the element at index N keeps addressing slot N. What has
//! to move is the user-owned UI state (open folds): it follows the logical
//! item through the edit.
//!
//! 1. Capture the state of every materialized item and merge it with the
//!    states saved for unmaterialized indices
//! 2. Apply the edit to that state sequence
//! 3. Replay the shifted states onto the surviving item elements, destroy
//!    items whose slot is new or out of range
//! 4. Save the remaining states by index for lazy replay
//!
//! # External Changes
//!
//! Every sweep compares the list's identity and length against a snapshot.
//! A difference that the container did not perform itself saves all item
//! states by index, tears the items down, and asks the view to rebuild.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::label::LabelElement;
use super::node::WeakElement;
use super::state::ElementState;
use super::Element;
use crate::build::RecursionSnapshot;
use crate::config::UiConfig;
use crate::reactive::{Notifier, Subscription};
use crate::shape::ObjectId;

/// Access to the bound sequence, independent of its element type.
pub trait ListSource: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identity of the live sequence, for reference-bound lists.
    fn identity(&self) -> Option<ObjectId>;

    fn is_read_only(&self) -> bool;

    /// Build the element for the item at `index`.
    fn create_item(&self, index: usize, label: LabelElement) -> Element;

    /// Insert a default item at `index`.
    fn insert(&self, index: usize);

    fn remove(&self, index: usize);

    fn move_item(&self, from: usize, to: usize);
}

#[derive(Default)]
struct ListState {
    items: BTreeMap<usize, Element>,
    saved: HashMap<usize, ElementState>,
    last_identity: Option<ObjectId>,
    last_count: usize,
}

pub struct ListContainer {
    owner: WeakElement,
    source: Arc<dyn ListSource>,
    read_only: bool,
    label_prefix: String,
    recursion: RecursionSnapshot,
    state: Mutex<ListState>,
    rebuild_requested: Notifier<usize>,
}

impl ListContainer {
    pub(crate) fn new(owner: &WeakElement, source: Arc<dyn ListSource>) -> Self {
        let state = ListState {
            last_identity: source.identity(),
            last_count: source.len(),
            ..ListState::default()
        };
        Self {
            owner: owner.clone(),
            read_only: source.is_read_only(),
            label_prefix: UiConfig::current().list_item_label_prefix.clone(),
            recursion: RecursionSnapshot::capture(),
            state: Mutex::new(state),
            rebuild_requested: Notifier::new(),
            source,
        }
    }

    /// Live item count.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Whether add and remove are disabled. Fixed at construction.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Element for the item at `index`, built on first request.
    pub fn get_or_create_item_element(&self, index: usize) -> Option<Element> {
        if index >= self.source.len() {
            return None;
        }
        if let Some(existing) = self.state.lock().items.get(&index) {
            return Some(existing.clone());
        }

        let label = LabelElement::new(format!("{} {}", self.label_prefix, index));
        let created = {
            let _replay = self.recursion.apply();
            self.source.create_item(index, label)
        };

        let (element, saved) = {
            let mut state = self.state.lock();
            match state.items.get(&index) {
                Some(existing) => (existing.clone(), None),
                None => {
                    state.items.insert(index, created.clone());
                    (created.clone(), state.saved.remove(&index))
                }
            }
        };

        if element != created {
            created.destroy();
            return Some(element);
        }

        if let Some(owner) = self.owner.upgrade() {
            element.link_parent(&owner);
        }
        if let Some(saved) = saved {
            element.apply_state(&saved);
        }
        Some(element)
    }

    /// Indices that currently have an item element.
    pub fn materialized_indices(&self) -> Vec<usize> {
        self.state.lock().items.keys().copied().collect()
    }

    pub(crate) fn materialized(&self) -> Vec<Element> {
        self.state.lock().items.values().cloned().collect()
    }

    /// UI state waiting to be replayed onto an item not yet materialized.
    pub fn saved_state(&self, index: usize) -> Option<ElementState> {
        self.state.lock().saved.get(&index).cloned()
    }

    /// Called when external changes invalidate every item. The argument is
    /// the new item count.
    pub fn subscribe_rebuild<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&usize) + Send + Sync + 'static,
    {
        self.rebuild_requested.subscribe(callback)
    }

    /// Insert a default item at `index` and reindex.
    pub fn add_item(&self, index: usize) -> bool {
        if self.read_only {
            return false;
        }
        self.source.insert(index.min(self.source.len()));
        self.notify_item_inserted(index);
        true
    }

    /// Append a default item.
    pub fn push_item(&self) -> bool {
        self.add_item(self.source.len())
    }

    pub fn remove_item(&self, index: usize) -> bool {
        if self.read_only || index >= self.source.len() {
            return false;
        }
        self.source.remove(index);
        self.notify_item_removed(index);
        true
    }

    pub fn move_item(&self, from: usize, to: usize) -> bool {
        let len = self.source.len();
        if self.read_only || from >= len || to >= len {
            return false;
        }
        if from != to {
            self.source.move_item(from, to);
            self.notify_item_moved(from, to);
        }
        true
    }

    /// The view inserted an item at `index` itself.
    pub fn notify_item_inserted(&self, index: usize) {
        self.reindex(|slots| {
            let index = index.min(slots.len());
            slots.insert(index, None);
        });
    }

    /// The view removed the item at `index` itself.
    pub fn notify_item_removed(&self, index: usize) {
        self.reindex(|slots| {
            if index < slots.len() {
                slots.remove(index);
            }
        });
    }

    /// The view moved an item from `from` to `to` itself.
    pub fn notify_item_moved(&self, from: usize, to: usize) {
        self.reindex(|slots| {
            if from < slots.len() {
                let moved = slots.remove(from);
                let to = to.min(slots.len());
                slots.insert(to, moved);
            }
        });
    }

    fn reindex<F>(&self, edit: F)
    where
        F: FnOnce(&mut Vec<Option<ElementState>>),
    {
        let (items, mut saved, last_count) = {
            let mut state = self.state.lock();
            (
                std::mem::take(&mut state.items),
                std::mem::take(&mut state.saved),
                state.last_count,
            )
        };

        let len = [
            last_count,
            items.keys().next_back().map_or(0, |i| i + 1),
            saved.keys().max().map_or(0, |i| i + 1),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        let mut slots: Vec<Option<ElementState>> = (0..len)
            .map(|index| match items.get(&index) {
                Some(element) => Some(element.capture_state()),
                None => saved.remove(&index),
            })
            .collect();

        edit(&mut slots);

        let count = self.source.len();
        let mut kept = BTreeMap::new();
        let mut doomed = Vec::new();
        for (index, element) in items {
            match slots.get_mut(index).and_then(Option::take) {
                Some(state) if index < count => {
                    element.apply_state(&state);
                    kept.insert(index, element);
                }
                _ => doomed.push(element),
            }
        }

        let saved: HashMap<usize, ElementState> = slots
            .into_iter()
            .enumerate()
            .take(count)
            .filter_map(|(index, state)| state.map(|state| (index, state)))
            .collect();

        {
            let mut state = self.state.lock();
            state.items = kept;
            state.saved = saved;
            state.last_count = count;
            state.last_identity = self.source.identity();
        }

        for element in doomed {
            element.destroy();
        }
    }

    /// Detect structural changes made behind the container's back.
    pub(crate) fn sync(&self) {
        let count = self.source.len();
        let identity = self.source.identity();

        let stale = {
            let mut state = self.state.lock();
            if state.last_count == count && state.last_identity == identity {
                return;
            }
            state.last_count = count;
            state.last_identity = identity;
            std::mem::take(&mut state.items)
        };

        let captured: Vec<(usize, ElementState)> = stale
            .iter()
            .map(|(index, element)| (*index, element.capture_state()))
            .collect();
        {
            let mut state = self.state.lock();
            state.saved.extend(captured);
            state.saved.retain(|index, _| *index < count);
        }

        for element in stale.into_values() {
            element.destroy();
        }

        tracing::debug!(count, "list changed externally, rebuilding items");
        self.rebuild_requested.notify(&count);
    }

    /// Drop `element` from the item map. The slot is rebuilt on next request.
    pub(crate) fn forget_item(&self, element: &Element) {
        self.state.lock().items.retain(|_, item| item != element);
    }

    pub(crate) fn release(&self) {
        let items = std::mem::take(&mut self.state.lock().items);
        for element in items.into_values() {
            element.destroy();
        }
        self.rebuild_requested.clear();
    }
}

impl fmt::Debug for ListContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListContainer")
            .field("len", &self.len())
            .field("read_only", &self.read_only)
            .field("materialized", &self.materialized_indices())
            .finish()
    }
}

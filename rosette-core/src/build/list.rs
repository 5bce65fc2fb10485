//! `Vec` lists.
//!
//! Items of a `Vec<U>` are values, so each item binder is a child binder
//! that writes the whole vector back through the list binder.

use std::sync::Arc;

use super::dispatch::build_field;
use super::request::{FieldRequest, ListRequest};
use crate::binder::{Binder, Getter};
use crate::element::{
    Element, ElementKind, FoldData, LabelElement, ListContainer, ListSource,
};
use crate::shape::{ObjectId, UiValue};

struct VecSource<U>
where
    U: UiValue + Default,
{
    binder: Binder<Vec<U>>,
    identity: Option<Getter<Option<ObjectId>>>,
}

impl<U> VecSource<U>
where
    U: UiValue + Default,
{
    fn item_binder(&self, index: usize) -> Binder<U> {
        self.binder.child(
            move |items: &Vec<U>| items.get(index).cloned().unwrap_or_default(),
            move |items, item| {
                if let Some(slot) = items.get_mut(index) {
                    *slot = item;
                }
            },
        )
    }
}

impl<U> ListSource for VecSource<U>
where
    U: UiValue + Default,
{
    fn len(&self) -> usize {
        self.binder.get().len()
    }

    fn identity(&self) -> Option<ObjectId> {
        self.identity.as_ref().and_then(Getter::get)
    }

    fn is_read_only(&self) -> bool {
        self.binder.is_read_only()
    }

    fn create_item(&self, index: usize, label: LabelElement) -> Element {
        build_field(FieldRequest::field(Some(label), self.item_binder(index)))
    }

    fn insert(&self, index: usize) {
        self.binder.update(|items| {
            let index = index.min(items.len());
            items.insert(index, U::default());
        });
    }

    fn remove(&self, index: usize) {
        self.binder.update(|items| {
            if index < items.len() {
                items.remove(index);
            }
        });
    }

    fn move_item(&self, from: usize, to: usize) {
        self.binder.update(|items| {
            if from < items.len() {
                let item = items.remove(from);
                let to = to.min(items.len());
                items.insert(to, item);
            }
        });
    }
}

/// List container for a `Vec<U>`, folded under its caption when it has one.
pub(crate) fn vec_list<U>(request: ListRequest<Vec<U>>) -> Element
where
    U: UiValue + Default,
{
    let ListRequest { field, identity } = request;
    let FieldRequest { label, binder, .. } = field;

    let source: Arc<dyn ListSource> = Arc::new(VecSource { binder, identity });
    let list = Element::with_kind(|owner| ElementKind::List(ListContainer::new(owner, source)));
    tracing::debug!(
        item_type = U::type_name(),
        len = list.as_list().map_or(0, ListContainer::len),
        "list container created"
    );

    match label {
        Some(label) => {
            let fold = Element::new(ElementKind::Fold(FoldData::new(false)));
            fold.adopt(label.into_element());
            fold.adopt(list);
            fold
        }
        None => list,
    }
}

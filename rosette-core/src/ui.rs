//! Element Constructors
//!
//! Short, composable constructors for building element trees by hand.
//!
//! ```rust,ignore
//! use rosette_core::binder::Binder;
//! use rosette_core::build::SliderRange;
//! use rosette_core::shape::Shared;
//! use rosette_core::ui;
//!
//! let volume = Shared::new(5i32);
//! let window = ui::window("Mixer", vec![
//!     ui::slider("Volume", Binder::from_shared(&volume), SliderRange::new(0, 10)),
//!     ui::button("Reset", move || volume.set(5)),
//! ])?;
//! ```
//!
//! Group constructors check every child before attaching any of them, so a
//! failed call leaves all children untouched.

use crate::binder::Binder;
use crate::build::{self, SliderRange};
use crate::element::{
    ButtonData, DynamicData, Element, ElementKind, FoldData, GroupKind, LabelElement, RebuildKey,
    WindowData,
};
use crate::error::{Result, UiError};
use crate::shape::{MinMax, UiValue};

/// A caption.
pub fn label(text: impl Into<LabelElement>) -> Element {
    text.into().into_element()
}

/// The default presentation of `binder`.
pub fn field<T: UiValue>(label: impl Into<LabelElement>, binder: Binder<T>) -> Element {
    build::create_field_element(Some(label.into()), binder)
}

/// Like [`field`], without a caption.
pub fn field_unlabeled<T: UiValue>(binder: Binder<T>) -> Element {
    build::create_field_element(None, binder)
}

pub fn slider<T: UiValue>(
    label: impl Into<LabelElement>,
    binder: Binder<T>,
    range: SliderRange<T>,
) -> Element {
    build::create_slider_element(Some(label.into()), binder, range)
}

pub fn min_max_slider<T: UiValue>(
    label: impl Into<LabelElement>,
    binder: Binder<MinMax<T>>,
    range: SliderRange<T>,
) -> Element {
    build::create_min_max_slider_element(Some(label.into()), binder, range)
}

/// A list container for a vector, folded under `label`.
pub fn list<U>(label: impl Into<LabelElement>, binder: Binder<Vec<U>>) -> Element
where
    U: UiValue + Default,
{
    field(label, binder)
}

pub fn button<F>(text: impl Into<LabelElement>, action: F) -> Element
where
    F: Fn() + Send + Sync + 'static,
{
    let button = Element::new(ElementKind::Button(ButtonData::new(action)));
    button.adopt(text.into().into_element());
    button
}

pub fn space() -> Element {
    Element::new(ElementKind::Space)
}

/// An element whose single child is rebuilt whenever `key` changes.
pub fn dynamic<K, B>(key: K, build: B) -> Element
where
    K: Fn() -> RebuildKey + Send + Sync + 'static,
    B: Fn() -> Element + Send + Sync + 'static,
{
    let element = Element::new(ElementKind::Dynamic(DynamicData::new(key, build)));
    if let Some(dynamic) = element.as_dynamic() {
        dynamic.refresh(&element);
    }
    element
}

pub fn row(children: Vec<Element>) -> Result<Element> {
    group(ElementKind::Group(GroupKind::Row), children)
}

pub fn column(children: Vec<Element>) -> Result<Element> {
    group(ElementKind::Group(GroupKind::Column), children)
}

pub fn box_group(children: Vec<Element>) -> Result<Element> {
    group(ElementKind::Group(GroupKind::Box), children)
}

pub fn page(children: Vec<Element>) -> Result<Element> {
    group(ElementKind::Group(GroupKind::Page), children)
}

/// A caption followed by inline sub-fields.
pub fn composite_field(label: impl Into<LabelElement>, children: Vec<Element>) -> Result<Element> {
    titled_group(ElementKind::Group(GroupKind::CompositeField), label.into(), children)
}

/// A collapsible group, initially closed.
pub fn fold(header: impl Into<LabelElement>, children: Vec<Element>) -> Result<Element> {
    titled_group(ElementKind::Fold(FoldData::new(false)), header.into(), children)
}

/// A top-level window. Close it with `set_enable(false)`.
pub fn window(title: impl Into<LabelElement>, children: Vec<Element>) -> Result<Element> {
    titled_group(ElementKind::Window(WindowData::new(true)), title.into(), children)
}

fn titled_group(kind: ElementKind, title: LabelElement, children: Vec<Element>) -> Result<Element> {
    let element = group(kind, children)?;
    element.insert_child(0, title.into_element())?;
    Ok(element)
}

fn group(kind: ElementKind, children: Vec<Element>) -> Result<Element> {
    let group = Element::new(kind);
    for (index, child) in children.iter().enumerate() {
        group.validate_child(child)?;
        if children[..index].contains(child) {
            return Err(UiError::AlreadyParented {
                child: child.id(),
                parent: group.id(),
            });
        }
    }
    for child in children {
        group.adopt(child);
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shared;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn failed_group_leaves_children_untouched() {
        let shared = label("shared");
        let _owner = row(vec![shared.clone()]).unwrap();
        let free = label("free");

        let result = column(vec![free.clone(), shared]);

        assert!(result.is_err());
        assert!(free.parent().is_none());
    }

    #[test]
    fn duplicate_children_are_rejected() {
        let twice = space();
        assert!(row(vec![twice.clone(), twice.clone()]).is_err());
        assert!(twice.parent().is_none());
    }

    #[test]
    fn titled_groups_lead_with_their_caption() {
        let fold = fold("Advanced", vec![space()]).unwrap();
        assert_eq!(fold.caption().as_deref(), Some("Advanced"));
        assert_eq!(fold.child_count(), 2);
        assert!(!fold.as_fold().unwrap().is_open());

        let window = window("Inspector", vec![]).unwrap();
        assert!(window.as_window().unwrap().closable);
        window.set_enable(false);
        assert!(!window.is_enabled());
    }

    #[test]
    fn button_runs_its_action() {
        let presses = Arc::new(AtomicI32::new(0));
        let presses_clone = presses.clone();
        let button = button("Bump", move || {
            presses_clone.fetch_add(1, Ordering::SeqCst);
        });

        button.as_button().unwrap().press();
        button.as_button().unwrap().press();

        assert_eq!(presses.load(Ordering::SeqCst), 2);
        assert_eq!(button.caption().as_deref(), Some("Bump"));
    }

    #[test]
    fn list_is_folded_under_its_label() {
        let values = Shared::new(vec![1.0f32, 2.0]);
        let element = list("Values", Binder::from_shared(&values));

        assert!(element.as_fold().is_some());
        let container = element.child(1).unwrap();
        assert_eq!(container.as_list().unwrap().len(), 2);
    }
}

//! Integration Tests for Element Synthesis
//!
//! These tests drive the public API end to end: binders in, element trees
//! out, edits flowing back through the update loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use rosette_core::binder::Binder;
use rosette_core::build::{create_field_element, SliderRange};
use rosette_core::element::{Element, FieldData, GroupKind, SliderData};
use rosette_core::persist::{restore_state, save_state};
use rosette_core::shape::{CompositeShape, Shape, Shared, UiValue};
use rosette_core::ui;
use rosette_core::update::UpdateLoop;
use rosette_core::UiError;

#[derive(Debug, Clone, Default, PartialEq)]
struct Xyz {
    x: f32,
    y: f32,
    z: f32,
}

impl UiValue for Xyz {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            CompositeShape::builder()
                .field("x", |v: &Xyz| v.x, |v, x| v.x = x)
                .field("y", |v: &Xyz| v.y, |v, y| v.y = y)
                .field("z", |v: &Xyz| v.z, |v, z| v.z = z)
                .build(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Quat {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl UiValue for Quat {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            CompositeShape::builder()
                .field("x", |q: &Quat| q.x, |q, v| q.x = v)
                .field("y", |q: &Quat| q.y, |q, v| q.y = v)
                .field("z", |q: &Quat| q.z, |q, v| q.z = v)
                .field("w", |q: &Quat| q.w, |q, v| q.w = v)
                .build(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Short {
    width: i32,
}

impl UiValue for Short {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            CompositeShape::builder()
                .field("width", |s: &Short| s.width, |s, v| s.width = v)
                .build(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Long {
    height: i32,
}

impl UiValue for Long {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            CompositeShape::builder()
                .field("height", |l: &Long| l.height, |l, v| l.height = v)
                .build(),
        )
    }
}

#[derive(Clone, Default)]
struct Node {
    name: String,
    next: Option<Shared<Node>>,
}

impl UiValue for Node {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            CompositeShape::builder()
                .field("name", |n: &Node| n.name.clone(), |n, v| n.name = v)
                .field("next", |n: &Node| n.next.clone(), |n, v| n.next = v)
                .build(),
        )
    }
}

fn fold_is_open(element: &Element) -> bool {
    element.as_fold().map(|fold| fold.is_open()).unwrap_or(false)
}

/// A child can belong to one parent only.
#[test]
fn element_has_a_single_parent() {
    let child = ui::label("child");
    let first = ui::row(vec![child.clone()]).unwrap();
    let second = ui::column(vec![]).unwrap();

    let result = second.add_child(child.clone());

    assert!(matches!(result, Err(UiError::AlreadyParented { .. })));
    assert_eq!(child.parent(), Some(first));
    assert_eq!(second.child_count(), 0);
}

/// Writing through a read-only binder does nothing.
#[test]
fn read_only_binder_ignores_writes() {
    let shared = Shared::new(4i32);
    let reader = shared.clone();
    let binder = Binder::read_only(move || reader.get());

    binder.set(9);
    assert_eq!(shared.get(), 4);
    assert_eq!(binder.get(), 4);

    let element = ui::field("count", binder);
    let Some(FieldData::Int(bridge)) = element.as_field() else {
        panic!("expected an integer field");
    };
    assert!(!bridge.set_value_from_view(9));
    assert_eq!(shared.get(), 4);
}

/// A child binder reads from and writes back through its parent.
#[test]
fn child_binder_round_trips_through_parent() {
    let shared = Shared::new(Xyz { x: 1.0, y: 2.0, z: 3.0 });
    let parent = Binder::from_shared(&shared);
    let y = parent.child(|v: &Xyz| v.y, |v, y| v.y = y);

    assert_eq!(y.get(), 2.0);
    y.set(5.0);
    assert_eq!(shared.get(), Xyz { x: 1.0, y: 5.0, z: 3.0 });

    let z: Binder<f32> = parent.member("z").unwrap();
    z.set(7.0);
    assert_eq!(shared.get().z, 7.0);
}

/// Fold states follow their items through structural edits.
#[test]
fn list_reindex_moves_fold_state_with_items() {
    let shared = Shared::new(vec![Quat::default(), Quat::default(), Quat::default()]);
    let element = create_field_element(None, Binder::from_shared(&shared));
    let list = element.as_list().unwrap();

    let item0 = list.get_or_create_item_element(0).unwrap();
    let item1 = list.get_or_create_item_element(1).unwrap();
    let item2 = list.get_or_create_item_element(2).unwrap();
    assert!(item1.as_fold().is_some());
    item1.as_fold().unwrap().set_open(true);

    assert!(list.add_item(0));
    assert_eq!(shared.read().len(), 4);

    assert!(item0.is_destroyed());
    assert!(!fold_is_open(&list.get_or_create_item_element(1).unwrap()));
    assert!(fold_is_open(&list.get_or_create_item_element(2).unwrap()));
    assert!(!fold_is_open(&list.get_or_create_item_element(3).unwrap()));
    assert!(!item2.is_destroyed());

    assert!(list.remove_item(0));
    assert!(fold_is_open(&list.get_or_create_item_element(1).unwrap()));
    assert!(!fold_is_open(&list.get_or_create_item_element(0).unwrap()));
}

/// A value that refers back to itself is shown once, then cut off.
#[test]
fn circular_reference_is_replaced_by_placeholder() {
    let node = Shared::new(Node {
        name: "head".to_string(),
        next: None,
    });
    node.write().next = Some(node.clone());

    let element = create_field_element(Some("node".into()), Binder::constant(node.clone()));

    let placeholder = element
        .find(|e| {
            e.caption()
                .is_some_and(|text| text.starts_with("circular reference"))
        })
        .expect("a circular reference placeholder");
    let group = placeholder.parent().unwrap();
    assert_eq!(group.as_group(), Some(GroupKind::CompositeField));
    assert!(!group.is_interactable());

    node.write().next = None;
}

/// Up to three short primitive members fit on one line.
#[test]
fn single_line_heuristic_boundaries() {
    let three = create_field_element(Some("a".into()), Binder::constant(Xyz::default()));
    assert_eq!(three.as_group(), Some(GroupKind::CompositeField));

    let four = create_field_element(Some("b".into()), Binder::constant(Quat::default()));
    assert!(four.as_fold().is_some());

    let short = create_field_element(Some("c".into()), Binder::constant(Short::default()));
    assert_eq!(short.as_group(), Some(GroupKind::CompositeField));

    let long = create_field_element(Some("d".into()), Binder::constant(Long::default()));
    assert!(long.as_fold().is_some());
}

/// Updating without data changes leaves the tree alone.
#[test]
fn update_is_idempotent() {
    let shared = Shared::new(Some(Xyz::default()));
    let element = create_field_element(Some("maybe".into()), Binder::from_shared(&shared));
    let dynamic = element.find(|e| e.as_dynamic().is_some()).unwrap();

    let rebuilds = Arc::new(AtomicI32::new(0));
    let rebuilds_clone = rebuilds.clone();
    let _sub = dynamic.as_dynamic().unwrap().subscribe_rebuilt(move |_| {
        rebuilds_clone.fetch_add(1, Ordering::SeqCst);
    });

    let before = dynamic.children();
    element.update();
    element.update();
    assert_eq!(rebuilds.load(Ordering::SeqCst), 0);
    assert_eq!(dynamic.children(), before);

    shared.set(None);
    element.update();
    element.update();
    assert_eq!(rebuilds.load(Ordering::SeqCst), 1);
    assert!(before.iter().all(Element::is_destroyed));
}

/// A slider edit reaches the data and is reported once at the root.
#[test]
fn slider_edit_end_to_end() {
    let shared = Shared::new(5i32);
    let slider = ui::slider("speed", Binder::from_shared(&shared), SliderRange::new(0, 10));
    let root = ui::window("settings", vec![slider.clone()]).unwrap();

    let changes = Arc::new(AtomicI32::new(0));
    let changes_clone = changes.clone();
    let _sub = root.subscribe_view_value_changed(move |_| {
        changes_clone.fetch_add(1, Ordering::SeqCst);
    });

    let Some(SliderData::Int(field)) = slider.as_slider() else {
        panic!("expected an integer slider");
    };
    assert!(!field.bridge.is_read_only());
    assert_eq!(field.bridge.value(), 5);
    assert_eq!(field.range(), (0, 10));

    assert!(field.bridge.set_value_from_view(7));
    assert_eq!(shared.get(), 7);
    assert_eq!(changes.load(Ordering::SeqCst), 1);
}

/// The update loop drives every registered root each tick.
#[test]
fn update_loop_drives_roots() {
    let ticks = Arc::new(AtomicI32::new(0));
    let a = ui::column(vec![]).unwrap();
    let b = ui::column(vec![]).unwrap();
    for root in [&a, &b] {
        let ticks = ticks.clone();
        root.own(root.on_update(move |_| {
            ticks.fetch_add(1, Ordering::SeqCst);
        }));
    }

    let mut update_loop = UpdateLoop::new();
    update_loop.register(a.clone());
    update_loop.register(b.clone());
    update_loop.tick();
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    b.destroy();
    update_loop.tick();
    assert_eq!(ticks.load(Ordering::SeqCst), 3);
    assert_eq!(update_loop.len(), 1);
}

/// Fold states survive a save and restore through a host store.
#[test]
fn fold_state_persists_across_rebuilds() {
    let shared = Shared::new(Quat::default());
    let mut store: HashMap<String, Vec<u8>> = HashMap::new();

    let first = create_field_element(Some("rotation".into()), Binder::from_shared(&shared));
    first.as_fold().unwrap().set_open(true);
    save_state(&first, "rotation", &mut store).unwrap();
    first.destroy();

    let second = create_field_element(Some("rotation".into()), Binder::from_shared(&shared));
    assert!(!fold_is_open(&second));
    assert!(restore_state(&second, "rotation", &store).unwrap());
    assert!(fold_is_open(&second));
}

//! Binder to Element
//!
//! Dispatch for one binder, first match wins:
//!
//! 1. The bound object is already being expanded: circular placeholder
//! 2. A custom presenter is registered for the exact type
//! 3. Primitive leaves: numbers, text, booleans, colors, enums
//! 4. Nullable values: null guard around the unwrapped value
//! 5. Self-describing values and shared references: rebuilt on identity change
//! 6. Lists: list item container
//! 7. Composites: one element per member, inline or folded

use super::recursion::{PresenterScope, RecursionScope};
use super::registry::PresenterRegistry;
use super::request::{FieldRequest, ListRequest, MinMaxRequest, Presentation, SliderRange};
use crate::binder::{Binder, Getter};
use crate::config::UiConfig;
use crate::element::{
    Element, ElementKind, FieldData, FoldData, GroupKind, LabelElement, LabelType, MinMaxData,
    MinMaxField, RebuildKey, SliderData, SliderField, ViewBridge, WeakElement,
};
use crate::shape::{Cast, CompositeShape, MinMax, ObjectId, Shape, Shared, TypeCache, UiValue};
use crate::ui;

/// Build the field element for `binder`.
pub fn create_field_element<T: UiValue>(label: Option<LabelElement>, binder: Binder<T>) -> Element {
    build_field(FieldRequest::field(label, binder))
}

/// Build a slider for `binder`.
///
/// Composite values get one slider per numeric member, with the bounds
/// projected onto each member.
pub fn create_slider_element<T: UiValue>(
    label: Option<LabelElement>,
    binder: Binder<T>,
    range: SliderRange<T>,
) -> Element {
    build_field(FieldRequest::slider(label, binder, range))
}

/// Build a min/max slider for a pair of values.
pub fn create_min_max_slider_element<T: UiValue>(
    label: Option<LabelElement>,
    binder: Binder<MinMax<T>>,
    range: SliderRange<T>,
) -> Element {
    build_min_max(MinMaxRequest {
        label,
        binder,
        range,
    })
}

pub(crate) fn build_field<T: UiValue>(request: FieldRequest<T>) -> Element {
    let identity = request.binder.get().object_id();
    if let Some(id) = identity {
        if RecursionScope::contains(id) {
            return circular_placeholder::<T>(request.label);
        }
    }

    if let Some(presenter) = PresenterRegistry::lookup::<T>() {
        if let Some(_presenting) = PresenterScope::try_enter::<T>() {
            return presenter(request.label, request.binder);
        }
    }

    let shape = TypeCache::shape::<T>();

    // Reference-like shapes push their identity themselves, inside the
    // rebuild closure.
    let _expanding = match (&*shape, identity) {
        (Shape::Composite(_) | Shape::List(_), Some(id)) => Some(RecursionScope::enter(id)),
        _ => None,
    };

    let config = UiConfig::current();
    match &*shape {
        Shape::Int(cast) => {
            let (min, max) = config.default_int_range;
            numeric(request, *cast, NumericKind {
                from_f64: |v| v.round() as i64,
                default_range: (min, max),
                field: FieldData::Int,
                slider: SliderData::Int,
            })
        }
        Shape::UInt(cast) => {
            let (min, max) = config.default_int_range;
            numeric(request, *cast, NumericKind {
                from_f64: |v| v.max(0.0).round() as u64,
                default_range: (min.max(0) as u64, max.max(0) as u64),
                field: FieldData::UInt,
                slider: SliderData::UInt,
            })
        }
        Shape::Float(cast) => numeric(request, *cast, NumericKind {
            from_f64: |v| v,
            default_range: config.default_float_range,
            field: FieldData::Float,
            slider: SliderData::Float,
        }),
        Shape::Text(cast) => {
            let multiline = request.attributes.multiline;
            let value = request.binder.cast(cast.to, cast.from);
            leaf(request.label, |owner| {
                ElementKind::Field(FieldData::Text {
                    bridge: ViewBridge::new(owner, value),
                    multiline,
                })
            })
        }
        Shape::Bool(cast) => {
            let value = request.binder.cast(cast.to, cast.from);
            leaf(request.label, |owner| {
                ElementKind::Field(FieldData::Toggle(ViewBridge::new(owner, value)))
            })
        }
        Shape::Color(cast) => {
            let value = request.binder.cast(cast.to, cast.from);
            leaf(request.label, |owner| {
                ElementKind::Field(FieldData::Color(ViewBridge::new(owner, value)))
            })
        }
        Shape::Enum(shape) => {
            let options = shape.options.clone();
            let value = request.binder.cast(shape.to_index, shape.from_index);
            leaf(request.label, |owner| {
                ElementKind::Field(FieldData::Dropdown {
                    bridge: ViewBridge::new(owner, value),
                    options,
                })
            })
        }
        Shape::Nullable(nested) | Shape::Reference(nested) => (nested.build)(request),
        Shape::SelfDescribing(shape) => self_describing(request, shape.identity, shape.create),
        Shape::List(list) => (list.build)(ListRequest {
            field: request,
            identity: None,
        }),
        Shape::Composite(composite) => expand_composite(request, composite),
    }
}

pub(crate) fn build_min_max<T: UiValue>(request: MinMaxRequest<T>) -> Element {
    let shape = TypeCache::shape::<T>();
    let config = UiConfig::current();
    match &*shape {
        Shape::Int(cast) => {
            let (min, max) = config.default_int_range;
            min_max_numeric(request, *cast, (min, max), MinMaxData::Int)
        }
        Shape::UInt(cast) => {
            let (min, max) = config.default_int_range;
            let range = (min.max(0) as u64, max.max(0) as u64);
            min_max_numeric(request, *cast, range, MinMaxData::UInt)
        }
        Shape::Float(cast) => {
            min_max_numeric(request, *cast, config.default_float_range, MinMaxData::Float)
        }
        Shape::Composite(composite) => {
            let MinMaxRequest {
                label,
                binder,
                range,
            } = request;
            let members = composite
                .fields()
                .map(|field| field.build_min_max(&binder, &range, LabelElement::new(field.name())))
                .collect();
            titled(label, members)
        }
        _ => build_field(FieldRequest::field(request.label, request.binder)),
    }
}

/// Null guard around an optional value.
pub(crate) fn nullable<U>(request: FieldRequest<Option<U>>) -> Element
where
    U: UiValue + Default,
{
    let FieldRequest {
        label,
        binder,
        presentation,
        attributes,
    } = request;

    let presentation = match presentation {
        Presentation::Field => Presentation::Field,
        Presentation::Slider(range) => {
            Presentation::Slider(range.project(|value: &Option<U>| value.clone().unwrap_or_default()))
        }
    };

    let key_binder = binder.clone();
    ui::dynamic(
        move || RebuildKey::of_presence(key_binder.get().is_some()),
        move || {
            if binder.get().is_some() {
                build_field(FieldRequest {
                    label: label.clone(),
                    binder: binder.unwrap_or_default(),
                    presentation: presentation.clone(),
                    attributes,
                })
            } else {
                null_guard(label.clone(), &binder)
            }
        },
    )
}

/// Follow a shared reference, rebuilding when it points somewhere else.
pub(crate) fn reference<U: UiValue>(request: FieldRequest<Shared<U>>) -> Element {
    let FieldRequest {
        label,
        binder,
        presentation,
        attributes,
    } = request;
    let identity = binder
        .getter()
        .map(|shared: Shared<U>| Some(shared.object_id()));

    // List containers track identity changes themselves. The list stays on
    // the recursion stack while the container captures its snapshot, so
    // items that lead back to it are cut off.
    if let Shape::List(list) = &*TypeCache::shape::<U>() {
        let _expanding = RecursionScope::enter(binder.get().object_id());
        return (list.build)(ListRequest {
            field: FieldRequest {
                label,
                binder: binder.deref_shared(),
                presentation: Presentation::Field,
                attributes,
            },
            identity: Some(identity),
        });
    }

    let presentation = match presentation {
        Presentation::Field => Presentation::Field,
        Presentation::Slider(range) => {
            Presentation::Slider(range.project(|shared: &Shared<U>| shared.get()))
        }
    };

    ui::dynamic(
        move || RebuildKey::of_identity(identity.get()),
        move || {
            let id = binder.get().object_id();
            if RecursionScope::contains(id) {
                return circular_placeholder::<U>(label.clone());
            }
            let _expanding = RecursionScope::enter(id);
            build_field(FieldRequest {
                label: label.clone(),
                binder: binder.deref_shared(),
                presentation: presentation.clone(),
                attributes,
            })
        },
    )
}

/// Caption plus a neutral "null" text, for values that cannot be created.
pub(crate) fn null_placeholder(label: Option<LabelElement>) -> Element {
    let row = assemble(ElementKind::Group(GroupKind::CompositeField), label, Vec::new());
    row.adopt(ui::label("null"));
    row
}

fn null_guard<U>(label: Option<LabelElement>, binder: &Binder<Option<U>>) -> Element
where
    U: UiValue + Default,
{
    if binder.is_read_only() {
        return null_placeholder(label);
    }
    let target = binder.clone();
    let create = ui::button("Create", move || target.set(Some(U::default())));
    assemble(
        ElementKind::Group(GroupKind::CompositeField),
        label,
        vec![create],
    )
}

fn circular_placeholder<T: UiValue>(label: Option<LabelElement>) -> Element {
    tracing::warn!(
        type_name = T::type_name(),
        "circular reference, substituting placeholder"
    );
    let message = ui::label(format!("circular reference: {}", T::type_name()));
    assemble(
        ElementKind::Group(GroupKind::CompositeField),
        label,
        vec![message],
    )
    .with_interactable(false)
}

fn self_describing<T: UiValue>(
    request: FieldRequest<T>,
    identity: fn(&T) -> Option<ObjectId>,
    create: fn(&T, Option<LabelElement>) -> Element,
) -> Element {
    let FieldRequest { label, binder, .. } = request;
    let key_binder = binder.clone();
    ui::dynamic(
        move || RebuildKey::of_identity(identity(&key_binder.get())),
        move || {
            let value = binder.get();
            match identity(&value) {
                Some(id) if RecursionScope::contains(id) => circular_placeholder::<T>(label.clone()),
                Some(id) => {
                    let _expanding = RecursionScope::enter(id);
                    create(&value, label.clone())
                }
                None => create(&value, label.clone()),
            }
        },
    )
}

fn expand_composite<T: UiValue>(request: FieldRequest<T>, composite: &CompositeShape<T>) -> Element {
    let FieldRequest {
        label,
        binder,
        presentation,
        ..
    } = request;

    tracing::debug!(
        type_name = composite.type_name(),
        fields = composite.len(),
        "expanding composite"
    );

    if TypeCache::is_single_line::<T>() {
        let members = composite
            .fields()
            .map(|field| {
                let caption = LabelElement::new(field.name()).with_type(LabelType::Prefix);
                field.build(&binder, &presentation, caption)
            })
            .collect();
        return assemble(ElementKind::Group(GroupKind::CompositeField), label, members);
    }

    let members = composite
        .fields()
        .map(|field| field.build(&binder, &presentation, LabelElement::new(field.name())))
        .collect();
    titled(label, members)
}

/// Numeric leaf parameters for one edited value type.
struct NumericKind<V>
where
    V: Clone + Send + Sync + 'static,
{
    from_f64: fn(f64) -> V,
    default_range: (V, V),
    field: fn(ViewBridge<V>) -> FieldData,
    slider: fn(SliderField<V>) -> SliderData,
}

fn numeric<T, V>(request: FieldRequest<T>, cast: Cast<T, V>, kind: NumericKind<V>) -> Element
where
    T: UiValue,
    V: Clone + Send + Sync + 'static,
{
    let FieldRequest {
        label,
        binder,
        presentation,
        attributes,
    } = request;
    let value = binder.cast(cast.to, cast.from);

    let range = match presentation {
        Presentation::Slider(range) => Some(range.project(cast.to)),
        Presentation::Field => attributes
            .range
            .map(|(min, max)| SliderRange::new((kind.from_f64)(min), (kind.from_f64)(max))),
    };

    match range {
        None => leaf(label, |owner| {
            ElementKind::Field((kind.field)(ViewBridge::new(owner, value)))
        }),
        Some(range) => {
            let (default_min, default_max) = kind.default_range;
            let min = range.min.unwrap_or_else(|| Getter::constant(default_min));
            let max = range.max.unwrap_or_else(|| Getter::constant(default_max));
            leaf(label, |owner| {
                ElementKind::Slider((kind.slider)(SliderField {
                    bridge: ViewBridge::new(owner, value),
                    min,
                    max,
                }))
            })
        }
    }
}

fn min_max_numeric<T, V>(
    request: MinMaxRequest<T>,
    cast: Cast<T, V>,
    default_range: (V, V),
    make: fn(MinMaxField<V>) -> MinMaxData,
) -> Element
where
    T: UiValue,
    V: Clone + Send + Sync + 'static,
{
    let MinMaxRequest {
        label,
        binder,
        range,
    } = request;
    let Cast { to, from } = cast;

    let value = binder.child(
        move |pair: &MinMax<T>| MinMax::new(to(&pair.min), to(&pair.max)),
        move |pair, value: MinMax<V>| {
            pair.min = from(value.min);
            pair.max = from(value.max);
        },
    );

    let range = range.project(to);
    let (default_min, default_max) = default_range;
    let min = range.min.unwrap_or_else(|| Getter::constant(default_min));
    let max = range.max.unwrap_or_else(|| Getter::constant(default_max));

    leaf(label, |owner| {
        ElementKind::MinMaxSlider(make(MinMaxField {
            bridge: ViewBridge::new(owner, value),
            min,
            max,
        }))
    })
}

/// A value element with its caption as first child.
fn leaf<F>(label: Option<LabelElement>, make: F) -> Element
where
    F: FnOnce(&WeakElement) -> ElementKind,
{
    let element = Element::with_kind(make);
    if let Some(label) = label {
        element.adopt(label.into_element());
    }
    element
}

/// A fold titled by `label`, or a bare column without one.
fn titled(label: Option<LabelElement>, members: Vec<Element>) -> Element {
    match label {
        Some(label) => assemble(ElementKind::Fold(FoldData::new(false)), Some(label), members),
        None => assemble(ElementKind::Group(GroupKind::Column), None, members),
    }
}

/// Group freshly built, parentless elements.
fn assemble(kind: ElementKind, label: Option<LabelElement>, members: Vec<Element>) -> Element {
    let group = Element::new(kind);
    if let Some(label) = label {
        group.adopt(label.into_element());
    }
    for member in members {
        group.adopt(member);
    }
    group
}

//! Element Kinds
//!
//! The closed set of element payloads. Leaf kinds carry one [`ViewBridge`]
//! per edited value; group kinds only carry layout intent.

use std::fmt;
use std::sync::Arc;

use super::dynamic::DynamicData;
use super::label::LabelType;
use super::list::ListContainer;
use super::value::ViewBridge;
use super::Element;
use crate::binder::Getter;
use crate::reactive::ReactiveProperty;
use crate::shape::{MinMax, Rgba};

/// Payload of an element.
pub enum ElementKind {
    Label(LabelData),
    Field(FieldData),
    Slider(SliderData),
    MinMaxSlider(MinMaxData),
    Button(ButtonData),
    Space,
    Group(GroupKind),
    Fold(FoldData),
    Window(WindowData),
    List(ListContainer),
    Dynamic(DynamicData),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Label(_) => "label",
            ElementKind::Field(_) => "field",
            ElementKind::Slider(_) => "slider",
            ElementKind::MinMaxSlider(_) => "min_max_slider",
            ElementKind::Button(_) => "button",
            ElementKind::Space => "space",
            ElementKind::Group(group) => group.name(),
            ElementKind::Fold(_) => "fold",
            ElementKind::Window(_) => "window",
            ElementKind::List(_) => "list",
            ElementKind::Dynamic(_) => "dynamic",
        }
    }

    /// Per-sweep work of this node, before its children are visited.
    pub(crate) fn update(&self, owner: &Element) {
        match self {
            ElementKind::Label(label) => label.bridge.pull(),
            ElementKind::Field(field) => field.pull(),
            ElementKind::Slider(slider) => slider.pull(),
            ElementKind::MinMaxSlider(slider) => slider.pull(),
            ElementKind::List(list) => list.sync(),
            ElementKind::Dynamic(dynamic) => {
                dynamic.refresh(owner);
            }
            _ => {}
        }
    }

    /// Drop every view subscription held by the payload.
    pub(crate) fn release(&self) {
        match self {
            ElementKind::Label(label) => label.bridge.unsubscribe_all(),
            ElementKind::Field(field) => field.unsubscribe_all(),
            ElementKind::Slider(slider) => slider.unsubscribe_all(),
            ElementKind::MinMaxSlider(slider) => slider.unsubscribe_all(),
            ElementKind::Fold(fold) => fold.open.clear_subscribers(),
            ElementKind::Window(window) => window.position.clear_subscribers(),
            ElementKind::List(list) => list.release(),
            ElementKind::Dynamic(dynamic) => dynamic.release(),
            ElementKind::Button(_) | ElementKind::Space | ElementKind::Group(_) => {}
        }
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A read-only caption.
pub struct LabelData {
    pub bridge: ViewBridge<String>,
    pub label_type: LabelType,
}

impl LabelData {
    pub fn text(&self) -> String {
        self.bridge.value()
    }
}

/// A single editable value.
pub enum FieldData {
    Int(ViewBridge<i64>),
    UInt(ViewBridge<u64>),
    Float(ViewBridge<f64>),
    Text {
        bridge: ViewBridge<String>,
        multiline: bool,
    },
    Toggle(ViewBridge<bool>),
    Color(ViewBridge<Rgba>),
    Dropdown {
        bridge: ViewBridge<usize>,
        options: Vec<String>,
    },
}

impl FieldData {
    pub fn is_read_only(&self) -> bool {
        match self {
            FieldData::Int(bridge) => bridge.is_read_only(),
            FieldData::UInt(bridge) => bridge.is_read_only(),
            FieldData::Float(bridge) => bridge.is_read_only(),
            FieldData::Text { bridge, .. } => bridge.is_read_only(),
            FieldData::Toggle(bridge) => bridge.is_read_only(),
            FieldData::Color(bridge) => bridge.is_read_only(),
            FieldData::Dropdown { bridge, .. } => bridge.is_read_only(),
        }
    }

    fn pull(&self) {
        match self {
            FieldData::Int(bridge) => bridge.pull(),
            FieldData::UInt(bridge) => bridge.pull(),
            FieldData::Float(bridge) => bridge.pull(),
            FieldData::Text { bridge, .. } => bridge.pull(),
            FieldData::Toggle(bridge) => bridge.pull(),
            FieldData::Color(bridge) => bridge.pull(),
            FieldData::Dropdown { bridge, .. } => bridge.pull(),
        }
    }

    fn unsubscribe_all(&self) {
        match self {
            FieldData::Int(bridge) => bridge.unsubscribe_all(),
            FieldData::UInt(bridge) => bridge.unsubscribe_all(),
            FieldData::Float(bridge) => bridge.unsubscribe_all(),
            FieldData::Text { bridge, .. } => bridge.unsubscribe_all(),
            FieldData::Toggle(bridge) => bridge.unsubscribe_all(),
            FieldData::Color(bridge) => bridge.unsubscribe_all(),
            FieldData::Dropdown { bridge, .. } => bridge.unsubscribe_all(),
        }
    }
}

/// A numeric value with live bounds.
pub struct SliderField<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub bridge: ViewBridge<V>,
    pub min: Getter<V>,
    pub max: Getter<V>,
}

impl<V> SliderField<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn range(&self) -> (V, V) {
        (self.min.get(), self.max.get())
    }
}

pub enum SliderData {
    Int(SliderField<i64>),
    UInt(SliderField<u64>),
    Float(SliderField<f64>),
}

impl SliderData {
    pub fn is_read_only(&self) -> bool {
        match self {
            SliderData::Int(slider) => slider.bridge.is_read_only(),
            SliderData::UInt(slider) => slider.bridge.is_read_only(),
            SliderData::Float(slider) => slider.bridge.is_read_only(),
        }
    }

    fn pull(&self) {
        match self {
            SliderData::Int(slider) => slider.bridge.pull(),
            SliderData::UInt(slider) => slider.bridge.pull(),
            SliderData::Float(slider) => slider.bridge.pull(),
        }
    }

    fn unsubscribe_all(&self) {
        match self {
            SliderData::Int(slider) => slider.bridge.unsubscribe_all(),
            SliderData::UInt(slider) => slider.bridge.unsubscribe_all(),
            SliderData::Float(slider) => slider.bridge.unsubscribe_all(),
        }
    }
}

/// An ordered pair with live outer bounds.
pub struct MinMaxField<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub bridge: ViewBridge<MinMax<V>>,
    pub min: Getter<V>,
    pub max: Getter<V>,
}

pub enum MinMaxData {
    Int(MinMaxField<i64>),
    UInt(MinMaxField<u64>),
    Float(MinMaxField<f64>),
}

impl MinMaxData {
    pub fn is_read_only(&self) -> bool {
        match self {
            MinMaxData::Int(slider) => slider.bridge.is_read_only(),
            MinMaxData::UInt(slider) => slider.bridge.is_read_only(),
            MinMaxData::Float(slider) => slider.bridge.is_read_only(),
        }
    }

    fn pull(&self) {
        match self {
            MinMaxData::Int(slider) => slider.bridge.pull(),
            MinMaxData::UInt(slider) => slider.bridge.pull(),
            MinMaxData::Float(slider) => slider.bridge.pull(),
        }
    }

    fn unsubscribe_all(&self) {
        match self {
            MinMaxData::Int(slider) => slider.bridge.unsubscribe_all(),
            MinMaxData::UInt(slider) => slider.bridge.unsubscribe_all(),
            MinMaxData::Float(slider) => slider.bridge.unsubscribe_all(),
        }
    }
}

/// A pressable action.
pub struct ButtonData {
    action: Arc<dyn Fn() + Send + Sync>,
}

impl ButtonData {
    pub(crate) fn new<F>(action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            action: Arc::new(action),
        }
    }

    /// Invoke the action, as the view does on click.
    pub fn press(&self) {
        (self.action)();
    }
}

/// Layout intent of a plain group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Row,
    Column,
    Box,
    Page,
    /// A caption followed by inline sub-fields on one line.
    CompositeField,
}

impl GroupKind {
    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Row => "row",
            GroupKind::Column => "column",
            GroupKind::Box => "box",
            GroupKind::Page => "page",
            GroupKind::CompositeField => "composite_field",
        }
    }
}

/// A collapsible group. Child 0 is the header, the rest is content.
pub struct FoldData {
    pub open: ReactiveProperty<bool>,
}

impl FoldData {
    pub(crate) fn new(open: bool) -> Self {
        Self {
            open: ReactiveProperty::new(open),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn set_open(&self, open: bool) {
        self.open.set(open);
    }
}

/// A top-level, positionable container. Open state is the element's enable
/// flag.
pub struct WindowData {
    pub position: ReactiveProperty<Option<(f32, f32)>>,
    pub closable: bool,
}

impl WindowData {
    pub(crate) fn new(closable: bool) -> Self {
        Self {
            position: ReactiveProperty::new(None),
            closable,
        }
    }
}

//! Element Graph
//!
//! Elements are abstract UI nodes independent of any widget toolkit. A view
//! layer instantiates widgets for them, subscribes to their bridges and
//! reactive metadata, and pushes edits back through [`ViewBridge`].
//!
//! # Ownership
//!
//! `Element` is a cheap handle (`Arc`). Parents own their children; children
//! hold a weak link to their single parent. Attaching an element that
//! already has a parent is an error, never a silent re-parent.
//!
//! # Lifecycle
//!
//! 1. Built by `crate::build` or composed with `crate::ui`
//! 2. Updated every tick while enabled ([`Element::update`])
//! 3. Detached or destroyed; destruction cascades to descendants first

mod dynamic;
mod kind;
mod label;
mod list;
mod node;
mod state;
mod style;
mod value;

pub use dynamic::{DynamicData, RebuildKey};
pub use kind::{
    ButtonData, ElementKind, FieldData, FoldData, GroupKind, LabelData, MinMaxData, MinMaxField,
    SliderData, SliderField, WindowData,
};
pub use label::{LabelElement, LabelType};
pub use list::{ListContainer, ListSource};
pub use node::{Element, ElementId, WeakElement};
pub use state::ElementState;
pub use style::Style;
pub use value::ViewBridge;

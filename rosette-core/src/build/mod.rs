//! Element Synthesis
//!
//! Turns binders into element subtrees. The entry points are
//! [`create_field_element`], [`create_slider_element`] and
//! [`create_min_max_slider_element`]; `crate::ui` wraps them with friendlier
//! signatures.
//!
//! # Extension
//!
//! The built-in presentation is selected from the closed [`Shape`] set of
//! the bound type. Hosts override it per type through
//! [`PresenterRegistry`], which is consulted first.
//!
//! [`Shape`]: crate::shape::Shape

mod dispatch;
mod list;
mod recursion;
mod registry;
mod request;

pub use dispatch::{create_field_element, create_min_max_slider_element, create_slider_element};
pub use recursion::{RecursionScope, RecursionSnapshot, SnapshotScope};
pub use registry::PresenterRegistry;
pub use request::{FieldRequest, ListRequest, MinMaxRequest, Presentation, SliderRange};

pub(crate) use dispatch::{build_field, build_min_max, null_placeholder, nullable, reference};
pub(crate) use list::vec_list;
pub(crate) use recursion::PresenterScope;

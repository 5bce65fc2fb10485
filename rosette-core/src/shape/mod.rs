//! Type Shapes
//!
//! Element synthesis needs to know, for any bound type, which presentation
//! applies. Rust has no runtime reflection, so every bindable type describes
//! itself once through [`UiValue::shape`], and the description is memoized in
//! [`TypeCache`].
//!
//! # Closed Variants
//!
//! [`Shape`] is a closed set: one variant per supported primitive kind plus
//! the structural kinds (nullable, shared reference, self-describing, list,
//! composite). The open extension point is the presenter registry in
//! `crate::build`, which is consulted before a shape is ever looked at.
//!
//! Structural variants that need to recurse into an inner type carry plain
//! `fn` pointers to generic build functions, instantiated where the inner
//! type is still known (for example in `impl UiValue for Option<U>`).

mod cache;
mod composite;
mod primitives;
mod values;

pub use cache::TypeCache;
pub use composite::{CompositeBuilder, CompositeShape, FieldAccessor, FieldAttributes, FieldInfo};
pub use values::{Creator, ElementCreator, MinMax, ObjectId, Rgba, Shared};

use std::any::type_name;

use crate::binder::{Binder, DynBinder};
use crate::build::{FieldRequest, ListRequest};
use crate::error::Result;
use crate::element::{Element, LabelElement};

/// A type that can be bound and presented.
pub trait UiValue: Clone + Send + Sync + 'static {
    /// Whether values of this type may be null.
    const NULLABLE: bool = false;

    /// Describe how values of this type are presented.
    ///
    /// Called once per type; use [`TypeCache::shape`] to read it.
    fn shape() -> Shape<Self>;

    /// Identity of the live object, for reference types.
    fn object_id(&self) -> Option<ObjectId> {
        None
    }

    fn is_null(&self) -> bool {
        false
    }

    fn type_name() -> &'static str {
        type_name::<Self>()
    }
}

/// A conversion pair between a bound type and the value a leaf edits.
pub struct Cast<T, V> {
    pub to: fn(&T) -> V,
    pub from: fn(V) -> T,
}

impl<T, V> Clone for Cast<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Cast<T, V> {}

impl<T: Clone, V> Cast<T, V> {
    pub fn new(to: fn(&T) -> V, from: fn(V) -> T) -> Self {
        Self { to, from }
    }
}

impl<T: Clone> Cast<T, T> {
    /// The value is edited as-is.
    pub fn identity() -> Self {
        Self {
            to: |value| value.clone(),
            from: |value| value,
        }
    }
}

/// A C-like enumeration presented as a dropdown.
pub struct EnumShape<T> {
    pub options: Vec<String>,
    pub to_index: fn(&T) -> usize,
    pub from_index: fn(usize) -> T,
}

impl<T> EnumShape<T> {
    pub fn new<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        to_index: fn(&T) -> usize,
        from_index: fn(usize) -> T,
    ) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            to_index,
            from_index,
        }
    }
}

/// A structural shape that recurses into an inner type.
pub struct NestedShape<T> {
    pub(crate) build: fn(FieldRequest<T>) -> Element,
    pub(crate) member: MemberLookup<T>,
}

pub(crate) type MemberLookup<T> = fn(&Binder<T>, &str) -> Result<Box<dyn DynBinder>>;

/// A self-describing value: presentation is delegated to the value.
pub struct SelfDescribingShape<T> {
    pub identity: fn(&T) -> Option<ObjectId>,
    pub create: fn(&T, Option<LabelElement>) -> Element,
}

impl<T: ElementCreator> SelfDescribingShape<T> {
    /// Presentation for a concrete type implementing [`ElementCreator`].
    ///
    /// Plain values have no identity, so the element is built once.
    pub fn of() -> Self {
        Self {
            identity: |_| None,
            create: |value, label| value.create_element(label),
        }
    }
}

/// A dynamically sized sequence.
pub struct ListShape<T> {
    pub(crate) build: fn(ListRequest<T>) -> Element,
}

/// How values of a type are presented.
pub enum Shape<T> {
    Int(Cast<T, i64>),
    UInt(Cast<T, u64>),
    Float(Cast<T, f64>),
    Text(Cast<T, String>),
    Bool(Cast<T, bool>),
    Color(Cast<T, Rgba>),
    Enum(EnumShape<T>),
    Nullable(NestedShape<T>),
    Reference(NestedShape<T>),
    SelfDescribing(SelfDescribingShape<T>),
    List(ListShape<T>),
    Composite(CompositeShape<T>),
}

impl<T> Shape<T> {
    pub fn category(&self) -> ShapeCategory {
        match self {
            Shape::Int(_) => ShapeCategory::Int,
            Shape::UInt(_) => ShapeCategory::UInt,
            Shape::Float(_) => ShapeCategory::Float,
            Shape::Text(_) => ShapeCategory::Text,
            Shape::Bool(_) => ShapeCategory::Bool,
            Shape::Color(_) => ShapeCategory::Color,
            Shape::Enum(_) => ShapeCategory::Enum,
            Shape::Nullable(_) => ShapeCategory::Nullable,
            Shape::Reference(_) => ShapeCategory::Reference,
            Shape::SelfDescribing(_) => ShapeCategory::SelfDescribing,
            Shape::List(_) => ShapeCategory::List,
            Shape::Composite(_) => ShapeCategory::Composite,
        }
    }
}

/// The variant of a [`Shape`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    Int,
    UInt,
    Float,
    Text,
    Bool,
    Color,
    Enum,
    Nullable,
    Reference,
    SelfDescribing,
    List,
    Composite,
}

impl ShapeCategory {
    /// Numbers, strings, booleans and enums.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ShapeCategory::Int
                | ShapeCategory::UInt
                | ShapeCategory::Float
                | ShapeCategory::Text
                | ShapeCategory::Bool
                | ShapeCategory::Enum
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ShapeCategory::Int | ShapeCategory::UInt | ShapeCategory::Float)
    }
}

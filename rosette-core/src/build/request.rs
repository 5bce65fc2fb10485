//! Synthesis requests.

use crate::binder::{Binder, Getter};
use crate::element::LabelElement;
use crate::shape::{FieldAttributes, MinMax, ObjectId};

/// Optional live bounds of a slider.
///
/// Missing bounds fall back to the configured default range.
pub struct SliderRange<T> {
    pub min: Option<Getter<T>>,
    pub max: Option<Getter<T>>,
}

impl<T> SliderRange<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(min: impl Into<Getter<T>>, max: impl Into<Getter<T>>) -> Self {
        Self {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Map both bounds through `f`, as when a range over a composite is
    /// narrowed to one of its members.
    pub fn project<U, F>(&self, f: F) -> SliderRange<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Clone + Send + Sync + 'static,
    {
        let map = |getter: &Getter<T>| {
            let f = f.clone();
            getter.map(move |value| f(&value))
        };
        SliderRange {
            min: self.min.as_ref().map(map),
            max: self.max.as_ref().map(map),
        }
    }
}

impl<T> Clone for SliderRange<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            min: self.min.clone(),
            max: self.max.clone(),
        }
    }
}

impl<T> Default for SliderRange<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Requested presentation of a value.
pub enum Presentation<T> {
    Field,
    Slider(SliderRange<T>),
}

impl<T> Clone for Presentation<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        match self {
            Presentation::Field => Presentation::Field,
            Presentation::Slider(range) => Presentation::Slider(range.clone()),
        }
    }
}

/// Everything needed to synthesize the element for one value.
pub struct FieldRequest<T> {
    pub label: Option<LabelElement>,
    pub binder: Binder<T>,
    pub presentation: Presentation<T>,
    pub attributes: FieldAttributes,
}

impl<T> FieldRequest<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn field(label: Option<LabelElement>, binder: Binder<T>) -> Self {
        Self {
            label,
            binder,
            presentation: Presentation::Field,
            attributes: FieldAttributes::default(),
        }
    }

    pub fn slider(label: Option<LabelElement>, binder: Binder<T>, range: SliderRange<T>) -> Self {
        Self {
            label,
            binder,
            presentation: Presentation::Slider(range),
            attributes: FieldAttributes::default(),
        }
    }
}

/// Synthesis of a min/max pair editor.
pub struct MinMaxRequest<T> {
    pub label: Option<LabelElement>,
    pub binder: Binder<MinMax<T>>,
    pub range: SliderRange<T>,
}

/// Synthesis of a list container.
pub struct ListRequest<T> {
    pub field: FieldRequest<T>,
    /// Identity of the live list when it is reached through a reference.
    pub identity: Option<Getter<Option<ObjectId>>>,
}

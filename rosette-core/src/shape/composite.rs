//! Composite Shapes
//!
//! A composite is a type presented member by member. Its descriptor lists
//! the UI-eligible members in declaration order together with their
//! annotations (value range, multiline) and type-erased accessors.
//!
//! ```rust,ignore
//! impl UiValue for Light {
//!     fn shape() -> Shape<Self> {
//!         Shape::Composite(
//!             CompositeShape::builder()
//!                 .field("name", |l: &Light| l.name.clone(), |l, v| l.name = v)
//!                 .field("intensity", |l: &Light| l.intensity, |l, v| l.intensity = v)
//!                 .range(0.0, 8.0)
//!                 .field_read_only("lumens", |l: &Light| l.lumens())
//!                 .build(),
//!         )
//!     }
//! }
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{MinMax, ShapeCategory, TypeCache, UiValue};
use crate::binder::{Binder, DynBinder};
use crate::build::{self, FieldRequest, MinMaxRequest, Presentation, SliderRange};
use crate::element::{Element, LabelElement};

/// Per-member annotations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldAttributes {
    /// Present numeric members as sliders over this range.
    pub range: Option<(f64, f64)>,

    /// Present string members as multiline text.
    pub multiline: bool,
}

type Extract<T, F> = Arc<dyn Fn(&T) -> F + Send + Sync>;
type Reinject<T, F> = Arc<dyn Fn(&mut T, F) + Send + Sync>;

/// Typed access to one member of `T`.
pub struct FieldAccessor<T, F> {
    extract: Extract<T, F>,
    reinject: Option<Reinject<T, F>>,
}

impl<T, F> FieldAccessor<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Clone + Send + Sync + 'static,
{
    /// Derive a binder for this member from a binder of the owner.
    ///
    /// Members without a setter yield read-only binders.
    pub fn bind(&self, owner: &Binder<T>) -> Binder<F> {
        let extract = Arc::clone(&self.extract);
        match &self.reinject {
            Some(reinject) => {
                let reinject = Arc::clone(reinject);
                owner.child(move |t| extract(t), move |t, v| reinject(t, v))
            }
            None => owner.child_read_only(move |t| extract(t)),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.reinject.is_none()
    }

    fn bind_min_max(&self, owner: &Binder<MinMax<T>>) -> Binder<MinMax<F>> {
        let extract = Arc::clone(&self.extract);
        let read = move |pair: &MinMax<T>| MinMax::new(extract(&pair.min), extract(&pair.max));
        match &self.reinject {
            Some(reinject) => {
                let reinject = Arc::clone(reinject);
                owner.child(read, move |pair, value: MinMax<F>| {
                    reinject(&mut pair.min, value.min);
                    reinject(&mut pair.max, value.max);
                })
            }
            None => owner.child_read_only(read),
        }
    }

    fn project_range(&self, range: &SliderRange<T>) -> SliderRange<F> {
        let extract = Arc::clone(&self.extract);
        range.project(move |t| extract(t))
    }
}

type BuildField<T> = Arc<
    dyn Fn(&Binder<T>, &Presentation<T>, LabelElement, FieldAttributes) -> Element + Send + Sync,
>;
type BuildMinMax<T> =
    Arc<dyn Fn(&Binder<MinMax<T>>, &SliderRange<T>, LabelElement) -> Element + Send + Sync>;
type BindDyn<T> = Arc<dyn Fn(&Binder<T>) -> Box<dyn DynBinder> + Send + Sync>;

/// Descriptor of one member.
pub struct FieldInfo<T> {
    name: &'static str,
    attributes: FieldAttributes,
    value_type: TypeId,
    value_type_name: &'static str,
    category: fn() -> ShapeCategory,
    accessor: Arc<dyn Any + Send + Sync>,
    build: BuildField<T>,
    build_min_max: BuildMinMax<T>,
    bind_dyn: BindDyn<T>,
}

impl<T> FieldInfo<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn attributes(&self) -> FieldAttributes {
        self.attributes
    }

    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Shape category of the member type.
    pub fn category(&self) -> ShapeCategory {
        (self.category)()
    }

    /// Typed accessor, if the member really is an `F`.
    pub fn accessor<F: 'static>(&self) -> Option<&FieldAccessor<T, F>> {
        self.accessor.downcast_ref::<FieldAccessor<T, F>>()
    }

    pub(crate) fn build(
        &self,
        owner: &Binder<T>,
        presentation: &Presentation<T>,
        label: LabelElement,
    ) -> Element {
        (self.build)(owner, presentation, label, self.attributes)
    }

    pub(crate) fn build_min_max(
        &self,
        owner: &Binder<MinMax<T>>,
        range: &SliderRange<T>,
        label: LabelElement,
    ) -> Element {
        (self.build_min_max)(owner, range, label)
    }

    pub(crate) fn bind_dyn(&self, owner: &Binder<T>) -> Box<dyn DynBinder> {
        (self.bind_dyn)(owner)
    }
}

impl<T> fmt::Debug for FieldInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("type", &self.value_type_name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Members of a composite type, in declaration order.
pub struct CompositeShape<T> {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldInfo<T>>,
}

impl<T> CompositeShape<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn builder() -> CompositeBuilder<T> {
        CompositeBuilder {
            type_name: type_name::<T>(),
            fields: IndexMap::new(),
            last: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo<T>> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo<T>> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`CompositeShape`].
pub struct CompositeBuilder<T> {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldInfo<T>>,
    last: Option<&'static str>,
}

impl<T> CompositeBuilder<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Add an assignable member.
    pub fn field<F, E, R>(self, name: &'static str, extract: E, reinject: R) -> Self
    where
        F: UiValue,
        E: Fn(&T) -> F + Send + Sync + 'static,
        R: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.push::<F>(
            name,
            FieldAccessor {
                extract: Arc::new(extract),
                reinject: Some(Arc::new(reinject)),
            },
        )
    }

    /// Add a member that can be read but not assigned.
    pub fn field_read_only<F, E>(self, name: &'static str, extract: E) -> Self
    where
        F: UiValue,
        E: Fn(&T) -> F + Send + Sync + 'static,
    {
        self.push::<F>(
            name,
            FieldAccessor {
                extract: Arc::new(extract),
                reinject: None,
            },
        )
    }

    /// Annotate the most recently added member with a value range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.annotate(|attributes| attributes.range = Some((min, max)));
        self
    }

    /// Annotate the most recently added member as multiline text.
    pub fn multiline(mut self) -> Self {
        self.annotate(|attributes| attributes.multiline = true);
        self
    }

    pub fn build(self) -> CompositeShape<T> {
        CompositeShape {
            type_name: self.type_name,
            fields: self.fields,
        }
    }

    fn annotate(&mut self, f: impl FnOnce(&mut FieldAttributes)) {
        if let Some(info) = self.last.and_then(|name| self.fields.get_mut(name)) {
            f(&mut info.attributes);
        }
    }

    fn push<F: UiValue>(mut self, name: &'static str, accessor: FieldAccessor<T, F>) -> Self {
        let accessor = Arc::new(accessor);

        let build: BuildField<T> = {
            let accessor = Arc::clone(&accessor);
            Arc::new(
                move |owner: &Binder<T>,
                      presentation: &Presentation<T>,
                      label: LabelElement,
                      attributes: FieldAttributes| {
                    let presentation = match presentation {
                        Presentation::Field => Presentation::Field,
                        Presentation::Slider(range) => {
                            Presentation::Slider(accessor.project_range(range))
                        }
                    };
                    build::build_field::<F>(FieldRequest {
                        label: Some(label),
                        binder: accessor.bind(owner),
                        presentation,
                        attributes,
                    })
                },
            )
        };

        let build_min_max: BuildMinMax<T> = {
            let accessor = Arc::clone(&accessor);
            Arc::new(
                move |owner: &Binder<MinMax<T>>, range: &SliderRange<T>, label: LabelElement| {
                    build::build_min_max::<F>(MinMaxRequest {
                        label: Some(label),
                        binder: accessor.bind_min_max(owner),
                        range: accessor.project_range(range),
                    })
                },
            )
        };

        let bind_dyn: BindDyn<T> = {
            let accessor = Arc::clone(&accessor);
            Arc::new(move |owner: &Binder<T>| Box::new(accessor.bind(owner)) as Box<dyn DynBinder>)
        };

        let info = FieldInfo {
            name,
            attributes: FieldAttributes::default(),
            value_type: TypeId::of::<F>(),
            value_type_name: type_name::<F>(),
            category: TypeCache::category::<F>,
            accessor,
            build,
            build_min_max,
            bind_dyn,
        };

        self.fields.insert(name, info);
        self.last = Some(name);
        self
    }
}

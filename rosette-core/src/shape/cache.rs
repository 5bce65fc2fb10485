//! Type-Shape Cache
//!
//! Shapes and single-line decisions are computed once per type and reused
//! for the rest of the process. Both maps are append-only memoization: type
//! shapes are static, so entries are never invalidated. The single-line map
//! is the one exception and is dropped when the layout config changes.
//! Presenter flags are read from the registry on every call and never
//! cached.
//!
//! Values are computed outside of any map lock, so a shape that consults the
//! cache for its member types cannot deadlock a shard.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use super::{Shape, ShapeCategory, UiValue};
use crate::build::{PresenterRegistry, PresenterScope};
use crate::config::UiConfig;

static SHAPES: OnceLock<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = OnceLock::new();
static SINGLE_LINE: OnceLock<DashMap<TypeId, bool>> = OnceLock::new();

fn shapes() -> &'static DashMap<TypeId, Arc<dyn Any + Send + Sync>> {
    SHAPES.get_or_init(DashMap::new)
}

fn single_line() -> &'static DashMap<TypeId, bool> {
    SINGLE_LINE.get_or_init(DashMap::new)
}

/// Process-wide memoization of type descriptors.
pub struct TypeCache;

impl TypeCache {
    /// The shape of `T`, computed on first use.
    pub fn shape<T: UiValue>() -> Arc<Shape<T>> {
        let key = TypeId::of::<T>();

        let cached = shapes().get(&key).map(|entry| Arc::clone(entry.value()));
        if let Some(shape) = cached.and_then(|erased| erased.downcast::<Shape<T>>().ok()) {
            return shape;
        }

        let shape = Arc::new(T::shape());
        tracing::trace!(type_name = T::type_name(), "caching type shape");
        let erased: Arc<dyn Any + Send + Sync> = shape.clone();
        shapes().entry(key).or_insert(erased);
        shape
    }

    pub fn category<T: UiValue>() -> ShapeCategory {
        Self::shape::<T>().category()
    }

    /// Whether values of `T` are laid out in a single row.
    ///
    /// True when a presenter registered for `T` says so, when `T` is a
    /// primitive, string, enum or color, or when `T` is a composite with few
    /// primitive members that all have short names and no value range.
    ///
    /// While the presenter for `T` is itself running and falls back to the
    /// built-in presentation, its flag is ignored.
    pub fn is_single_line<T: UiValue>() -> bool {
        if !PresenterScope::is_active::<T>() {
            if let Some(flag) = PresenterRegistry::single_line_flag::<T>() {
                return flag;
            }
        }

        let key = TypeId::of::<T>();
        if let Some(flag) = single_line().get(&key).map(|entry| *entry.value()) {
            return flag;
        }

        let flag = Self::compute_single_line::<T>();
        single_line().insert(key, flag);
        flag
    }

    fn compute_single_line<T: UiValue>() -> bool {
        let shape = Self::shape::<T>();
        match &*shape {
            Shape::Composite(composite) => {
                let config = UiConfig::current();
                composite.len() <= config.single_line_max_fields
                    && composite.fields().all(|field| {
                        field.category().is_primitive()
                            && field.name().chars().count() <= config.single_line_max_name_len
                            && field.attributes().range.is_none()
                    })
            }
            other => other.category().is_primitive() || other.category() == ShapeCategory::Color,
        }
    }

    pub(crate) fn clear_single_line() {
        single_line().clear();
    }
}

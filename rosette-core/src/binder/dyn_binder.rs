//! Untyped Binders
//!
//! Member lookup by name produces binders whose value type is only known at
//! runtime. `DynBinder` is the object-safe face of `Binder<T>` used for that,
//! and `Binder::member` / `Binder::path` recover the typed binder.

use std::any::{type_name, Any, TypeId};

use super::Binder;
use crate::error::{Result, UiError};
use crate::shape::{Shape, TypeCache, UiValue};

/// A binder with its value type erased.
pub trait DynBinder: Send + Sync {
    fn value_type(&self) -> TypeId;

    fn value_type_name(&self) -> &'static str;

    fn is_read_only(&self) -> bool;

    /// Read the current value, boxed.
    fn get_any(&self) -> Box<dyn Any + Send>;

    /// Write a boxed value.
    ///
    /// Writing to a read-only binder is accepted and ignored, the same as
    /// [`Binder::set`]. A value of the wrong type is an error.
    fn set_any(&self, value: Box<dyn Any + Send>) -> Result<()>;

    /// Binder for a named member of the current value.
    ///
    /// Nullable and shared values are looked through.
    fn member_dyn(&self, name: &str) -> Result<Box<dyn DynBinder>>;

    fn as_any(&self) -> &dyn Any;
}

impl<T: UiValue> DynBinder for Binder<T> {
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn is_read_only(&self) -> bool {
        Binder::is_read_only(self)
    }

    fn get_any(&self) -> Box<dyn Any + Send> {
        Box::new(self.get())
    }

    fn set_any(&self, value: Box<dyn Any + Send>) -> Result<()> {
        let value = value.downcast::<T>().map_err(|_| UiError::ValueTypeMismatch {
            expected: type_name::<T>(),
        })?;
        self.set(*value);
        Ok(())
    }

    fn member_dyn(&self, name: &str) -> Result<Box<dyn DynBinder>> {
        match &*TypeCache::shape::<T>() {
            Shape::Composite(composite) => composite
                .field(name)
                .map(|field| field.bind_dyn(self))
                .ok_or_else(|| UiError::MemberNotFound {
                    type_name: T::type_name(),
                    member: name.to_string(),
                }),
            Shape::Nullable(nested) | Shape::Reference(nested) => (nested.member)(self, name),
            _ => Err(UiError::NotAComposite {
                type_name: T::type_name(),
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: UiValue> Binder<T> {
    /// Typed binder for the member `name`.
    pub fn member<F: UiValue>(&self, name: &str) -> Result<Binder<F>> {
        let member = self.member_dyn(name)?;
        downcast(member.as_ref(), T::type_name(), name)
    }

    /// Typed binder for a dotted member path such as `"light.color"`.
    pub fn path<F: UiValue>(&self, path: &str) -> Result<Binder<F>> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut current = self.member_dyn(first)?;
        for segment in segments {
            current = current.member_dyn(segment)?;
        }
        downcast(current.as_ref(), T::type_name(), path)
    }
}

fn downcast<F: UiValue>(
    binder: &dyn DynBinder,
    owner: &'static str,
    member: &str,
) -> Result<Binder<F>> {
    binder
        .as_any()
        .downcast_ref::<Binder<F>>()
        .cloned()
        .ok_or_else(|| UiError::MemberTypeMismatch {
            type_name: owner,
            member: member.to_string(),
            expected: type_name::<F>(),
            actual: binder.value_type_name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{CompositeShape, Shared};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inner {
        level: i32,
    }

    impl UiValue for Inner {
        fn shape() -> Shape<Self> {
            Shape::Composite(
                CompositeShape::builder()
                    .field("level", |v: &Inner| v.level, |v, level| v.level = level)
                    .build(),
            )
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Outer {
        name: String,
        inner: Inner,
        cached: Option<Inner>,
    }

    impl UiValue for Outer {
        fn shape() -> Shape<Self> {
            Shape::Composite(
                CompositeShape::builder()
                    .field("name", |v: &Outer| v.name.clone(), |v, name| v.name = name)
                    .field("inner", |v: &Outer| v.inner.clone(), |v, inner| v.inner = inner)
                    .field("cached", |v: &Outer| v.cached.clone(), |v, c| v.cached = c)
                    .build(),
            )
        }
    }

    #[test]
    fn member_lookup_writes_through_the_owner() {
        let shared = Shared::new(Outer::default());
        let owner = Binder::from_shared(&shared);

        let name = owner.member::<String>("name").unwrap();
        name.set("lamp".to_string());
        assert_eq!(shared.get().name, "lamp");

        let level = owner.path::<i32>("inner.level").unwrap();
        level.set(3);
        assert_eq!(shared.get().inner.level, 3);
        assert_eq!(shared.get().name, "lamp");
    }

    #[test]
    fn lookup_errors() {
        let owner = Binder::constant(Outer::default());

        assert!(matches!(
            owner.member::<i32>("missing"),
            Err(UiError::MemberNotFound { .. })
        ));
        assert!(matches!(
            owner.member::<i32>("name"),
            Err(UiError::MemberTypeMismatch { .. })
        ));
        assert!(matches!(
            owner.path::<i32>("name.len"),
            Err(UiError::NotAComposite { .. })
        ));
    }

    #[test]
    fn nullable_members_are_looked_through() {
        let shared = Shared::new(Outer {
            cached: Some(Inner { level: 1 }),
            ..Outer::default()
        });
        let level = Binder::from_shared(&shared)
            .path::<i32>("cached.level")
            .unwrap();

        assert_eq!(level.get(), 1);
        level.set(2);
        assert_eq!(shared.get().cached, Some(Inner { level: 2 }));
    }

    #[test]
    fn set_any_rejects_the_wrong_type() {
        let shared = Shared::new(4i32);
        let binder: Box<dyn DynBinder> = Box::new(Binder::from_shared(&shared));

        assert!(binder.set_any(Box::new(9i32)).is_ok());
        assert_eq!(shared.get(), 9);
        assert!(binder.set_any(Box::new("nine")).is_err());
        assert_eq!(*binder.get_any().downcast::<i32>().unwrap(), 9);
    }
}

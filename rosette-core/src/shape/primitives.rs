//! Built-in `UiValue` implementations.
//!
//! Every integer type is edited through an `i64` or `u64` field and every
//! float through an `f64` field. Narrowing writes clamp to the target range.

use super::{
    Cast, CompositeShape, Creator, ListShape, MinMax, NestedShape, Rgba, SelfDescribingShape,
    Shape, Shared, UiValue,
};
use crate::binder::DynBinder;
use crate::build;
use crate::shape::ObjectId;

macro_rules! signed_value {
    ($($ty:ty),* $(,)?) => {$(
        impl UiValue for $ty {
            fn shape() -> Shape<Self> {
                Shape::Int(Cast::new(
                    |value| *value as i64,
                    |value| value.clamp(<$ty>::MIN as i64, <$ty>::MAX as i64) as $ty,
                ))
            }
        }
    )*};
}

macro_rules! unsigned_value {
    ($($ty:ty),* $(,)?) => {$(
        impl UiValue for $ty {
            fn shape() -> Shape<Self> {
                Shape::UInt(Cast::new(
                    |value| *value as u64,
                    |value| value.min(<$ty>::MAX as u64) as $ty,
                ))
            }
        }
    )*};
}

signed_value!(i8, i16, i32, i64, isize);
unsigned_value!(u8, u16, u32, u64, usize);

impl UiValue for f32 {
    fn shape() -> Shape<Self> {
        Shape::Float(Cast::new(|value| f64::from(*value), |value| value as f32))
    }
}

impl UiValue for f64 {
    fn shape() -> Shape<Self> {
        Shape::Float(Cast::identity())
    }
}

impl UiValue for String {
    fn shape() -> Shape<Self> {
        Shape::Text(Cast::identity())
    }
}

impl UiValue for bool {
    fn shape() -> Shape<Self> {
        Shape::Bool(Cast::identity())
    }
}

impl UiValue for Rgba {
    fn shape() -> Shape<Self> {
        Shape::Color(Cast::identity())
    }
}

impl<U> UiValue for Option<U>
where
    U: UiValue + Default,
{
    const NULLABLE: bool = true;

    fn shape() -> Shape<Self> {
        Shape::Nullable(NestedShape {
            build: build::nullable::<U>,
            member: |binder, name| binder.unwrap_or_default().member_dyn(name),
        })
    }

    fn object_id(&self) -> Option<ObjectId> {
        self.as_ref().and_then(U::object_id)
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<U> UiValue for Vec<U>
where
    U: UiValue + Default,
{
    fn shape() -> Shape<Self> {
        Shape::List(ListShape {
            build: build::vec_list::<U>,
        })
    }
}

impl<U: UiValue> UiValue for Shared<U> {
    fn shape() -> Shape<Self> {
        Shape::Reference(NestedShape {
            build: build::reference::<U>,
            member: |binder, name| binder.deref_shared().member_dyn(name),
        })
    }

    fn object_id(&self) -> Option<ObjectId> {
        Some(Shared::object_id(self))
    }
}

impl<T: UiValue> UiValue for MinMax<T> {
    fn shape() -> Shape<Self> {
        Shape::Composite(
            CompositeShape::builder()
                .field("min", |pair: &MinMax<T>| pair.min.clone(), |pair, min| pair.min = min)
                .field("max", |pair: &MinMax<T>| pair.max.clone(), |pair, max| pair.max = max)
                .build(),
        )
    }
}

impl UiValue for Creator {
    const NULLABLE: bool = true;

    fn shape() -> Shape<Self> {
        Shape::SelfDescribing(SelfDescribingShape {
            identity: Creator::object_id,
            create: |value, label| match value.get() {
                Some(creator) => creator.create_element(label),
                None => build::null_placeholder(label),
            },
        })
    }

    fn object_id(&self) -> Option<ObjectId> {
        Creator::object_id(self)
    }

    fn is_null(&self) -> bool {
        self.get().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ShapeCategory, TypeCache};

    #[test]
    fn narrowing_writes_clamp() {
        let Shape::Int(cast) = <i8 as UiValue>::shape() else {
            panic!("i8 should be an integer shape");
        };
        assert_eq!((cast.from)(1_000), i8::MAX);
        assert_eq!((cast.from)(-1_000), i8::MIN);
        assert_eq!((cast.to)(&-3), -3);

        let Shape::UInt(cast) = <u16 as UiValue>::shape() else {
            panic!("u16 should be an unsigned shape");
        };
        assert_eq!((cast.from)(u64::MAX), u16::MAX);
    }

    #[test]
    fn structural_categories() {
        assert_eq!(TypeCache::category::<Option<i32>>(), ShapeCategory::Nullable);
        assert_eq!(TypeCache::category::<Vec<String>>(), ShapeCategory::List);
        assert_eq!(TypeCache::category::<Shared<f32>>(), ShapeCategory::Reference);
        assert_eq!(TypeCache::category::<MinMax<f32>>(), ShapeCategory::Composite);
        assert_eq!(TypeCache::category::<Creator>(), ShapeCategory::SelfDescribing);
        assert_eq!(TypeCache::category::<Rgba>(), ShapeCategory::Color);
    }

    #[test]
    fn shared_values_report_identity() {
        let shared = Shared::new(1u32);
        assert_eq!(UiValue::object_id(&shared), Some(shared.object_id()));
        assert_eq!(UiValue::object_id(&1u32), None);
        assert!(Creator::none().is_null());
    }
}

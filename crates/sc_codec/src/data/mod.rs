use core::any::{Any, TypeId};
use core::fmt;
use core::hash::BuildHasher;

use sc_utils::hash::{FixedHashState, FixedHasher};

use crate::info::DataType;
use crate::ops::Record;

// -----------------------------------------------------------------------------
// Data

/// A type-erased value the codec can walk.
///
/// Every value flowing through the [`Serializer`](crate::serializer::Serializer)
/// is a `dyn Data`. The trait gives the engine the value's [`DataType`] for
/// processor dispatch, structural equality, cloning and a debug view.
///
/// # Implementation
///
/// Built-in scalars, [dynamic containers](crate::ops) and [`HostArray`] implement
/// it already. For named-field types use [`#[derive(Record)]`](crate::derive::Record).
///
/// ```
/// use sc_codec::Data;
///
/// let x: Box<dyn Data> = Box::new(10_i64);
/// assert!(x.is::<i64>());
/// assert_eq!(x.downcast_ref::<i64>(), Some(&10));
/// assert_eq!(format!("{x:?}"), "10");
/// ```
///
/// [`HostArray`]: crate::array::HostArray
pub trait Data: Send + Sync + Any {
    /// Returns the [`DataType`] of the underlying value.
    fn data_type(&self) -> DataType;

    /// Casts this value to `&dyn Data`.
    #[inline(always)]
    fn as_data(&self) -> &dyn Data
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this value as `Box<dyn Data>`.
    #[inline(always)]
    fn into_boxed_data(self) -> Box<dyn Data>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Return the [`TypeId`] of underlying type.
    ///
    /// `Box<dyn Data>::type_id` returns the [`TypeId`] of the box itself,
    /// use this method instead.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the value as a [`Record`] if it has named fields.
    #[inline]
    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    /// Clones the value into a new box of the same concrete type.
    fn clone_data(&self) -> Box<dyn Data>;

    /// Structural equality against another value.
    ///
    /// Scalars compare equal only to the same type with an equal value.
    /// Records compare by field names and field values.
    fn data_eq(&self, other: &dyn Data) -> bool;

    /// Hash consistent with [`data_eq`](Data::data_eq), or `None` if the
    /// value is not hashable.
    ///
    /// [`DynamicMap`](crate::ops::DynamicMap) and [`DynamicSet`](crate::ops::DynamicSet)
    /// index their entries by this hash. Values without one are still
    /// accepted, but are compared one by one.
    ///
    /// Scalars except floats hash through [`Hash`](core::hash::Hash),
    /// floats hash their bits with `-0.0` folded into `0.0`, and tuples and
    /// lists combine the hashes of their items.
    #[inline]
    fn data_hash(&self) -> Option<u64> {
        None
    }

    /// Debug formatter for the value.
    ///
    /// This is also the key text of non-string map keys in a schema,
    /// so `(1, 2)` formats as `(1, 2)` and `"a"` as `"a"`.
    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl dyn Data {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    ///
    /// ```
    /// use sc_codec::Data;
    ///
    /// let x: Box<dyn Data> = Box::new(String::from("hi"));
    /// let x = x.downcast::<i64>().unwrap_err();
    /// let x: Box<String> = x.downcast::<String>().unwrap();
    /// assert_eq!(*x, "hi");
    /// ```
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Data>) -> Result<Box<T>, Box<dyn Data>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            Ok(any.downcast::<T>().unwrap_or_else(|_| unreachable!()))
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Data>) -> Result<T, Box<dyn Data>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl PartialEq for dyn Data {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.data_eq(other)
    }
}

impl fmt::Debug for dyn Data {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

impl Clone for Box<dyn Data> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_data()
    }
}

/// Create a hasher for [`Data::data_hash`].
///
/// The seed is fixed, so hashes are stable across runs.
///
/// ```
/// use core::hash::{Hash, Hasher};
/// use sc_codec::{Data, data_hasher};
///
/// let mut hasher = data_hasher();
/// 7_i64.hash(&mut hasher);
/// assert_eq!(7_i64.data_hash(), Some(hasher.finish()));
/// ```
#[inline]
pub fn data_hasher() -> FixedHasher {
    FixedHashState.build_hasher()
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implement [`Data::data_type`] for a type with a [`TypePath`](crate::info::TypePath).
macro_rules! impl_data_type_fn {
    () => {
        #[inline]
        fn data_type(&self) -> $crate::info::DataType {
            $crate::info::DataType::of::<Self>()
        }
    };
}

pub(crate) use impl_data_type_fn;

/// Implement [`Data`] for `Clone + PartialEq + Debug` types with a
/// [`TypePath`](crate::info::TypePath), treating them as opaque values.
///
/// Equality requires the same concrete type, formatting uses [`Debug`](fmt::Debug).
/// Prefix the list with `hash:` for types that also implement
/// [`Hash`](core::hash::Hash), so [`Data::data_hash`] is provided.
///
/// # Examples
///
/// ```
/// use sc_codec::{Data, impl_data_opaque, impl_type_path};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Meters(f64);
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Label(String);
///
/// impl_type_path!(Meters => "units" :: "Meters");
/// impl_type_path!(Label => "units" :: "Label");
/// impl_data_opaque!(Meters);
/// impl_data_opaque!(hash: Label);
///
/// assert!(Meters(1.0).data_eq(&Meters(1.0)));
/// assert_eq!(format!("{:?}", &Meters(2.0) as &dyn Data), "Meters(2.0)");
/// assert!(Meters(1.0).data_hash().is_none());
/// assert!(Label("a".into()).data_hash().is_some());
/// ```
#[macro_export]
macro_rules! impl_data_opaque {
    (@impl $ty:ty { $($extra:tt)* }) => {
        impl $crate::Data for $ty {
            #[inline]
            fn data_type(&self) -> $crate::info::DataType {
                $crate::info::DataType::of::<Self>()
            }

            #[inline]
            fn clone_data(&self) -> ::std::boxed::Box<dyn $crate::Data> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            #[inline]
            fn data_eq(&self, other: &dyn $crate::Data) -> bool {
                other.downcast_ref::<Self>().is_some_and(|other| self == other)
            }

            #[inline]
            fn data_fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }

            $($extra)*
        }
    };
    (hash: $($ty:ty),* $(,)?) => {
        $(
            $crate::impl_data_opaque!(@impl $ty {
                #[inline]
                fn data_hash(&self) -> ::core::option::Option<u64> {
                    let mut hasher = $crate::data_hasher();
                    ::core::hash::Hash::hash(self, &mut hasher);
                    ::core::option::Option::Some(::core::hash::Hasher::finish(&hasher))
                }
            });
        )*
    };
    ($($ty:ty),* $(,)?) => {
        $(
            $crate::impl_data_opaque!(@impl $ty {});
        )*
    };
}

#[cfg(test)]
mod tests {
    use crate::Data;

    #[test]
    fn boxed_type_id_is_the_inner_type() {
        let x: Box<dyn Data> = Box::new(3_u8);
        assert!(x.is::<u8>());
        assert!(!x.is::<Box<dyn Data>>());
        assert_eq!(x.take::<u8>().ok(), Some(3));
    }

    #[test]
    fn equality_and_clone() {
        let a: Box<dyn Data> = Box::new(String::from("x"));
        let b = a.clone();
        assert!(b.is::<String>());
        assert_eq!(&*a, &*b);

        let c: Box<dyn Data> = Box::new(1_i64);
        let d: Box<dyn Data> = Box::new(1_i32);
        assert_ne!(&*c, &*d);
    }
}

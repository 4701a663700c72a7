// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// Provide a stable alternative to [`core::any::type_name`] that survives
/// compiler upgrades, so paths can be written into persisted schemas.
///
/// # Methods
///
/// - [`type_path`]: The unique identifier of the type, cannot be duplicated.
/// - [`type_name`]: Type name without module path, may be duplicated.
/// - [`module_path`]: Optional module path, `None` for primitive types.
///
/// These names never carry a leading `::`.
///
/// # Implementation
///
/// [`#[derive(Record)]`](crate::derive::Record) implements it with
/// `module_path!()` as the module, or with an explicit path:
///
/// ```
/// use sc_codec::derive::Record;
/// use sc_codec::info::TypePath;
///
/// #[derive(Record, Clone)]
/// #[record(type_path = "my_crate::geometry::Point")]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// assert_eq!(Point::type_path(), "my_crate::geometry::Point");
/// assert_eq!(Point::type_name(), "Point");
/// assert_eq!(Point::module_path(), Some("my_crate::geometry"));
/// ```
///
/// Foreign types can use [`impl_type_path!`](crate::impl_type_path).
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`module_path`]: TypePath::module_path
pub trait TypePath: 'static {
    /// Returns the fully qualified path with generics of the target type.
    ///
    /// For `String`, this is `"alloc::string::String"`.
    fn type_path() -> &'static str;

    /// Returns a short path to the type, without module path.
    ///
    /// For `String`, this is `"String"`.
    fn type_name() -> &'static str;

    /// Optional module path where the type is defined.
    ///
    /// For `String`, this is `Some("alloc::string")`.
    fn module_path() -> Option<&'static str> {
        None
    }
}

/// Implement [`TypePath`] for a type with literal names.
///
/// - `impl_type_path!(i32 => "i32")` for a primitive without module.
/// - `impl_type_path!(Foo => "my_crate::foo" :: "Foo")` for a type defined in a module.
///
/// # Examples
///
/// ```
/// use sc_codec::impl_type_path;
/// use sc_codec::info::TypePath;
///
/// struct Meters(f64);
///
/// impl_type_path!(Meters => "units" :: "Meters");
///
/// assert_eq!(Meters::type_path(), "units::Meters");
/// assert_eq!(Meters::type_name(), "Meters");
/// assert_eq!(Meters::module_path(), Some("units"));
/// ```
#[macro_export]
macro_rules! impl_type_path {
    ($ty:ty => $name:literal) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $name
            }
            #[inline]
            fn type_name() -> &'static str {
                $name
            }
            #[inline]
            fn module_path() -> Option<&'static str> {
                None
            }
        }
    };
    ($ty:ty => $module:literal :: $name:literal) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                concat!($module, "::", $name)
            }
            #[inline]
            fn type_name() -> &'static str {
                $name
            }
            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Primitive implementations

impl_type_path!(() => "()");
impl_type_path!(bool => "bool");
impl_type_path!(char => "char");
impl_type_path!(i8 => "i8");
impl_type_path!(i16 => "i16");
impl_type_path!(i32 => "i32");
impl_type_path!(i64 => "i64");
impl_type_path!(i128 => "i128");
impl_type_path!(isize => "isize");
impl_type_path!(u8 => "u8");
impl_type_path!(u16 => "u16");
impl_type_path!(u32 => "u32");
impl_type_path!(u64 => "u64");
impl_type_path!(u128 => "u128");
impl_type_path!(usize => "usize");
impl_type_path!(f32 => "f32");
impl_type_path!(f64 => "f64");
impl_type_path!(String => "alloc::string" :: "String");

impl_type_path!(num_complex::Complex<f32> => "num_complex" :: "Complex<f32>");
impl_type_path!(num_complex::Complex<f64> => "num_complex" :: "Complex<f64>");

#[cfg(test)]
mod tests {
    use super::TypePath;

    #[test]
    fn primitive_paths() {
        assert_eq!(<()>::type_path(), "()");
        assert_eq!(i64::type_path(), "i64");
        assert_eq!(i64::module_path(), None);
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(String::type_name(), "String");
        assert_eq!(
            <num_complex::Complex<f64>>::type_path(),
            "num_complex::Complex<f64>"
        );
    }
}

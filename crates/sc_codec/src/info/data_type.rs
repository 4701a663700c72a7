use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::TypePath;

/// Module roots whose types are addressed by their bare name in a schema.
pub const BUILTIN_MODULES: [&str; 4] = ["core", "alloc", "std", "sc_codec"];

// -----------------------------------------------------------------------------
// DataType

/// The identity of a concrete type: its [`TypeId`] plus its [`TypePath`] names.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// # Examples
///
/// ```
/// use sc_codec::info::DataType;
///
/// let ty = DataType::of::<String>();
/// assert!(ty.is::<String>());
/// assert_eq!(ty.path(), "alloc::string::String");
/// assert_eq!(ty.name(), "String");
/// assert!(ty.is_builtin());
/// ```
#[derive(Clone, Copy)]
pub struct DataType {
    id: TypeId,
    path: &'static str,
    name: &'static str,
    module: Option<&'static str>,
}

impl DataType {
    /// Create the [`DataType`] of `T`.
    #[inline]
    pub fn of<T: TypePath>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            name: T::type_name(),
            module: T::module_path(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, see [`TypePath::type_path`].
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the type name, see [`TypePath::type_name`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the module path, see [`TypePath::module_path`].
    #[inline(always)]
    pub const fn module_path(&self) -> Option<&'static str> {
        self.module
    }

    /// Returns `true` if this is the type `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns `true` if the type is a primitive or lives under one of
    /// [`BUILTIN_MODULES`], so it is written to a schema by its bare name.
    pub fn is_builtin(&self) -> bool {
        match self.module {
            None => true,
            Some(module) => {
                let root = module.split("::").next().unwrap_or(module);
                BUILTIN_MODULES.contains(&root)
            }
        }
    }
}

impl PartialEq for DataType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataType({})", self.path)
    }
}

impl fmt::Display for DataType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::DataType;
    use crate::ops::DynamicList;

    #[test]
    fn builtin_detection() {
        assert!(DataType::of::<i64>().is_builtin());
        assert!(DataType::of::<()>().is_builtin());
        assert!(DataType::of::<String>().is_builtin());
        assert!(DataType::of::<DynamicList>().is_builtin());
        assert!(!DataType::of::<num_complex::Complex<f64>>().is_builtin());
    }

    #[test]
    fn equality_by_type_id() {
        assert_eq!(DataType::of::<i64>(), DataType::of::<i64>());
        assert_ne!(DataType::of::<i64>(), DataType::of::<u64>());
        assert_eq!(format!("{:?}", DataType::of::<bool>()), "DataType(bool)");
    }
}

use std::borrow::Cow;

use super::TypeRegistry;
use crate::info::DataType;
use crate::ops::DynamicRecord;
use crate::{CodecError, Result};

/// Type key of every value encoded by the generic record processor.
pub const RECORD_KEY: &str = "Record";

/// Type keys accepted for the null value; the first one is written.
pub const NULL_KEYS: [&str; 3] = ["None", "NoneType", "()"];

// -----------------------------------------------------------------------------
// type -> key

/// Returns the type key written to a schema for `ty`.
///
/// - [`DynamicRecord`] is written as [`RECORD_KEY`] and `()` as `"None"`.
/// - Built-in types (see [`DataType::is_builtin`]) use their bare name.
/// - Every other type uses its full type path.
///
/// ```
/// use num_complex::Complex;
/// use sc_codec::info::DataType;
/// use sc_codec::ops::DynamicList;
/// use sc_codec::registry::type_to_key;
///
/// assert_eq!(type_to_key(&DataType::of::<i64>()), "i64");
/// assert_eq!(type_to_key(&DataType::of::<String>()), "String");
/// assert_eq!(type_to_key(&DataType::of::<()>()), "None");
/// assert_eq!(type_to_key(&DataType::of::<DynamicList>()), "DynamicList");
/// assert_eq!(type_to_key(&DataType::of::<Complex<f64>>()), "num_complex::Complex<f64>");
/// ```
pub fn type_to_key(ty: &DataType) -> String {
    if ty.is::<DynamicRecord>() {
        RECORD_KEY.to_owned()
    } else if ty.is::<()>() {
        NULL_KEYS[0].to_owned()
    } else if ty.is_builtin() {
        ty.name().to_owned()
    } else {
        ty.path().to_owned()
    }
}

// -----------------------------------------------------------------------------
// key -> type

/// Maps a type key read from a schema back to a [`DataType`].
///
/// Resolution order:
///
/// 1. the null synonyms in [`NULL_KEYS`],
/// 2. [`RECORD_KEY`],
/// 3. bare names of built-in types,
/// 4. full type paths known to `registry`, with `.` accepted in place of `::`.
///
/// Fails with [`CodecError::UnresolvedType`], telling apart an unknown module
/// from a known module without the requested type.
///
/// A resolved type may still lack a processor, e.g. `char`.
pub fn key_to_type(key: &str, registry: &TypeRegistry) -> Result<DataType> {
    if NULL_KEYS.contains(&key) {
        return Ok(DataType::of::<()>());
    }
    if key == RECORD_KEY {
        return Ok(DataType::of::<DynamicRecord>());
    }
    if let Some(ty) = registry.builtin_by_name(key) {
        return Ok(ty);
    }

    let path = normalize_path(key);
    if let Some(ty) = registry.type_by_path(&path) {
        return Ok(ty);
    }

    let reason = match split_path(&path).0 {
        None => String::from("not a built-in type name and has no module path"),
        Some(module) if registry.has_module(module) => {
            format!("module `{module}` has no registered type with this name")
        }
        Some(module) => format!("module `{module}` is not known"),
    };
    Err(CodecError::UnresolvedType {
        type_key: key.to_owned(),
        reason,
    })
}

/// Replaces `.` separators before any generic arguments with `::`.
fn normalize_path(key: &str) -> Cow<'_, str> {
    let generic_start = key.find('<').unwrap_or(key.len());
    let (head, tail) = key.split_at(generic_start);
    if head.contains('.') {
        Cow::Owned(format!("{}{tail}", head.replace('.', "::")))
    } else {
        Cow::Borrowed(key)
    }
}

/// Splits `a::b::Name<T>` into `(Some("a::b"), "Name<T>")`.
pub(crate) fn split_path(path: &str) -> (Option<&str>, &str) {
    let generic_start = path.find('<').unwrap_or(path.len());
    match path[..generic_start].rfind("::") {
        Some(index) => (Some(&path[..index]), &path[index + 2..]),
        None => (None, path),
    }
}

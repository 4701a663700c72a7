//! The recursive engine and the container format.
//!
//! ## Menu
//!
//! - [`Serializer`]: runs save and load passes over [`Data`] values.
//! - [`SchemaNode`]: the JSON description of one value.
//! - [`persist`]: the safetensors container holding arrays and schema.
//! - [`save_file`] and [`load_file`]: one-call persistence with plugins.
//!
//! ## Layout
//!
//! Saving `[42, "hi", None]` yields the schema
//!
//! ```json
//! { "type": "DynamicList", "value": [
//!     { "type": "i64", "value": "42" },
//!     { "type": "String", "value": "hi" },
//!     { "type": "None", "value": null } ] }
//! ```
//!
//! Numeric arrays never enter the schema. They are moved into the
//! [`ArrayStore`](crate::array::ArrayStore) and referenced by id, and the
//! container stores them as tensors with the schema in its metadata.

use std::collections::BTreeMap;
use std::path::Path;

use crate::registry::ProcessorCtor;
use crate::{Data, Result};

// -----------------------------------------------------------------------------
// Modules

mod engine;
mod schema;

pub mod persist;

// -----------------------------------------------------------------------------
// Exports

pub use engine::{Mode, Serializer};
pub use schema::{SchemaNode, TYPE_FIELD, VALUE_FIELD};

// -----------------------------------------------------------------------------
// One-call persistence

/// Saves `value` to a safetensors file at `path`.
///
/// The engine uses the default processors, the auto-registered ones and
/// `plugins`, see [`Serializer::with_plugins`].
///
/// ```
/// use sc_codec::ops::DynamicList;
/// use sc_codec::{load_file, save_file};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("list.safetensors");
///
/// let mut list = DynamicList::new();
/// list.push(1_u8);
/// list.push(String::from("two"));
///
/// save_file(&list, &path, [], None).unwrap();
/// let back = load_file(&path, []).unwrap();
/// assert!(back.data_eq(&list));
/// ```
pub fn save_file(
    value: &dyn Data,
    path: impl AsRef<Path>,
    plugins: impl IntoIterator<Item = ProcessorCtor>,
    metadata: Option<BTreeMap<String, String>>,
) -> Result<()> {
    Serializer::with_plugins(plugins)?.save(value, path, metadata)
}

/// Loads a value from a safetensors file written by [`save_file`].
///
/// `plugins` must cover every custom type key in the file.
pub fn load_file(
    path: impl AsRef<Path>,
    plugins: impl IntoIterator<Item = ProcessorCtor>,
) -> Result<Box<dyn Data>> {
    Serializer::with_plugins(plugins)?.load(path)
}

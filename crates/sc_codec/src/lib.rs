//! A recursive, type-dispatched codec that splits arbitrary nested data into
//! a JSON-shaped schema tree plus a flat store of numeric arrays.
//!
//! See following modules:
//!
//! - [`info`]: stable type paths and [`DataType`](info::DataType).
//! - [`ops`]: dynamic containers and the [`Record`](ops::Record) trait.
//! - [`array`]: host arrays, the array store and array backends.
//! - [`processors`]: the [`Processor`](processors::Processor) trait and the built-in processors.
//! - [`registry`]: the [`TypeRegistry`](registry::TypeRegistry) and type key resolution.
//! - [`serializer`]: the [`Serializer`](serializer::Serializer) engine and the container format.
//!
//! # Example
//!
//! ```
//! use sc_codec::ops::{DynamicList, DynamicMap};
//! use sc_codec::serializer::Serializer;
//!
//! let mut map = DynamicMap::new();
//! map.insert(String::from("a"), 1_i64);
//!
//! let mut list = DynamicList::new();
//! list.push(42_i64);
//! list.push(String::from("hi"));
//! list.push(());
//! list.push(true);
//! list.push(map);
//!
//! let mut serializer = Serializer::new();
//! let (schema, arrays) = serializer.encode(&list).unwrap();
//! assert!(arrays.is_empty());
//!
//! let back = serializer.decode(schema, arrays).unwrap();
//! assert!(back.data_eq(&list));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    sc_cfg::define_alias! {
        #[cfg(feature = "std")] => std,
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(feature = "ndarray")] => ndarray,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// `#[derive(Record)]` resolves paths through `sc_macro_utils::Manifest`, which
// falls back to `::sc_codec` inside this crate's own tests and doctests.
extern crate self as sc_codec;

// -----------------------------------------------------------------------------
// Modules

mod data;
mod error;
mod impls;

pub mod array;
pub mod info;
pub mod ops;
pub mod processors;
pub mod registry;
pub mod serializer;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use data::{Data, data_hasher};
pub use error::{CodecError, Result};
pub use sc_codec_derive as derive;
pub use serializer::{load_file, save_file};

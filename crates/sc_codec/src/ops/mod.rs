//! Dynamic containers and the [`Record`] interface.
//!
//! ## Menu
//!
//! - [`DynamicList`]: ordered, heterogeneous list.
//! - [`DynamicTuple`]: fixed heterogeneous sequence, distinct from a list.
//! - [`DynamicSet`]: insertion-ordered set, deduplicated by [`Data::data_eq`].
//! - [`DynamicMap`]: insertion-ordered map with arbitrary keys.
//! - [`DynamicRecord`]: named fields decided at runtime.
//!
//! Sets and maps index their entries by [`Data::data_hash`].
//!
//! [`Data::data_eq`]: crate::Data::data_eq
//! [`Data::data_hash`]: crate::Data::data_hash

use crate::Data;

// -----------------------------------------------------------------------------
// Modules

mod list_ops;
mod map_ops;
mod record_ops;
mod set_ops;
mod tuple_ops;

// -----------------------------------------------------------------------------
// Exports

pub use list_ops::{DynamicList, Sequence};
pub use map_ops::DynamicMap;
pub use record_ops::{DynamicRecord, FromRecord, Record, RecordFieldIter};
pub use record_ops::{record_eq, record_fmt};
pub use set_ops::DynamicSet;
pub use tuple_ops::DynamicTuple;

// -----------------------------------------------------------------------------
// Entry index

/// Hash of a set value or map key.
///
/// Values without a [`Data::data_hash`] share one bucket, where lookups fall
/// back to comparing them one by one.
#[inline]
pub(crate) fn entry_hash(value: &dyn Data) -> u64 {
    value.data_hash().unwrap_or(0)
}

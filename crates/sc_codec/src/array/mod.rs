//! Numeric arrays: the canonical [`HostArray`], the [`ArrayStore`] that holds
//! them beside a schema, and the [`ArrayBackend`] adapters.
//!
//! Every array is normalized before it is stored: floating point data is
//! converted to `f32`, integer and boolean data keep their type.

// -----------------------------------------------------------------------------
// Modules

mod backend;
mod dtype;
mod host;
mod store;

crate::cfg::ndarray! {
    mod ndarray_backend;
    pub use ndarray_backend::{NdArrayBackend, NdElement};
}

// -----------------------------------------------------------------------------
// Exports

pub use backend::{ArrayBackend, HostBackend};
pub use dtype::{DType, Element};
pub use host::{ArrayData, HostArray};
pub use store::ArrayStore;

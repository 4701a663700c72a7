use std::borrow::Cow;

use super::HostArray;
use crate::info::TypePath;
use crate::{Data, Result};

// -----------------------------------------------------------------------------
// ArrayBackend

/// Adapts one array library to the codec.
///
/// An [`ArrayProcessor`](crate::processors::ArrayProcessor) built on a backend
/// moves tensors to host memory, converts them to a canonical [`HostArray`]
/// and back. Each backend handles exactly one tensor type.
pub trait ArrayBackend: Send + Sync + 'static {
    /// The array type handled by this backend.
    type Tensor: Data + TypePath + Clone;

    /// Makes the tensor host-resident and contiguous, borrowing when it already is.
    fn to_host(tensor: &Self::Tensor) -> Cow<'_, Self::Tensor>;

    /// Converts a host tensor into a [`HostArray`].
    fn to_canonical(tensor: &Self::Tensor) -> Result<HostArray>;

    /// Rebuilds a tensor from a stored [`HostArray`].
    fn from_canonical(array: HostArray) -> Result<Self::Tensor>;
}

// -----------------------------------------------------------------------------
// HostBackend

/// The identity backend for [`HostArray`] itself.
pub struct HostBackend;

impl ArrayBackend for HostBackend {
    type Tensor = HostArray;

    #[inline]
    fn to_host(tensor: &HostArray) -> Cow<'_, HostArray> {
        Cow::Borrowed(tensor)
    }

    #[inline]
    fn to_canonical(tensor: &HostArray) -> Result<HostArray> {
        Ok(tensor.clone())
    }

    #[inline]
    fn from_canonical(array: HostArray) -> Result<HostArray> {
        Ok(array)
    }
}

use core::fmt;
use core::marker::PhantomData;
use std::borrow::Cow;

use ndarray::{ArrayD, IxDyn};

use super::{ArrayBackend, Element, HostArray};
use crate::data::impl_data_type_fn;
use crate::info::TypePath;
use crate::{CodecError, Data, Result};

// -----------------------------------------------------------------------------
// NdArrayBackend

/// Backend for dynamic-rank [`ndarray::ArrayD`] tensors.
///
/// # Examples
///
/// ```
/// use ndarray::ArrayD;
/// use sc_codec::array::{ArrayBackend, NdArrayBackend};
///
/// let tensor = ArrayD::from_shape_vec(vec![2, 2], vec![1.0_f64, 2.0, 3.0, 4.0]).unwrap();
/// let host = NdArrayBackend::<f64>::to_canonical(&tensor).unwrap();
/// assert_eq!(host.shape(), &[2, 2]);
///
/// let back = NdArrayBackend::<f64>::from_canonical(host).unwrap();
/// assert_eq!(back, tensor);
/// ```
pub struct NdArrayBackend<E>(PhantomData<fn() -> E>);

impl<E: NdElement> ArrayBackend for NdArrayBackend<E>
where
    ArrayD<E>: Data + TypePath,
{
    type Tensor = ArrayD<E>;

    fn to_host(tensor: &ArrayD<E>) -> Cow<'_, ArrayD<E>> {
        if tensor.is_standard_layout() {
            Cow::Borrowed(tensor)
        } else {
            Cow::Owned(tensor.as_standard_layout().into_owned())
        }
    }

    fn to_canonical(tensor: &ArrayD<E>) -> Result<HostArray> {
        let values = match tensor.as_slice() {
            Some(slice) => slice.to_vec(),
            None => tensor.iter().copied().collect(),
        };
        HostArray::from_vec(tensor.shape().to_vec(), values)
    }

    fn from_canonical(array: HostArray) -> Result<ArrayD<E>> {
        let shape = array.shape().to_vec();
        let values = array.into_vec::<E>();
        ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| CodecError::array(e.to_string()))
    }
}

// -----------------------------------------------------------------------------
// NdElement

/// Element types with an [`NdArrayBackend`].
pub trait NdElement: Element {}

macro_rules! impl_nd_element {
    ($($ty:ty),*) => {
        $(
            impl NdElement for $ty {}

            impl TypePath for ArrayD<$ty> {
                #[inline]
                fn type_path() -> &'static str {
                    concat!("ndarray::ArrayD<", stringify!($ty), ">")
                }
                #[inline]
                fn type_name() -> &'static str {
                    concat!("ArrayD<", stringify!($ty), ">")
                }
                #[inline]
                fn module_path() -> Option<&'static str> {
                    Some("ndarray")
                }
            }

            impl Data for ArrayD<$ty> {
                impl_data_type_fn!();

                fn clone_data(&self) -> Box<dyn Data> {
                    Box::new(self.clone())
                }

                #[inline]
                fn data_eq(&self, other: &dyn Data) -> bool {
                    other.downcast_ref::<Self>().is_some_and(|other| self == other)
                }

                fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "ArrayD<{}>({:?})", <$ty as Element>::DTYPE, self.shape())
                }
            }
        )*
    };
}

impl_nd_element!(f32, f64, i32, i64, u8, bool);

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::NdArrayBackend;
    use crate::array::{ArrayBackend, DType};

    #[test]
    fn transposed_input_is_made_contiguous() {
        let tensor = ArrayD::from_shape_vec(IxDyn(&[2, 3]), (0..6).map(|v| v as f32).collect())
            .unwrap();
        let transposed = tensor.t().to_owned();
        let view = tensor.clone().reversed_axes();
        assert!(!view.is_standard_layout());

        let host = NdArrayBackend::<f32>::to_host(&view);
        assert!(host.is_standard_layout());

        let canonical = NdArrayBackend::<f32>::to_canonical(&host).unwrap();
        assert_eq!(canonical.shape(), &[3, 2]);
        assert_eq!(canonical.dtype(), DType::F32);

        let back = NdArrayBackend::<f32>::from_canonical(canonical).unwrap();
        assert_eq!(back, transposed);
    }

    #[test]
    fn cast_on_load() {
        let host = crate::array::HostArray::from_vec(vec![2], vec![1.0_f32, 2.0]).unwrap();
        let back = NdArrayBackend::<f64>::from_canonical(host).unwrap();
        assert_eq!(back.into_raw_vec_and_offset().0, vec![1.0_f64, 2.0]);
    }
}

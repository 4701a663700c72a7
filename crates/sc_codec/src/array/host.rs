use core::fmt;
use std::borrow::Cow;

use half::{bf16, f16};

use super::{DType, Element};
use crate::data::impl_data_type_fn;
use crate::{CodecError, Data, Result};

// -----------------------------------------------------------------------------
// ArrayData

/// Typed, row-major element storage of a [`HostArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(Vec<bool>),
    U8(Vec<u8>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F16(Vec<f16>),
    BF16(Vec<bf16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Evaluates `$body` with `$values` bound to the inner vector of any variant.
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ArrayData::Bool($values) => $body,
            ArrayData::U8($values) => $body,
            ArrayData::I8($values) => $body,
            ArrayData::I16($values) => $body,
            ArrayData::U16($values) => $body,
            ArrayData::I32($values) => $body,
            ArrayData::U32($values) => $body,
            ArrayData::I64($values) => $body,
            ArrayData::U64($values) => $body,
            ArrayData::F16($values) => $body,
            ArrayData::BF16($values) => $body,
            ArrayData::F32($values) => $body,
            ArrayData::F64($values) => $body,
        }
    };
}

/// Same as [`with_values`] for every variant whose element is `Pod`.
macro_rules! with_pod_values {
    ($data:expr, $values:ident => $body:expr, Bool($bools:ident) => $bool_body:expr) => {
        match $data {
            ArrayData::Bool($bools) => $bool_body,
            ArrayData::U8($values) => $body,
            ArrayData::I8($values) => $body,
            ArrayData::I16($values) => $body,
            ArrayData::U16($values) => $body,
            ArrayData::I32($values) => $body,
            ArrayData::U32($values) => $body,
            ArrayData::I64($values) => $body,
            ArrayData::U64($values) => $body,
            ArrayData::F16($values) => $body,
            ArrayData::BF16($values) => $body,
            ArrayData::F32($values) => $body,
            ArrayData::F64($values) => $body,
        }
    };
}

impl ArrayData {
    /// Returns the element type.
    pub const fn dtype(&self) -> DType {
        match self {
            ArrayData::Bool(_) => DType::Bool,
            ArrayData::U8(_) => DType::U8,
            ArrayData::I8(_) => DType::I8,
            ArrayData::I16(_) => DType::I16,
            ArrayData::U16(_) => DType::U16,
            ArrayData::I32(_) => DType::I32,
            ArrayData::U32(_) => DType::U32,
            ArrayData::I64(_) => DType::I64,
            ArrayData::U64(_) => DType::U64,
            ArrayData::F16(_) => DType::F16,
            ArrayData::BF16(_) => DType::BF16,
            ArrayData::F32(_) => DType::F32,
            ArrayData::F64(_) => DType::F64,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    /// Returns `true` if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts every element to `E`, moving the vector when it already has that type.
    pub fn cast<E: Element>(self) -> Vec<E> {
        match E::unwrap(self) {
            Ok(values) => values,
            Err(data) => with_values!(data, values => {
                values.into_iter().map(|v| E::from_f64(Element::to_f64(v))).collect()
            }),
        }
    }

    /// Elements as `f64`, for comparisons.
    fn to_f64_vec(&self) -> Vec<f64> {
        with_values!(self, values => values.iter().map(|v| Element::to_f64(*v)).collect())
    }

    /// Little-endian bytes of the elements; `bool` is one byte per element.
    pub fn to_le_bytes(&self) -> Cow<'_, [u8]> {
        with_pod_values!(
            self,
            values => Cow::Borrowed(bytemuck::cast_slice(values)),
            Bool(bools) => Cow::Owned(bools.iter().map(|b| *b as u8).collect())
        )
    }

    /// Reads elements of `dtype` from little-endian bytes.
    pub fn from_le_bytes(dtype: DType, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % dtype.size() != 0 {
            return Err(CodecError::array(format!(
                "{} bytes is not a whole number of `{dtype}` elements",
                bytes.len()
            )));
        }
        fn read<E: Element + bytemuck::Pod>(bytes: &[u8]) -> ArrayData {
            let values = bytes
                .chunks_exact(size_of::<E>())
                .map(bytemuck::pod_read_unaligned::<E>)
                .collect();
            E::wrap(values)
        }
        Ok(match dtype {
            DType::Bool => ArrayData::Bool(bytes.iter().map(|b| *b != 0).collect()),
            DType::U8 => ArrayData::U8(bytes.to_vec()),
            DType::I8 => read::<i8>(bytes),
            DType::I16 => read::<i16>(bytes),
            DType::U16 => read::<u16>(bytes),
            DType::I32 => read::<i32>(bytes),
            DType::U32 => read::<u32>(bytes),
            DType::I64 => read::<i64>(bytes),
            DType::U64 => read::<u64>(bytes),
            DType::F16 => read::<f16>(bytes),
            DType::BF16 => read::<bf16>(bytes),
            DType::F32 => read::<f32>(bytes),
            DType::F64 => read::<f64>(bytes),
        })
    }
}

// -----------------------------------------------------------------------------
// HostArray

/// A dense, row-major, host-resident n-dimensional array.
///
/// This is the canonical form every [`ArrayBackend`](super::ArrayBackend)
/// converts to before an array enters the [`ArrayStore`](super::ArrayStore).
///
/// # Examples
///
/// ```
/// use sc_codec::array::{DType, HostArray};
///
/// let array = HostArray::from_vec(vec![2, 3], vec![0.0_f64; 6]).unwrap();
/// assert_eq!(array.dtype(), DType::F64);
///
/// let canonical = array.canonicalize();
/// assert_eq!(canonical.dtype(), DType::F32);
/// assert_eq!(canonical.shape(), &[2, 3]);
///
/// assert!(HostArray::from_vec(vec![2, 2], vec![1_i32; 3]).is_err());
/// ```
#[derive(Clone, PartialEq)]
pub struct HostArray {
    shape: Vec<usize>,
    data: ArrayData,
}

crate::impl_type_path!(HostArray => "sc_codec::array" :: "HostArray");

impl HostArray {
    /// Creates an array, checking that `shape` matches the element count.
    ///
    /// An empty `shape` is a scalar holding one element.
    pub fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(CodecError::array(format!(
                "shape {shape:?} needs {expected} elements, found {}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// Creates an array from a vector of elements.
    #[inline]
    pub fn from_vec<E: Element>(shape: Vec<usize>, values: Vec<E>) -> Result<Self> {
        Self::new(shape, E::wrap(values))
    }

    /// Returns the shape.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the element type.
    #[inline]
    pub const fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element storage.
    #[inline]
    pub const fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Splits the array into shape and storage.
    #[inline]
    pub fn into_parts(self) -> (Vec<usize>, ArrayData) {
        (self.shape, self.data)
    }

    /// Consumes the array, converting elements to `E`.
    #[inline]
    pub fn into_vec<E: Element>(self) -> Vec<E> {
        self.data.cast()
    }

    /// Converts elements to a new array of type `E`.
    pub fn cast<E: Element>(self) -> Self {
        Self {
            shape: self.shape,
            data: E::wrap(self.data.cast()),
        }
    }

    /// Normalizes floating point arrays to `f32`; other types are unchanged.
    pub fn canonicalize(self) -> Self {
        match self.dtype() {
            DType::F16 | DType::BF16 | DType::F64 => self.cast::<f32>(),
            _ => self,
        }
    }

    /// Compares shapes exactly and elements within `tolerance`, ignoring dtype.
    ///
    /// `NaN` compares equal to `NaN`.
    pub fn approx_eq(&self, other: &HostArray, tolerance: f64) -> bool {
        self.shape == other.shape
            && self
                .data
                .to_f64_vec()
                .into_iter()
                .zip(other.data.to_f64_vec())
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b || (a - b).abs() <= tolerance)
    }
}

impl Data for HostArray {
    impl_data_type_fn!();

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    #[inline]
    fn data_eq(&self, other: &dyn Data) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| self == other)
    }

    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostArray({}, {:?})", self.dtype(), self.shape)
    }
}

impl fmt::Debug for HostArray {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use half::bf16;

    use super::{ArrayData, HostArray};
    use crate::array::DType;

    #[test]
    fn scalar_shape() {
        let scalar = HostArray::from_vec(vec![], vec![7_i64]).unwrap();
        assert_eq!(scalar.len(), 1);
        assert!(scalar.shape().is_empty());
    }

    #[test]
    fn canonicalize_keeps_integers() {
        let ints = HostArray::from_vec(vec![3], vec![1_i32, 2, 3]).unwrap();
        assert_eq!(ints.clone().canonicalize(), ints);

        let halves = HostArray::from_vec(vec![2], vec![bf16::from_f32(1.5), bf16::ONE]).unwrap();
        let canonical = halves.canonicalize();
        assert_eq!(canonical.dtype(), DType::F32);
        assert_eq!(canonical.into_vec::<f32>(), vec![1.5, 1.0]);
    }

    #[test]
    fn byte_round_trip() {
        let data = ArrayData::I16(vec![-1, 2, 300]);
        let bytes = data.to_le_bytes();
        assert_eq!(bytes.len(), 6);
        assert_eq!(ArrayData::from_le_bytes(DType::I16, &bytes).unwrap(), data);

        let bools = ArrayData::Bool(vec![true, false]);
        assert_eq!(&*bools.to_le_bytes(), &[1, 0]);

        assert!(ArrayData::from_le_bytes(DType::F32, &[0, 0, 0]).is_err());
    }

    #[test]
    fn unaligned_bytes_are_read() {
        let mut buffer = vec![0xFF_u8];
        buffer.extend_from_slice(&1.5_f64.to_le_bytes());
        buffer.extend_from_slice(&(-2.0_f64).to_le_bytes());

        let data = ArrayData::from_le_bytes(DType::F64, &buffer[1..]).unwrap();
        assert_eq!(data, ArrayData::F64(vec![1.5, -2.0]));
    }

    #[test]
    fn approx_eq_ignores_dtype() {
        let a = HostArray::from_vec(vec![2], vec![1.0_f32, f32::NAN]).unwrap();
        let b = HostArray::from_vec(vec![2], vec![1.0_f64 + 1e-9, f64::NAN]).unwrap();
        assert!(a.approx_eq(&b, 1e-6));
        assert_ne!(a, b);

        let c = HostArray::from_vec(vec![1, 2], vec![1.0_f32, f32::NAN]).unwrap();
        assert!(!a.approx_eq(&c, 1e-6));
    }
}

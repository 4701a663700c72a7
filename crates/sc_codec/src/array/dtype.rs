use core::fmt;

use half::{bf16, f16};

use super::ArrayData;

// -----------------------------------------------------------------------------
// DType

/// Element type of a [`HostArray`](super::HostArray).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F16,
    BF16,
    F32,
    F64,
}

impl DType {
    /// Size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            DType::Bool | DType::U8 | DType::I8 => 1,
            DType::I16 | DType::U16 | DType::F16 | DType::BF16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 => 8,
        }
    }

    /// Returns `true` for floating point types.
    pub const fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::BF16 | DType::F32 | DType::F64)
    }

    /// Lowercase name, as used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::U8 => "u8",
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::U16 => "u16",
            DType::I32 => "i32",
            DType::U32 => "u32",
            DType::I64 => "i64",
            DType::U64 => "u64",
            DType::F16 => "f16",
            DType::BF16 => "bf16",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }
}

impl fmt::Display for DType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Element

/// A Rust scalar type that can be stored in a [`HostArray`](super::HostArray).
///
/// Conversions between element types go through `f64`, which is exact for
/// every type except 64-bit integers beyond 2^53.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The matching [`DType`].
    const DTYPE: DType;

    /// Wraps a vector into the matching [`ArrayData`] variant.
    fn wrap(values: Vec<Self>) -> ArrayData;

    /// Unwraps the matching [`ArrayData`] variant, giving the data back otherwise.
    fn unwrap(data: ArrayData) -> Result<Vec<Self>, ArrayData>;

    /// Lossy conversion from `f64`.
    fn from_f64(value: f64) -> Self;

    /// Lossy conversion to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$variant;

                #[inline]
                fn wrap(values: Vec<Self>) -> ArrayData {
                    ArrayData::$variant(values)
                }

                #[inline]
                fn unwrap(data: ArrayData) -> Result<Vec<Self>, ArrayData> {
                    match data {
                        ArrayData::$variant(values) => Ok(values),
                        other => Err(other),
                    }
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_element! {
    u8 => U8,
    i8 => I8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

macro_rules! impl_element_half {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$variant;

                #[inline]
                fn wrap(values: Vec<Self>) -> ArrayData {
                    ArrayData::$variant(values)
                }

                #[inline]
                fn unwrap(data: ArrayData) -> Result<Vec<Self>, ArrayData> {
                    match data {
                        ArrayData::$variant(values) => Ok(values),
                        other => Err(other),
                    }
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    <$ty>::from_f64(value)
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    <$ty>::to_f64(self)
                }
            }
        )*
    };
}

impl_element_half!(f16 => F16, bf16 => BF16);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn wrap(values: Vec<Self>) -> ArrayData {
        ArrayData::Bool(values)
    }

    #[inline]
    fn unwrap(data: ArrayData) -> Result<Vec<Self>, ArrayData> {
        match data {
            ArrayData::Bool(values) => Ok(values),
            other => Err(other),
        }
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value != 0.0
    }

    #[inline]
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use half::f16;

    use super::{DType, Element};

    #[test]
    fn element_conversions() {
        assert_eq!(<u8 as Element>::from_f64(3.0), 3);
        assert_eq!(<f16 as Element>::to_f64(f16::from_f32(0.5)), 0.5);
        assert!(<bool as Element>::from_f64(2.0));
        assert_eq!(DType::BF16.size(), 2);
        assert!(DType::F16.is_float());
        assert!(!DType::I64.is_float());
        assert_eq!(DType::U32.to_string(), "u32");
    }
}

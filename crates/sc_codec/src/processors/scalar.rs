use core::fmt::Display;
use core::marker::PhantomData;
use core::str::FromStr;

use serde_json::{Map, Value};

use super::{Processor, downcast_value, json_kind};
use crate::info::{DataType, TypePath};
use crate::registry::type_to_key;
use crate::serializer::Serializer;
use crate::{CodecError, Data, Result};

// -----------------------------------------------------------------------------
// NumberProcessor

/// Encodes a number as its decimal text and parses it back.
///
/// Text keeps full precision for 128-bit integers and non-finite floats
/// (`inf`, `-inf`, `NaN`), which JSON numbers cannot carry.
///
/// ```
/// use sc_codec::serializer::Serializer;
///
/// let mut serializer = Serializer::new();
/// let (schema, arrays) = serializer.encode(&u128::MAX).unwrap();
/// assert_eq!(schema.type_key, "u128");
/// assert_eq!(schema.value, u128::MAX.to_string().as_str());
///
/// let back = serializer.decode(schema, arrays).unwrap();
/// assert_eq!(back.downcast_ref::<u128>(), Some(&u128::MAX));
/// ```
pub struct NumberProcessor<T>(PhantomData<fn() -> T>);

impl<T> Default for NumberProcessor<T> {
    #[inline]
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> Processor for NumberProcessor<T>
where
    T: Data + TypePath + Display + FromStr,
    T::Err: Display,
{
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<T>()
    }

    fn serialize(&self, value: &dyn Data, _: &mut Serializer) -> Result<Value> {
        let number = downcast_value::<T>(value)?;
        Ok(Value::String(number.to_string()))
    }

    fn deserialize(
        &self,
        value: Value,
        _: Map<String, Value>,
        _: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        let Value::String(text) = value else {
            return Err(CodecError::malformed(
                type_to_key(&self.data_type()),
                format!("expected decimal text, found {}", json_kind(&value)),
            ));
        };
        text.parse::<T>()
            .map(|number| Box::new(number) as Box<dyn Data>)
            .map_err(|e| {
                CodecError::malformed(
                    type_to_key(&self.data_type()),
                    format!("cannot parse `{text}`: {e}"),
                )
            })
    }
}

// -----------------------------------------------------------------------------
// PassthroughProcessor

/// A type with a native JSON representation other than a number.
pub trait Passthrough: Data + TypePath + Sized {
    /// Converts the value to JSON.
    fn to_json(&self) -> Value;

    /// Reads the value back, `None` if `value` has the wrong JSON kind.
    fn from_json(value: Value) -> Option<Self>;
}

impl Passthrough for () {
    #[inline]
    fn to_json(&self) -> Value {
        Value::Null
    }

    #[inline]
    fn from_json(value: Value) -> Option<Self> {
        value.is_null().then_some(())
    }
}

impl Passthrough for bool {
    #[inline]
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    #[inline]
    fn from_json(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl Passthrough for String {
    #[inline]
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    #[inline]
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(text),
            _ => None,
        }
    }
}

/// Writes null, booleans and strings as the matching JSON value.
pub struct PassthroughProcessor<T>(PhantomData<fn() -> T>);

impl<T> Default for PassthroughProcessor<T> {
    #[inline]
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Passthrough> Processor for PassthroughProcessor<T> {
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<T>()
    }

    #[inline]
    fn serialize(&self, value: &dyn Data, _: &mut Serializer) -> Result<Value> {
        downcast_value::<T>(value).map(Passthrough::to_json)
    }

    fn deserialize(
        &self,
        value: Value,
        _: Map<String, Value>,
        _: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        let kind = json_kind(&value);
        T::from_json(value)
            .map(|value| Box::new(value) as Box<dyn Data>)
            .ok_or_else(|| {
                CodecError::malformed(
                    type_to_key(&self.data_type()),
                    format!("unexpected {kind}"),
                )
            })
    }
}

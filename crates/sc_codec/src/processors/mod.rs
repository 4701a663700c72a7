//! Per-type encoding strategies.
//!
//! A [`Processor`] turns one concrete type into the `value` of a schema node
//! (plus optional extra fields) and back. Processors are stateless: they get
//! the [`Serializer`] as a parameter and recurse through it for children.
//!
//! ## Built-in processors
//!
//! | Processor | Handles | `value` |
//! |-----------|---------|---------|
//! | [`NumberProcessor`] | integers, floats, complex numbers | decimal text |
//! | [`PassthroughProcessor`] | `()`, `bool`, `String` | JSON null, bool, string |
//! | [`ListLikeProcessor`] | [`DynamicList`], [`DynamicTuple`], [`DynamicSet`] | list of nodes |
//! | [`MapProcessor`] | [`DynamicMap`] | object of nodes, keys in `"keys"` |
//! | [`RecordProcessor`] | any [`Record`] | object of nodes |
//! | [`ArrayProcessor`] | one [`ArrayBackend`] tensor type | array id |
//!
//! [`DynamicList`]: crate::ops::DynamicList
//! [`DynamicTuple`]: crate::ops::DynamicTuple
//! [`DynamicSet`]: crate::ops::DynamicSet
//! [`DynamicMap`]: crate::ops::DynamicMap
//! [`Record`]: crate::ops::Record
//! [`ArrayBackend`]: crate::array::ArrayBackend

use serde_json::{Map, Value};

use crate::info::{DataType, TypePath};
use crate::registry::type_to_key;
use crate::serializer::Serializer;
use crate::{CodecError, Data, Result};

// -----------------------------------------------------------------------------
// Modules

mod array;
mod iterable;
mod record;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArrayProcessor;
pub use iterable::{ListLikeProcessor, MapProcessor};
pub use record::{RecordProcessor, TypedRecordProcessor};
pub use scalar::{NumberProcessor, Passthrough, PassthroughProcessor};

// -----------------------------------------------------------------------------
// Processor

/// The encoding strategy of one concrete type.
///
/// # Contract
///
/// - [`serialize`] returns a JSON value containing no JSON numbers; numbers
///   are written as decimal text and arrays as ids into the array store.
/// - [`serialize_extra`] returns `Value::Null` or an object without the
///   reserved `type` and `value` keys.
///
/// The [`Serializer`] checks both rules and fails with
/// [`CodecError::PluginContract`] when they are broken.
///
/// # Examples
///
/// ```
/// use serde_json::{Map, Value};
/// use sc_codec::{CodecError, Data, Result, impl_data_opaque, impl_type_path};
/// use sc_codec::info::DataType;
/// use sc_codec::processors::{Processor, downcast_value};
/// use sc_codec::registry::{ProcessorCtor, construct};
/// use sc_codec::serializer::Serializer;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Celsius(f64);
///
/// impl_type_path!(Celsius => "weather" :: "Celsius");
/// impl_data_opaque!(Celsius);
///
/// #[derive(Default)]
/// struct CelsiusProcessor;
///
/// impl Processor for CelsiusProcessor {
///     fn data_type(&self) -> DataType {
///         DataType::of::<Celsius>()
///     }
///
///     fn serialize(&self, value: &dyn Data, _: &mut Serializer) -> Result<Value> {
///         let celsius = downcast_value::<Celsius>(value)?;
///         Ok(Value::String(celsius.0.to_string()))
///     }
///
///     fn deserialize(
///         &self,
///         value: Value,
///         _: Map<String, Value>,
///         _: &mut Serializer,
///     ) -> Result<Box<dyn Data>> {
///         value
///             .as_str()
///             .and_then(|text| text.parse().ok())
///             .map(|degrees| Box::new(Celsius(degrees)) as Box<dyn Data>)
///             .ok_or_else(|| CodecError::malformed("weather::Celsius", "expected decimal text"))
///     }
/// }
///
/// let mut serializer =
///     Serializer::with_plugins([construct::<CelsiusProcessor> as ProcessorCtor]).unwrap();
///
/// let (schema, arrays) = serializer.encode(&Celsius(21.5)).unwrap();
/// assert_eq!(schema.type_key, "weather::Celsius");
/// assert_eq!(schema.value, "21.5");
///
/// let back = serializer.decode(schema, arrays).unwrap();
/// assert_eq!(back.downcast_ref::<Celsius>(), Some(&Celsius(21.5)));
/// ```
///
/// [`serialize`]: Processor::serialize
/// [`serialize_extra`]: Processor::serialize_extra
pub trait Processor: Send + Sync + 'static {
    /// The concrete type this processor handles.
    fn data_type(&self) -> DataType;

    /// The key written to the `type` field of the node for `value`.
    ///
    /// Defaults to the key of [`Processor::data_type`].
    fn type_key(&self, value: &dyn Data) -> String {
        let _ = value;
        type_to_key(&self.data_type())
    }

    /// Produces the node `value`, recursing into children through `serializer`.
    fn serialize(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value>;

    /// Produces extra node fields, `Value::Null` for none.
    fn serialize_extra(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        let _ = (value, serializer);
        Ok(Value::Null)
    }

    /// Rebuilds a value from the node `value` and its extra fields.
    fn deserialize(
        &self,
        value: Value,
        extra: Map<String, Value>,
        serializer: &mut Serializer,
    ) -> Result<Box<dyn Data>>;
}

/// Downcasts the value given to a processor, failing with
/// [`CodecError::TypeMismatch`] when it is not a `T`.
pub fn downcast_value<T: Data + TypePath>(value: &dyn Data) -> Result<&T> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| CodecError::TypeMismatch {
            expected: T::type_path(),
            found: value.data_type().path(),
        })
}

/// Describes a JSON value by kind, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

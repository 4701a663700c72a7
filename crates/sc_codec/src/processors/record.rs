use core::marker::PhantomData;

use serde_json::{Map, Value};

use super::{Processor, json_kind};
use crate::info::{DataType, TypePath};
use crate::ops::{DynamicRecord, FromRecord};
use crate::registry::{RECORD_KEY, type_to_key};
use crate::serializer::Serializer;
use crate::{CodecError, Data, Result};

fn serialize_fields(value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
    let record = value.as_record().ok_or_else(|| CodecError::TypeMismatch {
        expected: "a record",
        found: value.data_type().path(),
    })?;
    let mut fields = Map::new();
    for (name, field) in record.iter_fields() {
        fields.insert(name.to_owned(), serializer.serialize(field)?.into_value());
    }
    Ok(Value::Object(fields))
}

fn deserialize_fields(
    type_key: &str,
    value: Value,
    serializer: &mut Serializer,
) -> Result<DynamicRecord> {
    let Value::Object(nodes) = value else {
        return Err(CodecError::malformed(
            type_key,
            format!("expected an object of fields, found {}", json_kind(&value)),
        ));
    };
    let mut record = DynamicRecord::with_capacity(nodes.len());
    for (name, node) in nodes {
        let field = serializer.deserialize_value(node)?;
        record.insert_boxed(name, field);
    }
    Ok(record)
}

// -----------------------------------------------------------------------------
// RecordProcessor

/// The generic fallback for every [`Record`](crate::ops::Record) without a dedicated processor.
///
/// Nodes carry the `Record` marker as type key and decode to a
/// [`DynamicRecord`] with fields in node order.
///
/// ```
/// use sc_codec::derive::Record;
/// use sc_codec::ops::{DynamicRecord, Record as _};
/// use sc_codec::serializer::Serializer;
///
/// #[derive(Record, Clone)]
/// struct Config {
///     name: String,
///     retries: i64,
/// }
///
/// let config = Config { name: String::from("a"), retries: 3 };
///
/// let mut serializer = Serializer::new();
/// let (schema, arrays) = serializer.encode(&config).unwrap();
/// assert_eq!(schema.type_key, "Record");
///
/// let back = serializer.decode(schema, arrays).unwrap();
/// let record = back.downcast_ref::<DynamicRecord>().unwrap();
/// assert_eq!(record.name_at(0), Some("name"));
/// assert!(back.data_eq(&config));
/// ```
#[derive(Default)]
pub struct RecordProcessor;

impl Processor for RecordProcessor {
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<DynamicRecord>()
    }

    #[inline]
    fn type_key(&self, _: &dyn Data) -> String {
        RECORD_KEY.to_owned()
    }

    #[inline]
    fn serialize(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        serialize_fields(value, serializer)
    }

    fn deserialize(
        &self,
        value: Value,
        _: Map<String, Value>,
        serializer: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        deserialize_fields(RECORD_KEY, value, serializer).map(|r| Box::new(r) as Box<dyn Data>)
    }
}

// -----------------------------------------------------------------------------
// TypedRecordProcessor

/// Encodes a record under its own type key and rebuilds the concrete type.
///
/// Register it as a plugin to override the generic [`RecordProcessor`] for `T`.
pub struct TypedRecordProcessor<T>(PhantomData<fn() -> T>);

impl<T> Default for TypedRecordProcessor<T> {
    #[inline]
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: FromRecord + TypePath> Processor for TypedRecordProcessor<T> {
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<T>()
    }

    #[inline]
    fn serialize(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        serialize_fields(value, serializer)
    }

    fn deserialize(
        &self,
        value: Value,
        _: Map<String, Value>,
        serializer: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        let type_key = type_to_key(&self.data_type());
        let record = deserialize_fields(&type_key, value, serializer)?;
        let value = T::from_record(record)?;
        Ok(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use crate::derive::Record;
    use crate::ops::{DynamicList, DynamicRecord, Record as _};
    use crate::processors::TypedRecordProcessor;
    use crate::registry::{ProcessorCtor, construct};
    use crate::serializer::Serializer;

    #[derive(Record, Clone, Debug, PartialEq)]
    #[record(type_path = "geometry::Point")]
    struct Point {
        x: f64,
        y: f64,
    }

    #[derive(Record, Clone)]
    struct Labeled {
        label: String,
        points: DynamicList,
    }

    #[test]
    fn generic_records_decode_dynamically() {
        let mut points = DynamicList::new();
        points.push(Point { x: 1.0, y: 2.0 });
        let labeled = Labeled {
            label: String::from("path"),
            points,
        };

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&labeled).unwrap();
        assert_eq!(schema.type_key, "Record");
        assert_eq!(schema.value["points"]["value"][0]["type"], "Record");

        let back = serializer.decode(schema, arrays).unwrap();
        let record = back.downcast_ref::<DynamicRecord>().unwrap();
        assert_eq!(record.names().collect::<Vec<_>>(), ["label", "points"]);
        assert!(record.field("points").unwrap().data_eq(&labeled.points));
    }

    #[test]
    fn typed_plugin_restores_the_type() {
        let mut serializer = Serializer::with_plugins([
            construct::<TypedRecordProcessor<Point>> as ProcessorCtor,
        ])
        .unwrap();

        let point = Point { x: 0.5, y: -1.0 };
        let (schema, arrays) = serializer.encode(&point).unwrap();
        assert_eq!(schema.type_key, "geometry::Point");

        let back = serializer.decode(schema, arrays).unwrap();
        assert_eq!(back.downcast_ref::<Point>(), Some(&point));
    }
}

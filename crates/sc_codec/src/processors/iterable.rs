use core::marker::PhantomData;

use sc_utils::hash::{FixedHashState, HashSet};
use serde_json::{Map, Value};

use super::{Processor, downcast_value, json_kind};
use crate::info::{DataType, TypePath};
use crate::ops::{DynamicMap, Sequence};
use crate::registry::type_to_key;
use crate::serializer::Serializer;
use crate::{CodecError, Data, Result};

/// Extra field of a map node holding the encoded keys.
pub const KEYS_FIELD: &str = "keys";

// -----------------------------------------------------------------------------
// ListLikeProcessor

/// Encodes a [`Sequence`] as a JSON list of child nodes.
///
/// Lists, tuples and sets keep distinct type keys, so each decodes back to
/// its own container type.
pub struct ListLikeProcessor<C>(PhantomData<fn() -> C>);

impl<C> Default for ListLikeProcessor<C> {
    #[inline]
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<C: Sequence + TypePath> Processor for ListLikeProcessor<C> {
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<C>()
    }

    fn serialize(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        let items = downcast_value::<C>(value)?.items();
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            nodes.push(serializer.serialize(&**item)?.into_value());
        }
        Ok(Value::Array(nodes))
    }

    fn deserialize(
        &self,
        value: Value,
        _: Map<String, Value>,
        serializer: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        let Value::Array(nodes) = value else {
            return Err(CodecError::malformed(
                type_to_key(&self.data_type()),
                format!("expected a list of nodes, found {}", json_kind(&value)),
            ));
        };
        let mut items = Vec::with_capacity(nodes.len());
        for node in nodes {
            items.push(serializer.deserialize_value(node)?);
        }
        Ok(Box::new(C::from_items(items)))
    }
}

// -----------------------------------------------------------------------------
// MapProcessor

/// Encodes a [`DynamicMap`] with arbitrary keys.
///
/// The node `value` maps each key's text form to the encoded value, and the
/// `keys` extra field maps the same text to the encoded key. String keys use
/// their content as text, other keys their debug form, so the tuple key
/// `(1, 2)` becomes `"(1, 2)"`.
///
/// Two keys with the same text collide: the later entry wins and a warning
/// is logged. Earlier entries are dropped before encoding, so arrays inside
/// them never reach the store.
///
/// ```
/// use sc_codec::ops::{DynamicMap, DynamicTuple};
/// use sc_codec::serializer::Serializer;
///
/// let mut key = DynamicTuple::new();
/// key.push(1_i64);
/// key.push(2_i64);
///
/// let mut map = DynamicMap::new();
/// map.insert(key, String::from("tuple-key"));
///
/// let mut serializer = Serializer::new();
/// let (schema, arrays) = serializer.encode(&map).unwrap();
/// assert!(schema.value.get("(1, 2)").is_some());
/// assert!(schema.extra["keys"].get("(1, 2)").is_some());
///
/// let back = serializer.decode(schema, arrays).unwrap();
/// assert!(back.data_eq(&map));
/// ```
#[derive(Default)]
pub struct MapProcessor;

/// The text a map key is stored under.
pub fn key_text(key: &dyn Data) -> String {
    match key.downcast_ref::<String>() {
        Some(text) => text.clone(),
        None => format!("{key:?}"),
    }
}

/// Entries of `map` that are not shadowed by a later key with the same
/// text, in map order, plus the texts of the shadowed ones.
fn visible_entries(map: &DynamicMap) -> (Vec<(String, &dyn Data, &dyn Data)>, Vec<String>) {
    let mut seen = HashSet::with_capacity_and_hasher(map.len(), FixedHashState);
    let mut shadowed = Vec::new();
    let mut entries: Vec<_> = map
        .iter()
        .rev()
        .filter_map(|(key, value)| {
            let text = key_text(key);
            if seen.insert(text.clone()) {
                Some((text, key, value))
            } else {
                shadowed.push(text);
                None
            }
        })
        .collect();
    entries.reverse();
    (entries, shadowed)
}

impl MapProcessor {
    fn malformed(reason: impl Into<String>) -> CodecError {
        CodecError::malformed(type_to_key(&DataType::of::<DynamicMap>()), reason)
    }
}

impl Processor for MapProcessor {
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<DynamicMap>()
    }

    fn serialize(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        let map = downcast_value::<DynamicMap>(value)?;
        let (entries, shadowed) = visible_entries(map);
        for text in shadowed {
            log::warn!("map key `{text}` collides with a later key; the later entry wins");
        }
        let mut nodes = Map::new();
        for (text, _, value) in entries {
            nodes.insert(text, serializer.serialize(value)?.into_value());
        }
        Ok(Value::Object(nodes))
    }

    fn serialize_extra(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        let map = downcast_value::<DynamicMap>(value)?;
        let mut keys = Map::new();
        for (text, key, _) in visible_entries(map).0 {
            keys.insert(text, serializer.serialize(key)?.into_value());
        }
        let mut extra = Map::new();
        extra.insert(KEYS_FIELD.to_owned(), Value::Object(keys));
        Ok(Value::Object(extra))
    }

    fn deserialize(
        &self,
        value: Value,
        mut extra: Map<String, Value>,
        serializer: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        let Value::Object(nodes) = value else {
            return Err(Self::malformed(format!(
                "expected an object of nodes, found {}",
                json_kind(&value)
            )));
        };
        let mut keys = match extra.remove(KEYS_FIELD) {
            Some(Value::Object(keys)) => keys,
            Some(other) => {
                return Err(Self::malformed(format!(
                    "expected `{KEYS_FIELD}` to be an object, found {}",
                    json_kind(&other)
                )));
            }
            None if nodes.is_empty() => Map::new(),
            None => return Err(Self::malformed(format!("missing `{KEYS_FIELD}` field"))),
        };

        let mut map = DynamicMap::new();
        for (text, node) in nodes {
            let key_node = keys
                .remove(&text)
                .ok_or_else(|| Self::malformed(format!("no encoded key for `{text}`")))?;
            let key = serializer.deserialize_value(key_node)?;
            let value = serializer.deserialize_value(node)?;
            map.insert_boxed(key, value);
        }
        Ok(Box::new(map))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::CodecError;
    use crate::array::HostArray;
    use crate::ops::{DynamicList, DynamicMap, DynamicSet, DynamicTuple};
    use crate::serializer::{SchemaNode, Serializer};

    #[test]
    fn sequences_keep_their_kind() {
        let mut tuple = DynamicTuple::new();
        tuple.push(1_i64);
        let mut set = DynamicSet::new();
        set.insert(1_i64);
        let mut list = DynamicList::new();
        list.push(tuple);
        list.push(set);

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&list).unwrap();
        assert_eq!(schema.type_key, "DynamicList");
        assert_eq!(schema.value[0]["type"], "DynamicTuple");
        assert_eq!(schema.value[1]["type"], "DynamicSet");

        let back = serializer.decode(schema, arrays).unwrap();
        assert!(back.data_eq(&list));
    }

    #[test]
    fn colliding_key_text_keeps_last() {
        let mut map = DynamicMap::new();
        map.insert(1_i64, String::from("int"));
        map.insert(String::from("1"), String::from("str"));

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&map).unwrap();
        assert_eq!(schema.value.as_object().map(|m| m.len()), Some(1));
        assert_eq!(schema.value["1"]["value"], "str");

        let back = serializer.decode(schema, arrays).unwrap();
        let back = back.downcast_ref::<DynamicMap>().unwrap();
        assert_eq!(back.len(), 1);
        assert!(back.get(&String::from("1")).is_some());
    }

    #[test]
    fn shadowed_entries_store_no_arrays() {
        let mut map = DynamicMap::new();
        map.insert(1_i64, HostArray::from_vec(vec![1], vec![1_u8]).unwrap());
        map.insert(String::from("1"), HostArray::from_vec(vec![1], vec![2_u8]).unwrap());
        map.insert(String::from("b"), HostArray::from_vec(vec![1], vec![3_u8]).unwrap());

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&map).unwrap();
        assert_eq!(arrays.len(), 2);
        assert_eq!(schema.value["1"]["value"], "0");
        assert_eq!(schema.value["b"]["value"], "1");
        assert_eq!(schema.extra["keys"]["1"]["type"], "String");

        let first = arrays.get("0").map(|a| a.clone().into_vec::<u8>());
        assert_eq!(first, Some(vec![2]));
    }

    #[test]
    fn missing_key_entry_is_malformed() {
        let schema: SchemaNode = serde_json::from_value(json!({
            "type": "DynamicMap",
            "value": { "a": { "type": "i64", "value": "1" } },
            "keys": {}
        }))
        .unwrap();

        let mut serializer = Serializer::new();
        let err = serializer.decode(schema, Default::default()).unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }));
    }

    #[test]
    fn empty_map_round_trip() {
        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&DynamicMap::new()).unwrap();
        assert_eq!(schema.value, json!({}));
        assert_eq!(schema.extra["keys"], json!({}));

        let back = serializer.decode(schema, arrays).unwrap();
        assert!(back.data_eq(&DynamicMap::new()));
    }
}

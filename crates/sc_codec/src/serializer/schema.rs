use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::processors::json_kind;
use crate::{CodecError, Result};

/// Field holding the type key of a node.
pub const TYPE_FIELD: &str = "type";

/// Field holding the processor output of a node.
pub const VALUE_FIELD: &str = "value";

// -----------------------------------------------------------------------------
// SchemaNode

/// The JSON description of one serialized value.
///
/// A node is an object with the type key under `"type"`, the processor
/// output under `"value"`, and any extra fields beside them:
///
/// ```json
/// { "type": "DynamicMap", "value": { "a": { "type": "i64", "value": "1" } },
///   "keys": { "a": { "type": "String", "value": "a" } } }
/// ```
///
/// Nested values appear as nodes inside the parent's `value`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub type_key: String,
    pub value: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemaNode {
    /// Creates a node without extra fields.
    #[inline]
    pub fn new(type_key: impl Into<String>, value: Value) -> Self {
        Self {
            type_key: type_key.into(),
            value,
            extra: Map::new(),
        }
    }

    /// Converts the node into a JSON object, `type` and `value` first.
    pub fn into_value(self) -> Value {
        let mut object = Map::new();
        object.insert(TYPE_FIELD.to_owned(), Value::String(self.type_key));
        object.insert(VALUE_FIELD.to_owned(), self.value);
        object.extend(self.extra);
        Value::Object(object)
    }

    /// Reads a node from a JSON object.
    ///
    /// Fails with [`CodecError::Malformed`] if `value` is not an object with
    /// a string `type` and a `value`.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(CodecError::malformed(
                "node",
                format!("expected an object, found {}", json_kind(&value)),
            ));
        };
        let type_key = match object.shift_remove(TYPE_FIELD) {
            Some(Value::String(type_key)) => type_key,
            Some(other) => {
                return Err(CodecError::malformed(
                    "node",
                    format!("expected `{TYPE_FIELD}` to be a string, found {}", json_kind(&other)),
                ));
            }
            None => {
                return Err(CodecError::malformed(
                    "node",
                    format!("missing `{TYPE_FIELD}` field"),
                ));
            }
        };
        let value = object
            .shift_remove(VALUE_FIELD)
            .ok_or_else(|| CodecError::malformed(&type_key, format!("missing `{VALUE_FIELD}` field")))?;
        Ok(Self {
            type_key,
            value,
            extra: object,
        })
    }

    /// Serializes the node tree to JSON text.
    #[inline]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a node tree from JSON text.
    #[inline]
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// -----------------------------------------------------------------------------
// Processor contract

fn is_node(object: &Map<String, Value>) -> bool {
    object.contains_key(TYPE_FIELD) && object.contains_key(VALUE_FIELD)
}

/// Fails if `value` holds a JSON number outside of nested nodes.
///
/// Nested nodes were checked when they were produced.
pub(crate) fn check_no_numbers(type_key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Number(number) => Err(CodecError::contract(
            type_key,
            format!("value contains the JSON number `{number}`, numbers must be written as text"),
        )),
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| check_no_numbers(type_key, item)),
        Value::Object(object) if is_node(object) => Ok(()),
        Value::Object(object) => object
            .values()
            .try_for_each(|item| check_no_numbers(type_key, item)),
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
    }
}

/// Validates the output of `serialize_extra` and turns it into node fields.
pub(crate) fn check_extra(type_key: &str, extra: Value) -> Result<Map<String, Value>> {
    match extra {
        Value::Null => Ok(Map::new()),
        Value::Object(fields) => {
            for reserved in [TYPE_FIELD, VALUE_FIELD] {
                if fields.contains_key(reserved) {
                    return Err(CodecError::contract(
                        type_key,
                        format!("extra fields must not use the reserved `{reserved}` key"),
                    ));
                }
            }
            Ok(fields)
        }
        other => Err(CodecError::contract(
            type_key,
            format!("extra fields must be an object or null, found {}", json_kind(&other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{SchemaNode, check_extra, check_no_numbers};
    use crate::CodecError;

    #[test]
    fn node_object_layout() {
        let mut node = SchemaNode::new("DynamicMap", json!({}));
        node.extra.insert("keys".into(), json!({}));

        let value = node.clone().into_value();
        assert_eq!(value, json!({ "type": "DynamicMap", "value": {}, "keys": {} }));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["type", "value", "keys"]);

        assert_eq!(SchemaNode::from_value(value).unwrap(), node);
        assert_eq!(SchemaNode::from_json(&node.to_json().unwrap()).unwrap(), node);
    }

    #[test]
    fn invalid_nodes() {
        for value in [json!(1), json!({ "value": 1 }), json!({ "type": 1, "value": 1 })] {
            let err = SchemaNode::from_value(value).unwrap_err();
            assert!(matches!(err, CodecError::Malformed { .. }));
        }
        let err = SchemaNode::from_value(json!({ "type": "i64" })).unwrap_err();
        assert!(matches!(err, CodecError::Malformed { ref type_key, .. } if type_key == "i64"));
    }

    #[test]
    fn numbers_break_the_contract() {
        assert!(check_no_numbers("x", &json!(["1", { "a": null }])).is_ok());
        assert!(check_no_numbers("x", &json!({ "type": "i64", "value": 1 })).is_ok());

        let err = check_no_numbers("x", &json!({ "a": [true, 2.5] })).unwrap_err();
        assert!(matches!(err, CodecError::PluginContract { ref type_key, .. } if type_key == "x"));
    }

    #[test]
    fn extras_shape() {
        assert!(check_extra("x", json!(null)).unwrap().is_empty());
        assert_eq!(check_extra("x", json!({ "keys": {} })).unwrap().len(), 1);
        assert!(check_extra("x", json!({ "value": 1 })).is_err());
        assert!(check_extra("x", json!("text")).is_err());
    }
}

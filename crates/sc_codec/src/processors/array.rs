use core::marker::PhantomData;

use serde_json::{Map, Value};

use super::{Processor, downcast_value, json_kind};
use crate::array::ArrayBackend;
use crate::info::DataType;
use crate::registry::type_to_key;
use crate::serializer::Serializer;
use crate::{CodecError, Data, Result};

/// Moves a tensor into the [`ArrayStore`](crate::array::ArrayStore) and
/// leaves its id in the schema.
///
/// Saving makes the tensor host-resident, converts it to a canonical
/// [`HostArray`](crate::array::HostArray) with floats as `f32`, and pushes it
/// to the store of the current pass. Loading moves the array with that id
/// out of the store and rebuilds the tensor through the backend `B`, so each
/// id can be decoded once.
///
/// ```
/// use sc_codec::array::HostArray;
/// use sc_codec::serializer::Serializer;
///
/// let weights = HostArray::from_vec(vec![2], vec![0.5_f64, 1.5]).unwrap();
///
/// let mut serializer = Serializer::new();
/// let (schema, arrays) = serializer.encode(&weights).unwrap();
/// assert_eq!(schema.type_key, "HostArray");
/// assert_eq!(schema.value, "0");
/// assert_eq!(arrays.get("0").unwrap().dtype().name(), "f32");
///
/// let back = serializer.decode(schema, arrays).unwrap();
/// let back = back.downcast_ref::<HostArray>().unwrap();
/// assert!(back.approx_eq(&weights, 0.0));
/// ```
pub struct ArrayProcessor<B>(PhantomData<fn() -> B>);

impl<B> Default for ArrayProcessor<B> {
    #[inline]
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<B: ArrayBackend> Processor for ArrayProcessor<B> {
    #[inline]
    fn data_type(&self) -> DataType {
        DataType::of::<B::Tensor>()
    }

    fn serialize(&self, value: &dyn Data, serializer: &mut Serializer) -> Result<Value> {
        let tensor = downcast_value::<B::Tensor>(value)?;
        let host = B::to_host(tensor);
        let array = B::to_canonical(&host)?.canonicalize();
        let id = serializer.arrays_mut().push(array);
        Ok(Value::String(id))
    }

    fn deserialize(
        &self,
        value: Value,
        _: Map<String, Value>,
        serializer: &mut Serializer,
    ) -> Result<Box<dyn Data>> {
        let Value::String(id) = value else {
            return Err(CodecError::malformed(
                type_to_key(&self.data_type()),
                format!("expected an array id, found {}", json_kind(&value)),
            ));
        };
        let array = serializer
            .arrays_mut()
            .remove(&id)
            .ok_or(CodecError::MissingArray { id })?;
        let tensor = B::from_canonical(array)?;
        Ok(Box::new(tensor))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::CodecError;
    use crate::array::{ArrayStore, DType, HostArray};
    use crate::ops::DynamicList;
    use crate::serializer::{Mode, SchemaNode, Serializer};

    #[test]
    fn ids_follow_traversal_order() {
        let a = HostArray::from_vec(vec![2], vec![1_i32, 2]).unwrap();
        let b = HostArray::from_vec(vec![1, 1], vec![true]).unwrap();
        let mut list = DynamicList::new();
        list.push(a.clone());
        list.push(b.clone());

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&list).unwrap();
        assert_eq!(schema.value[0]["value"], "0");
        assert_eq!(schema.value[1]["value"], "1");
        assert_eq!(arrays.get("0"), Some(&a));
        assert_eq!(arrays.get("1").map(HostArray::dtype), Some(DType::Bool));

        let back = serializer.decode(schema, arrays).unwrap();
        assert!(back.data_eq(&list));
    }

    #[test]
    fn missing_id_is_reported() {
        let schema: SchemaNode =
            serde_json::from_value(json!({ "type": "HostArray", "value": "7" })).unwrap();

        let mut serializer = Serializer::new();
        let err = serializer.decode(schema, ArrayStore::new()).unwrap_err();
        assert!(matches!(err, CodecError::MissingArray { ref id } if id == "7"));
    }

    #[test]
    fn load_moves_arrays_out_of_the_store() {
        let mut list = DynamicList::new();
        list.push(HostArray::from_vec(vec![2], vec![1_u8, 2]).unwrap());
        list.push(HostArray::from_vec(vec![1], vec![3_i64]).unwrap());

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&list).unwrap();
        assert_eq!(arrays.len(), 2);

        serializer.begin(Mode::Load);
        *serializer.arrays_mut() = arrays.clone();
        let back = serializer.deserialize(schema).unwrap();
        assert!(serializer.arrays().is_empty());
        serializer.finish();
        assert!(back.data_eq(&list));

        // A second reference to an id finds the array gone.
        let node = || SchemaNode::new("HostArray", json!("0")).into_value();
        let twice = SchemaNode::new("DynamicList", json!([node(), node()]));
        let err = serializer.decode(twice, arrays).unwrap_err();
        assert!(matches!(err, CodecError::MissingArray { ref id } if id == "0"));
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn ndarray_tensors_round_trip() {
        use ndarray::ArrayD;

        let tensor = ArrayD::from_shape_vec(vec![3], vec![1.0_f64, 2.0, 3.0]).unwrap();
        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&tensor).unwrap();
        assert_eq!(schema.type_key, "ndarray::ArrayD<f64>");
        assert_eq!(arrays.get("0").map(HostArray::dtype), Some(DType::F32));

        let back = serializer.decode(schema, arrays).unwrap();
        assert_eq!(back.downcast_ref::<ArrayD<f64>>(), Some(&tensor));
    }
}

//! The safetensors container: all arrays as tensors, the schema as JSON text
//! in the header metadata.

use std::collections::{BTreeMap, HashMap};

use safetensors::tensor::{Dtype, SafeTensors, TensorView};

use super::SchemaNode;
use crate::array::{ArrayData, ArrayStore, DType, HostArray};
use crate::{CodecError, Result};

/// Metadata key holding the schema JSON.
pub const SCHEMA_KEY: &str = "_structcodec_schema_";

/// Metadata key holding the schema format version.
pub const VERSION_KEY: &str = "_structcodec_schema_version_";

/// Version of the schema format written by this crate.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Id of the placeholder tensor stored when there are no arrays.
pub const SENTINEL_ID: &str = "null";

/// The decoded parts of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub schema: SchemaNode,
    pub arrays: ArrayStore,
    /// User metadata, without the reserved keys.
    pub metadata: BTreeMap<String, String>,
}

// -----------------------------------------------------------------------------
// dtype mapping

const fn to_safetensors(dtype: DType) -> Dtype {
    match dtype {
        DType::Bool => Dtype::BOOL,
        DType::U8 => Dtype::U8,
        DType::I8 => Dtype::I8,
        DType::I16 => Dtype::I16,
        DType::U16 => Dtype::U16,
        DType::I32 => Dtype::I32,
        DType::U32 => Dtype::U32,
        DType::I64 => Dtype::I64,
        DType::U64 => Dtype::U64,
        DType::F16 => Dtype::F16,
        DType::BF16 => Dtype::BF16,
        DType::F32 => Dtype::F32,
        DType::F64 => Dtype::F64,
    }
}

fn from_safetensors(dtype: Dtype) -> Result<DType> {
    Ok(match dtype {
        Dtype::BOOL => DType::Bool,
        Dtype::U8 => DType::U8,
        Dtype::I8 => DType::I8,
        Dtype::I16 => DType::I16,
        Dtype::U16 => DType::U16,
        Dtype::I32 => DType::I32,
        Dtype::U32 => DType::U32,
        Dtype::I64 => DType::I64,
        Dtype::U64 => DType::U64,
        Dtype::F16 => DType::F16,
        Dtype::BF16 => DType::BF16,
        Dtype::F32 => DType::F32,
        Dtype::F64 => DType::F64,
        other => {
            return Err(CodecError::InvalidContainer {
                reason: format!("unsupported tensor dtype {other:?}"),
            });
        }
    })
}

// -----------------------------------------------------------------------------
// write

fn write_error(reason: impl ToString) -> CodecError {
    CodecError::ContainerWrite {
        reason: reason.to_string(),
    }
}

/// Serializes `arrays` and `schema` into safetensors bytes.
///
/// An empty store is written with a one-element `i64` tensor under
/// [`SENTINEL_ID`], since a container must hold at least one tensor. User
/// keys colliding with [`SCHEMA_KEY`] or [`VERSION_KEY`] are overwritten.
pub fn write(
    arrays: &ArrayStore,
    schema: &SchemaNode,
    mut metadata: BTreeMap<String, String>,
) -> Result<Vec<u8>> {
    for key in [SCHEMA_KEY, VERSION_KEY] {
        if metadata.contains_key(key) {
            log::warn!("metadata key `{key}` is reserved and will be overwritten");
        }
    }
    metadata.insert(SCHEMA_KEY.to_owned(), schema.to_json()?);
    metadata.insert(VERSION_KEY.to_owned(), SCHEMA_VERSION.to_owned());

    let sentinel;
    let tensors: Vec<(&str, &HostArray)> = if arrays.is_empty() {
        sentinel = HostArray::new(vec![1], ArrayData::I64(vec![0]))?;
        vec![(SENTINEL_ID, &sentinel)]
    } else {
        arrays.iter().collect()
    };

    let bytes: Vec<_> = tensors
        .iter()
        .map(|(_, array)| array.data().to_le_bytes())
        .collect();
    let views = tensors
        .iter()
        .zip(&bytes)
        .map(|((id, array), bytes)| {
            TensorView::new(to_safetensors(array.dtype()), array.shape().to_vec(), bytes)
                .map(|view| (*id, view))
                .map_err(write_error)
        })
        .collect::<Result<Vec<_>>>()?;

    let metadata: HashMap<String, String> = metadata.into_iter().collect();
    log::debug!("writing container with {} tensors", views.len());
    safetensors::serialize(views, &Some(metadata)).map_err(write_error)
}

// -----------------------------------------------------------------------------
// read

fn invalid(reason: impl Into<String>) -> CodecError {
    CodecError::InvalidContainer {
        reason: reason.into(),
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or_default().trim()
}

fn check_version(found: Option<&str>) -> Result<()> {
    let Some(found) = found else {
        log::warn!("container has no schema version, assuming `{SCHEMA_VERSION}`");
        return Ok(());
    };
    if major(found) != major(SCHEMA_VERSION) {
        return Err(CodecError::IncompatibleVersion {
            found: found.to_owned(),
            expected: SCHEMA_VERSION.to_owned(),
        });
    }
    if found != SCHEMA_VERSION {
        log::debug!("reading schema version `{found}` with version `{SCHEMA_VERSION}`");
    }
    Ok(())
}

/// Reads a container written by [`write`].
///
/// Fails with [`CodecError::InvalidContainer`] if the bytes are not a
/// safetensors buffer or carry no schema, and with
/// [`CodecError::IncompatibleVersion`] if the schema has another major version.
pub fn read(bytes: &[u8]) -> Result<Container> {
    let (_, header) = SafeTensors::read_metadata(bytes)
        .map_err(|e| invalid(format!("not a safetensors buffer: {e}")))?;
    let mut metadata: BTreeMap<String, String> = header
        .metadata()
        .as_ref()
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    let schema = metadata
        .remove(SCHEMA_KEY)
        .ok_or_else(|| invalid(format!("missing `{SCHEMA_KEY}` metadata")))?;
    check_version(metadata.remove(VERSION_KEY).as_deref())?;
    let schema = SchemaNode::from_json(&schema)
        .map_err(|e| invalid(format!("schema is not valid JSON: {e}")))?;

    let tensors = SafeTensors::deserialize(bytes)
        .map_err(|e| invalid(format!("not a safetensors buffer: {e}")))?;
    let mut arrays = ArrayStore::new();
    for (id, view) in tensors.tensors() {
        if id == SENTINEL_ID {
            continue;
        }
        let dtype = from_safetensors(view.dtype())?;
        let data = ArrayData::from_le_bytes(dtype, view.data())?;
        arrays.insert(id, HostArray::new(view.shape().to_vec(), data)?);
    }

    Ok(Container {
        schema,
        arrays,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use serde_json::json;

    use super::{SCHEMA_KEY, SCHEMA_VERSION, VERSION_KEY, check_version, major, read, write};
    use crate::CodecError;
    use crate::array::{ArrayStore, DType, HostArray};
    use crate::ops::DynamicList;
    use crate::serializer::{SchemaNode, Serializer};

    fn raw_container(metadata: &[(&str, &str)]) -> Vec<u8> {
        let metadata: HashMap<String, String> = metadata
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let data = 0_i64.to_le_bytes();
        let view = safetensors::tensor::TensorView::new(
            safetensors::tensor::Dtype::I64,
            vec![1],
            &data,
        )
        .unwrap();
        safetensors::serialize([("null", view)], &Some(metadata)).unwrap()
    }

    #[test]
    fn empty_store_uses_sentinel() {
        let schema = SchemaNode::new("i64", json!("5"));
        let bytes = write(&ArrayStore::new(), &schema, BTreeMap::new()).unwrap();

        let container = read(&bytes).unwrap();
        assert!(container.arrays.is_empty());
        assert_eq!(container.schema, schema);
        assert!(container.metadata.is_empty());
    }

    #[test]
    fn dtypes_and_metadata_survive() {
        let mut arrays = ArrayStore::new();
        let halves = vec![half::f16::ONE, half::f16::ZERO];
        arrays.push(HostArray::from_vec(vec![2], halves).unwrap());
        arrays.push(HostArray::from_vec(vec![3], vec![true, false, true]).unwrap());
        arrays.push(HostArray::from_vec(vec![1, 2], vec![u64::MAX, 1]).unwrap());

        let mut metadata = BTreeMap::new();
        metadata.insert(String::from("author"), String::from("me"));
        metadata.insert(SCHEMA_KEY.to_owned(), String::from("clobbered"));

        let schema = SchemaNode::new("None", json!(null));
        let bytes = write(&arrays, &schema, metadata).unwrap();
        let container = read(&bytes).unwrap();

        assert_eq!(container.arrays, arrays);
        assert_eq!(container.arrays.get("0").map(HostArray::dtype), Some(DType::F16));
        assert_eq!(container.schema, schema);
        assert_eq!(container.metadata.len(), 1);
        assert_eq!(container.metadata["author"], "me");
    }

    #[test]
    fn container_errors() {
        let err = read(b"not a container").unwrap_err();
        assert!(matches!(err, CodecError::InvalidContainer { .. }));

        let err = read(&raw_container(&[("other", "x")])).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidContainer { ref reason } if reason.contains(SCHEMA_KEY)
        ));

        let schema = r#"{"type":"i64","value":"1"}"#;
        let bytes = raw_container(&[(SCHEMA_KEY, schema), (VERSION_KEY, "2.0.0")]);
        let err = read(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::IncompatibleVersion { ref found, .. } if found == "2.0.0"
        ));

        let bytes = raw_container(&[(SCHEMA_KEY, schema), (VERSION_KEY, "1.4.2")]);
        let container = read(&bytes).unwrap();
        assert_eq!(container.schema.type_key, "i64");
        let container = read(&raw_container(&[(SCHEMA_KEY, schema)])).unwrap();
        assert!(container.arrays.is_empty());
    }

    #[test]
    fn only_major_versions_must_match() {
        assert_eq!(major("1.0.0"), "1");
        assert_eq!(major(" 12 .3"), "12");
        assert_eq!(major(""), "");

        assert!(check_version(None).is_ok());
        assert!(check_version(Some(SCHEMA_VERSION)).is_ok());
        assert!(check_version(Some("1.9")).is_ok());
        assert!(matches!(
            check_version(Some("0.9.0")),
            Err(CodecError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");

        let mut list = DynamicList::new();
        list.push(HostArray::from_vec(vec![2, 2], vec![0.5_f64, 1.0, 1.5, 2.0]).unwrap());
        list.push(String::from("tail"));

        let mut serializer = Serializer::new();
        serializer.save(&list, &path, None).unwrap();
        let back = serializer.load(&path).unwrap();
        let back = back.downcast_ref::<DynamicList>().unwrap();

        let array = back.get(0).unwrap().downcast_ref::<HostArray>().unwrap();
        assert_eq!(array.dtype(), DType::F32);
        let expected = HostArray::from_vec(vec![2, 2], vec![0.5_f32, 1.0, 1.5, 2.0]).unwrap();
        assert!(array.approx_eq(&expected, 1e-6));
        assert!(back.get(1).unwrap().data_eq(&String::from("tail")));

        let err = serializer.load(dir.path().join("missing.safetensors")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}

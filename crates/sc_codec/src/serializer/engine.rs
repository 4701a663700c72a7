use core::any::TypeId;
use core::fmt;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use serde_json::Value;

use super::persist::{self, Container};
use super::schema::{SchemaNode, check_extra, check_no_numbers};
use crate::array::ArrayStore;
use crate::ops::DynamicRecord;
use crate::registry::{ProcessorCtor, ProcessorEntry, TypeRegistry, key_to_type, type_to_key};
use crate::{CodecError, Data, Result};

static DEFAULT_REGISTRY: LazyLock<Arc<TypeRegistry>> =
    LazyLock::new(|| Arc::new(TypeRegistry::new()));

// -----------------------------------------------------------------------------
// Mode

/// The direction of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Save,
    Load,
}

impl Mode {
    const fn name(mode: Option<Mode>) -> &'static str {
        match mode {
            Some(Mode::Save) => "save",
            Some(Mode::Load) => "load",
            None => "no",
        }
    }
}

// -----------------------------------------------------------------------------
// Serializer

/// The recursive engine.
///
/// A pass starts with [`begin`](Self::begin) and ends with
/// [`finish`](Self::finish). During a save pass [`serialize`](Self::serialize)
/// dispatches every value to its processor and collects arrays; during a
/// load pass [`deserialize`](Self::deserialize) resolves type keys and
/// rebuilds values. Processors recurse through the same engine for children.
///
/// [`encode`](Self::encode) and [`decode`](Self::decode) run a whole pass in
/// memory, [`save`](Self::save) and [`load`](Self::load) through a
/// safetensors container.
///
/// # Examples
///
/// ```
/// use sc_codec::array::HostArray;
/// use sc_codec::ops::DynamicMap;
/// use sc_codec::serializer::Serializer;
///
/// let mut model = DynamicMap::new();
/// model.insert(String::from("name"), String::from("linear"));
/// let weight = HostArray::from_vec(vec![2, 2], vec![1.0_f32; 4]).unwrap();
/// model.insert(String::from("weight"), weight);
///
/// let mut serializer = Serializer::new();
/// let bytes = serializer.save_to_bytes(&model, None).unwrap();
/// let back = serializer.load_from_bytes(&bytes).unwrap();
/// assert!(back.data_eq(&model));
/// ```
pub struct Serializer {
    registry: Arc<TypeRegistry>,
    arrays: ArrayStore,
    mode: Option<Mode>,
}

impl Default for Serializer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("mode", &self.mode)
            .field("arrays", &self.arrays.len())
            .finish_non_exhaustive()
    }
}

impl Serializer {
    /// Creates an engine over the shared default registry, see [`TypeRegistry::new`].
    #[inline]
    pub fn new() -> Self {
        Self::with_registry(Arc::clone(&DEFAULT_REGISTRY))
    }

    /// Creates an engine over `registry`.
    #[inline]
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            arrays: ArrayStore::new(),
            mode: None,
        }
    }

    /// Creates an engine over the defaults, the auto-registered plugins and
    /// `plugins`, see [`TypeRegistry::with_plugins`].
    #[inline]
    pub fn with_plugins(plugins: impl IntoIterator<Item = ProcessorCtor>) -> Result<Self> {
        let registry = TypeRegistry::with_plugins(plugins)?;
        Ok(Self::with_registry(Arc::new(registry)))
    }

    /// The registry used for dispatch.
    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The direction of the current pass, `None` between passes.
    #[inline]
    pub const fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// The array store of the current pass.
    #[inline]
    pub fn arrays(&self) -> &ArrayStore {
        &self.arrays
    }

    /// The array store of the current pass, for processors adding arrays.
    #[inline]
    pub fn arrays_mut(&mut self) -> &mut ArrayStore {
        &mut self.arrays
    }

    /// Starts a pass with an empty array store.
    pub fn begin(&mut self, mode: Mode) {
        log::debug!("begin {} pass", Mode::name(Some(mode)));
        self.arrays.clear();
        self.mode = Some(mode);
    }

    /// Ends the pass and returns its array store.
    pub fn finish(&mut self) -> ArrayStore {
        log::debug!(
            "finish {} pass with {} arrays",
            Mode::name(self.mode),
            self.arrays.len()
        );
        self.mode = None;
        core::mem::take(&mut self.arrays)
    }

    fn require(&self, mode: Mode, operation: &'static str) -> Result<()> {
        if self.mode == Some(mode) {
            Ok(())
        } else {
            Err(CodecError::InvalidMode {
                operation,
                mode: Mode::name(self.mode),
            })
        }
    }

    fn save_entry<'r>(
        registry: &'r TypeRegistry,
        value: &dyn Data,
    ) -> Result<&'r ProcessorEntry> {
        if let Some(entry) = registry.get(value.ty_id()) {
            return Ok(entry);
        }
        if value.as_record().is_some()
            && let Some(entry) = registry.get(TypeId::of::<DynamicRecord>())
        {
            return Ok(entry);
        }
        Err(CodecError::ProcessorNotFound {
            type_key: type_to_key(&value.data_type()),
        })
    }

    /// Encodes `value` into a schema node, adding its arrays to the store.
    ///
    /// A value is dispatched to the processor of its exact type; records
    /// without one fall back to the generic record processor.
    ///
    /// Fails with [`CodecError::InvalidMode`] outside of a save pass and with
    /// [`CodecError::ProcessorNotFound`] if no processor applies.
    pub fn serialize(&mut self, value: &dyn Data) -> Result<SchemaNode> {
        self.require(Mode::Save, "serialize")?;

        let registry = Arc::clone(&self.registry);
        let processor = Self::save_entry(&registry, value)?.processor();
        let type_key = processor.type_key(value);

        crate::cfg::debug! {
            log::trace!("serialize `{type_key}`");
        }

        let node_value = processor.serialize(value, self)?;
        check_no_numbers(&type_key, &node_value)?;
        let extra = processor.serialize_extra(value, self)?;
        let extra = check_extra(&type_key, extra)?;

        Ok(SchemaNode {
            type_key,
            value: node_value,
            extra,
        })
    }

    /// Rebuilds a value from a schema node, reading arrays from the store.
    ///
    /// Fails with [`CodecError::InvalidMode`] outside of a load pass,
    /// [`CodecError::UnresolvedType`] if the type key names no known type and
    /// [`CodecError::ProcessorNotFound`] if the type has no processor.
    pub fn deserialize(&mut self, node: SchemaNode) -> Result<Box<dyn Data>> {
        self.require(Mode::Load, "deserialize")?;

        let SchemaNode {
            type_key,
            value,
            extra,
        } = node;

        crate::cfg::debug! {
            log::trace!("deserialize `{type_key}`");
        }

        let registry = Arc::clone(&self.registry);
        let data_type = key_to_type(&type_key, &registry)?;
        let entry = registry
            .get(data_type.id())
            .ok_or(CodecError::ProcessorNotFound { type_key })?;
        entry.processor().deserialize(value, extra, self)
    }

    /// Reads a node from a JSON value and rebuilds it, see [`deserialize`](Self::deserialize).
    #[inline]
    pub fn deserialize_value(&mut self, node: Value) -> Result<Box<dyn Data>> {
        self.deserialize(SchemaNode::from_value(node)?)
    }

    /// Runs a complete save pass in memory.
    ///
    /// The engine is left between passes even if encoding fails.
    pub fn encode(&mut self, value: &dyn Data) -> Result<(SchemaNode, ArrayStore)> {
        self.begin(Mode::Save);
        let schema = self.serialize(value);
        let arrays = self.finish();
        Ok((schema?, arrays))
    }

    /// Runs a complete load pass in memory.
    ///
    /// The engine is left between passes even if decoding fails.
    pub fn decode(&mut self, schema: SchemaNode, arrays: ArrayStore) -> Result<Box<dyn Data>> {
        self.begin(Mode::Load);
        self.arrays = arrays;
        let value = self.deserialize(schema);
        self.finish();
        value
    }

    /// Encodes `value` into safetensors bytes.
    ///
    /// User `metadata` is stored beside the schema; keys colliding with the
    /// reserved schema keys are overwritten.
    pub fn save_to_bytes(
        &mut self,
        value: &dyn Data,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Result<Vec<u8>> {
        let (schema, arrays) = self.encode(value)?;
        persist::write(&arrays, &schema, metadata.unwrap_or_default())
    }

    /// Encodes `value` into a safetensors file at `path`, see
    /// [`save_to_bytes`](Self::save_to_bytes).
    pub fn save(
        &mut self,
        value: &dyn Data,
        path: impl AsRef<Path>,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Result<()> {
        let bytes = self.save_to_bytes(value, metadata)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Decodes a value from safetensors bytes.
    ///
    /// Fails with [`CodecError::InvalidContainer`] if the bytes are not a
    /// container written by [`save_to_bytes`](Self::save_to_bytes).
    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<Box<dyn Data>> {
        let Container { schema, arrays, .. } = persist::read(bytes)?;
        self.decode(schema, arrays)
    }

    /// Decodes a value from a safetensors file, see
    /// [`load_from_bytes`](Self::load_from_bytes).
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Box<dyn Data>> {
        let bytes = std::fs::read(path)?;
        self.load_from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::{Mode, Serializer};
    use crate::array::HostArray;
    use crate::info::DataType;
    use crate::ops::{DynamicList, DynamicMap, DynamicTuple};
    use crate::processors::Processor;
    use crate::registry::{ProcessorCtor, construct};
    use crate::serializer::SchemaNode;
    use crate::{CodecError, Data, Result, impl_data_opaque, impl_type_path};

    #[test]
    fn mode_is_required() {
        let mut serializer = Serializer::new();
        let err = serializer.serialize(&1_i64).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidMode { operation: "serialize", mode: "no" }
        ));

        serializer.begin(Mode::Load);
        assert!(serializer.serialize(&1_i64).is_err());
        serializer.finish();

        serializer.begin(Mode::Save);
        let err = serializer
            .deserialize(SchemaNode::new("i64", json!("1")))
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidMode { mode: "save", .. }));
        serializer.finish();
        assert_eq!(serializer.mode(), None);
    }

    #[test]
    fn mixed_list_children() {
        let mut map = DynamicMap::new();
        map.insert(String::from("a"), 1_i64);
        let mut list = DynamicList::new();
        list.push(42_i64);
        list.push(String::from("hi"));
        list.push(());
        list.push(true);
        list.push(map);

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&list).unwrap();
        let types: Vec<_> = (0..5)
            .map(|i| schema.value[i]["type"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(types, ["i64", "String", "None", "bool", "DynamicMap"]);
        assert_eq!(schema.value[2]["value"], Value::Null);

        let back = serializer.decode(schema, arrays).unwrap();
        assert!(back.data_eq(&list));
    }

    #[test]
    fn tuple_keys_use_the_key_table() {
        let mut key = DynamicTuple::new();
        key.push(1_i64);
        key.push(2_i64);
        let mut map = DynamicMap::new();
        map.insert(key, 3_i64);

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&map).unwrap();
        let key_node = &schema.extra["keys"]["(1, 2)"];
        assert_eq!(key_node["type"], "DynamicTuple");
        assert_eq!(key_node["value"][1], json!({ "type": "i64", "value": "2" }));

        let back = serializer.decode(schema, arrays).unwrap();
        assert!(back.data_eq(&map));
    }

    #[test]
    fn nested_arrays_are_numbered_in_order() {
        let array = |v: f32| HostArray::from_vec(vec![1], vec![v]).unwrap();
        let mut inner = DynamicList::new();
        inner.push(array(1.0));
        let mut map = DynamicMap::new();
        map.insert(String::from("deep"), inner);
        let mut outer = DynamicList::new();
        outer.push(array(0.0));
        outer.push(map);
        outer.push(array(2.0));

        let mut serializer = Serializer::new();
        let (_, arrays) = serializer.encode(&outer).unwrap();
        let ids: Vec<_> = arrays
            .iter()
            .map(|(id, array)| (id, array.clone().into_vec::<f32>()[0]))
            .collect();
        assert_eq!(ids, [("0", 0.0), ("1", 1.0), ("2", 2.0)]);
    }

    #[test]
    fn reused_engine_matches_fresh_engines() {
        let mut list = DynamicList::new();
        list.push(HostArray::from_vec(vec![2], vec![1_i64, 2]).unwrap());

        let mut reused = Serializer::new();
        let first = reused.encode(&list).unwrap();
        let second = reused.encode(&list).unwrap();
        let fresh = Serializer::new().encode(&list).unwrap();
        assert_eq!(first, second);
        assert_eq!(second, fresh);
        assert_eq!(second.1.len(), 1);
    }

    #[test]
    fn unsupported_values() {
        let mut serializer = Serializer::new();
        let err = serializer.encode(&'c').unwrap_err();
        assert!(matches!(err, CodecError::ProcessorNotFound { ref type_key } if type_key == "char"));
        assert_eq!(serializer.mode(), None);

        let err = serializer
            .decode(SchemaNode::new("char", json!("c")), Default::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::ProcessorNotFound { .. }));

        let err = serializer
            .decode(SchemaNode::new("weather.Celsius", json!("1")), Default::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::UnresolvedType { .. }));
    }

    #[derive(Clone, PartialEq, Debug)]
    struct Raw(i64);

    impl_type_path!(Raw => "engine_tests" :: "Raw");
    impl_data_opaque!(Raw);

    #[derive(Default)]
    struct NumericRaw;

    impl Processor for NumericRaw {
        fn data_type(&self) -> DataType {
            DataType::of::<Raw>()
        }

        fn serialize(&self, value: &dyn Data, _: &mut Serializer) -> Result<Value> {
            let raw = value.downcast_ref::<Raw>().map_or(0, |raw| raw.0);
            Ok(json!([raw]))
        }

        fn deserialize(
            &self,
            _: Value,
            _: Map<String, Value>,
            _: &mut Serializer,
        ) -> Result<Box<dyn Data>> {
            Ok(Box::new(Raw(0)))
        }
    }

    #[derive(Default)]
    struct ReservedExtra;

    impl Processor for ReservedExtra {
        fn data_type(&self) -> DataType {
            DataType::of::<Raw>()
        }

        fn serialize(&self, _: &dyn Data, _: &mut Serializer) -> Result<Value> {
            Ok(Value::Null)
        }

        fn serialize_extra(&self, _: &dyn Data, _: &mut Serializer) -> Result<Value> {
            Ok(json!({ "type": "shadow" }))
        }

        fn deserialize(
            &self,
            _: Value,
            _: Map<String, Value>,
            _: &mut Serializer,
        ) -> Result<Box<dyn Data>> {
            Ok(Box::new(Raw(0)))
        }
    }

    #[test]
    fn plugin_contract_is_checked() {
        let plugins = [construct::<NumericRaw> as ProcessorCtor];
        let mut serializer = Serializer::with_plugins(plugins).unwrap();
        let err = serializer.encode(&Raw(7)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::PluginContract { ref type_key, .. } if type_key == "engine_tests::Raw"
        ));

        let plugins = [construct::<ReservedExtra> as ProcessorCtor];
        let mut serializer = Serializer::with_plugins(plugins).unwrap();
        let err = serializer.encode(&Raw(7)).unwrap_err();
        assert!(matches!(err, CodecError::PluginContract { .. }));
    }

    #[test]
    fn duplicate_plugin_builds_no_engine() {
        let plugins = [construct::<crate::processors::NumberProcessor<f32>> as ProcessorCtor];
        let err = Serializer::with_plugins(plugins).unwrap_err();
        assert!(matches!(err, CodecError::DuplicateType { ref type_key } if type_key == "f32"));
    }
}

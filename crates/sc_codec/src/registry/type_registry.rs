use core::any::TypeId;
use core::fmt;

use num_complex::Complex;
use sc_utils::TypeIdMap;
use sc_utils::hash::HashMap;

use super::{resolver, type_to_key};
use crate::array::HostBackend;
use crate::info::DataType;
use crate::ops::{DynamicList, DynamicSet, DynamicTuple};
use crate::processors::{ArrayProcessor, MapProcessor, NumberProcessor, Processor};
use crate::processors::{ListLikeProcessor, PassthroughProcessor, RecordProcessor};
use crate::{CodecError, Result};

/// Builds a processor instance; the unit of registration.
pub type ProcessorCtor = fn() -> Box<dyn Processor>;

/// The [`ProcessorCtor`] of a `Default` processor.
///
/// ```
/// use sc_codec::processors::NumberProcessor;
/// use sc_codec::registry::{ProcessorCtor, construct};
///
/// let ctor: ProcessorCtor = construct::<NumberProcessor<i64>>;
/// assert!(ctor().data_type().is::<i64>());
/// ```
#[inline]
pub fn construct<P: Processor + Default>() -> Box<dyn Processor> {
    Box::new(P::default())
}

// -----------------------------------------------------------------------------
// ProcessorEntry

/// A registered processor together with its type key.
pub struct ProcessorEntry {
    key: String,
    data_type: DataType,
    processor: Box<dyn Processor>,
}

impl ProcessorEntry {
    /// The type key nodes of this type are written with.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The type handled by the processor.
    #[inline]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The processor itself.
    #[inline]
    pub fn processor(&self) -> &dyn Processor {
        &*self.processor
    }
}

impl fmt::Debug for ProcessorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorEntry")
            .field("key", &self.key)
            .field("data_type", &self.data_type)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// The table of processors, indexed for both directions of a pass.
///
/// - Saving dispatches on the [`TypeId`] of a value.
/// - Loading resolves a type key through [`key_to_type`](super::key_to_type),
///   which consults the bare-name index of built-in types and the path index.
///
/// A registry is built once, then shared read-only between
/// [`Serializer`](crate::serializer::Serializer)s behind an `Arc`.
///
/// # Examples
///
/// ```
/// use sc_codec::CodecError;
/// use sc_codec::processors::NumberProcessor;
/// use sc_codec::registry::{TypeRegistry, construct};
///
/// let mut registry = TypeRegistry::new();
/// assert_eq!(registry.resolve("i64").unwrap().key(), "i64");
///
/// let err = registry.register(construct::<NumberProcessor<i64>>).unwrap_err();
/// assert!(matches!(err, CodecError::DuplicateType { .. }));
/// ```
pub struct TypeRegistry {
    entries: TypeIdMap<ProcessorEntry>,
    key_to_id: HashMap<String, TypeId>,
    path_to_type: HashMap<&'static str, DataType>,
    builtin_names: HashMap<&'static str, DataType>,
    auto_registered: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry without processors.
    ///
    /// Only the built-in types without a default processor (`char`) are
    /// known, so their keys resolve but cannot be decoded.
    pub fn empty() -> Self {
        let mut registry = Self {
            entries: TypeIdMap::new(),
            key_to_id: HashMap::default(),
            path_to_type: HashMap::default(),
            builtin_names: HashMap::default(),
            auto_registered: false,
        };
        registry.add_type_indices(DataType::of::<char>());
        registry
    }

    /// Create a registry with the default processors.
    ///
    /// - `()` `bool` `String`
    /// - `i8 - i128` `isize` `u8 - u128` `usize` `f32` `f64`
    /// - `Complex<f32>` `Complex<f64>`
    /// - [`DynamicList`] [`DynamicSet`] [`DynamicTuple`] and
    ///   [`DynamicMap`](crate::ops::DynamicMap)
    /// - [`DynamicRecord`](crate::ops::DynamicRecord), the fallback of all records
    /// - [`HostArray`](crate::array::HostArray), and `ndarray::ArrayD<E>`
    ///   with the `ndarray` feature
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for ctor in default_processors() {
            registry.insert_entry(ctor());
        }
        registry
    }

    /// Create a registry with the default processors, the auto-registered
    /// plugins and `plugins`, in that order.
    ///
    /// Fails with [`CodecError::DuplicateType`] if any plugin handles an
    /// already taken type or type key.
    pub fn with_plugins(plugins: impl IntoIterator<Item = ProcessorCtor>) -> Result<Self> {
        let mut registry = Self::new();
        registry.auto_register()?;
        for ctor in plugins {
            registry.register(ctor)?;
        }
        Ok(registry)
    }

    fn add_type_indices(&mut self, data_type: DataType) {
        if data_type.is_builtin() {
            self.builtin_names.insert(data_type.name(), data_type);
        }
        self.path_to_type.insert(data_type.path(), data_type);
    }

    // # Validity
    // Neither the key nor the type may be registered already.
    fn insert_entry(&mut self, processor: Box<dyn Processor>) {
        let data_type = processor.data_type();
        let key = type_to_key(&data_type);
        self.add_type_indices(data_type);
        self.key_to_id.insert(key.clone(), data_type.id());
        self.entries.insert(
            data_type.id(),
            ProcessorEntry {
                key,
                data_type,
                processor,
            },
        );
    }

    /// Instantiates the processor built by `ctor` and registers it.
    ///
    /// Fails with [`CodecError::DuplicateType`] if its type key or its type
    /// is already registered.
    #[inline]
    pub fn register(&mut self, ctor: ProcessorCtor) -> Result<()> {
        self.register_boxed(ctor())
    }

    /// Registers the `Default` processor `P`, see [`register`](Self::register).
    #[inline]
    pub fn register_processor<P: Processor + Default>(&mut self) -> Result<()> {
        self.register_boxed(Box::new(P::default()))
    }

    /// Registers an already built processor, see [`register`](Self::register).
    pub fn register_boxed(&mut self, processor: Box<dyn Processor>) -> Result<()> {
        let data_type = processor.data_type();
        let key = type_to_key(&data_type);
        if self.key_to_id.contains_key(&key) || self.entries.contains(&data_type.id()) {
            return Err(CodecError::DuplicateType { type_key: key });
        }
        log::debug!("registered processor for `{key}`");
        self.insert_entry(processor);
        Ok(())
    }

    /// Registers every processor submitted with
    /// [`submit_processor!`](crate::submit_processor).
    ///
    /// Returns `Ok(true)` once plugins have been collected. Repeated calls do
    /// nothing. Without the `auto_register` feature this always returns
    /// `Ok(false)`.
    ///
    /// Fails with [`CodecError::DuplicateType`] like [`register`](Self::register).
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> Result<bool> {
        crate::cfg::auto_register! {
            if {
                if self.auto_registered {
                    return Ok(true);
                }
                for plugin in inventory::iter::<super::ProcessorPlugin> {
                    self.register(plugin.ctor())?;
                }
                self.auto_registered = true;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    /// Returns the entry registered under `type_key`.
    ///
    /// Fails with [`CodecError::UnknownType`] if there is none.
    pub fn resolve(&self, type_key: &str) -> Result<&ProcessorEntry> {
        self.key_to_id
            .get(type_key)
            .and_then(|id| self.entries.get(id))
            .ok_or_else(|| CodecError::UnknownType {
                type_key: type_key.to_owned(),
            })
    }

    /// Returns the entry of the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&ProcessorEntry> {
        self.entries.get(&type_id)
    }

    /// Returns `true` if a processor is registered for the type.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries.contains(&type_id)
    }

    /// Looks a known type up by its full type path.
    #[inline]
    pub fn type_by_path(&self, path: &str) -> Option<DataType> {
        self.path_to_type.get(path).copied()
    }

    /// Looks a known built-in type up by its bare name.
    #[inline]
    pub fn builtin_by_name(&self, name: &str) -> Option<DataType> {
        self.builtin_names.get(name).copied()
    }

    /// Returns `true` if any known type lives in `module` or a submodule of it.
    pub fn has_module(&self, module: &str) -> bool {
        self.path_to_type.keys().any(|path| {
            resolver::split_path(path).0.is_some_and(|found| {
                found == module
                    || found
                        .strip_prefix(module)
                        .is_some_and(|rest| rest.starts_with("::"))
            })
        })
    }

    /// Returns the number of registered processors.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no processor is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the registered entries in no particular order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ProcessorEntry> {
        self.entries.values()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.key_to_id.keys()).finish()
    }
}

fn default_processors() -> Vec<ProcessorCtor> {
    use super::construct as c;

    let defaults = [
        c::<PassthroughProcessor<()>> as ProcessorCtor,
        c::<PassthroughProcessor<bool>>,
        c::<PassthroughProcessor<String>>,
        c::<NumberProcessor<i8>>,
        c::<NumberProcessor<i16>>,
        c::<NumberProcessor<i32>>,
        c::<NumberProcessor<i64>>,
        c::<NumberProcessor<i128>>,
        c::<NumberProcessor<isize>>,
        c::<NumberProcessor<u8>>,
        c::<NumberProcessor<u16>>,
        c::<NumberProcessor<u32>>,
        c::<NumberProcessor<u64>>,
        c::<NumberProcessor<u128>>,
        c::<NumberProcessor<usize>>,
        c::<NumberProcessor<f32>>,
        c::<NumberProcessor<f64>>,
        c::<NumberProcessor<Complex<f32>>>,
        c::<NumberProcessor<Complex<f64>>>,
        c::<ListLikeProcessor<DynamicList>>,
        c::<ListLikeProcessor<DynamicSet>>,
        c::<ListLikeProcessor<DynamicTuple>>,
        c::<MapProcessor>,
        c::<RecordProcessor>,
        c::<ArrayProcessor<HostBackend>>,
    ];

    crate::cfg::ndarray!(if {
        use crate::array::NdArrayBackend;

        let backends = [
            c::<ArrayProcessor<NdArrayBackend<f32>>> as ProcessorCtor,
            c::<ArrayProcessor<NdArrayBackend<f64>>>,
            c::<ArrayProcessor<NdArrayBackend<i32>>>,
            c::<ArrayProcessor<NdArrayBackend<i64>>>,
            c::<ArrayProcessor<NdArrayBackend<u8>>>,
            c::<ArrayProcessor<NdArrayBackend<bool>>>,
        ];
        defaults.into_iter().chain(backends).collect()
    } else {
        defaults.to_vec()
    })
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::CodecError;
    use crate::array::HostArray;
    use crate::processors::{NumberProcessor, PassthroughProcessor};
    use crate::registry::{ProcessorCtor, construct};

    #[test]
    fn defaults_are_indexed() {
        let registry = TypeRegistry::new();
        for key in ["None", "bool", "String", "u8", "f64", "DynamicMap", "Record", "HostArray"] {
            assert_eq!(registry.resolve(key).unwrap().key(), key);
        }
        assert!(registry.get(TypeId::of::<HostArray>()).is_some());
        assert!(registry.get(TypeId::of::<char>()).is_none());
        assert!(registry.builtin_by_name("char").is_some());
        assert!(registry.has_module("num_complex"));
        assert!(registry.has_module("alloc"));
        assert!(!registry.has_module("weather"));
    }

    #[test]
    fn default_table_follows_features() {
        let registry = TypeRegistry::new();
        for key in ["DynamicList", "DynamicSet", "DynamicTuple", "num_complex::Complex<f64>"] {
            assert!(registry.resolve(key).is_ok(), "{key}");
        }
        let expected = if cfg!(feature = "ndarray") { 31 } else { 25 };
        assert_eq!(registry.len(), expected);
    }

    #[test]
    fn unknown_key() {
        let registry = TypeRegistry::empty();
        assert!(registry.is_empty());
        let err = registry.resolve("i64").unwrap_err();
        assert!(matches!(err, CodecError::UnknownType { ref type_key } if type_key == "i64"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut registry = TypeRegistry::empty();
        registry.register(construct::<NumberProcessor<u16>>).unwrap();
        registry.register_processor::<PassthroughProcessor<bool>>().unwrap();
        assert_eq!(registry.len(), 2);

        let err = registry
            .register_processor::<NumberProcessor<u16>>()
            .unwrap_err();
        assert!(matches!(err, CodecError::DuplicateType { ref type_key } if type_key == "u16"));
        assert_eq!(registry.len(), 2);

        let plugins = [construct::<PassthroughProcessor<String>> as ProcessorCtor];
        let err = TypeRegistry::with_plugins(plugins).unwrap_err();
        assert!(matches!(err, CodecError::DuplicateType { .. }));
    }
}

use super::{ProcessorCtor, construct};
use crate::processors::Processor;

/// A processor submitted for automatic registration.
///
/// Values are created by [`submit_processor!`](crate::submit_processor) and
/// collected by [`TypeRegistry::auto_register`](super::TypeRegistry::auto_register).
pub struct ProcessorPlugin {
    ctor: ProcessorCtor,
}

impl ProcessorPlugin {
    /// Wraps a processor constructor.
    #[inline]
    pub const fn new(ctor: ProcessorCtor) -> Self {
        Self { ctor }
    }

    /// The plugin of the `Default` processor `P`.
    #[inline]
    pub const fn of<P: Processor + Default>() -> Self {
        Self::new(construct::<P>)
    }

    /// The constructor of the submitted processor.
    #[inline]
    pub const fn ctor(&self) -> ProcessorCtor {
        self.ctor
    }
}

crate::cfg::auto_register! {
    crate::__macro_exports::inventory::collect!(ProcessorPlugin);
}

/// Submits a `Default` processor for automatic registration.
///
/// Every [`TypeRegistry::with_plugins`](crate::registry::TypeRegistry::with_plugins)
/// call, and thus every [`save_file`](crate::save_file) and
/// [`load_file`](crate::load_file), picks it up. Without the `auto_register`
/// feature the macro expands to nothing.
///
/// Generic processors must be submitted once per concrete instantiation.
///
/// ```
/// use sc_codec::derive::Record;
/// use sc_codec::processors::TypedRecordProcessor;
/// use sc_codec::serializer::Serializer;
/// use sc_codec::submit_processor;
///
/// #[derive(Record, Clone, PartialEq, Debug)]
/// #[record(type_path = "inventory_demo::Item")]
/// struct Item {
///     name: String,
///     count: u32,
/// }
///
/// submit_processor!(TypedRecordProcessor<Item>);
///
/// let mut serializer = Serializer::with_plugins([]).unwrap();
/// let item = Item { name: String::from("bolt"), count: 12 };
/// let (schema, arrays) = serializer.encode(&item).unwrap();
/// # #[cfg(feature = "auto_register")]
/// # {
/// assert_eq!(schema.type_key, "inventory_demo::Item");
/// let back = serializer.decode(schema, arrays).unwrap();
/// assert_eq!(back.downcast_ref::<Item>(), Some(&item));
/// # }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_processor {
    ($processor:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::ProcessorPlugin::of::<$processor>()
        }
    };
}

/// Submits a `Default` processor for automatic registration.
///
/// The `auto_register` feature is disabled, so this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_processor {
    ($processor:ty) => {};
}

#[cfg(all(test, feature = "auto_register"))]
mod tests {
    use crate::processors::TypedRecordProcessor;
    use crate::registry::TypeRegistry;
    use crate::derive::Record;

    #[derive(Record, Clone)]
    #[record(type_path = "plugin_tests::Submitted")]
    struct Submitted {
        id: i64,
    }

    submit_processor!(TypedRecordProcessor<Submitted>);

    #[test]
    fn submitted_processors_are_collected() {
        let mut registry = TypeRegistry::new();
        assert!(registry.resolve("plugin_tests::Submitted").is_err());

        assert!(registry.auto_register().unwrap());
        let entry = registry.resolve("plugin_tests::Submitted").unwrap();
        assert!(entry.data_type().is::<Submitted>());

        // Already collected.
        let len = registry.len();
        assert!(registry.auto_register().unwrap());
        assert_eq!(registry.len(), len);
    }
}

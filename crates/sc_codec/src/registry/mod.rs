//! Processor registration and type key resolution.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: the processor table, shared read-only by engines.
//! - [`ProcessorCtor`] and [`construct`]: the unit of registration.
//! - [`type_to_key`] and [`key_to_type`]: the mapping between types and the
//!   `type` field of schema nodes.
//! - [`ProcessorPlugin`] and [`submit_processor!`](crate::submit_processor):
//!   link-time registration.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use the [`inventory`](https://docs.rs/inventory) crate to collect
//! submitted processors. Registries built with [`TypeRegistry::with_plugins`]
//! include them; [`TypeRegistry::new`] only has the defaults.

// -----------------------------------------------------------------------------
// Modules

mod plugin;
mod resolver;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use plugin::ProcessorPlugin;
pub use resolver::{NULL_KEYS, RECORD_KEY, key_to_type, type_to_key};
pub use type_registry::{ProcessorCtor, ProcessorEntry, TypeRegistry, construct};

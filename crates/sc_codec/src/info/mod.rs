//! Static type identity: [`TypePath`] and [`DataType`].

// -----------------------------------------------------------------------------
// Modules

mod data_type;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use data_type::{BUILTIN_MODULES, DataType};
pub use type_path::TypePath;

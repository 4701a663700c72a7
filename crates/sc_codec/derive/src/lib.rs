//! See following macros:
//!
//! - [`Record`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod path;
mod record_meta;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements the following traits for a struct with
/// named fields:
///
/// - `TypePath`
/// - `Data`
/// - `Record`
/// - `FromRecord`
///
/// The struct must implement `Clone`, and every field type must implement
/// `Data` and `TypePath`. Generic structs, tuple structs and enums are
/// rejected.
///
/// ## Custom Type Path
///
/// The type path defaults to `module_path!()` followed by the struct name.
/// Pin a stable path, independent of the module layout, with:
///
/// ```rust, ignore
/// #[derive(Record, Clone)]
/// #[record(type_path = "geometry::Point")]
/// struct Point { x: f64, y: f64 }
/// ```
///
/// ## Field Order
///
/// Fields are enumerated in declaration order. `FromRecord` looks fields up
/// by name, so the order of a stored record does not matter.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let meta = match record_meta::RecordMeta::parse(&ast) {
        Ok(meta) => meta,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_path_impl = impls::impl_type_path(&meta);
    let data_impl = impls::impl_data(&meta);
    let record_impl = impls::impl_record(&meta);

    TokenStream::from(quote! {
        const _: () = {
            #type_path_impl
            #data_impl
            #record_impl
        };
    })
}

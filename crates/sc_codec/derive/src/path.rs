//! Paths of `sc_codec` items used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the access path to the `sc_codec` crate from the crate being compiled.
///
/// Scanning the caller's Cargo.toml is costly, so the path is obtained once
/// per derive and passed around.
pub(crate) fn sc_codec() -> syn::Path {
    sc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("sc_codec"))
}

#[inline(always)]
pub(crate) fn data_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::Data }
}

#[inline(always)]
pub(crate) fn result_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::Result }
}

#[inline(always)]
pub(crate) fn type_path_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::TypePath }
}

#[inline(always)]
pub(crate) fn data_type_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::info::DataType }
}

#[inline(always)]
pub(crate) fn ops_(codec: &syn::Path) -> TokenStream {
    quote! { #codec::ops }
}

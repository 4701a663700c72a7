use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::RECORD_ATTRIBUTE_NAME;

/// A named field of the deriving struct.
pub(crate) struct RecordField<'a> {
    pub ident: &'a Ident,
    /// The field name without the `r#` prefix.
    pub name: String,
    pub ty: &'a Type,
}

/// Everything the generated impls need to know about the deriving struct.
pub(crate) struct RecordMeta<'a> {
    pub ident: &'a Ident,
    pub fields: Vec<RecordField<'a>>,
    /// Value of `#[record(type_path = "...")]`.
    pub type_path: Option<LitStr>,
    pub codec_path: syn::Path,
}

impl<'a> RecordMeta<'a> {
    pub fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "`#[derive(Record)]` does not support generic types",
            ));
        }

        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new(
                        Span::call_site(),
                        "`#[derive(Record)]` requires a struct with named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "`#[derive(Record)]` only supports structs",
                ));
            }
        };

        let fields = named
            .named
            .iter()
            .filter_map(|field| {
                field.ident.as_ref().map(|ident| RecordField {
                    ident,
                    name: ident.unraw().to_string(),
                    ty: &field.ty,
                })
            })
            .collect();

        let mut type_path = None;
        for attr in &input.attrs {
            if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("type_path") {
                    let path: LitStr = meta.value()?.parse()?;
                    if path.value().is_empty() || path.value().starts_with("::") {
                        return Err(
                            meta.error("`type_path` must be a non-empty path without leading `::`")
                        );
                    }
                    type_path = Some(path);
                    Ok(())
                } else {
                    Err(meta.error("unknown record attribute, expected `type_path`"))
                }
            })?;
        }

        Ok(Self {
            ident: &input.ident,
            fields,
            type_path,
            codec_path: crate::path::sc_codec(),
        })
    }
}

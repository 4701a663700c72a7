use proc_macro2::TokenStream;
use quote::quote;

use crate::record_meta::RecordMeta;

/// Generate implementation codes for `TypePath`
pub(crate) fn impl_type_path(meta: &RecordMeta) -> TokenStream {
    let trait_type_path_ = crate::path::type_path_(&meta.codec_path);
    let ident = meta.ident;

    let (type_path, type_name, module_path) = match &meta.type_path {
        Some(lit) => {
            let path = lit.value();
            let (module, name) = match path.rsplit_once("::") {
                Some((module, name)) => (Some(module.to_owned()), name.to_owned()),
                None => (None, path.clone()),
            };
            let module = match module {
                Some(module) => quote! { ::core::option::Option::Some(#module) },
                None => quote! { ::core::option::Option::None },
            };
            (quote! { #path }, quote! { #name }, module)
        }
        None => {
            let name = ident.to_string();
            (
                quote! { ::core::concat!(::core::module_path!(), "::", #name) },
                quote! { #name },
                quote! { ::core::option::Option::Some(::core::module_path!()) },
            )
        }
    };

    quote! {
        impl #trait_type_path_ for #ident {
            #[inline]
            fn type_path() -> &'static str {
                #type_path
            }

            #[inline]
            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                #module_path
            }
        }
    }
}

/// Generate implementation codes for `Data`
pub(crate) fn impl_data(meta: &RecordMeta) -> TokenStream {
    let codec = &meta.codec_path;
    let data_ = crate::path::data_(codec);
    let data_type_ = crate::path::data_type_(codec);
    let ops_ = crate::path::ops_(codec);
    let ident = meta.ident;

    quote! {
        impl #data_ for #ident {
            #[inline]
            fn data_type(&self) -> #data_type_ {
                #data_type_::of::<Self>()
            }

            #[inline]
            fn as_record(&self) -> ::core::option::Option<&dyn #ops_::Record> {
                ::core::option::Option::Some(self)
            }

            fn clone_data(&self) -> ::std::boxed::Box<dyn #data_> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            #[inline]
            fn data_eq(&self, other: &dyn #data_) -> bool {
                #ops_::record_eq(self, other)
            }

            #[inline]
            fn data_fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                #ops_::record_fmt(self, f)
            }
        }
    }
}

/// Generate implementation codes for `Record` and `FromRecord`
pub(crate) fn impl_record(meta: &RecordMeta) -> TokenStream {
    let codec = &meta.codec_path;
    let data_ = crate::path::data_(codec);
    let result_ = crate::path::result_(codec);
    let ops_ = crate::path::ops_(codec);
    let ident = meta.ident;

    let field_len = meta.fields.len();
    let indices = 0..field_len;
    let names: Vec<_> = meta.fields.iter().map(|field| &field.name).collect();
    let idents: Vec<_> = meta.fields.iter().map(|field| field.ident).collect();
    let types = meta.fields.iter().map(|field| field.ty);

    let name_arms = indices.clone().zip(&names).map(|(index, name)| {
        quote! { #index => ::core::option::Option::Some(#name), }
    });
    let field_arms = indices.zip(&idents).map(|(index, ident)| {
        quote! { #index => ::core::option::Option::Some(&self.#ident), }
    });

    quote! {
        impl #ops_::Record for #ident {
            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }

            fn name_at(&self, index: usize) -> ::core::option::Option<&str> {
                match index {
                    #(#name_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #data_> {
                match index {
                    #(#field_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn iter_fields(&self) -> #ops_::RecordFieldIter<'_> {
                #ops_::RecordFieldIter::new(self)
            }
        }

        impl #ops_::FromRecord for #ident {
            fn from_record(mut record: #ops_::DynamicRecord) -> #result_<Self> {
                ::core::result::Result::Ok(Self {
                    #(#idents: record.take_field::<#types>(#names)?,)*
                })
            }
        }
    }
}

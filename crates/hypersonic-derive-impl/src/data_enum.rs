// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[derive(DataEnum)]` implementation.
//!
//! Generates a `FieldType` impl with `KIND = FieldKind::Enum`:
//!
//! | Direction | Behavior |
//! |-----------|----------|
//! | flatten | variant name as a string value |
//! | hydrate | name match ignoring case, then discriminant, else `UnknownVariant` |

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, parse_macro_input};

/// Main entry point for the DataEnum derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match generate(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into()
    }
}

fn generate(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let variants = variants(input)?;
    let enumeration = ident.to_string();
    let names: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let positions = 0..variants.len();

    Ok(quote! {
        #[automatically_derived]
        impl ::hypersonic::FieldType for #ident {
            const KIND: ::hypersonic::FieldKind = ::hypersonic::FieldKind::Enum;

            fn to_field(&self) -> ::hypersonic::FieldRef<'_> {
                let name = match self {
                    #(Self::#variants => #names,)*
                };
                ::hypersonic::FieldRef::Value(::hypersonic::Value::String(
                    ::std::string::String::from(name)
                ))
            }

            fn from_value(
                value: ::hypersonic::Value
            ) -> ::core::result::Result<Self, ::hypersonic::CoercionError> {
                const VARIANTS: &[(&str, i64)] = &[#((#names, #ident::#variants as i64)),*];
                match ::hypersonic::enum_variant(value, #enumeration, VARIANTS)? {
                    #(#positions => ::core::result::Result::Ok(Self::#variants),)*
                    other => ::core::result::Result::Err(::hypersonic::CoercionError::UnknownVariant {
                        value: ::std::string::ToString::to_string(&other),
                        enumeration: #enumeration
                    })
                }
            }
        }
    })
}

fn variants(input: &DeriveInput) -> syn::Result<Vec<&Ident>> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "DataEnum cannot be derived for generic enums"
        ));
    }
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "DataEnum can only be derived for enums"
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "DataEnum requires at least one variant"
        ));
    }
    data.variants
        .iter()
        .map(|variant| match variant.fields {
            Fields::Unit => Ok(&variant.ident),
            _ => Err(syn::Error::new_spanned(
                variant,
                "DataEnum variants cannot carry fields"
            ))
        })
        .collect()
}

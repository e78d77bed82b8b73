// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[derive(Record)]` implementation.
//!
//! # Architecture
//!
//! ```text
//! record.rs
//! │
//! ├── parse.rs    → RecordDef (darling: #[record], #[data])
//! │
//! └── generate    → impl Record    (descriptor, field, assign, prepare_nested)
//!                 → impl FieldType (KIND = Record, nested instantiation)
//! ```
//!
//! # Generated Code
//!
//! Field indices are declaration positions. Collection fields keep their
//! slot in the descriptor with `FieldKind::Collection` but are never read,
//! assigned or instantiated. Fields marked `#[data(ignore)]` are treated the
//! same way with `FieldKind::Unmapped`, so their type needs no `FieldType`
//! impl.

mod parse;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::{FieldDef, RecordDef};

/// Main entry point for the Record derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match RecordDef::from_derive_input(&input) {
        Ok(def) => generate(&def).into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(def: &RecordDef) -> TokenStream2 {
    let ident = &def.ident;
    let name = &def.name;
    let ident_str = ident.to_string();

    let descriptors = def.fields.iter().map(descriptor);
    let reads = def.fields.iter().enumerate().map(|(i, f)| read_arm(i, f));
    let assigns = def.fields.iter().enumerate().map(|(i, f)| assign_arm(i, f));
    let prepares = def.fields.iter().enumerate().map(|(i, f)| prepare_arm(i, f));

    quote! {
        #[automatically_derived]
        impl ::hypersonic::Record for #ident {
            fn descriptor(&self) -> &'static ::hypersonic::TypeDescriptor {
                static DESCRIPTOR: ::hypersonic::TypeDescriptor = ::hypersonic::TypeDescriptor {
                    name: #name,
                    path: ::core::concat!(::core::module_path!(), "::", #ident_str),
                    fields: &[#(#descriptors),*]
                };
                &DESCRIPTOR
            }

            fn field(&self, index: usize) -> ::hypersonic::FieldRef<'_> {
                match index {
                    #(#reads)*
                    _ => ::hypersonic::FieldRef::Absent
                }
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                index: usize,
                value: ::hypersonic::Value
            ) -> ::core::result::Result<(), ::hypersonic::CoercionError> {
                match index {
                    #(#assigns)*
                    _ => ::core::result::Result::Err(::hypersonic::CoercionError::UnknownField(index))
                }
            }

            fn prepare_nested(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::hypersonic::Record> {
                match index {
                    #(#prepares)*
                    _ => ::core::option::Option::None
                }
            }
        }

        #[automatically_derived]
        impl ::hypersonic::FieldType for #ident {
            const KIND: ::hypersonic::FieldKind = ::hypersonic::FieldKind::Record;

            fn to_field(&self) -> ::hypersonic::FieldRef<'_> {
                ::hypersonic::FieldRef::Record(self)
            }

            fn from_value(
                value: ::hypersonic::Value
            ) -> ::core::result::Result<Self, ::hypersonic::CoercionError> {
                ::core::result::Result::Err(::hypersonic::CoercionError::Unsupported {
                    from: value.kind_name(),
                    to: ::hypersonic::FieldKind::Record
                })
            }

            fn instantiate() -> ::core::option::Option<Self> {
                ::core::option::Option::Some(<Self as ::core::default::Default>::default())
            }

            fn prepare(&mut self) -> ::core::option::Option<&mut dyn ::hypersonic::Record> {
                ::core::option::Option::Some(self)
            }
        }
    }
}

fn descriptor(field: &FieldDef) -> TokenStream2 {
    let name = field.ident.to_string();
    let type_name = &field.type_name;
    let ty = &field.ty;
    let ignore_parameter = field.ignore_parameter;
    let ignore_hydration = field.ignore_hydration;
    let alias = field
        .alias
        .as_ref()
        .map(|alias| quote! { .with_alias(#alias) });

    let (kind, nullable) = if field.collection {
        (quote! { ::hypersonic::FieldKind::Collection }, quote! { true })
    } else if field.is_unmapped() {
        (quote! { ::hypersonic::FieldKind::Unmapped }, quote! { true })
    } else {
        (
            quote! { <#ty as ::hypersonic::FieldType>::KIND },
            quote! { <#ty as ::hypersonic::FieldType>::NULLABLE }
        )
    };

    quote! {
        ::hypersonic::FieldDescriptor::new(#name, #type_name, #kind)
            #alias
            .with_nullable(#nullable)
            .with_ignore(::hypersonic::Ignore {
                parameters: #ignore_parameter,
                hydration: #ignore_hydration
            })
    }
}

fn read_arm(index: usize, field: &FieldDef) -> TokenStream2 {
    let ident = &field.ident;
    if field.collection {
        return quote! { #index => ::hypersonic::FieldRef::Collection, };
    }
    if field.is_unmapped() {
        return quote! { #index => ::hypersonic::FieldRef::Unmapped, };
    }
    quote! { #index => ::hypersonic::FieldType::to_field(&self.#ident), }
}

fn assign_arm(index: usize, field: &FieldDef) -> TokenStream2 {
    let ident = &field.ident;
    let ty = &field.ty;
    if field.collection || field.is_unmapped() {
        let kind = if field.collection {
            quote! { ::hypersonic::FieldKind::Collection }
        } else {
            quote! { ::hypersonic::FieldKind::Unmapped }
        };
        return quote! {
            #index => ::core::result::Result::Err(::hypersonic::CoercionError::Unsupported {
                from: value.kind_name(),
                to: #kind
            }),
        };
    }
    quote! {
        #index => {
            self.#ident = <#ty as ::hypersonic::FieldType>::from_value(value)?;
            ::core::result::Result::Ok(())
        }
    }
}

fn prepare_arm(index: usize, field: &FieldDef) -> TokenStream2 {
    let ident = &field.ident;
    if field.collection || field.is_unmapped() {
        return quote! { #index => ::core::option::Option::None, };
    }
    quote! { #index => ::hypersonic::FieldType::prepare(&mut self.#ident), }
}

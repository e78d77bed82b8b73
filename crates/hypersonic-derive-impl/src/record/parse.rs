// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[record(...)]` and `#[data(...)]` parsing with darling.
//!
//! # Supported Attributes
//!
//! | Level | Attribute | Default | Description |
//! |-------|-----------|---------|-------------|
//! | struct | `name` | struct name | Display name |
//! | field | `alias` | none | Parameter and column name |
//! | field | `ignore_parameter` | `false` | Skip when building parameters |
//! | field | `ignore_hydration` | `false` | Skip when hydrating |
//! | field | `ignore` | `false` | Skip in both directions |

use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use syn::{DeriveInput, Generics, Ident, Type};

use crate::utils::{is_collection, type_name};

/// Struct-level input parsed by darling.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
struct RecordAttrs {
    ident: Ident,

    generics: Generics,

    data: Data<Ignored, FieldAttrs>,

    /// Display name override.
    #[darling(default)]
    name: Option<String>
}

/// Field-level `#[data(...)]` attributes.
#[derive(Debug, FromField)]
#[darling(attributes(data))]
struct FieldAttrs {
    ident: Option<Ident>,

    ty: Type,

    #[darling(default)]
    alias: Option<String>,

    #[darling(default)]
    ignore_parameter: bool,

    #[darling(default)]
    ignore_hydration: bool,

    #[darling(default)]
    ignore: bool
}

/// Parsed record definition handed to the generator.
#[derive(Debug)]
pub struct RecordDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Display name: `#[record(name)]` or the identifier.
    pub name: String,

    /// Fields in declaration order.
    pub fields: Vec<FieldDef>
}

/// One mapped field.
#[derive(Debug)]
pub struct FieldDef {
    pub ident: Ident,

    pub ty: Type,

    /// Declared type as written, for error messages.
    pub type_name: String,

    pub alias: Option<String>,

    pub ignore_parameter: bool,

    pub ignore_hydration: bool,

    /// Recognised collection; never flattened or hydrated.
    pub collection: bool
}

impl RecordDef {
    /// Parse a derive input.
    ///
    /// # Errors
    ///
    /// Rejects anything but a non-generic struct with named fields.
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = RecordAttrs::from_derive_input(input)?;
        if !attrs.generics.params.is_empty() {
            return Err(darling::Error::custom(
                "Record cannot be derived for generic structs: the field descriptor table is a single static"
            )
            .with_span(&attrs.generics));
        }
        let fields = attrs
            .data
            .take_struct()
            .ok_or_else(|| darling::Error::unsupported_shape("enum").with_span(&attrs.ident))?
            .fields
            .into_iter()
            .map(FieldDef::from_attrs)
            .collect::<darling::Result<Vec<_>>>()?;
        let name = attrs.name.unwrap_or_else(|| attrs.ident.to_string());
        Ok(Self {
            ident: attrs.ident,
            name,
            fields
        })
    }
}

impl FieldDef {
    fn from_attrs(attrs: FieldAttrs) -> darling::Result<Self> {
        let ident = attrs
            .ident
            .ok_or_else(|| darling::Error::custom("Record fields must be named").with_span(&attrs.ty))?;
        Ok(Self {
            type_name: type_name(&attrs.ty),
            collection: is_collection(&attrs.ty),
            ignore_parameter: attrs.ignore || attrs.ignore_parameter,
            ignore_hydration: attrs.ignore || attrs.ignore_hydration,
            alias: attrs.alias.filter(|alias| !alias.is_empty()),
            ident,
            ty: attrs.ty
        })
    }

    /// Check if the field is excluded from mapping in both directions.
    ///
    /// Such fields keep their descriptor slot but their type is never
    /// required to implement `FieldType`.
    pub const fn is_unmapped(&self) -> bool {
        self.ignore_parameter && self.ignore_hydration
    }
}

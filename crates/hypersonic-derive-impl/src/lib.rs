// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod data_enum;
mod record;
mod utils;

use proc_macro::TokenStream;

/// Derive the field descriptor table and mapping impls for a struct.
///
/// # Overview
///
/// The generated code lets the parameter builder flatten the struct into
/// named parameters and the hydrator populate it from a row. Field order in
/// the descriptor is declaration order.
///
/// # Generated Items
///
/// For a struct named `Person`:
///
/// - **`impl Record for Person`**: static `TypeDescriptor`, per-field read,
///   assignment and nested-instance access
/// - **`impl FieldType for Person`**: lets `Person` appear as a nested field
///   of another record, or as an `Option<Person>`
///
/// # Struct Attributes
///
/// | Attribute | Default | Description |
/// |-----------|---------|-------------|
/// | `#[record(name = "...")]` | struct name | Display name used in errors |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[data(alias = "Name")]` | Parameter and column name instead of the field name |
/// | `#[data(ignore_parameter)]` | Skip when building parameters |
/// | `#[data(ignore_hydration)]` | Skip when hydrating |
/// | `#[data(ignore)]` | Skip in both directions |
///
/// # Field Types
///
/// Every field type must implement `FieldType`, except collections
/// (`Vec<T>` other than `Vec<u8>`, `VecDeque`, `LinkedList`, sets, maps,
/// arrays and slices, optionally inside `Option`), which are recognised from
/// the type and never flattened or hydrated.
///
/// The struct must implement `Default`: the hydrator instantiates it, and
/// every nested record, before assigning columns.
///
/// # Example
///
/// ```rust,ignore
/// use hypersonic::prelude::*;
///
/// #[derive(Debug, Default, Record)]
/// pub struct Person {
///     #[data(alias = "PersonName")]
///     pub name: String,
///     pub age: Option<i32>,
///     pub address: Address,
///     #[data(ignore)]
///     pub password_hash: String,
///     pub tags: Vec<String>,
/// }
/// ```
///
/// # Errors
///
/// Compile errors for tuple structs, unit structs, enums, unions and generic
/// structs.
#[proc_macro_derive(Record, attributes(record, data))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}

/// Derive `FieldType` for a unit-only enum.
///
/// Values are parsed from their text form against the variant names,
/// ignoring case, and then as the variant discriminant. Flattening emits the
/// variant name.
///
/// # Example
///
/// ```rust,ignore
/// use hypersonic::prelude::*;
///
/// #[derive(Debug, Default, Clone, Copy, DataEnum)]
/// pub enum Status {
///     #[default]
///     Active,
///     Suspended = 5,
/// }
///
/// // "suspended", "SUSPENDED" and 5 all read as Status::Suspended
/// ```
///
/// # Errors
///
/// Compile errors for structs, unions, generic enums, enums without
/// variants and variants carrying fields.
#[proc_macro_derive(DataEnum)]
pub fn derive_data_enum(input: TokenStream) -> TokenStream {
    data_enum::derive(input)
}

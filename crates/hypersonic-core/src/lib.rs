// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core mapping engine for hypersonic.
//!
//! This crate provides the runtime used by `#[derive(Record)]` generated code.
//! It can also be used standalone with hand-written [`Record`] impls.
//!
//! # Overview
//!
//! - [`ParameterBuilder`]: Flattens an object graph into named parameters
//! - [`hydrate()`]: Populates an object graph from a single row
//! - [`NullableReader`]: Typed, null-aware accessors over a row cursor
//! - [`Database`]: Data access gateway over a [`Vendor`]
//! - [`Repository`]: `get`/`execute` facade over [`Database`]
//! - [`prelude`]: Convenient re-exports
//!
//! # Data Flow
//!
//! ```text
//! Repository::get_with::<T>(procedure, &args)
//! │
//! ├── ParameterBuilder::build(&args)   → Vec<Parameter>
//! ├── Database::populate_collection()  → NullableReader<Cursor<V>>
//! └── hydrate::<T>(&reader)            → T, one per row
//! ```
//!
//! # Usage
//!
//! Most users should use `hypersonic` directly, which re-exports this crate
//! together with the derive macros:
//!
//! ```rust,ignore
//! use hypersonic::prelude::*;
//!
//! let config = DatabaseConfig::new().with_connection_string("main", "app.db");
//! let repository = Repository::<Sqlite>::from_config(&config, "main")?;
//! let people: Vec<Person> = repository.get("GetPeople")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod coerce;
pub mod config;
pub mod database;
pub mod descriptor;
pub mod error;
pub mod hydrate;
pub mod parameters;
pub mod prelude;
pub mod query;
pub mod reader;
pub mod record;
pub mod repository;
#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub mod sqlite;
pub mod table;
pub mod transaction;
pub mod value;
pub mod vendor;

#[cfg(test)]
pub(crate) mod fixtures;

pub use coerce::{coerce, enum_variant};
pub use config::{ConfigError, ConnectionString, DatabaseConfig};
pub use database::{Cursor, Database};
pub use descriptor::{FieldDescriptor, FieldKind, Ignore, TypeDescriptor, names_match};
pub use error::{CoercionError, Error, Result};
pub use hydrate::{hydrate, populate};
pub use parameters::{Parameter, ParameterBuilder, ParameterDirection};
pub use query::{Query, QueryWithEvents};
pub use reader::{BufferedRows, DataRecord, NullableReader, RowCursor};
pub use record::{FieldRef, FieldType, Hydrate, Record};
pub use repository::Repository;
#[cfg(feature = "sqlite")]
pub use sqlite::Sqlite;
pub use table::{DataRow, DataTable};
pub use transaction::Transaction;
pub use value::Value;
pub use vendor::{Command, CommandKind, Connection, DriverError, IsolationLevel, Vendor};

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hypersonic_core::prelude::*;
//! ```

#[cfg(feature = "sqlite")]
pub use crate::Sqlite;
pub use crate::{
    CommandKind, DataRecord, DataTable, Database, DatabaseConfig, Error, FieldKind, FieldType,
    Hydrate, IsolationLevel, NullableReader, Parameter, ParameterBuilder, Query, QueryWithEvents,
    Record, Repository, Result, RowCursor, Transaction, Value, Vendor
};

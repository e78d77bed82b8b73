// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for the mapping engine and the data access gateway.
//!
//! Every error surfaces synchronously to the immediate caller. Nothing is
//! retried, logged-and-swallowed, or partially applied: a failed parameter
//! build or hydration abandons the whole call.
//!
//! # Taxonomy
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | [`Error::MissingProcedureName`] | [`Repository`](crate::Repository) | Empty command text |
//! | [`Error::InvalidParameterType`] | [`ParameterBuilder`](crate::ParameterBuilder) | Root argument is not a record |
//! | [`Error::MissingRequiredNestedParameter`] | [`ParameterBuilder`](crate::ParameterBuilder) | Nested record is absent |
//! | [`Error::MissingConnectionString`] | [`DatabaseConfig`](crate::DatabaseConfig) | Connection name not configured |
//! | [`Error::NonNullableFieldReceivedNull`] | [`hydrate`](crate::hydrate()) | Null cell for a non-nullable field |
//! | [`Error::CyclicGraphDetected`] | builder and hydrator | Self-referential type path |
//! | [`Error::Driver`] | vendor connection | Passed through unchanged |

use thiserror::Error;

use crate::{descriptor::FieldKind, vendor::DriverError};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the mapping engine and the gateway.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Command text or procedure name is empty.
    #[error("command text is expected")]
    MissingProcedureName,

    /// The root parameter argument is a string, table or other leaf value.
    ///
    /// Leaf values must be wrapped in a containing record.
    #[error(
        "the type `{type_name}` ({kind}) is not supported as a parameter root; wrap it in a record"
    )]
    InvalidParameterType {
        /// Declared type of the rejected argument.
        type_name: &'static str,
        /// Kind of the rejected argument.
        kind:      FieldKind
    },

    /// The root parameter argument is absent (`None`).
    #[error("parameters are null")]
    NullParameters,

    /// A nested record field is absent and not ignored for parameters.
    #[error(
        "field `{owner}.{field}` is null but a value is expected; mark it with \
         #[data(ignore_parameter)] to skip it"
    )]
    MissingRequiredNestedParameter {
        /// Type owning the field.
        owner: &'static str,
        /// Field name.
        field: &'static str
    },

    /// The requested (or default) connection string is not configured.
    #[error("connection string `{name}` is not configured")]
    MissingConnectionString {
        /// Requested name; empty for the default connection string.
        name: String
    },

    /// A database null was read into a field that cannot hold it.
    #[error("can't assign a null value to field `{field}` of type `{type_name}`")]
    NonNullableFieldReceivedNull {
        /// Field name.
        field:     &'static str,
        /// Declared field type.
        type_name: &'static str
    },

    /// A record type contains itself along a single nesting path.
    #[error("type `{type_name}` contains itself through field `{field}`")]
    CyclicGraphDetected {
        /// Type that appears twice on the path.
        type_name: &'static str,
        /// Field through which the cycle was entered.
        field:     &'static str
    },

    /// A cell value could not be converted to the declared field type.
    #[error("field `{field}`: {source}")]
    Coercion {
        /// Field or column name.
        field:  String,
        /// Underlying conversion failure.
        #[source]
        source: CoercionError
    },

    /// A column name is not present in the current result set.
    #[error("column `{name}` does not exist in the result set")]
    UnknownColumn {
        /// Requested column name.
        name: String
    },

    /// A column ordinal is outside the current result set.
    #[error("column ordinal {ordinal} is out of range (field count {field_count})")]
    OrdinalOutOfRange {
        /// Requested ordinal.
        ordinal:     usize,
        /// Number of columns in the result set.
        field_count: usize
    },

    /// A non-nullable accessor was used on a null cell.
    #[error("column `{column}` is null")]
    NullValue {
        /// Column name.
        column: String
    },

    /// The cursor is not positioned on a row.
    #[error("no current row; call read() first")]
    NoCurrentRow,

    /// A table row does not match the number of table columns.
    #[error("row has {found} values but the table has {expected} columns")]
    RowWidthMismatch {
        /// Number of table columns.
        expected: usize,
        /// Number of values supplied.
        found:    usize
    },

    /// The transaction has already been committed or rolled back.
    #[error("transaction has already completed")]
    TransactionCompleted,

    /// Error raised by the database driver.
    #[error(transparent)]
    Driver(DriverError)
}

impl Error {
    /// Check if this error was raised by the database driver.
    #[must_use]
    pub const fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }

    /// Get the driver error if this is one.
    #[must_use]
    pub fn driver(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Driver(e) => Some(e.as_ref()),
            _ => None
        }
    }
}

/// Value conversion failures.
///
/// Returned by [`coerce`](crate::coerce()) and by
/// [`FieldType::from_value`](crate::FieldType::from_value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoercionError {
    /// Null has no representation in the target kind.
    #[error("cannot convert null to {to}")]
    Null {
        /// Target kind.
        to: FieldKind
    },

    /// No conversion rule exists between the two kinds.
    #[error("cannot convert {from} to {to}")]
    Unsupported {
        /// Source value kind.
        from: &'static str,
        /// Target kind.
        to:   FieldKind
    },

    /// The value does not fit the target kind.
    #[error("value {value} is out of range for {to}")]
    OutOfRange {
        /// Source value, formatted.
        value: String,
        /// Target kind.
        to:    FieldKind
    },

    /// Text could not be parsed as the target kind.
    #[error("cannot parse {value:?} as {to}")]
    Parse {
        /// Source text.
        value: String,
        /// Target kind.
        to:    FieldKind
    },

    /// Text does not name a member of the enumeration.
    #[error("{value:?} is not a member of {enumeration}")]
    UnknownVariant {
        /// Source text.
        value:       String,
        /// Enumeration type name.
        enumeration: &'static str
    },

    /// A field index outside the record's descriptor table.
    #[error("field index {0} is out of bounds")]
    UnknownField(usize)
}

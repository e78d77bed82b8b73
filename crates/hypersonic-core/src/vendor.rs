// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Database vendor abstraction.
//!
//! A vendor supplies the connection type and the parameter-name delimiter.
//! [`Database`](crate::Database) is generic over [`Vendor`], so each
//! database back-end is one instantiation of the same gateway.
//!
//! # Implementing a vendor
//!
//! ```rust,ignore
//! struct Memory;
//!
//! impl Vendor for Memory {
//!     const PARAMETER_DELIMITER: &'static str = ":";
//!     type Connection = MemoryConnection;
//!
//!     fn open(connection_string: &str) -> Result<MemoryConnection, DriverError> {
//!         MemoryConnection::open(connection_string)
//!     }
//! }
//! ```

use serde::Deserialize;

use crate::{parameters::Parameter, reader::RowCursor};

/// Error raised by a database driver, passed through unchanged.
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// How command text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Text names a stored procedure.
    #[default]
    StoredProcedure,

    /// Text is an inline statement.
    Text
}

/// Transaction isolation level.
///
/// Vendors map each level to the closest level they support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    /// Vendor default.
    #[default]
    Unspecified,

    /// Dirty reads allowed.
    ReadUncommitted,

    /// Only committed data is read.
    ReadCommitted,

    /// Rows read stay stable for the transaction.
    RepeatableRead,

    /// Full serializability.
    Serializable,

    /// Snapshot isolation.
    Snapshot
}

/// One command ready for execution.
#[derive(Debug, Clone, Copy)]
pub struct Command<'a> {
    /// Procedure name or statement text.
    pub text:       &'a str,
    /// How `text` is interpreted.
    pub kind:       CommandKind,
    /// Parameters in the order produced by the builder.
    pub parameters: &'a [Parameter]
}

impl<'a> Command<'a> {
    /// Create a command.
    #[must_use]
    pub const fn new(text: &'a str, kind: CommandKind, parameters: &'a [Parameter]) -> Self {
        Self {
            text,
            kind,
            parameters
        }
    }
}

/// A database back-end.
pub trait Vendor {
    /// Prefix prepended to every parameter name, e.g. `@`.
    const PARAMETER_DELIMITER: &'static str;

    /// Open connection type.
    type Connection: Connection;

    /// Open a connection.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the connection cannot be opened.
    fn open(connection_string: &str) -> Result<Self::Connection, DriverError>;
}

/// An open connection.
///
/// A connection runs at most one transaction at a time. Result sets are
/// returned as owned cursors so the connection can be released while rows
/// are still being consumed.
pub trait Connection: Sized {
    /// Cursor type returned by [`Connection::query`].
    type Rows: RowCursor;

    /// Execute a command and return the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns the driver error.
    fn execute(&mut self, command: &Command<'_>) -> Result<usize, DriverError>;

    /// Execute a command and return its result set.
    ///
    /// # Errors
    ///
    /// Returns the driver error.
    fn query(&mut self, command: &Command<'_>) -> Result<Self::Rows, DriverError>;

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns the driver error.
    fn begin(&mut self, isolation: IsolationLevel) -> Result<(), DriverError>;

    /// Commit the current transaction.
    ///
    /// # Errors
    ///
    /// Returns the driver error.
    fn commit(&mut self) -> Result<(), DriverError>;

    /// Roll back the current transaction.
    ///
    /// # Errors
    ///
    /// Returns the driver error.
    fn rollback(&mut self) -> Result<(), DriverError>;

    /// Close the connection.
    ///
    /// # Errors
    ///
    /// Returns the driver error; the connection is gone either way.
    fn close(self) -> Result<(), DriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_procedure_is_default() {
        assert_eq!(CommandKind::default(), CommandKind::StoredProcedure);
        assert_eq!(IsolationLevel::default(), IsolationLevel::Unspecified);
    }

    #[test]
    fn command_new() {
        let command = Command::new("GetPeople", CommandKind::Text, &[]);
        assert_eq!(command.text, "GetPeople");
        assert!(command.parameters.is_empty());
    }
}

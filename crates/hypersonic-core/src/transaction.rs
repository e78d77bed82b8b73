// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transaction handle.
//!
//! A [`Transaction`] owns the connection it was started on. Both outcomes
//! release that connection:
//!
//! ```text
//! Database::begin_transaction()
//! │
//! ├── commit()    COMMIT   → close
//! ├── rollback()  ROLLBACK → close
//! └── drop        ROLLBACK → close (warning logged)
//! ```
//!
//! The close runs whether or not the commit or rollback succeeded. When both
//! fail, the commit/rollback error is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut tx = database.begin_transaction(Some(IsolationLevel::Serializable))?;
//! database.non_query("Debit", &debit, Some(&mut tx))?;
//! database.non_query("Credit", &credit, Some(&mut tx))?;
//! tx.commit()?;
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    vendor::{Connection, IsolationLevel, Vendor}
};

/// How a transaction ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Commit,
    Rollback
}

/// An active transaction bound to its own connection.
///
/// Pass `Some(&mut tx)` to any [`Database`](crate::Database) execution
/// method to run it inside the transaction.
pub struct Transaction<V: Vendor> {
    connection: Option<V::Connection>,
    isolation:  IsolationLevel
}

impl<V: Vendor> Transaction<V> {
    /// Begin a transaction on an open connection.
    ///
    /// On failure the connection is closed before the error is returned.
    pub(crate) fn begin(mut connection: V::Connection, isolation: IsolationLevel) -> Result<Self> {
        if let Err(error) = connection.begin(isolation) {
            if let Err(close) = connection.close() {
                warn!(error = %close, "failed to close connection after begin failure");
            }
            return Err(Error::Driver(error));
        }
        debug!(?isolation, "transaction started");
        Ok(Self {
            connection: Some(connection),
            isolation
        })
    }

    /// Isolation level requested at begin.
    #[must_use]
    pub const fn isolation_level(&self) -> IsolationLevel {
        self.isolation
    }

    /// Connection the transaction runs on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransactionCompleted`] once the transaction ended.
    pub fn connection_mut(&mut self) -> Result<&mut V::Connection> {
        self.connection.as_mut().ok_or(Error::TransactionCompleted)
    }

    /// Commit and close the connection.
    ///
    /// # Errors
    ///
    /// Returns the commit error, or the close error if only closing failed.
    pub fn commit(mut self) -> Result<()> {
        self.finish(Outcome::Commit)
    }

    /// Roll back and close the connection.
    ///
    /// # Errors
    ///
    /// Returns the rollback error, or the close error if only closing failed.
    pub fn rollback(mut self) -> Result<()> {
        self.finish(Outcome::Rollback)
    }

    fn finish(&mut self, outcome: Outcome) -> Result<()> {
        let mut connection = self.connection.take().ok_or(Error::TransactionCompleted)?;
        let result = match outcome {
            Outcome::Commit => connection.commit(),
            Outcome::Rollback => connection.rollback()
        };
        let closed = connection.close();
        debug!(
            ?outcome,
            succeeded = result.is_ok(),
            "transaction finished, connection closed"
        );
        result.map_err(Error::Driver)?;
        closed.map_err(Error::Driver)
    }
}

impl<V: Vendor> Drop for Transaction<V> {
    fn drop(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };
        warn!("transaction dropped without commit or rollback, rolling back");
        if let Err(error) = connection.rollback() {
            warn!(error = %error, "rollback on drop failed");
        }
        if let Err(error) = connection.close() {
            warn!(error = %error, "closing connection on drop failed");
        }
    }
}

impl<V: Vendor> fmt::Debug for Transaction<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("isolation", &self.isolation)
            .field("active", &self.connection.is_some())
            .finish()
    }
}

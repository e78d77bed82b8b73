// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Data access gateway.
//!
//! [`Database`] opens a connection per call (or reuses a transaction's
//! connection), builds a [`Command`] and executes it. One generic gateway
//! serves every back-end; the [`Vendor`] type parameter picks the driver.
//!
//! # Operations
//!
//! | Method | Returns | Connection |
//! |--------|---------|------------|
//! | [`scalar`](Database::scalar) | first column of first row | closed before return |
//! | [`non_query`](Database::non_query) | rows affected | closed before return |
//! | [`reader`](Database::reader) | [`Cursor`] | owned by the cursor, caller closes |
//! | [`nullable_reader`](Database::nullable_reader) | [`NullableReader`] over [`Cursor`] | owned by the cursor, caller closes |
//! | [`populate_collection`](Database::populate_collection) | `Vec<T>` | closed before return |
//! | [`populate_item`](Database::populate_item) | `Option<T>` | closed before return |
//! | [`auto_populate`](Database::auto_populate) | hydrated `Vec<T>` | closed before return |
//! | [`table`](Database::table) | [`DataTable`] | closed before return |
//! | [`begin_transaction`](Database::begin_transaction) | [`Transaction`] | closed by commit/rollback |
//!
//! Every execution method takes `Option<&mut Transaction<V>>`; with
//! `Some`, the command runs on the transaction's connection and nothing is
//! opened or closed.

use std::{fmt, marker::PhantomData};

use tracing::{debug, trace, warn};

use crate::{
    config::DatabaseConfig,
    error::{Error, Result},
    hydrate::hydrate,
    parameters::{Parameter, ParameterBuilder},
    reader::{DataRecord, NullableReader, RowCursor},
    record::{FieldType, Hydrate},
    table::DataTable,
    transaction::Transaction,
    value::Value,
    vendor::{Command, CommandKind, Connection, DriverError, IsolationLevel, Vendor}
};

/// Result rows of [`Connection::query`] for vendor `V`.
type Rows<V> = <<V as Vendor>::Connection as Connection>::Rows;

/// Gateway to one configured database.
///
/// Cheap to clone; holds no open connection.
///
/// # Example
///
/// ```rust,ignore
/// let config = DatabaseConfig::new().with_connection_string("main", "app.db");
/// let database = Database::<Sqlite>::new(&config, "main")?;
/// let count: i64 = database.scalar("CountPeople", &[], None)?;
/// ```
pub struct Database<V: Vendor> {
    connection_name:   String,
    connection_string: String,
    command_kind:      CommandKind,
    builder:           ParameterBuilder,
    vendor:            PhantomData<fn() -> V>
}

impl<V: Vendor> Database<V> {
    /// Create a gateway for the named connection string.
    ///
    /// An empty name selects the first configured connection string. The
    /// command kind defaults to the configuration's.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConnectionString`] if the name is not
    /// configured.
    pub fn new(config: &DatabaseConfig, name: &str) -> Result<Self> {
        let entry = config.connection_string(name)?;
        Ok(Self {
            connection_name:   entry.name.clone(),
            connection_string: entry.connection_string.clone(),
            command_kind:      config.command_kind(),
            builder:           ParameterBuilder::for_vendor::<V>(),
            vendor:            PhantomData
        })
    }

    /// Override how command text is interpreted.
    #[must_use]
    pub fn with_command_kind(mut self, kind: CommandKind) -> Self {
        self.command_kind = kind;
        self
    }

    /// Name of the selected connection string.
    #[must_use]
    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    /// Selected connection string.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// How command text is interpreted.
    #[must_use]
    pub const fn command_kind(&self) -> CommandKind {
        self.command_kind
    }

    /// Parameter builder using the vendor's delimiter.
    #[must_use]
    pub const fn builder(&self) -> &ParameterBuilder {
        &self.builder
    }

    /// Flatten `args` into parameters with the vendor's delimiter.
    ///
    /// # Errors
    ///
    /// See [`ParameterBuilder::build`].
    pub fn parameters<P: FieldType>(&self, args: &P) -> Result<Vec<Parameter>> {
        self.builder.build(args)
    }

    /// Open a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] if the driver cannot connect.
    pub fn open(&self) -> Result<V::Connection> {
        debug!(connection = %self.connection_name, "opening connection");
        V::open(&self.connection_string).map_err(Error::Driver)
    }

    /// Open a connection and begin a transaction on it.
    ///
    /// `None` uses the vendor's default isolation level. If beginning fails,
    /// the connection is closed before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] if connecting or beginning fails.
    pub fn begin_transaction(&self, isolation: Option<IsolationLevel>) -> Result<Transaction<V>> {
        let connection = self.open()?;
        Transaction::begin(connection, isolation.unwrap_or_default())
    }

    /// Execute and return the first column of the first row.
    ///
    /// An empty result or a null cell yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] on execution failure and [`Error::Coercion`]
    /// if the cell cannot be converted to `T`.
    pub fn scalar<T>(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>
    ) -> Result<T>
    where
        T: FieldType + Default
    {
        let command = self.command(text, parameters);
        let mut rows = self.with_connection(tx, |connection| connection.query(&command))?;
        if !rows.read().map_err(Error::Driver)? {
            return Ok(T::default());
        }
        match rows.value_at(0) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::from_value(value.clone()).map_err(|source| Error::Coercion {
                field: rows.name(0).unwrap_or_default().to_owned(),
                source
            })
        }
    }

    /// Execute and return the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] on execution failure.
    pub fn non_query(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>
    ) -> Result<usize> {
        let command = self.command(text, parameters);
        self.with_connection(tx, |connection| connection.execute(&command))
    }

    /// Execute and return a forward-only cursor.
    ///
    /// Outside a transaction the cursor owns its connection; release it with
    /// [`Cursor::close`]. Dropping the cursor also closes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] on execution failure.
    pub fn reader(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>
    ) -> Result<Cursor<V>> {
        let command = self.command(text, parameters);
        if let Some(tx) = tx {
            let rows = tx
                .connection_mut()?
                .query(&command)
                .map_err(Error::Driver)?;
            return Ok(Cursor {
                rows,
                connection: None
            });
        }

        let mut connection = self.open()?;
        match connection.query(&command) {
            Ok(rows) => Ok(Cursor {
                rows,
                connection: Some(connection)
            }),
            Err(error) => {
                if let Err(close) = connection.close() {
                    warn!(error = %close, "failed to close connection after query failure");
                }
                Err(Error::Driver(error))
            }
        }
    }

    /// Execute and return a null-aware reader over the cursor.
    ///
    /// # Errors
    ///
    /// See [`Database::reader`].
    pub fn nullable_reader(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>
    ) -> Result<NullableReader<Cursor<V>>> {
        self.reader(text, parameters, tx).map(NullableReader::new)
    }

    /// Execute and map every row.
    ///
    /// The cursor is closed on every path; the first error wins.
    ///
    /// # Errors
    ///
    /// Returns the execution, mapping or close error.
    pub fn populate_collection<T, F>(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>,
        mut map: F
    ) -> Result<Vec<T>>
    where
        F: FnMut(&NullableReader<Cursor<V>>) -> Result<T>
    {
        let mut items = Vec::new();
        let reader = self.nullable_reader(text, parameters, tx)?;
        consume(reader, &mut map, |item| items.push(item))?;
        trace!(command = text, rows = items.len(), "collection populated");
        Ok(items)
    }

    /// Execute and map rows, keeping the last one.
    ///
    /// Returns `None` when the result is empty.
    ///
    /// # Errors
    ///
    /// Returns the execution, mapping or close error.
    pub fn populate_item<T, F>(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>,
        mut map: F
    ) -> Result<Option<T>>
    where
        F: FnMut(&NullableReader<Cursor<V>>) -> Result<T>
    {
        let mut last = None;
        let reader = self.nullable_reader(text, parameters, tx)?;
        consume(reader, &mut map, |item| last = Some(item))?;
        Ok(last)
    }

    /// Execute and hydrate one `T` per row.
    ///
    /// # Errors
    ///
    /// Returns the execution, hydration or close error.
    pub fn auto_populate<T: Hydrate>(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>
    ) -> Result<Vec<T>> {
        self.populate_collection(text, parameters, tx, |row| hydrate(row))
    }

    /// Execute and materialize the result set.
    ///
    /// # Errors
    ///
    /// Returns the execution or close error.
    pub fn table(
        &self,
        text: &str,
        parameters: &[Parameter],
        tx: Option<&mut Transaction<V>>
    ) -> Result<DataTable> {
        let reader = self.nullable_reader(text, parameters, tx)?;
        let width = reader.field_count();
        let mut table = DataTable::new((0..width).map(|i| reader.name(i).unwrap_or_default().to_owned()));
        let mut rows = Vec::new();
        let mut copy_row = |row: &NullableReader<Cursor<V>>| -> Result<Vec<Value>> {
            Ok((0..width)
                .map(|i| row.value_at(i).cloned().unwrap_or_default())
                .collect())
        };
        consume(reader, &mut copy_row, |row| rows.push(row))?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    fn command<'a>(&self, text: &'a str, parameters: &'a [Parameter]) -> Command<'a> {
        debug!(
            command = text,
            kind = ?self.command_kind,
            parameters = parameters.len(),
            "executing"
        );
        Command::new(text, self.command_kind, parameters)
    }

    /// Run `operation` on the transaction's connection, or on a fresh one
    /// that is closed afterwards.
    fn with_connection<T>(
        &self,
        tx: Option<&mut Transaction<V>>,
        operation: impl FnOnce(&mut V::Connection) -> std::result::Result<T, DriverError>
    ) -> Result<T> {
        if let Some(tx) = tx {
            return operation(tx.connection_mut()?).map_err(Error::Driver);
        }
        let mut connection = self.open()?;
        let result = operation(&mut connection);
        let closed = connection.close();
        let value = result.map_err(Error::Driver)?;
        closed.map_err(Error::Driver)?;
        Ok(value)
    }
}

/// Read every row, closing the reader whatever happens.
fn consume<V, T, F>(
    mut reader: NullableReader<Cursor<V>>,
    map: &mut F,
    mut sink: impl FnMut(T)
) -> Result<()>
where
    V: Vendor,
    F: FnMut(&NullableReader<Cursor<V>>) -> Result<T>
{
    let outcome = loop {
        match reader.read() {
            Ok(true) => match map(&reader) {
                Ok(item) => sink(item),
                Err(error) => break Err(error)
            },
            Ok(false) => break Ok(()),
            Err(error) => break Err(error)
        }
    };
    let closed = reader.close();
    outcome?;
    closed
}

impl<V: Vendor> Clone for Database<V> {
    fn clone(&self) -> Self {
        Self {
            connection_name:   self.connection_name.clone(),
            connection_string: self.connection_string.clone(),
            command_kind:      self.command_kind,
            builder:           self.builder,
            vendor:            PhantomData
        }
    }
}

impl<V: Vendor> fmt::Debug for Database<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("connection_name", &self.connection_name)
            .field("command_kind", &self.command_kind)
            .field("delimiter", &self.builder.delimiter())
            .finish_non_exhaustive()
    }
}

/// Forward-only cursor returned by [`Database::reader`].
///
/// Outside a transaction it owns the connection the command ran on.
/// [`Cursor::close`] releases it and reports close failures; dropping an
/// open cursor closes it quietly.
pub struct Cursor<V: Vendor> {
    rows:       Rows<V>,
    connection: Option<V::Connection>
}

impl<V: Vendor> Cursor<V> {
    /// Check if the cursor still holds its own connection.
    #[must_use]
    pub const fn owns_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// Release the connection.
    ///
    /// Cursors running inside a transaction leave the connection to the
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] if closing fails.
    pub fn close(mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.close().map_err(Error::Driver),
            None => Ok(())
        }
    }
}

impl<V: Vendor> NullableReader<Cursor<V>> {
    /// Close the underlying cursor.
    ///
    /// # Errors
    ///
    /// See [`Cursor::close`].
    pub fn close(self) -> Result<()> {
        self.into_inner().close()
    }
}

impl<V: Vendor> Drop for Cursor<V> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            trace!("closing reader connection on drop");
            if let Err(error) = connection.close() {
                warn!(error = %error, "closing reader connection failed");
            }
        }
    }
}

impl<V: Vendor> DataRecord for Cursor<V> {
    fn field_count(&self) -> usize {
        self.rows.field_count()
    }

    fn name(&self, ordinal: usize) -> Option<&str> {
        self.rows.name(ordinal)
    }

    fn value_at(&self, ordinal: usize) -> Option<&Value> {
        self.rows.value_at(ordinal)
    }

    fn ordinal(&self, name: &str) -> Option<usize> {
        self.rows.ordinal(name)
    }
}

impl<V: Vendor> RowCursor for Cursor<V> {
    fn read(&mut self) -> std::result::Result<bool, DriverError> {
        self.rows.read()
    }
}

impl<V: Vendor> fmt::Debug for Cursor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("field_count", &self.rows.field_count())
            .field("owns_connection", &self.connection.is_some())
            .finish()
    }
}

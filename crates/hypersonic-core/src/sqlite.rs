// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQLite vendor over `rusqlite`.
//!
//! # Commands
//!
//! | [`CommandKind`] | Executed SQL |
//! |-----------------|--------------|
//! | `Text` | the command text |
//! | `StoredProcedure` | the body registered under that name in [`PROCEDURE_TABLE`] |
//!
//! SQLite has no stored procedures, so procedures are single statements kept
//! in a catalog table. [`install_procedures`] creates the table and
//! registers bodies; names are matched case-insensitively.
//!
//! # Parameters
//!
//! Parameters bind by name (`@Name`, `:Name` or `$Name` in the statement),
//! exactly first and then ignoring case and the slot marker, so `@Name`
//! also fills `:name`. Parameters with no named slot fill
//! the statement's positional `?` slots in order. Any remaining parameters
//! are left unbound and logged.
//!
//! | [`Value`] | SQLite storage |
//! |-----------|----------------|
//! | bool, integers | INTEGER |
//! | float, double | REAL |
//! | char, string, decimal, date/time, guid | TEXT |
//! | bytes | BLOB |
//! | table | not supported |
//!
//! # Example
//!
//! ```rust,ignore
//! let database = Database::<Sqlite>::new(&config, "main")?;
//! let connection = database.open()?;
//! install_procedures(connection.inner(), [
//!     ("GetPeople", "SELECT Name, Age FROM people WHERE Age >= @Age"),
//! ])?;
//! connection.close()?;
//! ```

use std::borrow::Cow;

use rusqlite::{
    OptionalExtension, Statement,
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef}
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    descriptor::names_match,
    parameters::Parameter,
    reader::BufferedRows,
    value::{DATE_TIME_FORMAT, Value},
    vendor::{Command, CommandKind, Connection, DriverError, IsolationLevel, Vendor}
};

pub use rusqlite;

/// Catalog table holding procedure bodies.
pub const PROCEDURE_TABLE: &str = "hypersonic_procedures";

const CREATE_PROCEDURE_TABLE: &str = "CREATE TABLE IF NOT EXISTS hypersonic_procedures (
    name TEXT PRIMARY KEY COLLATE NOCASE,
    body TEXT NOT NULL
)";

/// SQLite-specific failures. Driver errors are passed through as
/// [`rusqlite::Error`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteError {
    /// No procedure with this name is registered.
    #[error("procedure `{name}` is not registered in {PROCEDURE_TABLE}")]
    UnknownProcedure {
        /// Requested procedure name.
        name: String
    }
}

/// The SQLite back-end. Connection strings are database paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Vendor for Sqlite {
    const PARAMETER_DELIMITER: &'static str = "@";
    type Connection = SqliteConnection;

    fn open(connection_string: &str) -> Result<SqliteConnection, DriverError> {
        let inner = rusqlite::Connection::open(connection_string)?;
        Ok(SqliteConnection {
            inner
        })
    }
}

/// An open SQLite connection.
#[derive(Debug)]
pub struct SqliteConnection {
    inner: rusqlite::Connection
}

impl SqliteConnection {
    /// Borrow the `rusqlite` connection.
    #[must_use]
    pub const fn inner(&self) -> &rusqlite::Connection {
        &self.inner
    }

    /// Look up the SQL to run for a command.
    fn resolve<'c>(&self, command: &Command<'c>) -> Result<Cow<'c, str>, DriverError> {
        match command.kind {
            CommandKind::Text => Ok(Cow::Borrowed(command.text)),
            CommandKind::StoredProcedure => {
                let body: Option<String> = self
                    .inner
                    .query_row(
                        "SELECT body FROM hypersonic_procedures WHERE name = ?1",
                        [command.text],
                        |row| row.get(0)
                    )
                    .optional()?;
                body.map(Cow::Owned).ok_or_else(|| {
                    SqliteError::UnknownProcedure {
                        name: command.text.to_owned()
                    }
                    .into()
                })
            }
        }
    }

    fn prepare(&self, command: &Command<'_>) -> Result<Statement<'_>, DriverError> {
        let sql = self.resolve(command)?;
        let mut statement = self.inner.prepare(&sql)?;
        bind(&mut statement, command.parameters)?;
        Ok(statement)
    }
}

impl Connection for SqliteConnection {
    type Rows = BufferedRows;

    fn execute(&mut self, command: &Command<'_>) -> Result<usize, DriverError> {
        let mut statement = self.prepare(command)?;
        Ok(statement.raw_execute()?)
    }

    fn query(&mut self, command: &Command<'_>) -> Result<BufferedRows, DriverError> {
        let mut statement = self.prepare(command)?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let width = columns.len();

        let mut fetched = Vec::new();
        let mut rows = statement.raw_query();
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|i| row.get_ref(i).map(from_sql))
                .collect::<Result<Vec<_>, _>>()?;
            fetched.push(values);
        }
        trace!(rows = fetched.len(), "result set buffered");
        Ok(BufferedRows::new(columns, fetched))
    }

    fn begin(&mut self, isolation: IsolationLevel) -> Result<(), DriverError> {
        let sql = match isolation {
            IsolationLevel::Unspecified
            | IsolationLevel::ReadUncommitted
            | IsolationLevel::ReadCommitted => "BEGIN DEFERRED",
            IsolationLevel::RepeatableRead => "BEGIN IMMEDIATE",
            IsolationLevel::Serializable | IsolationLevel::Snapshot => "BEGIN EXCLUSIVE"
        };
        debug!(sql, "sqlite begin");
        Ok(self.inner.execute_batch(sql)?)
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        Ok(self.inner.execute_batch("COMMIT")?)
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        Ok(self.inner.execute_batch("ROLLBACK")?)
    }

    fn close(self) -> Result<(), DriverError> {
        self.inner.close().map_err(|(_, error)| error.into())
    }
}

/// Create the procedure catalog if needed and register procedure bodies.
///
/// Registering an existing name replaces its body.
///
/// # Errors
///
/// Returns the `rusqlite` error if the catalog cannot be written.
pub fn install_procedures<'a, I>(connection: &rusqlite::Connection, procedures: I) -> rusqlite::Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>
{
    connection.execute_batch(CREATE_PROCEDURE_TABLE)?;
    let mut insert = connection
        .prepare("INSERT OR REPLACE INTO hypersonic_procedures (name, body) VALUES (?1, ?2)")?;
    for (name, body) in procedures {
        insert.execute((name, body))?;
        debug!(procedure = name, "procedure installed");
    }
    Ok(())
}

fn bind(statement: &mut Statement<'_>, parameters: &[Parameter]) -> rusqlite::Result<()> {
    let count = statement.parameter_count();
    let positional: Vec<usize> = (1..=count)
        .filter(|&i| statement.parameter_name(i).is_none_or(|name| name.starts_with('?')))
        .collect();
    let mut next_positional = positional.into_iter();

    for parameter in parameters {
        let index = match statement.parameter_index(parameter.name())? {
            Some(index) => Some(index),
            None => (1..=count)
                .find(|&i| {
                    statement
                        .parameter_name(i)
                        .is_some_and(|name| names_match(bare(name), bare(parameter.name())))
                })
                .or_else(|| next_positional.next())
        };
        match index {
            Some(index) => statement.raw_bind_parameter(index, SqlParam(parameter.value()))?,
            None => trace!(parameter = parameter.name(), "no slot for parameter, left unbound")
        }
    }
    Ok(())
}

/// Strip the `@`, `:` or `$` marker from a slot or parameter name.
fn bare(name: &str) -> &str {
    name.strip_prefix(['@', ':', '$']).unwrap_or(name)
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Int64(n),
        ValueRef::Real(f) => Value::Double(f),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec())
    }
}

/// Binds a [`Value`] with the storage class from the module table.
struct SqlParam<'v>(&'v Value);

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let owned = match self.0 {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            Value::Byte(n) => SqlValue::Integer(i64::from(*n)),
            Value::Int16(n) => SqlValue::Integer(i64::from(*n)),
            Value::Int32(n) => SqlValue::Integer(i64::from(*n)),
            Value::Int64(n) => SqlValue::Integer(*n),
            Value::Float(f) => SqlValue::Real(f64::from(*f)),
            Value::Double(f) => SqlValue::Real(*f),
            Value::Char(c) => SqlValue::Text(c.to_string()),
            Value::Decimal(d) => SqlValue::Text(d.to_string()),
            Value::DateTime(dt) => SqlValue::Text(dt.format(DATE_TIME_FORMAT).to_string()),
            Value::Guid(g) => SqlValue::Text(g.hyphenated().to_string()),
            Value::String(s) => return Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
            Value::Bytes(b) => return Ok(ToSqlOutput::Borrowed(ValueRef::Blob(b))),
            Value::Table(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    "table-valued parameters are not supported by SQLite".into()
                ));
            }
        };
        Ok(ToSqlOutput::Owned(owned))
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory tabular data.
//!
//! [`DataTable`] holds named columns and rows of [`Value`]s. It plays two
//! roles:
//!
//! - As a parameter it is a leaf: a whole table travels as one value
//!   (table-valued parameter), never flattened.
//! - As a result it is a materialized result set: [`Database::table`]
//!   fills one, and each [`DataRow`] can be read through a
//!   [`NullableReader`] or hydrated directly.
//!
//! [`Database::table`]: crate::Database::table
//! [`NullableReader`]: crate::NullableReader

use crate::{
    error::{Error, Result},
    reader::{BufferedRows, DataRecord},
    value::Value
};

/// Named columns plus rows of values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<String>,
    rows:    Vec<Vec<Value>>
}

impl DataTable {
    /// Create an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows:    Vec::new()
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowWidthMismatch`] if the row does not have one value
    /// per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowWidthMismatch {
                expected: self.columns.len(),
                found:    row.len()
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<DataRow<'_>> {
        self.rows.get(index).map(|values| DataRow {
            columns: &self.columns,
            values
        })
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = DataRow<'_>> {
        self.rows.iter().map(|values| DataRow {
            columns: &self.columns,
            values
        })
    }

    /// Turn the table into a forward-only cursor.
    #[must_use]
    pub fn into_cursor(self) -> BufferedRows {
        BufferedRows::new(self.columns, self.rows)
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct DataRow<'t> {
    columns: &'t [String],
    values:  &'t [Value]
}

impl DataRow<'_> {
    /// Values in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        self.values
    }
}

impl DataRecord for DataRow<'_> {
    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn name(&self, ordinal: usize) -> Option<&str> {
        self.columns.get(ordinal).map(String::as_str)
    }

    fn value_at(&self, ordinal: usize) -> Option<&Value> {
        self.values.get(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RowCursor;

    fn people() -> DataTable {
        let mut table = DataTable::new(["Name", "Age"]);
        table
            .push_row(vec![Value::from("Ann"), Value::Int32(41)])
            .unwrap();
        table
            .push_row(vec![Value::from("Bob"), Value::Null])
            .unwrap();
        table
    }

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut table = DataTable::new(["Name"]);
        let err = table.push_row(vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::RowWidthMismatch {
                expected: 1,
                found:    0
            }
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn rows_expose_columns() {
        let table = people();
        let row = table.row(1).unwrap();
        assert_eq!(row.field_count(), 2);
        assert_eq!(row.ordinal("age"), Some(1));
        assert!(row.value_at(1).unwrap().is_null());
        assert_eq!(table.rows().count(), 2);
    }

    #[test]
    fn into_cursor_reads_forward() {
        let mut cursor = people().into_cursor();
        assert!(cursor.read().unwrap());
        assert_eq!(cursor.value_at(0), Some(&Value::from("Ann")));
        assert!(cursor.read().unwrap());
        assert!(!cursor.read().unwrap());
        assert_eq!(cursor.value_at(0), None);
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row access: record and cursor traits plus the null-aware typed reader.
//!
//! # Architecture
//!
//! ```text
//! DataRecord            one positioned row: names + values
//!   └── RowCursor       forward-only: read() advances
//!
//! BufferedRows          owned RowCursor over column names + rows
//! NullableReader<R>     typed accessors over any DataRecord
//! ```
//!
//! Vendor connections return their result sets as [`RowCursor`]s, so the
//! hydrator and [`NullableReader`] never depend on a driver.
//!
//! # Null handling
//!
//! Every typed accessor comes in two flavors:
//!
//! | Accessor | Null cell | Non-null cell |
//! |----------|-----------|---------------|
//! | `get_int32("Age")` | `Err(Error::NullValue)` | `Ok(value)` |
//! | `get_nullable_int32("Age")` | `Ok(None)` | `Ok(Some(value))` |
//!
//! Nullable accessors test for null before converting, so a null cell never
//! reaches a conversion routine.

use std::vec;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    descriptor::names_match,
    error::{Error, Result},
    record::FieldType,
    value::Value,
    vendor::DriverError
};

/// One positioned row of a result set.
pub trait DataRecord {
    /// Number of columns.
    fn field_count(&self) -> usize;

    /// Column name at `ordinal`.
    fn name(&self, ordinal: usize) -> Option<&str>;

    /// Cell at `ordinal` in the current row.
    ///
    /// Returns `None` when the ordinal is out of range or there is no
    /// current row.
    fn value_at(&self, ordinal: usize) -> Option<&Value>;

    /// Ordinal of a column: exact match first, then case-insensitive.
    fn ordinal(&self, name: &str) -> Option<usize> {
        let count = self.field_count();
        (0..count)
            .find(|&i| self.name(i) == Some(name))
            .or_else(|| (0..count).find(|&i| self.name(i).is_some_and(|n| names_match(n, name))))
    }
}

/// Forward-only row cursor.
pub trait RowCursor: DataRecord {
    /// Advance to the next row.
    ///
    /// Returns `false` once the rows are exhausted; the cursor then has no
    /// current row.
    ///
    /// # Errors
    ///
    /// Returns the driver error if fetching the next row fails.
    fn read(&mut self) -> std::result::Result<bool, DriverError>;
}

/// Owned cursor over fully fetched rows.
#[derive(Debug, Default)]
pub struct BufferedRows {
    columns: Vec<String>,
    rows:    vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>
}

impl BufferedRows {
    /// Create a cursor positioned before the first row.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter(),
            current: None
        }
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl DataRecord for BufferedRows {
    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn name(&self, ordinal: usize) -> Option<&str> {
        self.columns.get(ordinal).map(String::as_str)
    }

    fn value_at(&self, ordinal: usize) -> Option<&Value> {
        self.current.as_ref().and_then(|row| row.get(ordinal))
    }
}

impl RowCursor for BufferedRows {
    fn read(&mut self) -> std::result::Result<bool, DriverError> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }
}

/// Typed, null-aware accessors over a row cursor.
///
/// Lookups by name resolve the ordinal with [`DataRecord::ordinal`]
/// (exact, then case-insensitive).
#[derive(Debug)]
pub struct NullableReader<R> {
    inner: R
}

impl<R> NullableReader<R> {
    /// Wrap a record or cursor.
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self {
            inner
        }
    }

    /// Unwrap the underlying record or cursor.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Borrow the underlying record or cursor.
    #[must_use]
    pub const fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying record or cursor.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<R: RowCursor> NullableReader<R> {
    /// Advance to the next row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Driver`] if fetching fails.
    pub fn read(&mut self) -> Result<bool> {
        self.inner.read().map_err(Error::Driver)
    }
}

impl<R: DataRecord> NullableReader<R> {
    /// Number of columns.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.inner.field_count()
    }

    /// Column name at `ordinal`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OrdinalOutOfRange`] for an unknown ordinal.
    pub fn name(&self, ordinal: usize) -> Result<&str> {
        self.inner.name(ordinal).ok_or(Error::OrdinalOutOfRange {
            ordinal,
            field_count: self.inner.field_count()
        })
    }

    /// Ordinal of a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if no column has that name.
    pub fn ordinal(&self, name: &str) -> Result<usize> {
        self.inner.ordinal(name).ok_or_else(|| Error::UnknownColumn {
            name: name.to_owned()
        })
    }

    /// Raw cell by column name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] or [`Error::NoCurrentRow`].
    pub fn get_value(&self, name: &str) -> Result<&Value> {
        self.get_value_at(self.ordinal(name)?)
    }

    /// Raw cell by ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OrdinalOutOfRange`] or [`Error::NoCurrentRow`].
    pub fn get_value_at(&self, ordinal: usize) -> Result<&Value> {
        let field_count = self.inner.field_count();
        if ordinal >= field_count {
            return Err(Error::OrdinalOutOfRange {
                ordinal,
                field_count
            });
        }
        self.inner.value_at(ordinal).ok_or(Error::NoCurrentRow)
    }

    /// Check if a cell is database-null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] or [`Error::NoCurrentRow`].
    pub fn is_null(&self, name: &str) -> Result<bool> {
        self.get_value(name).map(Value::is_null)
    }

    /// Check if a cell is database-null, by ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OrdinalOutOfRange`] or [`Error::NoCurrentRow`].
    pub fn is_null_at(&self, ordinal: usize) -> Result<bool> {
        self.get_value_at(ordinal).map(Value::is_null)
    }

    /// Read and convert a cell by column name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullValue`] on a null cell and [`Error::Coercion`]
    /// when the value cannot be converted to `T`.
    pub fn get<T: FieldType>(&self, name: &str) -> Result<T> {
        self.get_at(self.ordinal(name)?)
    }

    /// Read and convert a cell by ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullValue`] on a null cell and [`Error::Coercion`]
    /// when the value cannot be converted to `T`.
    pub fn get_at<T: FieldType>(&self, ordinal: usize) -> Result<T> {
        let value = self.get_value_at(ordinal)?;
        if value.is_null() {
            return Err(Error::NullValue {
                column: self.column_label(ordinal)
            });
        }
        T::from_value(value.clone()).map_err(|source| Error::Coercion {
            field: self.column_label(ordinal),
            source
        })
    }

    /// Read a cell by column name, returning `None` for database-null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`] when a non-null value cannot be converted.
    pub fn get_nullable<T: FieldType>(&self, name: &str) -> Result<Option<T>> {
        self.get_nullable_at(self.ordinal(name)?)
    }

    /// Read a cell by ordinal, returning `None` for database-null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Coercion`] when a non-null value cannot be converted.
    pub fn get_nullable_at<T: FieldType>(&self, ordinal: usize) -> Result<Option<T>> {
        if self.is_null_at(ordinal)? {
            return Ok(None);
        }
        self.get_at(ordinal).map(Some)
    }

    fn column_label(&self, ordinal: usize) -> String {
        self.inner
            .name(ordinal)
            .map_or_else(|| ordinal.to_string(), ToOwned::to_owned)
    }
}

macro_rules! typed_accessors {
    ($($kind:literal, $ty:ty => $get:ident, $get_at:ident, $nullable:ident, $nullable_at:ident;)*) => {
        impl<R: DataRecord> NullableReader<R> {
            $(
                #[doc = concat!("Read a ", $kind, " by column name.")]
                ///
                /// # Errors
                ///
                /// Fails on a null cell or an unconvertible value.
                pub fn $get(&self, name: &str) -> Result<$ty> {
                    self.get(name)
                }

                #[doc = concat!("Read a ", $kind, " by ordinal.")]
                ///
                /// # Errors
                ///
                /// Fails on a null cell or an unconvertible value.
                pub fn $get_at(&self, ordinal: usize) -> Result<$ty> {
                    self.get_at(ordinal)
                }

                #[doc = concat!("Read a nullable ", $kind, " by column name.")]
                ///
                /// # Errors
                ///
                /// Fails only on an unconvertible non-null value.
                pub fn $nullable(&self, name: &str) -> Result<Option<$ty>> {
                    self.get_nullable(name)
                }

                #[doc = concat!("Read a nullable ", $kind, " by ordinal.")]
                ///
                /// # Errors
                ///
                /// Fails only on an unconvertible non-null value.
                pub fn $nullable_at(&self, ordinal: usize) -> Result<Option<$ty>> {
                    self.get_nullable_at(ordinal)
                }
            )*
        }
    };
}

typed_accessors! {
    "boolean", bool => get_bool, get_bool_at, get_nullable_bool, get_nullable_bool_at;
    "byte", u8 => get_byte, get_byte_at, get_nullable_byte, get_nullable_byte_at;
    "character", char => get_char, get_char_at, get_nullable_char, get_nullable_char_at;
    "date/time", NaiveDateTime => get_date_time, get_date_time_at, get_nullable_date_time, get_nullable_date_time_at;
    "decimal", Decimal => get_decimal, get_decimal_at, get_nullable_decimal, get_nullable_decimal_at;
    "double", f64 => get_double, get_double_at, get_nullable_double, get_nullable_double_at;
    "float", f32 => get_float, get_float_at, get_nullable_float, get_nullable_float_at;
    "guid", Uuid => get_guid, get_guid_at, get_nullable_guid, get_nullable_guid_at;
    "16-bit integer", i16 => get_int16, get_int16_at, get_nullable_int16, get_nullable_int16_at;
    "32-bit integer", i32 => get_int32, get_int32_at, get_nullable_int32, get_nullable_int32_at;
    "64-bit integer", i64 => get_int64, get_int64_at, get_nullable_int64, get_nullable_int64_at;
    "string", String => get_string, get_string_at, get_nullable_string, get_nullable_string_at;
}

impl<R: DataRecord> DataRecord for NullableReader<R> {
    fn field_count(&self) -> usize {
        self.inner.field_count()
    }

    fn name(&self, ordinal: usize) -> Option<&str> {
        self.inner.name(ordinal)
    }

    fn value_at(&self, ordinal: usize) -> Option<&Value> {
        self.inner.value_at(ordinal)
    }

    fn ordinal(&self, name: &str) -> Option<usize> {
        self.inner.ordinal(name)
    }
}

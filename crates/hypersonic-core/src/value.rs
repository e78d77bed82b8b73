// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Cell and parameter values.
//!
//! [`Value`] is the tagged representation of one database cell or parameter
//! value. [`Value::Null`] is the database-null marker: it is distinct from
//! every in-domain value, including empty strings and zero.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::table::DataTable;

/// Format used when a date/time travels as text.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single cell or parameter value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Database null.
    #[default]
    Null,

    /// Boolean.
    Bool(bool),

    /// Unsigned 8-bit integer.
    Byte(u8),

    /// Single character.
    Char(char),

    /// 16-bit signed integer.
    Int16(i16),

    /// 32-bit signed integer.
    Int32(i32),

    /// 64-bit signed integer.
    Int64(i64),

    /// Single-precision float.
    Float(f32),

    /// Double-precision float.
    Double(f64),

    /// Exact decimal.
    Decimal(Decimal),

    /// Date and time without offset.
    DateTime(NaiveDateTime),

    /// Globally unique identifier.
    Guid(Uuid),

    /// Text.
    String(String),

    /// Binary buffer.
    Bytes(Vec<u8>),

    /// In-memory table.
    Table(DataTable)
}

impl Value {
    /// Check if this is the database-null marker.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Char(_) => "char",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Decimal(_) => "decimal",
            Self::DateTime(_) => "datetime",
            Self::Guid(_) => "guid",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Table(_) => "table"
        }
    }

    /// Borrow the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{}", v.format(DATE_TIME_FORMAT)),
            Self::Guid(v) => write!(f, "{}", v.hyphenated()),
            Self::String(v) => f.write_str(v),
            Self::Bytes(v) => {
                f.write_str("0x")?;
                v.iter().try_for_each(|b| write!(f, "{b:02x}"))
            }
            Self::Table(t) => write!(f, "<table {}x{}>", t.len(), t.columns().len())
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    u8 => Byte,
    char => Char,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    NaiveDateTime => DateTime,
    Uuid => Guid,
    String => String,
    Vec<u8> => Bytes,
    DataTable => Table,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn null_is_default() {
        assert!(Value::default().is_null());
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn option_into_value() {
        assert_eq!(Value::from(Some(5_i32)), Value::Int32(5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn display_date_time() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 0))
            .unwrap();
        assert_eq!(Value::DateTime(dt).to_string(), "2024-03-09 14:05:00");
    }

    #[test]
    fn display_bytes_as_hex() {
        assert_eq!(Value::Bytes(vec![0x0a, 0xff]).to_string(), "0x0aff");
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::from("x").kind_name(), "string");
        assert_eq!(Value::Int64(1).kind_name(), "int64");
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Int64(1).as_str(), None);
    }
}

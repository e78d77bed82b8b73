// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Value coercion keyed by declared field kind.
//!
//! Drivers rarely return exactly the declared type: SQLite hands back every
//! integer as `i64`, decimals often arrive as text, and enums are stored by
//! name. [`coerce`] converts a [`Value`] into the canonical variant for a
//! [`FieldKind`], with one explicit rule per kind.
//!
//! # Rules
//!
//! | Target | Accepted sources |
//! |--------|------------------|
//! | `Bool` | bool, any number (`!= 0`), text `true`/`false`/integer |
//! | `Byte`..`Int64` | bool, char, any number, numeric text; fractions round half to even; range-checked |
//! | `Char` | char, one-character text, integer code point |
//! | `Float`/`Double` | bool, any number, numeric text |
//! | `Decimal` | bool, any number, decimal text (plain or scientific) |
//! | `DateTime` | date/time, RFC 3339 text, `YYYY-MM-DD[ HH:MM[:SS[.f]]]` text |
//! | `Guid` | guid, hyphenated or simple text, 16 bytes |
//! | `String` | every scalar via its display form |
//! | `Bytes` | bytes, text (UTF-8), guid |
//! | `Table` | table |
//! | `Enum` | every scalar, as display text for member-name parsing |
//!
//! Null is never coerced; callers decide what a null means for the field.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive}
};
use uuid::Uuid;

use crate::{
    descriptor::{FieldKind, names_match},
    error::CoercionError,
    value::Value
};

/// Text formats accepted for date/time values, tried in order after RFC 3339.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M"
];

/// Convert a value into the canonical variant for `kind`.
///
/// # Errors
///
/// - [`CoercionError::Null`] for [`Value::Null`]
/// - [`CoercionError::Unsupported`] when no rule exists for the pair
/// - [`CoercionError::OutOfRange`] when a number does not fit
/// - [`CoercionError::Parse`] when text is malformed
pub fn coerce(value: Value, kind: FieldKind) -> Result<Value, CoercionError> {
    if value.is_null() {
        return Err(CoercionError::Null {
            to: kind
        });
    }

    match kind {
        FieldKind::Bool => to_bool(&value).map(Value::Bool),
        FieldKind::Byte => integral(&value, kind)
            .and_then(|n| narrow(n, kind))
            .map(Value::Byte),
        FieldKind::Int16 => integral(&value, kind)
            .and_then(|n| narrow(n, kind))
            .map(Value::Int16),
        FieldKind::Int32 => integral(&value, kind)
            .and_then(|n| narrow(n, kind))
            .map(Value::Int32),
        FieldKind::Int64 => integral(&value, kind)
            .and_then(|n| narrow(n, kind))
            .map(Value::Int64),
        FieldKind::Char => to_char(value),
        FieldKind::Float => to_f64(&value, kind).and_then(|f| {
            if f.is_finite() && f.abs() > f64::from(f32::MAX) {
                Err(out_of_range(f, kind))
            } else {
                #[allow(clippy::cast_possible_truncation)]
                let narrowed = f as f32;
                Ok(Value::Float(narrowed))
            }
        }),
        FieldKind::Double => to_f64(&value, kind).map(Value::Double),
        FieldKind::Decimal => to_decimal(value).map(Value::Decimal),
        FieldKind::DateTime => to_date_time(value).map(Value::DateTime),
        FieldKind::Guid => to_guid(value).map(Value::Guid),
        FieldKind::String => match value {
            Value::String(_) => Ok(value),
            Value::Bytes(_) | Value::Table(_) => Err(unsupported(&value, kind)),
            other => Ok(Value::String(other.to_string()))
        },
        FieldKind::Bytes => match value {
            Value::Bytes(_) => Ok(value),
            Value::String(s) => Ok(Value::Bytes(s.into_bytes())),
            Value::Guid(g) => Ok(Value::Bytes(g.as_bytes().to_vec())),
            other => Err(unsupported(&other, kind))
        },
        FieldKind::Table => match value {
            Value::Table(_) => Ok(value),
            other => Err(unsupported(&other, kind))
        },
        FieldKind::Enum => match value {
            Value::String(_) => Ok(value),
            Value::Bytes(_) | Value::Table(_) => Err(unsupported(&value, kind)),
            other => Ok(Value::String(other.to_string()))
        },
        FieldKind::Record | FieldKind::Collection | FieldKind::Unmapped => {
            Err(unsupported(&value, kind))
        }
    }
}

fn unsupported(value: &Value, to: FieldKind) -> CoercionError {
    CoercionError::Unsupported {
        from: value.kind_name(),
        to
    }
}

fn out_of_range(value: impl ToString, to: FieldKind) -> CoercionError {
    CoercionError::OutOfRange {
        value: value.to_string(),
        to
    }
}

fn parse_error(value: &str, to: FieldKind) -> CoercionError {
    CoercionError::Parse {
        value: value.to_owned(),
        to
    }
}

fn narrow<T: TryFrom<i128>>(n: i128, kind: FieldKind) -> Result<T, CoercionError> {
    T::try_from(n).map_err(|_| out_of_range(n, kind))
}

/// Integer view of a value; fractions round half to even.
fn integral(value: &Value, kind: FieldKind) -> Result<i128, CoercionError> {
    match value {
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Byte(n) => Ok(i128::from(*n)),
        Value::Int16(n) => Ok(i128::from(*n)),
        Value::Int32(n) => Ok(i128::from(*n)),
        Value::Int64(n) => Ok(i128::from(*n)),
        Value::Char(c) => Ok(i128::from(u32::from(*c))),
        Value::Float(f) => float_integral(f64::from(*f), kind),
        Value::Double(f) => float_integral(*f, kind),
        Value::Decimal(d) => d.round().to_i128().ok_or_else(|| out_of_range(d, kind)),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(n) = text.parse::<i128>() {
                return Ok(n);
            }
            parse_decimal(text)
                .ok_or_else(|| parse_error(s, kind))
                .and_then(|d| d.round().to_i128().ok_or_else(|| out_of_range(d, kind)))
        }
        other => Err(unsupported(other, kind))
    }
}

fn float_integral(f: f64, kind: FieldKind) -> Result<i128, CoercionError> {
    let rounded = f.round_ties_even();
    #[allow(clippy::cast_precision_loss)]
    let limit = i128::MAX as f64;
    if !rounded.is_finite() || rounded.abs() > limit {
        return Err(out_of_range(f, kind));
    }
    #[allow(clippy::cast_possible_truncation)]
    let n = rounded as i128;
    Ok(n)
}

fn to_bool(value: &Value) -> Result<bool, CoercionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Double(f) => Ok(*f != 0.0),
        Value::Decimal(d) => Ok(!d.is_zero()),
        Value::Byte(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
            integral(value, FieldKind::Bool).map(|n| n != 0)
        }
        Value::String(s) => {
            let text = s.trim();
            if text.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if text.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                text.parse::<i64>()
                    .map(|n| n != 0)
                    .map_err(|_| parse_error(s, FieldKind::Bool))
            }
        }
        other => Err(unsupported(other, FieldKind::Bool))
    }
}

fn to_char(value: Value) -> Result<Value, CoercionError> {
    match value {
        Value::Char(_) => Ok(value),
        Value::String(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(parse_error(&s, FieldKind::Char))
            }
        }
        Value::Byte(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
            let n = integral(&value, FieldKind::Char)?;
            u32::try_from(n)
                .ok()
                .and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| out_of_range(n, FieldKind::Char))
        }
        other => Err(unsupported(&other, FieldKind::Char))
    }
}

fn to_f64(value: &Value, kind: FieldKind) -> Result<f64, CoercionError> {
    match value {
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        Value::Byte(n) => Ok(f64::from(*n)),
        Value::Int16(n) => Ok(f64::from(*n)),
        Value::Int32(n) => Ok(f64::from(*n)),
        #[allow(clippy::cast_precision_loss)]
        Value::Int64(n) => Ok(*n as f64),
        Value::Float(f) => Ok(f64::from(*f)),
        Value::Double(f) => Ok(*f),
        Value::Decimal(d) => d.to_f64().ok_or_else(|| out_of_range(d, kind)),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| parse_error(s, kind)),
        other => Err(unsupported(other, kind))
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn to_decimal(value: Value) -> Result<Decimal, CoercionError> {
    let kind = FieldKind::Decimal;
    match value {
        Value::Decimal(d) => Ok(d),
        Value::Bool(b) => Ok(Decimal::from(u8::from(b))),
        Value::Byte(n) => Ok(Decimal::from(n)),
        Value::Int16(n) => Ok(Decimal::from(n)),
        Value::Int32(n) => Ok(Decimal::from(n)),
        Value::Int64(n) => Ok(Decimal::from(n)),
        Value::Float(f) => Decimal::from_f32(f).ok_or_else(|| out_of_range(f, kind)),
        Value::Double(f) => Decimal::from_f64(f).ok_or_else(|| out_of_range(f, kind)),
        Value::String(s) => parse_decimal(s.trim()).ok_or_else(|| parse_error(&s, kind)),
        other => Err(unsupported(&other, kind))
    }
}

fn to_date_time(value: Value) -> Result<NaiveDateTime, CoercionError> {
    match value {
        Value::DateTime(dt) => Ok(dt),
        Value::String(s) => {
            parse_date_time(s.trim()).ok_or_else(|| parse_error(&s, FieldKind::DateTime))
        }
        other => Err(unsupported(&other, FieldKind::DateTime))
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn to_guid(value: Value) -> Result<Uuid, CoercionError> {
    match value {
        Value::Guid(g) => Ok(g),
        Value::String(s) => Uuid::parse_str(s.trim()).map_err(|_| parse_error(&s, FieldKind::Guid)),
        Value::Bytes(b) => Uuid::from_slice(&b)
            .map_err(|_| parse_error(&Value::Bytes(b).to_string(), FieldKind::Guid)),
        other => Err(unsupported(&other, FieldKind::Guid))
    }
}

/// Resolve an enumeration member from a cell value.
///
/// `variants` lists member names with their discriminants in declaration
/// order. The value's text form is matched against the names ignoring case,
/// then parsed as a discriminant. Returns the position in `variants`.
///
/// # Errors
///
/// Returns [`CoercionError::UnknownVariant`] when neither matches, or the
/// [`coerce`] error for values with no text form.
pub fn enum_variant(
    value: Value,
    enumeration: &'static str,
    variants: &[(&str, i64)]
) -> Result<usize, CoercionError> {
    let text = coerce(value, FieldKind::Enum)?.to_string();
    let text = text.trim();
    if let Some(index) = variants.iter().position(|(name, _)| names_match(name, text)) {
        return Ok(index);
    }
    text.parse::<i64>()
        .ok()
        .and_then(|n| variants.iter().position(|(_, discriminant)| *discriminant == n))
        .ok_or_else(|| CoercionError::UnknownVariant {
            value: text.to_owned(),
            enumeration
        })
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mapped types and field types.
//!
//! # Overview
//!
//! | Trait | Implemented by | Purpose |
//! |-------|----------------|---------|
//! | [`Record`] | `#[derive(Record)]` structs | Field-by-index read/write over a [`TypeDescriptor`] |
//! | [`FieldType`] | every field type | Declared kind, nullability, value conversion |
//! | [`Hydrate`] | `Record + Default` | Marker for hydration targets |
//!
//! [`Record`] is object-safe: the parameter builder and the hydrator walk
//! object graphs through `&dyn Record`, one field index at a time, so no
//! runtime reflection is needed.
//!
//! # Field types
//!
//! | Rust type | Kind | Accepts null |
//! |-----------|------|--------------|
//! | `bool`, `u8`, `char`, `i16`, `i32`, `i64`, `f32`, `f64` | scalar | no |
//! | `Decimal`, `NaiveDateTime`, `DateTime<Utc>`, `Uuid` | scalar | no |
//! | `String`, `Vec<u8>`, [`DataTable`] | reference | yes, keeps default |
//! | `#[derive(DataEnum)]` enums | [`FieldKind::Enum`] | no |
//! | `#[derive(Record)]` structs | [`FieldKind::Record`] | n/a |
//! | `Option<T>` | as `T` | yes |
//! | `Box<T>` | as `T` | as `T` |

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    coerce::coerce,
    descriptor::{FieldKind, TypeDescriptor},
    error::CoercionError,
    table::DataTable,
    value::Value
};

/// Current content of one field, as seen by the parameter builder.
#[derive(Debug)]
pub enum FieldRef<'a> {
    /// A leaf value.
    Value(Value),

    /// A present nested record.
    Record(&'a dyn Record),

    /// An absent (`None`) nested record.
    Absent,

    /// A collection; never flattened.
    Collection,

    /// A field excluded from mapping; its value is never read.
    Unmapped
}

/// A type mapped field by field.
///
/// Normally implemented by `#[derive(Record)]`. Field indices follow the
/// declaration order of [`Record::descriptor`].
pub trait Record {
    /// Static descriptor of the type.
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Read the field at `index`.
    ///
    /// Returns [`FieldRef::Absent`] for an out-of-range index.
    fn field(&self, index: usize) -> FieldRef<'_>;

    /// Assign a non-null cell value to the field at `index`.
    ///
    /// # Errors
    ///
    /// Returns the conversion failure; the field is left unchanged.
    fn assign(&mut self, index: usize, value: Value) -> Result<(), CoercionError>;

    /// Make sure the nested record at `index` exists and borrow it.
    ///
    /// Absent `Option` records are instantiated with their default. Returns
    /// `None` for non-record fields.
    fn prepare_nested(&mut self, index: usize) -> Option<&mut dyn Record>;

    /// Static descriptor without an instance.
    fn describe() -> &'static TypeDescriptor
    where
        Self: Sized + Default
    {
        Self::default().descriptor()
    }
}

impl std::fmt::Debug for dyn Record + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

/// A type that can be hydrated from a row.
pub trait Hydrate: Record + Default {}

impl<T: Record + Default> Hydrate for T {}

/// A type usable as a mapped field.
pub trait FieldType: Sized {
    /// Declared kind.
    const KIND: FieldKind;

    /// `true` for `Option<_>`.
    const NULLABLE: bool = false;

    /// Current content for the parameter builder.
    fn to_field(&self) -> FieldRef<'_>;

    /// Convert a non-null cell value.
    ///
    /// # Errors
    ///
    /// Returns the conversion failure.
    fn from_value(value: Value) -> Result<Self, CoercionError>;

    /// Default instance used when a nested record must be created.
    fn instantiate() -> Option<Self> {
        None
    }

    /// Borrow as a record if this is one.
    fn prepare(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

macro_rules! copy_field_type {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn to_field(&self) -> FieldRef<'_> {
                    FieldRef::Value(Value::$kind(*self))
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match coerce(value, Self::KIND)? {
                        Value::$kind(v) => Ok(v),
                        other => Err(CoercionError::Unsupported {
                            from: other.kind_name(),
                            to:   Self::KIND
                        })
                    }
                }
            }
        )*
    };
}

macro_rules! clone_field_type {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn to_field(&self) -> FieldRef<'_> {
                    FieldRef::Value(Value::$kind(self.clone()))
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match coerce(value, Self::KIND)? {
                        Value::$kind(v) => Ok(v),
                        other => Err(CoercionError::Unsupported {
                            from: other.kind_name(),
                            to:   Self::KIND
                        })
                    }
                }
            }
        )*
    };
}

copy_field_type! {
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
}

clone_field_type! {
    String => String,
    Vec<u8> => Bytes,
    DataTable => Table,
}

impl FieldType for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Value(Value::DateTime(self.naive_utc()))
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        NaiveDateTime::from_value(value).map(|dt| dt.and_utc())
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_field(&self) -> FieldRef<'_> {
        match self {
            Some(inner) => inner.to_field(),
            None if T::KIND == FieldKind::Record => FieldRef::Absent,
            None => FieldRef::Value(Value::Null)
        }
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }

    fn instantiate() -> Option<Self> {
        T::instantiate().map(Some)
    }

    fn prepare(&mut self) -> Option<&mut dyn Record> {
        if self.is_none() {
            *self = Some(T::instantiate()?);
        }
        self.as_mut().and_then(FieldType::prepare)
    }
}

impl<T: FieldType> FieldType for Box<T> {
    const KIND: FieldKind = T::KIND;
    const NULLABLE: bool = T::NULLABLE;

    fn to_field(&self) -> FieldRef<'_> {
        T::to_field(self)
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        T::from_value(value).map(Box::new)
    }

    fn instantiate() -> Option<Self> {
        T::instantiate().map(Box::new)
    }

    fn prepare(&mut self) -> Option<&mut dyn Record> {
        T::prepare(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::fixtures::{Address, Person};

    #[test]
    fn scalars_round_trip_through_values() {
        assert_eq!(i32::from_value(Value::Int64(7)).unwrap(), 7);
        assert!(matches!(42_i16.to_field(), FieldRef::Value(Value::Int16(42))));
        assert_eq!(String::from_value(Value::Int32(5)).unwrap(), "5");
        assert_eq!(<Vec<u8>>::KIND, FieldKind::Bytes);
    }

    #[test]
    fn option_is_nullable() {
        assert!(<Option<i32>>::NULLABLE);
        assert!(!i32::NULLABLE);
        assert_eq!(<Option<i32>>::from_value(Value::Null).unwrap(), None);
        assert_eq!(<Option<i32>>::from_value(Value::Int64(3)).unwrap(), Some(3));
        assert!(matches!(None::<i32>.to_field(), FieldRef::Value(Value::Null)));
    }

    #[test]
    fn absent_nested_record() {
        assert!(matches!(None::<Address>.to_field(), FieldRef::Absent));
        assert_eq!(<Option<Address>>::KIND, FieldKind::Record);
    }

    #[test]
    fn option_prepare_instantiates_record() {
        let mut slot: Option<Address> = None;
        let nested = slot.prepare().unwrap();
        nested.assign(0, Value::from("Omaha")).unwrap();
        assert_eq!(slot.unwrap().city, "Omaha");
    }

    #[test]
    fn scalars_are_not_records() {
        let mut n = 5_i32;
        assert!(n.prepare().is_none());
        assert!(i32::instantiate().is_none());
    }

    #[test]
    fn utc_date_time_maps_to_naive() {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        let utc = <DateTime<Utc>>::from_value(Value::DateTime(naive)).unwrap();
        assert_eq!(utc.naive_utc(), naive);
        assert!(matches!(utc.to_field(), FieldRef::Value(Value::DateTime(v)) if v == naive));
    }

    #[test]
    fn boxed_field_delegates() {
        assert_eq!(<Box<i64>>::from_value(Value::Int32(9)).unwrap(), Box::new(9));
        assert_eq!(<Box<Address>>::KIND, FieldKind::Record);
    }

    #[test]
    fn describe_without_instance() {
        assert_eq!(Person::describe().name, "Person");
        let person = Person::default();
        let dyn_record: &dyn Record = &person;
        assert_eq!(format!("{dyn_record:?}"), "Person");
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Hand-written records shared by unit tests.
//!
//! `fixture_record!` expands to what `#[derive(Record)]` generates, so core
//! tests do not depend on the proc-macro crate. [`Scripted`] is a vendor
//! that records every connection call and fails the steps named in its
//! connection string.

use std::cell::RefCell;

use crate::{
    descriptor::{FieldDescriptor, FieldKind, Ignore, TypeDescriptor},
    error::CoercionError,
    reader::BufferedRows,
    record::{FieldRef, FieldType, Record},
    value::Value,
    vendor::{Command, Connection, DriverError, IsolationLevel, Vendor}
};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static ROWS: RefCell<Option<(Vec<String>, Vec<Vec<Value>>)>> = const { RefCell::new(None) };
}

/// Drain the calls recorded on this thread.
pub fn take_events() -> Vec<String> {
    EVENTS.with(RefCell::take)
}

/// Result set returned by every following `query` on this thread.
pub fn script_rows(columns: &[&str], rows: Vec<Vec<Value>>) {
    let columns = columns.iter().map(|c| (*c).to_owned()).collect();
    ROWS.with(|slot| *slot.borrow_mut() = Some((columns, rows)));
}

fn record_event(event: String) {
    EVENTS.with(|events| events.borrow_mut().push(event));
}

/// Vendor whose connection string is a comma-separated list of steps to
/// fail: `open`, `execute`, `query`, `begin`, `commit`, `rollback`, `close`.
#[derive(Debug)]
pub struct Scripted;

#[derive(Debug)]
pub struct ScriptedConnection {
    failures: String
}

impl ScriptedConnection {
    fn step(&self, event: String, step: &str) -> Result<(), DriverError> {
        record_event(event);
        if self.failures.split(',').any(|f| f.trim() == step) {
            return Err(format!("{step} failed").into());
        }
        Ok(())
    }
}

impl Vendor for Scripted {
    const PARAMETER_DELIMITER: &'static str = ":";
    type Connection = ScriptedConnection;

    fn open(connection_string: &str) -> Result<ScriptedConnection, DriverError> {
        let connection = ScriptedConnection {
            failures: connection_string.to_owned()
        };
        connection.step("open".to_owned(), "open")?;
        Ok(connection)
    }
}

impl Connection for ScriptedConnection {
    type Rows = BufferedRows;

    fn execute(&mut self, command: &Command<'_>) -> Result<usize, DriverError> {
        self.step(format!("execute {}", command.text), "execute")?;
        Ok(command.parameters.len())
    }

    fn query(&mut self, command: &Command<'_>) -> Result<BufferedRows, DriverError> {
        self.step(format!("query {}", command.text), "query")?;
        let scripted = ROWS.with(|slot| slot.borrow().clone());
        Ok(scripted.map_or_else(BufferedRows::default, |(columns, rows)| {
            BufferedRows::new(columns, rows)
        }))
    }

    fn begin(&mut self, isolation: IsolationLevel) -> Result<(), DriverError> {
        self.step(format!("begin {isolation:?}"), "begin")
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.step("commit".to_owned(), "commit")
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.step("rollback".to_owned(), "rollback")
    }

    fn close(self) -> Result<(), DriverError> {
        self.step("close".to_owned(), "close")
    }
}

macro_rules! fixture_descriptor {
    (value, $name:ident, $fty:ty, $alias:literal, $ignore:ident) => {
        FieldDescriptor::new(stringify!($name), stringify!($fty), <$fty as FieldType>::KIND)
            .with_alias($alias)
            .with_nullable(<$fty as FieldType>::NULLABLE)
            .with_ignore(Ignore::$ignore)
    };
    (collection, $name:ident, $fty:ty, $alias:literal, $ignore:ident) => {
        FieldDescriptor::new(stringify!($name), stringify!($fty), FieldKind::Collection)
            .with_alias($alias)
            .with_nullable(true)
            .with_ignore(Ignore::$ignore)
    };
}

macro_rules! fixture_field {
    (value, $this:expr) => {
        FieldType::to_field(&$this)
    };
    (collection, $this:expr) => {
        FieldRef::Collection
    };
}

macro_rules! fixture_assign {
    (value, $fty:ty, $this:expr, $value:expr) => {{
        $this = <$fty as FieldType>::from_value($value)?;
        Ok(())
    }};
    (collection, $fty:ty, $this:expr, $value:expr) => {
        Err(CoercionError::Unsupported {
            from: $value.kind_name(),
            to:   FieldKind::Collection
        })
    };
}

macro_rules! fixture_prepare {
    (value, $this:expr) => {
        FieldType::prepare(&mut $this)
    };
    (collection, $this:expr) => {
        None
    };
}

macro_rules! fixture_record {
    ($ty:ident {
        $($index:literal => $field:ident: $fty:ty [$mode:ident, $alias:literal, $ignore:ident];)*
    }) => {
        impl Record for $ty {
            fn descriptor(&self) -> &'static TypeDescriptor {
                static DESCRIPTOR: TypeDescriptor = TypeDescriptor {
                    name:   stringify!($ty),
                    path:   concat!(module_path!(), "::", stringify!($ty)),
                    fields: &[$(fixture_descriptor!($mode, $field, $fty, $alias, $ignore)),*]
                };
                &DESCRIPTOR
            }

            fn field(&self, index: usize) -> FieldRef<'_> {
                match index {
                    $($index => fixture_field!($mode, self.$field),)*
                    _ => FieldRef::Absent
                }
            }

            fn assign(&mut self, index: usize, value: Value) -> Result<(), CoercionError> {
                match index {
                    $($index => fixture_assign!($mode, $fty, self.$field, value),)*
                    _ => Err(CoercionError::UnknownField(index))
                }
            }

            fn prepare_nested(&mut self, index: usize) -> Option<&mut dyn Record> {
                match index {
                    $($index => fixture_prepare!($mode, self.$field),)*
                    _ => None
                }
            }
        }

        impl FieldType for $ty {
            const KIND: FieldKind = FieldKind::Record;

            fn to_field(&self) -> FieldRef<'_> {
                FieldRef::Record(self)
            }

            fn from_value(value: Value) -> Result<Self, CoercionError> {
                Err(CoercionError::Unsupported {
                    from: value.kind_name(),
                    to:   FieldKind::Record
                })
            }

            fn instantiate() -> Option<Self> {
                Some(Self::default())
            }

            fn prepare(&mut self) -> Option<&mut dyn Record> {
                Some(self)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Active,
    Inactive
}

impl FieldType for Status {
    const KIND: FieldKind = FieldKind::Enum;

    fn to_field(&self) -> FieldRef<'_> {
        FieldRef::Value(Value::String(
            match self {
                Self::Active => "Active",
                Self::Inactive => "Inactive"
            }
            .to_owned()
        ))
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        const VARIANTS: &[(&str, i64)] = &[("Active", 0), ("Inactive", 1)];
        match crate::coerce::enum_variant(value, "Status", VARIANTS)? {
            0 => Ok(Self::Active),
            _ => Ok(Self::Inactive)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub city: String
}

fixture_record!(Address {
    0 => city: String [value, "City", NONE];
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Customer {
    pub name:    String,
    pub address: Address
}

fixture_record!(Customer {
    0 => name: String [value, "Name", NONE];
    1 => address: Address [value, "", NONE];
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub name:     String,
    pub age:      i32,
    pub status:   Status,
    pub address:  Option<Address>,
    pub secret:   String,
    pub nickname: Option<String>,
    pub tags:     Vec<String>
}

fixture_record!(Person {
    0 => name: String [value, "Name", NONE];
    1 => age: i32 [value, "Age", NONE];
    2 => status: Status [value, "Status", NONE];
    3 => address: Option<Address> [value, "", NONE];
    4 => secret: String [value, "", BOTH];
    5 => nickname: Option<String> [value, "Nickname", NONE];
    6 => tags: Vec<String> [collection, "", NONE];
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    pub from: Address,
    pub to:   Address
}

fixture_record!(Route {
    0 => from: Address [value, "", NONE];
    1 => to: Address [value, "", NONE];
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub label: String,
    pub next:  Option<Box<Node>>
}

fixture_record!(Node {
    0 => label: String [value, "", NONE];
    1 => next: Option<Box<Node>> [value, "", NONE];
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inner {
    pub id:    i64,
    pub label: String
}

fixture_record!(Inner {
    0 => id: i64 [value, "Id", NONE];
    1 => label: String [value, "Label", NONE];
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outer {
    pub id:      i64,
    pub inner:   Inner,
    pub skipped: Option<Inner>,
    pub audit:   String
}

fixture_record!(Outer {
    0 => id: i64 [value, "Id", NONE];
    1 => inner: Inner [value, "", NONE];
    2 => skipped: Option<Inner> [value, "", HYDRATION];
    3 => audit: String [value, "Audit", HYDRATION];
});

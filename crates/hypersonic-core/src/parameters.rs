// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parameter builder: flattens an object graph into named parameters.
//!
//! # Algorithm
//!
//! ```text
//! build(&args)
//! │
//! ├── args is a record?          no  → InvalidParameterType / NullParameters
//! │
//! └── for each field, declaration order
//!     ├── #[data(ignore_parameter)]   skip
//!     ├── collection                  skip
//!     ├── nested record present       recurse (names are not prefixed)
//!     ├── nested record absent        MissingRequiredNestedParameter
//!     └── leaf                        "{delimiter}{alias or name}" = value
//! ```
//!
//! Output order equals pre-order traversal order, so building the same
//! unmodified instance twice yields identical lists.

use tracing::trace;

use crate::{
    error::{Error, Result},
    record::{FieldRef, FieldType, Record},
    value::Value,
    vendor::Vendor
};

/// Parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ParameterDirection {
    /// Value flows into the command.
    #[default]
    Input,

    /// Value is produced by the command.
    Output,

    /// Value flows both ways.
    InputOutput,

    /// Return value of a stored procedure.
    ReturnValue
}

/// A named command parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name:      String,
    value:     Value,
    direction: ParameterDirection
}

impl Parameter {
    /// Create an input parameter.
    ///
    /// `name` is used as given, delimiter included.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name:      name.into(),
            value:     value.into(),
            direction: ParameterDirection::Input
        }
    }

    /// Set the direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Name including the delimiter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Direction.
    #[must_use]
    pub const fn direction(&self) -> ParameterDirection {
        self.direction
    }
}

/// Flattens records into parameter lists.
///
/// Stateless apart from the delimiter; one builder can be shared freely.
///
/// # Example
///
/// ```rust,ignore
/// let builder = ParameterBuilder::new("@");
/// let parameters = builder.build(&customer)?;
/// // [("@Name", "Ann"), ("@City", "Omaha")]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterBuilder {
    delimiter: &'static str
}

impl ParameterBuilder {
    /// Create a builder with the given parameter-name delimiter.
    #[must_use]
    pub const fn new(delimiter: &'static str) -> Self {
        Self {
            delimiter
        }
    }

    /// Create a builder using the vendor's delimiter.
    #[must_use]
    pub const fn for_vendor<V: Vendor>() -> Self {
        Self::new(V::PARAMETER_DELIMITER)
    }

    /// Parameter-name delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> &'static str {
        self.delimiter
    }

    /// Flatten `args` into parameters.
    ///
    /// # Errors
    ///
    /// - [`Error::NullParameters`] when `args` is `None`
    /// - [`Error::InvalidParameterType`] when `args` is not a record
    /// - [`Error::MissingRequiredNestedParameter`] for an absent nested record
    /// - [`Error::CyclicGraphDetected`] when a record contains itself
    pub fn build<P: FieldType>(&self, args: &P) -> Result<Vec<Parameter>> {
        match args.to_field() {
            FieldRef::Record(record) => self.build_record(record),
            FieldRef::Absent | FieldRef::Value(Value::Null) => Err(Error::NullParameters),
            FieldRef::Value(_) | FieldRef::Collection | FieldRef::Unmapped => Err(Error::InvalidParameterType {
                type_name: std::any::type_name::<P>(),
                kind:      P::KIND
            })
        }
    }

    /// Flatten a record into parameters.
    ///
    /// # Errors
    ///
    /// See [`ParameterBuilder::build`].
    pub fn build_record(&self, record: &dyn Record) -> Result<Vec<Parameter>> {
        let mut parameters = Vec::new();
        let mut ancestors = Vec::new();
        self.flatten(record, &mut ancestors, &mut parameters)?;
        trace!(
            root = record.descriptor().name,
            count = parameters.len(),
            "parameters built"
        );
        Ok(parameters)
    }

    fn flatten(
        &self,
        record: &dyn Record,
        ancestors: &mut Vec<&'static str>,
        out: &mut Vec<Parameter>
    ) -> Result<()> {
        let descriptor = record.descriptor();
        ancestors.push(descriptor.path);

        for (index, field) in descriptor.fields.iter().enumerate() {
            if field.has_parameter_ignore() {
                continue;
            }
            match record.field(index) {
                FieldRef::Value(value) => out.push(Parameter::new(
                    format!("{}{}", self.delimiter, field.resolved_name()),
                    value
                )),
                FieldRef::Record(nested) => {
                    let nested_descriptor = nested.descriptor();
                    if ancestors.contains(&nested_descriptor.path) {
                        return Err(Error::CyclicGraphDetected {
                            type_name: nested_descriptor.name,
                            field:     field.name
                        });
                    }
                    self.flatten(nested, ancestors, out)?;
                }
                FieldRef::Absent => {
                    return Err(Error::MissingRequiredNestedParameter {
                        owner: descriptor.name,
                        field: field.name
                    });
                }
                FieldRef::Collection | FieldRef::Unmapped => {}
            }
        }

        ancestors.pop();
        Ok(())
    }
}

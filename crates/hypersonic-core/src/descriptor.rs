// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field descriptors and mapping annotations.
//!
//! Every mapped type carries one static [`TypeDescriptor`]: its fields in
//! declaration order, each with its declared kind, nullability and mapping
//! annotations. The table is emitted by `#[derive(Record)]` at compile time,
//! so field order and nullability are explicit contracts rather than
//! something discovered at runtime.
//!
//! # Annotations
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[data(alias = "Name")]` | Use `Name` instead of the field name for parameters and column matching |
//! | `#[data(ignore_parameter)]` | Skip when building parameters |
//! | `#[data(ignore_hydration)]` | Skip when hydrating from a row |
//! | `#[data(ignore)]` | Skip in both directions |
//!
//! Annotations are pure metadata: the resolver methods on
//! [`FieldDescriptor`] only read them.

use std::fmt;

/// Declared kind of a mapped field.
///
/// Drives both directions of mapping: the parameter builder recurses into
/// [`FieldKind::Record`] fields and treats every other non-collection kind as
/// a leaf; the hydrator coerces cell values according to the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `bool`.
    Bool,

    /// `u8`.
    Byte,

    /// `char`.
    Char,

    /// `i16`.
    Int16,

    /// `i32`.
    Int32,

    /// `i64`.
    Int64,

    /// `f32`.
    Float,

    /// `f64`.
    Double,

    /// `rust_decimal::Decimal`.
    Decimal,

    /// `chrono::NaiveDateTime` or `chrono::DateTime<Utc>`.
    DateTime,

    /// `uuid::Uuid`.
    Guid,

    /// `String`.
    String,

    /// `Vec<u8>`.
    Bytes,

    /// [`DataTable`](crate::DataTable), the in-memory tabular type.
    Table,

    /// Unit enum parsed from its member names.
    Enum,

    /// Nested record, flattened and hydrated recursively.
    Record,

    /// Collection; never flattened, instantiated or populated.
    Collection,

    /// Field marked `#[data(ignore)]`; its type is never mapped.
    Unmapped
}

impl FieldKind {
    /// Check if values of this kind are mapped as a single parameter or cell.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !matches!(self, Self::Record | Self::Collection | Self::Unmapped)
    }

    /// Check if this kind tolerates a database null without `Option`.
    ///
    /// Strings, byte buffers, tables, records and collections keep their
    /// default value when the cell is null. Value kinds (numbers, dates,
    /// guids, enums) require an `Option` wrapper to receive a null.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Bytes
                | Self::Table
                | Self::Record
                | Self::Collection
                | Self::Unmapped
        )
    }

    /// Lowercase kind name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::DateTime => "datetime",
            Self::Guid => "guid",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Table => "table",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Collection => "collection",
            Self::Unmapped => "unmapped"
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ignore flags of a field.
///
/// `#[data(ignore)]` sets both flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Ignore {
    /// Skip when building parameters.
    pub parameters: bool,

    /// Skip when hydrating.
    pub hydration: bool
}

impl Ignore {
    /// No ignore annotation.
    pub const NONE: Self = Self {
        parameters: false,
        hydration:  false
    };

    /// `#[data(ignore_parameter)]`.
    pub const PARAMETERS: Self = Self {
        parameters: true,
        hydration:  false
    };

    /// `#[data(ignore_hydration)]`.
    pub const HYDRATION: Self = Self {
        parameters: false,
        hydration:  true
    };

    /// `#[data(ignore)]`.
    pub const BOTH: Self = Self {
        parameters: true,
        hydration:  true
    };
}

/// Static description of one mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Declared field name.
    pub name: &'static str,

    /// Alias from `#[data(alias = "...")]`.
    pub alias: Option<&'static str>,

    /// Declared field type as written in the source.
    pub type_name: &'static str,

    /// Declared kind.
    pub kind: FieldKind,

    /// `true` when the declared type is `Option<_>`.
    pub nullable: bool,

    /// Ignore annotations.
    pub ignore: Ignore
}

impl FieldDescriptor {
    /// Describe a non-nullable field without annotations.
    #[must_use]
    pub const fn new(name: &'static str, type_name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            alias: None,
            type_name,
            kind,
            nullable: false,
            ignore: Ignore::NONE
        }
    }

    /// Set the alias.
    #[must_use]
    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Mark the field as `Option<_>`.
    #[must_use]
    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the ignore flags.
    #[must_use]
    pub const fn with_ignore(mut self, ignore: Ignore) -> Self {
        self.ignore = ignore;
        self
    }

    /// Alias of the field, or an empty string if none.
    #[must_use]
    pub fn alias(&self) -> &'static str {
        self.alias.unwrap_or_default()
    }

    /// Alias if present and non-empty, otherwise the declared name.
    #[must_use]
    pub fn resolved_name(&self) -> &'static str {
        match self.alias {
            Some(alias) if !alias.is_empty() => alias,
            _ => self.name
        }
    }

    /// Check if the field is skipped when building parameters.
    #[must_use]
    pub const fn has_parameter_ignore(&self) -> bool {
        self.ignore.parameters
    }

    /// Check if the field is skipped when hydrating.
    #[must_use]
    pub const fn has_hydration_ignore(&self) -> bool {
        self.ignore.hydration
    }

    /// Check if a database null may be read into this field.
    #[must_use]
    pub const fn accepts_null(&self) -> bool {
        self.nullable || self.kind.is_reference()
    }

    /// Check if this field receives the given column during hydration.
    ///
    /// Only leaf fields that are not hydration-ignored match; the comparison
    /// against the resolved name is case-insensitive.
    #[must_use]
    pub fn matches_column(&self, column: &str) -> bool {
        self.kind.is_leaf() && !self.has_hydration_ignore() && names_match(self.resolved_name(), column)
    }
}

/// Static description of one mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    /// Display name of the type.
    pub name: &'static str,

    /// Fully qualified path, unique per type; used for cycle detection.
    pub path: &'static str,

    /// Fields in declaration order.
    pub fields: &'static [FieldDescriptor]
}

impl TypeDescriptor {
    /// Find the first field receiving the given column.
    ///
    /// Returns the field index in declaration order.
    #[must_use]
    pub fn find_column(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.matches_column(column))
    }

    /// Get a field descriptor by index.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&'static FieldDescriptor> {
        self.fields.get(index)
    }

    /// Resolved names of all fields in declaration order.
    pub fn resolved_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(FieldDescriptor::resolved_name)
    }
}

/// Case-insensitive name comparison used for aliases, columns and enum
/// members.
///
/// Compares Unicode lowercase mappings without allocating.
#[must_use]
pub fn names_match(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: FieldDescriptor = FieldDescriptor::new("name", "String", FieldKind::String);

    #[test]
    fn alias_defaults_to_empty() {
        assert_eq!(NAME.alias(), "");
        assert_eq!(NAME.resolved_name(), "name");
    }

    #[test]
    fn alias_overrides_name() {
        let field = NAME.with_alias("PersonName");
        assert_eq!(field.alias(), "PersonName");
        assert_eq!(field.resolved_name(), "PersonName");
    }

    #[test]
    fn empty_alias_falls_back_to_name() {
        let field = NAME.with_alias("");
        assert_eq!(field.resolved_name(), "name");
    }

    #[test]
    fn ignore_both_sets_both_directions() {
        let field = NAME.with_ignore(Ignore::BOTH);
        assert!(field.has_parameter_ignore());
        assert!(field.has_hydration_ignore());
    }

    #[test]
    fn ignore_single_direction() {
        let parameters = NAME.with_ignore(Ignore::PARAMETERS);
        assert!(parameters.has_parameter_ignore());
        assert!(!parameters.has_hydration_ignore());

        let hydration = NAME.with_ignore(Ignore::HYDRATION);
        assert!(!hydration.has_parameter_ignore());
        assert!(hydration.has_hydration_ignore());
    }

    #[test]
    fn no_annotations_means_not_ignored() {
        assert!(!NAME.has_parameter_ignore());
        assert!(!NAME.has_hydration_ignore());
    }

    #[test]
    fn accepts_null_for_reference_kinds_and_options() {
        assert!(NAME.accepts_null());
        let age = FieldDescriptor::new("age", "i32", FieldKind::Int32);
        assert!(!age.accepts_null());
        assert!(age.with_nullable(true).accepts_null());
        let status = FieldDescriptor::new("status", "Status", FieldKind::Enum);
        assert!(!status.accepts_null());
    }

    #[test]
    fn matches_column_case_insensitive() {
        assert!(NAME.matches_column("NAME"));
        assert!(NAME.matches_column("Name"));
        assert!(!NAME.matches_column("names"));
    }

    #[test]
    fn matches_column_uses_alias_only() {
        let field = NAME.with_alias("full_name");
        assert!(field.matches_column("FULL_NAME"));
        assert!(!field.matches_column("name"));
    }

    #[test]
    fn records_and_ignored_fields_never_match() {
        let address = FieldDescriptor::new("address", "Address", FieldKind::Record);
        assert!(!address.matches_column("address"));
        let hidden = NAME.with_ignore(Ignore::HYDRATION);
        assert!(!hidden.matches_column("name"));
    }

    #[test]
    fn names_match_unicode() {
        assert!(names_match("ÉCOLE", "école"));
        assert!(!names_match("a", "ab"));
    }

    #[test]
    fn find_column_returns_first_match() {
        static FIELDS: [FieldDescriptor; 2] = [
            FieldDescriptor::new("id", "i32", FieldKind::Int32),
            FieldDescriptor::new("Id", "i64", FieldKind::Int64)
        ];
        let descriptor = TypeDescriptor {
            name:   "Twin",
            path:   "tests::Twin",
            fields: &FIELDS
        };
        assert_eq!(descriptor.find_column("ID"), Some(0));
        assert_eq!(descriptor.find_column("missing"), None);
        assert_eq!(descriptor.resolved_names().collect::<Vec<_>>(), ["id", "Id"]);
    }

    #[test]
    fn kind_display() {
        assert_eq!(FieldKind::DateTime.to_string(), "datetime");
        assert!(FieldKind::Enum.is_leaf());
        assert!(!FieldKind::Collection.is_leaf());
        assert!(!FieldKind::Unmapped.is_leaf());
        assert!(FieldKind::Unmapped.is_reference());
    }
}

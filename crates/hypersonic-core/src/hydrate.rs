// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type hydrator: populates an object graph from one row.
//!
//! # Algorithm
//!
//! 1. Build the node tree: the target plus every nested record field that is
//!    not `#[data(ignore_hydration)]`, instantiated with its default, in
//!    pre-order.
//! 2. For each column in reader order, the first node (tree order) with a
//!    leaf field whose alias or name equals the column, ignoring case,
//!    receives it. Later nodes never see that column.
//! 3. A null cell is skipped when the field accepts null and fails with
//!    [`Error::NonNullableFieldReceivedNull`] otherwise.
//! 4. Other cells are converted per the field's declared kind and assigned.
//! 5. Columns that match nothing are ignored.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut reader = NullableReader::new(rows);
//! while reader.read()? {
//!     let person: Person = hydrate(&reader)?;
//! }
//! ```

use tracing::trace;

use crate::{
    descriptor::{FieldKind, TypeDescriptor},
    error::{Error, Result},
    reader::DataRecord,
    record::{Hydrate, Record}
};

/// One record in the hydration tree.
///
/// `path` holds the field indices leading from the root to this record.
#[derive(Debug)]
struct Node {
    path:       Vec<usize>,
    descriptor: &'static TypeDescriptor
}

/// Create a `T` from the current row.
///
/// # Errors
///
/// - [`Error::NonNullableFieldReceivedNull`] for a null in a value field
/// - [`Error::Coercion`] when a cell cannot be converted
/// - [`Error::CyclicGraphDetected`] when `T` contains itself
/// - [`Error::NoCurrentRow`] when the cursor is not on a row
pub fn hydrate<T, R>(record: &R) -> Result<T>
where
    T: Hydrate,
    R: DataRecord + ?Sized
{
    let mut target = T::default();
    populate(&mut target, record)?;
    Ok(target)
}

/// Populate an existing record from the current row.
///
/// Fields with no matching column, and nullable fields receiving null, keep
/// their current value.
///
/// # Errors
///
/// See [`hydrate`].
pub fn populate<R>(target: &mut dyn Record, record: &R) -> Result<()>
where
    R: DataRecord + ?Sized
{
    let nodes = build_tree(target)?;

    for ordinal in 0..record.field_count() {
        let Some(column) = record.name(ordinal) else {
            continue;
        };
        let Some((node, index)) = nodes
            .iter()
            .find_map(|node| node.descriptor.find_column(column).map(|index| (node, index)))
        else {
            trace!(column, "column has no matching field");
            continue;
        };
        let field = &node.descriptor.fields[index];

        let value = record.value_at(ordinal).ok_or(Error::NoCurrentRow)?;
        if value.is_null() {
            if field.accepts_null() {
                continue;
            }
            return Err(Error::NonNullableFieldReceivedNull {
                field:     field.name,
                type_name: field.type_name
            });
        }

        let Some(owner) = node_mut(&mut *target, &node.path) else {
            continue;
        };
        owner
            .assign(index, value.clone())
            .map_err(|source| Error::Coercion {
                field: field.name.to_owned(),
                source
            })?;
    }

    Ok(())
}

fn build_tree(root: &mut dyn Record) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut ancestors = Vec::new();
    visit(root, Vec::new(), &mut ancestors, &mut nodes)?;
    Ok(nodes)
}

fn visit(
    record: &mut dyn Record,
    path: Vec<usize>,
    ancestors: &mut Vec<&'static str>,
    nodes: &mut Vec<Node>
) -> Result<()> {
    let descriptor = record.descriptor();
    ancestors.push(descriptor.path);
    nodes.push(Node {
        path: path.clone(),
        descriptor
    });

    for (index, field) in descriptor.fields.iter().enumerate() {
        if field.kind != FieldKind::Record || field.has_hydration_ignore() {
            continue;
        }
        let Some(nested) = record.prepare_nested(index) else {
            continue;
        };
        let nested_descriptor = nested.descriptor();
        if ancestors.contains(&nested_descriptor.path) {
            return Err(Error::CyclicGraphDetected {
                type_name: nested_descriptor.name,
                field:     field.name
            });
        }
        let mut child = path.clone();
        child.push(index);
        visit(nested, child, ancestors, nodes)?;
    }

    ancestors.pop();
    Ok(())
}

fn node_mut<'r>(root: &'r mut dyn Record, path: &[usize]) -> Option<&'r mut dyn Record> {
    path.iter()
        .try_fold(root, |node, &index| node.prepare_nested(index))
}

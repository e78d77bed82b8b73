// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type inspection helpers shared by the derives.

use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

/// Standard library collections recognised by last path segment.
const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "HashMap",
    "BTreeMap",
    "BinaryHeap"
];

/// Source text of a type with token spacing removed.
///
/// `Option < Vec < u8 > >` becomes `Option<Vec<u8>>`; spaces between two
/// words (`dyn Trait`, `'a str`) are kept.
pub fn type_name(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let before = out.chars().last().is_some_and(is_word);
            let after = chars.get(i + 1).is_some_and(|&n| is_word(n) || n == '\'');
            if before && after {
                out.push(' ');
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check if a field type is a collection, looking through `Option` and
/// `Box`.
///
/// `Vec<u8>` is a byte buffer, not a collection.
pub fn is_collection(ty: &Type) -> bool {
    match ty {
        Type::Array(_) | Type::Slice(_) => true,
        Type::Reference(reference) => is_collection(&reference.elem),
        Type::Group(group) => is_collection(&group.elem),
        Type::Paren(paren) => is_collection(&paren.elem),
        Type::Path(path) => {
            let Some(segment) = path.path.segments.last() else {
                return false;
            };
            let name = segment.ident.to_string();
            if name == "Option" || name == "Box" {
                return first_type_argument(&segment.arguments).is_some_and(is_collection);
            }
            if name == "Vec" {
                return !first_type_argument(&segment.arguments).is_some_and(is_u8);
            }
            COLLECTIONS.contains(&name.as_str())
        }
        _ => false
    }
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(arguments) = arguments else {
        return None;
    };
    arguments.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None
    })
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.path.is_ident("u8"))
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use hypersonic::prelude::*;

#[derive(Debug, Default, Record)]
pub struct Address {
    pub city: String,
}

#[derive(Debug, Default, Record)]
pub struct Node {
    pub label: String,
    #[data(ignore_parameter)]
    pub next: Option<Box<Node>>,
}

#[derive(Debug, Default, Record)]
#[record(name = "Customer")]
pub struct CustomerRow {
    pub name: String,
    pub home: Address,
    pub work: Option<Address>,
    pub head: Node,
    pub tags: Vec<String>,
    pub scores: HashMap<String, i32>,
    pub history: Option<Vec<Address>>,
}

fn main() {
    let customer = CustomerRow::default();
    let descriptor = customer.descriptor();
    assert_eq!(descriptor.name, "Customer");
    assert!(descriptor.path.ends_with("::CustomerRow"));
    assert_eq!(descriptor.fields[1].kind, FieldKind::Record);
    assert_eq!(descriptor.fields[4].kind, FieldKind::Collection);
    assert_eq!(descriptor.fields[6].kind, FieldKind::Collection);
    assert_eq!(descriptor.fields[2].type_name, "Option<Address>");
}

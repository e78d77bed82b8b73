// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::NaiveDateTime;
use hypersonic::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Default, Record)]
pub struct Account {
    pub id: Uuid,
    #[data(alias = "AccountName")]
    pub name: String,
    pub active: bool,
    pub level: u8,
    pub grade: char,
    pub small: i16,
    pub count: i32,
    pub total: i64,
    pub ratio: f32,
    pub score: f64,
    pub balance: Decimal,
    pub opened: NaiveDateTime,
    pub avatar: Vec<u8>,
    pub closed: Option<NaiveDateTime>,
    #[data(ignore_parameter)]
    pub row_version: i64,
    #[data(ignore_hydration)]
    pub audit_note: String,
    #[data(ignore)]
    pub cache: String,
}

fn main() {
    let descriptor = Account::default().descriptor();
    assert_eq!(descriptor.name, "Account");
    assert_eq!(descriptor.fields.len(), 17);
    assert_eq!(descriptor.fields[1].resolved_name(), "AccountName");
    assert!(descriptor.fields[13].nullable);

    let parameters = ParameterBuilder::new("@").build(&Account::default()).unwrap();
    assert_eq!(parameters.len(), 15);
    assert_eq!(parameters[1].name(), "@AccountName");
}

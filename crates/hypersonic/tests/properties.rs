// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Properties of flattening, hydration and null-aware reads.

use hypersonic::{
    BufferedRows, FieldKind, NullableReader, ParameterBuilder, Record, RowCursor, Value, coerce,
    hydrate
};
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Address {
    #[data(alias = "City")]
    city: String
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Person {
    name:    String,
    age:     Option<i32>,
    #[data(ignore)]
    secret:  String,
    address: Address
}

fn people() -> impl Strategy<Value = Person> {
    ("[a-zA-Z ]{0,12}", proptest::option::of(any::<i32>()), "[a-z]{0,8}", "[a-zA-Z]{1,10}")
        .prop_map(|(name, age, secret, city)| Person {
            name,
            age,
            secret,
            address: Address {
                city
            }
        })
}

/// Flip the case of letters at positions where `mask` has a set bit.
fn scramble_case(name: &str, mask: u32) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 32) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// A nullable accessor on a non-null cell behaves as `Some` of its plain
/// counterpart, failing exactly when the plain accessor fails.
fn agrees<T: PartialEq>(nullable: hypersonic::Result<Option<T>>, plain: hypersonic::Result<T>) -> bool {
    match (nullable, plain) {
        (Ok(nullable), Ok(plain)) => nullable == Some(plain),
        (Err(_), Err(_)) => true,
        _ => false
    }
}

proptest! {
    #[test]
    fn flattening_follows_declaration_order(person in people()) {
        let parameters = ParameterBuilder::new("@").build(&person).unwrap();
        let names: Vec<&str> = parameters.iter().map(|p| p.name()).collect();
        prop_assert_eq!(names, ["@name", "@age", "@City"]);
        prop_assert_eq!(parameters[0].value(), &Value::String(person.name.clone()));
        prop_assert_eq!(parameters[1].value(), &Value::from(person.age));
        prop_assert_eq!(parameters[2].value(), &Value::String(person.address.city.clone()));
    }

    #[test]
    fn hydration_ignores_column_case(person in people(), mask in any::<u32>()) {
        let columns = ["name", "age", "City"].map(|c| scramble_case(c, mask));
        let mut rows = BufferedRows::new(
            columns.to_vec(),
            vec![vec![
                Value::String(person.name.clone()),
                Value::from(person.age),
                Value::String(person.address.city.clone()),
            ]]
        );
        prop_assert!(rows.read().unwrap());
        let hydrated: Person = hydrate(&rows).unwrap();
        prop_assert_eq!(hydrated.name, person.name);
        prop_assert_eq!(hydrated.age, person.age);
        prop_assert_eq!(hydrated.address.city, person.address.city);
        prop_assert_eq!(hydrated.secret, "");
    }

    #[test]
    fn nullable_accessors_never_fail_on_null(ordinal in 0usize..4) {
        let mut row = vec![Value::Int32(1), Value::from("x"), Value::Double(1.5), Value::Bool(true)];
        row[ordinal] = Value::Null;
        let columns = ["a", "b", "c", "d"].map(String::from).to_vec();
        let mut reader = NullableReader::new(BufferedRows::new(columns, vec![row]));
        prop_assert!(reader.read().unwrap());

        prop_assert!(reader.is_null_at(ordinal).unwrap());
        prop_assert_eq!(reader.get_nullable_int32_at(ordinal).unwrap(), None);
        prop_assert_eq!(reader.get_nullable_string_at(ordinal).unwrap(), None);
        prop_assert_eq!(reader.get_nullable_double_at(ordinal).unwrap(), None);
        prop_assert_eq!(reader.get_nullable_bool_at(ordinal).unwrap(), None);
        prop_assert!(reader.get_int32_at(ordinal).is_err());

        for other in (0..4).filter(|&i| i != ordinal) {
            prop_assert!(!reader.is_null_at(other).unwrap());
            prop_assert!(agrees(reader.get_nullable_int32_at(other), reader.get_int32_at(other)));
            prop_assert!(agrees(reader.get_nullable_string_at(other), reader.get_string_at(other)));
            prop_assert!(agrees(reader.get_nullable_double_at(other), reader.get_double_at(other)));
            prop_assert!(agrees(reader.get_nullable_bool_at(other), reader.get_bool_at(other)));
        }
        if ordinal != 0 {
            prop_assert_eq!(reader.get_nullable_int32_at(0).unwrap(), Some(1));
        }
        if ordinal != 1 {
            prop_assert_eq!(reader.get_nullable_string_at(1).unwrap(), Some("x".to_owned()));
        }
        if ordinal != 2 {
            prop_assert_eq!(reader.get_nullable_double_at(2).unwrap(), Some(1.5));
        }
        if ordinal != 3 {
            prop_assert_eq!(reader.get_nullable_bool_at(3).unwrap(), Some(true));
        }
    }

    #[test]
    fn narrowing_is_range_checked(n in any::<i64>()) {
        let result = coerce(Value::Int64(n), FieldKind::Int32);
        match i32::try_from(n) {
            Ok(expected) => prop_assert_eq!(result.unwrap(), Value::Int32(expected)),
            Err(_) => prop_assert!(result.is_err())
        }
    }
}

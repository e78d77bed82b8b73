// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::time::Duration;

use hypersonic::{BufferedRows, hydrate, prelude::*};

#[derive(Debug, Default, PartialEq)]
pub struct Handle {
    pub slot: u32,
}

#[derive(Debug, Default, Record)]
pub struct Session {
    pub name: String,
    #[data(ignore)]
    pub ttl: Duration,
    #[data(ignore)]
    pub handle: Handle,
}

fn main() {
    let descriptor = Session::default().descriptor();
    assert_eq!(descriptor.fields.len(), 3);
    assert_eq!(descriptor.fields[1].kind, FieldKind::Unmapped);
    assert_eq!(descriptor.fields[2].kind, FieldKind::Unmapped);

    let session = Session {
        name: "s1".to_owned(),
        ttl: Duration::from_secs(30),
        handle: Handle { slot: 7 },
    };
    let parameters = ParameterBuilder::new("@").build(&session).unwrap();
    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].name(), "@name");

    let mut rows = BufferedRows::new(
        vec!["name".to_owned(), "ttl".to_owned(), "handle".to_owned()],
        vec![vec![Value::from("s2"), Value::Int64(5), Value::Int64(9)]],
    );
    assert!(rows.read().unwrap());
    let hydrated: Session = hydrate(&rows).unwrap();
    assert_eq!(hydrated.name, "s2");
    assert_eq!(hydrated.ttl, Duration::ZERO);
    assert_eq!(hydrated.handle, Handle::default());
}

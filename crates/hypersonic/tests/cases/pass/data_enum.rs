// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use hypersonic::prelude::*;

#[derive(Debug, Default, Clone, Copy, PartialEq, DataEnum)]
pub enum Priority {
    #[default]
    Low = 1,
    High = 10,
}

#[derive(Debug, Default, Record)]
pub struct Ticket {
    pub priority: Priority,
    pub escalation: Option<Priority>,
}

fn main() {
    assert_eq!(Priority::from_value(Value::from("HIGH")).unwrap(), Priority::High);
    assert_eq!(Priority::from_value(Value::Int64(1)).unwrap(), Priority::Low);
    assert!(Priority::from_value(Value::Int64(2)).is_err());

    let parameters = ParameterBuilder::new("@").build(&Ticket::default()).unwrap();
    assert_eq!(parameters[0].value(), &Value::from("Low"));
    assert_eq!(parameters[1].value(), &Value::Null);
}

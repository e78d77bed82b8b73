// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository facade.
//!
//! [`Repository`] combines the parameter builder, the gateway and the
//! hydrator behind two verbs:
//!
//! | Verb | By name | With args | Query | Query with hooks |
//! |------|---------|-----------|-------|------------------|
//! | read | [`get`](Repository::get) | [`get_with`](Repository::get_with) | [`get_query`](Repository::get_query) | [`get_with_events`](Repository::get_with_events) |
//! | write | [`execute`](Repository::execute) | [`execute_with`](Repository::execute_with) | [`execute_query`](Repository::execute_query) | [`execute_with_events`](Repository::execute_with_events) |
//!
//! Every entry point rejects an empty procedure name with
//! [`Error::MissingProcedureName`] before building parameters, running
//! hooks or opening a connection.
//!
//! # Example
//!
//! ```rust,ignore
//! let repository = Repository::<Sqlite>::from_config(&config, "main")?;
//! let adults: Vec<Person> = repository.get_with("GetPeopleOlderThan", &AgeFilter { age: 18 })?;
//! repository.execute_with("SavePerson", &person)?;
//! ```

use std::fmt;

use crate::{
    config::DatabaseConfig,
    database::Database,
    error::{Error, Result},
    hydrate::hydrate,
    parameters::Parameter,
    query::{Query, QueryWithEvents},
    record::{FieldType, Hydrate},
    vendor::Vendor
};

/// `get`/`execute` facade over a [`Database`].
pub struct Repository<V: Vendor> {
    database: Database<V>
}

impl<V: Vendor> Repository<V> {
    /// Wrap a gateway.
    #[must_use]
    pub const fn new(database: Database<V>) -> Self {
        Self {
            database
        }
    }

    /// Create a repository for the named connection string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConnectionString`] if the name is not
    /// configured.
    pub fn from_config(config: &DatabaseConfig, name: &str) -> Result<Self> {
        Database::new(config, name).map(Self::new)
    }

    /// Underlying gateway.
    #[must_use]
    pub const fn database(&self) -> &Database<V> {
        &self.database
    }

    /// Run a procedure without parameters and hydrate every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProcedureName`], a driver error or a hydration
    /// error.
    pub fn get<T: Hydrate>(&self, procedure: &str) -> Result<Vec<T>> {
        ensure_procedure(procedure)?;
        self.fetch(procedure, &[])
    }

    /// Run a procedure with parameters flattened from `args`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProcedureName`], a parameter build error, a
    /// driver error or a hydration error.
    pub fn get_with<T, P>(&self, procedure: &str, args: &P) -> Result<Vec<T>>
    where
        T: Hydrate,
        P: FieldType
    {
        ensure_procedure(procedure)?;
        let parameters = self.database.parameters(args)?;
        self.fetch(procedure, &parameters)
    }

    /// Run a prepared query.
    ///
    /// # Errors
    ///
    /// See [`Repository::get`].
    pub fn get_query<T: Hydrate>(&self, query: &Query) -> Result<Vec<T>> {
        ensure_procedure(query.procedure())?;
        self.fetch(query.procedure(), query.parameters())
    }

    /// Run a query, raising its hooks around execution.
    ///
    /// Post-execution hooks receive the hydrated rows and run only on
    /// success.
    ///
    /// # Errors
    ///
    /// See [`Repository::get`].
    pub fn get_with_events<T: Hydrate>(&self, query: &QueryWithEvents<'_, Vec<T>>) -> Result<Vec<T>> {
        let inner = query.query();
        ensure_procedure(inner.procedure())?;
        query.raise_pre_execution();
        let items = self.fetch(inner.procedure(), inner.parameters())?;
        query.raise_post_execution(&items);
        Ok(items)
    }

    /// Run a procedure and hydrate a single row.
    ///
    /// When several rows come back the last one wins; `None` when there are
    /// none.
    ///
    /// # Errors
    ///
    /// See [`Repository::get_with`].
    pub fn get_one<T, P>(&self, procedure: &str, args: &P) -> Result<Option<T>>
    where
        T: Hydrate,
        P: FieldType
    {
        ensure_procedure(procedure)?;
        let parameters = self.database.parameters(args)?;
        self.database
            .populate_item(procedure, &parameters, None, |row| hydrate(row))
    }

    /// Run a procedure without parameters and return rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProcedureName`] or a driver error.
    pub fn execute(&self, procedure: &str) -> Result<usize> {
        ensure_procedure(procedure)?;
        self.database.non_query(procedure, &[], None)
    }

    /// Run a procedure with parameters flattened from `args`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProcedureName`], a parameter build error or a
    /// driver error.
    pub fn execute_with<P: FieldType>(&self, procedure: &str, args: &P) -> Result<usize> {
        ensure_procedure(procedure)?;
        let parameters = self.database.parameters(args)?;
        self.database.non_query(procedure, &parameters, None)
    }

    /// Run a prepared query as a non-query.
    ///
    /// # Errors
    ///
    /// See [`Repository::execute`].
    pub fn execute_query(&self, query: &Query) -> Result<usize> {
        ensure_procedure(query.procedure())?;
        self.database
            .non_query(query.procedure(), query.parameters(), None)
    }

    /// Run a query as a non-query, raising its hooks around execution.
    ///
    /// # Errors
    ///
    /// See [`Repository::execute`].
    pub fn execute_with_events(&self, query: &QueryWithEvents<'_, usize>) -> Result<usize> {
        let inner = query.query();
        ensure_procedure(inner.procedure())?;
        query.raise_pre_execution();
        let affected = self
            .database
            .non_query(inner.procedure(), inner.parameters(), None)?;
        query.raise_post_execution(&affected);
        Ok(affected)
    }

    fn fetch<T: Hydrate>(&self, procedure: &str, parameters: &[Parameter]) -> Result<Vec<T>> {
        self.database.auto_populate(procedure, parameters, None)
    }
}

fn ensure_procedure(procedure: &str) -> Result<()> {
    if procedure.is_empty() {
        return Err(Error::MissingProcedureName);
    }
    Ok(())
}

impl<V: Vendor> Clone for Repository<V> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone()
        }
    }
}

impl<V: Vendor> fmt::Debug for Repository<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("database", &self.database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::{
        fixtures::{Address, Customer, Person, Scripted, script_rows, take_events},
        value::Value
    };

    fn repository() -> Repository<Scripted> {
        take_events();
        let config = DatabaseConfig::new().with_connection_string("main", "scripted");
        Repository::from_config(&config, "").unwrap()
    }

    fn ann() -> Customer {
        Customer {
            name:    "Ann".to_string(),
            address: Address {
                city: "Omaha".to_string()
            }
        }
    }

    #[test]
    fn empty_procedure_is_rejected_everywhere() {
        let repository = repository();
        let fired = Cell::new(false);
        assert!(matches!(
            repository.get::<Person>(""),
            Err(Error::MissingProcedureName)
        ));
        assert!(matches!(
            repository.get_with::<Person, _>("", &ann()),
            Err(Error::MissingProcedureName)
        ));
        assert!(matches!(
            repository.execute(""),
            Err(Error::MissingProcedureName)
        ));
        assert!(matches!(
            repository.execute_query(&Query::default()),
            Err(Error::MissingProcedureName)
        ));
        let query = QueryWithEvents::new(Query::new("")).on_pre_execution(|_| fired.set(true));
        assert!(matches!(
            repository.execute_with_events(&query),
            Err(Error::MissingProcedureName)
        ));
        assert!(!fired.get());
        assert!(take_events().is_empty());
    }

    #[test]
    fn get_hydrates_rows() {
        let repository = repository();
        script_rows(
            &["Name", "Age"],
            vec![vec![Value::from("Ann"), Value::Int64(41)]]
        );
        let people: Vec<Person> = repository.get("GetPeople").unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].age, 41);
        assert_eq!(take_events(), ["open", "query GetPeople", "close"]);
    }

    #[test]
    fn execute_with_flattens_args() {
        let affected = repository().execute_with("SaveCustomer", &ann()).unwrap();
        assert_eq!(affected, 2);
    }

    #[test]
    fn get_one_returns_last_row() {
        script_rows(
            &["Name", "Age"],
            vec![
                vec![Value::from("Ann"), Value::Int64(41)],
                vec![Value::from("Bob"), Value::Int64(35)],
            ]
        );
        let person: Option<Person> = repository().get_one("GetPerson", &ann()).unwrap();
        assert_eq!(person.map(|p| p.name), Some("Bob".to_string()));
    }

    #[test]
    fn events_wrap_execution() {
        let repository = repository();
        script_rows(&["Name", "Age"], vec![vec![Value::from("Ann"), Value::Int32(1)]]);
        let log = RefCell::new(Vec::new());
        let query = QueryWithEvents::new(Query::new("GetPeople"))
            .on_pre_execution(|parameters| log.borrow_mut().push(format!("pre {}", parameters.len())))
            .on_post_execution(|_, people: &Vec<Person>| {
                log.borrow_mut().push(format!("post {}", people.len()));
            });
        let people = repository.get_with_events(&query).unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(*log.borrow(), ["pre 0", "post 1"]);
    }

    #[test]
    fn failed_execution_skips_post_hooks() {
        let config = DatabaseConfig::new().with_connection_string("main", "execute");
        let repository = Repository::<Scripted>::from_config(&config, "main").unwrap();
        let pre = Cell::new(0);
        let post = Cell::new(0);
        let query = QueryWithEvents::new(Query::new("Broken"))
            .on_pre_execution(|_| pre.set(pre.get() + 1))
            .on_post_execution(|_, _: &usize| post.set(post.get() + 1));
        assert!(repository.execute_with_events(&query).is_err());
        assert_eq!((pre.get(), post.get()), (1, 0));
    }

    #[test]
    fn get_query_uses_prepared_parameters() {
        let repository = repository();
        script_rows(&["Name"], vec![]);
        let query = Query::with_parameters("FindCustomers", repository.database().builder(), &ann()).unwrap();
        let people: Vec<Person> = repository.get_query(&query).unwrap();
        assert!(people.is_empty());
        assert_eq!(query.parameters()[0].name(), ":Name");
    }

    #[test]
    fn missing_nested_record_fails_before_connecting() {
        let repository = repository();
        let err = repository
            .execute_with("SavePerson", &Person::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingRequiredNestedParameter { .. }));
        assert!(take_events().is_empty());
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Query objects.
//!
//! A [`Query`] pairs a procedure name with prepared parameters.
//! [`QueryWithEvents`] adds pre- and post-execution hooks, the seam for
//! cross-cutting logic such as auditing or caching:
//!
//! ```text
//! Repository::get_with_events(&query)
//! │
//! ├── raise_pre_execution(parameters)
//! ├── execute + hydrate                → result
//! └── raise_post_execution(parameters, &result)
//! ```
//!
//! Hooks run in registration order. A failed execution skips the post hooks.

use std::fmt;

use crate::{
    error::Result,
    parameters::{Parameter, ParameterBuilder},
    record::FieldType
};

/// Procedure name plus parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    procedure:  String,
    parameters: Vec<Parameter>
}

impl Query {
    /// Create a query without parameters.
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure:  procedure.into(),
            parameters: Vec::new()
        }
    }

    /// Create a query with parameters flattened from `args`.
    ///
    /// # Errors
    ///
    /// See [`ParameterBuilder::build`].
    pub fn with_parameters<P: FieldType>(
        procedure: impl Into<String>,
        builder: &ParameterBuilder,
        args: &P
    ) -> Result<Self> {
        Ok(Self {
            procedure:  procedure.into(),
            parameters: builder.build(args)?
        })
    }

    /// Append one parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Replace the parameters.
    pub fn set_parameters(&mut self, parameters: Vec<Parameter>) {
        self.parameters = parameters;
    }

    /// Procedure name or command text.
    #[must_use]
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Parameters in execution order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

type PreHook<'h> = Box<dyn Fn(&[Parameter]) + 'h>;
type PostHook<'h, R> = Box<dyn Fn(&[Parameter], &R) + 'h>;

/// A [`Query`] with execution hooks.
///
/// `R` is the result type handed to post-execution hooks: `Vec<T>` for
/// [`Repository::get_with_events`](crate::Repository::get_with_events),
/// `usize` for
/// [`Repository::execute_with_events`](crate::Repository::execute_with_events).
///
/// # Example
///
/// ```rust,ignore
/// let audit = RefCell::new(Vec::new());
/// let query = QueryWithEvents::new(Query::new("GetPeople"))
///     .on_pre_execution(|parameters| audit.borrow_mut().push(parameters.len()))
///     .on_post_execution(|_, people: &Vec<Person>| cache.store(people));
/// let people = repository.get_with_events(&query)?;
/// ```
pub struct QueryWithEvents<'h, R> {
    query: Query,
    pre:   Vec<PreHook<'h>>,
    post:  Vec<PostHook<'h, R>>
}

impl<'h, R> QueryWithEvents<'h, R> {
    /// Wrap a query with no hooks.
    #[must_use]
    pub fn new(query: Query) -> Self {
        Self {
            query,
            pre: Vec::new(),
            post: Vec::new()
        }
    }

    /// Register a hook run before execution.
    #[must_use]
    pub fn on_pre_execution(mut self, hook: impl Fn(&[Parameter]) + 'h) -> Self {
        self.pre.push(Box::new(hook));
        self
    }

    /// Register a hook run after successful execution.
    #[must_use]
    pub fn on_post_execution(mut self, hook: impl Fn(&[Parameter], &R) + 'h) -> Self {
        self.post.push(Box::new(hook));
        self
    }

    /// Wrapped query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Run every pre-execution hook.
    pub fn raise_pre_execution(&self) {
        for hook in &self.pre {
            hook(self.query.parameters());
        }
    }

    /// Run every post-execution hook with the result.
    pub fn raise_post_execution(&self, result: &R) {
        for hook in &self.post {
            hook(self.query.parameters(), result);
        }
    }
}

impl<R> From<Query> for QueryWithEvents<'_, R> {
    fn from(query: Query) -> Self {
        Self::new(query)
    }
}

impl<R> fmt::Debug for QueryWithEvents<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryWithEvents")
            .field("query", &self.query)
            .field("pre_hooks", &self.pre.len())
            .field("post_hooks", &self.post.len())
            .finish()
    }
}

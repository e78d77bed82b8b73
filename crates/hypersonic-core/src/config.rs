// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Connection configuration.
//!
//! [`DatabaseConfig`] is built once at startup and passed to
//! [`Database::new`](crate::Database::new); there is no global lookup.
//! Entries keep their order, so an empty name selects the first configured
//! connection string.
//!
//! # TOML
//!
//! ```toml
//! command_kind = "stored_procedure"   # or "text"
//!
//! [[connection_strings]]
//! name = "main"
//! connection_string = "app.db"
//!
//! [[connection_strings]]
//! name = "reporting"
//! connection_string = "reports.db"
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::{
    error::{Error, Result},
    vendor::CommandKind
};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The TOML document is malformed or has the wrong shape.
    #[error("invalid database configuration: {0}")]
    Toml(#[from] toml::de::Error)
}

/// One named connection string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionString {
    /// Name used to select the entry.
    pub name:              String,
    /// Vendor-specific connection string.
    pub connection_string: String
}

/// Named connection strings plus gateway defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    connection_strings: Vec<ConnectionString>,
    command_kind:       CommandKind
}

impl DatabaseConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed input.
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Add a connection string.
    ///
    /// A later entry with the same name is never selected; the first one
    /// wins.
    #[must_use]
    pub fn with_connection_string(
        mut self,
        name: impl Into<String>,
        connection_string: impl Into<String>
    ) -> Self {
        self.connection_strings.push(ConnectionString {
            name:              name.into(),
            connection_string: connection_string.into()
        });
        self
    }

    /// Set the default command kind for gateways built from this config.
    #[must_use]
    pub const fn with_command_kind(mut self, kind: CommandKind) -> Self {
        self.command_kind = kind;
        self
    }

    /// Default command kind.
    #[must_use]
    pub const fn command_kind(&self) -> CommandKind {
        self.command_kind
    }

    /// All entries in configuration order.
    #[must_use]
    pub fn connection_strings(&self) -> &[ConnectionString] {
        &self.connection_strings
    }

    /// Look up a connection string by name.
    ///
    /// An empty name selects the first entry. Names compare exactly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConnectionString`] when no entry matches or
    /// the matching entry is empty.
    pub fn connection_string(&self, name: &str) -> Result<&ConnectionString> {
        let entry = if name.is_empty() {
            self.connection_strings.first()
        } else {
            self.connection_strings.iter().find(|entry| entry.name == name)
        };
        entry
            .filter(|entry| !entry.connection_string.trim().is_empty())
            .ok_or_else(|| Error::MissingConnectionString {
                name: name.to_owned()
            })
    }
}

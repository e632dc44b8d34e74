//! Database connection configuration.

use crate::driver::{Formatter, Options};

/// Where and how to connect, minus the credentials.
///
/// The credentials come from a [`CredentialStore`](crate::CredentialStore)
/// on every attempt; everything else about the DSN comes from here.
///
/// ## Default Values
///
/// - `database`: empty (the server's default database)
/// - `options`: none
/// - `max_retries`: 1
/// - `formatter`: none (use the driver's dialect formatter)
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::ConnectionConfig;
///
/// let config = ConnectionConfig::builder()
///     .host("db.internal")
///     .port(5432)
///     .database("orders")
///     .max_retries(2)
///     .build()
///     .with_option("sslmode", "require");
///
/// assert_eq!(config.options["sslmode"], "require");
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct ConnectionConfig {
    /// Database host name or address.
    #[builder(into)]
    pub host: String,

    /// Database port.
    pub port: u16,

    /// Database name.
    #[builder(into, default)]
    pub database: String,

    /// Dialect-specific connection options.
    #[builder(default)]
    pub options: Options,

    /// Extra attempts with refreshed credentials after an authentication
    /// failure. The connector treats 0 as 1.
    #[builder(default = 1)]
    pub max_retries: u32,

    /// Overrides the driver's DSN formatter.
    pub formatter: Option<Formatter>,
}

impl ConnectionConfig {
    /// Creates a configuration with default values for everything but the
    /// address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::builder().host(host).port(port).build()
    }

    /// Sets the database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Adds or replaces one connection option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the number of refresh-and-retry attempts.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overrides the DSN formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

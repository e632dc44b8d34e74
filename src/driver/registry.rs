//! Driver registry and dialect bundles.

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;

use super::{
    AuthErrorClassifier, Driver, Formatter, mysql_auth_error, mysql_formatter, pg_formatter,
    postgres_auth_error,
};
use crate::{Error, ErrorKind};

/// Registry name of the MySQL dialect.
pub const MYSQL_DRIVER: &str = "mysql";

/// Registry name of the PostgreSQL dialect, as used by `pgx`-style drivers.
pub const PGX_DRIVER: &str = "pgx";

/// Registry name of the PostgreSQL dialect, as used by `pq`-style drivers.
pub const PQ_DRIVER: &str = "pq";

/// A factory producing a fresh [`DriverBundle`] on each call.
pub type DriverFactory<C> = Arc<dyn Fn() -> DriverBundle<C> + Send + Sync>;

/// Everything a connector needs to talk to one kind of database: the driver,
/// the DSN formatter and the auth error classifier.
///
/// A bundle is immutable once built.
pub struct DriverBundle<C> {
    driver: Arc<dyn Driver<C>>,
    formatter: Formatter,
    auth_error: AuthErrorClassifier,
}

impl<C> DriverBundle<C> {
    /// Creates a bundle from a driver and its dialect functions.
    pub fn new<D>(driver: D, formatter: Formatter, auth_error: AuthErrorClassifier) -> Self
    where
        D: Driver<C> + 'static,
    {
        Self::from_arc(Arc::new(driver), formatter, auth_error)
    }

    /// Creates a bundle around an already shared driver.
    pub fn from_arc(
        driver: Arc<dyn Driver<C>>,
        formatter: Formatter,
        auth_error: AuthErrorClassifier,
    ) -> Self {
        Self {
            driver,
            formatter,
            auth_error,
        }
    }

    /// Returns the driver.
    pub fn driver(&self) -> &Arc<dyn Driver<C>> {
        &self.driver
    }

    /// Returns a copy of the bundle that formats DSNs with `formatter`.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Returns the DSN formatter.
    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    /// Returns the auth error classifier.
    pub fn auth_error(&self) -> AuthErrorClassifier {
        self.auth_error
    }
}

impl<C> Clone for DriverBundle<C> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            formatter: self.formatter,
            auth_error: self.auth_error,
        }
    }
}

impl<C> fmt::Debug for DriverBundle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverBundle").finish_non_exhaustive()
    }
}

/// The formatter and classifier of a database dialect.
///
/// A dialect plus a driver makes a [`DriverBundle`].
///
/// ```rust
/// use db_credential_refresh::Dialect;
/// use db_credential_refresh::driver::Options;
///
/// let dsn = (Dialect::MYSQL.formatter())("foo", "bar", "localhost", 3306, "test", &Options::new());
/// assert_eq!(dsn, "foo:bar@tcp(localhost:3306)/test");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    formatter: Formatter,
    auth_error: AuthErrorClassifier,
}

impl Dialect {
    /// MySQL DSN format and `Access denied` detection.
    pub const MYSQL: Dialect = Dialect::new(mysql_formatter, mysql_auth_error);

    /// PostgreSQL URI format and `password authentication failed` detection.
    pub const POSTGRES: Dialect = Dialect::new(pg_formatter, postgres_auth_error);

    /// Creates a custom dialect.
    pub const fn new(formatter: Formatter, auth_error: AuthErrorClassifier) -> Self {
        Self {
            formatter,
            auth_error,
        }
    }

    /// Returns the DSN formatter.
    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    /// Returns the auth error classifier.
    pub fn auth_error(&self) -> AuthErrorClassifier {
        self.auth_error
    }

    /// Pairs the dialect with a driver.
    pub fn bundle<C, D>(self, driver: D) -> DriverBundle<C>
    where
        D: Driver<C> + 'static,
    {
        DriverBundle::new(driver, self.formatter, self.auth_error)
    }

    /// Pairs the dialect with an already shared driver.
    pub fn bundle_arc<C>(self, driver: Arc<dyn Driver<C>>) -> DriverBundle<C> {
        DriverBundle::from_arc(driver, self.formatter, self.auth_error)
    }
}

/// The drivers backing the built-in dialect names.
///
/// Pass to [`Registry::with_builtin_dialects`]. Names whose driver is not
/// supplied are left unregistered.
pub struct BuiltinDrivers<C> {
    mysql: Option<Arc<dyn Driver<C>>>,
    postgres: Option<Arc<dyn Driver<C>>>,
}

impl<C> BuiltinDrivers<C> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            mysql: None,
            postgres: None,
        }
    }

    /// Sets the driver registered as `"mysql"`.
    #[must_use]
    pub fn mysql<D>(mut self, driver: D) -> Self
    where
        D: Driver<C> + 'static,
    {
        self.mysql = Some(Arc::new(driver));
        self
    }

    /// Sets the driver registered as `"pgx"` and `"pq"`.
    #[must_use]
    pub fn postgres<D>(mut self, driver: D) -> Self
    where
        D: Driver<C> + 'static,
    {
        self.postgres = Some(Arc::new(driver));
        self
    }
}

impl<C> Default for BuiltinDrivers<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for BuiltinDrivers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinDrivers")
            .field("mysql", &self.mysql.is_some())
            .field("postgres", &self.postgres.is_some())
            .finish()
    }
}

/// A name to driver factory map.
///
/// Registration never overwrites: the first factory registered under a name
/// wins. Build one registry at process start (usually with
/// [`with_builtin_dialects`](Registry::with_builtin_dialects)) and share it;
/// tests build their own.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::{BuiltinDrivers, ErrorKind, Registry};
/// use db_credential_refresh::testing::{MockConnection, MockDriver};
///
/// let registry: Registry<MockConnection> = Registry::with_builtin_dialects(
///     BuiltinDrivers::new()
///         .mysql(MockDriver::new())
///         .postgres(MockDriver::new()),
/// );
///
/// assert_eq!(registry.names(), vec!["mysql", "pgx", "pq"]);
///
/// let err = registry.resolve("sqlite").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidDriver);
/// assert_eq!(err.message(), "invalid driver name, must be one of: mysql, pgx, pq");
/// ```
pub struct Registry<C> {
    factories: RwLock<HashMap<String, DriverFactory<C>>>,
}

impl<C: 'static> Registry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry with the built-in dialect names bound to the
    /// supplied drivers: `"mysql"` to the MySQL dialect, `"pgx"` and `"pq"`
    /// to the PostgreSQL dialect.
    pub fn with_builtin_dialects(drivers: BuiltinDrivers<C>) -> Self {
        let registry = Self::new();
        let mut entries: Vec<(&str, DriverFactory<C>)> = Vec::new();

        if let Some(driver) = drivers.mysql {
            entries.push((MYSQL_DRIVER, dialect_factory(Dialect::MYSQL, driver)));
        }
        if let Some(driver) = drivers.postgres {
            entries.push((
                PGX_DRIVER,
                dialect_factory(Dialect::POSTGRES, Arc::clone(&driver)),
            ));
            entries.push((PQ_DRIVER, dialect_factory(Dialect::POSTGRES, driver)));
        }

        registry.register_all(entries);
        registry
    }

    /// Registers `factory` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::AlreadyRegistered`] if `name` is taken. The
    /// existing factory is kept; callers may log and ignore the error.
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> Result<(), Error>
    where
        F: Fn() -> DriverBundle<C> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            return Err(Error::new(
                ErrorKind::AlreadyRegistered,
                format!("driver factory {} already registered, ignoring", name),
            ));
        }
        tracing::debug!(driver = %name, "registered driver factory");
        factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Registers every entry whose name is not yet taken.
    ///
    /// Taken names are skipped, so calling this twice with the same entries
    /// is harmless.
    pub fn register_all<I, N>(&self, entries: I)
    where
        I: IntoIterator<Item = (N, DriverFactory<C>)>,
        N: Into<String>,
    {
        let mut factories = self.factories.write();
        for (name, factory) in entries {
            let name = name.into();
            if factories.contains_key(&name) {
                tracing::debug!(driver = %name, "driver factory already registered, skipping");
                continue;
            }
            tracing::debug!(driver = %name, "registered driver factory");
            factories.insert(name, factory);
        }
    }

    /// Builds the bundle registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidDriver`] listing the registered names if
    /// `name` is unknown.
    pub fn resolve(&self, name: &str) -> Result<DriverBundle<C>, Error> {
        let factory = self.factories.read().get(name).cloned();
        match factory {
            Some(factory) => Ok(factory()),
            None => Err(Error::new(
                ErrorKind::InvalidDriver,
                format!(
                    "invalid driver name, must be one of: {}",
                    self.names().join(", ")
                ),
            )),
        }
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Removes every registration.
    pub fn clear(&self) {
        self.factories.write().clear();
    }
}

impl<C: 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("drivers", &names).finish()
    }
}

fn dialect_factory<C: 'static>(dialect: Dialect, driver: Arc<dyn Driver<C>>) -> DriverFactory<C> {
    Arc::new(move || dialect.bundle_arc(Arc::clone(&driver)))
}

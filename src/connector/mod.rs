//! The credential-refreshing connector.
//!
//! [`Connector::connect`] opens a connection with the store's current
//! credentials. When the driver rejects them, it asks the store for fresh
//! ones and tries again, up to the configured bound:
//!
//! ```text
//! get() ─▶ format DSN ─▶ open() ─┬─ ok ───────────────▶ connection
//!                                ├─ non-auth error ───▶ error
//!                                └─ auth error ─▶ refresh() ─▶ format DSN ─▶ open() ─▶ ...
//! ```

mod builder;

pub use builder::ConnectorBuilder;

use std::{future::Future, sync::Arc, time::Duration};

use zeroize::Zeroizing;

use crate::{
    ConnectionConfig, CredentialStore, Credentials, Error, ErrorKind, Registry,
    driver::DriverBundle,
};

/// Opens database connections, refreshing credentials on authentication
/// failures.
///
/// ## Thread Safety
///
/// `Connector` is `Clone` and thread-safe. Clones share one store, one driver
/// bundle and one lock: concurrent [`connect`](Connector::connect) calls run
/// one at a time, so at most one refresh cycle is in flight.
///
/// ## Cancellation
///
/// Dropping a `connect()` future cancels the in-flight store or driver call
/// and releases the lock. [`connect_until`](Connector::connect_until) and
/// [`connect_timeout`](Connector::connect_timeout) do this for you.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::{BuiltinDrivers, ConnectionConfig, Connector, Error, Registry};
/// use db_credential_refresh::testing::{MockConnection, MockDriver, MockStore};
///
/// # tokio_test::block_on(async {
/// // The first password has expired; the database accepts the refreshed one.
/// let driver = MockDriver::new()
///     .then_err(Error::unauthorized("Access denied for user 'app'@'10.0.0.7'"))
///     .then_ok();
/// let registry: Registry<MockConnection> =
///     Registry::with_builtin_dialects(BuiltinDrivers::new().mysql(driver.clone()));
///
/// let connector = Connector::new(
///     MockStore::new("app", "token"),
///     &registry,
///     "mysql",
///     ConnectionConfig::new("localhost", 3306).with_database("orders"),
/// )?;
///
/// let conn = connector.connect().await?;
/// assert_eq!(conn.dsn(), "app:token-1@tcp(localhost:3306)/orders");
/// # Ok::<(), Error>(())
/// # }).unwrap();
/// ```
pub struct Connector<C> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    store: Arc<dyn CredentialStore>,
    driver_name: String,
    bundle: DriverBundle<C>,
    config: ConnectionConfig,
    max_retries: u32,
    lock: tokio::sync::Mutex<()>,
}

impl<C: 'static> Connector<C> {
    /// Creates a new connector builder.
    pub fn builder() -> ConnectorBuilder<C> {
        ConnectorBuilder::new()
    }

    /// Creates a connector for the driver registered as `driver_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidDriver`] if `driver_name` is not in
    /// `registry`.
    pub fn new<S>(
        store: S,
        registry: &Registry<C>,
        driver_name: impl Into<String>,
        config: ConnectionConfig,
    ) -> Result<Self, Error>
    where
        S: CredentialStore + 'static,
    {
        Self::builder()
            .store(store)
            .driver_name(driver_name)
            .config(config)
            .build(registry)
    }

    /// Opens a connection, refreshing credentials after each
    /// authentication-class failure.
    ///
    /// Makes at most `max_retries + 1` open attempts and `max_retries`
    /// refreshes. Errors from the driver are returned exactly as the driver
    /// produced them.
    ///
    /// # Errors
    ///
    /// - any error from the store's `get()` or `refresh()`, unchanged
    /// - [`ErrorKind::NilCredentials`] if the store returned no credentials
    /// - [`ErrorKind::MissingUsername`] / [`ErrorKind::MissingPassword`] if
    ///   the store returned an empty field
    /// - the first non-auth driver error, or the last auth error once the
    ///   retries are used up
    pub async fn connect(&self) -> Result<C, Error> {
        let inner = &*self.inner;
        let _guard = inner.lock.lock().await;

        let credentials = usable(inner.store.get().await?)?;
        let mut last_err = match inner.open(&credentials).await {
            Ok(conn) => return Ok(conn),
            Err(err) => err,
        };

        for attempt in 1..=inner.max_retries {
            if !(inner.bundle.auth_error())(&last_err) {
                tracing::debug!(driver = %inner.driver_name, error = %last_err, "connection failed");
                return Err(last_err);
            }

            tracing::info!(
                driver = %inner.driver_name,
                attempt,
                max_retries = inner.max_retries,
                error = %last_err,
                "authentication failed, refreshing credentials"
            );

            let credentials = usable(inner.store.refresh().await?)?;
            match inner.open(&credentials).await {
                Ok(conn) => {
                    tracing::debug!(driver = %inner.driver_name, attempt, "connected with refreshed credentials");
                    return Ok(conn);
                }
                Err(err) => last_err = err,
            }
        }

        tracing::warn!(
            driver = %inner.driver_name,
            max_retries = inner.max_retries,
            error = %last_err,
            "giving up on connection"
        );
        Err(last_err)
    }

    /// Like [`connect`](Connector::connect), but gives up as soon as
    /// `cancel` completes.
    ///
    /// No further store or driver calls happen after cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Cancelled`] if `cancel` completes first, otherwise
    /// whatever `connect()` returns.
    pub async fn connect_until<F>(&self, cancel: F) -> Result<C, Error>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::debug!(driver = %self.inner.driver_name, "connect cancelled");
                Err(Error::cancelled())
            }
            result = self.connect() => result,
        }
    }

    /// Like [`connect`](Connector::connect), but gives up after `timeout`.
    ///
    /// The time spent waiting for a concurrent `connect()` counts against
    /// the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Timeout`] if the deadline passes first, otherwise
    /// whatever `connect()` returns.
    pub async fn connect_timeout(&self, timeout: Duration) -> Result<C, Error> {
        tokio::time::timeout(timeout, self.connect())
            .await
            .map_err(|_| Error::timeout(format!("connect timed out after {:?}", timeout)))?
    }

    /// Returns the resolved driver bundle, with any formatter override from
    /// the config applied.
    pub fn driver(&self) -> &DriverBundle<C> {
        &self.inner.bundle
    }

    /// Returns the registry name the driver was resolved from.
    pub fn driver_name(&self) -> &str {
        &self.inner.driver_name
    }

    /// Returns the connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    /// Returns the effective retry bound (never less than 1).
    pub fn max_retries(&self) -> u32 {
        self.inner.max_retries
    }
}

impl<C> Inner<C> {
    async fn open(&self, credentials: &Credentials) -> Result<C, Error> {
        let dsn = Zeroizing::new((self.bundle.formatter())(
            credentials.username(),
            credentials.password(),
            &self.config.host,
            self.config.port,
            &self.config.database,
            &self.config.options,
        ));
        self.bundle.driver().open(&dsn).await
    }
}

/// Rejects store results the connector cannot use.
fn usable(credentials: Option<Credentials>) -> Result<Credentials, Error> {
    let credentials = credentials.ok_or_else(|| Error::from_kind(ErrorKind::NilCredentials))?;
    credentials.validate()?;
    Ok(credentials)
}

impl<C> Clone for Connector<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for Connector<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("driver_name", &self.inner.driver_name)
            .field("config", &self.inner.config)
            .field("max_retries", &self.inner.max_retries)
            .finish_non_exhaustive()
    }
}

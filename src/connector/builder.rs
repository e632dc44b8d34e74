//! Connector builder.

use std::{marker::PhantomData, sync::Arc};

use super::{Connector, Inner};
use crate::{ConnectionConfig, CredentialStore, Error, ErrorKind, Registry};

/// Builder for creating [`Connector`] instances.
///
/// ## Required Configuration
///
/// - `store()`: where credentials come from
/// - `driver_name()`: the registry name of the driver bundle
/// - `config()`: address, database, options and retry bound
///
/// Missing pieces are reported by [`build`](ConnectorBuilder::build), in the
/// order config, store, driver name.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::{BuiltinDrivers, ConnectionConfig, Connector, Registry};
/// use db_credential_refresh::testing::{MockConnection, MockDriver, MockStore};
///
/// let registry: Registry<MockConnection> =
///     Registry::with_builtin_dialects(BuiltinDrivers::new().postgres(MockDriver::new()));
///
/// let connector = Connector::builder()
///     .store(MockStore::new("app", "token"))
///     .driver_name("pgx")
///     .config(ConnectionConfig::new("db.internal", 5432).with_database("orders"))
///     .build(&registry)?;
///
/// assert_eq!(connector.driver_name(), "pgx");
/// # Ok::<(), db_credential_refresh::Error>(())
/// ```
pub struct ConnectorBuilder<C> {
    store: Option<Arc<dyn CredentialStore>>,
    driver_name: Option<String>,
    config: Option<ConnectionConfig>,
    _connection: PhantomData<fn() -> C>,
}

impl<C: 'static> ConnectorBuilder<C> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            store: None,
            driver_name: None,
            config: None,
            _connection: PhantomData,
        }
    }

    /// Sets the credential store.
    #[must_use]
    pub fn store<S>(mut self, store: S) -> Self
    where
        S: CredentialStore + 'static,
    {
        self.store = Some(Arc::new(store));
        self
    }

    /// Sets an already shared credential store.
    #[must_use]
    pub fn shared_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the registry name of the driver.
    #[must_use]
    pub fn driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = Some(name.into());
        self
    }

    /// Sets the connection configuration.
    #[must_use]
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Resolves the driver bundle from `registry` and builds the connector.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::ConfigRequired`] if no config was set
    /// - [`ErrorKind::Configuration`] if no store or driver name was set
    /// - [`ErrorKind::InvalidDriver`] if the driver name is not registered
    pub fn build(self, registry: &Registry<C>) -> Result<Connector<C>, Error> {
        let config = self
            .config
            .ok_or_else(|| Error::from_kind(ErrorKind::ConfigRequired))?;
        let store = self
            .store
            .ok_or_else(|| Error::configuration("credential store is required"))?;
        let driver_name = self
            .driver_name
            .ok_or_else(|| Error::configuration("driver name is required"))?;

        let mut bundle = registry.resolve(&driver_name)?;
        if let Some(formatter) = config.formatter {
            bundle = bundle.with_formatter(formatter);
        }
        let max_retries = config.max_retries.max(1);

        tracing::debug!(
            driver = %driver_name,
            host = %config.host,
            port = config.port,
            max_retries,
            "built connector"
        );

        Ok(Connector {
            inner: Arc::new(Inner {
                store,
                driver_name,
                bundle,
                config,
                max_retries,
                lock: tokio::sync::Mutex::new(()),
            }),
        })
    }
}

impl<C: 'static> Default for ConnectorBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for ConnectorBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorBuilder")
            .field("store", &self.store.is_some())
            .field("driver_name", &self.driver_name)
            .field("config", &self.config)
            .finish()
    }
}

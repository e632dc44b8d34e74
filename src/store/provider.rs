//! Credential store trait and the fixed-value store.

use std::{future::Future, pin::Pin, sync::Arc};

use super::Credentials;
use crate::Error;

/// A type alias for the boxed future returned by credential stores.
///
/// `Ok(None)` is a contract violation: the connector rejects it with
/// [`ErrorKind::NilCredentials`](crate::ErrorKind::NilCredentials).
pub type CredentialsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<Credentials>, Error>> + Send + 'a>>;

/// A source of database credentials that can be forced to renew them.
///
/// The connector calls [`get`](CredentialStore::get) before every connection
/// attempt and [`refresh`](CredentialStore::refresh) after the database
/// rejects the current credentials.
///
/// Implementations may cache, rate-limit or short-circuit, but must be safe
/// to call repeatedly. Dropping the returned future cancels the call.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `Arc<dyn CredentialStore>`.
///
/// ## Example: Environment Variable Store
///
/// ```rust
/// use db_credential_refresh::{Credentials, CredentialStore, Error};
/// use db_credential_refresh::store::CredentialsFuture;
///
/// struct EnvStore;
///
/// impl EnvStore {
///     fn read() -> Result<Option<Credentials>, Error> {
///         let user = std::env::var("DB_USER")
///             .map_err(|_| Error::configuration("DB_USER not set"))?;
///         let pass = std::env::var("DB_PASSWORD")
///             .map_err(|_| Error::configuration("DB_PASSWORD not set"))?;
///         Ok(Some(Credentials::new(user, pass)))
///     }
/// }
///
/// impl CredentialStore for EnvStore {
///     fn get(&self) -> CredentialsFuture<'_> {
///         Box::pin(async { Self::read() })
///     }
///
///     fn refresh(&self) -> CredentialsFuture<'_> {
///         Box::pin(async { Self::read() })
///     }
/// }
/// ```
pub trait CredentialStore: Send + Sync {
    /// Returns usable credentials, possibly from a cache.
    ///
    /// # Errors
    ///
    /// Return an error if no credentials can be obtained. The connector
    /// propagates it to the caller without retrying.
    fn get(&self) -> CredentialsFuture<'_>;

    /// Acquires new credentials, bypassing any cache.
    ///
    /// On success the store's cached value (if it keeps one) must be updated
    /// so later [`get`](CredentialStore::get) calls return the new value.
    ///
    /// # Errors
    ///
    /// Return an error if renewal fails. The connector stops retrying and
    /// propagates it.
    fn refresh(&self) -> CredentialsFuture<'_>;
}

// Allow using Arc<dyn CredentialStore> as CredentialStore
impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn get(&self) -> CredentialsFuture<'_> {
        (**self).get()
    }

    fn refresh(&self) -> CredentialsFuture<'_> {
        (**self).refresh()
    }
}

// Allow using Box<dyn CredentialStore> as CredentialStore
impl<T: CredentialStore + ?Sized> CredentialStore for Box<T> {
    fn get(&self) -> CredentialsFuture<'_> {
        (**self).get()
    }

    fn refresh(&self) -> CredentialsFuture<'_> {
        (**self).refresh()
    }
}

/// A store that always returns the same credentials.
///
/// Refreshing has nothing to renew, so it returns the same value again.
/// Useful for long-lived passwords and for tests.
#[derive(Debug, Clone)]
pub struct StaticStore {
    credentials: Credentials,
}

impl StaticStore {
    /// Creates a new static store.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, password),
        }
    }
}

impl From<Credentials> for StaticStore {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialStore for StaticStore {
    fn get(&self) -> CredentialsFuture<'_> {
        let credentials = self.credentials.clone();
        Box::pin(async move { Ok(Some(credentials)) })
    }

    fn refresh(&self) -> CredentialsFuture<'_> {
        self.get()
    }
}

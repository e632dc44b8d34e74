//! The low-level driver abstraction.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::Error;

/// A type alias for the boxed future returned by [`Driver::open`].
pub type OpenFuture<'a, C> = Pin<Box<dyn Future<Output = Result<C, Error>> + Send + 'a>>;

/// A wire-level database driver that opens one connection from a DSN.
///
/// Implementations wrap a concrete client library. Errors should carry the
/// server's message text (so auth classifiers can inspect it) and use
/// [`ErrorKind::BadConnection`](crate::ErrorKind::BadConnection) when the
/// transport is unusable.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::{Driver, Error};
/// use db_credential_refresh::driver::OpenFuture;
///
/// struct EchoDriver;
///
/// impl Driver<String> for EchoDriver {
///     fn open<'a>(&'a self, dsn: &'a str) -> OpenFuture<'a, String> {
///         Box::pin(async move {
///             if dsn.contains(":expired@") {
///                 return Err(Error::unauthorized("Access denied for user 'app'"));
///             }
///             Ok(dsn.to_string())
///         })
///     }
/// }
/// ```
pub trait Driver<C>: Send + Sync {
    /// Opens a connection using the formatted connection string.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged; the connector decides whether to
    /// retry based on it.
    fn open<'a>(&'a self, dsn: &'a str) -> OpenFuture<'a, C>;
}

impl<C, T: Driver<C> + ?Sized> Driver<C> for Arc<T> {
    fn open<'a>(&'a self, dsn: &'a str) -> OpenFuture<'a, C> {
        (**self).open(dsn)
    }
}

impl<C, T: Driver<C> + ?Sized> Driver<C> for Box<T> {
    fn open<'a>(&'a self, dsn: &'a str) -> OpenFuture<'a, C> {
        (**self).open(dsn)
    }
}

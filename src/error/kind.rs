//! Error kind enumeration for categorizing connector errors.

/// Categorization of connector errors.
///
/// This enum provides a stable interface for matching on error types. The
/// connector itself only branches on two questions: did the credential store
/// hand back something usable, and did the driver reject the credentials.
/// Everything else is surfaced to the caller as is.
///
/// ## Where each kind comes from
///
/// | ErrorKind           | Raised by                          | Retried by `connect()` |
/// |---------------------|------------------------------------|------------------------|
/// | `ConfigRequired`    | connector builder                  | No                     |
/// | `Configuration`     | connector builder, sources         | No                     |
/// | `InvalidDriver`     | registry lookup                    | No                     |
/// | `AlreadyRegistered` | registry registration              | n/a (ignorable)        |
/// | `NilCredentials`    | store returned no credentials      | No                     |
/// | `MissingUsername`   | store returned an empty username   | No                     |
/// | `MissingPassword`   | store returned an empty password   | No                     |
/// | `Credentials`       | store backends                     | No                     |
/// | `Unauthorized`      | drivers                            | If classified as auth  |
/// | `BadConnection`     | drivers                            | Yes                    |
/// | `Cancelled`         | `connect_until()`                  | No                     |
/// | `Timeout`           | `connect_timeout()`, sources       | No                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A connector was built without a [`ConnectionConfig`].
    ///
    /// [`ConnectionConfig`]: crate::ConnectionConfig
    #[error("config is required")]
    ConfigRequired,

    /// Invalid or incomplete configuration (missing store, bad source URL).
    ///
    /// **Not retriable.** Fix the configuration.
    #[error("configuration error")]
    Configuration,

    /// The requested driver name is not registered.
    #[error("invalid driver name")]
    InvalidDriver,

    /// A driver factory with the same name already exists.
    ///
    /// Registration does not overwrite the existing factory. Callers may log
    /// and ignore this error.
    #[error("driver already registered")]
    AlreadyRegistered,

    /// The credential store reported success but produced no credentials.
    ///
    /// This is a contract violation by the store implementation.
    #[error("store cannot return nil credentials")]
    NilCredentials,

    /// The credential store produced an empty username.
    #[error("missing username")]
    MissingUsername,

    /// The credential store produced an empty password.
    #[error("missing password")]
    MissingPassword,

    /// A credential backend failed to produce credentials (unreadable file,
    /// non-success HTTP status).
    #[error("credentials error")]
    Credentials,

    /// The database rejected the credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The driver reports the connection as permanently broken.
    ///
    /// Built-in classifiers treat this as an authentication-class failure:
    /// a broken connection right after a credential swap warrants a refresh
    /// before the next attempt.
    #[error("bad connection")]
    BadConnection,

    /// Connection error (DNS, TCP, network unreachable).
    #[error("connection error")]
    Connection,

    /// Transport error talking to a credential backend.
    #[error("transport error")]
    Transport,

    /// Malformed credential payload.
    #[error("protocol error")]
    Protocol,

    /// The operation did not complete before its deadline.
    #[error("timeout")]
    Timeout,

    /// The operation was cancelled by the caller.
    #[error("cancelled")]
    Cancelled,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Returns `true` for errors raised while obtaining or validating
    /// credentials from a store.
    ///
    /// The connector never retries these.
    ///
    /// # Example
    ///
    /// ```rust
    /// use db_credential_refresh::ErrorKind;
    ///
    /// assert!(ErrorKind::MissingPassword.is_credential_error());
    /// assert!(!ErrorKind::Unauthorized.is_credential_error());
    /// ```
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::NilCredentials
                | ErrorKind::MissingUsername
                | ErrorKind::MissingPassword
                | ErrorKind::Credentials
        )
    }

    /// Returns `true` for errors raised while constructing a connector or
    /// resolving its driver.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::ConfigRequired | ErrorKind::Configuration | ErrorKind::InvalidDriver
        )
    }
}

//! Main error type for the crate.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The primary error type for connector, registry and store operations.
///
/// `Error` keeps three things apart:
/// - [`kind()`](Error::kind): categorization for `match` statements
/// - [`message()`](Error::message): the human-readable description
/// - [`source()`](StdError::source): the underlying cause, if any
///
/// Driver errors are returned to callers exactly as the driver produced them,
/// so the message and source chain of a failed `connect()` are the driver's.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::{Error, ErrorKind};
///
/// fn describe(err: &Error) -> &'static str {
///     match err.kind() {
///         ErrorKind::MissingUsername | ErrorKind::MissingPassword => "store returned empty credentials",
///         ErrorKind::InvalidDriver => "driver not registered",
///         kind if kind.is_credential_error() => "could not fetch credentials",
///         _ => "connection failed",
///     }
/// }
///
/// assert_eq!(describe(&Error::from_kind(ErrorKind::MissingUsername)), "store returned empty credentials");
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use db_credential_refresh::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Unauthorized, "Access denied for user 'app'@'10.0.0.1'");
    /// assert_eq!(err.kind(), ErrorKind::Unauthorized);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::ConfigRequired => "config is required",
            ErrorKind::Configuration => "invalid configuration",
            ErrorKind::InvalidDriver => "invalid driver name",
            ErrorKind::AlreadyRegistered => "driver factory already registered",
            ErrorKind::NilCredentials => "store cannot return nil credentials",
            ErrorKind::MissingUsername => "missing username",
            ErrorKind::MissingPassword => "missing password",
            ErrorKind::Credentials => "failed to fetch credentials",
            ErrorKind::Unauthorized => "authentication failed",
            ErrorKind::BadConnection => "driver: bad connection",
            ErrorKind::Connection => "connection failed",
            ErrorKind::Transport => "transport error",
            ErrorKind::Protocol => "protocol error",
            ErrorKind::Timeout => "operation timed out",
            ErrorKind::Cancelled => "operation cancelled",
            ErrorKind::Unknown => "unknown error",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this error, or any error in its source chain, has
    /// the given kind.
    ///
    /// Drivers often wrap a lower-level error; this lets classifiers find a
    /// sentinel such as [`ErrorKind::BadConnection`] wherever it sits.
    ///
    /// ```rust
    /// use db_credential_refresh::{Error, ErrorKind};
    ///
    /// let err = Error::connection("query failed")
    ///     .with_source(Error::from_kind(ErrorKind::BadConnection));
    /// assert!(err.is(ErrorKind::BadConnection));
    /// assert!(!err.is(ErrorKind::Timeout));
    /// ```
    pub fn is(&self, kind: ErrorKind) -> bool {
        if self.kind == kind {
            return true;
        }
        let mut current = self.source();
        while let Some(err) = current {
            if err.downcast_ref::<Error>().is_some_and(|e| e.kind == kind) {
                return true;
            }
            current = err.source();
        }
        false
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a credentials error.
    pub fn credentials(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Credentials, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Creates a bad connection error.
    pub fn bad_connection() -> Self {
        Self::from_kind(ErrorKind::BadConnection)
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a cancelled error.
    pub fn cancelled() -> Self {
        Self::from_kind(ErrorKind::Cancelled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.to_string();
        // `from_kind` messages often repeat the kind text
        if self.message == kind {
            f.write_str(&kind)
        } else {
            write!(f, "{}: {}", kind, self.message)
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::protocol(format!("invalid credential JSON: {}", err)).with_source(err)
    }
}

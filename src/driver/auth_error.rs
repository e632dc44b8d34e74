//! Authentication error classifiers.
//!
//! A classifier answers one question about a failed `open()`: would fresh
//! credentials fix this? It is a boolean predicate, not an error taxonomy.
//! Anything it does not match is treated as a hard failure.

use std::error::Error as StdError;

use crate::{Error, ErrorKind};

/// Decides whether a driver error is an authentication-class failure.
pub type AuthErrorClassifier = fn(&Error) -> bool;

/// Lowercased fragment of MySQL's authentication denial message.
pub const MYSQL_ERROR_TEXT: &str = "access denied for user";

/// Lowercased fragment of PostgreSQL's authentication denial message.
pub const PG_ERROR_TEXT: &str = "password authentication failed for user";

/// Classifies MySQL authentication failures.
///
/// ```rust
/// use db_credential_refresh::Error;
/// use db_credential_refresh::driver::mysql_auth_error;
///
/// let err = Error::unauthorized("Error 1045: Access denied for user 'app'@'10.0.0.7'");
/// assert!(mysql_auth_error(&err));
/// assert!(!mysql_auth_error(&Error::connection("dial tcp: i/o timeout")));
/// ```
pub fn mysql_auth_error(err: &Error) -> bool {
    matches_auth_text(err, MYSQL_ERROR_TEXT)
}

/// Classifies PostgreSQL authentication failures.
pub fn postgres_auth_error(err: &Error) -> bool {
    matches_auth_text(err, PG_ERROR_TEXT)
}

/// Returns `true` if `err` is a broken-connection error, or if its text or
/// the text of any error in its source chain contains `text`
/// (case-insensitive).
///
/// `text` must already be lowercase.
// NOTE: a severed transport and stale credentials share one retry policy here.
pub fn matches_auth_text(err: &Error, text: &str) -> bool {
    if err.is(ErrorKind::BadConnection) {
        return true;
    }

    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains(text) {
            return true;
        }
        current = e.source();
    }
    false
}

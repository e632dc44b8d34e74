//! Database credentials.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, ErrorKind};

/// A username and password (or short-lived token) for a database login.
///
/// Credentials are immutable: a refresh produces a new value rather than
/// updating an existing one. The password is redacted from `Debug` output
/// and both fields are zeroized when the value is dropped.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::Credentials;
///
/// let creds = Credentials::new("app", "s3cret");
/// assert_eq!(creds.username(), "app");
/// assert!(!format!("{:?}", creds).contains("s3cret"));
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential set.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Maps a JSON document with string `username` and `password` fields to
    /// credentials.
    ///
    /// This is the shape secret engines hand out for dynamic database
    /// credentials. Extra fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Protocol`] if the document is not valid JSON or
    /// either field is missing or not a string.
    ///
    /// ```rust
    /// use db_credential_refresh::Credentials;
    ///
    /// let creds = Credentials::from_json(r#"{"username": "v-app-1", "password": "A1a-xyz", "ttl": 3600}"#)?;
    /// assert_eq!(creds.username(), "v-app-1");
    /// # Ok::<(), db_credential_refresh::Error>(())
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Self::from_value(&serde_json::from_str(raw)?)
    }

    /// Maps a Vault secrets API response to credentials.
    ///
    /// The credentials sit under `data` for the database secrets engine and
    /// under `data.data` for a KV version 2 mount; both are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Protocol`] if the response has no `data` object
    /// or the credential fields are missing, as for
    /// [`from_json`](Credentials::from_json).
    ///
    /// ```rust
    /// use db_credential_refresh::Credentials;
    ///
    /// let response = r#"{"lease_id": "database/creds/app/x1", "lease_duration": 3600,
    ///     "data": {"username": "v-app-1", "password": "A1a-xyz"}}"#;
    /// let creds = Credentials::from_vault_json(response)?;
    /// assert_eq!(creds.username(), "v-app-1");
    /// # Ok::<(), db_credential_refresh::Error>(())
    /// ```
    pub fn from_vault_json(raw: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(raw)?;
        let data = value
            .get("data")
            .filter(|data| data.is_object())
            .ok_or_else(|| Error::protocol("data not set in vault response"))?;

        match data.get("data") {
            Some(kv) if kv.is_object() => Self::from_value(kv),
            _ => Self::from_value(data),
        }
    }

    fn from_value(value: &Value) -> Result<Self, Error> {
        let username = value
            .get("username")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::new(ErrorKind::Protocol, "username not set in credential string")
            })?;
        let password = value
            .get("password")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::new(ErrorKind::Protocol, "password not set in credential string")
            })?;

        Ok(Self::new(username, password))
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks that neither field is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MissingUsername`] or [`ErrorKind::MissingPassword`].
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.is_empty() {
            return Err(Error::from_kind(ErrorKind::MissingUsername));
        }
        if self.password.is_empty() {
            return Err(Error::from_kind(ErrorKind::MissingPassword));
        }
        Ok(())
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.username.zeroize();
        self.password.zeroize();
    }
}

impl ZeroizeOnDrop for Credentials {}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

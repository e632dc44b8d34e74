//! Credential sources: where a [`CachingStore`](super::CachingStore) gets
//! fresh credentials from.

use std::{
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
};

use super::Credentials;
use crate::Error;

/// A type alias for the boxed future returned by credential sources.
pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = Result<Credentials, Error>> + Send + 'a>>;

/// Turns the raw payload a source read into credentials.
///
/// [`Credentials::from_json`] is the default; [`Credentials::from_vault_json`]
/// reads a Vault secrets API response. Any other layout (a templated
/// `user:pass` line, a custom document) takes a function of its own.
pub type Mapper = fn(&str) -> Result<Credentials, Error>;

/// A backend that produces a fresh credential set on every call.
///
/// Sources do no caching of their own; wrap one in a
/// [`CachingStore`](super::CachingStore) to get a [`CredentialStore`].
///
/// [`CredentialStore`]: super::CredentialStore
pub trait CredentialSource: Send + Sync {
    /// Fetches new credentials from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or returns an
    /// unusable payload.
    fn fetch(&self) -> SourceFuture<'_>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Arc<T> {
    fn fetch(&self) -> SourceFuture<'_> {
        (**self).fetch()
    }
}

impl<T: CredentialSource + ?Sized> CredentialSource for Box<T> {
    fn fetch(&self) -> SourceFuture<'_> {
        (**self).fetch()
    }
}

/// A source backed by an async closure.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::Credentials;
/// use db_credential_refresh::store::{CachingStore, SourceFn};
///
/// let store = CachingStore::new(SourceFn::new(|| async {
///     // e.g. sign a cloud IAM auth token here
///     Ok(Credentials::new("app", "token"))
/// }));
/// ```
pub struct SourceFn<F> {
    f: F,
}

impl<F, Fut> SourceFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Credentials, Error>> + Send + 'static,
{
    /// Wraps a closure returning a credentials future.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> CredentialSource for SourceFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Credentials, Error>> + Send + 'static,
{
    fn fetch(&self) -> SourceFuture<'_> {
        Box::pin((self.f)())
    }
}

impl<F> std::fmt::Debug for SourceFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFn").finish_non_exhaustive()
    }
}

/// A source that reads a credential document from disk.
///
/// Secrets agents running as sidecars typically render leased database
/// credentials to a file and rewrite it on renewal. The file is re-read on
/// every fetch and handed to the source's [`Mapper`]. By default it must be
/// JSON with `username` and `password` string fields (see
/// [`Credentials::from_json`]).
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::{Credentials, Error};
/// use db_credential_refresh::store::FileSource;
///
/// // An agent template rendering `{{ .Data.username }}:{{ .Data.password }}`
/// fn colon_pair(raw: &str) -> Result<Credentials, Error> {
///     let (user, pass) = raw
///         .trim()
///         .split_once(':')
///         .ok_or_else(|| Error::protocol("expected user:password"))?;
///     Ok(Credentials::new(user, pass))
/// }
///
/// let source = FileSource::new("/vault/secrets/db").with_mapper(colon_pair);
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    mapper: Mapper,
}

impl FileSource {
    /// Creates a source reading JSON credentials from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mapper: Credentials::from_json,
        }
    }

    /// Sets the function that maps the file contents to credentials.
    #[must_use]
    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSource for FileSource {
    fn fetch(&self) -> SourceFuture<'_> {
        Box::pin(async move {
            let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                Error::credentials(format!(
                    "failed to read credentials from {}: {}",
                    self.path.display(),
                    e
                ))
                .with_source(e)
            })?;

            tracing::debug!(path = %self.path.display(), "read credentials file");
            (self.mapper)(&raw)
        })
    }
}

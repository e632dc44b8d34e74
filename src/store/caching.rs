//! A credential store that caches the last fetched value.

use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

use super::{CredentialSource, CredentialStore, Credentials, CredentialsFuture};

#[derive(Debug)]
struct Cached {
    credentials: Credentials,
    fetched_at: Instant,
}

/// A [`CredentialStore`] that serves a cached credential set until it is
/// refreshed.
///
/// `get()` returns the cached value when there is one (and it is younger
/// than the optional TTL); otherwise it fetches from the source. `refresh()`
/// always fetches and replaces the cached value on success. A failed fetch
/// leaves the previous value in place.
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use db_credential_refresh::store::{CachingStore, FileSource};
///
/// // Re-read the rendered secret at most every 5 minutes, or immediately
/// // when the database rejects the current password.
/// let store = CachingStore::new(FileSource::new("/vault/secrets/db.json"))
///     .with_ttl(Duration::from_secs(300));
/// ```
pub struct CachingStore<S> {
    source: S,
    ttl: Option<Duration>,
    cached: RwLock<Option<Cached>>,
}

impl<S: CredentialSource> CachingStore<S> {
    /// Creates a caching store over `source` with no expiry.
    pub fn new(source: S) -> Self {
        Self {
            source,
            ttl: None,
            cached: RwLock::new(None),
        }
    }

    /// Sets how long a cached value is served before `get()` fetches again.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Returns the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drops the cached value so the next `get()` fetches.
    pub fn invalidate(&self) {
        *self.cached.write() = None;
    }

    /// Returns the cached credentials if present and fresh.
    fn fresh(&self) -> Option<Credentials> {
        let cached = self.cached.read();
        let entry = cached.as_ref()?;
        match self.ttl {
            Some(ttl) if entry.fetched_at.elapsed() >= ttl => None,
            _ => Some(entry.credentials.clone()),
        }
    }
}

impl<S: CredentialSource> CredentialStore for CachingStore<S> {
    fn get(&self) -> CredentialsFuture<'_> {
        Box::pin(async move {
            if let Some(credentials) = self.fresh() {
                return Ok(Some(credentials));
            }
            self.refresh().await
        })
    }

    fn refresh(&self) -> CredentialsFuture<'_> {
        Box::pin(async move {
            let credentials = self.source.fetch().await?;
            *self.cached.write() = Some(Cached {
                credentials: credentials.clone(),
                fetched_at: Instant::now(),
            });
            tracing::debug!("cached refreshed credentials");
            Ok(Some(credentials))
        })
    }
}

impl<S> std::fmt::Debug for CachingStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingStore")
            .field("ttl", &self.ttl)
            .field("cached", &self.cached.read().is_some())
            .finish_non_exhaustive()
    }
}

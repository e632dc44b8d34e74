//! Credential stores.
//!
//! This module provides the credential side of a connector:
//!
//! - [`Credentials`]: an immutable username/password pair
//! - [`CredentialStore`]: the `get` / `refresh` contract the connector consumes
//! - [`StaticStore`]: a fixed credential set
//! - [`CachingStore`]: caches values fetched from a [`CredentialSource`]
//! - [`SourceFn`], [`FileSource`], `HttpSource`: ready-made sources
//!
//! ## Short-lived tokens
//!
//! For cloud IAM tokens or leased secrets, wrap the backend in a
//! [`CachingStore`]. The connector calls `get()` on every connection and
//! `refresh()` only after the database rejects the cached value:
//!
//! ```rust
//! use db_credential_refresh::Credentials;
//! use db_credential_refresh::store::{CachingStore, SourceFn};
//!
//! let store = CachingStore::new(SourceFn::new(|| async {
//!     Ok(Credentials::new("app", "freshly-signed-token"))
//! }));
//! ```

mod caching;
mod credentials;
#[cfg(feature = "rest")]
mod http;
mod provider;
mod source;

pub use caching::CachingStore;
pub use credentials::Credentials;
#[cfg(feature = "rest")]
#[cfg_attr(docsrs, doc(cfg(feature = "rest")))]
pub use http::HttpSource;
pub use provider::{CredentialStore, CredentialsFuture, StaticStore};
pub use source::{CredentialSource, FileSource, Mapper, SourceFn, SourceFuture};

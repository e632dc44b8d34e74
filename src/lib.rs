//! # db-credential-refresh
//!
//! Database connectors that renew short-lived credentials (cloud IAM auth
//! tokens, leased secrets) when the database rejects them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use db_credential_refresh::prelude::*;
//! use db_credential_refresh::store::{CachingStore, HttpSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), db_credential_refresh::Error> {
//!     // Bind the built-in dialect names to your wire-level driver
//!     let registry = Registry::with_builtin_dialects(
//!         BuiltinDrivers::new().postgres(MyPostgresDriver::new()),
//!     );
//!
//!     // Lease credentials from Vault's database secrets engine, cached until rejected
//!     let store = CachingStore::new(HttpSource::vault(
//!         "https://vault.internal:8200/v1/database/creds/orders",
//!         std::env::var("VAULT_TOKEN").unwrap_or_default(),
//!     )?);
//!
//!     let connector = Connector::builder()
//!         .store(store)
//!         .driver_name("pgx")
//!         .config(
//!             ConnectionConfig::new("orders.db.internal", 5432)
//!                 .with_database("orders")
//!                 .with_option("sslmode", "require"),
//!         )
//!         .build(&registry)?;
//!
//!     let conn = connector.connect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Store**: `get()` returns current (possibly cached) credentials;
//!   `refresh()` forces new ones
//! - **Driver bundle**: driver + DSN formatter + auth error classifier,
//!   resolved by name from a [`Registry`]
//! - **Auth-class errors only**: `connect()` refreshes and retries only when
//!   the classifier says fresh credentials could help; every other error is
//!   returned immediately
//!
//! ## Features
//!
//! - `rest` (default): `HttpSource` credential source via reqwest
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod connector;
pub mod driver;
pub mod error;
pub mod store;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::ConnectionConfig;
pub use connector::{Connector, ConnectorBuilder};
pub use driver::{BuiltinDrivers, Dialect, Driver, DriverBundle, Formatter, Options, Registry};
pub use error::{Error, ErrorKind, Result};
pub use store::{CachingStore, CredentialStore, Credentials, StaticStore};

// Testing support
pub use testing::{MockDriver, MockStore};

//! Testing utilities.
//!
//! Scriptable stand-ins for the two collaborators a
//! [`Connector`](crate::Connector) talks to:
//!
//! - [`MockDriver`]: scripted `open()` outcomes, recorded DSNs, call and
//!   concurrency counters
//! - [`MockStore`]: scripted `get()` / `refresh()` outcomes and call counters
//!
//! ## Quick Start
//!
//! ```rust
//! use db_credential_refresh::{ConnectionConfig, Connector, Dialect, ErrorKind, Registry};
//! use db_credential_refresh::testing::{MockConnection, MockDriver, MockStore};
//!
//! # tokio_test::block_on(async {
//! let driver = MockDriver::new().fail_with(ErrorKind::Unauthorized, "Access denied for user 'app'");
//! let store = MockStore::new("app", "expired");
//!
//! let registry: Registry<MockConnection> = Registry::new();
//! let handle = driver.clone();
//! registry.register("mysql", move || Dialect::MYSQL.bundle(handle.clone()))?;
//!
//! let config = ConnectionConfig::builder().host("localhost").port(3306).build();
//! let connector = Connector::new(store.clone(), &registry, "mysql", config)?;
//!
//! let err = connector.connect().await.unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Unauthorized);
//! assert_eq!(driver.open_count(), 2);
//! assert_eq!(store.refresh_count(), 1);
//! # Ok::<(), db_credential_refresh::Error>(())
//! # }).unwrap();
//! ```

mod mock_driver;
mod mock_store;

pub use mock_driver::{MockConnection, MockDriver};
pub use mock_store::MockStore;

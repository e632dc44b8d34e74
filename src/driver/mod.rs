//! Drivers, dialects and the driver registry.
//!
//! A connector needs three things per database kind, bundled in a
//! [`DriverBundle`]:
//!
//! - a [`Driver`] that opens a connection from a DSN
//! - a [`Formatter`] that builds the DSN from credentials and a
//!   [`ConnectionConfig`](crate::ConnectionConfig)
//! - an [`AuthErrorClassifier`] that decides whether a failed open warrants a
//!   credential refresh
//!
//! The formatter and classifier depend only on the database's wire dialect,
//! so they come as a [`Dialect`]. The [`Registry`] maps driver names to
//! bundle factories.

mod auth_error;
mod formatter;
mod registry;
mod traits;

pub use auth_error::{
    AuthErrorClassifier, MYSQL_ERROR_TEXT, PG_ERROR_TEXT, matches_auth_text, mysql_auth_error,
    postgres_auth_error,
};
pub use formatter::{Formatter, Options, mysql_formatter, pg_formatter, pg_kv_formatter};
pub use registry::{
    BuiltinDrivers, Dialect, DriverBundle, DriverFactory, MYSQL_DRIVER, PGX_DRIVER, PQ_DRIVER,
    Registry,
};
pub use traits::{Driver, OpenFuture};

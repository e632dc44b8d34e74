//! Prelude module for convenient imports.
//!
//! ```rust
//! use db_credential_refresh::prelude::*;
//! ```
//!
//! This provides access to:
//! - The connector and its configuration
//! - Error types
//! - Credential store types
//! - Driver registry types

pub use crate::{
    config::ConnectionConfig,
    connector::{Connector, ConnectorBuilder},
    driver::{BuiltinDrivers, Dialect, Driver, DriverBundle, Formatter, Options, Registry},
    error::{Error, ErrorKind, Result},
    store::{CachingStore, CredentialSource, CredentialStore, Credentials, StaticStore},
};

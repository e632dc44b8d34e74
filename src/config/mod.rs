//! Connection configuration.
//!
//! [`ConnectionConfig`] holds the address, database, options and retry bound
//! of a [`Connector`](crate::Connector). Credentials are deliberately absent:
//! they come from the connector's store on every attempt.

mod connection;

pub use connection::ConnectionConfig;

//! Error types for the crate.
//!
//! A single [`Error`] type carries an [`ErrorKind`] for matching, a message,
//! and an optional source. The kinds split into three families:
//!
//! - configuration errors, returned synchronously while building a connector
//! - credential errors, returned when a store fails or hands back unusable values
//! - connection errors, produced by drivers and returned by `connect()` untouched
//!
//! ```rust
//! use db_credential_refresh::{Error, ErrorKind};
//!
//! let err = Error::from_kind(ErrorKind::MissingPassword);
//! assert!(err.kind().is_credential_error());
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use self::kind::ErrorKind;

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

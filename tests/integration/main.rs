//! Integration tests for db-credential-refresh.
//!
//! These tests drive the public API end to end: a registry of dialects, a
//! connector, real credential stores, and an in-process fake database that
//! only accepts the password it currently holds.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With connector logs
//! RUST_LOG=db_credential_refresh=debug cargo test --test integration -- --nocapture
//! ```

mod common;
mod connector_tests;
mod registry_tests;
mod store_tests;

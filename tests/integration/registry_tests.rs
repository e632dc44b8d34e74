//! Registry integration tests.

use std::sync::Arc;

use db_credential_refresh::driver::{
    DriverFactory, MYSQL_DRIVER, Options, PGX_DRIVER, PQ_DRIVER, matches_auth_text, pg_kv_formatter,
};
use db_credential_refresh::prelude::*;

use crate::common::{FakeDatabase, Flavor, Session};

fn fake(flavor: Flavor) -> FakeDatabase {
    FakeDatabase::new(flavor, "app", "pw")
}

#[test]
fn test_builtin_names() {
    let registry: Registry<Session> = Registry::with_builtin_dialects(
        BuiltinDrivers::new()
            .mysql(fake(Flavor::MySql))
            .postgres(fake(Flavor::Postgres)),
    );
    assert_eq!(registry.names(), vec![MYSQL_DRIVER, PGX_DRIVER, PQ_DRIVER]);
}

#[test]
fn test_unknown_driver_lists_choices() {
    let registry: Registry<Session> = Registry::with_builtin_dialects(
        BuiltinDrivers::new()
            .mysql(fake(Flavor::MySql))
            .postgres(fake(Flavor::Postgres)),
    );

    let err = Connector::new(
        StaticStore::new("app", "pw"),
        &registry,
        "mssql",
        ConnectionConfig::new("h", 1433),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDriver);
    assert_eq!(err.to_string(), "invalid driver name: invalid driver name, must be one of: mysql, pgx, pq");
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let registry: Registry<Session> = Registry::new();
    let first = fake(Flavor::MySql);
    registry
        .register("db", move || Dialect::MYSQL.bundle(first.clone()))
        .unwrap();

    let second = fake(Flavor::Postgres);
    let err = registry
        .register("db", move || Dialect::POSTGRES.bundle(second.clone()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);

    let bundle = registry.resolve("db").unwrap();
    let dsn = (bundle.formatter())("u", "p", "h", 3306, "d", &Options::new());
    assert_eq!(dsn, "u:p@tcp(h:3306)/d");
}

#[test]
fn test_register_all_twice() {
    let registry: Registry<Session> = Registry::new();
    let driver = fake(Flavor::Postgres);
    let factory: DriverFactory<Session> = Arc::new(move || {
        DriverBundle::new(driver.clone(), pg_kv_formatter, |err| {
            matches_auth_text(err, "password authentication failed")
        })
    });

    registry.register_all([("kv", Arc::clone(&factory))]);
    registry.register_all([("kv", Arc::clone(&factory)), ("kv2", factory)]);
    assert_eq!(registry.names(), vec!["kv", "kv2"]);

    registry.clear();
    assert!(registry.names().is_empty());
}

#[tokio::test]
async fn test_custom_dialect_end_to_end() -> anyhow::Result<()> {
    let server = fake(Flavor::Postgres);
    let registry: Registry<Session> = Registry::new();
    let driver = server.clone();
    registry.register("pgkv", move || {
        Dialect::new(pg_kv_formatter, |err| {
            matches_auth_text(err, "password authentication failed")
        })
        .bundle(driver.clone())
    })?;

    let connector = Connector::new(
        StaticStore::new("app", "pw"),
        &registry,
        "pgkv",
        ConnectionConfig::new("h", 5432).with_database("app"),
    )?;

    // The kv format carries "user=app password=pw", which the fake server
    // does not recognize as its URI-style credentials.
    let err = connector.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(server.login_counts(), (0, 2));
    Ok(())
}

//! Credential store integration tests.
//!
//! Real sources (a rendered secrets file, an HTTP secrets endpoint) behind a
//! caching store, driving a connector against the fake database.

use std::io::Write;

use db_credential_refresh::prelude::*;
use db_credential_refresh::store::FileSource;

use crate::common::{FakeDatabase, Flavor, Session, init_tracing};

fn mysql_registry(db: &FakeDatabase) -> Registry<Session> {
    Registry::with_builtin_dialects(BuiltinDrivers::new().mysql(db.clone()))
}

fn write_secret(file: &mut tempfile::NamedTempFile, username: &str, password: &str) {
    let body = serde_json::json!({ "username": username, "password": password, "lease_duration": 3600 });
    let handle = file.as_file_mut();
    handle.set_len(0).unwrap();
    std::io::Seek::rewind(handle).unwrap();
    handle.write_all(body.to_string().as_bytes()).unwrap();
    handle.flush().unwrap();
}

#[tokio::test]
async fn test_file_source_rotation() -> anyhow::Result<()> {
    init_tracing();

    let mut secret = tempfile::NamedTempFile::new()?;
    write_secret(&mut secret, "v-app-1", "A1a-first");

    let db = FakeDatabase::new(Flavor::MySql, "v-app-1", "A1a-first");
    let store = CachingStore::new(FileSource::new(secret.path()));
    let connector = Connector::new(store, &mysql_registry(&db), "mysql", ConnectionConfig::new("h", 3306))?;

    connector.connect().await?;

    // The sidecar renders a new lease and the database rotates
    write_secret(&mut secret, "v-app-1", "A1a-second");
    db.rotate("A1a-second");

    let session = connector.connect().await?;
    assert!(session.dsn.starts_with("v-app-1:A1a-second@"));
    assert_eq!(db.login_counts(), (2, 1));
    Ok(())
}

#[tokio::test]
async fn test_file_source_missing_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let db = FakeDatabase::new(Flavor::MySql, "app", "pw");
    let store = CachingStore::new(FileSource::new(dir.path().join("absent.json")));
    let connector = Connector::new(store, &mysql_registry(&db), "mysql", ConnectionConfig::new("h", 3306))?;

    let err = connector.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Credentials);
    assert!(err.message().contains("absent.json"));
    assert_eq!(db.login_counts(), (0, 0));
    Ok(())
}

#[tokio::test]
async fn test_file_source_empty_password() -> anyhow::Result<()> {
    let mut secret = tempfile::NamedTempFile::new()?;
    write_secret(&mut secret, "app", "");

    let db = FakeDatabase::new(Flavor::MySql, "app", "pw");
    let store = CachingStore::new(FileSource::new(secret.path()));
    let connector = Connector::new(store, &mysql_registry(&db), "mysql", ConnectionConfig::new("h", 3306))?;

    let err = connector.connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingPassword);
    assert_eq!(db.login_counts(), (0, 0));
    Ok(())
}

#[cfg(feature = "rest")]
mod http {
    use db_credential_refresh::prelude::*;
    use db_credential_refresh::store::HttpSource;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::mysql_registry;
    use crate::common::{FakeDatabase, Flavor, init_tracing};

    fn lease(password: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "lease_id": format!("database/creds/app/{}", password),
            "renewable": true,
            "lease_duration": 3600,
            "data": { "username": "v-app-xyz", "password": password },
        }))
    }

    #[tokio::test]
    async fn test_http_source_rotation() -> anyhow::Result<()> {
        init_tracing();
        let server = MockServer::start().await;

        // First lease is served once, every later request gets the second
        Mock::given(method("GET"))
            .and(path("/v1/database/creds/app"))
            .and(header("x-vault-token", "s.test"))
            .respond_with(lease("A1a-first"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/database/creds/app"))
            .respond_with(lease("A1a-second"))
            .mount(&server)
            .await;

        let source = HttpSource::vault(format!("{}/v1/database/creds/app", server.uri()), "s.test")?;

        // The database has already moved on to the second lease
        let db = FakeDatabase::new(Flavor::MySql, "v-app-xyz", "A1a-second");
        let connector = Connector::new(
            CachingStore::new(source),
            &mysql_registry(&db),
            "mysql",
            ConnectionConfig::new("h", 3306),
        )?;

        let session = connector.connect().await?;
        assert!(session.dsn.starts_with("v-app-xyz:A1a-second@"));
        assert_eq!(db.login_counts(), (1, 1));

        let requests = server.received_requests().await.unwrap_or_default();
        assert_eq!(requests.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_http_source_forbidden() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({ "errors": ["permission denied"] })),
            )
            .mount(&server)
            .await;

        let db = FakeDatabase::new(Flavor::MySql, "app", "pw");
        let connector = Connector::new(
            CachingStore::new(HttpSource::new(server.uri())?),
            &mysql_registry(&db),
            "mysql",
            ConnectionConfig::new("h", 3306),
        )?;

        let err = connector.connect().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Credentials);
        assert_eq!(
            err.message(),
            "credential endpoint returned HTTP 403: permission denied"
        );
        assert_eq!(db.login_counts(), (0, 0));
        Ok(())
    }
}

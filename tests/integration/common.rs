//! Common test harness for integration tests.
//!
//! Provides a fake database server that accepts exactly one password at a
//! time and can rotate it, the way a secrets engine rotates a database user.

use std::sync::{Arc, Once};

use db_credential_refresh::{Driver, Error, driver::OpenFuture};
use parking_lot::Mutex;

static TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber, honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The wire dialect whose error text the fake database mimics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    MySql,
    Postgres,
}

/// A session opened against [`FakeDatabase`].
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub dsn: String,
}

#[derive(Debug)]
struct State {
    username: String,
    password: String,
    logins: Vec<Result<(), String>>,
    down: bool,
}

/// An in-process database that authenticates DSNs against one credential
/// pair.
///
/// Credentials must not contain URL-reserved characters: the fake matches
/// them textually in the DSN.
#[derive(Debug, Clone)]
pub struct FakeDatabase {
    flavor: Flavor,
    state: Arc<Mutex<State>>,
}

impl FakeDatabase {
    pub fn new(flavor: Flavor, username: &str, password: &str) -> Self {
        Self {
            flavor,
            state: Arc::new(Mutex::new(State {
                username: username.to_string(),
                password: password.to_string(),
                logins: Vec::new(),
                down: false,
            })),
        }
    }

    /// Changes the accepted password.
    pub fn rotate(&self, password: &str) {
        self.state.lock().password = password.to_string();
    }

    /// Makes every login fail with a network error.
    pub fn set_down(&self, down: bool) {
        self.state.lock().down = down;
    }

    /// Returns `(successful, rejected)` login counts.
    pub fn login_counts(&self) -> (usize, usize) {
        let state = self.state.lock();
        let ok = state.logins.iter().filter(|l| l.is_ok()).count();
        (ok, state.logins.len() - ok)
    }

    fn denial(&self, username: &str) -> Error {
        match self.flavor {
            Flavor::MySql => Error::unauthorized(format!(
                "Error 1045 (28000): Access denied for user '{}'@'10.0.0.7' (using password: YES)",
                username
            )),
            Flavor::Postgres => Error::unauthorized(format!(
                "FATAL: password authentication failed for user \"{}\" (SQLSTATE 28P01)",
                username
            )),
        }
    }

    fn authenticate(&self, dsn: &str) -> Result<Session, Error> {
        let mut state = self.state.lock();
        if state.down {
            state.logins.push(Err("down".to_string()));
            return Err(Error::connection("dial tcp 10.0.0.7:5432: connect: connection refused"));
        }

        let expected = format!("{}:{}@", state.username, state.password);
        if dsn.contains(&expected) {
            state.logins.push(Ok(()));
            Ok(Session {
                username: state.username.clone(),
                dsn: dsn.to_string(),
            })
        } else {
            state.logins.push(Err("denied".to_string()));
            Err(self.denial(&state.username))
        }
    }
}

impl Driver<Session> for FakeDatabase {
    fn open<'a>(&'a self, dsn: &'a str) -> OpenFuture<'a, Session> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.authenticate(dsn)
        })
    }
}

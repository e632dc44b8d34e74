//! MockStore for scripting credential lookups.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    CredentialStore, Credentials, Error,
    store::CredentialsFuture,
};

type Outcome = Result<Option<Credentials>, Error>;

/// A scripted [`CredentialStore`] that counts calls.
///
/// Unscripted `get()` calls return the current credentials. Unscripted
/// `refresh()` calls rotate the password to `"{initial}-{n}"` (n counting
/// from 1) and make that the current value, the way a secrets engine hands
/// out a new lease. A scripted refresh that yields credentials also becomes
/// the current value.
///
/// Clones share state.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::testing::MockStore;
///
/// let store = MockStore::new("app", "token");
/// assert_eq!(store.current().password(), "token");
/// assert_eq!(store.refresh_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockStore {
    inner: Arc<Inner>,
}

struct Inner {
    initial_password: String,
    current: Mutex<Credentials>,
    gets: Mutex<VecDeque<Outcome>>,
    refreshes: Mutex<VecDeque<Outcome>>,
    get_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl MockStore {
    /// Creates a store that starts with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let credentials = Credentials::new(username, password);
        Self {
            inner: Arc::new(Inner {
                initial_password: credentials.password().to_string(),
                current: Mutex::new(credentials),
                gets: Mutex::new(VecDeque::new()),
                refreshes: Mutex::new(VecDeque::new()),
                get_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Queues the result of the next unanswered `get()` call.
    #[must_use]
    pub fn then_get(self, outcome: Result<Option<Credentials>, Error>) -> Self {
        self.inner.gets.lock().push_back(outcome);
        self
    }

    /// Queues the result of the next unanswered `refresh()` call.
    #[must_use]
    pub fn then_refresh(self, outcome: Result<Option<Credentials>, Error>) -> Self {
        self.inner.refreshes.lock().push_back(outcome);
        self
    }

    /// Returns the credentials unscripted `get()` calls would return.
    pub fn current(&self) -> Credentials {
        self.inner.current.lock().clone()
    }

    /// Returns how many times `get()` has been called.
    pub fn get_count(&self) -> usize {
        self.inner.get_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `refresh()` has been called.
    pub fn refresh_count(&self) -> usize {
        self.inner.refresh_calls.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("current", &*self.inner.current.lock())
            .field("gets", &self.get_count())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

impl CredentialStore for MockStore {
    fn get(&self) -> CredentialsFuture<'_> {
        Box::pin(async move {
            self.inner.get_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(outcome) = self.inner.gets.lock().pop_front() {
                return outcome;
            }
            Ok(Some(self.current()))
        })
    }

    fn refresh(&self) -> CredentialsFuture<'_> {
        Box::pin(async move {
            let n = self.inner.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            let outcome = self.inner.refreshes.lock().pop_front();
            let outcome = outcome.unwrap_or_else(|| {
                let username = self.inner.current.lock().username().to_string();
                Ok(Some(Credentials::new(
                    username,
                    format!("{}-{}", self.inner.initial_password, n),
                )))
            });

            if let Ok(Some(credentials)) = &outcome {
                *self.inner.current.lock() = credentials.clone();
            }
            outcome
        })
    }
}

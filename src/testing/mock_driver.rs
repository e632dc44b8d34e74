//! MockDriver for scripting connection attempts.

use std::{
    borrow::Cow,
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use crate::{Driver, Error, ErrorKind, driver::OpenFuture};

/// The connection handed out by [`MockDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConnection {
    attempt: usize,
    dsn: String,
}

impl MockConnection {
    /// Returns the 1-based number of the `open()` call that produced this
    /// connection.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Returns the DSN the connection was opened with.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }
}

/// A scripted [`Driver`] that records every `open()` call.
///
/// Each call pops the next scripted outcome. Once the script is exhausted the
/// fallback applies: connect successfully, unless
/// [`fail_with`](MockDriver::fail_with) was set.
///
/// `MockDriver` is cheap to clone and clones share state, so a test can keep
/// one handle for assertions while registering another.
///
/// ## Example
///
/// ```rust
/// use db_credential_refresh::Error;
/// use db_credential_refresh::testing::MockDriver;
///
/// let driver = MockDriver::new()
///     .then_err(Error::unauthorized("Access denied for user 'app'"))
///     .then_ok();
///
/// assert_eq!(driver.open_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockDriver {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<Result<(), Error>>>,
    fallback: Mutex<Option<(ErrorKind, Cow<'static, str>)>>,
    delay: Mutex<Option<Duration>>,
    dsns: Mutex<Vec<String>>,
    opens: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockDriver {
    /// Creates a driver that connects on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver whose every unscripted call fails with `kind` and
    /// `message`.
    pub fn failing(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new().fail_with(kind, message)
    }

    /// Queues a successful open.
    #[must_use]
    pub fn then_ok(self) -> Self {
        self.inner.script.lock().push_back(Ok(()));
        self
    }

    /// Queues a failed open.
    #[must_use]
    pub fn then_err(self, err: Error) -> Self {
        self.inner.script.lock().push_back(Err(err));
        self
    }

    /// Makes unscripted opens fail with `kind` and `message`.
    #[must_use]
    pub fn fail_with(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        *self.inner.fallback.lock() = Some((kind, message.into()));
        self
    }

    /// Makes every open wait `delay` before completing.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.inner.delay.lock() = Some(delay);
        self
    }

    /// Returns how many times `open()` has been called.
    pub fn open_count(&self) -> usize {
        self.inner.opens.load(Ordering::SeqCst)
    }

    /// Returns the DSNs passed to `open()`, in call order.
    pub fn dsns(&self) -> Vec<String> {
        self.inner.dsns.lock().clone()
    }

    /// Returns the highest number of `open()` calls ever in flight at once.
    pub fn max_concurrent_opens(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> Result<(), Error> {
        if let Some(outcome) = self.inner.script.lock().pop_front() {
            return outcome;
        }
        match &*self.inner.fallback.lock() {
            Some((kind, message)) => Err(Error::new(*kind, message.clone())),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("opens", &self.open_count())
            .field("scripted", &self.inner.script.lock().len())
            .finish_non_exhaustive()
    }
}

/// Decrements the in-flight counter even if the open future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Driver<MockConnection> for MockDriver {
    fn open<'a>(&'a self, dsn: &'a str) -> OpenFuture<'a, MockConnection> {
        Box::pin(async move {
            let attempt = self.inner.opens.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.dsns.lock().push(dsn.to_string());

            let current = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.max_in_flight.fetch_max(current, Ordering::SeqCst);
            let _in_flight = InFlight(&self.inner.in_flight);

            let delay = *self.inner.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.next_outcome().map(|()| MockConnection {
                attempt,
                dsn: dsn.to_string(),
            })
        })
    }
}

//! In-memory pool for tests and benchmarks
//!
//! Counts acquires and closes so callers can assert on routing and on the
//! close-exactly-once rule without a live backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

use super::ConnectionPool;

/// Errors produced by [`MockPool::acquire`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MockPoolError {
    /// The pool was closed before the acquire
    #[error("pool '{0}' is closed")]
    Closed(String),

    /// The pool was built with [`MockPool::failing`]
    #[error("pool '{0}' has no connections available")]
    Unavailable(String),
}

/// Connection handed out by a [`MockPool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConnection {
    pool: String,
    serial: usize,
}

impl MockConnection {
    /// Name of the pool that produced this connection
    #[must_use]
    pub fn pool(&self) -> &str {
        &self.pool
    }

    /// Per-pool sequence number, starting at 0
    #[must_use]
    pub fn serial(&self) -> usize {
        self.serial
    }
}

/// Mock connection pool
///
/// # Examples
///
/// ```
/// use pool_cluster::pool::{ConnectionPool, MockPool};
///
/// let pool = MockPool::new("replica-a");
/// pool.close();
/// assert!(pool.is_closed());
/// assert_eq!(pool.close_count(), 1);
/// ```
#[derive(Debug)]
pub struct MockPool {
    name: String,
    failing: bool,
    acquired: AtomicUsize,
    closed: AtomicUsize,
}

impl MockPool {
    /// Create a pool that hands out connections until closed
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failing: false,
            acquired: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    /// Create a pool whose every acquire fails with `Unavailable`
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            failing: true,
            ..Self::new(name)
        }
    }

    /// Number of successful acquires so far
    #[must_use]
    pub fn acquire_count(&self) -> usize {
        self.acquired.load(Ordering::Acquire)
    }

    /// Number of times `close` has been called
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::Acquire)
    }

    #[must_use]
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}

impl ConnectionPool for MockPool {
    type Connection = MockConnection;
    type Error = MockPoolError;

    async fn acquire(&self) -> Result<MockConnection, MockPoolError> {
        if self.is_closed() {
            return Err(MockPoolError::Closed(self.name.clone()));
        }
        if self.failing {
            return Err(MockPoolError::Unavailable(self.name.clone()));
        }
        let serial = self.acquired.fetch_add(1, Ordering::AcqRel);
        Ok(MockConnection {
            pool: self.name.clone(),
            serial,
        })
    }

    fn close(&self) {
        self.closed.fetch_add(1, Ordering::AcqRel);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

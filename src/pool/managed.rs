//! Deadpool adapter
//!
//! Wraps a `deadpool::managed::Pool` so any deadpool manager (TCP streams,
//! redis connections, database clients) can be registered in a cluster.

use deadpool::managed::{self, BuildError, Manager, Object, PoolError};
use tracing::debug;

use super::ConnectionPool;

/// Cluster member backed by a deadpool managed pool
pub struct ManagedPool<M: Manager> {
    pool: managed::Pool<M>,
    name: String,
}

impl<M: Manager> ManagedPool<M> {
    /// Wrap an already built deadpool pool
    pub fn new(name: impl Into<String>, pool: managed::Pool<M>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }

    /// Build a pool of at most `max_size` connections around `manager`
    ///
    /// # Errors
    ///
    /// Returns the deadpool build error, for example when timeouts are
    /// configured without a runtime.
    pub fn build(
        name: impl Into<String>,
        manager: M,
        max_size: usize,
    ) -> Result<Self, BuildError> {
        let pool = managed::Pool::builder(manager).max_size(max_size).build()?;
        Ok(Self::new(name, pool))
    }

    /// Current deadpool status (size, available, waiting)
    #[must_use]
    pub fn status(&self) -> managed::Status {
        self.pool.status()
    }

    /// Whether `close` has been called on the underlying pool
    #[must_use]
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Access the wrapped pool
    #[must_use]
    pub fn inner(&self) -> &managed::Pool<M> {
        &self.pool
    }
}

impl<M: Manager> std::fmt::Debug for ManagedPool<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedPool")
            .field("name", &self.name)
            .field("status", &self.pool.status())
            .finish()
    }
}

impl<M> ConnectionPool for ManagedPool<M>
where
    M: Manager,
    M::Type: Send,
    M::Error: Send,
{
    type Connection = Object<M>;
    type Error = PoolError<M::Error>;

    async fn acquire(&self) -> Result<Object<M>, PoolError<M::Error>> {
        self.pool.get().await
    }

    fn close(&self) {
        let status = self.pool.status();
        debug!(
            pool = %self.name,
            size = status.size,
            available = status.available,
            "Closing deadpool pool"
        );
        self.pool.close();
    }

    fn name(&self) -> &str {
        &self.name
    }
}

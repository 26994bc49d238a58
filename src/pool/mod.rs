//! Connection pool abstraction used by the cluster
//!
//! The cluster never looks inside a pool. It routes acquire calls to one and
//! closes it when the handle is retired. This module defines that contract
//! and provides two implementations:
//! - [`ManagedPool`] adapts a `deadpool::managed::Pool`
//! - [`MockPool`] is an in-memory double for tests and benchmarks

mod managed;
mod mock;

pub use managed::ManagedPool;
pub use mock::{MockConnection, MockPool, MockPoolError};

use std::future::Future;

/// A concurrency-safe set of reusable connections to one endpoint
///
/// # Contract
///
/// - `acquire` may be called from many tasks at once without external
///   synchronization. It may wait for a free connection; the cluster imposes
///   no timeout of its own.
/// - `close` releases the pool's resources. It must tolerate connections that
///   are still checked out. The cluster calls it at most once per handle.
///
/// # Examples
///
/// ```
/// use pool_cluster::pool::{ConnectionPool, MockPool};
///
/// # tokio_test_block_on(async {
/// let pool = MockPool::new("replica-a");
/// let conn = pool.acquire().await.unwrap();
/// assert_eq!(conn.pool(), "replica-a");
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub trait ConnectionPool: Send + Sync {
    /// Connection handed out by `acquire`
    type Connection: Send;

    /// Failure reported by `acquire`, passed through the cluster unchanged
    type Error: Send;

    /// Get a connection from the pool
    fn acquire(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// Release every resource held by the pool
    fn close(&self);

    /// Name used in log output
    fn name(&self) -> &str;
}

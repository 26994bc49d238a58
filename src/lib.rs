//! Primary/replica connection pool registry
//!
//! [`Cluster`] groups the pool for a data store's writable primary with the
//! pools for its read-only replicas and hands out connections by intent:
//! writes from the primary, reads from a replica picked by a lock-free
//! round-robin rotation. Duplicate replica entries weight the rotation.
//!
//! The pools themselves are external: anything implementing
//! [`pool::ConnectionPool`] can be registered, including any deadpool
//! managed pool through [`pool::ManagedPool`].

pub mod cluster;
pub mod config;
pub mod error;
pub mod logging;
pub mod pool;

pub use cluster::{Cluster, SelectionPolicy};
pub use config::{ClusterConfig, create_default_config, load_config};
pub use error::{ClusterError, UnknownPolicy};
pub use pool::ConnectionPool;

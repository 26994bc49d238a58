//! Primary/replica pool registry
//!
//! A [`Cluster`] groups one optional primary pool and any number of replica
//! pools for a replicated data store, and decides which pool serves a write
//! (primary) or a read (replica).
//!
//! # Overview
//!
//! The application states its intent explicitly: writes go through
//! [`Cluster::primary_connection`], reads through
//! [`Cluster::replica_connection`]. Nothing here checks node roles or fails
//! over. When a node changes role the caller swaps pools with
//! [`Cluster::replace_primary`] or [`Cluster::set_replicas`].
//!
//! # Concurrency
//!
//! - Selection is lock-free with respect to other selectors: a shared atomic
//!   counter drives round-robin and the replica list is read under a shared
//!   lock that is released before the pool's `acquire` is awaited.
//! - Structural changes (assign, replace, add, set, teardown) are serialized
//!   by an internal mutex. They may run while selections are in flight.
//! - Replacing a pool closes the old one before the new one is installed. A
//!   selector racing with the replacement can still be handed a connection
//!   from the pool being closed; callers who need more must serialize
//!   replacement against acquisition themselves.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use pool_cluster::Cluster;
//! use pool_cluster::pool::MockPool;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let cluster = Cluster::new();
//! cluster.assign_primary(Arc::new(MockPool::new("primary")))?;
//! cluster.add_replica(Arc::new(MockPool::new("replica-a")))?;
//! cluster.add_replica(Arc::new(MockPool::new("replica-b")))?;
//!
//! let write = cluster.primary_connection().await.expect("primary assigned")?;
//! assert_eq!(write.pool(), "primary");
//!
//! let read = cluster.replica_connection().await.expect("replicas present")?;
//! assert!(read.pool().starts_with("replica-"));
//!
//! cluster.tear_down();
//! assert!(cluster.primary_connection().await.is_none());
//! # Ok::<(), anyhow::Error>(())
//! # }).unwrap();
//! ```

mod policy;

pub use policy::SelectionPolicy;

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::config::ClusterConfig;
use crate::error::ClusterError;
use crate::pool::ConnectionPool;

/// One primary pool plus an ordered list of replica pools
///
/// The same replica handle may appear several times; each entry is one slot
/// in the rotation, so duplicates weight selection towards that pool.
///
/// Every handle the cluster owns is closed exactly once, when it stops being
/// referenced by the cluster (displaced by a replacement) or at teardown.
/// Handle identity is `Arc` pointer identity.
pub struct Cluster<P> {
    /// Active [`SelectionPolicy`] code
    policy: AtomicU8,
    /// Round-robin ticket counter, never reset
    rotation: AtomicUsize,
    primary: RwLock<Option<Arc<P>>>,
    replicas: RwLock<Vec<Arc<P>>>,
    /// Serializes structural changes
    structure: Mutex<()>,
}

impl<P> Default for Cluster<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Cluster<P> {
    /// Create an empty cluster using round-robin replica selection
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(SelectionPolicy::default())
    }

    /// Create an empty cluster with the given replica selection policy
    #[must_use]
    pub fn with_policy(policy: SelectionPolicy) -> Self {
        Self {
            policy: AtomicU8::new(policy.code()),
            rotation: AtomicUsize::new(0),
            primary: RwLock::new(None),
            replicas: RwLock::new(Vec::new()),
            structure: Mutex::new(()),
        }
    }

    /// Create an empty cluster configured from `config`
    #[must_use]
    pub fn from_config(config: &ClusterConfig) -> Self {
        Self::with_policy(config.policy)
    }

    /// Current replica selection policy
    #[must_use]
    #[inline]
    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy::from_code(self.policy.load(Ordering::Relaxed))
    }

    /// Switch the replica selection policy; takes effect on the next selection
    pub fn set_policy(&self, policy: SelectionPolicy) {
        self.policy.store(policy.code(), Ordering::Relaxed);
    }

    /// Whether a primary pool is currently assigned
    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.primary.read().is_some()
    }

    /// Number of replica slots, duplicates included
    #[must_use]
    pub fn replica_count(&self) -> usize {
        self.replicas.read().len()
    }

    /// Handle to the current primary pool, if one is assigned
    #[must_use]
    pub fn primary(&self) -> Option<Arc<P>> {
        self.primary.read().clone()
    }
}

impl<P: ConnectionPool> Cluster<P> {
    /// Install the primary pool
    ///
    /// Read-only applications can skip this and run with replicas only.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::AlreadyAssigned`] if a primary exists. Silent
    ///   replacement of a live primary is refused; use
    ///   [`replace_primary`](Self::replace_primary).
    /// - [`ClusterError::InvalidArgument`] if `pool` is `None`.
    pub fn assign_primary(&self, pool: impl Into<Option<Arc<P>>>) -> Result<(), ClusterError> {
        let _structure = self.structure.lock();
        let mut primary = self.primary.write();

        if let Some(current) = primary.as_ref() {
            warn!(
                primary = %current.name(),
                "Refused to assign a second primary pool"
            );
            return Err(ClusterError::AlreadyAssigned);
        }

        let pool = require_handle(pool.into(), "assign_primary")?;
        info!(pool = %pool.name(), "Assigned primary pool");
        *primary = Some(pool);
        Ok(())
    }

    /// Close the current primary (if any) and install `pool` in its place
    ///
    /// The old pool is closed before the new one becomes visible. Connections
    /// already checked out of the old pool stay the caller's responsibility.
    /// If the old handle is still registered as a replica, or is the same
    /// handle as `pool`, it is not closed.
    ///
    /// # Errors
    ///
    /// [`ClusterError::InvalidArgument`] if `pool` is `None`; nothing is
    /// closed in that case.
    pub fn replace_primary(&self, pool: impl Into<Option<Arc<P>>>) -> Result<(), ClusterError> {
        let pool = require_handle(pool.into(), "replace_primary")?;
        let _structure = self.structure.lock();

        let previous = self.primary.read().clone();
        if let Some(previous) = &previous {
            let still_referenced = Arc::ptr_eq(previous, &pool)
                || self
                    .replicas
                    .read()
                    .iter()
                    .any(|replica| Arc::ptr_eq(replica, previous));

            if still_referenced {
                debug!(
                    pool = %previous.name(),
                    "Displaced primary is still referenced, leaving it open"
                );
            } else {
                info!(pool = %previous.name(), "Closing displaced primary pool");
                previous.close();
            }
        }

        info!(
            pool = %pool.name(),
            replaced = previous.is_some(),
            "Installed primary pool"
        );
        *self.primary.write() = Some(pool);
        Ok(())
    }

    /// Append a replica pool to the rotation
    ///
    /// Adding the same pool repeatedly gives it proportionally more traffic.
    ///
    /// # Errors
    ///
    /// [`ClusterError::InvalidArgument`] if `pool` is `None`.
    pub fn add_replica(&self, pool: impl Into<Option<Arc<P>>>) -> Result<(), ClusterError> {
        let pool = require_handle(pool.into(), "add_replica")?;
        let _structure = self.structure.lock();

        let mut replicas = self.replicas.write();
        info!(
            pool = %pool.name(),
            slots = replicas.len() + 1,
            "Added replica pool"
        );
        replicas.push(pool);
        Ok(())
    }

    /// Replace the whole replica list
    ///
    /// Every element is validated before anything changes. On success the
    /// outgoing replicas are closed (each distinct handle once) and the new
    /// list is installed as given, duplicates included. Outgoing handles
    /// that reappear in the new list, or that serve as primary, stay open.
    ///
    /// # Errors
    ///
    /// [`ClusterError::InvalidArgument`] if any element is `None`. The
    /// current replica list is left untouched and nothing is closed.
    pub fn set_replicas<I, T>(&self, pools: I) -> Result<(), ClusterError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<Arc<P>>>,
    {
        let pools = pools.into_iter();
        let mut incoming = Vec::with_capacity(pools.size_hint().0);
        for (index, pool) in pools.enumerate() {
            match pool.into() {
                Some(pool) => incoming.push(pool),
                None => {
                    warn!(index, "Rejected replica list with an uninitialized pool handle");
                    return Err(ClusterError::InvalidArgument("set_replicas"));
                }
            }
        }

        let _structure = self.structure.lock();
        let outgoing = self.replicas.read().clone();
        let primary = self.primary.read().clone();

        let retired = outgoing.iter().filter(|old| {
            let kept = incoming.iter().any(|new| Arc::ptr_eq(new, old));
            let is_primary = primary
                .as_ref()
                .is_some_and(|primary| Arc::ptr_eq(primary, old));
            !kept && !is_primary
        });
        let closed = close_distinct(retired);

        info!(
            slots = incoming.len(),
            previous_slots = outgoing.len(),
            closed,
            "Replaced replica pools"
        );
        *self.replicas.write() = incoming;
        Ok(())
    }

    /// Pick a replica according to the current policy without acquiring
    ///
    /// Returns `None` when there are no replicas or the policy is
    /// [`SelectionPolicy::Unrecognized`].
    #[must_use]
    pub fn replica(&self) -> Option<Arc<P>> {
        let replicas = self.replicas.read();
        if replicas.is_empty() {
            return None;
        }

        match self.policy() {
            SelectionPolicy::RoundRobin => {
                // Post-increment ticket, so the first pick lands on slot 1
                let ticket = self
                    .rotation
                    .fetch_add(1, Ordering::Relaxed)
                    .wrapping_add(1);
                let index = ticket % replicas.len();
                let replica = &replicas[index];

                debug!(pool = %replica.name(), index, "Round-robin selected replica");
                Some(Arc::clone(replica))
            }
            SelectionPolicy::Unrecognized(code) => {
                debug!(code, "No replica selected under unrecognized policy");
                None
            }
        }
    }

    /// Acquire a connection from the primary pool
    ///
    /// Returns `None` when no primary is assigned. Otherwise returns exactly
    /// what the pool's `acquire` returned, errors included.
    pub async fn primary_connection(&self) -> Option<Result<P::Connection, P::Error>> {
        let primary = self.primary()?;
        Some(primary.acquire().await)
    }

    /// Acquire a connection from the next replica in rotation
    ///
    /// Returns `None` when there are no replicas (reads falling back to the
    /// primary is the caller's decision) or the policy is unrecognized.
    /// Pool errors are passed through unchanged.
    pub async fn replica_connection(&self) -> Option<Result<P::Connection, P::Error>> {
        let replica = self.replica()?;
        Some(replica.acquire().await)
    }

    /// Close every pool and return the cluster to its empty state
    ///
    /// Each distinct handle is closed once, even if it appears several times
    /// in the replica list or is both primary and replica. Calling this on
    /// an empty cluster is a no-op, and the cluster can be repopulated
    /// afterwards.
    pub fn tear_down(&self) {
        let _structure = self.structure.lock();

        let primary = self.primary.write().take();
        let replicas = std::mem::take(&mut *self.replicas.write());

        if primary.is_none() && replicas.is_empty() {
            debug!("Teardown requested on an empty cluster");
            return;
        }

        let closed = close_distinct(primary.iter().chain(replicas.iter()));
        info!(
            closed,
            had_primary = primary.is_some(),
            replica_slots = replicas.len(),
            "Tore down cluster"
        );
    }
}

impl<P> fmt::Debug for Cluster<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("policy", &self.policy())
            .field("has_primary", &self.has_primary())
            .field("replica_slots", &self.replica_count())
            .finish_non_exhaustive()
    }
}

fn require_handle<P>(pool: Option<Arc<P>>, operation: &'static str) -> Result<Arc<P>, ClusterError> {
    pool.ok_or_else(|| {
        warn!(operation, "Rejected uninitialized pool handle");
        ClusterError::InvalidArgument(operation)
    })
}

/// Close each distinct handle once, returning how many were closed
fn close_distinct<'a, P>(pools: impl IntoIterator<Item = &'a Arc<P>>) -> usize
where
    P: ConnectionPool + 'a,
{
    let mut closed: Vec<&Arc<P>> = Vec::new();
    for pool in pools {
        if closed.iter().any(|done| Arc::ptr_eq(done, pool)) {
            continue;
        }
        debug!(pool = %pool.name(), "Closing pool");
        pool.close();
        closed.push(pool);
    }
    closed.len()
}

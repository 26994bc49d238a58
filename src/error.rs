//! Error types for cluster registration
//!
//! Selection never produces a `ClusterError`: an unconfigured primary or an
//! empty replica set is reported as `None`, and pool acquire failures are
//! handed back as the pool's own error type.

use thiserror::Error;

/// Errors returned by the structural (registration) operations of a cluster
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClusterError {
    /// A primary is already installed; `replace_primary` must be used instead
    #[error("a primary has already been assigned, use replace_primary to swap it")]
    AlreadyAssigned,

    /// A null pool handle was supplied to the named operation
    #[error("pool handle given to {0} is not initialized")]
    InvalidArgument(&'static str),
}

impl ClusterError {
    /// Check if this error came from an uninitialized pool handle
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// A selection policy name that this build does not recognise
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown selection policy '{0}'")]
pub struct UnknownPolicy(pub String);

//! Default values for configuration fields
//!
//! This module centralizes all default value functions used in serde deserialization.

use crate::cluster::SelectionPolicy;

/// Default replica selection policy
#[inline]
pub fn policy() -> SelectionPolicy {
    SelectionPolicy::RoundRobin
}

/// Default log filter (defer to `RUST_LOG`)
#[inline]
pub fn log_filter() -> Option<String> {
    None
}

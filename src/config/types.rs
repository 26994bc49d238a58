//! Configuration type definitions

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::cluster::SelectionPolicy;

/// Cluster configuration
///
/// ```toml
/// policy = "round-robin"
/// log_filter = "pool_cluster=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Replica selection policy, by name or numeric code
    #[serde(default = "defaults::policy")]
    pub policy: SelectionPolicy,

    /// `tracing` filter directives used by `logging::init_logging`
    #[serde(default = "defaults::log_filter", skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            policy: defaults::policy(),
            log_filter: defaults::log_filter(),
        }
    }
}

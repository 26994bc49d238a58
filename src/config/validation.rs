//! Configuration validation

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use super::types::ClusterConfig;
use crate::cluster::SelectionPolicy;

impl ClusterConfig {
    /// Validate configuration for correctness
    ///
    /// - `log_filter`, when present, must parse as filter directives
    /// - an unrecognized policy code is accepted but logged, since replica
    ///   selection will always come back empty under it
    pub fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.log_filter {
            EnvFilter::try_new(filter)
                .with_context(|| format!("Invalid log_filter '{}'", filter))?;
        }

        if let SelectionPolicy::Unrecognized(_) = self.policy {
            tracing::warn!(
                "Selection policy code {} is not supported by this build; \
                 replica selection will return no pool",
                self.policy.code()
            );
        }

        Ok(())
    }
}

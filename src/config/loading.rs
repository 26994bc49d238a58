//! Configuration loading from files and environment variables
//!
//! Environment variables take precedence over the file so container
//! deployments can switch policy without editing config.

use anyhow::Result;

use super::types::ClusterConfig;
use crate::cluster::SelectionPolicy;

/// Environment variable overriding the replica selection policy
pub const POLICY_ENV_VAR: &str = "POOL_CLUSTER_POLICY";

/// Read the policy override from `POOL_CLUSTER_POLICY`
///
/// Returns `Ok(None)` when the variable is unset. Accepts a policy name or a
/// numeric code.
pub fn policy_from_env() -> Result<Option<SelectionPolicy>> {
    match std::env::var(POLICY_ENV_VAR) {
        Ok(value) => {
            let policy = value
                .parse::<SelectionPolicy>()
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", POLICY_ENV_VAR, e))?;
            Ok(Some(policy))
        }
        Err(_) => Ok(None),
    }
}

/// Parse and validate configuration from TOML text
pub fn config_from_str(content: &str) -> Result<ClusterConfig> {
    let config: ClusterConfig = toml::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse cluster config: {}", e))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file, with environment variable overrides
pub fn load_config(config_path: &str) -> Result<ClusterConfig> {
    let config_content = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", config_path, e))?;

    let mut config: ClusterConfig = toml::from_str(&config_content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", config_path, e))?;

    if let Some(policy) = policy_from_env()? {
        tracing::info!(
            "Using selection policy {} from {} (overriding config file)",
            policy,
            POLICY_ENV_VAR
        );
        config.policy = policy;
    }

    config.validate()?;

    Ok(config)
}

/// Create a default configuration for examples/testing
#[must_use]
pub fn create_default_config() -> ClusterConfig {
    ClusterConfig::default()
}

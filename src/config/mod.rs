//! Configuration module
//!
//! Cluster settings loaded from TOML files with environment overrides.
//! Pools themselves are built by the caller; configuration only covers how
//! the cluster routes between them.

mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{
    POLICY_ENV_VAR, config_from_str, create_default_config, load_config, policy_from_env,
};
pub use types::ClusterConfig;

pub use defaults::{log_filter, policy};

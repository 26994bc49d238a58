//! Replica selection policy
//!
//! Policies have a stable numeric code so the active policy can live in an
//! atomic and be swapped without locking the selection path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownPolicy;

/// Strategy used to pick a replica for read traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "PolicySetting", into = "PolicySetting")]
pub enum SelectionPolicy {
    /// Rotate through the replica sequence using a shared atomic counter
    #[default]
    RoundRobin,
    /// A policy code this build cannot serve. Selection yields `None`.
    ///
    /// `Unrecognized(0)` collides with the round-robin code and is stored as
    /// [`SelectionPolicy::UNSERVED_CODE`] instead.
    Unrecognized(u8),
}

impl SelectionPolicy {
    const ROUND_ROBIN_CODE: u8 = 0;

    /// Code stored for an unrecognized policy whose own code names a known one
    pub const UNSERVED_CODE: u8 = u8::MAX;

    /// Decode a numeric policy code
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            Self::ROUND_ROBIN_CODE => Self::RoundRobin,
            other => Self::Unrecognized(other),
        }
    }

    /// Numeric code for this policy
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::RoundRobin => Self::ROUND_ROBIN_CODE,
            Self::Unrecognized(Self::ROUND_ROBIN_CODE) => Self::UNSERVED_CODE,
            Self::Unrecognized(code) => code,
        }
    }

    /// Canonical name, if the policy is known
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::RoundRobin => Some("round-robin"),
            Self::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unrecognized({})", self.code()),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = UnknownPolicy;

    /// Parse a policy name (case-insensitive) or a numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Ok(Self::from_code(code));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(UnknownPolicy(trimmed.to_string())),
        }
    }
}

impl From<u8> for SelectionPolicy {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

/// On-disk shape of a policy: either a name or a raw code
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PolicySetting {
    Code(u8),
    Name(String),
}

impl TryFrom<PolicySetting> for SelectionPolicy {
    type Error = UnknownPolicy;

    fn try_from(setting: PolicySetting) -> Result<Self, Self::Error> {
        match setting {
            PolicySetting::Code(code) => Ok(Self::from_code(code)),
            PolicySetting::Name(name) => name.parse(),
        }
    }
}

impl From<SelectionPolicy> for PolicySetting {
    fn from(policy: SelectionPolicy) -> Self {
        match policy.name() {
            Some(name) => Self::Name(name.to_string()),
            None => Self::Code(policy.code()),
        }
    }
}

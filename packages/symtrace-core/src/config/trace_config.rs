//! Trace builder configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{ConfigError, ConfigResult};
use crate::features::symbolic_trace::domain::COPY_CHAIN_LIMIT;

/// What to do with an `if` whose guard the condition algebra cannot model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardFailurePolicy {
    /// Skip the whole conditional statement, both branches included
    #[default]
    SkipStatement,
    /// Walk both branches under an opaque condition marker
    TraverseUnconstrained,
}

impl FromStr for GuardFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip_statement" | "skip" => Ok(Self::SkipStatement),
            "traverse_unconstrained" | "traverse" => Ok(Self::TraverseUnconstrained),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

fn default_copy_chain_limit() -> usize {
    COPY_CHAIN_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Recovery when a guard cannot be modeled (default: skip_statement)
    #[serde(default)]
    pub guard_failure_policy: GuardFailurePolicy,

    /// Count the implicit terminator in string-literal buffer sizes
    #[serde(default)]
    pub count_string_terminator: bool,

    /// Copy hops followed when replaying value snapshots (1..=4096)
    #[serde(default = "default_copy_chain_limit")]
    pub copy_chain_limit: usize,

    /// Log each completed block's dump at debug level
    #[serde(default)]
    pub log_completed_blocks: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            guard_failure_policy: GuardFailurePolicy::default(),
            count_string_terminator: false,
            copy_chain_limit: COPY_CHAIN_LIMIT,
            log_completed_blocks: false,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.copy_chain_limit == 0 || self.copy_chain_limit > 4096 {
            return Err(ConfigError::range_with_hint(
                "copy_chain_limit",
                self.copy_chain_limit,
                1,
                4096,
                "Copy chains need at least one hop; long chains are almost always cycles",
            ));
        }
        Ok(())
    }

    pub fn guard_failure_policy(mut self, v: GuardFailurePolicy) -> Self {
        self.guard_failure_policy = v;
        self
    }

    pub fn count_string_terminator(mut self, v: bool) -> Self {
        self.count_string_terminator = v;
        self
    }

    pub fn copy_chain_limit(mut self, v: usize) -> Self {
        self.copy_chain_limit = v;
        self
    }

    pub fn log_completed_blocks(mut self, v: bool) -> Self {
        self.log_completed_blocks = v;
        self
    }
}

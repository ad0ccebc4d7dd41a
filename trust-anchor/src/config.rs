//! Configuration for the governance engine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use did_registry::Address;

use crate::types::{GovernanceError, Result};

/// Configuration for a Trust Anchor governance engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// The Trust Anchor identity (the engine's own identity)
    pub anchor: Address,
    /// Initial owners
    pub owners: Vec<Address>,
    /// Initial quorum
    pub quorum: usize,
    /// Event configuration
    #[serde(default)]
    pub events: EventConfig,
}

impl GovernanceConfig {
    /// Create a config with default event settings.
    pub fn new(anchor: Address, owners: Vec<Address>, quorum: usize) -> Self {
        Self {
            anchor,
            owners,
            quorum,
            events: EventConfig::default(),
        }
    }

    /// Load and validate config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| GovernanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Check the owner set and quorum invariants.
    pub fn validate(&self) -> Result<()> {
        if self.anchor.is_zero() {
            return Err(GovernanceError::Config("anchor must not be zero".into()));
        }
        if self.owners.is_empty() {
            return Err(GovernanceError::Config("at least one owner is required".into()));
        }

        let mut seen = HashSet::new();
        for owner in &self.owners {
            if owner.is_zero() {
                return Err(GovernanceError::Config("owner must not be zero".into()));
            }
            if !seen.insert(*owner) {
                return Err(GovernanceError::Config(format!("duplicate owner {}", owner)));
            }
        }

        if self.quorum == 0 || self.quorum > self.owners.len() {
            return Err(GovernanceError::Config(format!(
                "quorum {} must be between 1 and {}",
                self.quorum,
                self.owners.len()
            )));
        }
        if self.events.channel_capacity == 0 {
            return Err(GovernanceError::Config(
                "event channel capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Event channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
    /// Maximum events kept in history
    pub history_limit: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_limit: 10_000,
        }
    }
}

//! Engine configuration file handling.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides. The defaults are the standard rule set: one origin, one
//! authority, two civics, an ethic budget of 3.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::EngineError;
use crate::types::RequirementPolicy;

/// Hard limits applied by the rule checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleLimits {
    /// Inclusive cap on the summed weighted cost of budgeted picks
    pub ethic_budget: u32,
    pub max_origins: usize,
    pub max_authorities: usize,
    pub max_civics: usize,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            ethic_budget: 3,
            max_origins: 1,
            max_authorities: 1,
            max_civics: 2,
        }
    }
}

/// Caps that bound the cost of the combinatorial searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchLimits {
    /// Longest requirement chain the resolver will follow
    pub max_requirement_depth: usize,
    /// Most candidate sets a single resolution or combination may produce
    pub max_candidates: usize,
    /// Scan at most this many allowed options when deriving availability
    pub max_scanned_options: Option<usize>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_requirement_depth: 32,
            max_candidates: 100_000,
            max_scanned_options: None,
        }
    }
}

/// Engine configuration that can be saved/loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub rules: RuleLimits,
    pub search: SearchLimits,
    pub unsatisfiable_requirements: RequirementPolicy,
}

impl EngineConfig {
    /// Create a configuration with the standard rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize engine configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.search.max_requirement_depth == 0 {
            return Err(EngineError::config("max_requirement_depth must be at least 1"));
        }
        if self.search.max_candidates == 0 {
            return Err(EngineError::config("max_candidates must be at least 1"));
        }
        if self.search.max_scanned_options == Some(0) {
            return Err(EngineError::config(
                "max_scanned_options must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

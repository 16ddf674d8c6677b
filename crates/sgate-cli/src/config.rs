//! # Configuration
//!
//! YAML file passed with `--config`. Every field has a default, so an empty
//! file and no file at all both give the built-in rules.
//!
//! ```yaml
//! policy:
//!   max_voltage: 1.2
//! ledger:
//!   genesis_marker: "Lab Bench Genesis"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sgate_ledger::{AuditLedger, DEFAULT_GENESIS_MARKER};
use sgate_policy::{PolicyEvaluator, PolicyRules};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SgateConfig {
    /// Rule set used by the evaluator.
    #[serde(default)]
    pub policy: PolicyRules,
    /// Ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Ledger section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Text stored in the genesis payload.
    #[serde(default = "default_genesis_marker")]
    pub genesis_marker: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_marker: default_genesis_marker(),
        }
    }
}

fn default_genesis_marker() -> String {
    DEFAULT_GENESIS_MARKER.to_string()
}

impl SgateConfig {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given, using built-in defaults");
            return Ok(Self::default());
        };
        let content = crate::read_file(path)?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse YAML text. Blank input gives the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate the rules and build a fresh ledger.
    pub fn build_ledger(&self) -> Result<AuditLedger> {
        let evaluator =
            PolicyEvaluator::new(self.policy.clone()).context("invalid policy rules")?;
        AuditLedger::builder()
            .evaluator(evaluator)
            .genesis_marker(self.ledger.genesis_marker.clone())
            .build()
            .context("failed to initialize ledger")
    }
}

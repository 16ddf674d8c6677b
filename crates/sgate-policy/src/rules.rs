//! # Rule Configuration
//!
//! [`PolicyRules`] holds the phrases and thresholds the evaluator matches
//! against. The defaults are the built-in operational invariants; every field
//! can be overridden from a config file, and omitted fields keep their
//! default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default ceiling for requested CPU voltage, inclusive.
pub const DEFAULT_MAX_VOLTAGE: f64 = 1.4;

/// Errors raised when a rule set cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyConfigError {
    /// A match phrase or term is empty; it would match every command.
    #[error("policy rule field `{field}` must be non-empty")]
    EmptyTerm {
        /// The offending field name.
        field: &'static str,
    },

    /// The voltage ceiling is NaN or infinite.
    #[error("max_voltage must be a finite number, got {0}")]
    NonFiniteCeiling(f64),
}

/// Phrases and thresholds for the prohibition rules.
///
/// Matching is case-insensitive; values are normalized when the evaluator is
/// built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyRules {
    /// Phrase whose presence marks a firewall-disable command.
    #[serde(default = "default_firewall_phrase")]
    pub firewall_phrase: String,
    /// First of the two terms that together mark a bootloader deletion.
    #[serde(default = "default_boot_delete_term")]
    pub boot_delete_term: String,
    /// Second of the two terms that together mark a bootloader deletion.
    #[serde(default = "default_boot_target_term")]
    pub boot_target_term: String,
    /// Keyword after which the requested voltage value appears.
    #[serde(default = "default_voltage_keyword")]
    pub voltage_keyword: String,
    /// Highest permitted voltage, inclusive.
    #[serde(default = "default_max_voltage")]
    pub max_voltage: f64,
}

impl PolicyRules {
    /// Check that the rule set is usable.
    pub fn validate(&self) -> Result<(), PolicyConfigError> {
        let terms = [
            ("firewall_phrase", &self.firewall_phrase),
            ("boot_delete_term", &self.boot_delete_term),
            ("boot_target_term", &self.boot_target_term),
            ("voltage_keyword", &self.voltage_keyword),
        ];
        for (field, value) in terms {
            if value.trim().is_empty() {
                return Err(PolicyConfigError::EmptyTerm { field });
            }
        }
        if !self.max_voltage.is_finite() {
            return Err(PolicyConfigError::NonFiniteCeiling(self.max_voltage));
        }
        Ok(())
    }

    /// The same rules with a different voltage ceiling.
    pub fn with_max_voltage(mut self, max_voltage: f64) -> Self {
        self.max_voltage = max_voltage;
        self
    }
}

impl Default for PolicyRules {
    fn default() -> Self {
        Self {
            firewall_phrase: default_firewall_phrase(),
            boot_delete_term: default_boot_delete_term(),
            boot_target_term: default_boot_target_term(),
            voltage_keyword: default_voltage_keyword(),
            max_voltage: default_max_voltage(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default-value functions used by serde
// ---------------------------------------------------------------------------

fn default_firewall_phrase() -> String {
    "disable firewall".to_string()
}

fn default_boot_delete_term() -> String {
    "delete".to_string()
}

fn default_boot_target_term() -> String {
    "boot".to_string()
}

fn default_voltage_keyword() -> String {
    "voltage".to_string()
}

fn default_max_voltage() -> f64 {
    DEFAULT_MAX_VOLTAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let rules = PolicyRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(rules.max_voltage, 1.4);
        assert_eq!(rules.firewall_phrase, "disable firewall");
    }

    #[test]
    fn empty_term_rejected() {
        let rules = PolicyRules {
            boot_target_term: "  ".to_string(),
            ..PolicyRules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(PolicyConfigError::EmptyTerm {
                field: "boot_target_term"
            })
        );
    }

    #[test]
    fn non_finite_ceiling_rejected() {
        let rules = PolicyRules::default().with_max_voltage(f64::INFINITY);
        assert!(matches!(
            rules.validate(),
            Err(PolicyConfigError::NonFiniteCeiling(_))
        ));
        assert!(PolicyRules::default()
            .with_max_voltage(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let rules: PolicyRules = serde_yaml::from_str("max_voltage: 1.2\n").unwrap();
        assert_eq!(rules.max_voltage, 1.2);
        assert_eq!(rules.voltage_keyword, "voltage");
        assert_eq!(rules.boot_delete_term, "delete");
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<PolicyRules, _> = serde_yaml::from_str("max_voltag: 1.2\n");
        assert!(result.is_err());
    }
}

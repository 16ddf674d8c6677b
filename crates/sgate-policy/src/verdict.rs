//! # Verdicts and Rule Codes

use serde::{Deserialize, Serialize};

/// Identifier of the prohibition a non-compliant action matched.
///
/// Variants are listed in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolatedRule {
    /// The command disables the firewall.
    FirewallDisable,
    /// The command deletes boot-related data.
    BootloaderMod,
    /// The command sets a voltage whose value could not be parsed.
    MalformedVoltageParam,
    /// The command sets a voltage above the configured ceiling.
    VoltageLimitExceeded,
}

impl ViolatedRule {
    /// All rule codes, in evaluation priority order.
    pub const ALL: [ViolatedRule; 4] = [
        Self::FirewallDisable,
        Self::BootloaderMod,
        Self::MalformedVoltageParam,
        Self::VoltageLimitExceeded,
    ];

    /// The stable wire code for this rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirewallDisable => "FIREWALL_DISABLE",
            Self::BootloaderMod => "BOOTLOADER_MOD",
            Self::MalformedVoltageParam => "MALFORMED_VOLTAGE_PARAM",
            Self::VoltageLimitExceeded => "VOLTAGE_LIMIT_EXCEEDED",
        }
    }

    /// The operational invariant this rule protects.
    pub fn description(&self) -> &'static str {
        match self {
            Self::FirewallDisable => "CRITICAL: do not disable the firewall",
            Self::BootloaderMod => "CRITICAL: do not delete the system bootloader",
            Self::MalformedVoltageParam => "CRITICAL: voltage changes must state a numeric value",
            Self::VoltageLimitExceeded => "CRITICAL: CPU voltage must not exceed the ceiling",
        }
    }
}

impl std::fmt::Display for ViolatedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one [`ActionDescriptor`](crate::ActionDescriptor).
///
/// A verdict is compliant exactly when it carries no violated rule; the
/// private fields keep the two from disagreeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    compliant: bool,
    violated_rule: Option<ViolatedRule>,
}

impl Verdict {
    /// A compliant verdict.
    pub fn compliant() -> Self {
        Self {
            compliant: true,
            violated_rule: None,
        }
    }

    /// A non-compliant verdict naming the first rule matched.
    pub fn violation(rule: ViolatedRule) -> Self {
        Self {
            compliant: false,
            violated_rule: Some(rule),
        }
    }

    /// Whether the action may proceed.
    pub fn is_compliant(&self) -> bool {
        self.compliant
    }

    /// The rule that was violated, if any.
    pub fn violated_rule(&self) -> Option<ViolatedRule> {
        self.violated_rule
    }
}

//! # Authorization Outcomes

use serde::{Deserialize, Serialize};
use sgate_policy::ViolatedRule;

/// Why a proposal was denied.
///
/// The policy codes mirror [`ViolatedRule`]; the remaining codes are raised by
/// the ledger itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    /// See [`ViolatedRule::FirewallDisable`].
    FirewallDisable,
    /// See [`ViolatedRule::BootloaderMod`].
    BootloaderMod,
    /// See [`ViolatedRule::MalformedVoltageParam`].
    MalformedVoltageParam,
    /// See [`ViolatedRule::VoltageLimitExceeded`].
    VoltageLimitExceeded,
    /// The proposer identifier was empty or blank.
    InvalidProposer,
    /// The entry could not be hashed; nothing was appended.
    LedgerFault,
}

impl DenialReason {
    /// The stable wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirewallDisable => "FIREWALL_DISABLE",
            Self::BootloaderMod => "BOOTLOADER_MOD",
            Self::MalformedVoltageParam => "MALFORMED_VOLTAGE_PARAM",
            Self::VoltageLimitExceeded => "VOLTAGE_LIMIT_EXCEEDED",
            Self::InvalidProposer => "INVALID_PROPOSER",
            Self::LedgerFault => "LEDGER_FAULT",
        }
    }

    /// The policy rule behind this denial, if it came from the evaluator.
    pub fn policy_rule(&self) -> Option<ViolatedRule> {
        match self {
            Self::FirewallDisable => Some(ViolatedRule::FirewallDisable),
            Self::BootloaderMod => Some(ViolatedRule::BootloaderMod),
            Self::MalformedVoltageParam => Some(ViolatedRule::MalformedVoltageParam),
            Self::VoltageLimitExceeded => Some(ViolatedRule::VoltageLimitExceeded),
            Self::InvalidProposer | Self::LedgerFault => None,
        }
    }
}

impl From<ViolatedRule> for DenialReason {
    fn from(rule: ViolatedRule) -> Self {
        match rule {
            ViolatedRule::FirewallDisable => Self::FirewallDisable,
            ViolatedRule::BootloaderMod => Self::BootloaderMod,
            ViolatedRule::MalformedVoltageParam => Self::MalformedVoltageParam,
            ViolatedRule::VoltageLimitExceeded => Self::VoltageLimitExceeded,
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The definite grant/deny outcome of one authorization request.
///
/// On grant, `entry_index` and `entry_hash` identify the new ledger entry and
/// `reason` is absent. On denial only `reason` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    granted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<DenialReason>,
}

impl AuthorizationResult {
    pub(crate) fn granted(entry_index: u64, entry_hash: String) -> Self {
        Self {
            granted: true,
            entry_index: Some(entry_index),
            entry_hash: Some(entry_hash),
            reason: None,
        }
    }

    pub(crate) fn denied(reason: DenialReason) -> Self {
        Self {
            granted: false,
            entry_index: None,
            entry_hash: None,
            reason: Some(reason),
        }
    }

    /// Whether the action may be executed.
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Index of the ledger entry recording the grant.
    pub fn entry_index(&self) -> Option<u64> {
        self.entry_index
    }

    /// Hash of the ledger entry recording the grant.
    pub fn entry_hash(&self) -> Option<&str> {
        self.entry_hash.as_deref()
    }

    /// Why the request was denied.
    pub fn reason(&self) -> Option<DenialReason> {
        self.reason
    }
}

//! # Policy Evaluator
//!
//! Classifies an [`ActionDescriptor`] as compliant or not.
//!
//! ## Determinism
//!
//! Evaluation is a pure function of the descriptor's command and the rule set
//! fixed at construction. Rules are checked in a fixed order and the first
//! match wins, so the reported rule is stable even when a command trips more
//! than one prohibition.
//!
//! ## Fail-Closed Parsing
//!
//! A voltage command whose value cannot be parsed, or parses to NaN or an
//! infinity, is rejected with [`ViolatedRule::MalformedVoltageParam`]. A parse
//! failure never lets an action through.

use tracing::{debug, trace};

use crate::action::ActionDescriptor;
use crate::rules::{PolicyConfigError, PolicyRules};
use crate::verdict::{Verdict, ViolatedRule};

/// Evaluates proposed actions against a fixed rule set.
///
/// Construct once and share freely: the evaluator holds no mutable state and
/// is `Send + Sync`.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    rules: PolicyRules,
    // Uppercased copies of the match terms, built once.
    firewall_phrase: String,
    boot_delete_term: String,
    boot_target_term: String,
    voltage_keyword: String,
}

impl PolicyEvaluator {
    /// Build an evaluator from a validated rule set.
    pub fn new(rules: PolicyRules) -> Result<Self, PolicyConfigError> {
        rules.validate()?;
        Ok(Self::compile(rules))
    }

    fn compile(rules: PolicyRules) -> Self {
        Self {
            firewall_phrase: normalize(&rules.firewall_phrase),
            boot_delete_term: normalize(&rules.boot_delete_term),
            boot_target_term: normalize(&rules.boot_target_term),
            voltage_keyword: normalize(&rules.voltage_keyword),
            rules,
        }
    }

    /// The rule set this evaluator enforces.
    pub fn rules(&self) -> &PolicyRules {
        &self.rules
    }

    /// Evaluate a proposed action.
    pub fn evaluate(&self, descriptor: &ActionDescriptor) -> Verdict {
        let command = normalize(descriptor.command());

        let verdict = match self.first_violation(&command) {
            Some(rule) => Verdict::violation(rule),
            None => Verdict::compliant(),
        };

        debug!(
            command = descriptor.command(),
            compliant = verdict.is_compliant(),
            rule = verdict.violated_rule().map(|r| r.as_str()),
            "evaluated action against policy"
        );
        verdict
    }

    fn first_violation(&self, command: &str) -> Option<ViolatedRule> {
        if command.contains(&self.firewall_phrase) {
            trace!("network-security rule matched");
            return Some(ViolatedRule::FirewallDisable);
        }

        if command.contains(&self.boot_delete_term) && command.contains(&self.boot_target_term) {
            trace!("boot-integrity rule matched");
            return Some(ViolatedRule::BootloaderMod);
        }

        if let Some(pos) = command.find(&self.voltage_keyword) {
            let argument = command[pos + self.voltage_keyword.len()..].trim();
            return match argument.parse::<f64>() {
                Ok(volts) if volts.is_finite() => {
                    if volts > self.rules.max_voltage {
                        trace!(volts, ceiling = self.rules.max_voltage, "voltage over ceiling");
                        Some(ViolatedRule::VoltageLimitExceeded)
                    } else {
                        None
                    }
                }
                _ => {
                    trace!(argument, "voltage argument unparseable; failing closed");
                    Some(ViolatedRule::MalformedVoltageParam)
                }
            };
        }

        None
    }
}

impl Default for PolicyEvaluator {
    /// The built-in rule set, which always validates.
    fn default() -> Self {
        Self::compile(PolicyRules::default())
    }
}

/// Full Unicode uppercasing. Characters such as `ı`, `ſ` and `ﬁ` map onto
/// ASCII letters, so a command cannot dodge a term with look-alike letters.
fn normalize(text: &str) -> String {
    text.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(command: &str) -> Verdict {
        PolicyEvaluator::default().evaluate(&ActionDescriptor::new(command, "test"))
    }

    fn rule(command: &str) -> Option<ViolatedRule> {
        eval(command).violated_rule()
    }

    #[test]
    fn safe_command_is_compliant() {
        assert!(eval("DELETE TEMP FILES").is_compliant());
        assert!(eval("NO_OP").is_compliant());
    }

    #[test]
    fn empty_command_is_compliant() {
        assert!(eval("").is_compliant());
    }

    #[test]
    fn firewall_rule_is_case_insensitive() {
        assert_eq!(rule("DISABLE FIREWALL FOR SPEED"), Some(ViolatedRule::FirewallDisable));
        assert_eq!(rule("please Disable Firewall"), Some(ViolatedRule::FirewallDisable));
    }

    #[test]
    fn firewall_phrase_must_be_contiguous() {
        assert!(eval("disable the firewall").is_compliant());
    }

    #[test]
    fn boot_rule_is_order_insensitive() {
        assert_eq!(rule("DELETE SYSTEM BOOTLOADER"), Some(ViolatedRule::BootloaderMod));
        assert_eq!(rule("boot sector: delete"), Some(ViolatedRule::BootloaderMod));
        assert_eq!(rule("rm /boot && delete it"), Some(ViolatedRule::BootloaderMod));
    }

    #[test]
    fn boot_rule_needs_both_terms() {
        assert!(eval("delete cache").is_compliant());
        assert!(eval("reboot now").is_compliant());
    }

    #[test]
    fn voltage_over_ceiling_rejected() {
        assert_eq!(rule("SET CPU VOLTAGE 1.5"), Some(ViolatedRule::VoltageLimitExceeded));
    }

    #[test]
    fn voltage_boundary() {
        assert!(eval("SET CPU VOLTAGE 1.4").is_compliant());
        assert_eq!(rule("SET CPU VOLTAGE 1.4001"), Some(ViolatedRule::VoltageLimitExceeded));
        assert!(eval("SET CPU VOLTAGE 1.2").is_compliant());
        assert!(eval("set cpu voltage   0.9  ").is_compliant());
    }

    #[test]
    fn malformed_voltage_fails_closed() {
        assert_eq!(rule("SET CPU VOLTAGE ABC"), Some(ViolatedRule::MalformedVoltageParam));
        assert_eq!(rule("SET CPU VOLTAGE"), Some(ViolatedRule::MalformedVoltageParam));
        assert_eq!(rule("SET CPU VOLTAGE 1.5 NOW"), Some(ViolatedRule::MalformedVoltageParam));
    }

    #[test]
    fn non_finite_voltage_fails_closed() {
        assert_eq!(rule("SET CPU VOLTAGE NAN"), Some(ViolatedRule::MalformedVoltageParam));
        assert_eq!(rule("SET CPU VOLTAGE INF"), Some(ViolatedRule::MalformedVoltageParam));
        assert_eq!(rule("SET CPU VOLTAGE -inf"), Some(ViolatedRule::MalformedVoltageParam));
    }

    #[test]
    fn firewall_outranks_voltage() {
        assert_eq!(
            rule("DISABLE FIREWALL AND SET VOLTAGE 9.9"),
            Some(ViolatedRule::FirewallDisable)
        );
    }

    #[test]
    fn firewall_outranks_boot() {
        assert_eq!(
            rule("delete boot files then disable firewall"),
            Some(ViolatedRule::FirewallDisable)
        );
    }

    #[test]
    fn boot_outranks_voltage() {
        assert_eq!(
            rule("delete boot config, voltage 5"),
            Some(ViolatedRule::BootloaderMod)
        );
    }

    #[test]
    fn context_is_never_evaluated() {
        let evaluator = PolicyEvaluator::default();
        let descriptor = ActionDescriptor::new("NO_OP", "disable firewall and delete boot");
        assert!(evaluator.evaluate(&descriptor).is_compliant());
    }

    #[test]
    fn alternate_ceiling() {
        let evaluator =
            PolicyEvaluator::new(PolicyRules::default().with_max_voltage(1.6)).unwrap();
        let descriptor = ActionDescriptor::new("SET CPU VOLTAGE 1.5", "");
        assert!(evaluator.evaluate(&descriptor).is_compliant());

        let strict = PolicyEvaluator::new(PolicyRules::default().with_max_voltage(1.0)).unwrap();
        assert_eq!(
            strict.evaluate(&ActionDescriptor::new("SET CPU VOLTAGE 1.2", "")).violated_rule(),
            Some(ViolatedRule::VoltageLimitExceeded)
        );
    }

    #[test]
    fn configured_terms_are_normalized() {
        let rules = PolicyRules {
            firewall_phrase: "DROP IPTABLES".to_string(),
            ..PolicyRules::default()
        };
        let evaluator = PolicyEvaluator::new(rules).unwrap();
        assert_eq!(
            evaluator.evaluate(&ActionDescriptor::new("drop iptables now", "")).violated_rule(),
            Some(ViolatedRule::FirewallDisable)
        );
        assert!(evaluator
            .evaluate(&ActionDescriptor::new("disable firewall", ""))
            .is_compliant());
    }

    #[test]
    fn letters_that_uppercase_to_ascii_still_match() {
        assert_eq!(rule("d\u{131}sable f\u{131}rewall"), Some(ViolatedRule::FirewallDisable));
        assert_eq!(rule("DISABLE \u{FB01}REWALL"), Some(ViolatedRule::FirewallDisable));
        assert_eq!(rule("di\u{17F}able firewall"), Some(ViolatedRule::FirewallDisable));
    }

    #[test]
    fn voltage_value_read_from_uppercased_command() {
        assert_eq!(rule("set voltage nan"), Some(ViolatedRule::MalformedVoltageParam));
        assert_eq!(rule("set voltage inf"), Some(ViolatedRule::MalformedVoltageParam));
        assert_eq!(rule("set voltage 1.5e0"), Some(ViolatedRule::VoltageLimitExceeded));
        assert_eq!(rule("set \u{FB01}rst voltage 1.2"), None);
    }

    #[test]
    fn invalid_rules_rejected_at_construction() {
        let rules = PolicyRules {
            voltage_keyword: String::new(),
            ..PolicyRules::default()
        };
        assert!(PolicyEvaluator::new(rules).is_err());
    }

    #[test]
    fn default_matches_new_with_default_rules() {
        let built = PolicyEvaluator::new(PolicyRules::default()).unwrap();
        let default = PolicyEvaluator::default();
        for cmd in ["SET CPU VOLTAGE 1.5", "DELETE BOOT", "disable firewall", "ls"] {
            let d = ActionDescriptor::new(cmd, "");
            assert_eq!(built.evaluate(&d), default.evaluate(&d));
        }
        assert_eq!(built.rules(), default.rules());
    }
}

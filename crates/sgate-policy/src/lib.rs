//! # sgate-policy: Action Policy Evaluation
//!
//! Decides whether a proposed agent action complies with a fixed set of
//! non-negotiable operational invariants.
//!
//! ## Rules
//!
//! Rules are checked in a fixed priority order and the first match wins:
//!
//! 1. **Network security**: the command disables the firewall
//!    ([`ViolatedRule::FirewallDisable`]).
//! 2. **Boot integrity**: the command deletes something boot-related
//!    ([`ViolatedRule::BootloaderMod`]).
//! 3. **Hardware limit**: the command sets a voltage that is unparseable
//!    ([`ViolatedRule::MalformedVoltageParam`]) or above the ceiling
//!    ([`ViolatedRule::VoltageLimitExceeded`]).
//!
//! Anything else is compliant.
//!
//! ## Crate Policy
//!
//! - Evaluation is pure: no I/O, no shared state, no panics. Every input,
//!   however malformed, resolves to a [`Verdict`].
//! - Thresholds and phrases live in [`PolicyRules`], which is serde-loadable
//!   so alternate rule sets can be exercised without code changes.

pub mod action;
pub mod evaluator;
pub mod rules;
pub mod verdict;

pub use action::ActionDescriptor;
pub use evaluator::PolicyEvaluator;
pub use rules::{PolicyConfigError, PolicyRules};
pub use verdict::{Verdict, ViolatedRule};

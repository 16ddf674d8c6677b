//! # Demo Subcommand
//!
//! Replays the reference scenarios: one safe command, one over-voltage
//! request, one firewall disable. Commands are given literally; no intent
//! inference takes place.

use anyhow::{bail, Result};
use clap::Args;
use sgate_policy::ActionDescriptor;

use crate::config::SgateConfig;

/// Agent identifier used by the scenarios.
pub const DEMO_AGENT: &str = "TinyAI_Core_v1";

/// `(intent, command)` pairs, in replay order.
pub const SCENARIOS: [(&str, &str); 3] = [
    ("I want to clean up disk space", "DELETE TEMP FILES"),
    ("Make the processor run faster than stock limits", "SET CPU VOLTAGE 1.5"),
    ("Allow unrestricted network access for speed", "DISABLE FIREWALL FOR SPEED"),
];

/// Arguments for `sgate demo`.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Print the final chain as JSON after the scenarios.
    #[arg(long)]
    pub show_chain: bool,
}

/// Execute the demo subcommand.
pub fn run_demo(args: &DemoArgs, config: &SgateConfig) -> Result<u8> {
    let ledger = config.build_ledger()?;
    println!("genesis: {}", ledger.head().hash);

    for (intent, command) in SCENARIOS {
        println!();
        println!("--- {DEMO_AGENT} attempting: {intent} ---");
        println!("command: {command}");
        let result =
            ledger.request_authorization(DEMO_AGENT, &ActionDescriptor::new(command, intent));
        println!("{}", crate::format_outcome(&result));
        if result.is_granted() {
            println!("executing: {command}");
        } else {
            println!("blocked: execution prevented");
        }
    }

    println!();
    if args.show_chain {
        println!("{}", serde_json::to_string_pretty(&ledger.entries())?);
    }
    match ledger.integrity_report() {
        Ok(()) => {
            println!("OK: chain verified height={}", ledger.height());
            Ok(0)
        }
        Err(violation) => bail!("ledger integrity check failed: {violation}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgate_ledger::{AuditLedger, DenialReason};

    #[test]
    fn scenarios_produce_reference_outcomes() {
        let ledger = AuditLedger::new().unwrap();
        let reasons: Vec<_> = SCENARIOS
            .iter()
            .map(|(intent, cmd)| {
                ledger
                    .request_authorization(DEMO_AGENT, &ActionDescriptor::new(*cmd, *intent))
                    .reason()
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                None,
                Some(DenialReason::VoltageLimitExceeded),
                Some(DenialReason::FirewallDisable),
            ]
        );
        assert_eq!(ledger.height(), 2);
    }

    #[test]
    fn demo_exits_zero() {
        let args = DemoArgs { show_chain: true };
        assert_eq!(run_demo(&args, &SgateConfig::default()).unwrap(), 0);
    }
}

//! # Authorize Subcommand
//!
//! Evaluates one proposal against a fresh ledger. Exit code 0 means granted,
//! 2 means denied.

use anyhow::Result;
use clap::Args;
use sgate_policy::ActionDescriptor;

use crate::config::SgateConfig;

/// Arguments for `sgate authorize`.
#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// Identifier of the proposing agent.
    #[arg(long)]
    pub proposer: String,

    /// Command string to authorize.
    #[arg(long)]
    pub command: String,

    /// Free-text justification recorded with the command.
    #[arg(long, default_value = "")]
    pub context: String,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the authorize subcommand.
pub fn run_authorize(args: &AuthorizeArgs, config: &SgateConfig) -> Result<u8> {
    let ledger = config.build_ledger()?;
    let descriptor = ActionDescriptor::new(args.command.clone(), args.context.clone());
    let result = ledger.request_authorization(&args.proposer, &descriptor);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", crate::format_outcome(&result));
    }

    Ok(if result.is_granted() { 0 } else { 2 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(proposer: &str, command: &str) -> AuthorizeArgs {
        AuthorizeArgs {
            proposer: proposer.to_string(),
            command: command.to_string(),
            context: String::new(),
            json: false,
        }
    }

    #[test]
    fn safe_command_exits_zero() {
        let code = run_authorize(&args("agent", "DELETE TEMP FILES"), &SgateConfig::default());
        assert_eq!(code.unwrap(), 0);
    }

    #[test]
    fn unsafe_command_exits_two() {
        let code = run_authorize(
            &args("agent", "DISABLE FIREWALL FOR SPEED"),
            &SgateConfig::default(),
        );
        assert_eq!(code.unwrap(), 2);
    }

    #[test]
    fn blank_proposer_exits_two() {
        let code = run_authorize(&args(" ", "ls"), &SgateConfig::default());
        assert_eq!(code.unwrap(), 2);
    }

    #[test]
    fn invalid_rules_are_an_error() {
        let mut config = SgateConfig::default();
        config.policy.max_voltage = f64::NAN;
        assert!(run_authorize(&args("agent", "ls"), &config).is_err());
    }
}

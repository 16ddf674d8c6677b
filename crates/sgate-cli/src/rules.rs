//! # Rules Subcommand

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sgate_policy::{PolicyEvaluator, ViolatedRule};

use crate::config::SgateConfig;

/// Output format for `sgate rules`.
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum RulesFormat {
    /// YAML, loadable as the `policy:` config section.
    #[default]
    Yaml,
    /// JSON.
    Json,
}

/// Arguments for `sgate rules`.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = RulesFormat::Yaml)]
    pub format: RulesFormat,
}

/// Execute the rules subcommand. Fails if the configured rules are invalid.
pub fn run_rules(args: &RulesArgs, config: &SgateConfig) -> Result<u8> {
    let evaluator = PolicyEvaluator::new(config.policy.clone()).context("invalid policy rules")?;
    let rules = evaluator.rules();

    match args.format {
        RulesFormat::Yaml => print!("{}", serde_yaml::to_string(rules)?),
        RulesFormat::Json => println!("{}", serde_json::to_string_pretty(rules)?),
    }

    eprintln!("rules are checked in this order; the first match denies:");
    for rule in ViolatedRule::ALL {
        eprintln!("  {rule}: {}", rule.description());
    }
    Ok(0)
}

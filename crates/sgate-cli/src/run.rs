//! # Run Subcommand
//!
//! Replays a file of proposals through one ledger, in order, then checks the
//! resulting chain. The file is YAML or JSON:
//!
//! ```yaml
//! - proposer: TinyAI_Core_v1
//!   command: DELETE TEMP FILES
//!   context: I want to clean up disk space
//! - proposer: TinyAI_Core_v1
//!   command: SET CPU VOLTAGE 1.5
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use sgate_ledger::{AuditLedger, AuthorizationResult};
use sgate_policy::ActionDescriptor;

use crate::config::SgateConfig;

/// One proposal in a replay file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proposal {
    /// Identifier of the proposing agent.
    pub proposer: String,
    /// Command string.
    pub command: String,
    /// Free-text justification.
    #[serde(default)]
    pub context: String,
}

impl Proposal {
    /// The action this proposal asks for.
    pub fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor::new(self.command.clone(), self.context.clone())
    }
}

/// Arguments for `sgate run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML or JSON file holding a list of proposals.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the resulting chain to this path as JSON.
    #[arg(long, value_name = "PATH")]
    pub emit_chain: Option<PathBuf>,

    /// Print outcomes as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Parse a proposal list. JSON input is accepted as YAML.
pub fn parse_proposals(content: &str) -> Result<Vec<Proposal>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Submit every proposal in order.
pub fn replay(ledger: &AuditLedger, proposals: &[Proposal]) -> Vec<AuthorizationResult> {
    proposals
        .iter()
        .map(|p| ledger.request_authorization(&p.proposer, &p.descriptor()))
        .collect()
}

/// Execute the run subcommand.
pub fn run_run(args: &RunArgs, config: &SgateConfig) -> Result<u8> {
    let content = crate::read_file(&args.file)?;
    let proposals = parse_proposals(&content)
        .with_context(|| format!("invalid proposal file {}", args.file.display()))?;
    tracing::info!(count = proposals.len(), "replaying proposals");

    let ledger = config.build_ledger()?;
    let results = replay(&ledger, &proposals);

    if args.json {
        let report: Vec<_> = proposals
            .iter()
            .zip(&results)
            .map(|(p, r)| serde_json::json!({"proposal": p, "result": r}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (p, r) in proposals.iter().zip(&results) {
            println!("{} {:?}: {}", p.proposer, p.command, crate::format_outcome(r));
        }
        let granted = results.iter().filter(|r| r.is_granted()).count();
        println!(
            "{granted} granted, {} denied, chain height {}",
            results.len() - granted,
            ledger.height()
        );
    }

    if let Some(path) = &args.emit_chain {
        let json = serde_json::to_string_pretty(&ledger.entries())?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write chain to {}", path.display()))?;
        tracing::info!(path = %path.display(), "chain written");
    }

    if let Err(violation) = ledger.integrity_report() {
        bail!("ledger integrity check failed: {violation}");
    }
    Ok(0)
}

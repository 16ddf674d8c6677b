//! # sgate-cli: Command-Line Front End
//!
//! Provides the `sgate` binary. Every subcommand builds a fresh in-memory
//! ledger from the loaded [`SgateConfig`](config::SgateConfig); nothing is
//! persisted between invocations except what `run --emit-chain` writes.
//!
//! ## Subcommands
//!
//! - `sgate authorize`: Evaluate and record a single proposal.
//! - `sgate run`: Replay a YAML/JSON list of proposals.
//! - `sgate demo`: Replay the three reference scenarios.
//! - `sgate verify-chain`: Verify an exported chain offline.
//! - `sgate rules`: Print the effective rule set.
//!
//! ```bash
//! sgate authorize --proposer TinyAI_Core_v1 --command "DELETE TEMP FILES"
//! sgate run proposals.yaml --emit-chain chain.json
//! sgate verify-chain chain.json
//! ```

pub mod authorize;
pub mod config;
pub mod demo;
pub mod rules;
pub mod run;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

/// Read a UTF-8 file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// One-line human summary of an authorization outcome.
pub fn format_outcome(result: &sgate_ledger::AuthorizationResult) -> String {
    match (result.entry_index(), result.entry_hash(), result.reason()) {
        (Some(index), Some(hash), _) if result.is_granted() => {
            format!("GRANTED entry={index} hash={hash}")
        }
        (_, _, Some(reason)) => match reason.policy_rule() {
            Some(rule) => format!("DENIED reason={reason} ({})", rule.description()),
            None => format!("DENIED reason={reason}"),
        },
        _ => "DENIED".to_string(),
    }
}

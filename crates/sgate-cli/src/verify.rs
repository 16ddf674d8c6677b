//! # Verify-Chain Subcommand
//!
//! Checks a chain exported by `sgate run --emit-chain` without rebuilding
//! the ledger that produced it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sgate_ledger::{verify_chain, LedgerEntry};

/// Arguments for `sgate verify-chain`.
#[derive(Args, Debug)]
pub struct VerifyChainArgs {
    /// JSON file holding an array of ledger entries.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the verify-chain subcommand. Exit code 1 means the chain is
/// broken.
pub fn run_verify_chain(args: &VerifyChainArgs) -> Result<u8> {
    let content = crate::read_file(&args.file)?;
    let entries: Vec<LedgerEntry> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse chain: {}", args.file.display()))?;

    match verify_chain(&entries) {
        Ok(()) => {
            let head = entries.last().map(|e| e.hash.as_str()).unwrap_or_default();
            println!("OK: chain verified entries={} head={head}", entries.len());
            Ok(0)
        }
        Err(violation) => {
            tracing::warn!(%violation, "exported chain failed verification");
            println!("FAIL: {violation}");
            Ok(1)
        }
    }
}

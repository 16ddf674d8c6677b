//! # Ledger Errors
//!
//! Construction-time failures only. Once built, the ledger reports every
//! outcome through [`AuthorizationResult`](crate::AuthorizationResult) and
//! never returns an error.

use sgate_core::CanonicalizationError;
use thiserror::Error;

/// Errors raised while building an [`AuditLedger`](crate::AuditLedger).
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The genesis marker is blank.
    #[error("genesis marker must be non-empty")]
    EmptyGenesisMarker,

    /// The genesis payload could not be hashed.
    #[error("failed to hash genesis entry: {0}")]
    Genesis(#[from] CanonicalizationError),
}

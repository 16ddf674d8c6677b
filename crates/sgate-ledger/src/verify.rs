//! # Chain Verification
//!
//! [`verify_chain`] works on any slice of entries, so an exported history can
//! be checked without the ledger that produced it.

use thiserror::Error;

use crate::entry::{LedgerEntry, GENESIS_PREVIOUS_HASH};

/// The first integrity failure found while walking a chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// A chain always holds at least the genesis entry.
    #[error("chain is empty")]
    EmptyChain,

    /// Entry 0 is not a genesis entry.
    #[error("malformed genesis entry: {reason}")]
    MalformedGenesis {
        /// What is wrong with it.
        reason: String,
    },

    /// An entry's index does not match its position.
    #[error("index gap at position {position}: entry claims index {found}")]
    IndexGap {
        /// Position in the slice.
        position: u64,
        /// Index stored in the entry.
        found: u64,
    },

    /// `previous_hash` does not match the predecessor's `hash`.
    #[error("broken link at index {index}: expected previous hash {expected}, found {found}")]
    BrokenLink {
        /// Entry with the bad link.
        index: u64,
        /// Predecessor's hash.
        expected: String,
        /// Stored `previous_hash`.
        found: String,
    },

    /// The stored hash is not the hash of the stored contents.
    #[error("hash mismatch at index {index}: stored {stored}, recomputed {recomputed}")]
    HashMismatch {
        /// Entry with the bad hash.
        index: u64,
        /// Hash stored in the entry.
        stored: String,
        /// Hash recomputed from payload and `previous_hash`.
        recomputed: String,
    },

    /// The payload could not be canonicalized.
    #[error("entry {index} could not be hashed: {reason}")]
    Unhashable {
        /// Offending entry.
        index: u64,
        /// Canonicalization error text.
        reason: String,
    },

    /// An entry is timestamped before its predecessor.
    #[error("timestamp regression at index {index}")]
    TimestampRegression {
        /// Entry whose timestamp went backwards.
        index: u64,
    },

    /// A genesis payload appears after index 0.
    #[error("genesis payload at index {index}")]
    UnexpectedGenesisPayload {
        /// Offending entry.
        index: u64,
    },
}

impl IntegrityViolation {
    /// Index of the entry where verification stopped, if any.
    pub fn index(&self) -> Option<u64> {
        match self {
            Self::EmptyChain => None,
            Self::MalformedGenesis { .. } => Some(0),
            Self::IndexGap { position, .. } => Some(*position),
            Self::BrokenLink { index, .. }
            | Self::HashMismatch { index, .. }
            | Self::Unhashable { index, .. }
            | Self::TimestampRegression { index }
            | Self::UnexpectedGenesisPayload { index } => Some(*index),
        }
    }
}

/// Walk `entries` from genesis and return the first violation.
pub fn verify_chain(entries: &[LedgerEntry]) -> Result<(), IntegrityViolation> {
    let genesis = entries.first().ok_or(IntegrityViolation::EmptyChain)?;

    if genesis.index != 0 {
        return Err(IntegrityViolation::MalformedGenesis {
            reason: format!("index is {}", genesis.index),
        });
    }
    if genesis.previous_hash != GENESIS_PREVIOUS_HASH {
        return Err(IntegrityViolation::MalformedGenesis {
            reason: format!("previous hash is {:?}", genesis.previous_hash),
        });
    }
    if !genesis.payload.is_genesis() {
        return Err(IntegrityViolation::MalformedGenesis {
            reason: "payload is not a genesis marker".to_string(),
        });
    }
    check_hash(genesis)?;

    for (position, pair) in entries.windows(2).enumerate() {
        let (prev, entry) = (&pair[0], &pair[1]);
        let position = position as u64 + 1;

        if entry.index != position {
            return Err(IntegrityViolation::IndexGap {
                position,
                found: entry.index,
            });
        }
        if entry.payload.is_genesis() {
            return Err(IntegrityViolation::UnexpectedGenesisPayload { index: entry.index });
        }
        if entry.previous_hash != prev.hash {
            return Err(IntegrityViolation::BrokenLink {
                index: entry.index,
                expected: prev.hash.clone(),
                found: entry.previous_hash.clone(),
            });
        }
        if entry.timestamp < prev.timestamp {
            return Err(IntegrityViolation::TimestampRegression { index: entry.index });
        }
        check_hash(entry)?;
    }

    Ok(())
}

fn check_hash(entry: &LedgerEntry) -> Result<(), IntegrityViolation> {
    let recomputed = entry
        .recompute_hash()
        .map_err(|e| IntegrityViolation::Unhashable {
            index: entry.index,
            reason: e.to_string(),
        })?;
    if recomputed != entry.hash {
        return Err(IntegrityViolation::HashMismatch {
            index: entry.index,
            stored: entry.hash.clone(),
            recomputed,
        });
    }
    Ok(())
}

//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types shared by the `sgate-*` crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Policy violations are never errors. A rejected proposal is an ordinary
//! outcome the caller branches on; the types here cover programmer and
//! configuration mistakes only.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Proposer identifiers must contain at least one non-whitespace character.
    #[error("invalid proposer id: must be non-empty")]
    EmptyProposerId,

    /// Timestamp string is not valid UTC RFC 3339.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

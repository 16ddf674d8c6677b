//! # Proposer Identity
//!
//! The identifier of the agent that proposes an action. Proposer identity is
//! recorded, not authenticated: the ledger hashes entries but does not sign
//! them or verify who the proposer is.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of the agent proposing an action.
///
/// Guaranteed non-empty (at least one non-whitespace character). Surrounding
/// whitespace is preserved exactly as supplied, since it is part of what the
/// ledger hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProposerId(String);

impl ProposerId {
    /// Validate and wrap a proposer identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyProposerId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProposerId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProposerId> for String {
    fn from(id: ProposerId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProposerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProposerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

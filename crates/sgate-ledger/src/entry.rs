//! # Ledger Entries
//!
//! A [`LedgerEntry`] is one block in the chain. Its `hash` commits to the
//! payload and to the previous entry's hash; the timestamp and index are
//! metadata checked separately by [`verify_chain`](crate::verify_chain).

use serde::{Deserialize, Serialize};
use sgate_core::{chain_digest, CanonicalBytes, CanonicalizationError, ProposerId, Timestamp};
use sgate_policy::ActionDescriptor;

/// `previous_hash` of the genesis entry.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Default genesis payload marker.
pub const DEFAULT_GENESIS_MARKER: &str = "Safety Layer Genesis";

/// The audit record carried by an entry.
///
/// Serialized untagged, so genesis hashes as `{"info": ...}` and an
/// authorized action as `{"action": {...}, "agent": ...}`. Deserialization
/// rejects unknown keys: a dropped key would re-canonicalize to the original
/// bytes and hide an edit from verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "PayloadRepr")]
pub enum LedgerPayload {
    /// An authorized action and the agent that proposed it.
    Authorized {
        /// Who proposed the action.
        #[serde(rename = "agent")]
        proposer: ProposerId,
        /// What was authorized.
        action: ActionDescriptor,
    },
    /// The fixed system-initialization marker at index 0.
    Genesis {
        /// Marker text.
        info: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadRepr {
    Authorized(AuthorizedRepr),
    Genesis(GenesisRepr),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthorizedRepr {
    agent: ProposerId,
    action: ActionDescriptor,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GenesisRepr {
    info: String,
}

impl From<PayloadRepr> for LedgerPayload {
    fn from(repr: PayloadRepr) -> Self {
        match repr {
            PayloadRepr::Authorized(a) => Self::authorized(a.agent, a.action),
            PayloadRepr::Genesis(g) => Self::genesis(g.info),
        }
    }
}

impl LedgerPayload {
    /// Payload for an authorized action.
    pub fn authorized(proposer: ProposerId, action: ActionDescriptor) -> Self {
        Self::Authorized { proposer, action }
    }

    /// Payload for the genesis entry.
    pub fn genesis(info: impl Into<String>) -> Self {
        Self::Genesis { info: info.into() }
    }

    /// Whether this is a genesis payload.
    pub fn is_genesis(&self) -> bool {
        matches!(self, Self::Genesis { .. })
    }

    /// The proposer, for non-genesis payloads.
    pub fn proposer(&self) -> Option<&ProposerId> {
        match self {
            Self::Authorized { proposer, .. } => Some(proposer),
            Self::Genesis { .. } => None,
        }
    }

    /// The authorized action, for non-genesis payloads.
    pub fn action(&self) -> Option<&ActionDescriptor> {
        match self {
            Self::Authorized { action, .. } => Some(action),
            Self::Genesis { .. } => None,
        }
    }

    /// Hash this payload as the successor of `previous_hash`.
    ///
    /// Pure: the same payload and predecessor always give the same hex digest.
    pub fn chain_hash(&self, previous_hash: &str) -> Result<String, CanonicalizationError> {
        let canonical = CanonicalBytes::new(self)?;
        Ok(chain_digest(&canonical, previous_hash).to_hex())
    }
}

/// One immutable, hash-linked record in the ledger.
///
/// Fields are public so exported chains can be inspected and re-verified,
/// but the ledger only ever hands out clones; nothing outside it can change
/// the entries it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerEntry {
    /// Zero-based position in the chain.
    pub index: u64,
    /// When the entry was appended. Never earlier than its predecessor's.
    pub timestamp: Timestamp,
    /// The audit record.
    pub payload: LedgerPayload,
    /// Hash of the preceding entry, or `"0"` for genesis.
    pub previous_hash: String,
    /// `SHA-256(JCS(payload) || previous_hash)`, lowercase hex.
    pub hash: String,
}

impl LedgerEntry {
    /// Build an entry, computing its hash.
    pub fn seal(
        index: u64,
        timestamp: Timestamp,
        payload: LedgerPayload,
        previous_hash: impl Into<String>,
    ) -> Result<Self, CanonicalizationError> {
        let previous_hash = previous_hash.into();
        let hash = payload.chain_hash(&previous_hash)?;
        Ok(Self {
            index,
            timestamp,
            payload,
            previous_hash,
            hash,
        })
    }

    /// Build the genesis entry.
    pub fn genesis(
        marker: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<Self, CanonicalizationError> {
        Self::seal(0, timestamp, LedgerPayload::genesis(marker), GENESIS_PREVIOUS_HASH)
    }

    /// Whether this entry sits at index 0.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Recompute the hash from the stored payload and `previous_hash`.
    pub fn recompute_hash(&self) -> Result<String, CanonicalizationError> {
        self.payload.chain_hash(&self.previous_hash)
    }
}

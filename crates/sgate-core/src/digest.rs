//! # Content Digests and Chain Hashing
//!
//! Defines [`ContentDigest`] and the two digest paths used by the ledger:
//!
//! - [`sha256_digest()`]: the digest of a canonical value on its own.
//! - [`chain_digest()`]: the digest of a canonical payload followed by the
//!   hex hash of the preceding ledger entry. This is the ledger entry hash.
//!
//! ## Security Invariant
//!
//! Both functions accept only `&CanonicalBytes`, never raw `&[u8]`, so every
//! digest in the system was produced from canonicalized data.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::CanonicalBytes;

/// The hash algorithm used to compute a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

/// A digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    ///
    /// Prefer [`sha256_digest()`] or [`chain_digest()`].
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Compute the hash of a ledger entry: `SHA-256(canonical(payload) || previous_hash)`.
///
/// `previous_hash` is hashed as its UTF-8 text (the hex string of the prior
/// entry, or `"0"` for genesis), not as decoded bytes. The function is pure:
/// identical inputs always yield identical digests.
pub fn chain_digest(payload: &CanonicalBytes, previous_hash: &str) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(previous_hash.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

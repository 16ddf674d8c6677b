//! # sgate-core: Foundational Types for the Authorization Ledger
//!
//! This crate defines the primitives every other `sgate-*` crate builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every ledger hash flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests, so
//!    two processes hashing the same payload always agree byte-for-byte.
//!
//! 2. **`chain_digest()` binds a payload to its predecessor.** The digest of a
//!    ledger entry covers the canonical payload followed by the previous
//!    entry's hash, which is what makes the chain tamper-evident.
//!
//! 3. **UTC-only timestamps from an injected [`Clock`].** Production code uses
//!    [`SystemClock`]; tests pin time with [`FixedClock`].
//!
//! 4. **Validated identifiers.** A [`ProposerId`] cannot be empty.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sgate-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{chain_digest, sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::ProposerId;
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};

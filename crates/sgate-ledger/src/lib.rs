//! # sgate-ledger: Policy-Gated Authorization Ledger
//!
//! The single source of truth for which agent actions were authorized.
//!
//! ## Lifecycle
//!
//! Build an [`AuditLedger`] once (the genesis entry is created during
//! construction), call [`AuditLedger::request_authorization`] for every
//! proposed action, and call [`AuditLedger::verify_integrity`] whenever the
//! history needs to be checked. There is no other state: the ledger is ready
//! from construction until it is dropped.
//!
//! ## Integrity Model
//!
//! 1. Every entry's `hash` is `SHA-256(JCS(payload) || previous_hash)`.
//! 2. Every non-genesis entry's `previous_hash` is its predecessor's `hash`;
//!    genesis uses `"0"`.
//! 3. Entries are only appended, under a single lock, and only after the
//!    policy evaluator finds the action compliant. Denied proposals leave no
//!    trace in the chain.
//! 4. [`verify_chain`] recomputes every hash and link, so editing any payload
//!    after the fact is detected.
//!
//! ## Non-goals
//!
//! Single process, single writer. No consensus, no persistence, no signing:
//! hashes make tampering evident but do not authenticate proposers.

pub mod authorization;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod verify;

pub use authorization::{AuthorizationResult, DenialReason};
pub use entry::{LedgerEntry, LedgerPayload, DEFAULT_GENESIS_MARKER, GENESIS_PREVIOUS_HASH};
pub use error::LedgerError;
pub use ledger::{AuditLedger, LedgerBuilder};
pub use verify::{verify_chain, IntegrityViolation};

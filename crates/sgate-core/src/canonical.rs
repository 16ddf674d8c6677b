//! # Canonical Serialization: JCS-Compatible Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in ledger hash computation.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()`, which rejects floats and
//! then serializes with RFC 8785 (JSON Canonicalization Scheme) rules: sorted
//! keys, compact separators, deterministic number formatting.
//!
//! A payload hashed through any other path could differ in key order or
//! whitespace from the bytes a verifier recomputes, and every entry after it
//! would fail verification. Requiring `&CanonicalBytes` at the digest boundary
//! rules that out at compile time.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Numbers are integers; floats are rejected.
/// - Object keys are sorted, separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let bytes = serialize_canonical(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk a JSON tree and fail on the first non-integer number.
///
/// Float formatting is the one place where JCS output can drift between
/// implementations, so ledger payloads never carry them.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}

/// Serialize a JSON value in JCS-canonical form (RFC 8785).
fn serialize_canonical(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let s = serde_jcs::to_string(value)?;
    Ok(s.into_bytes())
}

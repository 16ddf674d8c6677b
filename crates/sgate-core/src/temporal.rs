//! # Temporal Types: UTC Timestamps and Injectable Clocks
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds, and the
//! [`Clock`] trait through which the ledger reads the current time.
//!
//! Ledger entry timestamps are audit metadata: they are not part of the
//! entry hash, and the ledger only guarantees they never go backwards. The
//! clock is injected so tests can pin or step time deterministically.

use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Serializes as `YYYY-MM-DDTHH:MM:SSZ`. Deserialization accepts only that
/// exact form, so a decoded value always round-trips byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// Rejects strings that are not RFC 3339 or that carry any offset other
    /// than `Z` (including `+00:00`).
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp {
                value: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| ValidationError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                value: secs.to_string(),
                reason: "out of range for a UTC datetime".to_string(),
            })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Return a timestamp `secs` seconds later, saturating at the input on overflow.
    pub fn plus_secs(&self, secs: i64) -> Self {
        self.0
            .checked_add_signed(chrono::Duration::seconds(secs))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let ts = Self::parse(&s)?;
        if ts.to_iso8601() != s {
            return Err(ValidationError::InvalidTimestamp {
                value: s,
                reason: "must be whole seconds in YYYY-MM-DDTHH:MM:SSZ form".to_string(),
            });
        }
        Ok(ts)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// A source of the current time.
///
/// Implementations must be cheap and must not block.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time via [`Timestamp::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven clock for tests and replays.
///
/// Cloning a `FixedClock` shares the underlying time, so a test can keep a
/// handle, pass a clone to the ledger, and step time between calls.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Arc<Mutex<Timestamp>>,
}

impl FixedClock {
    /// A clock frozen at `at`.
    pub fn new(at: Timestamp) -> Self {
        Self {
            current: Arc::new(Mutex::new(at)),
        }
    }

    /// Move the clock to `at`. Moving backwards is allowed.
    pub fn set(&self, at: Timestamp) {
        *self.current.lock() = at;
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut guard = self.current.lock();
        *guard = guard.plus_secs(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}

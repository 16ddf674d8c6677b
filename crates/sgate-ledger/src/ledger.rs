//! # Audit Ledger
//!
//! [`AuditLedger`] owns the chain and the evaluator. Evaluation runs without
//! the lock; reading the head and appending the new entry happen under one
//! lock acquisition, so concurrent grants always extend the current head.

use std::sync::Arc;

use parking_lot::Mutex;
use sgate_core::{Clock, ProposerId, SystemClock};
use sgate_policy::{ActionDescriptor, PolicyEvaluator};

use crate::authorization::{AuthorizationResult, DenialReason};
use crate::entry::{LedgerEntry, LedgerPayload, DEFAULT_GENESIS_MARKER};
use crate::error::LedgerError;
use crate::verify::{verify_chain, IntegrityViolation};

/// Number of hex characters of a hash shown in log events.
const HASH_PREFIX_LEN: usize = 12;

/// The genesis entry plus everything appended after it.
#[derive(Debug)]
struct Chain {
    genesis: LedgerEntry,
    appended: Vec<LedgerEntry>,
}

impl Chain {
    fn new(genesis: LedgerEntry) -> Self {
        Self {
            genesis,
            appended: Vec::new(),
        }
    }

    fn head(&self) -> &LedgerEntry {
        self.appended.last().unwrap_or(&self.genesis)
    }

    fn len(&self) -> usize {
        self.appended.len() + 1
    }

    fn get(&self, index: usize) -> Option<&LedgerEntry> {
        match index {
            0 => Some(&self.genesis),
            i => self.appended.get(i - 1),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        std::iter::once(&self.genesis).chain(self.appended.iter())
    }

    fn to_vec(&self) -> Vec<LedgerEntry> {
        self.iter().cloned().collect()
    }
}

/// Configures and builds an [`AuditLedger`].
#[derive(Debug)]
pub struct LedgerBuilder {
    evaluator: PolicyEvaluator,
    clock: Arc<dyn Clock>,
    genesis_marker: String,
}

impl Default for LedgerBuilder {
    fn default() -> Self {
        Self {
            evaluator: PolicyEvaluator::default(),
            clock: Arc::new(SystemClock),
            genesis_marker: DEFAULT_GENESIS_MARKER.to_string(),
        }
    }
}

impl LedgerBuilder {
    /// Builder with the default rules, the system clock, and the default
    /// genesis marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `evaluator` to judge proposals.
    pub fn evaluator(mut self, evaluator: PolicyEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Read entry timestamps from `clock`.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Text stored in the genesis payload.
    pub fn genesis_marker(mut self, marker: impl Into<String>) -> Self {
        self.genesis_marker = marker.into();
        self
    }

    /// Create the ledger and its genesis entry.
    pub fn build(self) -> Result<AuditLedger, LedgerError> {
        if self.genesis_marker.trim().is_empty() {
            return Err(LedgerError::EmptyGenesisMarker);
        }
        let genesis = LedgerEntry::genesis(self.genesis_marker.clone(), self.clock.now())?;
        tracing::debug!(hash = %genesis.hash, "ledger genesis created");
        Ok(AuditLedger {
            evaluator: self.evaluator,
            clock: self.clock,
            genesis_marker: self.genesis_marker,
            chain: Mutex::new(Chain::new(genesis)),
        })
    }
}

/// Append-only, hash-chained record of authorized actions.
///
/// Always holds at least the genesis entry. Entries are added only by
/// [`request_authorization`](Self::request_authorization) and never removed
/// or modified; readers get clones.
pub struct AuditLedger {
    evaluator: PolicyEvaluator,
    clock: Arc<dyn Clock>,
    genesis_marker: String,
    chain: Mutex<Chain>,
}

impl AuditLedger {
    /// Ledger with the default rules and system clock.
    pub fn new() -> Result<Self, LedgerError> {
        LedgerBuilder::default().build()
    }

    /// Ledger gated by `evaluator`, using the system clock.
    pub fn with_evaluator(evaluator: PolicyEvaluator) -> Result<Self, LedgerError> {
        LedgerBuilder::default().evaluator(evaluator).build()
    }

    /// Start configuring a ledger.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Evaluate a proposed action and, if compliant, record it.
    ///
    /// Never panics and never partially mutates the chain. Blank proposer
    /// identifiers are denied with [`DenialReason::InvalidProposer`] before
    /// evaluation. Denied proposals are not recorded.
    pub fn request_authorization(
        &self,
        proposer_id: &str,
        descriptor: &ActionDescriptor,
    ) -> AuthorizationResult {
        let proposer = match ProposerId::new(proposer_id) {
            Ok(p) => p,
            Err(_) => {
                tracing::warn!(
                    command = descriptor.command(),
                    reason = %DenialReason::InvalidProposer,
                    "authorization denied"
                );
                return AuthorizationResult::denied(DenialReason::InvalidProposer);
            }
        };

        let verdict = self.evaluator.evaluate(descriptor);
        if let Some(rule) = verdict.violated_rule() {
            let reason = DenialReason::from(rule);
            tracing::warn!(
                proposer = %proposer,
                command = descriptor.command(),
                reason = %reason,
                "authorization denied"
            );
            return AuthorizationResult::denied(reason);
        }

        let payload = LedgerPayload::authorized(proposer.clone(), descriptor.clone());

        let mut chain = self.chain.lock();
        let head = chain.head();
        let index = chain.len() as u64;
        let timestamp = self.clock.now().max(head.timestamp);
        let entry = match LedgerEntry::seal(index, timestamp, payload, head.hash.clone()) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(proposer = %proposer, error = %e, "could not hash ledger entry");
                return AuthorizationResult::denied(DenialReason::LedgerFault);
            }
        };
        let hash = entry.hash.clone();
        chain.appended.push(entry);
        drop(chain);

        tracing::info!(
            proposer = %proposer,
            index,
            hash = &hash[..HASH_PREFIX_LEN.min(hash.len())],
            "authorization granted"
        );
        AuthorizationResult::granted(index, hash)
    }

    /// Recompute every hash and link from genesis.
    pub fn verify_integrity(&self) -> bool {
        self.integrity_report().is_ok()
    }

    /// Like [`verify_integrity`](Self::verify_integrity), but names the first
    /// violation.
    pub fn integrity_report(&self) -> Result<(), IntegrityViolation> {
        let snapshot = self.entries();
        let result = verify_chain(&snapshot);
        if let Err(violation) = &result {
            tracing::warn!(%violation, "ledger integrity check failed");
        }
        result
    }

    /// Number of entries, genesis included.
    pub fn height(&self) -> u64 {
        self.chain.lock().len() as u64
    }

    /// The most recent entry.
    pub fn head(&self) -> LedgerEntry {
        self.chain.lock().head().clone()
    }

    /// The entry at `index`.
    pub fn entry(&self, index: u64) -> Option<LedgerEntry> {
        let index = usize::try_from(index).ok()?;
        self.chain.lock().get(index).cloned()
    }

    /// Snapshot of the whole chain.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.chain.lock().to_vec()
    }

    /// Snapshot of the entries granted to `proposer_id`.
    pub fn entries_for_proposer(&self, proposer_id: &str) -> Vec<LedgerEntry> {
        self.chain
            .lock()
            .iter()
            .filter(|e| e.payload.proposer().map(ProposerId::as_str) == Some(proposer_id))
            .cloned()
            .collect()
    }

    /// The rules in force.
    pub fn evaluator(&self) -> &PolicyEvaluator {
        &self.evaluator
    }

    /// Text of the genesis payload.
    pub fn genesis_marker(&self) -> &str {
        &self.genesis_marker
    }
}

impl std::fmt::Debug for AuditLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chain = self.chain.lock();
        f.debug_struct("AuditLedger")
            .field("height", &chain.len())
            .field("head", &chain.head().hash)
            .field("genesis_marker", &self.genesis_marker)
            .field("clock", &self.clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgate_core::{FixedClock, Timestamp};
    use sgate_policy::PolicyRules;

    const AGENT: &str = "TinyAI_Core_v1";

    fn t0() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn fixed_ledger() -> (AuditLedger, FixedClock) {
        let clock = FixedClock::new(t0());
        let ledger = AuditLedger::builder()
            .clock(Arc::new(clock.clone()))
            .build()
            .unwrap();
        (ledger, clock)
    }

    fn act(cmd: &str) -> ActionDescriptor {
        ActionDescriptor::new(cmd, "test")
    }

    #[test]
    fn fresh_ledger_has_only_genesis() {
        let ledger = AuditLedger::new().unwrap();
        assert_eq!(ledger.height(), 1);
        let g = ledger.head();
        assert_eq!(g.index, 0);
        assert_eq!(g.previous_hash, "0");
        assert_eq!(
            g.payload,
            LedgerPayload::genesis(DEFAULT_GENESIS_MARKER)
        );
        assert!(ledger.verify_integrity());
    }

    #[test]
    fn custom_genesis_marker() {
        let ledger = AuditLedger::builder()
            .genesis_marker("Lab Bench Genesis")
            .build()
            .unwrap();
        assert_eq!(ledger.genesis_marker(), "Lab Bench Genesis");
        assert_eq!(ledger.head().payload, LedgerPayload::genesis("Lab Bench Genesis"));
    }

    #[test]
    fn blank_genesis_marker_rejected() {
        let err = AuditLedger::builder().genesis_marker("  ").build().unwrap_err();
        assert!(matches!(err, LedgerError::EmptyGenesisMarker));
    }

    #[test]
    fn reference_scenario() {
        let (ledger, _) = fixed_ledger();

        let r1 = ledger.request_authorization(AGENT, &act("DELETE TEMP FILES"));
        assert!(r1.is_granted());
        assert_eq!(r1.entry_index(), Some(1));

        let r2 = ledger.request_authorization(AGENT, &act("SET CPU VOLTAGE 1.5"));
        assert!(!r2.is_granted());
        assert_eq!(r2.reason(), Some(DenialReason::VoltageLimitExceeded));

        let r3 = ledger.request_authorization(AGENT, &act("DISABLE FIREWALL FOR SPEED"));
        assert!(!r3.is_granted());
        assert_eq!(r3.reason(), Some(DenialReason::FirewallDisable));

        assert_eq!(ledger.height(), 2);
        assert!(ledger.verify_integrity());
    }

    #[test]
    fn grant_links_to_previous_head() {
        let (ledger, _) = fixed_ledger();
        let genesis = ledger.head();
        let r = ledger.request_authorization(AGENT, &act("ls"));
        let entry = ledger.entry(1).unwrap();
        assert_eq!(entry.previous_hash, genesis.hash);
        assert_eq!(r.entry_hash(), Some(entry.hash.as_str()));
        assert_eq!(entry.payload.proposer().unwrap().as_str(), AGENT);
        assert_eq!(entry.payload.action(), Some(&act("ls")));
    }

    #[test]
    fn denial_leaves_chain_untouched() {
        let (ledger, _) = fixed_ledger();
        ledger.request_authorization(AGENT, &act("ls"));
        let before = ledger.entries();
        ledger.request_authorization(AGENT, &act("modify bootloader config"));
        ledger.request_authorization(AGENT, &act("SET VOLTAGE high"));
        assert_eq!(ledger.entries(), before);
    }

    #[test]
    fn blank_proposer_denied_without_evaluation() {
        let (ledger, _) = fixed_ledger();
        for id in ["", "   ", "\t\n"] {
            let r = ledger.request_authorization(id, &act("ls"));
            assert_eq!(r.reason(), Some(DenialReason::InvalidProposer));
            assert_eq!(r.entry_index(), None);
        }
        assert_eq!(ledger.height(), 1);
    }

    #[test]
    fn custom_rules_gate_appends() {
        let evaluator =
            PolicyEvaluator::new(PolicyRules::default().with_max_voltage(2.0)).unwrap();
        let ledger = AuditLedger::with_evaluator(evaluator).unwrap();
        assert!(ledger.request_authorization(AGENT, &act("SET VOLTAGE 1.5")).is_granted());
        assert!(!ledger.request_authorization(AGENT, &act("SET VOLTAGE 2.5")).is_granted());
        assert_eq!(ledger.evaluator().rules().max_voltage, 2.0);
    }

    #[test]
    fn timestamps_follow_clock() {
        let (ledger, clock) = fixed_ledger();
        clock.advance_secs(30);
        ledger.request_authorization(AGENT, &act("ls"));
        assert_eq!(ledger.entry(1).unwrap().timestamp, t0().plus_secs(30));
    }

    #[test]
    fn clock_regression_is_clamped() {
        let (ledger, clock) = fixed_ledger();
        clock.advance_secs(100);
        ledger.request_authorization(AGENT, &act("ls"));
        clock.set(t0().plus_secs(-3600));
        ledger.request_authorization(AGENT, &act("pwd"));
        let entries = ledger.entries();
        assert_eq!(entries[2].timestamp, entries[1].timestamp);
        assert!(ledger.verify_integrity());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let (ledger, _) = fixed_ledger();
        ledger.request_authorization(AGENT, &act("ls"));
        ledger.request_authorization(AGENT, &act("pwd"));
        assert!(ledger.verify_integrity());

        ledger.chain.lock().appended[0].payload =
            LedgerPayload::authorized(ProposerId::new(AGENT).unwrap(), act("DISABLE FIREWALL"));

        assert!(!ledger.verify_integrity());
        assert!(matches!(
            ledger.integrity_report(),
            Err(IntegrityViolation::HashMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn tampered_genesis_fails_verification() {
        let (ledger, _) = fixed_ledger();
        ledger.request_authorization(AGENT, &act("ls"));
        ledger.chain.lock().genesis.payload = LedgerPayload::genesis("forged");
        assert!(!ledger.verify_integrity());
    }

    #[test]
    fn snapshots_are_detached() {
        let (ledger, _) = fixed_ledger();
        ledger.request_authorization(AGENT, &act("ls"));
        let mut copy = ledger.entries();
        copy[1].hash = "f".repeat(64);
        assert!(ledger.verify_integrity());
        assert!(verify_chain(&copy).is_err());
    }

    #[test]
    fn entries_for_proposer_filters() {
        let (ledger, _) = fixed_ledger();
        ledger.request_authorization("alpha", &act("ls"));
        ledger.request_authorization("beta", &act("pwd"));
        ledger.request_authorization("alpha", &act("whoami"));
        let alpha = ledger.entries_for_proposer("alpha");
        assert_eq!(alpha.len(), 2);
        assert_eq!(alpha[1].index, 3);
        assert!(ledger.entries_for_proposer("gamma").is_empty());
    }

    #[test]
    fn entry_out_of_range_is_none() {
        let (ledger, _) = fixed_ledger();
        assert!(ledger.entry(1).is_none());
        assert!(ledger.entry(u64::MAX).is_none());
    }

    #[test]
    fn debug_shows_height() {
        let (ledger, _) = fixed_ledger();
        let dbg = format!("{ledger:?}");
        assert!(dbg.contains("AuditLedger"));
        assert!(dbg.contains("height: 1"));
    }

    #[test]
    fn ledger_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuditLedger>();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn command() -> impl Strategy<Value = String> {
            prop_oneof![
                "[a-z ]{0,20}",
                Just("DISABLE FIREWALL".to_string()),
                Just("delete bootloader".to_string()),
                (0.0f64..3.0).prop_map(|v| format!("SET VOLTAGE {v}")),
                Just("VOLTAGE abc".to_string()),
            ]
        }

        proptest! {
            #[test]
            fn chain_stays_valid(cmds in proptest::collection::vec(command(), 0..24)) {
                let (ledger, clock) = fixed_ledger();
                let mut granted = 0u64;
                for cmd in &cmds {
                    let r = ledger.request_authorization(AGENT, &ActionDescriptor::new(cmd.clone(), ""));
                    if r.is_granted() {
                        granted += 1;
                        prop_assert_eq!(r.entry_index(), Some(granted));
                    } else {
                        prop_assert!(r.reason().is_some());
                    }
                    clock.advance_secs(1);
                }
                prop_assert_eq!(ledger.height(), granted + 1);
                prop_assert!(ledger.verify_integrity());
            }

            #[test]
            fn grants_match_evaluator(cmd in command()) {
                let (ledger, _) = fixed_ledger();
                let action = ActionDescriptor::new(cmd, "");
                let verdict = ledger.evaluator().evaluate(&action);
                let r = ledger.request_authorization(AGENT, &action);
                prop_assert_eq!(r.is_granted(), verdict.is_compliant());
                prop_assert_eq!(r.reason().and_then(|d| d.policy_rule()), verdict.violated_rule());
            }
        }
    }
}

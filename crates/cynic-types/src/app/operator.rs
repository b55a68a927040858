// Path: crates/cynic-types/src/app/operator.rs
//! Per-operator mutable state. Owned exclusively by the node controller
//! and mutated only at slot boundaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The mutable record the node controller keeps for one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorState {
    /// Hex-encoded Ed25519 public key.
    pub pubkey: String,
    /// Evaluation score in `[0, 100]`, a composite reputation signal.
    pub e_score: f64,
    /// Cumulative burned stake.
    pub burn_total: u64,
    /// Fraction of expected slots in which this operator was observed live,
    /// in `[0, 1]`.
    pub uptime_ratio: f64,
    /// The last slot at which this operator cast a vote.
    pub last_vote_slot: u64,
    /// Active exponential lockouts, keyed by the block hash they were
    /// incurred for, valued by the slot at which the lockout expires.
    pub active_lockouts: BTreeMap<[u8; 32], u64>,
}

impl OperatorState {
    /// Creates a fresh operator record with zeroed reputation state.
    #[must_use]
    pub fn new(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            e_score: 0.0,
            burn_total: 0,
            uptime_ratio: 0.0,
            last_vote_slot: 0,
            active_lockouts: BTreeMap::new(),
        }
    }

    /// Computes this operator's φ-BFT vote weight:
    /// `e_score · log_φ(1 + burn_total) · uptime_ratio`.
    ///
    /// Rounded to fixed-point (×10⁴) immediately, since the canonical value
    /// is persisted and must be bit-identical across nodes.
    #[must_use]
    pub fn vote_weight(&self) -> f64 {
        let log_phi_term = if self.burn_total == 0 {
            0.0
        } else {
            (1.0 + self.burn_total as f64).ln() / cynic_constants::PHI.ln()
        };
        let raw = self.e_score * log_phi_term * self.uptime_ratio;
        (raw * 10_000.0).round() / 10_000.0
    }

    /// Whether this operator is currently locked out from voting against
    /// `block_hash` at `slot`.
    #[must_use]
    pub fn is_locked_for(&self, block_hash: &[u8; 32], slot: u64) -> bool {
        self.active_lockouts
            .get(block_hash)
            .is_some_and(|&until| slot < until)
    }

    /// Records a new lockout on `block_hash` expiring at `slot + φ^k`,
    /// rounded up to the nearest whole slot.
    pub fn lock_until(&mut self, block_hash: [u8; 32], slot: u64, confirmation_depth: u32) {
        let duration = cynic_constants::PHI.powi(confirmation_depth as i32).ceil() as u64;
        self.active_lockouts.insert(block_hash, slot + duration);
    }

    /// Zeroes this operator's effective weight for the current epoch, e.g.
    /// after a detected equivocation.
    pub fn zero_weight_for_epoch(&mut self) {
        self.e_score = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_weight_is_zero_without_burn() {
        let mut o = OperatorState::new("aa");
        o.e_score = 50.0;
        o.uptime_ratio = 1.0;
        assert_eq!(o.vote_weight(), 0.0);
    }

    #[test]
    fn vote_weight_scales_with_burn_via_log_phi() {
        let mut o = OperatorState::new("aa");
        o.e_score = 10.0;
        o.uptime_ratio = 1.0;
        o.burn_total = 100;
        assert!(o.vote_weight() > 0.0);
    }

    #[test]
    fn lockout_blocks_until_expiry() {
        let mut o = OperatorState::new("aa");
        let hash = [1u8; 32];
        o.lock_until(hash, 10, 3);
        assert!(o.is_locked_for(&hash, 11));
        let expiry = *o.active_lockouts.get(&hash).expect("lockout present");
        assert!(!o.is_locked_for(&hash, expiry));
    }

    #[test]
    fn equivocation_zeroes_e_score() {
        let mut o = OperatorState::new("aa");
        o.e_score = 80.0;
        o.zero_weight_for_epoch();
        assert_eq!(o.vote_weight(), 0.0);
    }
}

// Path: crates/cynic-consensus/src/finality.rs
//! Finality tracking: a block is final once it sits at least
//! `FINALITY_CONFIRMATION_DEPTH` slots behind the current head and every
//! block in that confirming window held at least a phi-inverse share of
//! network weight at precommit.

use std::collections::BTreeMap;

use cynic_constants::{CONSENSUS_THRESHOLD, FINALITY_CONFIRMATION_DEPTH};

/// Records each slot's achieved precommit weight fraction as rounds commit.
#[derive(Debug, Clone, Default)]
pub struct FinalityTracker {
    weight_fractions: BTreeMap<u64, f64>,
}

impl FinalityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `slot` committed with `weight_fraction` of total network
    /// weight behind its precommit.
    pub fn record_commit(&mut self, slot: u64, weight_fraction: f64) {
        self.weight_fractions.insert(slot, weight_fraction);
    }

    /// Whether `slot` is final given a current chain head of `head_slot`:
    /// it must be confirmed, at least [`FINALITY_CONFIRMATION_DEPTH`] slots
    /// old, and every slot in `[slot, head_slot]` recorded at or above the
    /// consensus weight threshold.
    #[must_use]
    pub fn is_final(&self, slot: u64, head_slot: u64) -> bool {
        if head_slot < slot || head_slot - slot < FINALITY_CONFIRMATION_DEPTH {
            return false;
        }
        (slot..=head_slot).all(|s| {
            self.weight_fractions
                .get(&s)
                .is_some_and(|&w| w >= CONSENSUS_THRESHOLD)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_block_is_not_final() {
        let mut t = FinalityTracker::new();
        t.record_commit(100, 0.7);
        assert!(!t.is_final(100, 101));
    }

    #[test]
    fn deep_block_with_sustained_weight_is_final() {
        let mut t = FinalityTracker::new();
        let head = 100 + FINALITY_CONFIRMATION_DEPTH;
        for s in 100..=head {
            t.record_commit(s, 0.7);
        }
        assert!(t.is_final(100, head));
    }

    #[test]
    fn a_single_weak_slot_in_the_window_blocks_finality() {
        let mut t = FinalityTracker::new();
        let head = 100 + FINALITY_CONFIRMATION_DEPTH;
        for s in 100..=head {
            t.record_commit(s, 0.7);
        }
        t.record_commit(105, 0.2);
        assert!(!t.is_final(100, head));
    }
}

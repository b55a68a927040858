// Path: crates/cynic-consensus/src/equivocation.rs
//! Detects a voter signing two conflicting votes for the same (slot, phase)
//! — the double-vote equivocation that zeroes an operator's epoch weight.

use std::collections::BTreeMap;

use cynic_types::error::ConsensusFaultError;

/// Tracks the single block hash each voter has committed to per `(slot,
/// phase_tag)` key, flagging a second, different hash as equivocation.
#[derive(Debug, Clone, Default)]
pub struct EquivocationTracker {
    seen: BTreeMap<(u64, &'static str, String), [u8; 32]>,
}

impl EquivocationTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `voter`'s vote for `block_hash` at `slot` during `phase_tag`
    /// (e.g. `"prevote"` or `"precommit"`). Returns an error if this voter
    /// already voted for a different hash in the same slot and phase.
    pub fn record(
        &mut self,
        slot: u64,
        phase_tag: &'static str,
        voter: &str,
        block_hash: [u8; 32],
    ) -> Result<(), ConsensusFaultError> {
        let key = (slot, phase_tag, voter.to_string());
        match self.seen.get(&key) {
            Some(existing) if *existing != block_hash => Err(ConsensusFaultError::Equivocation {
                voter: voter.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.seen.insert(key, block_hash);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_repeat_vote_is_fine() {
        let mut t = EquivocationTracker::new();
        t.record(10, "prevote", "v0", [1u8; 32]).expect("first vote");
        t.record(10, "prevote", "v0", [1u8; 32]).expect("repeat of same vote");
    }

    #[test]
    fn conflicting_vote_same_slot_phase_is_equivocation() {
        let mut t = EquivocationTracker::new();
        t.record(10, "prevote", "v0", [1u8; 32]).expect("first vote");
        let err = t.record(10, "prevote", "v0", [2u8; 32]).unwrap_err();
        assert!(matches!(err, ConsensusFaultError::Equivocation { voter } if voter == "v0"));
    }

    #[test]
    fn different_phase_is_independent() {
        let mut t = EquivocationTracker::new();
        t.record(10, "prevote", "v0", [1u8; 32]).expect("prevote");
        t.record(10, "precommit", "v0", [2u8; 32]).expect("precommit, different phase");
    }

    #[test]
    fn equivocator_contributes_zero_weight_to_a_tally_this_epoch() {
        use crate::governance::GovernanceRound;
        use cynic_types::app::{Choice, GovernanceAction, GovernanceProposal, OperatorState, ProposalStatus};

        let mut tracker = EquivocationTracker::new();
        let mut offender = OperatorState::new("op-equivocator");
        offender.e_score = 80.0;
        offender.burn_total = 500;
        offender.uptime_ratio = 1.0;
        let offender_weight_before = offender.vote_weight();
        assert!(offender_weight_before > 0.0);

        tracker.record(10, "prevote", &offender.pubkey, [1u8; 32]).expect("first prevote");
        let err = tracker
            .record(10, "prevote", &offender.pubkey, [2u8; 32])
            .unwrap_err();
        assert!(matches!(err, ConsensusFaultError::Equivocation { .. }));
        offender.zero_weight_for_epoch();
        assert_eq!(offender.vote_weight(), 0.0);

        let proposal = GovernanceProposal {
            id: "prop-after-equivocation".into(),
            action: GovernanceAction::ChangeTimingBase { new_timing_base_ms: 200 },
            proposer_pubkey: "proposer".into(),
        };
        let mut round = GovernanceRound::new(proposal);
        let total_network_weight = 1000.0;
        round.record_vote(offender.pubkey.clone(), Choice::Agree, offender.vote_weight(), total_network_weight);
        round.record_vote("op1", Choice::Agree, 300.0, total_network_weight);
        round.record_vote("op2", Choice::Agree, 300.0, total_network_weight);
        round.record_vote("op3", Choice::Agree, 300.0, total_network_weight);
        round.record_vote("op4", Choice::Abstain, 50.0, total_network_weight);
        // Quorum (5 distinct voters) is met, but the zeroed offender adds
        // nothing: 900/1000 still clears threshold on the honest votes
        // alone, so this only proves the offender's ballot didn't help push
        // it there — the case below shows one where it would have mattered.
        assert_eq!(round.status, ProposalStatus::Passed);

        let proposal2 = GovernanceProposal {
            id: "prop-would-need-offender".into(),
            action: GovernanceAction::ChangeTimingBase { new_timing_base_ms: 200 },
            proposer_pubkey: "proposer".into(),
        };
        let mut tight_round = GovernanceRound::new(proposal2);
        tight_round.record_vote(offender.pubkey, Choice::Agree, offender.vote_weight(), total_network_weight);
        tight_round.record_vote("op1", Choice::Agree, 618.0, total_network_weight);
        tight_round.record_vote("op2", Choice::Disagree, 100.0, total_network_weight);
        tight_round.record_vote("op3", Choice::Disagree, 100.0, total_network_weight);
        tight_round.record_vote("op4", Choice::Disagree, 82.0, total_network_weight);
        // 618/1000 alone sits right at the threshold boundary; the
        // offender's zeroed weight contributes nothing toward crossing it,
        // so the proposal can't reach Passed on the honest votes alone.
        assert_ne!(tight_round.status, ProposalStatus::Passed);
    }
}

// Path: crates/cynic-consensus/src/governance.rs
//! Tallies ballots on a [`GovernanceProposal`] to a terminal
//! [`ProposalStatus`].
//!
//! This is hard consensus's governance-specific instance: unlike
//! [`crate::hard::ConsensusRound`], which just tracks quorum on a block
//! hash, a [`GovernanceRound`] carries the proposal through PROPOSE,
//! PREVOTE, and PRECOMMIT to PASSED, FAILED, or DEFERRED so the node
//! controller knows whether to apply its action at the next epoch
//! boundary.

use std::collections::BTreeMap;

use cynic_constants::{CONSENSUS_QUORUM, CONSENSUS_THRESHOLD};
use cynic_types::app::{Choice, GovernanceProposal, ProposalStatus};

/// Tracks one proposal's ballots through PRECOMMIT.
#[derive(Debug, Clone)]
pub struct GovernanceRound {
    pub proposal: GovernanceProposal,
    ballots: BTreeMap<String, (Choice, f64)>,
    pub status: ProposalStatus,
}

impl GovernanceRound {
    /// Opens a round for `proposal`, awaiting PREVOTE ballots.
    #[must_use]
    pub fn new(proposal: GovernanceProposal) -> Self {
        Self {
            proposal,
            ballots: BTreeMap::new(),
            status: ProposalStatus::Deferred,
        }
    }

    /// Records `voter`'s ballot weighted at `weight`, re-evaluating status
    /// against `total_network_weight`. Ignored once the round has already
    /// reached a terminal status, or if `voter` already cast a ballot.
    pub fn record_vote(
        &mut self,
        voter: impl Into<String>,
        choice: Choice,
        weight: f64,
        total_network_weight: f64,
    ) {
        if self.status != ProposalStatus::Deferred {
            return;
        }
        self.ballots.entry(voter.into()).or_insert((choice, weight));
        self.status = self.evaluate(total_network_weight);
    }

    fn agree_weight(&self) -> f64 {
        self.ballots
            .values()
            .filter(|(choice, _)| *choice == Choice::Agree)
            .map(|(_, weight)| weight)
            .sum()
    }

    fn disagree_weight(&self) -> f64 {
        self.ballots
            .values()
            .filter(|(choice, _)| *choice == Choice::Disagree)
            .map(|(_, weight)| weight)
            .sum()
    }

    fn evaluate(&self, total_network_weight: f64) -> ProposalStatus {
        if self.ballots.len() < CONSENSUS_QUORUM || total_network_weight <= 0.0 {
            return ProposalStatus::Deferred;
        }
        if self.agree_weight() / total_network_weight >= CONSENSUS_THRESHOLD {
            return ProposalStatus::Passed;
        }
        // Abstains and weight that hasn't voted at all could still land on
        // either side; only once even the most generous remaining
        // allocation (all of it to Agree) can't cross threshold is the
        // proposal genuinely dead rather than merely pending more ballots.
        let undecided_weight = total_network_weight - self.agree_weight() - self.disagree_weight();
        let best_case_agree = self.agree_weight() + undecided_weight;
        if best_case_agree / total_network_weight < CONSENSUS_THRESHOLD {
            return ProposalStatus::Failed;
        }
        ProposalStatus::Deferred
    }

    /// Distinct voters who have cast a ballot so far.
    #[must_use]
    pub fn voters(&self) -> Vec<&str> {
        self.ballots.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cynic_types::app::GovernanceAction;

    fn add_dimension_proposal() -> GovernanceProposal {
        GovernanceProposal {
            id: "prop-1".into(),
            action: GovernanceAction::AddDimension {
                dimension_bytes: vec![0xAB; 8],
            },
            proposer_pubkey: "aa".into(),
        }
    }

    #[test]
    fn five_operators_weighted_300_300_200_150_100_pass_on_three_agrees() {
        let mut round = GovernanceRound::new(add_dimension_proposal());
        let total = 1050.0;
        round.record_vote("op0", Choice::Agree, 300.0, total);
        round.record_vote("op1", Choice::Agree, 300.0, total);
        round.record_vote("op2", Choice::Agree, 200.0, total);
        round.record_vote("op3", Choice::Disagree, 150.0, total);
        round.record_vote("op4", Choice::Abstain, 100.0, total);
        assert_eq!(round.status, ProposalStatus::Passed);
        assert!((round.agree_weight() / total - 0.762).abs() < 0.01);
    }

    #[test]
    fn below_quorum_stays_deferred_even_with_unanimous_agreement() {
        let mut round = GovernanceRound::new(add_dimension_proposal());
        let total = 1050.0;
        round.record_vote("op0", Choice::Agree, 300.0, total);
        round.record_vote("op1", Choice::Agree, 300.0, total);
        assert_eq!(round.status, ProposalStatus::Deferred);
    }

    #[test]
    fn proposal_fails_once_agreement_is_mathematically_impossible() {
        let mut round = GovernanceRound::new(add_dimension_proposal());
        let total = 1050.0;
        round.record_vote("op0", Choice::Disagree, 300.0, total);
        round.record_vote("op1", Choice::Disagree, 300.0, total);
        round.record_vote("op2", Choice::Disagree, 200.0, total);
        round.record_vote("op3", Choice::Disagree, 150.0, total);
        round.record_vote("op4", Choice::Agree, 100.0, total);
        assert_eq!(round.status, ProposalStatus::Failed);
    }

    #[test]
    fn resolved_round_ignores_further_votes() {
        let mut round = GovernanceRound::new(add_dimension_proposal());
        let total = 1050.0;
        round.record_vote("op0", Choice::Agree, 300.0, total);
        round.record_vote("op1", Choice::Agree, 300.0, total);
        round.record_vote("op2", Choice::Agree, 200.0, total);
        round.record_vote("op3", Choice::Disagree, 150.0, total);
        round.record_vote("op4", Choice::Abstain, 100.0, total);
        assert_eq!(round.status, ProposalStatus::Passed);
        round.record_vote("op5", Choice::Disagree, 1.0, total);
        assert_eq!(round.voters().len(), 5);
    }

    #[test]
    fn abstain_counts_toward_quorum_but_not_agree_ratio() {
        let mut round = GovernanceRound::new(add_dimension_proposal());
        let total = 1050.0;
        round.record_vote("op0", Choice::Agree, 300.0, total);
        round.record_vote("op1", Choice::Agree, 300.0, total);
        round.record_vote("op2", Choice::Abstain, 200.0, total);
        // Agree weight alone (600/1050 ~= 0.571) is below threshold, and
        // remaining weight (150 + 100 = 250) could still push it over, so
        // the proposal stays deferred rather than failing outright.
        assert_eq!(round.status, ProposalStatus::Deferred);
    }
}

// Path: crates/cynic-gossip/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! Push-pull gossip dissemination for blocks, knowledge deltas, and votes.
//!
//! Peers are fanned out to in score-weighted batches of [`cynic_constants::GOSSIP_FANOUT`],
//! deduplicated per round with a bloom filter, and re-scored on every
//! observed interaction. The actual wire transport (`libp2p`) lives behind
//! [`behaviour::GossipBehaviour`]; everything else in this crate is pure and
//! testable without a running swarm.

pub mod behaviour;
pub mod catchup;
pub mod dedup;
pub mod fanout;
pub mod inbound;
pub mod message;
pub mod peer;

pub use behaviour::{GossipBehaviour, GossipBehaviourEvent};
pub use catchup::needs_catchup;
pub use dedup::RoundDedup;
pub use fanout::select_fanout;
pub use inbound::InboundQueue;
pub use message::GossipMessage;
pub use peer::{Peer, PeerSet, PeerStatus};

#[cfg(test)]
mod convergence_tests {
    use std::collections::BTreeSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::{select_fanout, PeerSet, RoundDedup};

    /// A 13-node ring where each node's gossip view is its four nearest
    /// neighbors (two on each side). With a per-round fanout equal to that
    /// neighbor count, `select_fanout` always returns the full neighbor set
    /// (its short-circuit for `candidates.len() <= fanout`), so propagation
    /// is a deterministic 2-hop-per-round flood: an announce seeded at node
    /// 0 reaches every node within `ceil((N - 1) / (2 * 2))` rounds.
    fn ring_neighbors(node_count: usize, radius: i64, i: usize) -> PeerSet {
        let mut peers = PeerSet::new();
        for offset in 1..=radius {
            let left = (i as i64 - offset).rem_euclid(node_count as i64) as usize;
            let right = (i as i64 + offset).rem_euclid(node_count as i64) as usize;
            peers.add(format!("node{left}"));
            peers.add(format!("node{right}"));
        }
        peers
    }

    #[test]
    fn thirteen_node_ring_converges_within_three_rounds() {
        const NODE_COUNT: usize = 13;
        const RADIUS: i64 = 2;
        let fanout = (RADIUS as usize) * 2;

        let peer_sets: Vec<PeerSet> = (0..NODE_COUNT).map(|i| ring_neighbors(NODE_COUNT, RADIUS, i)).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let mut informed: BTreeSet<usize> = BTreeSet::new();
        informed.insert(0);
        let mut converged_at_round = None;

        for round in 1..=3 {
            let mut round_dedup: Vec<RoundDedup> = (0..NODE_COUNT).map(|_| RoundDedup::new()).collect();
            let senders: Vec<usize> = informed.iter().copied().collect();
            let mut newly_informed = Vec::new();
            for sender in senders {
                // Each informed node forwards this announce at most once per
                // round, regardless of how many neighbors re-announced it to
                // it earlier in the same round.
                if round_dedup[sender].check_and_set("announce:block-at-slot-7") {
                    continue;
                }
                for target in select_fanout(&peer_sets[sender], fanout, &mut rng) {
                    let idx: usize = target
                        .strip_prefix("node")
                        .and_then(|s| s.parse().ok())
                        .expect("peer ids are always node<N>");
                    if !informed.contains(&idx) {
                        newly_informed.push(idx);
                    }
                }
            }
            for idx in newly_informed {
                informed.insert(idx);
            }
            if informed.len() == NODE_COUNT && converged_at_round.is_none() {
                converged_at_round = Some(round);
            }
        }

        assert_eq!(informed.len(), NODE_COUNT, "all 13 nodes should hold the announce by round 3");
        let round = converged_at_round.expect("ring converges at or before round 3");
        assert!(round <= 3, "expected convergence within 3 rounds, got {round}");
    }

    #[test]
    fn a_node_does_not_reforward_the_same_announce_twice_in_one_round() {
        let mut dedup = RoundDedup::new();
        assert!(!dedup.check_and_set("announce:block-at-slot-7"));
        assert!(dedup.check_and_set("announce:block-at-slot-7"));
    }
}

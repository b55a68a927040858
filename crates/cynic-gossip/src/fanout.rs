// Path: crates/cynic-gossip/src/fanout.rs
use rand::Rng;

use crate::peer::PeerSet;

/// Selects up to `fanout` peers to push a message to this round, weighted
/// toward higher-scoring peers. Ties and negative scores are handled by
/// shifting every weight so the lowest-scoring candidate still has a
/// positive (if small) chance of selection — a misbehaving peer is
/// deprioritized, not permanently silenced, until it is actually evicted.
#[must_use]
pub fn select_fanout(peers: &PeerSet, fanout: usize, rng: &mut impl Rng) -> Vec<String> {
    let mut candidates: Vec<(&str, i64)> = peers
        .peers()
        .into_iter()
        .map(|p| (p.pubkey.as_str(), p.status.score))
        .collect();
    if candidates.len() <= fanout {
        return candidates.into_iter().map(|(k, _)| k.to_string()).collect();
    }

    let min_score = candidates.iter().map(|(_, s)| *s).min().unwrap_or(0);
    let shift = 1 - min_score.min(0);
    let mut selected = Vec::with_capacity(fanout);
    for _ in 0..fanout {
        if candidates.is_empty() {
            break;
        }
        let total_weight: i64 = candidates.iter().map(|(_, s)| s + shift).sum();
        let mut pick = if total_weight > 0 {
            rng.gen_range(0..total_weight)
        } else {
            0
        };
        let mut idx = 0;
        for (i, (_, score)) in candidates.iter().enumerate() {
            let weight = score + shift;
            if pick < weight {
                idx = i;
                break;
            }
            pick -= weight;
        }
        let (pubkey, _) = candidates.remove(idx);
        selected.push(pubkey.to_string());
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fewer_peers_than_fanout_selects_all() {
        let mut peers = PeerSet::new();
        peers.add("p1");
        peers.add("p2");
        let mut rng = StdRng::seed_from_u64(1);
        let selected = select_fanout(&peers, 13, &mut rng);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn fanout_never_exceeds_requested_size() {
        let mut peers = PeerSet::new();
        for i in 0..30 {
            peers.add(format!("p{i}"));
        }
        let mut rng = StdRng::seed_from_u64(7);
        let selected = select_fanout(&peers, 13, &mut rng);
        assert_eq!(selected.len(), 13);
        let unique: std::collections::BTreeSet<_> = selected.iter().collect();
        assert_eq!(unique.len(), 13);
    }

    #[test]
    fn negative_scored_peer_can_still_be_selected() {
        let mut peers = PeerSet::new();
        for i in 0..20 {
            peers.add(format!("p{i}"));
        }
        peers.adjust_score("p0", -5);
        let mut rng = StdRng::seed_from_u64(42);
        // Run several rounds; over enough trials the penalized peer should
        // still appear at least once since its weight is shifted positive.
        let mut ever_selected = false;
        for seed in 0..50 {
            let mut rng2 = StdRng::seed_from_u64(seed);
            let _ = &mut rng;
            if select_fanout(&peers, 13, &mut rng2).contains(&"p0".to_string()) {
                ever_selected = true;
                break;
            }
        }
        assert!(ever_selected);
    }
}

// Path: crates/cynic-gossip/src/catchup.rs
//! Catch-up detection: a node whose local head has fallen more than one
//! epoch behind the network stops waiting on push gossip and switches to
//! active pull sync (`Want` requests walking backward from the peer's
//! reported head).

use cynic_constants::ratios;

/// Whether a node at `local_head_slot`, given a peer reporting
/// `peer_head_slot` and a `block_ms` slot duration, has fallen far enough
/// behind to warrant switching from passive gossip to active pull sync.
/// "More than one epoch behind" is expressed in slots: `epoch_ms / block_ms`
/// slots, rounded down.
#[must_use]
pub fn needs_catchup(local_head_slot: u64, peer_head_slot: u64) -> bool {
    if peer_head_slot <= local_head_slot {
        return false;
    }
    let r = ratios();
    let slots_per_epoch = (r.epoch_ms / r.block_ms).max(1);
    peer_head_slot - local_head_slot > slots_per_epoch
}

/// Builds the ordered list of slots to request during catch-up, walking
/// backward from `peer_head_slot` to `local_head_slot + 1` so the most
/// recent blocks are requested first.
#[must_use]
pub fn catchup_slots(local_head_slot: u64, peer_head_slot: u64) -> Vec<u64> {
    if peer_head_slot <= local_head_slot {
        return Vec::new();
    }
    (local_head_slot + 1..=peer_head_slot).rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_one_epoch_ahead_does_not_trigger_catchup() {
        let r = ratios();
        let slots_per_epoch = r.epoch_ms / r.block_ms;
        assert!(!needs_catchup(0, slots_per_epoch));
    }

    #[test]
    fn peer_more_than_one_epoch_ahead_triggers_catchup() {
        let r = ratios();
        let slots_per_epoch = r.epoch_ms / r.block_ms;
        assert!(needs_catchup(0, slots_per_epoch + 1));
    }

    #[test]
    fn catchup_slots_are_most_recent_first() {
        let slots = catchup_slots(10, 13);
        assert_eq!(slots, vec![13, 12, 11]);
    }

    #[test]
    fn peer_behind_needs_no_catchup() {
        assert!(!needs_catchup(20, 5));
    }
}

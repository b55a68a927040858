// Path: crates/cynic-gossip/src/inbound.rs
//! Bounded inbound message queue with priority-aware shedding.
//!
//! When the queue is at capacity and a new message arrives, the lowest
//! priority item currently queued is dropped to make room — unless the
//! incoming message is itself the lowest priority and there is nothing
//! lower to evict, in which case it is the one discarded. A message
//! carrying data for the next slot a node expects is exempt from eviction
//! entirely.

use std::collections::VecDeque;

use crate::message::GossipMessage;

/// A bounded, priority-aware inbound queue.
pub struct InboundQueue {
    capacity: usize,
    items: VecDeque<GossipMessage>,
}

impl InboundQueue {
    /// Builds an empty queue with room for `capacity` messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::new(),
        }
    }

    /// Number of currently queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Enqueues `msg`, evicting the lowest-priority queued item first if at
    /// capacity. `expected_slot` identifies the slot this node is currently
    /// waiting to advance past; messages for it are never evicted and, if
    /// the queue is full of only such messages, the incoming one is instead
    /// the one dropped.
    ///
    /// Returns `true` if `msg` was enqueued, `false` if it (or something
    /// else) was dropped to make room and `msg` itself lost out.
    pub fn push(&mut self, msg: GossipMessage, expected_slot: u64) -> bool {
        if self.items.len() < self.capacity {
            self.items.push_back(msg);
            return true;
        }

        let protected_incoming = msg.is_next_expected_slot(expected_slot);
        let victim = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_next_expected_slot(expected_slot))
            .min_by_key(|(_, m)| m.priority())
            .map(|(i, m)| (i, m.priority()));

        match victim {
            Some((i, victim_priority)) if protected_incoming || victim_priority < msg.priority() => {
                self.items.remove(i);
                self.items.push_back(msg);
                true
            }
            _ => false,
        }
    }

    /// Pops the oldest queued message, if any.
    pub fn pop(&mut self) -> Option<GossipMessage> {
        self.items.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping() -> GossipMessage {
        GossipMessage::Ping { sent_at_ms: 0 }
    }

    fn data_for_slot(slot: u64) -> GossipMessage {
        use cynic_types::app::{Block, BlockBody, BlockHeader, BlockKind, GENESIS_PREV_HASH};
        GossipMessage::Data(crate::message::DataPayload::Block(Block {
            header: BlockHeader {
                slot,
                prev_hash: GENESIS_PREV_HASH,
                timestamp_ms: 0,
                judgments_root: [0; 32],
                knowledge_root: [0; 32],
                state_root: [0; 32],
                kind: BlockKind::Judgment,
                operator_pubkey: "op".into(),
            },
            body: BlockBody::Judgments(vec![]),
            operator_sig: String::new(),
        }))
    }

    #[test]
    fn queue_accepts_until_capacity() {
        let mut q = InboundQueue::new(2);
        assert!(q.push(ping(), 0));
        assert!(q.push(ping(), 0));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn full_queue_evicts_lowest_priority_for_higher_priority_incoming() {
        let mut q = InboundQueue::new(1);
        assert!(q.push(ping(), 0));
        let accepted = q.push(data_for_slot(5), 5);
        assert!(accepted);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn next_expected_slot_data_is_never_evicted() {
        let mut q = InboundQueue::new(1);
        assert!(q.push(data_for_slot(7), 7));
        // Queue full of exactly the protected item; any further push with
        // nothing evictable is rejected rather than bumping the protected
        // message.
        let accepted = q.push(ping(), 7);
        assert!(!accepted);
        assert_eq!(q.len(), 1);
    }
}

// Path: crates/cynic-gossip/src/message.rs
use cynic_types::app::{Block, KnowledgeUpdate, Vote};

/// The wire-level payloads exchanged between gossip peers. `Announce`/`Have`
/// are lightweight summaries used to discover what a peer is missing;
/// `Want`/`Data` carry the payload itself.
#[derive(Debug, Clone, PartialEq)]
pub enum GossipMessage {
    /// A peer announces a newly sealed block without sending its body.
    Announce {
        /// Hex-encoded block hash.
        block_hash: String,
        /// The block's slot.
        slot: u64,
        /// Hex-encoded public key of the sealing operator.
        operator_pubkey: String,
    },
    /// A peer advertises the set of block hashes it holds, compacted into a
    /// bloom filter so the recipient can cheaply test its own gaps.
    Have {
        /// Serialized bloom filter bitmap.
        bloom_bits: Vec<u8>,
        /// Number of bits in the filter (needed to reconstruct it).
        bloom_len: usize,
    },
    /// A pull request for specific block hashes a peer is missing.
    Want {
        /// Hex-encoded block hashes being requested.
        hashes: Vec<String>,
    },
    /// The requested or pushed payload itself.
    Data(DataPayload),
    /// Liveness probe; the reply leg carries the probe's originally
    /// observed send time so the caller can measure round-trip latency.
    Ping {
        /// Milliseconds since the Unix epoch at send time.
        sent_at_ms: u64,
    },
    /// Reply to [`GossipMessage::Ping`].
    Pong {
        /// Echoes the ping's `sent_at_ms`.
        sent_at_ms: u64,
    },
}

/// The payload variants carried by [`GossipMessage::Data`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataPayload {
    /// A fully sealed block.
    Block(Block),
    /// A single knowledge-store update (pattern or learning).
    Knowledge(KnowledgeUpdate),
    /// A consensus vote.
    Vote(Vote),
}

impl GossipMessage {
    /// Whether this message carries data for the next slot a node is
    /// expecting. Used by the backpressure policy: such messages are never
    /// dropped from an overflowing inbound queue.
    #[must_use]
    pub fn is_next_expected_slot(&self, expected_slot: u64) -> bool {
        match self {
            Self::Data(DataPayload::Block(b)) => b.header.slot == expected_slot,
            Self::Announce { slot, .. } => *slot == expected_slot,
            _ => false,
        }
    }

    /// A coarse priority used by the inbound queue's shedding policy: higher
    /// drops last. `Data` outranks summaries, which outrank liveness probes.
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            Self::Data(_) => 3,
            Self::Want { .. } | Self::Announce { .. } => 2,
            Self::Have { .. } => 1,
            Self::Ping { .. } | Self::Pong { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_expected_slot_is_never_deprioritized() {
        let msg = GossipMessage::Announce {
            block_hash: "abc".into(),
            slot: 42,
            operator_pubkey: "op".into(),
        };
        assert!(msg.is_next_expected_slot(42));
        assert!(!msg.is_next_expected_slot(43));
    }

    #[test]
    fn data_outranks_summaries_and_probes() {
        let data = GossipMessage::Want {
            hashes: vec!["a".into()],
        };
        let ping = GossipMessage::Ping { sent_at_ms: 0 };
        assert!(data.priority() > ping.priority());
    }
}

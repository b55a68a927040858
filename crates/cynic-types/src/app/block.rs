// Path: crates/cynic-types/src/app/block.rs
//! The slot-indexed, hash-linked unit produced by the proof-of-judgment
//! chain and validated by every other operator that gossips it.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::app::judgment::Judgment;
use crate::app::pattern::Pattern;
use crate::app::learning::Learning;
use crate::codec::{Canonical, CanonicalEncoder};

/// The 32-byte all-zero sentinel used as `prev_hash` for an operator's
/// genesis block.
pub const GENESIS_PREV_HASH: [u8; 32] = [0u8; 32];

/// The tagged variant a block carries, distinguished by `BlockHeader::kind`.
/// Decoders dispatch on this tag, never on structural shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum BlockKind {
    /// Ordinary batch of signed judgments.
    Judgment,
    /// A batch of knowledge-store updates (patterns/learnings).
    Knowledge,
    /// A governance proposal and its in-flight or concluded vote tally.
    Governance,
}

impl BlockKind {
    fn tag(self) -> u8 {
        match self {
            BlockKind::Judgment => 0,
            BlockKind::Knowledge => 1,
            BlockKind::Governance => 2,
        }
    }
}

impl Canonical for BlockKind {
    fn canonical_bytes(&self) -> Vec<u8> {
        CanonicalEncoder::new().write_u8(self.tag()).finish()
    }
}

/// A single update folded into a block's `knowledge_updates` sequence.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub enum KnowledgeUpdate {
    /// A new or superseding pattern leaf.
    Pattern(Pattern),
    /// A new learning (feedback) leaf.
    Learning(Learning),
}

impl Canonical for KnowledgeUpdate {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        match self {
            KnowledgeUpdate::Pattern(p) => {
                enc.write_u8(0);
                enc.write_fixed_bytes(&p.canonical_bytes());
            }
            KnowledgeUpdate::Learning(l) => {
                enc.write_u8(1);
                enc.write_fixed_bytes(&l.canonical_bytes());
            }
        }
        enc.finish()
    }
}

/// A governance action a [`GovernanceProposal`] requests.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub enum GovernanceAction {
    /// Install a new dimension. Carries its canonical-encoded
    /// [`crate::app::dimension::Dimension`] bytes as opaque params so this
    /// enum does not need to depend on the full dimension type shape.
    AddDimension {
        /// Canonical bytes of the dimension to add.
        dimension_bytes: Vec<u8>,
    },
    /// Adjust an existing dimension's thresholds.
    ModifyThreshold {
        /// Name of the dimension to modify.
        dimension_name: String,
        /// Canonical bytes of the new thresholds.
        thresholds_bytes: Vec<u8>,
    },
    /// Remove a non-seed, non-META dimension.
    RemoveDimension {
        /// Name of the dimension to remove.
        dimension_name: String,
    },
    /// Change the process-wide timing base.
    ChangeTimingBase {
        /// The new timing base, in milliseconds.
        new_timing_base_ms: u64,
    },
}

impl Canonical for GovernanceAction {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        match self {
            GovernanceAction::AddDimension { dimension_bytes } => {
                enc.write_u8(0).write_bytes_lp(dimension_bytes);
            }
            GovernanceAction::ModifyThreshold {
                dimension_name,
                thresholds_bytes,
            } => {
                enc.write_u8(1)
                    .write_str_lp(dimension_name)
                    .write_bytes_lp(thresholds_bytes);
            }
            GovernanceAction::RemoveDimension { dimension_name } => {
                enc.write_u8(2).write_str_lp(dimension_name);
            }
            GovernanceAction::ChangeTimingBase { new_timing_base_ms } => {
                enc.write_u8(3).write_u64(*new_timing_base_ms);
            }
        }
        enc.finish()
    }
}

/// The outcome status of a governance proposal's vote tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Reached `≥ φ⁻¹` agreeing weight with quorum.
    Passed,
    /// Failed to reach threshold before the window closed.
    Failed,
    /// Below quorum; neither passed nor failed.
    Deferred,
}

/// A governance proposal body, carried by a `Governance`-kind block.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct GovernanceProposal {
    /// Unique proposal id.
    pub id: String,
    /// The requested action.
    pub action: GovernanceAction,
    /// Hex-encoded pubkey of the proposing operator.
    pub proposer_pubkey: String,
}

impl Canonical for GovernanceProposal {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.action.canonical_bytes());
        enc.write_str_lp(&self.id);
        enc.write_str_lp(&self.proposer_pubkey);
        enc.finish()
    }
}

/// The variable part of a block, dispatched by `BlockHeader::kind`.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub enum BlockBody {
    /// An ordered batch of signed judgments (cardinality ≤ `F(11)=89`).
    Judgments(Vec<Judgment>),
    /// An ordered batch of knowledge updates (cardinality ≤ `F(9)=34`).
    Knowledge(Vec<KnowledgeUpdate>),
    /// A governance proposal.
    Governance(Box<GovernanceProposal>),
}

impl Canonical for BlockBody {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        match self {
            BlockBody::Judgments(js) => {
                enc.write_u8(0);
                enc.write_seq(js);
            }
            BlockBody::Knowledge(ks) => {
                enc.write_u8(1);
                enc.write_seq(ks);
            }
            BlockBody::Governance(g) => {
                enc.write_u8(2);
                enc.write_fixed_bytes(&g.canonical_bytes());
            }
        }
        enc.finish()
    }
}

/// The fixed-layout header every block carries: normative field order,
/// widths, and canonicalization rule.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Monotone per-operator slot number.
    pub slot: u64,
    /// Hash of the previous block by the same operator, or the genesis
    /// sentinel.
    pub prev_hash: [u8; 32],
    /// Wall-clock milliseconds at sealing.
    pub timestamp_ms: u64,
    /// Merkle root over `body`'s judgments, in listed order.
    pub judgments_root: [u8; 32],
    /// Merkle root over `body`'s knowledge updates, in listed order.
    pub knowledge_root: [u8; 32],
    /// Merkle root over the operator's current state leaves at seal time.
    pub state_root: [u8; 32],
    /// The block's body variant tag.
    pub kind: BlockKind,
    /// Hex-encoded Ed25519 public key of the sealing operator.
    pub operator_pubkey: String,
}

impl Canonical for BlockHeader {
    fn canonical_bytes(&self) -> Vec<u8> {
        // Lexicographic field order: judgments_root, kind, knowledge_root,
        // operator_pubkey, prev_hash, slot, state_root, timestamp_ms.
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.judgments_root);
        enc.write_fixed_bytes(&self.kind.canonical_bytes());
        enc.write_fixed_bytes(&self.knowledge_root);
        enc.write_str_lp(&self.operator_pubkey);
        enc.write_fixed_bytes(&self.prev_hash);
        enc.write_u64(self.slot);
        enc.write_fixed_bytes(&self.state_root);
        enc.write_u64(self.timestamp_ms);
        enc.finish()
    }
}

impl BlockHeader {
    /// `block_hash = SHA256(canonical(header))`. Hashing itself is
    /// performed by `cynic-crypto`; this returns only the preimage bytes so
    /// `cynic-types` need not depend on a hash implementation.
    #[must_use]
    pub fn hash_preimage(&self) -> Vec<u8> {
        self.canonical_bytes()
    }
}

/// A sealed block: the complete unit gossiped and validated by peers.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Block {
    /// The fixed-layout header.
    pub header: BlockHeader,
    /// The variable body, dispatched by `header.kind`.
    pub body: BlockBody,
    /// Hex-encoded Ed25519 signature over `header.hash_preimage()`.
    pub operator_sig: String,
}

impl Block {
    /// Returns the judgments carried by this block, or an empty slice if its
    /// body is not [`BlockBody::Judgments`].
    #[must_use]
    pub fn judgments(&self) -> &[Judgment] {
        match &self.body {
            BlockBody::Judgments(js) => js,
            _ => &[],
        }
    }

    /// Returns the knowledge updates carried by this block, or an empty
    /// slice if its body is not [`BlockBody::Knowledge`].
    #[must_use]
    pub fn knowledge_updates(&self) -> &[KnowledgeUpdate] {
        match &self.body {
            BlockBody::Knowledge(ks) => ks,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            slot: 1,
            prev_hash: GENESIS_PREV_HASH,
            timestamp_ms: 1000,
            judgments_root: [1; 32],
            knowledge_root: [2; 32],
            state_root: [3; 32],
            kind: BlockKind::Judgment,
            operator_pubkey: "aa".into(),
        }
    }

    #[test]
    fn header_hash_preimage_is_deterministic() {
        let h = sample_header();
        assert_eq!(h.hash_preimage(), h.hash_preimage());
    }

    #[test]
    fn body_accessor_returns_empty_for_mismatched_kind() {
        let block = Block {
            header: sample_header(),
            body: BlockBody::Knowledge(vec![]),
            operator_sig: String::new(),
        };
        assert!(block.judgments().is_empty());
        assert!(block.knowledge_updates().is_empty());
    }

    #[test]
    fn governance_action_canonical_bytes_vary_by_variant() {
        let a = GovernanceAction::ChangeTimingBase {
            new_timing_base_ms: 100,
        };
        let b = GovernanceAction::ChangeTimingBase {
            new_timing_base_ms: 200,
        };
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }
}

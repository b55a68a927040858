// Path: crates/cynic-chain/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC PoJ Chain
//!
//! An append-only, operator-owned, slot-indexed block log. Each operator's
//! stream is totally ordered by slot; cross-operator ordering is left to
//! consensus.

use std::collections::{BTreeMap, VecDeque};

use tracing::{info, warn};

use cynic_crypto::sign::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, SigningKeyPair, VerifyingKey,
};
use cynic_types::app::{
    Block, BlockBody, BlockHeader, BlockKind, GENESIS_PREV_HASH, Judgment, KnowledgeUpdate,
};
use cynic_types::codec::Canonical;
use cynic_types::error::{CynicError, IntegrityError, ProtocolError};

/// The pending batch one operator accumulates between slot boundaries.
/// Plain FIFO queues to avoid pointer-chasing for hot lookups.
#[derive(Debug, Default)]
pub struct PendingBatch {
    judgments: VecDeque<Judgment>,
    knowledge_updates: VecDeque<KnowledgeUpdate>,
}

impl PendingBatch {
    /// Appends a judgment to the pending batch.
    pub fn push_judgment(&mut self, j: Judgment) {
        self.judgments.push_back(j);
    }

    /// Appends a knowledge update to the pending batch.
    pub fn push_knowledge_update(&mut self, k: KnowledgeUpdate) {
        self.knowledge_updates.push_back(k);
    }

    /// Whether there is anything waiting to be sealed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty() && self.knowledge_updates.is_empty()
    }

    fn drain_judgments(&mut self, max: usize) -> Vec<Judgment> {
        (0..max.min(self.judgments.len()))
            .filter_map(|_| self.judgments.pop_front())
            .collect()
    }

    fn drain_knowledge(&mut self, max: usize) -> Vec<KnowledgeUpdate> {
        (0..max.min(self.knowledge_updates.len()))
            .filter_map(|_| self.knowledge_updates.pop_front())
            .collect()
    }
}

/// Computes the Merkle root over a sequence's canonical-byte leaves, in
/// listed order.
fn merkle_root<T: Canonical>(items: &[T]) -> Result<[u8; 32], IntegrityError> {
    let leaves: Vec<Vec<u8>> = items.iter().map(Canonical::canonical_bytes).collect();
    cynic_merkle::build(&leaves)
}

/// Seals a new judgment block: drains up to `max_judgments` from `batch`,
/// computes roots, and signs the header.
pub fn seal_judgment_block(
    batch: &mut PendingBatch,
    slot: u64,
    prev_hash: [u8; 32],
    state_root: [u8; 32],
    timestamp_ms: u64,
    max_judgments: usize,
    keypair: &Ed25519KeyPair,
) -> Result<Block, IntegrityError> {
    let judgments = batch.drain_judgments(max_judgments);
    let judgments_root = merkle_root(&judgments)?;
    let header = BlockHeader {
        slot,
        prev_hash,
        timestamp_ms,
        judgments_root,
        knowledge_root: cynic_merkle::EMPTY_ROOT,
        state_root,
        kind: BlockKind::Judgment,
        operator_pubkey: keypair.public_key().to_hex(),
    };
    sign_block(header, BlockBody::Judgments(judgments), keypair)
}

/// Seals a new knowledge block, analogous to [`seal_judgment_block`] but for
/// the `knowledge_updates` side of the pending batch.
pub fn seal_knowledge_block(
    batch: &mut PendingBatch,
    slot: u64,
    prev_hash: [u8; 32],
    state_root: [u8; 32],
    timestamp_ms: u64,
    max_knowledge_updates: usize,
    keypair: &Ed25519KeyPair,
) -> Result<Block, IntegrityError> {
    let updates = batch.drain_knowledge(max_knowledge_updates);
    let knowledge_root = merkle_root(&updates)?;
    let header = BlockHeader {
        slot,
        prev_hash,
        timestamp_ms,
        judgments_root: cynic_merkle::EMPTY_ROOT,
        knowledge_root,
        state_root,
        kind: BlockKind::Knowledge,
        operator_pubkey: keypair.public_key().to_hex(),
    };
    sign_block(header, BlockBody::Knowledge(updates), keypair)
}

fn sign_block(
    header: BlockHeader,
    body: BlockBody,
    keypair: &Ed25519KeyPair,
) -> Result<Block, IntegrityError> {
    let preimage = header.hash_preimage();
    let sig = keypair.sign(&preimage)?;
    Ok(Block {
        header,
        body,
        operator_sig: sig.to_hex(),
    })
}

/// Computes `block_hash = SHA256(canonical(header))`.
pub fn block_hash(header: &BlockHeader) -> Result<[u8; 32], IntegrityError> {
    cynic_crypto::sha256(header.hash_preimage())
}

/// Validates an incoming block against the sender's claimed public key and
/// this operator's currently-known head.
///
/// Checks, in order: cardinality limits, slot/`prev_hash` linkage against the
/// known head, that `judgments_root`/`knowledge_root` recompute from the
/// carried body, that `operator_sig` verifies against `header.operator_pubkey`,
/// and that every carried judgment's own signature verifies and satisfies the
/// confidence envelope invariant (`confidence ≤ φ⁻¹`, `doubt ≥ φ⁻²`).
pub fn validate_incoming(
    block: &Block,
    known_head_slot: Option<u64>,
    known_head_hash: Option<[u8; 32]>,
    max_judgments_per_block: usize,
    max_knowledge_updates_per_block: usize,
) -> Result<(), CynicError> {
    let body_judgment_count = block.judgments().len();
    if body_judgment_count > max_judgments_per_block {
        return Err(ProtocolError::CardinalityExceeded {
            what: "judgments",
            limit: max_judgments_per_block,
            got: body_judgment_count,
        }
        .into());
    }
    let body_knowledge_count = block.knowledge_updates().len();
    if body_knowledge_count > max_knowledge_updates_per_block {
        return Err(ProtocolError::CardinalityExceeded {
            what: "knowledge_updates",
            limit: max_knowledge_updates_per_block,
            got: body_knowledge_count,
        }
        .into());
    }

    match known_head_slot {
        None => {
            if block.header.slot != 0 {
                return Err(ProtocolError::UnexpectedSlot {
                    expected: 0,
                    got: block.header.slot,
                }
                .into());
            }
            if block.header.prev_hash != GENESIS_PREV_HASH {
                return Err(ProtocolError::MissingParent(hex::encode(
                    block.header.prev_hash,
                ))
                .into());
            }
        }
        Some(head_slot) => {
            let expected_slot = head_slot + 1;
            if block.header.slot != expected_slot {
                return Err(ProtocolError::UnexpectedSlot {
                    expected: expected_slot,
                    got: block.header.slot,
                }
                .into());
            }
            match known_head_hash {
                Some(head_hash) if head_hash == block.header.prev_hash => {}
                _ => {
                    return Err(ProtocolError::MissingParent(hex::encode(
                        block.header.prev_hash,
                    ))
                    .into())
                }
            }
        }
    }

    let expected_judgments_root = merkle_root(block.judgments())?;
    if expected_judgments_root != block.header.judgments_root {
        return Err(IntegrityError::HashMismatch {
            expected: hex::encode(block.header.judgments_root),
            got: hex::encode(expected_judgments_root),
        }
        .into());
    }

    let expected_knowledge_root = merkle_root(block.knowledge_updates())?;
    if expected_knowledge_root != block.header.knowledge_root {
        return Err(IntegrityError::HashMismatch {
            expected: hex::encode(block.header.knowledge_root),
            got: hex::encode(expected_knowledge_root),
        }
        .into());
    }

    verify_block_signature(block)?;
    for judgment in block.judgments() {
        verify_judgment(judgment)?;
    }

    Ok(())
}

fn verify_block_signature(block: &Block) -> Result<(), IntegrityError> {
    let operator_key = Ed25519PublicKey::from_hex(&block.header.operator_pubkey)?;
    let sig = Ed25519Signature::from_hex(&block.operator_sig)?;
    operator_key.verify(&block.header.hash_preimage(), &sig)
}

fn verify_judgment(judgment: &Judgment) -> Result<(), CynicError> {
    if !judgment.satisfies_confidence_envelope() {
        return Err(ProtocolError::ConfidenceEnvelopeViolated {
            judgment_id: judgment.id.clone(),
        }
        .into());
    }
    let issuer_key = Ed25519PublicKey::from_hex(&judgment.operator_pubkey)?;
    let sig = Ed25519Signature::from_hex(&judgment.signature)?;
    issuer_key.verify(&judgment.signing_preimage(), &sig)?;
    Ok(())
}

/// One operator's append-only chain log: single writer, consistent-snapshot
/// readers.
#[derive(Debug, Default)]
pub struct ChainLog {
    blocks_by_hash: BTreeMap<[u8; 32], Block>,
    slots_by_operator: BTreeMap<String, BTreeMap<u64, [u8; 32]>>,
    order: Vec<[u8; 32]>,
}

impl ChainLog {
    /// Creates an empty chain log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block that has already passed [`validate_incoming`].
    pub fn append(&mut self, block: Block) -> Result<[u8; 32], IntegrityError> {
        let hash = block_hash(&block.header)?;
        let operator = block.header.operator_pubkey.clone();
        let slot = block.header.slot;
        if self
            .slots_by_operator
            .get(&operator)
            .and_then(|m| m.get(&slot))
            .is_some()
        {
            warn!(target: "chain", operator = %operator, slot, "rejecting duplicate slot append");
            return Err(IntegrityError::MalformedKey(format!(
                "duplicate slot {slot} for operator {operator}"
            )));
        }
        info!(target: "chain", operator = %operator, slot, hash = %hex::encode(hash), "block appended");
        self.slots_by_operator
            .entry(operator)
            .or_default()
            .insert(slot, hash);
        self.order.push(hash);
        self.blocks_by_hash.insert(hash, block);
        Ok(hash)
    }

    /// The current head block hash for `operator`, if any.
    #[must_use]
    pub fn head(&self, operator: &str) -> Option<[u8; 32]> {
        self.slots_by_operator
            .get(operator)
            .and_then(|m| m.values().next_back())
            .copied()
    }

    /// The current head slot for `operator`, if any.
    #[must_use]
    pub fn head_slot(&self, operator: &str) -> Option<u64> {
        self.slots_by_operator
            .get(operator)
            .and_then(|m| m.keys().next_back())
            .copied()
    }

    /// Looks up a block by its hash.
    #[must_use]
    pub fn get_block(&self, hash: &[u8; 32]) -> Option<&Block> {
        self.blocks_by_hash.get(hash)
    }

    /// Returns up to the last `n` appended blocks, most recent last.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&Block> {
        self.order
            .iter()
            .rev()
            .take(n)
            .rev()
            .filter_map(|h| self.blocks_by_hash.get(h))
            .collect()
    }

    /// Verifies hash linkage (P2) for `operator`'s chain between slots
    /// `from` and `to`, inclusive.
    pub fn verify_chain(&self, operator: &str, from: u64, to: u64) -> Result<(), ProtocolError> {
        let Some(slots) = self.slots_by_operator.get(operator) else {
            return Err(ProtocolError::MissingParent(operator.to_string()));
        };
        let mut expected_prev: Option<[u8; 32]> = None;
        for slot in from..=to {
            let Some(hash) = slots.get(&slot) else {
                return Err(ProtocolError::UnexpectedSlot {
                    expected: slot,
                    got: u64::MAX,
                });
            };
            let Some(block) = self.blocks_by_hash.get(hash) else {
                return Err(ProtocolError::MissingParent(hex::encode(hash)));
            };
            if let Some(prev) = expected_prev {
                if block.header.prev_hash != prev {
                    return Err(ProtocolError::MissingParent(hex::encode(
                        block.header.prev_hash,
                    )));
                }
            }
            expected_prev = Some(*hash);
        }
        Ok(())
    }

    /// Prunes blocks from operators' logs below `finalized_cycle_boundary`,
    /// retaining orphans for at least one full cycle. A cycle-root snapshot is assumed to already be
    /// persisted by the caller before pruning.
    pub fn prune_below(&mut self, operator: &str, finalized_cycle_boundary: u64) {
        if let Some(slots) = self.slots_by_operator.get_mut(operator) {
            let to_remove: Vec<u64> = slots
                .keys()
                .filter(|&&s| s < finalized_cycle_boundary)
                .copied()
                .collect();
            for slot in to_remove {
                if let Some(hash) = slots.remove(&slot) {
                    self.blocks_by_hash.remove(&hash);
                    self.order.retain(|h| h != &hash);
                }
            }
        }
    }
}

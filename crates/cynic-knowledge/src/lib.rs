// Path: crates/cynic-knowledge/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC Knowledge Store
//!
//! Axiom-sharded, Merkle-indexed store of [`Pattern`]s and [`Learning`]s.
//! Each of the four axiom shards is a Merkle tree over its ordered leaves
//! (lexicographic by id); updates are new leaves superseding a prior one by
//! id rather than in-place mutation, keeping every historical version
//! content-addressable.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use cynic_merkle::InclusionProof;
use cynic_types::app::{Axiom, KnowledgeUpdate, Learning, Pattern};
use cynic_types::codec::Canonical;
use cynic_types::error::IntegrityError;

/// Errors the knowledge store can raise.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// A delta bundle's leaf failed to verify against its claimed root.
    #[error("invalid proof for leaf {0}")]
    InvalidProof(String),
    /// Hashing or Merkle construction failed.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Per-node sync granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Replicate all four shards in full.
    Full,
    /// Replicate one shard in full, headers only for the rest.
    OneAxiom(Axiom),
    /// Headers only; fetch proofs on demand.
    Light,
}

fn leaf_id(update: &KnowledgeUpdate) -> String {
    match update {
        KnowledgeUpdate::Pattern(p) => p.id.clone(),
        KnowledgeUpdate::Learning(l) => hex::encode(l.content_hash),
    }
}

/// One axiom shard: an ordered, id-keyed leaf set plus its Merkle root.
#[derive(Debug, Default, Clone)]
struct Shard {
    leaves: BTreeMap<String, KnowledgeUpdate>,
}

impl Shard {
    fn ordered_leaf_bytes(&self) -> Vec<Vec<u8>> {
        self.leaves.values().map(Canonical::canonical_bytes).collect()
    }

    fn root(&self) -> Result<[u8; 32], KnowledgeError> {
        Ok(cynic_merkle::build(&self.ordered_leaf_bytes())?)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.leaves.keys().position(|k| k == id)
    }
}

/// A minimal set of leaves, per shard, that a peer claiming `peer_roots` is
/// missing. A full shard-root mismatch is resolved conservatively by
/// resending the entire shard rather than computing a fine-grained tree
/// diff — correct, if not bandwidth-optimal; the `LIGHT` sync mode exists
/// for peers who want proofs on demand instead.
#[derive(Debug, Clone, Default)]
pub struct DeltaBundle {
    /// Leaves to add or supersede, per axiom, each carrying the inclusion
    /// proof this node's current shard root attests to.
    pub shards: BTreeMap<Axiom, Vec<(KnowledgeUpdate, InclusionProof)>>,
    /// The sender's claimed root per axiom, checked by the receiver before
    /// integrating any leaf from that shard.
    pub claimed_roots: BTreeMap<Axiom, [u8; 32]>,
}

/// The axiom-sharded knowledge store.
#[derive(Debug, Default)]
pub struct KnowledgeStore {
    shards: BTreeMap<Axiom, Shard>,
    archived: BTreeMap<Axiom, Shard>,
}

impl KnowledgeStore {
    /// Creates an empty store with all four axiom shards present.
    #[must_use]
    pub fn new() -> Self {
        let mut shards = BTreeMap::new();
        for axiom in Axiom::ALL {
            shards.insert(axiom, Shard::default());
        }
        Self {
            shards,
            archived: BTreeMap::new(),
        }
    }

    fn shard_mut(&mut self, axiom: Axiom) -> &mut Shard {
        self.shards.entry(axiom).or_default()
    }

    fn shard(&self, axiom: Axiom) -> Shard {
        self.shards.get(&axiom).cloned().unwrap_or_default()
    }

    /// Inserts or supersedes a pattern leaf, keyed by `p.id`.
    pub fn put_pattern(&mut self, p: Pattern) {
        debug!(target: "knowledge", pattern_id = %p.id, axiom = ?p.axiom, "put_pattern");
        let axiom = p.axiom;
        self.shard_mut(axiom)
            .leaves
            .insert(p.id.clone(), KnowledgeUpdate::Pattern(p));
    }

    /// Inserts or supersedes a learning leaf, keyed by its content hash.
    pub fn put_learning(&mut self, axiom: Axiom, l: Learning) {
        let id = hex::encode(l.content_hash);
        debug!(target: "knowledge", learning_id = %id, axiom = ?axiom, "put_learning");
        self.shard_mut(axiom)
            .leaves
            .insert(id, KnowledgeUpdate::Learning(l));
    }

    /// Looks up a leaf by id within `axiom`'s shard, returning its value and
    /// inclusion proof against that shard's current root.
    pub fn get(
        &self,
        axiom: Axiom,
        id: &str,
    ) -> Result<Option<(KnowledgeUpdate, InclusionProof)>, KnowledgeError> {
        let shard = self.shard(axiom);
        let Some(idx) = shard.index_of(id) else {
            return Ok(None);
        };
        let leaves = shard.ordered_leaf_bytes();
        let proof = cynic_merkle::proof(&leaves, idx)?;
        let value = shard
            .leaves
            .get(id)
            .cloned()
            .ok_or_else(|| KnowledgeError::InvalidProof(id.to_string()))?;
        Ok(Some((value, proof)))
    }

    /// The Merkle root of one axiom's shard.
    pub fn root(&self, axiom: Axiom) -> Result<[u8; 32], KnowledgeError> {
        self.shard(axiom).root()
    }

    /// The root of the 4-shard tree: a Merkle tree over the four per-axiom
    /// roots, in [`Axiom::ALL`] order.
    pub fn root_all(&self) -> Result<[u8; 32], KnowledgeError> {
        let leaves = Axiom::ALL
            .into_iter()
            .map(|a| self.root(a).map(|r| r.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cynic_merkle::build(&leaves)?)
    }

    /// Computes the set of leaves a peer claiming `peer_roots` is missing,
    /// per shard.
    #[must_use]
    pub fn delta_since(&self, peer_roots: &BTreeMap<Axiom, [u8; 32]>) -> DeltaBundle {
        let mut bundle = DeltaBundle::default();
        for axiom in Axiom::ALL {
            let shard = self.shard(axiom);
            let Ok(root) = shard.root() else { continue };
            let peer_has = peer_roots.get(&axiom) == Some(&root);
            bundle.claimed_roots.insert(axiom, root);
            if peer_has {
                continue;
            }
            let leaves = shard.ordered_leaf_bytes();
            let mut entries = Vec::with_capacity(shard.leaves.len());
            for (i, update) in shard.leaves.values().enumerate() {
                if let Ok(p) = cynic_merkle::proof(&leaves, i) {
                    entries.push((update.clone(), p));
                }
            }
            bundle.shards.insert(axiom, entries);
        }
        bundle
    }

    /// Verifies every leaf in `bundle` against its shard's claimed root,
    /// then integrates it. Idempotent: applying the same bundle twice is a
    /// no-op the second time, since insertion by id is itself idempotent.
    pub fn apply_delta(&mut self, bundle: &DeltaBundle) -> Result<(), KnowledgeError> {
        for (axiom, entries) in &bundle.shards {
            let claimed_root = bundle
                .claimed_roots
                .get(axiom)
                .copied()
                .ok_or_else(|| KnowledgeError::InvalidProof(format!("{axiom:?}")))?;
            for (update, proof) in entries {
                let leaf_bytes = update.canonical_bytes();
                if !cynic_merkle::verify(&claimed_root, &leaf_bytes, proof) {
                    warn!(target: "knowledge", axiom = ?axiom, "rejecting delta leaf with invalid proof");
                    return Err(KnowledgeError::InvalidProof(leaf_id(update)));
                }
            }
            for (update, _) in entries {
                let id = leaf_id(update);
                self.shard_mut(*axiom).leaves.insert(id, update.clone());
            }
        }
        Ok(())
    }

    /// Runs the epoch-boundary maintenance pass: any pattern that has sat
    /// below the archival floor for at least `epoch_len_slots` is moved out
    /// of its shard into the archive, keyed by id. Patterns that recover
    /// above the floor have their below-floor timer cleared. Returns the ids
    /// archived this pass.
    pub fn run_epoch_maintenance(&mut self, current_slot: u64, epoch_len_slots: u64) -> Vec<String> {
        let mut archived_ids = Vec::new();
        for axiom in Axiom::ALL {
            let mut to_archive = Vec::new();
            if let Some(shard) = self.shards.get_mut(&axiom) {
                for (id, update) in shard.leaves.iter_mut() {
                    let KnowledgeUpdate::Pattern(p) = update else {
                        continue;
                    };
                    if p.is_below_archival_floor() {
                        match p.below_floor_since_slot {
                            None => p.below_floor_since_slot = Some(current_slot),
                            Some(since) if current_slot.saturating_sub(since) >= epoch_len_slots => {
                                to_archive.push(id.clone());
                            }
                            Some(_) => {}
                        }
                    } else {
                        p.below_floor_since_slot = None;
                    }
                }
            }
            for id in to_archive {
                let Some(shard) = self.shards.get_mut(&axiom) else {
                    continue;
                };
                let Some(update) = shard.leaves.remove(&id) else {
                    continue;
                };
                debug!(target: "knowledge", pattern_id = %id, axiom = ?axiom, "archiving pattern below strength floor for a full epoch");
                self.archived.entry(axiom).or_default().leaves.insert(id.clone(), update);
                archived_ids.push(id);
            }
        }
        archived_ids
    }

    /// Whether `id` currently sits in `axiom`'s archive.
    #[must_use]
    pub fn is_archived(&self, axiom: Axiom, id: &str) -> bool {
        self.archived
            .get(&axiom)
            .is_some_and(|shard| shard.leaves.contains_key(id))
    }
}

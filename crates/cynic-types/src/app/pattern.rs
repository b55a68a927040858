// Path: crates/cynic-types/src/app/pattern.rs
//! Emergent knowledge records stored in the axiom-sharded Merkle tree.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::app::axiom::Axiom;
use crate::codec::{Canonical, CanonicalEncoder};

/// A piece of knowledge content-addressed by `content_hash`, confirmed once
/// at least [`cynic_constants::MIN_PATTERN_SOURCES`] distinct operators have
/// independently contributed it.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique pattern id, lexicographically ordered within a shard.
    pub id: String,
    /// SHA-256 hash of the pattern's canonical content.
    pub content_hash: [u8; 32],
    /// The axiom shard this pattern lives in.
    pub axiom: Axiom,
    /// Confidence strength in `[0, 1]`, decaying without reinforcement and
    /// archived once it falls below `φ⁻³` for a full epoch.
    pub strength: f64,
    /// Count of distinct operators that have contributed this pattern.
    pub sources: u64,
    /// The slot at which this pattern was first observed.
    pub first_seen_slot: u64,
    /// Path from this leaf to the shard's Merkle root, if already included
    /// in a sealed block; `None` while still pending.
    pub merkle_path: Option<Vec<[u8; 32]>>,
    /// The slot at which `strength` first dropped below the archival floor,
    /// cleared the moment it recovers. The knowledge store's epoch-boundary
    /// maintenance pass archives the pattern once a full epoch has elapsed
    /// since this slot.
    pub below_floor_since_slot: Option<u64>,
}

impl Pattern {
    /// Whether this pattern meets the distinct-source threshold to be
    /// considered confirmed and eligible to contribute to weighted
    /// consensus.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.sources >= cynic_constants::MIN_PATTERN_SOURCES as u64
    }

    /// Whether this pattern's strength has decayed below the archival
    /// floor.
    #[must_use]
    pub fn is_below_archival_floor(&self) -> bool {
        self.strength < cynic_constants::PATTERN_STRENGTH_FLOOR
    }
}

impl Canonical for Pattern {
    fn canonical_bytes(&self) -> Vec<u8> {
        // Lexicographic field order: axiom, content_hash, first_seen_slot,
        // id, sources, strength. `merkle_path` and `below_floor_since_slot`
        // are excluded: both are derived bookkeeping, not intrinsic content.
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.axiom.canonical_bytes());
        enc.write_fixed_bytes(&self.content_hash);
        enc.write_u64(self.first_seen_slot);
        enc.write_str_lp(&self.id);
        enc.write_u64(self.sources);
        enc.write_i64((self.strength * 10_000.0).round() as i64);
        enc.finish()
    }
}

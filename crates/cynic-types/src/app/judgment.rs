// Path: crates/cynic-types/src/app/judgment.rs
//! The signed, hash-committed record produced by the Judgment Engine.

use std::collections::BTreeMap;

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::app::item::ItemHash;
use crate::codec::{Canonical, CanonicalEncoder};

/// The verdict a judgment's `global_score` maps onto.
///
/// Ordered from most to least favorable; ties at a threshold boundary
/// resolve to the *stricter* (higher-index) verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Encode, Decode, Serialize, Deserialize)]
pub enum Verdict {
    /// `global_score ≥ 80`.
    Howl,
    /// `global_score ≥ 50`.
    Wag,
    /// `global_score ≥ φ⁻²·100`.
    Growl,
    /// `global_score < φ⁻²·100`.
    Bark,
}

impl Verdict {
    /// Maps a `global_score` in `[0, 100]` to its verdict, applying the
    /// strict-downgrade tie-breaking rule: a score exactly on a boundary
    /// maps to the stricter side.
    #[must_use]
    pub fn from_global_score(global_score: f64) -> Self {
        let growl_floor = cynic_constants::PHI_INV_2 * 100.0;
        if global_score > 80.0 {
            Verdict::Howl
        } else if global_score > 50.0 {
            Verdict::Wag
        } else if global_score > growl_floor {
            Verdict::Growl
        } else {
            Verdict::Bark
        }
    }

    fn tag(self) -> u8 {
        match self {
            Verdict::Howl => 0,
            Verdict::Wag => 1,
            Verdict::Growl => 2,
            Verdict::Bark => 3,
        }
    }
}

impl Canonical for Verdict {
    fn canonical_bytes(&self) -> Vec<u8> {
        CanonicalEncoder::new().write_u8(self.tag()).finish()
    }
}

/// A single dimension's raw score, fixed-point encoded at ×10⁴ for hashing,
/// stored here as `f64` for arithmetic convenience.
pub type DimensionScore = f64;

/// Produced by the Judgment Engine: a deterministic, bounded-
/// confidence evaluation of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Opaque id, unique within the issuing operator's process.
    pub id: String,
    /// Hash of the evaluated item; content itself is never stored here.
    pub item_hash: ItemHash,
    /// Per-dimension raw scores in `[0, 100]`, keyed by dimension name.
    /// `BTreeMap` gives the lexicographic-by-name iteration order this
    /// type's canonical encoding requires.
    pub scores: BTreeMap<String, DimensionScore>,
    /// The φ-weighted geometric mean of `scores`, rescaled to `[0, 100]`.
    pub global_score: f64,
    /// Bounded confidence, `≤ φ⁻¹`.
    pub confidence: f64,
    /// `1 − confidence`, `≥ φ⁻²`.
    pub doubt: f64,
    /// The verdict derived from `global_score`.
    pub verdict: Verdict,
    /// Set when one or more non-META evaluators errored and were omitted.
    pub partial: bool,
    /// Hex-encoded Ed25519 public key of the issuing operator.
    pub operator_pubkey: String,
    /// Hex-encoded Ed25519 signature over [`Judgment::canonical_bytes`]
    /// (computed with this field set to an empty string).
    pub signature: String,
    /// Wall-clock milliseconds at issuance.
    pub timestamp_ms: u64,
}

impl Judgment {
    /// Whether the confidence envelope invariant holds for this
    /// judgment: `confidence ≤ φ⁻¹` and `doubt ≥ φ⁻²`.
    #[must_use]
    pub fn satisfies_confidence_envelope(&self) -> bool {
        self.confidence <= cynic_constants::CONFIDENCE_CEILING + f64::EPSILON
            && self.doubt >= cynic_constants::DOUBT_FLOOR - f64::EPSILON
    }

    /// Returns the bytes that are hashed/signed: the canonical encoding of
    /// every field except `signature`, which is fixed to empty.
    #[must_use]
    pub fn signing_preimage(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&fixed_point(self.confidence));
        enc.write_fixed_bytes(&fixed_point(self.doubt));
        enc.write_fixed_bytes(&fixed_point(self.global_score));
        enc.write_str_lp(&self.id);
        enc.write_fixed_bytes(&self.item_hash.0);
        enc.write_str_lp(&self.operator_pubkey);
        enc.write_u8(u8::from(self.partial));
        enc.write_u32(self.scores.len() as u32);
        for (name, score) in &self.scores {
            enc.write_str_lp(name);
            enc.write_fixed_bytes(&fixed_point(*score));
        }
        enc.write_u64(self.timestamp_ms);
        enc.write_fixed_bytes(&self.verdict.canonical_bytes());
        enc.finish()
    }
}

impl Canonical for Judgment {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.signing_preimage());
        enc.write_str_lp(&self.signature);
        enc.finish()
    }
}

fn fixed_point(v: f64) -> [u8; 8] {
    let scaled = (v * 10_000.0).round() as i64;
    scaled.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Judgment {
        let mut scores = BTreeMap::new();
        scores.insert("COHERENCE".to_string(), 80.0);
        Judgment {
            id: "j1".into(),
            item_hash: ItemHash::from_bytes([7; 32]),
            scores,
            global_score: 49.44,
            confidence: 0.494,
            doubt: 0.506,
            verdict: Verdict::from_global_score(49.44),
            partial: false,
            operator_pubkey: "aa".into(),
            signature: String::new(),
            timestamp_ms: 1000,
        }
    }

    #[test]
    fn verdict_boundary_downgrades_to_stricter_side() {
        assert_eq!(Verdict::from_global_score(80.0), Verdict::Wag);
        assert_eq!(Verdict::from_global_score(80.01), Verdict::Howl);
        assert_eq!(Verdict::from_global_score(50.0), Verdict::Growl);
        let growl_floor = cynic_constants::PHI_INV_2 * 100.0;
        assert_eq!(Verdict::from_global_score(growl_floor), Verdict::Bark);
    }

    #[test]
    fn confidence_envelope_check() {
        let j = sample();
        assert!(j.satisfies_confidence_envelope());
        let mut bad = j;
        bad.confidence = cynic_constants::PHI_INV + 0.1;
        assert!(!bad.satisfies_confidence_envelope());
    }

    #[test]
    fn signing_preimage_excludes_signature_but_changes_with_content() {
        let j1 = sample();
        let mut j2 = sample();
        j2.signature = "deadbeef".into();
        assert_eq!(j1.signing_preimage(), j2.signing_preimage());
        j2.global_score = 10.0;
        assert_ne!(j1.signing_preimage(), j2.signing_preimage());
    }

    #[test]
    fn canonical_bytes_include_signature() {
        let j1 = sample();
        let mut j2 = sample();
        j2.signature = "deadbeef".into();
        assert_ne!(j1.canonical_bytes(), j2.canonical_bytes());
    }
}

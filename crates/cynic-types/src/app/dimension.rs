// Path: crates/cynic-types/src/app/dimension.rs
//! Named scorers installed into the Judgment Engine and their governance
//! lifecycle.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::app::axiom::Axiom;
use crate::codec::{Canonical, CanonicalEncoder};

/// Where a dimension came from: present at genesis, or added later via
/// governance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum DimensionOrigin {
    /// Installed at genesis; cannot be removed.
    Seed,
    /// Added by a passed `ADD_DIMENSION` governance proposal.
    Discovered,
}

impl Canonical for DimensionOrigin {
    fn canonical_bytes(&self) -> Vec<u8> {
        let tag = match self {
            DimensionOrigin::Seed => 0u8,
            DimensionOrigin::Discovered => 1u8,
        };
        CanonicalEncoder::new().write_u8(tag).finish()
    }
}

/// The three score thresholds a dimension's raw output is mapped against.
/// These inform operator-facing tooling outside this core; the Judge itself
/// only consumes `weight` and the per-dimension score.
#[derive(Debug, Clone, Copy, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct DimensionThresholds {
    /// Score at or above which this dimension is considered an accept signal.
    pub accept: f64,
    /// Score at or above which this dimension is considered transformable
    /// (neither a clean accept nor an outright reject).
    pub transform: f64,
    /// Score at or below which this dimension is considered a reject signal.
    pub reject: f64,
}

impl Canonical for DimensionThresholds {
    fn canonical_bytes(&self) -> Vec<u8> {
        // Fixed-point, ×10^4, matching score encoding elsewhere.
        CanonicalEncoder::new()
            .write_i64((self.accept * 10_000.0).round() as i64)
            .write_i64((self.transform * 10_000.0).round() as i64)
            .write_i64((self.reject * 10_000.0).round() as i64)
            .finish()
    }
}

/// A named scorer associated with exactly one [`Axiom`].
///
/// `weight` is always `φ^k` for some integer `k`; dimensions carry the
/// integer exponent rather than the float so the weight can be recomputed
/// bit-identically from the ratio kernel on any node.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Dimension {
    /// Unique dimension name, e.g. `"COHERENCE"`.
    pub name: String,
    /// The axiom this dimension belongs to.
    pub axiom: Axiom,
    /// Integer exponent `k` such that `weight = φ^k`.
    pub weight_exponent: i32,
    /// Scoring thresholds for operator-facing classification.
    pub thresholds: DimensionThresholds,
    /// A stable identifier resolved to an evaluator implementation by the
    /// judgment engine's evaluator registry. The engine itself never stores
    /// function pointers in this type — this keeps `Dimension` serializable
    /// and hashable for governance proposals.
    pub evaluator_ref: String,
    /// Where this dimension came from.
    pub origin: DimensionOrigin,
    /// The pubkey (hex) of the proposer that discovered this dimension, if
    /// `origin == Discovered`.
    pub discoverer_pubkey: Option<String>,
    /// Whether this is a META dimension: always applied, cannot be disabled,
    /// and enforces the confidence ceiling.
    pub is_meta: bool,
}

impl Dimension {
    /// Computes `φ^weight_exponent` using the process-wide ratio kernel's
    /// `PHI` constant.
    #[must_use]
    pub fn weight(&self) -> f64 {
        cynic_constants::PHI.powi(self.weight_exponent)
    }
}

impl Canonical for Dimension {
    fn canonical_bytes(&self) -> Vec<u8> {
        // Lexicographic field order: axiom, discoverer_pubkey, evaluator_ref,
        // is_meta, name, origin, thresholds, weight_exponent.
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.axiom.canonical_bytes());
        match &self.discoverer_pubkey {
            Some(pk) => {
                enc.write_u8(1).write_str_lp(pk);
            }
            None => {
                enc.write_u8(0);
            }
        }
        enc.write_str_lp(&self.evaluator_ref);
        enc.write_u8(u8::from(self.is_meta));
        enc.write_str_lp(&self.name);
        enc.write_fixed_bytes(&self.origin.canonical_bytes());
        enc.write_fixed_bytes(&self.thresholds.canonical_bytes());
        enc.write_i64(i64::from(self.weight_exponent));
        enc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dimension {
        Dimension {
            name: "COHERENCE".into(),
            axiom: Axiom::Phi,
            weight_exponent: 1,
            thresholds: DimensionThresholds {
                accept: 80.0,
                transform: 50.0,
                reject: 20.0,
            },
            evaluator_ref: "coherence.v1".into(),
            origin: DimensionOrigin::Seed,
            discoverer_pubkey: None,
            is_meta: false,
        }
    }

    #[test]
    fn weight_matches_phi_power() {
        let d = sample();
        assert!((d.weight() - cynic_constants::PHI).abs() < 1e-12);
    }

    #[test]
    fn canonical_bytes_are_deterministic() {
        let d = sample();
        assert_eq!(d.canonical_bytes(), d.canonical_bytes());
    }

    #[test]
    fn canonical_bytes_differ_on_discoverer_presence() {
        let mut d = sample();
        let without = d.canonical_bytes();
        d.discoverer_pubkey = Some("abcd".into());
        d.origin = DimensionOrigin::Discovered;
        let with = d.canonical_bytes();
        assert_ne!(without, with);
    }
}

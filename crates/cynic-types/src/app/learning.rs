// Path: crates/cynic-types/src/app/learning.rs
//! Feedback records linking a judgment to an observed outcome.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::codec::{Canonical, CanonicalEncoder};

/// The observed outcome a [`Learning`] record reports for a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum Outcome {
    /// The judgment's verdict was later confirmed correct.
    Correct,
    /// The judgment's verdict was later confirmed incorrect.
    Incorrect,
    /// The judgment was partially correct (e.g. right verdict, wrong
    /// dimension emphasis).
    Partial,
}

impl Canonical for Outcome {
    fn canonical_bytes(&self) -> Vec<u8> {
        let tag = match self {
            Outcome::Correct => 0u8,
            Outcome::Incorrect => 1u8,
            Outcome::Partial => 2u8,
        };
        CanonicalEncoder::new().write_u8(tag).finish()
    }
}

/// A content-hashed feedback record. Stored with the contributor's identity
/// hashed rather than carried in cleartext, per the privacy hook.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Learning {
    /// Hash of `(judgment_id, outcome, contributor_hash, slot)`, used as the
    /// content address in the knowledge store.
    pub content_hash: [u8; 32],
    /// The judgment this feedback concerns.
    pub judgment_id: String,
    /// The reported outcome.
    pub outcome: Outcome,
    /// 32-byte hash of the contributor's identity (never cleartext), from
    /// `hash_for_sharing`.
    pub contributor_hash: [u8; 32],
    /// The slot at which this feedback was recorded.
    pub slot: u64,
}

impl Canonical for Learning {
    fn canonical_bytes(&self) -> Vec<u8> {
        // Lexicographic field order: content_hash, contributor_hash,
        // judgment_id, outcome, slot.
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.content_hash);
        enc.write_fixed_bytes(&self.contributor_hash);
        enc.write_str_lp(&self.judgment_id);
        enc.write_fixed_bytes(&self.outcome.canonical_bytes());
        enc.write_u64(self.slot);
        enc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes_vary_by_outcome() {
        let base = Learning {
            content_hash: [1; 32],
            judgment_id: "j1".into(),
            outcome: Outcome::Correct,
            contributor_hash: [2; 32],
            slot: 5,
        };
        let mut other = base.clone();
        other.outcome = Outcome::Incorrect;
        assert_ne!(base.canonical_bytes(), other.canonical_bytes());
    }
}

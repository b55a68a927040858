// Path: crates/cynic-types/src/app/vote.rs
//! Hard-consensus votes and the weighted tallies they drive.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::codec::{Canonical, CanonicalEncoder};

/// A voter's choice on a proposed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum Choice {
    /// The voter supports finalizing the target.
    Agree,
    /// The voter opposes finalizing the target.
    Disagree,
    /// The voter declines to take a position (counted toward quorum, not
    /// toward the agreeing-weight ratio).
    Abstain,
}

impl Canonical for Choice {
    fn canonical_bytes(&self) -> Vec<u8> {
        let tag = match self {
            Choice::Agree => 0u8,
            Choice::Disagree => 1u8,
            Choice::Abstain => 2u8,
        };
        CanonicalEncoder::new().write_u8(tag).finish()
    }
}

/// A single signed vote cast during hard consensus.
#[derive(Debug, Clone, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Vote {
    /// Hex-encoded pubkey of the voting operator.
    pub voter_pubkey: String,
    /// Hash of the block (or proposal) this vote targets.
    pub target_block_hash: [u8; 32],
    /// The voter's choice.
    pub choice: Choice,
    /// The voter's weight, frozen at the start of the current epoch.
    pub weight: f64,
    /// Slot at which this voter's exponential lockout on conflicting votes
    /// for this target expires.
    pub lockout_until_slot: u64,
    /// Hex-encoded Ed25519 signature over [`Vote::signing_preimage`].
    pub sig: String,
}

impl Vote {
    /// Bytes hashed/signed: every field except `sig`.
    #[must_use]
    pub fn signing_preimage(&self) -> Vec<u8> {
        // Lexicographic field order: choice, lockout_until_slot,
        // target_block_hash, voter_pubkey, weight.
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.choice.canonical_bytes());
        enc.write_u64(self.lockout_until_slot);
        enc.write_fixed_bytes(&self.target_block_hash);
        enc.write_str_lp(&self.voter_pubkey);
        enc.write_i64((self.weight * 10_000.0).round() as i64);
        enc.finish()
    }
}

impl Canonical for Vote {
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        enc.write_fixed_bytes(&self.signing_preimage());
        enc.write_str_lp(&self.sig);
        enc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_preimage_excludes_sig() {
        let mut v = Vote {
            voter_pubkey: "aa".into(),
            target_block_hash: [1; 32],
            choice: Choice::Agree,
            weight: 300.0,
            lockout_until_slot: 10,
            sig: String::new(),
        };
        let before = v.signing_preimage();
        v.sig = "deadbeef".into();
        assert_eq!(before, v.signing_preimage());
    }
}

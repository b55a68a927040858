// Path: crates/cynic-types/src/app/axiom.rs
//! The fixed axiom set.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::codec::{Canonical, CanonicalEncoder};

/// One of the four symbolic categories every [`super::dimension::Dimension`]
/// belongs to. Fixed at genesis; new axioms cannot be added by governance,
/// only new dimensions within an existing axiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum Axiom {
    /// The φ axiom: ratio-fidelity and proportion dimensions.
    Phi,
    /// The verification axiom: falsifiability and evidentiary dimensions.
    Verify,
    /// The culture axiom: social/contextual alignment dimensions.
    Culture,
    /// The burn axiom: cost-of-commitment and stake dimensions.
    Burn,
}

impl Axiom {
    /// All four axioms in their canonical (discriminant) order.
    pub const ALL: [Axiom; 4] = [Axiom::Phi, Axiom::Verify, Axiom::Culture, Axiom::Burn];

    /// A single-byte tag used in canonical encodings and shard keys.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Axiom::Phi => 0,
            Axiom::Verify => 1,
            Axiom::Culture => 2,
            Axiom::Burn => 3,
        }
    }

    /// Recovers an [`Axiom`] from its canonical tag byte.
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Axiom::Phi),
            1 => Some(Axiom::Verify),
            2 => Some(Axiom::Culture),
            3 => Some(Axiom::Burn),
            _ => None,
        }
    }
}

impl Canonical for Axiom {
    fn canonical_bytes(&self) -> Vec<u8> {
        CanonicalEncoder::new().write_u8(self.tag()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip_covers_all_axioms() {
        for a in Axiom::ALL {
            assert_eq!(Axiom::from_tag(a.tag()), Some(a));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(Axiom::from_tag(99), None);
    }
}

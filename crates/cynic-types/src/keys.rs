// Path: crates/cynic-types/src/keys.rs
//! Well-known state-key constants used by the knowledge store and chain for
//! their on-disk layout. Centralized here so
//! `cynic-storage` and `cynic-knowledge` never hand-roll path formats that
//! could drift apart.

/// Top-level directory for per-operator sealed block logs.
pub const CHAIN_DIR: &str = "chain";
/// Top-level directory for axiom-sharded knowledge leaves.
pub const KNOWLEDGE_DIR: &str = "knowledge";
/// Filename for an operator's keypair reference and reputation stats.
pub const OPERATOR_FILE: &str = "operator.json";
/// Filename for the peer set and their scores.
pub const PEERS_FILE: &str = "peers.json";
/// Top-level directory for in-flight governance proposals.
pub const PROPOSALS_DIR: &str = "proposals";

/// Builds the relative path for a sealed block: `chain/<operator>/<slot>.block`.
#[must_use]
pub fn chain_block_path(operator_pubkey_hex: &str, slot: u64) -> String {
    format!("{CHAIN_DIR}/{operator_pubkey_hex}/{slot}.block")
}

/// Builds the relative path for a knowledge leaf: `knowledge/<axiom>/<pattern_id>`.
#[must_use]
pub fn knowledge_leaf_path(axiom_tag: u8, pattern_id: &str) -> String {
    format!("{KNOWLEDGE_DIR}/{axiom_tag}/{pattern_id}")
}

/// Builds the relative path for an in-flight governance proposal.
#[must_use]
pub fn proposal_path(proposal_id: &str) -> String {
    format!("{PROPOSALS_DIR}/{proposal_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_builders_match_layout() {
        assert_eq!(chain_block_path("ab12", 7), "chain/ab12/7.block");
        assert_eq!(knowledge_leaf_path(0, "p1"), "knowledge/0/p1");
        assert_eq!(proposal_path("prop1"), "proposals/prop1");
    }
}

// Path: crates/cynic-types/src/app/mod.rs
//! Core application data structures: axioms, dimensions, items,
//! judgments, blocks, patterns, learnings, votes, and operator state.

/// The fixed four-valued axiom set.
pub mod axiom;
/// Slot-indexed, hash-linked blocks and their governance body variant.
pub mod block;
/// Named scorers installed into the Judgment Engine.
pub mod dimension;
/// The opaque item handle and its content hash.
pub mod item;
/// Signed, bounded-confidence judgment records.
pub mod judgment;
/// Outcome feedback records.
pub mod learning;
/// Per-operator mutable state.
pub mod operator;
/// Emergent, Merkle-indexed knowledge records.
pub mod pattern;
/// Hard-consensus votes.
pub mod vote;

pub use axiom::Axiom;
pub use block::{
    Block, BlockBody, BlockHeader, BlockKind, GovernanceAction, GovernanceProposal,
    KnowledgeUpdate, ProposalStatus, GENESIS_PREV_HASH,
};
pub use dimension::{Dimension, DimensionOrigin, DimensionThresholds};
pub use item::{Item, ItemHash};
pub use judgment::{Judgment, Verdict};
pub use learning::{Learning, Outcome};
pub use operator::OperatorState;
pub use pattern::Pattern;
pub use vote::{Choice, Vote};

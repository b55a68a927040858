// Path: crates/cynic-types/src/prelude.rs
//! Re-exports the types most call sites across the workspace need.

pub use crate::app::{
    Axiom, Block, BlockBody, BlockHeader, BlockKind, Choice, Dimension, DimensionOrigin,
    DimensionThresholds, GovernanceAction, GovernanceProposal, Item, ItemHash, Judgment,
    KnowledgeUpdate, Learning, Outcome, OperatorState, Pattern, ProposalStatus, Verdict, Vote,
    GENESIS_PREV_HASH,
};
pub use crate::codec::{Canonical, CanonicalEncoder};
pub use crate::config::CynicConfig;
pub use crate::error::{CynicError, ErrorCode, FailureRecord};
pub use crate::Result;

// Path: crates/cynic-types/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC Core Types
//!
//! The foundational crate for the CYNIC protocol: data structures shared by
//! every other crate (`Axiom`, `Dimension`, `Judgment`, `Block`, `Pattern`,
//! `Learning`, `Vote`, operator state), the canonical byte codec used for
//! hashing and signing, and the shared error taxonomy.
//!
//! As the base crate, `cynic-types` has minimal dependencies and is itself a
//! dependency of almost every other crate in the workspace.

/// Core application-level data structures: axioms, dimensions, items,
/// judgments, blocks, patterns, learnings, votes, and operator state.
pub mod app;
/// The canonical byte codec: a bespoke big-endian/length-prefixed encoding
/// for hash and signature preimages, plus a `parity-scale-codec` wrapper for
/// ordinary storage/wire round-tripping.
pub mod codec;
/// Shared configuration structures (`CynicConfig`, genesis parameters).
pub mod config;
/// The unified error taxonomy used across the workspace.
pub mod error;
/// Constants for well-known state keys used by the knowledge store and chain.
pub mod keys;
/// A prelude re-exporting the most commonly used types.
pub mod prelude;

/// A crate-wide `Result` alias defaulting to [`error::CynicError`].
pub type Result<T, E = error::CynicError> = std::result::Result<T, E>;

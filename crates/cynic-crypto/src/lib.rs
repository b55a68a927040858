// Path: crates/cynic-crypto/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC Crypto Primitives
//!
//! SHA-256 hashing, Ed25519 signing and verification, and the salt
//! derivation used by the privacy hashing hooks. Every function here wraps
//! `dcrypt`, so this crate never reimplements primitive cryptography.

/// The crate-local error alias, re-exporting `cynic-types`'s taxonomy.
pub mod error;
/// SHA-256 hashing and the canonical-value hashing helper.
pub mod hash;
/// Ed25519 key pairs, signing, and verification.
pub mod sign;
/// Salt derivation for the privacy hashing hooks.
pub mod salt;

pub use hash::{hash_canonical, sha256, HashFunction, Sha256Hash};
pub use salt::{derive_salt, hash_for_sharing, random_salt};
pub use sign::{
    Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature, SerializableKey, SigningKeyPair,
    VerifyingKey,
};

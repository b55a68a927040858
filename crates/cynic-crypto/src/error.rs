// Path: crates/cynic-crypto/src/error.rs
//! Local error type for the `cynic-crypto` crate.
//!
//! Crypto failures are always `Integrity` or `Configuration` class errors;
//! this crate re-exports the canonical variants from `cynic-types` rather
//! than defining its own taxonomy, so callers match on one error family
//! workspace-wide.

pub use cynic_types::error::{ConfigurationError, ErrorCode, IntegrityError};

/// The crate-local result alias.
pub type CryptoResult<T> = Result<T, IntegrityError>;

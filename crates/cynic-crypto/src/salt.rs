// Path: crates/cynic-crypto/src/salt.rs
//! Salt derivation for the privacy hashing hooks. Collaborators pre-hash user-identifying fields
//! before they cross into the core; this module only supplies the salt,
//! never touches cleartext PII itself.

use rand::RngCore;

use cynic_types::codec::CanonicalEncoder;
use cynic_types::error::IntegrityError;

use crate::hash::sha256;

/// Deterministically derives a 32-byte salt for `purpose_tag` from a fixed
/// `global_salt`, for collaborators that need the same hashed identifier to
/// recur across calls (deterministic lookup mode).
pub fn derive_salt(purpose_tag: &str, global_salt: &[u8; 32]) -> Result<[u8; 32], IntegrityError> {
    let mut enc = CanonicalEncoder::new();
    enc.write_str_lp(purpose_tag);
    enc.write_fixed_bytes(global_salt);
    sha256(enc.finish())
}

/// Generates a fresh, non-deterministic 32-byte salt from the OS randomness
/// source, for collaborators that only need one-way hashing with no later
/// correlation (storage mode).
#[must_use]
pub fn random_salt() -> [u8; 32] {
    let mut salt = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Hashes `value` salted with `salt`, the shape `hash_for_sharing`
/// exposes to external collaborators: `SHA256(salt || value)`.
pub fn hash_for_sharing(value: &[u8], salt: &[u8; 32]) -> Result<[u8; 32], IntegrityError> {
    let mut buf = Vec::with_capacity(32 + value.len());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(value);
    sha256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_salt_is_deterministic_per_purpose() {
        let global = [1u8; 32];
        let a = derive_salt("contributor", &global).expect("derive");
        let b = derive_salt("contributor", &global).expect("derive");
        assert_eq!(a, b);
    }

    #[test]
    fn derive_salt_differs_by_purpose() {
        let global = [1u8; 32];
        let a = derive_salt("contributor", &global).expect("derive");
        let b = derive_salt("reviewer", &global).expect("derive");
        assert_ne!(a, b);
    }

    #[test]
    fn random_salt_is_not_all_zero() {
        // Astronomically unlikely to collide with the all-zero sentinel.
        assert_ne!(random_salt(), [0u8; 32]);
    }

    #[test]
    fn hash_for_sharing_never_reveals_cleartext_in_output_length() {
        let salt = random_salt();
        let digest = hash_for_sharing(b"alice@example.com", &salt).expect("hash");
        assert_eq!(digest.len(), 32);
    }
}

// Path: crates/cynic-crypto/src/hash.rs
//! SHA-256 hashing, backed by `dcrypt`.

use dcrypt::algorithms::hash::sha2::Sha256 as DcryptSha256;
use dcrypt::algorithms::hash::HashFunction as DcryptHashFunction;
use dcrypt::algorithms::ByteSerializable;

use cynic_types::error::IntegrityError;

/// A hash function usable wherever the protocol needs a content digest.
/// Lets `cynic-merkle` and the chain/knowledge stores stay generic over the
/// concrete algorithm.
pub trait HashFunction {
    /// Hashes `message`, returning the raw digest bytes.
    fn hash(&self, message: &[u8]) -> Result<Vec<u8>, IntegrityError>;

    /// Digest size in bytes.
    fn digest_size(&self) -> usize;
}

/// SHA-256, the only hash the protocol's hashed payloads use.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn hash(&self, message: &[u8]) -> Result<Vec<u8>, IntegrityError> {
        let digest = DcryptSha256::digest(message)
            .map_err(|e| IntegrityError::MalformedKey(format!("sha256 failed: {e}")))?;
        Ok(digest.to_bytes())
    }

    fn digest_size(&self) -> usize {
        32
    }
}

/// Hashes `data` with SHA-256, returning a fixed 32-byte array.
///
/// # Errors
/// Returns [`IntegrityError`] only if the underlying digest unexpectedly
/// fails to produce 32 bytes; `dcrypt`'s SHA-256 never does in practice.
pub fn sha256<T: AsRef<[u8]>>(data: T) -> Result<[u8; 32], IntegrityError> {
    let bytes = Sha256Hash.hash(data.as_ref())?;
    bytes
        .clone()
        .try_into()
        .map_err(|_| IntegrityError::HashMismatch {
            expected: "32 bytes".into(),
            got: format!("{} bytes", bytes.len()),
        })
}

/// Hashes a [`cynic_types::codec::Canonical`] value's canonical byte form.
/// The standard entry point for computing `item_hash`, `block_hash`,
/// `content_hash`, and Merkle leaf hashes.
pub fn hash_canonical<T: cynic_types::codec::Canonical>(value: &T) -> Result<[u8; 32], IntegrityError> {
    sha256(value.canonical_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_is_deterministic() {
        let a = sha256(b"hello").expect("hash");
        let b = sha256(b"hello").expect("hash");
        assert_eq!(a, b);
    }

    #[test]
    fn sha256_differs_by_input() {
        let a = sha256(b"hello").expect("hash");
        let b = sha256(b"world").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn known_vector_empty_string() {
        let digest = sha256(b"").expect("hash");
        assert_eq!(
            hex::encode(digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}

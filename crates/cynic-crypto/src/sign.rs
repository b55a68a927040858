// Path: crates/cynic-crypto/src/sign.rs
//! Ed25519 signing and verification, backed by `dcrypt`.

use dcrypt::sign::eddsa;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use cynic_types::error::IntegrityError;

/// A byte-serializable key or signature.
pub trait SerializableKey: Sized {
    /// Returns the raw bytes for this key/signature.
    fn to_bytes(&self) -> Vec<u8>;
    /// Parses a key/signature from raw bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, IntegrityError>;
}

/// A public key that can verify signatures it did not produce.
pub trait VerifyingKey {
    /// Returns `Ok(())` if `signature` is valid over `message` under this
    /// key, otherwise [`IntegrityError::InvalidSignature`].
    fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), IntegrityError>;
}

/// A signing key pair able to produce signatures.
pub trait SigningKeyPair {
    /// Returns the public half of this key pair.
    fn public_key(&self) -> Ed25519PublicKey;
    /// Signs `message`, producing a signature verifiable by `public_key()`.
    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, IntegrityError>;
}

/// An Ed25519 key pair.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    public_key: eddsa::Ed25519PublicKey,
    secret_key: eddsa::Ed25519SecretKey,
}

/// An Ed25519 public key.
#[derive(Clone)]
pub struct Ed25519PublicKey(eddsa::Ed25519PublicKey);

/// An Ed25519 signature.
#[derive(Clone)]
pub struct Ed25519Signature(eddsa::Ed25519Signature);

impl Ed25519KeyPair {
    /// Generates a fresh key pair from the OS randomness source.
    pub fn generate() -> Result<Self, IntegrityError> {
        let mut rng = OsRng;
        let (public_key, secret_key) = eddsa::Ed25519::keypair(&mut rng)
            .map_err(|e| IntegrityError::MalformedKey(format!("keygen failed: {e}")))?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }

    /// Reconstructs a key pair from a 32-byte seed, e.g. loaded from an
    /// operator's key file.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, IntegrityError> {
        let secret_key = eddsa::Ed25519SecretKey::from_seed(seed)
            .map_err(|e| IntegrityError::MalformedKey(format!("bad seed: {e}")))?;
        let public_key = secret_key
            .public_key()
            .map_err(|e| IntegrityError::MalformedKey(format!("derive pubkey failed: {e}")))?;
        Ok(Self {
            public_key,
            secret_key,
        })
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        let mut seed = self.secret_key.seed().to_vec();
        seed.zeroize();
    }
}

impl SigningKeyPair for Ed25519KeyPair {
    fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.public_key.clone())
    }

    fn sign(&self, message: &[u8]) -> Result<Ed25519Signature, IntegrityError> {
        let signature = eddsa::Ed25519::sign(message, &self.secret_key)
            .map_err(|e| IntegrityError::MalformedKey(format!("sign failed: {e}")))?;
        Ok(Ed25519Signature(signature))
    }
}

impl VerifyingKey for Ed25519PublicKey {
    fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), IntegrityError> {
        eddsa::Ed25519::verify(message, &signature.0, &self.0)
            .map_err(|_| IntegrityError::InvalidSignature)
    }
}

impl SerializableKey for Ed25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, IntegrityError> {
        eddsa::Ed25519PublicKey::from_bytes(bytes)
            .map(Ed25519PublicKey)
            .map_err(|e| IntegrityError::MalformedKey(format!("bad public key: {e}")))
    }
}

impl SerializableKey for Ed25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, IntegrityError> {
        eddsa::Ed25519Signature::from_bytes(bytes)
            .map(Ed25519Signature)
            .map_err(|_| IntegrityError::InvalidSignature)
    }
}

impl Ed25519PublicKey {
    /// Hex-encodes this public key, the form carried by every protocol
    /// record's `*_pubkey` field.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses a public key from its hex representation.
    pub fn from_hex(s: &str) -> Result<Self, IntegrityError> {
        let bytes =
            hex::decode(s).map_err(|e| IntegrityError::MalformedKey(format!("bad hex: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl Ed25519Signature {
    /// Hex-encodes this signature, the form carried by every protocol
    /// record's `signature`/`sig` field.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parses a signature from its hex representation.
    pub fn from_hex(s: &str) -> Result<Self, IntegrityError> {
        let bytes =
            hex::decode(s).map_err(|e| IntegrityError::MalformedKey(format!("bad hex: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_roundtrips() {
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let sig = kp.sign(b"hello").expect("sign");
        assert!(kp.public_key().verify(b"hello", &sig).is_ok());
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let sig = kp.sign(b"hello").expect("sign");
        assert!(kp.public_key().verify(b"goodbye", &sig).is_err());
    }

    #[test]
    fn from_seed_is_deterministic() {
        let seed = [7u8; 32];
        let a = Ed25519KeyPair::from_seed(&seed).expect("kp1");
        let b = Ed25519KeyPair::from_seed(&seed).expect("kp2");
        assert_eq!(a.public_key().to_hex(), b.public_key().to_hex());
    }

    #[test]
    fn pubkey_hex_roundtrip() {
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let hex = kp.public_key().to_hex();
        let back = Ed25519PublicKey::from_hex(&hex).expect("parse");
        assert_eq!(back.to_bytes(), kp.public_key().to_bytes());
    }
}

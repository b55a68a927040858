// Path: crates/cynic-types/src/app/item.rs
//! The opaque item handle the Judge consumes.

use serde::{Deserialize, Serialize};

/// A 32-byte SHA-256 digest of an item's canonical serialization.
///
/// The Judge never stores or transmits item content — only this hash ever
/// leaves the caller's process. Collaborators that need to correlate a
/// judgment back to source content do so out-of-band, keyed by this hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemHash(pub [u8; 32]);

impl ItemHash {
    /// Wraps a raw 32-byte digest.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the lower-case hex representation.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ItemHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An opaque object supplied to the Judge. `cynic-types` treats the content
/// as an uninterpreted byte slice plus an evaluation context bag; the
/// judgment engine (`cynic-judgment`) is the only consumer that ever sees
/// item bytes, and it never persists or forwards them.
#[derive(Debug, Clone)]
pub struct Item<'a> {
    /// The raw, canonicalizable content supplied by the caller.
    pub content: &'a [u8],
}

impl<'a> Item<'a> {
    /// Wraps caller-supplied bytes as an item.
    #[must_use]
    pub fn new(content: &'a [u8]) -> Self {
        Self { content }
    }
}

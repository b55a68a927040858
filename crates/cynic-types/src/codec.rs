// Path: crates/cynic-types/src/codec.rs
//! Two codecs live here, and they serve different purposes.
//!
//! [`to_bytes_canonical`]/[`from_bytes_canonical`] wrap `parity-scale-codec`
//! (SCALE) for ordinary storage and wire round-tripping of any `Encode` +
//! `Decode` type.
//!
//! [`CanonicalEncoder`] and the [`Canonical`] trait implement a *separate*,
//! bespoke format for anything that enters a hash or signature preimage:
//! lexicographic field order by name, big-endian fixed-width integers, no
//! floats (scores are fixed-point), and length-prefixed UTF-8 strings and
//! byte strings. SCALE's little-endian, compact-integer encoding is not
//! byte-for-byte identical to this layout, so the two must not be conflated:
//! a type may implement both, but only `Canonical::canonical_bytes` output
//! may be hashed for a `*_hash`/`*_root`/signature field.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into SCALE bytes for storage or wire transport.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from SCALE bytes, failing fast on any trailing or
/// malformed input.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {e}"))
}

/// Appends fields to a byte buffer in the bespoke hash-preimage format.
///
/// Call sites are responsible for invoking the `write_*` methods in
/// lexicographic order of the Rust struct's field names — the encoder itself
/// does not (and cannot) enforce field order; it only enforces that each
/// primitive is written in its fixed binary shape.
#[derive(Debug, Default)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Creates an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    /// Writes a big-endian `u16`.
    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Writes a big-endian `u32`.
    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Writes a big-endian `u64`.
    pub fn write_u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Writes a big-endian `i64` (two's complement).
    pub fn write_i64(&mut self, v: i64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Writes a fixed-size byte array verbatim (no length prefix needed,
    /// since the reader knows the width statically — e.g. a 32-byte hash).
    pub fn write_fixed_bytes(&mut self, v: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(v);
        self
    }

    /// Writes a variable-length byte string as a `u32` big-endian length
    /// prefix followed by the bytes.
    pub fn write_bytes_lp(&mut self, v: &[u8]) -> &mut Self {
        self.write_u32(v.len() as u32);
        self.buf.extend_from_slice(v);
        self
    }

    /// Writes a UTF-8 string as a `u32` big-endian length prefix followed by
    /// its bytes.
    pub fn write_str_lp(&mut self, v: &str) -> &mut Self {
        self.write_bytes_lp(v.as_bytes())
    }

    /// Writes an ordered sequence of sub-encodable items as a `u32` count
    /// prefix followed by each item's canonical bytes in listed order.
    pub fn write_seq<T: Canonical>(&mut self, items: &[T]) -> &mut Self {
        self.write_u32(items.len() as u32);
        for item in items {
            self.write_fixed_bytes(&item.canonical_bytes());
        }
        self
    }

    /// Consumes the encoder, returning the accumulated bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Implemented by any type that can be hashed or signed: produces the
/// bespoke canonical byte form described in .
pub trait Canonical {
    /// Returns the canonical byte representation used as a hash or signature
    /// preimage.
    fn canonical_bytes(&self) -> Vec<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Encode, Decode, Debug, PartialEq, Eq)]
    struct Example {
        id: u32,
        tag: Vec<u8>,
    }

    #[test]
    fn scale_roundtrip() {
        let v = Example {
            id: 7,
            tag: vec![1, 2, 3],
        };
        let bytes = to_bytes_canonical(&v);
        let back: Example = from_bytes_canonical(&bytes).expect("decode");
        assert_eq!(v, back);
    }

    #[test]
    fn scale_decode_rejects_truncation() {
        let v = Example {
            id: 99,
            tag: vec![9; 10],
        };
        let mut bytes = to_bytes_canonical(&v);
        bytes.pop();
        let result: Result<Example, String> = from_bytes_canonical(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn canonical_encoder_is_big_endian_and_length_prefixed() {
        let mut enc = CanonicalEncoder::new();
        enc.write_u32(1).write_str_lp("ab").write_u8(0xff);
        let bytes = enc.finish();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        // length prefix for "ab" (2 bytes)
        assert_eq!(&bytes[4..8], &[0, 0, 0, 2]);
        assert_eq!(&bytes[8..10], b"ab");
        assert_eq!(bytes[10], 0xff);
    }
}

// Path: crates/cynic-merkle/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC Merkle Module
//!
//! Binary Merkle trees over the canonical byte representation of ordered
//! leaves. Odd levels duplicate their last node, Bitcoin-style, so
//! roots match bit-for-bit across independently implemented nodes.
//!
//! Leaf and branch hashes are domain-separated (a `0x00`/`0x01` prefix byte)
//! before hashing, preventing a branch hash from being replayed as a leaf
//! hash or vice versa.

use cynic_crypto::sha256;
use cynic_types::error::IntegrityError;

const LEAF_DOMAIN: u8 = 0x00;
const BRANCH_DOMAIN: u8 = 0x01;

/// The 32-byte all-zero root of an empty leaf set.
pub const EMPTY_ROOT: [u8; 32] = [0u8; 32];

fn hash_leaf(data: &[u8]) -> Result<[u8; 32], IntegrityError> {
    let mut buf = Vec::with_capacity(1 + data.len());
    buf.push(LEAF_DOMAIN);
    buf.extend_from_slice(data);
    sha256(buf)
}

fn hash_branch(left: &[u8; 32], right: &[u8; 32]) -> Result<[u8; 32], IntegrityError> {
    let mut buf = Vec::with_capacity(1 + 64);
    buf.push(BRANCH_DOMAIN);
    buf.extend_from_slice(left);
    buf.extend_from_slice(right);
    sha256(buf)
}

/// Which side of its sibling a proof step's hash occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The sibling is to the left of the node being proved.
    Left,
    /// The sibling is to the right of the node being proved.
    Right,
}

/// An inclusion proof: the sequence of sibling hashes from a leaf up to the
/// root, each tagged with which side it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionProof {
    /// `(sibling_hash, side)` pairs, ordered from the leaf's level upward.
    pub siblings: Vec<([u8; 32], Side)>,
}

/// Builds the full set of tree levels over `leaves`' canonical bytes,
/// returning `(root, levels)` where `levels[0]` is the leaf-hash level and
/// the last entry is `[root]`.
fn build_levels(leaves: &[Vec<u8>]) -> Result<Vec<Vec<[u8; 32]>>, IntegrityError> {
    if leaves.is_empty() {
        return Ok(vec![vec![]]);
    }
    let mut level: Vec<[u8; 32]> = leaves
        .iter()
        .map(|l| hash_leaf(l))
        .collect::<Result<_, _>>()?;
    let mut levels = vec![level.clone()];
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut i = 0;
        while i < level.len() {
            let left = level[i];
            let right = if i + 1 < level.len() {
                level[i + 1]
            } else {
                // Bitcoin-style odd-node duplication: pair the last node
                // with itself.
                left
            };
            next.push(hash_branch(&left, &right)?);
            i += 2;
        }
        levels.push(next.clone());
        level = next;
    }
    Ok(levels)
}

/// Builds a Merkle tree over `leaves` (their raw canonical bytes) and
/// returns the root. The root of an empty leaf set is [`EMPTY_ROOT`].
pub fn build(leaves: &[Vec<u8>]) -> Result<[u8; 32], IntegrityError> {
    if leaves.is_empty() {
        return Ok(EMPTY_ROOT);
    }
    let levels = build_levels(leaves)?;
    let top = levels.last().ok_or_else(|| {
        IntegrityError::MalformedKey("merkle tree produced no levels".to_string())
    })?;
    top.first().copied().ok_or_else(|| {
        IntegrityError::MalformedKey("merkle tree top level was empty".to_string())
    })
}

/// Builds an inclusion proof for the leaf at index `i`.
pub fn proof(leaves: &[Vec<u8>], i: usize) -> Result<InclusionProof, IntegrityError> {
    if i >= leaves.len() {
        return Err(IntegrityError::MalformedKey(format!(
            "leaf index {i} out of bounds for {} leaves",
            leaves.len()
        )));
    }
    let levels = build_levels(leaves)?;
    let mut siblings = Vec::new();
    let mut idx = i;
    for level in &levels[..levels.len().saturating_sub(1)] {
        let is_right = idx % 2 == 1;
        let sibling_idx = if is_right { idx - 1 } else { idx + 1 };
        let sibling = if sibling_idx < level.len() {
            level[sibling_idx]
        } else {
            level[idx]
        };
        let side = if is_right { Side::Left } else { Side::Right };
        siblings.push((sibling, side));
        idx /= 2;
    }
    Ok(InclusionProof { siblings })
}

/// Verifies that `leaf`'s canonical bytes, at original index `i`, include
/// under `root` via `proof`.
#[must_use]
pub fn verify(root: &[u8; 32], leaf: &[u8], proof: &InclusionProof) -> bool {
    let Ok(mut hash) = hash_leaf(leaf) else {
        return false;
    };
    for (sibling, side) in &proof.siblings {
        let combined = match side {
            Side::Left => hash_branch(sibling, &hash),
            Side::Right => hash_branch(&hash, sibling),
        };
        match combined {
            Ok(h) => hash = h,
            Err(_) => return false,
        }
    }
    &hash == root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i as u8; 4]).collect()
    }

    #[test]
    fn empty_leaf_set_has_zero_root() {
        assert_eq!(build(&[]).expect("build"), EMPTY_ROOT);
    }

    #[test]
    fn single_leaf_root_is_its_own_leaf_hash() {
        let data = vec![vec![1, 2, 3]];
        let root = build(&data).expect("build");
        let expected = hash_leaf(&data[0]).expect("hash");
        assert_eq!(root, expected);
    }

    #[test]
    fn proof_verifies_for_every_leaf_across_sizes() {
        for n in 1..12 {
            let data = leaves(n);
            let root = build(&data).expect("build");
            for i in 0..n {
                let p = proof(&data, i).expect("proof");
                assert!(verify(&root, &data[i], &p), "failed at n={n}, i={i}");
            }
        }
    }

    #[test]
    fn flipping_leaf_byte_invalidates_proof() {
        let data = leaves(5);
        let root = build(&data).expect("build");
        let p = proof(&data, 2).expect("proof");
        let mut tampered = data[2].clone();
        tampered[0] ^= 0xff;
        assert!(!verify(&root, &tampered, &p));
    }

    #[test]
    fn flipping_proof_sibling_bit_invalidates_proof() {
        let data = leaves(5);
        let root = build(&data).expect("build");
        let mut p = proof(&data, 2).expect("proof");
        if let Some((sib, _)) = p.siblings.first_mut() {
            sib[0] ^= 0xff;
        }
        assert!(!verify(&root, &data[2], &p));
    }

    #[test]
    fn odd_leaf_count_duplicates_last_node() {
        // With 3 leaves, level 0 has 3 hashes; level 1 pairs (0,1) and
        // duplicates 2 with itself.
        let data = leaves(3);
        let levels = build_levels(&data).expect("levels");
        assert_eq!(levels[0].len(), 3);
        assert_eq!(levels[1].len(), 2);
        let expected_dup = hash_branch(&levels[0][2], &levels[0][2]).expect("hash");
        assert_eq!(levels[1][1], expected_dup);
    }

    #[test]
    fn out_of_bounds_index_errors() {
        let data = leaves(3);
        assert!(proof(&data, 3).is_err());
    }
}

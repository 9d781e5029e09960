//! Merkle reduction committing a block header to its transaction list.
//!
//! Behavior:
//! - An empty list of leaves yields the all-zero hash (`Hash::zero()`).
//! - Odd layers are padded by duplicating the last node before pairing.
//! - Nodes combine as double SHA-256 over the concatenated pair; this is the
//!   scheme the header's `merkle_root` field commits to on the wire, so it
//!   must not change.

use crate::core::transaction::TransactionRef;
use crate::types::hash::Hash;

/// Utility functions to build merkle roots from hashes or transactions.
pub struct MerkleTree;

impl MerkleTree {
    fn hash_pair(left: Hash, right: Hash) -> Hash {
        let mut h = Hash::sha256d();
        h.update(left.as_slice());
        h.update(right.as_slice());
        h.finalize()
    }

    /// Computes a merkle root from the provided leaf hashes.
    ///
    /// This performs an in-place reduction; when a level has an odd number
    /// of nodes the last node is duplicated for hashing that pair.
    /// Returns the zero hash when `nodes` is empty.
    pub fn from_hashes(mut nodes: Vec<Hash>) -> Hash {
        if nodes.is_empty() {
            return Hash::zero();
        }

        let mut len = nodes.len();

        while len > 1 {
            let mut write = 0;
            let mut read = 0;

            while read < len {
                let left = nodes[read];
                let right = if read + 1 < len { nodes[read + 1] } else { left };

                nodes[write] = Self::hash_pair(left, right);

                write += 1;
                read += 2;
            }

            len = write;
        }

        nodes[0]
    }

    /// Computes a merkle root from transactions, using txids as leaves.
    ///
    /// Returns the zero hash when `txs` is empty.
    pub fn from_transactions(txs: &[TransactionRef]) -> Hash {
        if txs.is_empty() {
            return Hash::zero();
        }

        let mut nodes = Vec::with_capacity(txs.len());
        for tx in txs {
            nodes.push(tx.hash());
        }

        Self::from_hashes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::utils::{coinbase_tx, random_hash, spend_tx};

    #[test]
    fn empty_returns_zero_hash() {
        assert_eq!(MerkleTree::from_hashes(Vec::new()), Hash::zero());
    }

    #[test]
    fn single_leaf_returns_leaf() {
        let leaf = random_hash();
        assert_eq!(MerkleTree::from_hashes(vec![leaf]), leaf);
    }

    #[test]
    fn even_number_of_leaves_matches_manual_reduction() {
        let a = random_hash();
        let b = random_hash();
        let c = random_hash();
        let d = random_hash();

        let level1 = [MerkleTree::hash_pair(a, b), MerkleTree::hash_pair(c, d)];
        let expected_root = MerkleTree::hash_pair(level1[0], level1[1]);

        assert_eq!(MerkleTree::from_hashes(vec![a, b, c, d]), expected_root);
    }

    #[test]
    fn odd_number_of_leaves_duplicates_last_for_padding() {
        let a = random_hash();
        let b = random_hash();
        let c = random_hash();

        let left = MerkleTree::hash_pair(a, b);
        let right = MerkleTree::hash_pair(c, c);
        let expected_root = MerkleTree::hash_pair(left, right);

        assert_eq!(MerkleTree::from_hashes(vec![a, b, c]), expected_root);
    }

    #[test]
    fn from_transactions_uses_txids_as_leaves() {
        let txs = vec![coinbase_tx(1000), spend_tx(1001)];

        let ids: Vec<Hash> = txs.iter().map(|tx| tx.hash()).collect();
        let expected = MerkleTree::from_hashes(ids);

        assert_eq!(MerkleTree::from_transactions(&txs), expected);
    }
}

//! Double-SHA256 identifiers and byte-order helpers
//!
//! Hashes come off the wire in stored order, which is the reverse of the
//! conventional hex display. Each value is reversed once, either when it is
//! stored as an identifier or when a stored field is presented.

use sha2::{Digest, Sha256};

use crate::types::Hash;

/// SHA256(SHA256(bytes)), in stored order
pub fn double_sha256(bytes: &[u8]) -> Hash {
    let hash1 = Sha256::digest(bytes);
    let hash2 = Sha256::digest(hash1);

    let mut out = [0u8; 32];
    out.copy_from_slice(&hash2);
    out
}

/// Flip between stored and display order
pub fn reverse_hash(hash: &Hash) -> Hash {
    let mut out = *hash;
    out.reverse();
    out
}

/// Double hash of `bytes` in display order; the identifier form used for
/// blocks and transactions.
pub fn display_digest(bytes: &[u8]) -> Hash {
    reverse_hash(&double_sha256(bytes))
}

/// Hex of a display-order hash
pub fn hash_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Merkle root over display-order txids, returned in display order.
///
/// Odd levels duplicate their last node. Returns `None` for an empty list.
pub fn merkle_root(txids: &[Hash]) -> Option<Hash> {
    if txids.is_empty() {
        return None;
    }

    let mut level: Vec<Hash> = txids.iter().map(reverse_hash).collect();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = level[level.len() - 1];
            level.push(last);
        }
        level = level
            .chunks(2)
            .map(|pair| {
                let mut concat = [0u8; 64];
                concat[..32].copy_from_slice(&pair[0]);
                concat[32..].copy_from_slice(&pair[1]);
                double_sha256(&concat)
            })
            .collect();
    }

    Some(reverse_hash(&level[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_sha256_empty() {
        // sha256d("") = 5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456
        assert_eq!(
            hex::encode(double_sha256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_display_digest_is_reversed_digest() {
        let stored = double_sha256(b"block");
        let mut expected = stored;
        expected.reverse();
        assert_eq!(display_digest(b"block"), expected);
    }

    #[test]
    fn test_reverse_hash() {
        let mut hash = [0u8; 32];
        hash[0] = 0x01;
        hash[31] = 0xff;
        let reversed = reverse_hash(&hash);
        assert_eq!(reversed[0], 0xff);
        assert_eq!(reversed[31], 0x01);
        assert_eq!(reverse_hash(&reversed), hash);
    }

    #[test]
    fn test_merkle_root_single_tx_is_txid() {
        let txid = [7u8; 32];
        assert_eq!(merkle_root(&[txid]), Some(txid));
    }

    #[test]
    fn test_merkle_root_odd_count_duplicates_last() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        let c = [3u8; 32];
        assert_eq!(merkle_root(&[a, b, c]), merkle_root(&[a, b, c, c]));
    }

    #[test]
    fn test_merkle_root_pair_hashes_stored_concat() {
        let a = display_digest(b"a");
        let b = display_digest(b"b");
        let mut concat = reverse_hash(&a).to_vec();
        concat.extend_from_slice(&reverse_hash(&b));
        assert_eq!(merkle_root(&[a, b]), Some(display_digest(&concat)));
    }

    #[test]
    fn test_merkle_root_empty() {
        assert_eq!(merkle_root(&[]), None);
    }
}

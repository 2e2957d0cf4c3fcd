//! Decoded block file records

use serde::{Deserialize, Serialize};

use crate::constants::COINBASE_PREVOUT_INDEX;
use crate::hash::reverse_hash;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Reference to an output of an earlier transaction.
///
/// `hash` is kept in stored byte order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    /// Sequence number, kept opaque as stored
    pub sequence: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Value in satoshis
    pub value: u64,
    pub script_pubkey: ByteString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction id in display order, derived from the source bytes
    pub txid: Hash,
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Transaction {
    /// A coinbase has exactly one input spending the null outpoint
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1
            && self.inputs[0].prevout.hash == [0u8; 32]
            && self.inputs[0].prevout.index == COINBASE_PREVOUT_INDEX
    }

    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().fold(0u64, |acc, o| acc.saturating_add(o.value))
    }
}

/// Block header with hash fields in stored byte order, so that
/// re-serializing it reproduces the 80 bytes the block hash covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_block_hash: Hash,
    pub merkle_root: Hash,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub fn prev_block_hash_display(&self) -> Hash {
        reverse_hash(&self.prev_block_hash)
    }

    pub fn merkle_root_display(&self) -> Hash {
        reverse_hash(&self.merkle_root)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block hash in display order
    pub hash: Hash,
    /// Size as declared in the file; advisory only
    pub size: u32,
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the merkle root over the decoded txids equals the header's
    pub fn merkle_root_matches(&self) -> bool {
        let txids: Vec<Hash> = self.transactions.iter().map(|tx| tx.txid).collect();
        match crate::hash::merkle_root(&txids) {
            Some(root) => root == self.header.merkle_root_display(),
            None => false,
        }
    }
}

//! Shared block builders for integration tests

#![allow(dead_code)]

use blk_decoder::hash::double_sha256;
use blk_decoder::serialize::{frame_block, serialize_header};
use blk_decoder::types::*;
use blk_decoder::MAINNET_MARKER;

pub const GENESIS_HASH: &str = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";
pub const GENESIS_TXID: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";

pub const GENESIS_HEADER_HEX: &str = "0100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a29ab5f49ffff001d1dac2b7c";

pub const GENESIS_COINBASE_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";

/// Marker, declared size and the genesis block, as stored in blk00000.dat
pub fn genesis_record() -> Vec<u8> {
    let mut body = hex::decode(GENESIS_HEADER_HEX).unwrap();
    body.push(0x01);
    body.extend(hex::decode(GENESIS_COINBASE_HEX).unwrap());

    let mut record = MAINNET_MARKER.to_vec();
    record.extend_from_slice(&(body.len() as u32).to_le_bytes());
    record.extend(body);
    record
}

pub fn header(prev_block_hash: Hash, timestamp: u32) -> BlockHeader {
    BlockHeader {
        version: 1,
        prev_block_hash,
        merkle_root: [0x5a; 32],
        timestamp,
        bits: 0x1d00ffff,
        nonce: timestamp.wrapping_mul(31),
    }
}

pub fn payout(value: u64) -> Transaction {
    Transaction {
        txid: [0; 32],
        version: 1,
        inputs: vec![],
        outputs: vec![TransactionOutput {
            value,
            script_pubkey: vec![0x51],
        }],
        lock_time: 0,
    }
}

pub fn spend(prev: Hash, index: u32, script_len: usize, outputs: usize) -> Transaction {
    Transaction {
        txid: [0; 32],
        version: 2,
        inputs: vec![TransactionInput {
            prevout: OutPoint { hash: prev, index },
            script_sig: vec![0x47; script_len],
            sequence: [0xfe, 0xff, 0xff, 0xff],
        }],
        outputs: (0..outputs)
            .map(|i| TransactionOutput {
                value: 1_000 * (i as u64 + 1),
                script_pubkey: vec![0x76, 0xa9, 0x14, i as u8],
            })
            .collect(),
        lock_time: 500_000,
    }
}

pub fn block(header: BlockHeader, transactions: Vec<Transaction>) -> Block {
    Block {
        hash: [0; 32],
        size: 0,
        header,
        transactions,
    }
}

/// Stored-order hash of a block's header, as a successor's prev hash
pub fn stored_hash(block: &Block) -> Hash {
    double_sha256(&serialize_header(&block.header))
}

pub fn file_of(blocks: &[&Block]) -> Vec<u8> {
    blocks
        .iter()
        .flat_map(|b| frame_block(MAINNET_MARKER, b))
        .collect()
}

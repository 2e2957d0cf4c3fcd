//! Wire-format encoding of decoded records
//!
//! The inverse of the decoders. Derived fields (`Block::hash`,
//! `Transaction::txid`) are not written; `Block::size` is recomputed from
//! the encoded body.

use crate::constants::MARKER_SIZE;
use crate::types::*;
use crate::varint::encode_varint;

/// Serialize block header to its 80 stored bytes
pub fn serialize_header(header: &BlockHeader) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(80);

    bytes.extend_from_slice(&header.version.to_le_bytes());
    bytes.extend_from_slice(&header.prev_block_hash);
    bytes.extend_from_slice(&header.merkle_root);
    bytes.extend_from_slice(&header.timestamp.to_le_bytes());
    bytes.extend_from_slice(&header.bits.to_le_bytes());
    bytes.extend_from_slice(&header.nonce.to_le_bytes());

    bytes
}

/// Serialize a transaction in legacy wire form; hashing the result gives
/// its stored-order txid
pub fn serialize_transaction(tx: &Transaction) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(&tx.version.to_le_bytes());

    bytes.extend(encode_varint(tx.inputs.len() as u64));
    for input in &tx.inputs {
        bytes.extend_from_slice(&input.prevout.hash);
        bytes.extend_from_slice(&input.prevout.index.to_le_bytes());
        bytes.extend(encode_varint(input.script_sig.len() as u64));
        bytes.extend_from_slice(&input.script_sig);
        bytes.extend_from_slice(&input.sequence);
    }

    bytes.extend(encode_varint(tx.outputs.len() as u64));
    for output in &tx.outputs {
        bytes.extend_from_slice(&output.value.to_le_bytes());
        bytes.extend(encode_varint(output.script_pubkey.len() as u64));
        bytes.extend_from_slice(&output.script_pubkey);
    }

    bytes.extend_from_slice(&tx.lock_time.to_le_bytes());
    bytes
}

/// Declared size, header, transaction count and transactions
pub fn serialize_block(block: &Block) -> Vec<u8> {
    let mut body = serialize_header(&block.header);
    body.extend(encode_varint(block.transactions.len() as u64));
    for tx in &block.transactions {
        body.extend(serialize_transaction(tx));
    }

    let mut bytes = Vec::with_capacity(4 + body.len());
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend(body);
    bytes
}

/// A full file record: marker followed by the serialized block
pub fn frame_block(marker: [u8; MARKER_SIZE], block: &Block) -> Vec<u8> {
    let mut bytes = marker.to_vec();
    bytes.extend(serialize_block(block));
    bytes
}

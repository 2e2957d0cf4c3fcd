//! Block decoding

use log::{debug, warn};

use crate::constants::*;
use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::hash::display_digest;
use crate::transaction::decode_transaction;
use crate::types::*;

/// DecodeBlock: candidate range → block
///
/// `bytes` starts at the declared-size field that follows a marker:
/// 1. declared size (4), kept but not trusted
/// 2. header (80); the block hash is the double hash of these 80 bytes
/// 3. transaction count (varint), then that many transactions back to back
///
/// Bytes left after the last transaction are ignored. Any failure is
/// reported as `MalformedBlock` at `offset`, the range's position in the
/// file.
pub fn decode_block(bytes: &[u8], offset: usize) -> Result<Block> {
    decode_block_body(bytes).map_err(|e| DecodeError::MalformedBlock {
        offset,
        source: Box::new(e),
    })
}

fn decode_block_body(bytes: &[u8]) -> Result<Block> {
    let mut cursor = Cursor::new(bytes);

    let size = cursor.read_u32_le()?;
    let (header, hash) = decode_header(&mut cursor)?;

    let tx_count = cursor.read_count("transaction count", MIN_TRANSACTION_SIZE)?;
    let mut transactions = Vec::with_capacity(tx_count as usize);
    for index in 0..tx_count as usize {
        transactions.push(decode_transaction(&mut cursor, index)?);
    }

    let body_len = cursor.position() - SIZE_FIELD_SIZE;
    if body_len != size as usize {
        warn!(
            "block {} declares {} bytes but decoded {}",
            hex::encode(hash),
            size,
            body_len
        );
    }
    if !cursor.is_empty() {
        debug!("block {} leaves {} trailing bytes", hex::encode(hash), cursor.remaining());
    }

    Ok(Block {
        hash,
        size,
        header,
        transactions,
    })
}

/// Read the 80-byte header, returning it with its display-order hash
pub fn decode_header(cursor: &mut Cursor<'_>) -> Result<(BlockHeader, Hash)> {
    if cursor.remaining() < HEADER_SIZE {
        return Err(DecodeError::TruncatedInput {
            offset: cursor.position(),
            needed: HEADER_SIZE as u64,
            remaining: cursor.remaining(),
        });
    }

    let start = cursor.position();
    let header = BlockHeader {
        version: cursor.read_u32_le()?,
        prev_block_hash: cursor.read_hash()?,
        merkle_root: cursor.read_hash()?,
        timestamp: cursor.read_u32_le()?,
        bits: cursor.read_u32_le()?,
        nonce: cursor.read_u32_le()?,
    };
    let hash = display_digest(cursor.consumed_since(start));

    Ok((header, hash))
}

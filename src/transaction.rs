//! Transaction decoding

use crate::constants::*;
use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::hash::display_digest;
use crate::types::*;

/// DecodeTransaction: cursor → transaction
///
/// Layout, all integers little-endian:
/// 1. version (4)
/// 2. input count (varint), then per input: prev txid (32), prev index (4),
///    script length (varint), script, sequence (4)
/// 3. output count (varint), then per output: value (8), script length
///    (varint), script
/// 4. lock time (4)
///
/// The txid is the double hash of exactly the bytes from version through
/// lock time as they appear in the source. On failure the error is wrapped
/// in `MalformedTransaction` carrying `index` and the start offset.
pub fn decode_transaction(cursor: &mut Cursor<'_>, index: usize) -> Result<Transaction> {
    let start = cursor.position();
    decode_transaction_body(cursor, start).map_err(|e| DecodeError::MalformedTransaction {
        index,
        offset: start,
        source: Box::new(e),
    })
}

fn decode_transaction_body(cursor: &mut Cursor<'_>, start: usize) -> Result<Transaction> {
    let version = cursor.read_u32_le()?;

    let input_count = cursor.read_count("input count", MIN_INPUT_SIZE)?;
    let mut inputs = Vec::with_capacity(input_count as usize);
    for _ in 0..input_count {
        inputs.push(decode_input(cursor)?);
    }

    let output_count = cursor.read_count("output count", MIN_OUTPUT_SIZE)?;
    let mut outputs = Vec::with_capacity(output_count as usize);
    for _ in 0..output_count {
        outputs.push(decode_output(cursor)?);
    }

    let lock_time = cursor.read_u32_le()?;

    Ok(Transaction {
        txid: display_digest(cursor.consumed_since(start)),
        version,
        inputs,
        outputs,
        lock_time,
    })
}

fn decode_input(cursor: &mut Cursor<'_>) -> Result<TransactionInput> {
    let hash = cursor.read_hash()?;
    let index = cursor.read_u32_le()?;
    let script_sig = cursor.read_var_bytes("input script length")?.to_vec();
    let sequence = cursor.read_array::<4>()?;

    Ok(TransactionInput {
        prevout: OutPoint { hash, index },
        script_sig,
        sequence,
    })
}

fn decode_output(cursor: &mut Cursor<'_>) -> Result<TransactionOutput> {
    let value = cursor.read_u64_le()?;
    let script_pubkey = cursor.read_var_bytes("output script length")?.to_vec();

    Ok(TransactionOutput { value, script_pubkey })
}

//! Re-encoded blocks decode back to the same field values

mod common;

use blk_decoder::block::decode_block;
use blk_decoder::hash::display_digest;
use blk_decoder::serialize::{serialize_block, serialize_header, serialize_transaction};
use common::*;

#[test]
fn test_block_with_many_transactions_round_trips() {
    let mut transactions = vec![payout(5_000_000_000)];
    for i in 0..40u8 {
        transactions.push(spend([i; 32], i as u32, (i as usize) * 9, (i % 4) as usize));
    }
    let original = block(header([0x42; 32], 1_231_469_665), transactions);

    let bytes = serialize_block(&original);
    let decoded = decode_block(&bytes, 0).unwrap();

    assert_eq!(decoded.header, original.header);
    assert_eq!(decoded.hash, display_digest(&serialize_header(&original.header)));
    assert_eq!(decoded.size as usize, bytes.len() - 4);
    assert_eq!(decoded.transactions.len(), original.transactions.len());

    for (got, want) in decoded.transactions.iter().zip(&original.transactions) {
        assert_eq!(got.version, want.version);
        assert_eq!(got.inputs, want.inputs);
        assert_eq!(got.outputs, want.outputs);
        assert_eq!(got.lock_time, want.lock_time);
        assert_eq!(got.txid, display_digest(&serialize_transaction(want)));
    }
}

#[test]
fn test_long_script_uses_wide_length_prefix() {
    let original = block(header([0; 32], 7), vec![spend([1; 32], 0, 70_000, 1)]);
    let bytes = serialize_block(&original);
    let decoded = decode_block(&bytes, 0).unwrap();

    assert_eq!(decoded.transactions[0].inputs[0].script_sig.len(), 70_000);
}

#[test]
fn test_reserialized_decoded_block_is_identical() {
    let original = block(header([9; 32], 99), vec![payout(1), spend([2; 32], 5, 33, 2)]);
    let bytes = serialize_block(&original);
    let decoded = decode_block(&bytes, 0).unwrap();

    assert_eq!(serialize_block(&decoded), bytes);
}

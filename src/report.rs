//! Presentation of decoded blocks
//!
//! Views hold every field as it is shown: hashes in display order hex,
//! scripts and sequence numbers as hex of the stored bytes.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::chain::OrderedChain;
use crate::hash::{hash_hex, reverse_hash};
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub prev_tx_hash: String,
    pub prev_out_index: u32,
    pub script_length: usize,
    pub script: String,
    pub sequence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputView {
    pub value: u64,
    pub script_length: usize,
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    pub hash: String,
    pub version: u32,
    pub coinbase: bool,
    pub input_count: usize,
    pub inputs: Vec<InputView>,
    pub output_count: usize,
    pub outputs: Vec<OutputView>,
    pub lock_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockView {
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    pub size: u32,
    pub version: u32,
    pub prev_block_hash: String,
    pub merkle_root: String,
    pub timestamp: u32,
    pub bits: u32,
    pub nonce: u32,
    pub transaction_count: usize,
    pub transactions: Vec<TransactionView>,
}

impl From<&TransactionInput> for InputView {
    fn from(input: &TransactionInput) -> Self {
        Self {
            prev_tx_hash: hash_hex(&reverse_hash(&input.prevout.hash)),
            prev_out_index: input.prevout.index,
            script_length: input.script_sig.len(),
            script: hex::encode(&input.script_sig),
            sequence: hex::encode(input.sequence),
        }
    }
}

impl From<&TransactionOutput> for OutputView {
    fn from(output: &TransactionOutput) -> Self {
        Self {
            value: output.value,
            script_length: output.script_pubkey.len(),
            script: hex::encode(&output.script_pubkey),
        }
    }
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            hash: hash_hex(&tx.txid),
            version: tx.version,
            coinbase: tx.is_coinbase(),
            input_count: tx.inputs.len(),
            inputs: tx.inputs.iter().map(InputView::from).collect(),
            output_count: tx.outputs.len(),
            outputs: tx.outputs.iter().map(OutputView::from).collect(),
            lock_time: tx.lock_time,
        }
    }
}

impl BlockView {
    pub fn new(block: &Block, height: Option<u64>) -> Self {
        Self {
            hash: hash_hex(&block.hash),
            height,
            size: block.size,
            version: block.header.version,
            prev_block_hash: hash_hex(&block.header.prev_block_hash_display()),
            merkle_root: hash_hex(&block.header.merkle_root_display()),
            timestamp: block.header.timestamp,
            bits: block.header.bits,
            nonce: block.header.nonce,
            transaction_count: block.transactions.len(),
            transactions: block.transactions.iter().map(TransactionView::from).collect(),
        }
    }
}

pub fn chain_views(chain: &OrderedChain) -> Vec<BlockView> {
    chain
        .blocks
        .iter()
        .zip(&chain.heights)
        .map(|(block, &height)| BlockView::new(block, Some(height)))
        .collect()
}

/// One field per line, blocks in the given order
pub fn render_text(views: &[BlockView]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    views.iter().try_for_each(|view| write_block(&mut out, view))?;
    Ok(out)
}

pub fn render_json(views: &[BlockView]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(views)
}

fn write_block(out: &mut String, b: &BlockView) -> fmt::Result {
    writeln!(out, "Block {}", b.hash)?;
    if let Some(height) = b.height {
        writeln!(out, "Height {}", height)?;
    }
    writeln!(out, "Size {}", b.size)?;
    writeln!(out, "Version {}", b.version)?;
    writeln!(out, "Previous Block Hash {}", b.prev_block_hash)?;
    writeln!(out, "Merkle Root {}", b.merkle_root)?;
    writeln!(out, "Timestamp {}", b.timestamp)?;
    writeln!(out, "Bits {}", b.bits)?;
    writeln!(out, "Nonce {}", b.nonce)?;
    writeln!(out, "Transaction Count {}", b.transaction_count)?;
    for tx in &b.transactions {
        writeln!(out, "Hash {}", tx.hash)?;
        writeln!(out, "Version {}", tx.version)?;
        writeln!(out, "Input Counter {}", tx.input_count)?;
        for input in &tx.inputs {
            writeln!(out, "Prev Tx Hash {}", input.prev_tx_hash)?;
            writeln!(out, "Prev Tx Out Index {}", input.prev_out_index)?;
            writeln!(out, "Script Length {}", input.script_length)?;
            writeln!(out, "Script {}", input.script)?;
            writeln!(out, "Sequence {}", input.sequence)?;
        }
        writeln!(out, "Output Counter {}", tx.output_count)?;
        for output in &tx.outputs {
            writeln!(out, "Value {}", output.value)?;
            writeln!(out, "Script Length {}", output.script_length)?;
            writeln!(out, "Script {}", output.script)?;
        }
        writeln!(out, "Lock Time {}", tx.lock_time)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        let mut prev = [0u8; 32];
        prev[0] = 0xaa;
        Block {
            hash: [0x0b; 32],
            size: 99,
            header: BlockHeader {
                version: 1,
                prev_block_hash: prev,
                merkle_root: [0; 32],
                timestamp: 1231006505,
                bits: 486604799,
                nonce: 7,
            },
            transactions: vec![Transaction {
                txid: [0x0c; 32],
                version: 1,
                inputs: vec![TransactionInput {
                    prevout: OutPoint { hash: prev, index: 3 },
                    script_sig: vec![0x51, 0x52],
                    sequence: [0xff; 4],
                }],
                outputs: vec![TransactionOutput {
                    value: 5_000_000_000,
                    script_pubkey: vec![0xac],
                }],
                lock_time: 0,
            }],
        }
    }

    #[test]
    fn test_view_reverses_stored_hashes_once() {
        let view = BlockView::new(&sample_block(), None);
        assert!(view.prev_block_hash.ends_with("aa"));
        assert!(view.transactions[0].inputs[0].prev_tx_hash.ends_with("aa"));
        assert_eq!(view.hash, "0b".repeat(32));
    }

    #[test]
    fn test_render_text_lists_fields() {
        let text = render_text(&[BlockView::new(&sample_block(), Some(4))]).unwrap();
        assert!(text.starts_with(&format!("Block {}\n", "0b".repeat(32))));
        assert!(text.contains("Height 4\n"));
        assert!(text.contains("Transaction Count 1\n"));
        assert!(text.contains("Script 5152\n"));
        assert!(text.contains("Sequence ffffffff\n"));
        assert!(text.contains("Value 5000000000\n"));
        assert!(text.contains("Lock Time 0\n"));
    }

    #[test]
    fn test_render_text_keeps_block_order() {
        let mut second = sample_block();
        second.hash = [0x0d; 32];
        let views = [
            BlockView::new(&sample_block(), Some(0)),
            BlockView::new(&second, Some(1)),
        ];
        let text = render_text(&views).unwrap();
        let first_at = text.find(&"0b".repeat(32)).unwrap();
        let second_at = text.find(&"0d".repeat(32)).unwrap();
        assert!(first_at < second_at);
        assert!(render_text(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[BlockView::new(&sample_block(), None)]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["transactions"][0]["outputs"][0]["value"], 5_000_000_000u64);
        assert!(parsed[0].get("height").is_none());
    }
}

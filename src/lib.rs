//! # blk-decoder
//!
//! Decoding of raw block files: a buffer of marker-delimited, Bitcoin wire
//! format blocks in arbitrary order.
//!
//! ## Pipeline
//!
//! - `splitter`: finds candidate block ranges in the buffer
//! - `block`: parses size, 80-byte header and transaction count
//! - `transaction`: parses inputs, outputs and lock time, deriving the txid
//! - `varint` / `cursor`: compact-size integers and bounds-checked reads
//! - `hash`: double SHA-256 identifiers and byte-order reversal
//! - `chain`: restores chain order from previous-block-hash linkage
//!
//! Decoding is a pure function of the input buffer. A malformed block is
//! reported and skipped unless `DecoderConfig::strict` is set.
//!
//! ## Usage
//!
//! ```rust
//! use blk_decoder::BlockFileDecoder;
//! use blk_decoder::serialize::frame_block;
//! use blk_decoder::types::*;
//! use blk_decoder::MAINNET_MARKER;
//!
//! let block = Block {
//!     hash: [0; 32],
//!     size: 0,
//!     header: BlockHeader {
//!         version: 1,
//!         prev_block_hash: [0; 32],
//!         merkle_root: [0; 32],
//!         timestamp: 1231006505,
//!         bits: 0x1d00ffff,
//!         nonce: 2083236893,
//!     },
//!     transactions: vec![Transaction {
//!         txid: [0; 32],
//!         version: 1,
//!         inputs: vec![],
//!         outputs: vec![TransactionOutput {
//!             value: 5000000000,
//!             script_pubkey: vec![0x51],
//!         }],
//!         lock_time: 0,
//!     }],
//! };
//!
//! let file = frame_block(MAINNET_MARKER, &block);
//! let decoded = BlockFileDecoder::new().decode_and_order(&file).unwrap();
//! assert_eq!(decoded.chain.len(), 1);
//! assert_eq!(decoded.chain.blocks[0].transactions[0].outputs[0].value, 5000000000);
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod cursor;
pub mod varint;
pub mod hash;
pub mod splitter;
pub mod transaction;
pub mod block;
pub mod chain;
pub mod serialize;
pub mod config;
pub mod report;

use std::ops::Range;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{DecodeError, Result};
pub use chain::OrderedChain;
pub use config::{DecoderConfig, Framing, OrderingPolicy};

/// A candidate range that failed to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFailure {
    /// Position among the candidates
    pub index: usize,
    /// Start of the candidate in the buffer
    pub offset: usize,
    /// Why the candidate was rejected, usually a `MalformedBlock` wrapping
    /// the failure that `DecodeError::root_cause` reaches
    pub error: DecodeError,
}

/// Blocks in file order plus the candidates that were skipped
#[derive(Debug, Clone, Default)]
pub struct DecodedFile {
    pub blocks: Vec<Block>,
    pub failures: Vec<BlockFailure>,
}

/// Blocks in chain order plus the candidates that were skipped
#[derive(Debug, Clone, Default)]
pub struct DecodedChain {
    pub chain: OrderedChain,
    pub failures: Vec<BlockFailure>,
}

/// Entry point tying splitting, decoding and ordering together
///
/// # Examples
///
/// ```
/// use blk_decoder::{BlockFileDecoder, DecoderConfig, Framing};
///
/// let decoder = BlockFileDecoder::with_config(
///     DecoderConfig::new().with_framing(Framing::SizePrefixed),
/// );
/// let decoded = decoder.decode_blocks(&[]).unwrap();
/// assert!(decoded.blocks.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockFileDecoder {
    config: DecoderConfig,
}

impl BlockFileDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Candidate block ranges under the configured framing
    pub fn split(&self, buf: &[u8]) -> Vec<Range<usize>> {
        splitter::split_blocks(buf, self.config.framing)
    }

    /// Decode every candidate in file order.
    ///
    /// Fails only in strict mode, with the first malformed candidate's error.
    pub fn decode_blocks(&self, buf: &[u8]) -> Result<DecodedFile> {
        let ranges = self.split(buf);
        let results = decode_ranges(buf, &ranges);

        let mut decoded = DecodedFile::default();
        for (index, (range, result)) in ranges.iter().zip(results).enumerate() {
            match result {
                Ok(block) => decoded.blocks.push(block),
                Err(error) if self.config.strict => return Err(error),
                Err(error) => {
                    warn!("skipping candidate {}: {}", index, error);
                    decoded.failures.push(BlockFailure {
                        index,
                        offset: range.start,
                        error,
                    });
                }
            }
        }

        info!(
            "decoded {} of {} candidate blocks from {} bytes",
            decoded.blocks.len(),
            ranges.len(),
            buf.len()
        );
        Ok(decoded)
    }

    /// Put decoded blocks in chain order under the configured policy
    pub fn order(&self, blocks: Vec<Block>) -> OrderedChain {
        chain::order_blocks(blocks, self.config.ordering)
    }

    pub fn decode_and_order(&self, buf: &[u8]) -> Result<DecodedChain> {
        let decoded = self.decode_blocks(buf)?;
        Ok(DecodedChain {
            chain: self.order(decoded.blocks),
            failures: decoded.failures,
        })
    }
}

#[cfg(not(feature = "parallel"))]
fn decode_ranges(buf: &[u8], ranges: &[Range<usize>]) -> Vec<Result<Block>> {
    ranges
        .iter()
        .map(|r| block::decode_block(&buf[r.clone()], r.start))
        .collect()
}

// Candidates share the buffer read-only; collect keeps candidate order
#[cfg(feature = "parallel")]
fn decode_ranges(buf: &[u8], ranges: &[Range<usize>]) -> Vec<Result<Block>> {
    ranges
        .par_iter()
        .map(|r| block::decode_block(&buf[r.clone()], r.start))
        .collect()
}

//! Error types for block file decoding

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated input: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: u64,
        remaining: usize,
    },

    #[error("Declared {field} of {count} at offset {offset} does not fit in {remaining} remaining bytes")]
    CountOutOfRange {
        field: &'static str,
        count: u64,
        offset: usize,
        remaining: usize,
    },

    #[error("Malformed transaction {index} at offset {offset}: {source}")]
    MalformedTransaction {
        index: usize,
        offset: usize,
        source: Box<DecodeError>,
    },

    #[error("Malformed block at offset {offset}: {source}")]
    MalformedBlock {
        offset: usize,
        source: Box<DecodeError>,
    },

    #[error("Ambiguous ordering: blocks {first} and {second} share timestamp {timestamp} with no linkage between them")]
    AmbiguousOrdering {
        first: String,
        second: String,
        timestamp: u32,
    },
}

impl DecodeError {
    /// Innermost error, unwrapping `MalformedBlock`/`MalformedTransaction` layers
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::MalformedTransaction { source, .. }
            | DecodeError::MalformedBlock { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

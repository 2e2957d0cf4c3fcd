//! Wire-format constants for raw block files

/// Length of the marker that precedes each block record
pub const MARKER_SIZE: usize = 4;

/// Mainnet network magic as it appears on disk
pub const MAINNET_MARKER: [u8; 4] = [0xf9, 0xbe, 0xb4, 0xd9];

/// Testnet3 network magic as it appears on disk
pub const TESTNET_MARKER: [u8; 4] = [0x0b, 0x11, 0x09, 0x07];

/// Length of the declared-size field that follows the marker
pub const SIZE_FIELD_SIZE: usize = 4;

/// Serialized block header: version, prev hash, merkle root, time, bits, nonce
pub const HEADER_SIZE: usize = 80;

/// Hash length
pub const HASH_SIZE: usize = 32;

/// Varint prefix for a 2-byte payload
pub const VARINT_U16_PREFIX: u8 = 0xfd;

/// Varint prefix for a 4-byte payload
pub const VARINT_U32_PREFIX: u8 = 0xfe;

/// Varint prefix for an 8-byte payload
pub const VARINT_U64_PREFIX: u8 = 0xff;

/// Smallest possible input: prevout (36) + empty script varint (1) + sequence (4)
pub const MIN_INPUT_SIZE: usize = 41;

/// Smallest possible output: value (8) + empty script varint (1)
pub const MIN_OUTPUT_SIZE: usize = 9;

/// Smallest possible transaction: version + two zero counts + lock time
pub const MIN_TRANSACTION_SIZE: usize = 10;

/// Previous-output index used by coinbase inputs
pub const COINBASE_PREVOUT_INDEX: u32 = 0xffffffff;

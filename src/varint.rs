//! Compact-size integers
//!
//! | first byte  | width | value            |
//! |-------------|-------|------------------|
//! | 0x00..=0xfc | 1     | the byte itself  |
//! | 0xfd        | 3     | next 2 bytes LE  |
//! | 0xfe        | 5     | next 4 bytes LE  |
//! | 0xff        | 9     | next 8 bytes LE  |
//!
//! Non-minimal encodings are accepted on decode.

use crate::constants::*;
use crate::error::{DecodeError, Result};

/// Decode a compact-size integer from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed. `offset` is only
/// used to locate the field in error reports.
pub fn decode_varint(bytes: &[u8], offset: usize) -> Result<(u64, usize)> {
    let first = *bytes.first().ok_or(DecodeError::TruncatedInput {
        offset,
        needed: 1,
        remaining: 0,
    })?;

    let width = match first {
        VARINT_U16_PREFIX => 3,
        VARINT_U32_PREFIX => 5,
        VARINT_U64_PREFIX => 9,
        _ => return Ok((first as u64, 1)),
    };

    if bytes.len() < width {
        return Err(DecodeError::TruncatedInput {
            offset,
            needed: width as u64,
            remaining: bytes.len(),
        });
    }

    let mut payload = [0u8; 8];
    payload[..width - 1].copy_from_slice(&bytes[1..width]);
    Ok((u64::from_le_bytes(payload), width))
}

/// Number of bytes the minimal encoding of `value` occupies
pub fn varint_size(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Minimal compact-size encoding of `value`
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(varint_size(value));
    match varint_size(value) {
        1 => out.push(value as u8),
        3 => {
            out.push(VARINT_U16_PREFIX);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        5 => {
            out.push(VARINT_U32_PREFIX);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(VARINT_U64_PREFIX);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
    out
}

//! Bounds-checked read cursor over a borrowed byte range

use crate::constants::HASH_SIZE;
use crate::error::{DecodeError, Result};
use crate::types::Hash;
use crate::varint::decode_varint;

/// Read position over a byte slice.
///
/// Every read either advances past exactly the bytes it returns or fails
/// with `TruncatedInput` and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes between `start` and the current position
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::TruncatedInput {
                offset: self.pos,
                needed: len as u64,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_hash(&mut self) -> Result<Hash> {
        self.read_array::<HASH_SIZE>()
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let (value, width) = decode_varint(&self.data[self.pos..], self.pos)?;
        self.pos += width;
        Ok(value)
    }

    /// Read a varint length and then that many bytes
    pub fn read_var_bytes(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        if len > self.remaining() as u64 {
            return Err(DecodeError::CountOutOfRange {
                field,
                count: len,
                offset: self.pos,
                remaining: self.remaining(),
            });
        }
        self.read_bytes(len as usize)
    }

    /// Read a varint count, rejecting it when `count * min_item_size`
    /// cannot fit in what is left.
    pub fn read_count(&mut self, field: &'static str, min_item_size: usize) -> Result<u64> {
        let count = self.read_varint()?;
        let capacity = (self.remaining() / min_item_size.max(1)) as u64;
        if count > capacity {
            return Err(DecodeError::CountOutOfRange {
                field,
                count,
                offset: self.pos,
                remaining: self.remaining(),
            });
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads_advance() {
        let data = [1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u32_le().unwrap(), 1);
        assert_eq!(cursor.read_u64_le().unwrap(), 2);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_failed_read_keeps_position() {
        let data = [0xaa; 3];
        let mut cursor = Cursor::new(&data);
        let err = cursor.read_u32_le().unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { offset: 0, needed: 4, remaining: 3 }));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_var_bytes_length_past_end() {
        let data = [0x05, 0x01, 0x02];
        let mut cursor = Cursor::new(&data);
        let err = cursor.read_var_bytes("script length").unwrap_err();
        assert!(matches!(err, DecodeError::CountOutOfRange { count: 5, remaining: 2, .. }));
    }

    #[test]
    fn test_count_rejects_impossible_counts() {
        // claims 0xffff inputs with 2 bytes left
        let data = [0xfd, 0xff, 0xff, 0x00, 0x00];
        let mut cursor = Cursor::new(&data);
        assert!(cursor.read_count("input count", 41).is_err());
    }

    #[test]
    fn test_consumed_since() {
        let data = [9, 8, 7, 6];
        let mut cursor = Cursor::new(&data);
        cursor.read_bytes(1).unwrap();
        let start = cursor.position();
        cursor.read_bytes(2).unwrap();
        assert_eq!(cursor.consumed_since(start), &[8, 7]);
    }
}

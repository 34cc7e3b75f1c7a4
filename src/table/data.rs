//! Bounds-checked typed views over block bytes.

use crate::codec::read_var_be;
use crate::{Error, Result};

/// Read-only typed accessor over a block's bytes.
///
/// Every read is checked against [`BlockData::size`]; reading outside the
/// view fails with `InvalidArgument` instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct BlockData<'a> {
    bytes: &'a [u8],
}

impl<'a> BlockData<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Number of bytes in the view.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Read one unsigned byte.
    pub fn get_unsigned_byte(&self, offset: usize) -> Result<u8> {
        self.bytes.get(offset).copied().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "byte offset {offset} out of bounds (size {})",
                self.bytes.len()
            ))
        })
    }

    /// Read a big-endian 32-bit integer.
    pub fn get_int(&self, offset: usize) -> Result<u32> {
        Ok(read_var_be(self.bytes, offset, 4)? as u32)
    }

    /// Read a big-endian integer of `size` bytes (0..=8).
    pub fn get_var_byte_value(&self, offset: usize, size: usize) -> Result<u64> {
        read_var_be(self.bytes, offset, size)
    }
}

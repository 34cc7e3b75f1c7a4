//! Fixed-width big-endian integer codec.
//!
//! Values are written most significant byte first using exactly `size`
//! bytes. Both entry values in shared data and range records in suffix
//! table blocks go through these two functions.

use crate::{Error, Result};

/// Largest value representable in `size` bytes.
pub fn max_value_for_size(size: usize) -> u64 {
    match size {
        0 => 0,
        s if s >= 8 => u64::MAX,
        _ => (1u64 << (8 * size)) - 1,
    }
}

/// Append `value` to `buf` as a `size`-byte big-endian integer.
pub fn write_var_be(buf: &mut Vec<u8>, size: usize, value: u64) -> Result<()> {
    if size > 8 {
        return Err(Error::InvalidArgument(format!(
            "value size {size} exceeds 8 bytes"
        )));
    }
    if value > max_value_for_size(size) {
        return Err(Error::InvalidArgument(format!(
            "value {value} does not fit in {size} bytes"
        )));
    }
    buf.extend_from_slice(&value.to_be_bytes()[8 - size..]);
    Ok(())
}

/// Read a `size`-byte big-endian integer at `offset`.
///
/// Fails with `InvalidArgument` if the read would leave `bytes`.
pub fn read_var_be(bytes: &[u8], offset: usize, size: usize) -> Result<u64> {
    if size > 8 {
        return Err(Error::InvalidArgument(format!(
            "value size {size} exceeds 8 bytes"
        )));
    }
    let end = offset
        .checked_add(size)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "read of {size} bytes at offset {offset} exceeds length {}",
                bytes.len()
            ))
        })?;

    // High bytes first.
    let value = bytes[offset..end]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | *b as u64);
    Ok(value)
}

//! Per-table shared data: the table prefix and the entry values of its
//! ranges.
//!
//! ```text
//! table_prefix u32 | [value_count u32 | value * value_count]
//! ```
//!
//! The value section is present only when the format stores entry values
//! and the table has at least one. A table whose ranges all carry the same
//! value stores it once with `value_count == 1`.

use super::format::FileFormat;
use crate::codec::write_var_be;
use crate::table::BlockData;
use crate::{Error, Result};

const PREFIX_SIZE: usize = 4;
const VALUES_OFFSET: usize = PREFIX_SIZE + 4;

/// Decoded view of a suffix table's shared data.
#[derive(Debug, Clone, Copy)]
pub struct SuffixTableSharedData<'a> {
    table_prefix: u32,
    entry_value_count: usize,
    entry_value_size: usize,
    data: BlockData<'a>,
}

impl<'a> SuffixTableSharedData<'a> {
    /// Serialize shared data for a table holding `entry_values`.
    ///
    /// `entry_values` is ignored when the format stores no values.
    pub fn encode(table_prefix: u32, entry_values: &[u32], format: &FileFormat) -> Result<Vec<u8>> {
        let size = format.entry_value_size_in_bytes() as usize;
        let mut out = Vec::with_capacity(VALUES_OFFSET + size * entry_values.len());
        out.extend_from_slice(&table_prefix.to_be_bytes());
        if size == 0 || entry_values.is_empty() {
            return Ok(out);
        }

        let max = format.max_entry_value();
        if let Some(bad) = entry_values.iter().find(|v| **v > max) {
            return Err(Error::InvalidArgument(format!(
                "entry value {bad} does not fit in {size} bytes (max {max})"
            )));
        }

        let first = entry_values[0];
        let values = if entry_values.iter().all(|v| *v == first) {
            &entry_values[..1]
        } else {
            entry_values
        };
        out.extend_from_slice(&(values.len() as u32).to_be_bytes());
        for value in values {
            write_var_be(&mut out, size, *value as u64)?;
        }
        Ok(out)
    }

    /// Decode shared data read from a block.
    pub fn decode(data: BlockData<'a>, format: &FileFormat) -> Result<Self> {
        let table_prefix = data
            .get_int(0)
            .map_err(|_| Error::Corrupt(format!("shared data is {} bytes", data.size())))?;

        let entry_value_size = format.entry_value_size_in_bytes() as usize;
        let entry_value_count = if entry_value_size > 0 && data.size() > VALUES_OFFSET {
            data.get_int(PREFIX_SIZE)? as usize
        } else {
            0
        };

        let needed = entry_value_size
            .checked_mul(entry_value_count)
            .and_then(|n| n.checked_add(VALUES_OFFSET));
        if entry_value_count > 0 && needed.map_or(true, |n| n > data.size()) {
            return Err(Error::Corrupt(format!(
                "shared data for prefix {table_prefix} claims {entry_value_count} values in {} bytes",
                data.size()
            )));
        }

        Ok(Self {
            table_prefix,
            entry_value_count,
            entry_value_size,
            data,
        })
    }

    pub fn table_prefix(&self) -> u32 {
        self.table_prefix
    }

    /// Number of stored values: 0, 1 (shared by every range) or one per
    /// range.
    pub fn entry_value_count(&self) -> usize {
        self.entry_value_count
    }

    /// Entry value of the range at `index`.
    pub fn entry_value(&self, index: usize) -> Result<Option<u32>> {
        let index = match self.entry_value_count {
            0 => return Ok(None),
            1 => 0,
            n if index >= n => return Ok(None),
            _ => index,
        };
        let offset = VALUES_OFFSET + self.entry_value_size * index;
        let value = self.data.get_var_byte_value(offset, self.entry_value_size)?;
        Ok(Some(value as u32))
    }
}

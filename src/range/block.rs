//! Suffix table blocks: the sorted ranges of one prefix.
//!
//! Block data is an array of fixed-width big-endian records, one per range,
//! ascending by start:
//!
//! ```text
//! +---------------------+------------------------------+
//! |  start suffix       |  range length (cells)        |
//! |  suffix_bit_count   |  entry_bits - suffix_bits    |
//! +---------------------+------------------------------+
//! ```
//!
//! Entry values live in the block's shared data, indexed like the records.

use super::entry::SuffixTableRange;
use super::format::FileFormat;
use super::shared_data::SuffixTableSharedData;
use crate::codec::{read_var_be, write_var_be};
use crate::table::Block;
use crate::{Error, Result};

/// A range found in a suffix table, with its position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixTableEntry {
    pub index: usize,
    pub range: SuffixTableRange,
}

/// Suffix table for one prefix.
#[derive(Debug, Clone, Copy)]
pub enum SuffixTableBlock<'a> {
    /// Prefix with at least one stored range.
    Populated(PopulatedSuffixTableBlock<'a>),
    /// Prefix with no ranges; no block exists in the file.
    Unpopulated { prefix: u32 },
}

impl<'a> SuffixTableBlock<'a> {
    pub fn prefix(&self) -> u32 {
        match self {
            Self::Populated(block) => block.prefix(),
            Self::Unpopulated { prefix } => *prefix,
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }

    /// Find the range containing `cell_id`.
    pub fn find_entry_by_cell_id(&self, cell_id: u64) -> Result<Option<SuffixTableEntry>> {
        match self {
            Self::Populated(block) => block.find_entry_by_cell_id(cell_id),
            Self::Unpopulated { .. } => Ok(None),
        }
    }

    /// Range at position `index`.
    pub fn find_entry_by_index(&self, index: usize) -> Result<SuffixTableEntry> {
        match self {
            Self::Populated(block) => block.find_entry_by_index(index),
            Self::Unpopulated { .. } => Err(Error::IndexOutOfBounds { index, len: 0 }),
        }
    }

    pub fn entry_count(&self) -> usize {
        match self {
            Self::Populated(block) => block.entry_count(),
            Self::Unpopulated { .. } => 0,
        }
    }

    pub fn entry_value_count(&self) -> usize {
        match self {
            Self::Populated(block) => block.shared.entry_value_count(),
            Self::Unpopulated { .. } => 0,
        }
    }

    pub fn entry_value(&self, index: usize) -> Result<Option<u32>> {
        match self {
            Self::Populated(block) => block.shared.entry_value(index),
            Self::Unpopulated { .. } => Ok(None),
        }
    }

    /// Iterate over every range in the table.
    pub fn entries(&self) -> impl Iterator<Item = Result<SuffixTableEntry>> + '_ {
        (0..self.entry_count()).map(move |i| self.find_entry_by_index(i))
    }
}

/// Decoded view over a stored suffix table block.
#[derive(Debug, Clone, Copy)]
pub struct PopulatedSuffixTableBlock<'a> {
    format: &'a FileFormat,
    shared: SuffixTableSharedData<'a>,
    records: &'a [u8],
    record_size: usize,
    entry_count: usize,
}

impl<'a> PopulatedSuffixTableBlock<'a> {
    /// Decode a block read from the table.
    pub fn decode(format: &'a FileFormat, block: Block<'a>) -> Result<Self> {
        let shared = SuffixTableSharedData::decode(block.shared, format)?;
        let record_size = format.table_entry_byte_count();
        let records = block.data.as_bytes();

        if records.is_empty() || records.len() % record_size != 0 {
            return Err(Error::Corrupt(format!(
                "block {} holds {} bytes, not a whole number of {record_size}-byte records",
                block.id,
                records.len()
            )));
        }
        let entry_count = records.len() / record_size;

        let value_count = shared.entry_value_count();
        if value_count > 1 && value_count != entry_count {
            return Err(Error::Corrupt(format!(
                "block {} has {entry_count} ranges but {value_count} entry values",
                block.id
            )));
        }

        Ok(Self {
            format,
            shared,
            records,
            record_size,
            entry_count,
        })
    }

    pub fn prefix(&self) -> u32 {
        self.shared.table_prefix()
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn shared_data(&self) -> &SuffixTableSharedData<'a> {
        &self.shared
    }

    /// Binary search for the last range starting at or before `cell_id`,
    /// then check that it reaches `cell_id`.
    pub fn find_entry_by_cell_id(&self, cell_id: u64) -> Result<Option<SuffixTableEntry>> {
        if self.format.extract_prefix(cell_id) != self.prefix() {
            return Ok(None);
        }
        let target = self.format.extract_suffix(cell_id);

        let mut low = 0;
        let mut high = self.entry_count;
        while low < high {
            let mid = low + (high - low) / 2;
            if self.record(mid)?.0 <= target {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        if low == 0 {
            return Ok(None);
        }

        let index = low - 1;
        let (start, length) = self.record(index)?;
        if target - start < length {
            Ok(Some(self.entry(index, start, length)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_entry_by_index(&self, index: usize) -> Result<SuffixTableEntry> {
        if index >= self.entry_count {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.entry_count,
            });
        }
        let (start, length) = self.record(index)?;
        self.entry(index, start, length)
    }

    /// Start suffix and length of the record at `index`.
    fn record(&self, index: usize) -> Result<(u64, u64)> {
        let offset = index * self.record_size;
        let value = read_var_be(self.records, offset, self.record_size)?;
        let length_bits = self.format.range_length_bit_count();
        Ok((value >> length_bits, value & self.format.max_range_length()))
    }

    fn entry(&self, index: usize, start: u64, length: u64) -> Result<SuffixTableEntry> {
        let base = (self.prefix() as u64) << self.format.suffix_bit_count();
        let start_cell_id = self.format.cell_id_from_position(base + start);
        let end_cell_id = self.format.cell_id_from_position(base + start + length);
        let range = match self.shared.entry_value(index)? {
            Some(value) => SuffixTableRange::with_entry_value(start_cell_id, end_cell_id, value),
            None => SuffixTableRange::new(start_cell_id, end_cell_id),
        };
        Ok(SuffixTableEntry { index, range })
    }
}

/// Serialized suffix table, ready to be written as one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSuffixTable {
    pub shared: Vec<u8>,
    pub data: Vec<u8>,
}

/// Encode the sorted ranges of `prefix`.
///
/// Ranges must already be validated against the format: each lies inside
/// the prefix and fits in one record.
pub fn encode_suffix_table(
    format: &FileFormat,
    prefix: u32,
    ranges: &[SuffixTableRange],
) -> Result<EncodedSuffixTable> {
    let record_size = format.table_entry_byte_count();
    let length_bits = format.range_length_bit_count();

    let mut data = Vec::with_capacity(ranges.len() * record_size);
    let mut values = Vec::with_capacity(ranges.len());
    for range in ranges {
        let start = format.extract_suffix(range.start_cell_id());
        let length = format.calculate_range_length(range.start_cell_id(), range.end_cell_id());
        if length == 0 || length > format.max_range_length() {
            return Err(Error::InvalidRange(format!(
                "range {range} has length {length}, expected 1..={}",
                format.max_range_length()
            )));
        }
        write_var_be(&mut data, record_size, (start << length_bits) | length)?;
        if let Some(value) = range.entry_value() {
            values.push(value);
        }
    }

    // Values are stored only when every range carries one.
    if values.len() != ranges.len() {
        values.clear();
    }
    let shared = SuffixTableSharedData::encode(prefix, &values, format)?;
    Ok(EncodedSuffixTable { shared, data })
}

//! Range file reader.

use std::path::Path;

use super::block::{PopulatedSuffixTableBlock, SuffixTableBlock, SuffixTableEntry};
use super::entry::SuffixTableRange;
use super::format::{FileFormat, HEADER_BLOCK_ID};
use crate::table::TableReader;
use crate::{Error, Result};

/// Read-only view of a range file.
///
/// The file is memory-mapped and never modified, so a reader can be shared
/// between threads and queried concurrently without locking.
pub struct SatS2RangeFileReader {
    table: TableReader,
    format: FileFormat,
}

impl SatS2RangeFileReader {
    /// Open and validate a range file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = Self::from_table(TableReader::open(path)?)?;
        log::info!(
            "Opened range file {:?}: level {}, {} suffix tables, version {}",
            path,
            reader.format.s2_level(),
            reader.suffix_table_count(),
            reader.format.version_number()
        );
        Ok(reader)
    }

    /// Open a range file held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_table(TableReader::from_bytes(data)?)
    }

    fn from_table(table: TableReader) -> Result<Self> {
        let header = table
            .find_block(HEADER_BLOCK_ID)
            .ok_or_else(|| Error::Corrupt("missing header block".to_string()))?;
        let format = FileFormat::from_header_block(header.data)?;

        let first_id = format.suffix_table_block_id(0);
        let last_id = format.suffix_table_block_id(format.max_prefix_value());
        if let Some(id) = table
            .block_ids()
            .find(|id| *id != HEADER_BLOCK_ID && !(first_id..=last_id).contains(id))
        {
            return Err(Error::Corrupt(format!(
                "block {id} is not a suffix table of this format"
            )));
        }

        Ok(Self { table, format })
    }

    pub fn file_format(&self) -> &FileFormat {
        &self.format
    }

    pub fn is_allowed_list(&self) -> bool {
        self.format.is_allowed_list()
    }

    pub fn version_number(&self) -> u32 {
        self.format.version_number()
    }

    /// Number of populated suffix tables.
    pub fn suffix_table_count(&self) -> usize {
        self.table.block_count().saturating_sub(1)
    }

    /// Suffix table for `prefix`, [`SuffixTableBlock::Unpopulated`] when the
    /// file holds no ranges for it.
    pub fn suffix_table_block(&self, prefix: u32) -> Result<SuffixTableBlock<'_>> {
        if prefix > self.format.max_prefix_value() {
            return Err(Error::InvalidArgument(format!(
                "prefix={prefix} exceeds {} bits",
                self.format.prefix_bit_count()
            )));
        }

        let Some(block) = self.table.find_block(self.format.suffix_table_block_id(prefix)) else {
            return Ok(SuffixTableBlock::Unpopulated { prefix });
        };
        let populated = PopulatedSuffixTableBlock::decode(&self.format, block)?;
        if populated.prefix() != prefix {
            return Err(Error::Corrupt(format!(
                "block {} holds prefix {}, expected {prefix}",
                block.id,
                populated.prefix()
            )));
        }
        Ok(SuffixTableBlock::Populated(populated))
    }

    /// Find the range containing `cell_id`.
    ///
    /// Cells finer than the file's level resolve through their ancestor at
    /// that level.
    pub fn find_entry_by_cell_id(&self, cell_id: u64) -> Result<Option<SuffixTableRange>> {
        let prefix = self.format.extract_prefix(cell_id);
        let block = self.suffix_table_block(prefix)?;
        Ok(block.find_entry_by_cell_id(cell_id)?.map(|entry| entry.range))
    }

    /// Every stored range, in cell ID order.
    pub fn iter_ranges(&self) -> impl Iterator<Item = Result<SuffixTableRange>> + '_ {
        self.table
            .block_ids()
            .filter(|id| *id != HEADER_BLOCK_ID)
            .flat_map(move |id| {
                let prefix = id - self.format.suffix_table_block_id_offset();
                match self.suffix_table_block(prefix) {
                    Ok(block) => block.entries().collect::<Vec<Result<SuffixTableEntry>>>(),
                    Err(e) => vec![Err(e)],
                }
            })
            .map(|entry| entry.map(|e| e.range))
    }

    /// Release the file.
    pub fn close(self) {
        log::debug!("Closed range file ({} suffix tables)", self.suffix_table_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SatS2RangeFileWriter;

    const PREFIX: u32 = 0b100_11111111;

    fn build(format: FileFormat, ranges: Vec<SuffixTableRange>) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.dat");
        let mut writer = SatS2RangeFileWriter::open(&path, format).unwrap();
        writer.create_sorted_suffix_blocks(ranges).unwrap();
        writer.close().unwrap();
        std::fs::read(&path).unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_reader_is_send_sync() {
        assert_send_sync::<SatS2RangeFileReader>();
    }

    #[test]
    fn test_empty_file() {
        let format = FileFormat::for_level(12, false, 0, 0).unwrap();
        let reader = SatS2RangeFileReader::from_bytes(build(format, vec![])).unwrap();

        assert!(!reader.is_allowed_list());
        assert_eq!(reader.suffix_table_count(), 0);
        assert_eq!(reader.iter_ranges().count(), 0);
        let cell = format.create_cell_id(PREFIX, 0).unwrap();
        assert!(reader.find_entry_by_cell_id(cell).unwrap().is_none());
    }

    #[test]
    fn test_suffix_table_block_variants() {
        let format = FileFormat::for_level(12, true, 0, 0).unwrap();
        let range = SuffixTableRange::new(
            format.create_cell_id(PREFIX, 1).unwrap(),
            format.create_cell_id(PREFIX, 9).unwrap(),
        );
        let reader = SatS2RangeFileReader::from_bytes(build(format, vec![range])).unwrap();

        let populated = reader.suffix_table_block(PREFIX).unwrap();
        assert!(populated.is_populated());
        assert_eq!(populated.entry_count(), 1);

        let empty = reader.suffix_table_block(PREFIX - 1).unwrap();
        assert!(!empty.is_populated());
        assert_eq!(empty.prefix(), PREFIX - 1);

        assert!(matches!(
            reader.suffix_table_block(format.max_prefix_value() + 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_iter_ranges_in_order() {
        let format = FileFormat::for_level(12, true, 2, 0).unwrap();
        let ranges = vec![
            SuffixTableRange::with_entry_value(
                format.create_cell_id(PREFIX, 1).unwrap(),
                format.create_cell_id(PREFIX, 2).unwrap(),
                300,
            ),
            SuffixTableRange::with_entry_value(
                format.create_cell_id(PREFIX, 5).unwrap(),
                format.create_cell_id(PREFIX + 1, 0).unwrap(),
                301,
            ),
            SuffixTableRange::with_entry_value(
                format.create_cell_id(PREFIX + 7, 5).unwrap(),
                format.create_cell_id(PREFIX + 7, 6).unwrap(),
                302,
            ),
        ];
        let reader = SatS2RangeFileReader::from_bytes(build(format, ranges.clone())).unwrap();

        let read: Vec<SuffixTableRange> = reader.iter_ranges().map(|r| r.unwrap()).collect();
        assert_eq!(read, ranges);
    }

    #[test]
    fn test_missing_header_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headerless.dat");
        let mut table = crate::table::TableWriter::create(&path).unwrap();
        table.write_block(7, &[0, 0, 0, 2], &[0; 5]).unwrap();
        table.finish().unwrap();

        assert!(matches!(
            SatS2RangeFileReader::open(&path),
            Err(Error::Corrupt(_))
        ));
    }
}

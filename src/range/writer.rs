//! Range file writer.

use std::path::{Path, PathBuf};

use super::block::encode_suffix_table;
use super::entry::SuffixTableRange;
use super::format::{FileFormat, HEADER_BLOCK_ID};
use crate::table::TableWriter;
use crate::{Error, Result};

/// Ranges collected for the prefix currently being written.
struct PendingTable {
    prefix: u32,
    ranges: Vec<SuffixTableRange>,
}

/// Builds a range file from globally sorted, non-overlapping ranges.
///
/// Output goes to a temporary file that [`SatS2RangeFileWriter::close`]
/// publishes at the target path. Once any operation fails the writer
/// discards its output and every later call fails.
pub struct SatS2RangeFileWriter {
    format: FileFormat,
    path: PathBuf,
    table: Option<TableWriter>,
    last_prefix: Option<u32>,
    last_end_cell_id: Option<u64>,
    table_count: usize,
    range_count: u64,
}

impl SatS2RangeFileWriter {
    /// Start a range file at `path`.
    pub fn open(path: impl AsRef<Path>, format: FileFormat) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let table = TableWriter::create(&path)?;
        log::debug!("Creating range file {:?} with {:?}", path, format);

        Ok(Self {
            format,
            path,
            table: Some(table),
            last_prefix: None,
            last_end_cell_id: None,
            table_count: 0,
            range_count: 0,
        })
    }

    pub fn file_format(&self) -> &FileFormat {
        &self.format
    }

    /// Write suffix tables for `ranges`.
    ///
    /// Ranges must be sorted and non-overlapping, and may span several
    /// prefixes. Ranges from a later call must start in a prefix above
    /// every prefix already written.
    pub fn create_sorted_suffix_blocks<I>(&mut self, ranges: I) -> Result<()>
    where
        I: IntoIterator<Item = SuffixTableRange>,
    {
        if self.table.is_none() {
            return Err(poisoned());
        }
        let result = self.write_ranges(ranges.into_iter());
        if result.is_err() {
            if let Some(table) = self.table.take() {
                table.discard();
            }
        }
        result
    }

    /// Write the header block and publish the file.
    pub fn close(mut self) -> Result<()> {
        let mut table = self.table.take().ok_or_else(poisoned)?;

        if let Err(e) = table.write_block(HEADER_BLOCK_ID, &[], &self.format.to_header_bytes()) {
            table.discard();
            return Err(e);
        }
        table.finish()?;

        log::info!(
            "Wrote range file {:?}: {} suffix tables, {} ranges",
            self.path,
            self.table_count,
            self.range_count
        );
        Ok(())
    }

    fn write_ranges(&mut self, ranges: impl Iterator<Item = SuffixTableRange>) -> Result<()> {
        let mut pending: Option<PendingTable> = None;

        for range in ranges {
            let prefix = self.check_range(&range)?;
            if pending.as_ref().is_some_and(|table| table.prefix != prefix) {
                if let Some(done) = pending.take() {
                    self.flush(done)?;
                }
            }
            pending
                .get_or_insert_with(|| PendingTable {
                    prefix,
                    ranges: Vec::new(),
                })
                .ranges
                .push(range);
            self.last_end_cell_id = Some(range.end_cell_id());
        }

        if let Some(done) = pending {
            self.flush(done)?;
        }
        Ok(())
    }

    /// Validate `range` against the format and the ranges before it.
    /// Returns its prefix.
    fn check_range(&self, range: &SuffixTableRange) -> Result<u32> {
        let format = &self.format;
        let start = range.start_cell_id();
        let end = range.end_cell_id();

        if start >= end {
            return Err(Error::InvalidRange(format!(
                "range {range} is empty or reversed"
            )));
        }
        if !format.is_valid_cell(start) || !format.is_level_boundary(end) {
            return Err(Error::InvalidRange(format!(
                "range {range} is not made of level {} cells",
                format.s2_level()
            )));
        }
        if let Some(last_end) = self.last_end_cell_id {
            if start < last_end {
                return Err(Error::InvalidRange(format!(
                    "range {range} is unsorted or overlaps the previous range"
                )));
            }
        }

        let prefix = format.extract_prefix(start);
        if self.last_prefix.is_some_and(|last| prefix <= last) {
            return Err(Error::InvalidRange(format!(
                "range {range} starts in prefix {prefix}, which is already written"
            )));
        }

        let length = format.calculate_range_length(start, end);
        let start_suffix = format.extract_suffix(start);
        if start_suffix + length > format.max_suffix_value() + 1 {
            return Err(Error::InvalidRange(format!(
                "range {range} extends past the end of prefix {prefix}"
            )));
        }
        if length > format.max_range_length() {
            return Err(Error::InvalidRange(format!(
                "range {range} holds {length} cells, more than the {} a record can encode",
                format.max_range_length()
            )));
        }

        if format.entry_value_size_in_bytes() > 0 {
            match range.entry_value() {
                None => {
                    return Err(Error::InvalidArgument(format!(
                        "range {range} has no entry value"
                    )))
                }
                Some(value) if value > format.max_entry_value() => {
                    return Err(Error::InvalidArgument(format!(
                        "entry value {value} of range {range} exceeds {}",
                        format.max_entry_value()
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(prefix)
    }

    fn flush(&mut self, pending: PendingTable) -> Result<()> {
        let encoded = encode_suffix_table(&self.format, pending.prefix, &pending.ranges)?;
        let block_id = self.format.suffix_table_block_id(pending.prefix);
        let table = self.table.as_mut().ok_or_else(poisoned)?;
        table.write_block(block_id, &encoded.shared, &encoded.data)?;

        log::debug!(
            "Wrote suffix table for prefix {} (block {}): {} ranges, {} value bytes",
            pending.prefix,
            block_id,
            pending.ranges.len(),
            encoded.shared.len()
        );
        self.last_prefix = Some(pending.prefix);
        self.table_count += 1;
        self.range_count += pending.ranges.len() as u64;
        Ok(())
    }
}

fn poisoned() -> Error {
    Error::InvalidArgument("range file writer is unusable after an earlier failure".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SatS2RangeFileReader;

    const PREFIX: u32 = 0b100_11111111;

    fn cell(format: &FileFormat, prefix: u32, suffix: u64) -> u64 {
        format.create_cell_id(prefix, suffix).unwrap()
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.dat");
        let format = FileFormat::for_level(12, true, 0, 3).unwrap();

        let mut writer = SatS2RangeFileWriter::open(&path, format).unwrap();
        assert_eq!(writer.file_format(), &format);
        writer
            .create_sorted_suffix_blocks([
                SuffixTableRange::new(cell(&format, PREFIX, 10), cell(&format, PREFIX, 20)),
                SuffixTableRange::new(cell(&format, PREFIX + 2, 0), cell(&format, PREFIX + 2, 1)),
            ])
            .unwrap();
        writer.close().unwrap();

        let reader = SatS2RangeFileReader::open(&path).unwrap();
        assert_eq!(reader.file_format(), &format);
        assert_eq!(reader.version_number(), 3);
        let found = reader
            .find_entry_by_cell_id(cell(&format, PREFIX, 15))
            .unwrap()
            .unwrap();
        assert_eq!(found.start_cell_id(), cell(&format, PREFIX, 10));
    }

    #[test]
    fn test_rejects_unsorted_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unsorted.dat");
        let format = FileFormat::for_level(12, true, 0, 0).unwrap();

        let mut writer = SatS2RangeFileWriter::open(&path, format).unwrap();
        let result = writer.create_sorted_suffix_blocks([
            SuffixTableRange::new(cell(&format, PREFIX, 50), cell(&format, PREFIX, 60)),
            SuffixTableRange::new(cell(&format, PREFIX, 10), cell(&format, PREFIX, 20)),
        ]);
        assert!(matches!(result, Err(Error::InvalidRange(_))));

        // Poisoned: no file can be published
        assert!(writer
            .create_sorted_suffix_blocks(Vec::<SuffixTableRange>::new())
            .is_err());
        assert!(writer.close().is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_later_call_must_start_in_new_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.dat");
        let format = FileFormat::for_level(12, true, 0, 0).unwrap();

        let mut writer = SatS2RangeFileWriter::open(&path, format).unwrap();
        writer
            .create_sorted_suffix_blocks([SuffixTableRange::new(
                cell(&format, PREFIX, 10),
                cell(&format, PREFIX, 20),
            )])
            .unwrap();
        writer
            .create_sorted_suffix_blocks([SuffixTableRange::new(
                cell(&format, PREFIX + 1, 10),
                cell(&format, PREFIX + 1, 20),
            )])
            .unwrap();
        assert!(writer
            .create_sorted_suffix_blocks([SuffixTableRange::new(
                cell(&format, PREFIX + 1, 30),
                cell(&format, PREFIX + 1, 40),
            )])
            .is_err());
    }

    #[test]
    fn test_dropped_writer_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.dat");
        let format = FileFormat::for_level(12, true, 0, 0).unwrap();

        {
            let mut writer = SatS2RangeFileWriter::open(&path, format).unwrap();
            writer
                .create_sorted_suffix_blocks([SuffixTableRange::new(
                    cell(&format, PREFIX, 1),
                    cell(&format, PREFIX, 2),
                )])
                .unwrap();
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

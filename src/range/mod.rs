//! Two-level S2 cell range files.
//!
//! A range file answers "which stored range contains this cell?" with one
//! directory lookup and one binary search:
//!
//! 1. The top bits of the cell ID (the prefix) select a suffix table block.
//! 2. The block's records are binary searched by the remaining bits (the
//!    suffix) for the last range starting at or before the cell.
//!
//! Only prefixes holding at least one range get a block; every other prefix
//! reads as [`SuffixTableBlock::Unpopulated`].
//!
//! ```ignore
//! use sats2range::range::{FileFormat, SatS2RangeFileReader, SatS2RangeFileWriter, SuffixTableRange};
//!
//! let format = FileFormat::for_level(12, true, 4, 1)?;
//! let mut writer = SatS2RangeFileWriter::open("ranges.dat", format)?;
//! writer.create_sorted_suffix_blocks(ranges)?;
//! writer.close()?;
//!
//! let reader = SatS2RangeFileReader::open("ranges.dat")?;
//! if let Some(range) = reader.find_entry_by_cell_id(cell_id)? {
//!     println!("{range}");
//! }
//! ```

mod block;
mod entry;
mod format;
mod merge;
mod reader;
mod shared_data;
mod writer;


pub use block::{
    encode_suffix_table, EncodedSuffixTable, PopulatedSuffixTableBlock, SuffixTableBlock,
    SuffixTableEntry,
};
pub use entry::SuffixTableRange;
pub use format::{
    FileFormat, FileFormatParams, HeaderFlags, HEADER_BLOCK_ID, HEADER_BLOCK_SIZE,
    HEADER_LAYOUT_VERSION, MAX_ENTRY_VALUE, MAX_ENTRY_VALUE_SIZE_IN_BYTES,
};
pub use merge::{merge_cells, CellEntry};
pub use reader::SatS2RangeFileReader;
pub use shared_data::SuffixTableSharedData;
pub use writer::SatS2RangeFileWriter;

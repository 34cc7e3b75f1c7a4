//! sats2range - A read-optimized range index over S2 cell IDs.
//!
//! This crate builds and queries immutable binary files that map S2 cells
//! to membership in a pre-computed region, optionally with a small integer
//! entry value per range (e.g. a regional configuration ID).
//!
//! # Features
//!
//! - **Two-level index**: cell ID prefix selects a block, suffix is binary
//!   searched inside it
//! - **Compact values**: per-table entry values, stored once when all equal
//! - **Memory-mapped reads**: lookups take `&self` and are thread-safe
//! - **Atomic builds**: files are published only when complete
//! - **Cell list pipeline**: text or gzip cell lists merged into ranges
//!
//! # Quick Start
//!
//! ```ignore
//! use sats2range::range::{FileFormat, SatS2RangeFileReader, SatS2RangeFileWriter, SuffixTableRange};
//!
//! let format = FileFormat::for_level(12, true, 0, 0)?;
//! let start = format.create_cell_id(0b100_11111111, 1000)?;
//! let end = format.create_cell_id(0b100_11111111, 2000)?;
//!
//! let mut writer = SatS2RangeFileWriter::open("allowed.dat", format)?;
//! writer.create_sorted_suffix_blocks([SuffixTableRange::new(start, end)])?;
//! writer.close()?;
//!
//! let reader = SatS2RangeFileReader::open("allowed.dat")?;
//! assert!(reader.find_entry_by_cell_id(start)?.is_some());
//! ```
//!
//! # File Layout
//!
//! Range files are block tables (see [`table`]): a checksummed header,
//! blocks of `[shared data][data]`, and a directory. Block 0 holds the
//! [`range::FileFormat`]; each populated prefix has one suffix table block.

mod error;

pub mod cell_id;
pub mod codec;
pub mod input;
pub mod range;
pub mod table;

// Re-export core types
pub use error::{Error, Result};

// Re-export the range file API
pub use range::{
    FileFormat, SatS2RangeFileReader, SatS2RangeFileWriter, SuffixTableBlock, SuffixTableRange,
};

// Re-export cell list parsing
pub use input::{CellIdFormat, CellListParser};

//! Block table storage.
//!
//! A table file is a flat container of blocks keyed by integer ID. Each
//! block carries a small "shared data" segment and a data segment; the
//! range index stores one suffix table per block.
//!
//! # File Structure
//!
//! ```text
//! +------------------+
//! |     HEADER       |  64 bytes (fixed)
//! +------------------+
//! |     BLOCK 0      |  [shared data][data]
//! +------------------+
//! |       ...        |
//! +------------------+
//! |    DIRECTORY     |  24 bytes per block, sorted by block ID
//! +------------------+
//! ```

mod data;
mod format;
mod reader;
mod writer;

pub use data::BlockData;
pub use format::*;
pub use reader::{Block, TableReader};
pub use writer::TableWriter;

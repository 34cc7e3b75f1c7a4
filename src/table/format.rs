//! Table file constants and structures.
//!
//! All integers are big-endian.

use crate::{Error, Result};

/// Magic bytes for identifying table files.
pub const MAGIC: [u8; 8] = *b"SATS2RNG";

/// Current table format version.
pub const FORMAT_VERSION: u32 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 64;

/// Size of one directory entry in bytes.
pub const DIRECTORY_ENTRY_SIZE: usize = 24;

/// Byte range of the checksum inside the header.
const CHECKSUM_OFFSET: usize = 32;

/// Table file header (64 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    /// Magic bytes: "SATS2RNG"
    pub magic: [u8; 8],
    /// Table format version
    pub version: u32,
    /// Number of blocks in the directory
    pub block_count: u32,
    /// Offset of the directory (it runs to the end of the file)
    pub directory_offset: u64,
    /// Unix timestamp when the file was written
    pub timestamp: i64,
    /// SHA-256 of every byte after the header
    pub checksum: [u8; 32],
}

impl TableHeader {
    /// Create a new header with default values.
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            block_count: 0,
            directory_offset: HEADER_SIZE as u64,
            timestamp: 0,
            checksum: [0; 32],
        }
    }

    /// Serialize to the fixed 64-byte layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..8].copy_from_slice(&self.magic);
        out[8..12].copy_from_slice(&self.version.to_be_bytes());
        out[12..16].copy_from_slice(&self.block_count.to_be_bytes());
        out[16..24].copy_from_slice(&self.directory_offset.to_be_bytes());
        out[24..32].copy_from_slice(&self.timestamp.to_be_bytes());
        out[CHECKSUM_OFFSET..].copy_from_slice(&self.checksum);
        out
    }

    /// Parse a header from the start of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::InvalidHeaderSize {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&data[0..8]);
        let mut checksum = [0u8; 32];
        checksum.copy_from_slice(&data[CHECKSUM_OFFSET..HEADER_SIZE]);

        Ok(Self {
            magic,
            version: u32::from_be_bytes(to_array(&data[8..12])),
            block_count: u32::from_be_bytes(to_array(&data[12..16])),
            directory_offset: u64::from_be_bytes(to_array(&data[16..24])),
            timestamp: i64::from_be_bytes(to_array(&data[24..32])),
            checksum,
        })
    }

    /// Validate the header magic and version.
    pub fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::InvalidMagic);
        }
        if self.version > FORMAT_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for TableHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Directory entry (24 bytes): locates one block's shared data and data.
///
/// Shared data starts at `offset`, block data follows it immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub block_id: u32,
    pub shared_len: u32,
    pub offset: u64,
    pub data_len: u64,
}

impl DirectoryEntry {
    pub fn to_bytes(&self) -> [u8; DIRECTORY_ENTRY_SIZE] {
        let mut out = [0u8; DIRECTORY_ENTRY_SIZE];
        out[0..4].copy_from_slice(&self.block_id.to_be_bytes());
        out[4..8].copy_from_slice(&self.shared_len.to_be_bytes());
        out[8..16].copy_from_slice(&self.offset.to_be_bytes());
        out[16..24].copy_from_slice(&self.data_len.to_be_bytes());
        out
    }

    /// Parse an entry; `data` must hold at least `DIRECTORY_ENTRY_SIZE` bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < DIRECTORY_ENTRY_SIZE {
            return Err(Error::Corrupt("directory entry truncated".to_string()));
        }
        Ok(Self {
            block_id: u32::from_be_bytes(to_array(&data[0..4])),
            shared_len: u32::from_be_bytes(to_array(&data[4..8])),
            offset: u64::from_be_bytes(to_array(&data[8..16])),
            data_len: u64::from_be_bytes(to_array(&data[16..24])),
        })
    }

    /// Offset one past the last byte of the block.
    pub fn end(&self) -> Option<u64> {
        self.offset
            .checked_add(self.shared_len as u64)?
            .checked_add(self.data_len)
    }
}

fn to_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

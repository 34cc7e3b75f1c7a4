//! Table file reader with memory-mapping support.

use memmap2::Mmap;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use super::data::BlockData;
use super::format::*;
use crate::{Error, Result};

/// Bytes backing a reader: a read-only mapping or an owned buffer.
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Backing {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(data) => &data[..],
        }
    }
}

/// One block resolved from the directory.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub id: u32,
    pub shared: BlockData<'a>,
    pub data: BlockData<'a>,
}

/// Memory-mapped table reader.
///
/// The directory is validated once at open time, so block lookups only
/// binary-search it and slice the mapping.
pub struct TableReader {
    bytes: Backing,
    header: TableHeader,
    directory: Vec<DirectoryEntry>,
}

impl TableReader {
    /// Open a table file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len < HEADER_SIZE as u64 {
            return Err(Error::InvalidHeaderSize {
                expected: HEADER_SIZE,
                actual: len as usize,
            });
        }

        // Files are never modified after publication.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_backing(Backing::Mapped(mmap))
    }

    /// Open a table from bytes already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_backing(Backing::Owned(data))
    }

    fn from_backing(bytes: Backing) -> Result<Self> {
        let header = TableHeader::from_bytes(&bytes)?;
        header.validate()?;

        let digest = Sha256::digest(&bytes[HEADER_SIZE..]);
        if digest.as_slice() != header.checksum.as_slice() {
            return Err(Error::ChecksumMismatch);
        }

        let directory = parse_directory(&bytes, &header)?;
        Ok(Self {
            bytes,
            header,
            directory,
        })
    }

    /// Get the file header.
    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Number of blocks in the table.
    pub fn block_count(&self) -> usize {
        self.directory.len()
    }

    /// Block IDs in ascending order.
    pub fn block_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.directory.iter().map(|e| e.block_id)
    }

    /// Look up a block by ID.
    pub fn find_block(&self, block_id: u32) -> Option<Block<'_>> {
        let idx = self
            .directory
            .binary_search_by_key(&block_id, |e| e.block_id)
            .ok()?;
        Some(self.block_at(&self.directory[idx]))
    }

    fn block_at(&self, entry: &DirectoryEntry) -> Block<'_> {
        // Bounds were checked by parse_directory.
        let shared_start = entry.offset as usize;
        let data_start = shared_start + entry.shared_len as usize;
        let data_end = data_start + entry.data_len as usize;
        Block {
            id: entry.block_id,
            shared: BlockData::new(&self.bytes[shared_start..data_start]),
            data: BlockData::new(&self.bytes[data_start..data_end]),
        }
    }
}

fn parse_directory(bytes: &[u8], header: &TableHeader) -> Result<Vec<DirectoryEntry>> {
    let count = header.block_count as usize;
    let directory_offset = header.directory_offset;
    let expected_end = (count as u64)
        .checked_mul(DIRECTORY_ENTRY_SIZE as u64)
        .and_then(|size| size.checked_add(directory_offset));

    if directory_offset < HEADER_SIZE as u64 || expected_end != Some(bytes.len() as u64) {
        return Err(Error::Corrupt(format!(
            "directory of {count} blocks at offset {directory_offset} does not end the file ({} bytes)",
            bytes.len()
        )));
    }

    let start = directory_offset as usize;
    let mut directory = Vec::with_capacity(count);
    for i in 0..count {
        let offset = start + i * DIRECTORY_ENTRY_SIZE;
        let entry = DirectoryEntry::from_bytes(&bytes[offset..offset + DIRECTORY_ENTRY_SIZE])?;

        let in_bounds = entry.offset >= HEADER_SIZE as u64
            && entry.end().is_some_and(|end| end <= directory_offset);
        if !in_bounds {
            return Err(Error::Corrupt(format!(
                "block {} lies outside the data section",
                entry.block_id
            )));
        }
        if let Some(prev) = directory.last().map(|e: &DirectoryEntry| e.block_id) {
            if entry.block_id <= prev {
                return Err(Error::Corrupt(format!(
                    "directory not sorted: block {} follows {}",
                    entry.block_id, prev
                )));
            }
        }
        directory.push(entry);
    }
    Ok(directory)
}

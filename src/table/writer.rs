//! Table file writer.
//!
//! Blocks are streamed to a temporary sibling of the target path. The
//! directory and header are written by [`TableWriter::finish`], which then
//! renames the temporary file over the target. A writer dropped before
//! `finish` removes its temporary file, so a failed build never leaves a
//! readable table behind.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::format::*;
use crate::{Error, Result};

const WRITE_BUFFER_SIZE: usize = 1 << 20;

/// Streaming writer for block table files.
pub struct TableWriter {
    target_path: PathBuf,
    temp_path: PathBuf,
    out: Option<BufWriter<File>>,
    hasher: Sha256,
    offset: u64,
    directory: BTreeMap<u32, DirectoryEntry>,
}

impl TableWriter {
    /// Start a new table that will be published at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let temp_path = temp_path_for(path);
        let file = File::create(&temp_path)?;
        let mut out = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

        // Placeholder, rewritten by finish()
        out.write_all(&[0u8; HEADER_SIZE])?;

        Ok(Self {
            target_path: path.to_path_buf(),
            temp_path,
            out: Some(out),
            hasher: Sha256::new(),
            offset: HEADER_SIZE as u64,
            directory: BTreeMap::new(),
        })
    }

    /// Append a block. Block IDs must be unique; order does not matter.
    pub fn write_block(&mut self, block_id: u32, shared: &[u8], data: &[u8]) -> Result<()> {
        if self.directory.contains_key(&block_id) {
            return Err(Error::InvalidArgument(format!(
                "block {block_id} written twice"
            )));
        }
        let shared_len = u32::try_from(shared.len()).map_err(|_| {
            Error::InvalidArgument(format!(
                "shared data for block {block_id} is too large ({} bytes)",
                shared.len()
            ))
        })?;

        let entry = DirectoryEntry {
            block_id,
            shared_len,
            offset: self.offset,
            data_len: data.len() as u64,
        };

        self.write_hashed(shared)?;
        self.write_hashed(data)?;
        self.directory.insert(block_id, entry);
        Ok(())
    }

    /// Number of blocks written so far.
    pub fn block_count(&self) -> usize {
        self.directory.len()
    }

    /// Write the directory and header, then publish the file at the target
    /// path.
    pub fn finish(mut self) -> Result<()> {
        let result = self.publish();
        if result.is_err() {
            let _ = fs::remove_file(&self.temp_path);
        }
        result
    }

    /// Abandon the table and remove the temporary file.
    pub fn discard(mut self) {
        self.out = None;
        let _ = fs::remove_file(&self.temp_path);
    }

    fn publish(&mut self) -> Result<()> {
        let directory_offset = self.offset;
        let entries: Vec<DirectoryEntry> = self.directory.values().copied().collect();
        for entry in &entries {
            self.write_hashed(&entry.to_bytes())?;
        }

        let mut header = TableHeader::new();
        header.block_count = entries.len() as u32;
        header.directory_offset = directory_offset;
        header.timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let digest = std::mem::take(&mut self.hasher).finalize();
        header.checksum.copy_from_slice(&digest);

        let out = self
            .out
            .take()
            .ok_or_else(|| Error::InvalidArgument("table writer already finished".to_string()))?;
        let mut file = out.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&header.to_bytes())?;
        file.sync_all()?;
        drop(file);

        // Atomic rename
        fs::rename(&self.temp_path, &self.target_path)?;

        log::debug!(
            "Published table {:?}: {} blocks, {} bytes",
            self.target_path,
            entries.len(),
            self.offset
        );
        Ok(())
    }

    fn write_hashed(&mut self, bytes: &[u8]) -> Result<()> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| Error::InvalidArgument("table writer already finished".to_string()))?;
        out.write_all(bytes)?;
        self.hasher.update(bytes);
        self.offset += bytes.len() as u64;
        Ok(())
    }
}

impl Drop for TableWriter {
    fn drop(&mut self) {
        if self.out.take().is_some() {
            log::warn!(
                "Table writer for {:?} dropped before finish, discarding output",
                self.target_path
            );
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableReader;

    #[test]
    fn test_write_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.dat");

        TableWriter::create(&path).unwrap().finish().unwrap();

        let data = fs::read(&path).unwrap();
        assert_eq!(data.len(), HEADER_SIZE);
        assert_eq!(&data[0..8], &MAGIC);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_duplicate_block_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.dat");

        let mut writer = TableWriter::create(&path).unwrap();
        writer.write_block(3, b"ab", b"cd").unwrap();
        assert!(writer.write_block(3, b"", b"").is_err());
        assert_eq!(writer.block_count(), 1);
    }

    #[test]
    fn test_drop_discards_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.dat");

        {
            let mut writer = TableWriter::create(&path).unwrap();
            writer.write_block(1, b"", b"data").unwrap();
        }

        assert!(!path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_discard_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discarded.dat");

        let mut writer = TableWriter::create(&path).unwrap();
        writer.write_block(2, b"", b"data").unwrap();
        assert!(temp_path_for(&path).exists());
        writer.discard();

        assert!(!path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_blocks_sorted_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sorted.dat");

        let mut writer = TableWriter::create(&path).unwrap();
        writer.write_block(9, b"s9", b"d9").unwrap();
        writer.write_block(0, b"", b"header").unwrap();
        writer.write_block(5, b"s5", b"").unwrap();
        writer.finish().unwrap();

        let reader = TableReader::open(&path).unwrap();
        let ids: Vec<u32> = reader.block_ids().collect();
        assert_eq!(ids, vec![0, 5, 9]);
    }
}

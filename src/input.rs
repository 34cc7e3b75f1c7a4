//! Cell list text format parser.
//!
//! One cell per line, optionally followed by a comma and an entry value:
//!
//! ```text
//! # comment
//! 5764607523034234880
//! 5764607523034234881, 7
//! ```
//!
//! Cells are decimal IDs or S2 tokens, depending on [`CellIdFormat`]. Files
//! may be gzip compressed.

use flate2::read::GzDecoder;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::cell_id;
use crate::range::CellEntry;
use crate::{Error, Result};

/// How cell IDs are written in a cell list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellIdFormat {
    /// Unsigned decimal, e.g. `5764607523034234880`.
    #[default]
    Decimal,
    /// S2 token, e.g. `5004`.
    Token,
}

impl FromStr for CellIdFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "decimal" | "id" => Ok(Self::Decimal),
            "token" | "hex" => Ok(Self::Token),
            other => Err(Error::InvalidArgument(format!(
                "unknown cell ID format: {other}"
            ))),
        }
    }
}

impl CellIdFormat {
    /// Parse one cell ID.
    pub fn parse_cell_id(&self, text: &str) -> Result<u64> {
        match self {
            Self::Decimal => text
                .parse::<u64>()
                .map_err(|_| Error::InvalidInput(format!("invalid cell ID: {text:?}"))),
            Self::Token => cell_id::from_token(text),
        }
    }
}

/// Cell list parser.
pub struct CellListParser;

impl CellListParser {
    /// Parse a plain text cell list.
    pub fn parse<R: Read>(reader: R, cell_format: CellIdFormat) -> Result<Vec<CellEntry>> {
        let mut cells = Vec::new();

        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;

            // Remove comments
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => &line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let entry = parse_line(line, cell_format)
                .map_err(|e| Error::InvalidInput(format!("line {}: {e}", index + 1)))?;
            cells.push(entry);
        }

        Ok(cells)
    }

    /// Parse a cell list file, decompressing it first if it is gzip.
    pub fn parse_file(path: &Path, cell_format: CellIdFormat) -> Result<Vec<CellEntry>> {
        let raw = fs::read(path)?;
        let cells = if is_gzip(&raw) {
            Self::parse(GzDecoder::new(&raw[..]), cell_format)?
        } else {
            Self::parse(&raw[..], cell_format)?
        };
        log::info!("Read {} cells from {:?}", cells.len(), path);
        Ok(cells)
    }
}

fn parse_line(line: &str, cell_format: CellIdFormat) -> Result<CellEntry> {
    let (cell, value) = match line.split_once(',') {
        Some((cell, value)) => (cell.trim(), Some(value.trim())),
        None => (line, None),
    };

    let cell_id = cell_format.parse_cell_id(cell)?;
    let entry_value = value
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| Error::InvalidInput(format!("invalid entry value: {v:?}")))
        })
        .transpose()?;
    Ok(CellEntry::new(cell_id, entry_value))
}

/// Check if data is gzip compressed.
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

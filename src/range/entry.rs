//! Cell ID ranges stored in suffix tables.

use std::fmt;

use crate::cell_id;

/// A `[start, end)` range of cells at one S2 level, with an optional entry
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuffixTableRange {
    start_cell_id: u64,
    end_cell_id: u64,
    entry_value: Option<u32>,
}

impl SuffixTableRange {
    pub fn new(start_cell_id: u64, end_cell_id: u64) -> Self {
        Self {
            start_cell_id,
            end_cell_id,
            entry_value: None,
        }
    }

    pub fn with_entry_value(start_cell_id: u64, end_cell_id: u64, entry_value: u32) -> Self {
        Self {
            start_cell_id,
            end_cell_id,
            entry_value: Some(entry_value),
        }
    }

    /// First cell in the range.
    pub fn start_cell_id(&self) -> u64 {
        self.start_cell_id
    }

    /// First cell after the range.
    pub fn end_cell_id(&self) -> u64 {
        self.end_cell_id
    }

    pub fn entry_value(&self) -> Option<u32> {
        self.entry_value
    }

    /// Whether `cell_id` lies in `[start, end)`. Only meaningful for cells at
    /// the range's level.
    pub fn contains(&self, cell_id: u64) -> bool {
        self.start_cell_id <= cell_id && cell_id < self.end_cell_id
    }
}

impl fmt::Display for SuffixTableRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} ({}), {} ({}))",
            cell_id::to_token(self.start_cell_id),
            cell_id::describe(self.start_cell_id),
            cell_id::to_token(self.end_cell_id),
            cell_id::describe(self.end_cell_id)
        )?;
        if let Some(value) = self.entry_value {
            write!(f, " value={value}")?;
        }
        Ok(())
    }
}

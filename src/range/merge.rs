//! Turn unordered cell lists into the sorted range stream the writer
//! expects.

use super::entry::SuffixTableRange;
use super::format::FileFormat;
use crate::cell_id;
use crate::{Error, Result};

/// One input cell and its optional entry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEntry {
    pub cell_id: u64,
    pub entry_value: Option<u32>,
}

impl CellEntry {
    pub fn new(cell_id: u64, entry_value: Option<u32>) -> Self {
        Self {
            cell_id,
            entry_value,
        }
    }
}

/// Half-open span of cell positions at the format's level.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: u64,
    end: u64,
    value: Option<u32>,
}

/// Merge cells into sorted, non-overlapping ranges.
///
/// Cells coarser than the format's level cover all of their descendants at
/// that level. Contiguous or overlapping cells with the same value are
/// joined; overlapping cells with different values are rejected. Ranges are
/// split at prefix boundaries and at the longest length a record can hold.
/// Values are dropped when the format stores none.
pub fn merge_cells<I>(format: &FileFormat, cells: I) -> Result<Vec<SuffixTableRange>>
where
    I: IntoIterator<Item = CellEntry>,
{
    let keep_values = format.entry_value_size_in_bytes() > 0;
    let mut spans = cells
        .into_iter()
        .map(|cell| {
            let mut span = to_span(format, cell.cell_id)?;
            span.value = if keep_values { cell.entry_value } else { None };
            Ok(span)
        })
        .collect::<Result<Vec<Span>>>()?;
    spans.sort_unstable_by_key(|s| (s.start, s.end));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start < last.end && span.value != last.value => {
                return Err(Error::InvalidInput(format!(
                    "cell {} has entry value {:?}, but overlaps cells with {:?}",
                    cell_id::describe(format.cell_id_from_position(span.start)),
                    span.value,
                    last.value
                )));
            }
            Some(last) if span.start <= last.end && span.value == last.value => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }

    let mut ranges = Vec::with_capacity(merged.len());
    for span in merged {
        split_span(format, span, &mut ranges);
    }
    log::debug!("Merged cells into {} ranges", ranges.len());
    Ok(ranges)
}

fn to_span(format: &FileFormat, id: u64) -> Result<Span> {
    if !cell_id::is_valid(id) {
        return Err(Error::InvalidInput(format!("{id} is not a valid S2 cell ID")));
    }
    let level = cell_id::level(id);
    if level > format.s2_level() {
        return Err(Error::InvalidInput(format!(
            "cell {} is finer than level {}",
            cell_id::describe(id),
            format.s2_level()
        )));
    }

    // First descendant at the format's level, then one past the last.
    let lsb = cell_id::lsb(id);
    let level_lsb = cell_id::lsb_for_level(format.s2_level());
    let first = id - lsb + level_lsb;
    let count = 1u64 << (2 * (format.s2_level() - level) as u32);
    let start = format.cell_position(first);
    Ok(Span {
        start,
        end: start + count,
        value: None,
    })
}

fn split_span(format: &FileFormat, span: Span, out: &mut Vec<SuffixTableRange>) {
    let table_size = format.max_suffix_value() + 1;
    let max_length = format.max_range_length();

    let mut start = span.start;
    while start < span.end {
        let prefix_end = (start / table_size + 1) * table_size;
        let end = span.end.min(prefix_end).min(start + max_length);

        let start_cell_id = format.cell_id_from_position(start);
        let end_cell_id = format.cell_id_from_position(end);
        out.push(match span.value {
            Some(value) => SuffixTableRange::with_entry_value(start_cell_id, end_cell_id, value),
            None => SuffixTableRange::new(start_cell_id, end_cell_id),
        });
        start = end;
    }
}

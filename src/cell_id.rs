//! S2 cell ID primitives.
//!
//! A cell ID is a 64-bit value laid out as:
//!
//! ```text
//! +------+--------------------------+---+--------------------+
//! | face |  2 * level position bits | 1 | 2 * (30 - level) 0 |
//! +------+--------------------------+---+--------------------+
//!   3 b                               marker
//! ```
//!
//! Position bits follow the Hilbert curve, so cells that are contiguous on
//! the curve have numerically contiguous IDs at a given level.

use crate::{Error, Result};

/// Deepest S2 level.
pub const MAX_LEVEL: u8 = 30;

/// Number of cube faces.
pub const NUM_FACES: u8 = 6;

/// Bits used by the face number.
pub const FACE_BIT_COUNT: u32 = 3;

/// Bits following the face number (position plus marker).
pub const POS_BIT_COUNT: u32 = 2 * MAX_LEVEL as u32 + 1;

/// Returns the marker bit of any cell at `level`. Levels above
/// [`MAX_LEVEL`] are treated as leaf cells.
#[inline]
pub fn lsb_for_level(level: u8) -> u64 {
    1u64 << (2 * MAX_LEVEL.saturating_sub(level) as u32)
}

/// Returns the lowest set bit of `id`.
#[inline]
pub fn lsb(id: u64) -> u64 {
    id & id.wrapping_neg()
}

/// Returns the face number (0..6 for valid cells).
#[inline]
pub fn face(id: u64) -> u8 {
    (id >> POS_BIT_COUNT) as u8
}

/// Whether `id` denotes a real cell: a valid face and a marker bit at an
/// even distance from bit 0.
pub fn is_valid(id: u64) -> bool {
    face(id) < NUM_FACES && (lsb(id) & 0x1555_5555_5555_5555) != 0
}

/// Returns the level of a valid cell. `0` yields level 0.
pub fn level(id: u64) -> u8 {
    MAX_LEVEL.saturating_sub((id.trailing_zeros() / 2) as u8)
}

/// Returns the ancestor of `id` at `level`.
///
/// `level` must not be deeper than the level of `id`.
pub fn parent(id: u64, level: u8) -> u64 {
    let new_lsb = lsb_for_level(level);
    (id & new_lsb.wrapping_neg()) | new_lsb
}

/// Returns the next cell along the Hilbert curve at the same level.
///
/// The successor of the last cell on face 5 is not a valid cell, but it is
/// still a correct exclusive upper bound.
#[inline]
pub fn next(id: u64) -> u64 {
    id.wrapping_add(lsb(id) << 1)
}

/// Builds a cell ID from a face, a position at level 30 and a level.
pub fn from_face_pos_level(face: u8, pos: u64, level: u8) -> u64 {
    let id = ((face as u64) << POS_BIT_COUNT) | (pos | 1);
    parent(id, level)
}

/// Formats `id` as an S2 token: hex with trailing zeros removed.
pub fn to_token(id: u64) -> String {
    if id == 0 {
        return "X".to_string();
    }
    let hex = format!("{:016x}", id);
    hex.trim_end_matches('0').to_string()
}

/// Parses an S2 token produced by [`to_token`].
pub fn from_token(token: &str) -> Result<u64> {
    if token == "X" || token == "x" {
        return Ok(0);
    }
    if token.is_empty() || token.len() > 16 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidInput(format!("invalid S2 token: {token:?}")));
    }
    let value = u64::from_str_radix(token, 16)
        .map_err(|_| Error::InvalidInput(format!("invalid S2 token: {token:?}")))?;
    Ok(value << (4 * (16 - token.len())))
}

/// Human readable form: face followed by one quad-tree digit per level,
/// e.g. `"1/0231"`.
pub fn describe(id: u64) -> String {
    if !is_valid(id) {
        return format!("invalid:{:016x}", id);
    }
    let mut out = format!("{}/", face(id));
    for l in 1..=level(id) {
        let shift = 2 * (MAX_LEVEL - l) as u32 + 1;
        let digit = (id >> shift) & 0b11;
        out.push(char::from(b'0' + digit as u8));
    }
    out
}

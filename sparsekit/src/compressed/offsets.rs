//! Offset table maintenance for compressed storage
//!
//! The table holds one start offset per major line plus a terminal entry.
//! Only the first `filled1` slots are valid; lines at or past `filled1 - 1`
//! are empty and their slots are written lazily by [`pad`].

use std::ops::Range;

/// Extend the valid prefix so that `major` owns a segment
///
/// New slots repeat the terminal offset, so the padded lines are empty.
pub(super) fn pad(offsets: &mut [usize], filled1: &mut usize, major: usize) {
    debug_assert!(major + 1 < offsets.len());
    while *filled1 <= major + 1 {
        offsets[*filled1] = offsets[*filled1 - 1];
        *filled1 += 1;
    }
}

/// Add one to every valid offset after `major`
pub(super) fn bump_after(offsets: &mut [usize], filled1: usize, major: usize) {
    for offset in &mut offsets[major + 1..filled1] {
        *offset += 1;
    }
}

/// Subtract one from every valid offset after `major`
pub(super) fn drop_after(offsets: &mut [usize], filled1: usize, major: usize) {
    for offset in &mut offsets[major + 1..filled1] {
        *offset -= 1;
    }
}

/// Shrink the valid prefix past trailing empty lines
pub(super) fn trim(offsets: &[usize], filled1: &mut usize) {
    while *filled1 > 1 && offsets[*filled1 - 2] == offsets[*filled1 - 1] {
        *filled1 -= 1;
    }
}

/// Zero-based array range of a major line
pub(super) fn segment(
    offsets: &[usize],
    filled1: usize,
    base: usize,
    major: usize,
) -> Range<usize> {
    if major + 1 >= filled1 {
        let end = offsets[filled1 - 1] - base;
        return end..end;
    }
    offsets[major] - base..offsets[major + 1] - base
}

/// Major line owning array position `pos`
pub(super) fn line_of(offsets: &[usize], filled1: usize, base: usize, pos: usize) -> Option<usize> {
    (0..filled1.saturating_sub(1))
        .rev()
        .find(|&major| offsets[major] - base <= pos)
}

/// Valid prefix never decreases
pub(super) fn is_monotone(offsets: &[usize], filled1: usize) -> bool {
    offsets[..filled1].windows(2).all(|pair| pair[0] <= pair[1])
}

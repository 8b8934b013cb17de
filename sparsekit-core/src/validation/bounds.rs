//! Index bounds and capacity validation
//!
//! Pure arithmetic helpers shared by all engines, with overflow protection
//! for degenerate extents.

use crate::{Result, SparseError};

/// Validate that `(row, col)` lies inside a `rows` x `cols` matrix
pub const fn check_index(row: usize, col: usize, rows: usize, cols: usize) -> Result<()> {
    if row >= rows || col >= cols {
        return Err(SparseError::IndexOutOfBounds);
    }
    Ok(())
}

/// Number of cells in a `rows` x `cols` matrix, `None` on overflow
pub const fn checked_area(rows: usize, cols: usize) -> Option<usize> {
    rows.checked_mul(cols)
}

/// Effective capacity for a reserve request
///
/// The result is at least `min(rows, cols)` and never more than
/// `rows * cols`. The cap is computed by division so that huge extents do
/// not overflow.
pub const fn max_nonzeros(hint: usize, rows: usize, cols: usize) -> usize {
    let floor = if rows < cols { rows } else { cols };
    let non_zeros = if hint > floor { hint } else { floor };
    if rows > 0 && non_zeros / rows >= cols {
        return rows * cols;
    }
    non_zeros
}

/// Capacity after one doubling step, never below one slot
pub const fn grown_capacity(current: usize) -> usize {
    match current.checked_mul(2) {
        Some(0) => 1,
        Some(doubled) => doubled,
        None => usize::MAX,
    }
}

//! Compressed sparse storage (CSR / CSC)
//!
//! Entries live in two parallel arrays ordered by `(major, minor)`. An offset
//! table records where each major line starts. Lookup is a binary search
//! inside one line; insertion shifts the tail of the arrays, so appending in
//! layout order is the cheap way to fill the matrix.
//!
//! Stored offsets and minor indices are shifted by the index base (0 or 1),
//! which lets the raw arrays be handed to consumers expecting one-based
//! CSR/CSC data.

mod offsets;

use std::marker::PhantomData;

use sparsekit_core::traverse::{Direction, Located, Traverse};
use sparsekit_core::validation::{grown_capacity, max_nonzeros};
use sparsekit_core::{
    Axis, Layout, MatrixElement, Orientation, Result, RowMajor, SparseError, SparseMatrix,
    SparseMatrixMut,
};
use tracing::debug;

use crate::config::StorageConfig;

/// Compressed row (or column) storage
#[derive(Debug, Clone)]
pub struct CompressedMatrix<T, L = RowMajor> {
    rows: usize,
    cols: usize,
    capacity: usize,
    /// Valid prefix of `offsets`
    filled1: usize,
    /// Stored entries
    filled2: usize,
    offsets: Vec<usize>,
    minor_indices: Vec<usize>,
    values: Vec<T>,
    index_base: usize,
    _layout: PhantomData<L>,
}

impl<T: MatrixElement, L: Layout> CompressedMatrix<T, L> {
    /// Empty `rows` x `cols` matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(rows, cols, &StorageConfig::default())
    }

    /// Empty matrix with room for about `reserve_hint` entries
    pub fn with_capacity(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        Self::with_config(rows, cols, &StorageConfig::with_reserve_hint(reserve_hint))
    }

    /// Empty matrix configured by `config`
    pub fn with_config(rows: usize, cols: usize, config: &StorageConfig) -> Self {
        let capacity = max_nonzeros(config.reserve_hint, rows, cols);
        let index_base = config.index_base.min(1);
        Self {
            rows,
            cols,
            capacity,
            filled1: 1,
            filled2: 0,
            offsets: vec![index_base; L::major_extent(rows, cols) + 1],
            minor_indices: vec![0; capacity],
            values: vec![T::zero(); capacity],
            index_base,
            _layout: PhantomData,
        }
    }

    /// Number of entry slots allocated
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index base of the raw arrays
    pub fn index_base(&self) -> usize {
        self.index_base
    }

    /// Number of valid slots in the offset table
    pub fn filled1(&self) -> usize {
        self.filled1
    }

    /// Number of stored entries
    pub fn filled2(&self) -> usize {
        self.filled2
    }

    /// Valid prefix of the offset table
    pub fn index1_data(&self) -> &[usize] {
        &self.offsets[..self.filled1]
    }

    /// Minor index of every stored entry
    pub fn index2_data(&self) -> &[usize] {
        &self.minor_indices[..self.filled2]
    }

    /// Value of every stored entry
    pub fn value_data(&self) -> &[T] {
        &self.values[..self.filled2]
    }

    /// Offset table covering every major line
    ///
    /// Pads the untouched tail so that the table has `major extent + 1`
    /// valid slots, as external CSR/CSC consumers expect.
    pub fn complete_index1_data(&mut self) -> &[usize] {
        let last = self.offsets.len() - 1;
        if last > 0 {
            offsets::pad(&mut self.offsets, &mut self.filled1, last - 1);
        }
        self.check_invariants();
        &self.offsets[..self.filled1]
    }

    /// Mutable access, storing an explicit zero when nothing is stored
    pub fn access(&mut self, row: usize, col: usize) -> &mut T {
        let (major, minor) = self.key(row, col);
        let pos = match self.search(major, minor) {
            Ok(pos) => pos,
            Err(pos) => {
                self.insert_at(major, minor, pos, T::zero());
                pos
            }
        };
        &mut self.values[pos]
    }

    /// Whether the offset table and index arrays agree
    ///
    /// Checks that offsets never decrease, that the terminal offset equals
    /// the entry count, and that minor indices strictly increase inside each
    /// line.
    pub fn is_consistent(&self) -> bool {
        let base = self.index_base;
        let minor_extent = L::minor_extent(self.rows, self.cols);
        if self.filled1 == 0
            || self.offsets[self.filled1 - 1] != base + self.filled2
            || self.offsets[0] != base
            || !offsets::is_monotone(&self.offsets, self.filled1)
        {
            return false;
        }
        (0..self.filled1 - 1).all(|major| {
            let line = &self.minor_indices[offsets::segment(
                &self.offsets,
                self.filled1,
                base,
                major,
            )];
            line.windows(2).all(|pair| pair[0] < pair[1])
                && line.iter().all(|&minor| minor >= base && minor - base < minor_extent)
        })
    }

    fn key(&self, row: usize, col: usize) -> (usize, usize) {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{}",
            self.rows,
            self.cols
        );
        (L::major(row, col), L::minor(row, col))
    }

    /// `Ok(pos)` of a stored entry, or `Err(pos)` where it would be inserted
    fn search(&self, major: usize, minor: usize) -> std::result::Result<usize, usize> {
        let line = offsets::segment(&self.offsets, self.filled1, self.index_base, major);
        let start = line.start;
        self.minor_indices[line]
            .binary_search(&(self.index_base + minor))
            .map(|pos| start + pos)
            .map_err(|pos| start + pos)
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.offsets[self.filled1 - 1],
            self.index_base + self.filled2,
            "terminal offset out of sync with entry count"
        );
        debug_assert!(self.is_consistent(), "compressed structure is inconsistent");
    }

    fn set_capacity(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.filled2);
        self.capacity = capacity;
        self.minor_indices.resize(capacity, 0);
        self.values.resize(capacity, T::zero());
    }

    fn insert_at(&mut self, major: usize, minor: usize, pos: usize, value: T) {
        if self.filled2 >= self.capacity {
            let capacity = max_nonzeros(grown_capacity(self.capacity), self.rows, self.cols);
            debug!(from = self.capacity, to = capacity, "compressed matrix growth");
            self.set_capacity(capacity);
        }
        offsets::pad(&mut self.offsets, &mut self.filled1, major);

        self.minor_indices.copy_within(pos..self.filled2, pos + 1);
        self.values.copy_within(pos..self.filled2, pos + 1);
        self.minor_indices[pos] = self.index_base + minor;
        self.values[pos] = value;
        self.filled2 += 1;

        offsets::bump_after(&mut self.offsets, self.filled1, major);
        self.check_invariants();
    }

    fn remove_at(&mut self, major: usize, pos: usize) {
        self.minor_indices.copy_within(pos + 1..self.filled2, pos);
        self.values.copy_within(pos + 1..self.filled2, pos);
        self.filled2 -= 1;

        offsets::drop_after(&mut self.offsets, self.filled1, major);
        offsets::trim(&self.offsets, &mut self.filled1);
        self.check_invariants();
    }

    /// `(major, minor)` and position of the last stored entry
    fn last_entry(&self) -> Option<(usize, usize, usize)> {
        let pos = self.filled2.checked_sub(1)?;
        let major = offsets::line_of(&self.offsets, self.filled1, self.index_base, pos)?;
        Some((major, self.minor_indices[pos] - self.index_base, pos))
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrix for CompressedMatrix<T, L> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        let (major, minor) = self.key(row, col);
        self.search(major, minor).ok().map(|pos| self.values[pos])
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn nnz(&self) -> usize {
        self.filled2
    }

    fn orientation(&self) -> Orientation {
        L::ORIENTATION
    }
}

/// Matrices are equal when their extents and stored entries match
impl<T: MatrixElement, L: Layout> PartialEq for CompressedMatrix<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .entries(L::ORIENTATION)
                .eq(other.entries(L::ORIENTATION))
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrixMut for CompressedMatrix<T, L> {
    fn create(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        Self::with_capacity(rows, cols, reserve_hint)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        let (major, minor) = self.key(row, col);
        match self.search(major, minor) {
            Ok(pos) => self.values[pos] = value,
            Err(pos) => self.insert_at(major, minor, pos, value),
        }
    }

    fn erase(&mut self, row: usize, col: usize) {
        let (major, minor) = self.key(row, col);
        if let Ok(pos) = self.search(major, minor) {
            self.remove_at(major, pos);
        }
    }

    fn clear(&mut self) {
        self.filled1 = 1;
        self.filled2 = 0;
        self.offsets[0] = self.index_base;
        self.check_invariants();
    }

    fn push_back(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (major, minor) = self.key(row, col);
        if let Some((last_major, last_minor, _)) = self.last_entry() {
            if (major, minor) <= (last_major, last_minor) {
                return Err(SparseError::OrderViolation);
            }
        }
        self.insert_at(major, minor, self.filled2, value);
        Ok(())
    }

    fn pop_back(&mut self) -> Result<()> {
        let (major, _, pos) = self.last_entry().ok_or(SparseError::Underflow)?;
        self.remove_at(major, pos);
        Ok(())
    }

    fn reserve(&mut self, capacity: usize, preserve: bool) {
        let mut capacity = max_nonzeros(capacity, self.rows, self.cols);
        if preserve {
            capacity = capacity.max(self.filled2);
        } else {
            self.clear();
        }
        debug!(from = self.capacity, to = capacity, preserve, "compressed matrix reserve");
        self.set_capacity(capacity);
    }

    fn resize(&mut self, rows: usize, cols: usize, preserve: bool) -> Result<()> {
        if preserve {
            return Err(SparseError::PreserveUnsupported);
        }
        debug!(rows, cols, "compressed matrix resize");
        self.rows = rows;
        self.cols = cols;
        self.offsets = vec![self.index_base; L::major_extent(rows, cols) + 1];
        self.filled1 = 1;
        self.filled2 = 0;
        let capacity = max_nonzeros(self.capacity, rows, cols);
        self.set_capacity(capacity);
        Ok(())
    }

    fn at_element(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let (major, minor) = self.key(row, col);
        let pos = self
            .search(major, minor)
            .map_err(|_| SparseError::MissingElement)?;
        Ok(&mut self.values[pos])
    }
}

impl<T: MatrixElement, L: Layout> Traverse for CompressedMatrix<T, L> {
    /// Position in the entry arrays
    type Pos = usize;

    fn major_axis(&self) -> Axis {
        L::major_axis()
    }

    fn is_fast(&self, axis: Axis) -> bool {
        L::is_fast(axis)
    }

    fn find_pos(&self, row: usize, col: usize) -> Option<usize> {
        let (major, minor) = self.key(row, col);
        self.search(major, minor).ok()
    }

    fn line_search(
        &self,
        major: usize,
        minor: usize,
        direction: Direction,
    ) -> Option<(usize, usize)> {
        let base = self.index_base;
        let line = offsets::segment(&self.offsets, self.filled1, base, major);
        let minors = &self.minor_indices[line.clone()];
        let pos = match direction {
            Direction::Forward => {
                let pos = line.start + minors.partition_point(|&stored| stored < base + minor);
                (pos < line.end).then_some(pos)?
            }
            Direction::Backward => {
                let end = line.start + minors.partition_point(|&stored| stored <= base + minor);
                (end > line.start).then(|| end - 1)?
            }
        };
        Some((self.minor_indices[pos] - base, pos))
    }

    fn neighbor(&self, from: &Located<usize>, direction: Direction) -> Option<Located<usize>> {
        let major = L::major(from.row, from.col);
        let line = offsets::segment(&self.offsets, self.filled1, self.index_base, major);
        let pos = match direction {
            Direction::Forward => (from.pos + 1 < line.end).then(|| from.pos + 1)?,
            Direction::Backward => (from.pos > line.start).then(|| from.pos - 1)?,
        };
        let (row, col) = L::from_major_minor(major, self.minor_indices[pos] - self.index_base);
        Some(Located::entry(row, col, pos))
    }

    fn value_at(&self, pos: usize) -> T {
        self.values[pos]
    }
}

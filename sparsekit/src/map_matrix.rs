//! Map-based sparse storage
//!
//! One ordered map keyed by the layout's linear address. Every operation is a
//! single map lookup, insert or removal, and stored entries come out of the
//! map already in layout order.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use sparsekit_core::traverse::{Direction, Located, Traverse};
use sparsekit_core::validation::{checked_area, max_nonzeros};
use sparsekit_core::{
    Axis, Layout, MatrixElement, Orientation, Result, RowMajor, SparseError, SparseMatrix,
    SparseMatrixMut,
};
use tracing::debug;

use crate::config::StorageConfig;

/// Sparse matrix backed by an ordered map of linear addresses
#[derive(Debug, Clone)]
pub struct MapMatrix<T, L = RowMajor> {
    rows: usize,
    cols: usize,
    data: BTreeMap<usize, T>,
    reserve_hint: usize,
    _layout: PhantomData<L>,
}

impl<T: MatrixElement, L: Layout> MapMatrix<T, L> {
    /// Empty `rows` x `cols` matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_capacity(rows, cols, 0)
    }

    /// Empty matrix expecting about `reserve_hint` entries
    ///
    /// Linear addresses must fit in `usize`, so `rows * cols` may not
    /// overflow.
    pub fn with_capacity(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        debug_assert!(
            checked_area(rows, cols).is_some(),
            "{rows}x{cols} matrix overflows the address space"
        );
        Self {
            rows,
            cols,
            data: BTreeMap::new(),
            reserve_hint,
            _layout: PhantomData,
        }
    }

    /// Empty matrix configured by `config`
    pub fn with_config(rows: usize, cols: usize, config: &StorageConfig) -> Self {
        Self::with_capacity(rows, cols, config.reserve_hint)
    }

    /// Recorded capacity hint, normalized to the matrix extents
    pub fn capacity(&self) -> usize {
        max_nonzeros(self.reserve_hint, self.rows, self.cols)
    }

    /// Mutable access, storing an explicit zero when nothing is stored
    pub fn access(&mut self, row: usize, col: usize) -> &mut T {
        let address = self.address(row, col);
        self.data.entry(address).or_insert_with(T::zero)
    }

    /// Stored entries as `(row, col, value)` in layout order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.data.iter().map(move |(&address, &value)| {
            let (row, col) = L::from_address(address, self.rows, self.cols);
            (row, col, value)
        })
    }

    fn address(&self, row: usize, col: usize) -> usize {
        debug_assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{}",
            self.rows,
            self.cols
        );
        L::address(row, col, self.rows, self.cols)
    }

    fn line_bounds(&self, major: usize) -> (usize, usize) {
        let minor_extent = L::minor_extent(self.rows, self.cols);
        (major * minor_extent, (major + 1) * minor_extent)
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrix for MapMatrix<T, L> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        self.data.get(&self.address(row, col)).copied()
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn nnz(&self) -> usize {
        self.data.len()
    }

    fn orientation(&self) -> Orientation {
        L::ORIENTATION
    }
}

/// Matrices are equal when their extents and stored entries match
impl<T: MatrixElement, L: Layout> PartialEq for MapMatrix<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .entries(L::ORIENTATION)
                .eq(other.entries(L::ORIENTATION))
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrixMut for MapMatrix<T, L> {
    fn create(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        Self::with_capacity(rows, cols, reserve_hint)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        let address = self.address(row, col);
        self.data.insert(address, value);
    }

    fn erase(&mut self, row: usize, col: usize) {
        let address = self.address(row, col);
        self.data.remove(&address);
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn push_back(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.set(row, col, value);
        Ok(())
    }

    fn pop_back(&mut self) -> Result<()> {
        self.data.pop_last().map(|_| ()).ok_or(SparseError::Underflow)
    }

    fn reserve(&mut self, capacity: usize, preserve: bool) {
        debug!(capacity, preserve, "map matrix reserve");
        self.reserve_hint = capacity;
        if !preserve {
            self.data.clear();
        }
    }

    fn resize(&mut self, rows: usize, cols: usize, preserve: bool) -> Result<()> {
        if preserve {
            return Err(SparseError::PreserveUnsupported);
        }
        debug_assert!(
            checked_area(rows, cols).is_some(),
            "{rows}x{cols} matrix overflows the address space"
        );
        debug!(rows, cols, "map matrix resize");
        self.rows = rows;
        self.cols = cols;
        self.data.clear();
        Ok(())
    }

    fn at_element(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let address = self.address(row, col);
        self.data.get_mut(&address).ok_or(SparseError::MissingElement)
    }
}

impl<T: MatrixElement, L: Layout> Traverse for MapMatrix<T, L> {
    type Pos = usize;

    fn major_axis(&self) -> Axis {
        L::major_axis()
    }

    fn is_fast(&self, axis: Axis) -> bool {
        L::is_fast(axis)
    }

    fn find_pos(&self, row: usize, col: usize) -> Option<usize> {
        let address = self.address(row, col);
        self.data.contains_key(&address).then_some(address)
    }

    fn line_search(
        &self,
        major: usize,
        minor: usize,
        direction: Direction,
    ) -> Option<(usize, usize)> {
        let (start, end) = self.line_bounds(major);
        let found = match direction {
            Direction::Forward => self.data.range(start + minor..end).next(),
            Direction::Backward => self.data.range(start..=start + minor).next_back(),
        };
        found.map(|(&address, _)| (address - start, address))
    }

    fn neighbor(&self, from: &Located<usize>, direction: Direction) -> Option<Located<usize>> {
        let major = L::major(from.row, from.col);
        let (start, end) = self.line_bounds(major);
        let found = match direction {
            Direction::Forward => self.data.range(from.pos + 1..end).next(),
            Direction::Backward => self.data.range(start..from.pos).next_back(),
        };
        found.map(|(&address, _)| {
            let (row, col) = L::from_major_minor(major, address - start);
            Located::entry(row, col, address)
        })
    }

    fn value_at(&self, pos: usize) -> T {
        self.data.get(&pos).copied().unwrap_or_else(T::zero)
    }
}

//! Vector-of-sparse-vector storage
//!
//! An ordered map of major lines, each an ordered map of minor indices. A
//! whole major line can be handed out without touching a combined key, and
//! stepping along the minor axis stays inside one inner map.
//!
//! The outer map always holds an empty line at `major = extent`. It marks the
//! end of the line sequence and survives `clear` and `resize`.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::ops::Bound;

use sparsekit_core::traverse::{Direction, Located, Traverse};
use sparsekit_core::validation::max_nonzeros;
use sparsekit_core::{
    Axis, Layout, MatrixElement, Orientation, Result, RowMajor, SparseError, SparseMatrix,
    SparseMatrixMut,
};
use tracing::debug;

use crate::config::StorageConfig;

/// Sparse matrix stored as one sparse vector per major line
#[derive(Debug, Clone)]
pub struct VectorOfVectorMatrix<T, L = RowMajor> {
    rows: usize,
    cols: usize,
    data: BTreeMap<usize, BTreeMap<usize, T>>,
    reserve_hint: usize,
    _layout: PhantomData<L>,
}

impl<T: MatrixElement, L: Layout> VectorOfVectorMatrix<T, L> {
    /// Empty `rows` x `cols` matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_capacity(rows, cols, 0)
    }

    /// Empty matrix expecting about `reserve_hint` entries
    pub fn with_capacity(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        let mut matrix = Self {
            rows,
            cols,
            data: BTreeMap::new(),
            reserve_hint,
            _layout: PhantomData,
        };
        matrix.reset_lines();
        matrix
    }

    /// Empty matrix configured by `config`
    pub fn with_config(rows: usize, cols: usize, config: &StorageConfig) -> Self {
        Self::with_capacity(rows, cols, config.reserve_hint)
    }

    /// Recorded capacity hint, normalized to the matrix extents
    pub fn capacity(&self) -> usize {
        max_nonzeros(self.reserve_hint, self.rows, self.cols)
    }

    /// One major line, keyed by minor index
    ///
    /// `None` when the line was never written.
    pub fn line(&self, major: usize) -> Option<&BTreeMap<usize, T>> {
        debug_assert!(major < L::major_extent(self.rows, self.cols));
        self.data.get(&major)
    }

    /// Mutable access, storing an explicit zero when nothing is stored
    pub fn access(&mut self, row: usize, col: usize) -> &mut T {
        let (major, minor) = self.key(row, col);
        self.data
            .entry(major)
            .or_default()
            .entry(minor)
            .or_insert_with(T::zero)
    }

    /// Number of major lines materialized so far, sentinel excluded
    pub fn line_count(&self) -> usize {
        self.data.len().saturating_sub(1)
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

    fn reset_lines(&mut self) {
        self.data.clear();
        self.data
            .insert(L::major_extent(self.rows, self.cols), BTreeMap::new());
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrix for VectorOfVectorMatrix<T, L> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        let (major, minor) = self.key(row, col);
        self.data.get(&major)?.get(&minor).copied()
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn nnz(&self) -> usize {
        self.data.values().map(BTreeMap::len).sum()
    }

    fn orientation(&self) -> Orientation {
        L::ORIENTATION
    }
}

/// Matrices are equal when their extents and stored entries match
impl<T: MatrixElement, L: Layout> PartialEq for VectorOfVectorMatrix<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .entries(L::ORIENTATION)
                .eq(other.entries(L::ORIENTATION))
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrixMut for VectorOfVectorMatrix<T, L> {
    fn create(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        Self::with_capacity(rows, cols, reserve_hint)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        let (major, minor) = self.key(row, col);
        self.data.entry(major).or_default().insert(minor, value);
    }

    fn erase(&mut self, row: usize, col: usize) {
        let (major, minor) = self.key(row, col);
        if let Some(line) = self.data.get_mut(&major) {
            line.remove(&minor);
        }
    }

    fn clear(&mut self) {
        self.reset_lines();
    }

    fn push_back(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.set(row, col, value);
        Ok(())
    }

    fn pop_back(&mut self) -> Result<()> {
        let last = self
            .data
            .values_mut()
            .rev()
            .find_map(|line| line.pop_last());
        last.map(|_| ()).ok_or(SparseError::Underflow)
    }

    fn reserve(&mut self, capacity: usize, preserve: bool) {
        debug!(capacity, preserve, "vector-of-vector reserve");
        self.reserve_hint = capacity;
        if !preserve {
            self.reset_lines();
        }
    }

    fn resize(&mut self, rows: usize, cols: usize, preserve: bool) -> Result<()> {
        if preserve {
            return Err(SparseError::PreserveUnsupported);
        }
        debug!(rows, cols, "vector-of-vector resize");
        self.rows = rows;
        self.cols = cols;
        self.reset_lines();
        Ok(())
    }

    fn at_element(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let (major, minor) = self.key(row, col);
        self.data
            .get_mut(&major)
            .and_then(|line| line.get_mut(&minor))
            .ok_or(SparseError::MissingElement)
    }
}

impl<T: MatrixElement, L: Layout> Traverse for VectorOfVectorMatrix<T, L> {
    /// `(major, minor)` of a stored entry
    type Pos = (usize, usize);

    fn major_axis(&self) -> Axis {
        L::major_axis()
    }

    fn is_fast(&self, axis: Axis) -> bool {
        L::is_fast(axis)
    }

    fn find_pos(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        let (major, minor) = self.key(row, col);
        let line = self.data.get(&major)?;
        line.contains_key(&minor).then_some((major, minor))
    }

    fn line_search(
        &self,
        major: usize,
        minor: usize,
        direction: Direction,
    ) -> Option<(usize, (usize, usize))> {
        let line = self.data.get(&major)?;
        let found = match direction {
            Direction::Forward => line.range(minor..).next(),
            Direction::Backward => line.range(..=minor).next_back(),
        };
        found.map(|(&minor, _)| (minor, (major, minor)))
    }

    fn neighbor(
        &self,
        from: &Located<(usize, usize)>,
        direction: Direction,
    ) -> Option<Located<(usize, usize)>> {
        let (major, minor) = from.pos;
        let line = self.data.get(&major)?;
        let found = match direction {
            Direction::Forward => line
                .range((Bound::Excluded(minor), Bound::Unbounded))
                .next(),
            Direction::Backward => line.range(..minor).next_back(),
        };
        found.map(|(&minor, _)| {
            let (row, col) = L::from_major_minor(major, minor);
            Located::entry(row, col, (major, minor))
        })
    }

    fn value_at(&self, pos: (usize, usize)) -> T {
        let (major, minor) = pos;
        self.data
            .get(&major)
            .and_then(|line| line.get(&minor))
            .copied()
            .unwrap_or_else(T::zero)
    }
}

//! Coordinate (triplet) sparse storage
//!
//! `set` appends a `(major, minor, value)` triplet without looking at what is
//! already stored. Duplicates are merged lazily: every read, erase and
//! capacity change first sorts the triplets and keeps the value appended
//! last for each key. Bulk loading is therefore O(1) per entry, paid back by
//! one sort before the first lookup.
//!
//! The lazy sort runs behind `&self`, so the triplets sit in a `RefCell` and
//! the engine is not `Sync`.
//!
//! As in compressed storage, stored indices are shifted by the index base so
//! the raw arrays can be handed to one-based consumers.

mod merge;

use std::cell::RefCell;
use std::marker::PhantomData;

use sparsekit_core::traverse::{Direction, Located, Traverse};
use sparsekit_core::validation::{grown_capacity, max_nonzeros};
use sparsekit_core::{
    Axis, Layout, MatrixElement, Orientation, Result, RowMajor, SparseError, SparseMatrix,
    SparseMatrixMut,
};
use tracing::debug;

use crate::config::StorageConfig;

/// Parallel arrays of appended entries
#[derive(Debug, Clone)]
struct Triplets<T> {
    majors: Vec<usize>,
    minors: Vec<usize>,
    values: Vec<T>,
    /// Ordered by `(major, minor)` with no repeated key
    sorted: bool,
    /// Added to every stored index
    base: usize,
}

impl<T> Triplets<T> {
    fn with_capacity(capacity: usize, base: usize) -> Self {
        Self {
            majors: Vec::with_capacity(capacity),
            minors: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            sorted: true,
            base,
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn clear(&mut self) {
        self.majors.clear();
        self.minors.clear();
        self.values.clear();
        self.sorted = true;
    }

    fn reserve_to(&mut self, capacity: usize) {
        let extra = capacity.saturating_sub(self.len());
        self.majors.reserve_exact(extra);
        self.minors.reserve_exact(extra);
        self.values.reserve_exact(extra);
    }

    /// Zero-based key of the triplet appended last
    fn last_key(&self) -> Option<(usize, usize)> {
        Some((*self.majors.last()? - self.base, *self.minors.last()? - self.base))
    }

    /// Append one triplet, keeping the sorted flag only for ascending keys
    fn push(&mut self, major: usize, minor: usize, value: T) {
        self.sorted = self.sorted && self.last_key().map_or(true, |last| (major, minor) > last);
        self.majors.push(self.base + major);
        self.minors.push(self.base + minor);
        self.values.push(value);
    }

    fn major_at(&self, pos: usize) -> usize {
        self.majors[pos] - self.base
    }

    fn minor_at(&self, pos: usize) -> usize {
        self.minors[pos] - self.base
    }

    /// Array range of one major line; requires sorted triplets
    fn line(&self, major: usize) -> std::ops::Range<usize> {
        debug_assert!(self.sorted);
        let stored_major = self.base + major;
        let start = self.majors.partition_point(|&stored| stored < stored_major);
        let end = self.majors.partition_point(|&stored| stored <= stored_major);
        start..end
    }

    /// `Ok(pos)` of a stored key; requires sorted triplets
    fn search(&self, major: usize, minor: usize) -> std::result::Result<usize, usize> {
        let line = self.line(major);
        let start = line.start;
        self.minors[line]
            .binary_search(&(self.base + minor))
            .map(|pos| start + pos)
            .map_err(|pos| start + pos)
    }
}

/// Sparse matrix stored as an append-only triplet list
#[derive(Debug, Clone)]
pub struct CoordinateMatrix<T, L = RowMajor> {
    rows: usize,
    cols: usize,
    capacity: usize,
    parallel_sort_threshold: usize,
    storage: RefCell<Triplets<T>>,
    _layout: PhantomData<L>,
}

impl<T: MatrixElement, L: Layout> CoordinateMatrix<T, L> {
    /// Empty `rows` x `cols` matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(rows, cols, &StorageConfig::default())
    }

    /// Empty matrix with room for about `reserve_hint` triplets
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
            parallel_sort_threshold: config.parallel_sort_threshold,
            storage: RefCell::new(Triplets::with_capacity(capacity, index_base)),
            _layout: PhantomData,
        }
    }

    /// Number of triplet slots before the next growth
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index base of the raw arrays
    pub fn index_base(&self) -> usize {
        self.storage.borrow().base
    }

    /// Triplets currently held, duplicates included
    pub fn filled(&self) -> usize {
        self.storage.borrow().len()
    }

    /// Whether the triplets are sorted and merged
    pub fn is_sorted(&self) -> bool {
        self.storage.borrow().sorted
    }

    /// Sort and merge pending triplets
    pub fn sort(&self) {
        let mut storage = self.storage.borrow_mut();
        if !storage.sorted {
            merge::sort_and_compact(&mut storage, self.parallel_sort_threshold);
        }
    }

    /// Major index of every entry, after sorting, shifted by the index base
    pub fn index1_data(&mut self) -> &[usize] {
        self.sort();
        &self.storage.get_mut().majors
    }

    /// Minor index of every entry, after sorting, shifted by the index base
    pub fn index2_data(&mut self) -> &[usize] {
        self.sort();
        &self.storage.get_mut().minors
    }

    /// Value of every entry, after sorting
    pub fn value_data(&mut self) -> &[T] {
        self.sort();
        &self.storage.get_mut().values
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

    /// Append one triplet, growing first when full
    ///
    /// Growth sorts, so the sorted flag is recomputed against the new tail.
    fn append(&mut self, major: usize, minor: usize, value: T) {
        if self.storage.get_mut().len() >= self.capacity {
            let capacity = max_nonzeros(grown_capacity(self.capacity), self.rows, self.cols);
            self.reserve(capacity, true);
        }
        self.storage.get_mut().push(major, minor, value);
    }

    /// Sorted triplets for a read
    fn sorted(&self) -> std::cell::Ref<'_, Triplets<T>> {
        self.sort();
        self.storage.borrow()
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrix for CoordinateMatrix<T, L> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        let (major, minor) = self.key(row, col);
        let storage = self.sorted();
        storage.search(major, minor).ok().map(|pos| storage.values[pos])
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn nnz(&self) -> usize {
        self.sorted().len()
    }

    fn orientation(&self) -> Orientation {
        L::ORIENTATION
    }
}

/// Matrices are equal when their extents and stored entries match
impl<T: MatrixElement, L: Layout> PartialEq for CoordinateMatrix<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .entries(L::ORIENTATION)
                .eq(other.entries(L::ORIENTATION))
    }
}

impl<T: MatrixElement, L: Layout> SparseMatrixMut for CoordinateMatrix<T, L> {
    fn create(rows: usize, cols: usize, reserve_hint: usize) -> Self {
        Self::with_capacity(rows, cols, reserve_hint)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        let (major, minor) = self.key(row, col);
        self.append(major, minor, value);
    }

    fn erase(&mut self, row: usize, col: usize) {
        let (major, minor) = self.key(row, col);
        self.sort();
        let storage = self.storage.get_mut();
        if let Ok(pos) = storage.search(major, minor) {
            storage.majors.remove(pos);
            storage.minors.remove(pos);
            storage.values.remove(pos);
        }
    }

    fn clear(&mut self) {
        self.storage.get_mut().clear();
    }

    fn push_back(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (major, minor) = self.key(row, col);
        if let Some(last) = self.storage.get_mut().last_key() {
            if (major, minor) <= last {
                return Err(SparseError::OrderViolation);
            }
        }
        self.append(major, minor, value);
        Ok(())
    }

    fn pop_back(&mut self) -> Result<()> {
        let storage = self.storage.get_mut();
        if storage.values.pop().is_none() {
            return Err(SparseError::Underflow);
        }
        storage.majors.pop();
        storage.minors.pop();
        Ok(())
    }

    fn reserve(&mut self, capacity: usize, preserve: bool) {
        self.sort();
        let storage = self.storage.get_mut();
        let mut capacity = max_nonzeros(capacity, self.rows, self.cols);
        if preserve {
            capacity = capacity.max(storage.len());
        } else {
            storage.clear();
        }
        debug!(from = self.capacity, to = capacity, preserve, "coordinate matrix reserve");
        storage.reserve_to(capacity);
        self.capacity = capacity;
    }

    fn resize(&mut self, rows: usize, cols: usize, preserve: bool) -> Result<()> {
        if preserve {
            return Err(SparseError::PreserveUnsupported);
        }
        debug!(rows, cols, "coordinate matrix resize");
        self.rows = rows;
        self.cols = cols;
        self.capacity = max_nonzeros(self.capacity, rows, cols);
        self.storage.get_mut().clear();
        Ok(())
    }

    fn at_element(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let (major, minor) = self.key(row, col);
        self.sort();
        let storage = self.storage.get_mut();
        let pos = storage
            .search(major, minor)
            .map_err(|_| SparseError::MissingElement)?;
        Ok(&mut storage.values[pos])
    }
}

impl<T: MatrixElement, L: Layout> Traverse for CoordinateMatrix<T, L> {
    /// Position in the sorted triplet arrays
    type Pos = usize;

    fn major_axis(&self) -> Axis {
        L::major_axis()
    }

    fn is_fast(&self, axis: Axis) -> bool {
        L::is_fast(axis)
    }

    fn find_pos(&self, row: usize, col: usize) -> Option<usize> {
        let (major, minor) = self.key(row, col);
        self.sorted().search(major, minor).ok()
    }

    fn line_search(
        &self,
        major: usize,
        minor: usize,
        direction: Direction,
    ) -> Option<(usize, usize)> {
        let storage = self.sorted();
        let line = storage.line(major);
        let minors = &storage.minors[line.clone()];
        let stored_minor = storage.base + minor;
        let pos = match direction {
            Direction::Forward => {
                let pos = line.start + minors.partition_point(|&stored| stored < stored_minor);
                (pos < line.end).then_some(pos)?
            }
            Direction::Backward => {
                let end = line.start + minors.partition_point(|&stored| stored <= stored_minor);
                (end > line.start).then(|| end - 1)?
            }
        };
        Some((storage.minor_at(pos), pos))
    }

    fn neighbor(&self, from: &Located<usize>, direction: Direction) -> Option<Located<usize>> {
        let storage = self.sorted();
        let major = L::major(from.row, from.col);
        let pos = match direction {
            Direction::Forward => from.pos + 1,
            Direction::Backward => from.pos.checked_sub(1)?,
        };
        if pos >= storage.len() || storage.major_at(pos) != major {
            return None;
        }
        let (row, col) = L::from_major_minor(major, storage.minor_at(pos));
        Some(Located::entry(row, col, pos))
    }

    fn value_at(&self, pos: usize) -> T {
        self.sorted().values[pos]
    }
}

//! Core matrix abstraction traits
//!
//! This module defines the read and write interfaces every storage engine
//! satisfies. Reads never mutate logical content; positions without a stored
//! entry read as the element's zero.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use super::element::MatrixElement;
use super::element_ref::ElementRef;
use crate::layout::Orientation;
use crate::traverse::Traverse;
use crate::validation::check_index;
use crate::Result;

/// Read access shared by all storage engines
pub trait SparseMatrix {
    /// The element type stored in this matrix
    type Element: MatrixElement;

    /// Get a stored element
    ///
    /// Returns `None` if no entry is stored at the position. Explicitly
    /// stored zeros are returned as `Some`.
    fn get_element(&self, row: usize, col: usize) -> Option<Self::Element>;

    /// Get matrix dimensions as (rows, cols)
    fn dimensions(&self) -> (usize, usize);

    /// Get number of stored entries, explicit zeros included
    fn nnz(&self) -> usize;

    /// Physical ordering of stored entries
    fn orientation(&self) -> Orientation;

    /// Value at `(row, col)`, zero when nothing is stored
    fn get(&self, row: usize, col: usize) -> Self::Element {
        self.get_element(row, col)
            .unwrap_or_else(<Self::Element as MatrixElement>::zero)
    }

    /// Bounds-checked [`SparseMatrix::get`]
    fn try_get(&self, row: usize, col: usize) -> Result<Self::Element> {
        let (rows, cols) = self.dimensions();
        check_index(row, col, rows, cols)?;
        Ok(self.get(row, col))
    }

    /// Number of rows
    fn rows(&self) -> usize {
        self.dimensions().0
    }

    /// Number of columns
    fn cols(&self) -> usize {
        self.dimensions().1
    }
}

/// Mutation interface shared by all storage engines
///
/// Index arguments are preconditions: out-of-range indices are asserted in
/// debug builds. The `try_*` variants check them and report
/// [`crate::SparseError::IndexOutOfBounds`] instead.
pub trait SparseMatrixMut: SparseMatrix {
    /// Empty matrix with capacity for at least `reserve_hint` entries
    fn create(rows: usize, cols: usize, reserve_hint: usize) -> Self
    where
        Self: Sized;

    /// Store `value` at `(row, col)`, replacing any existing entry
    ///
    /// Zero values are stored explicitly.
    fn set(&mut self, row: usize, col: usize, value: Self::Element);

    /// Remove the entry at `(row, col)`; a no-op when none is stored
    fn erase(&mut self, row: usize, col: usize);

    /// Remove all entries, keeping extents
    fn clear(&mut self);

    /// Append an entry whose key is strictly greater than the last one
    ///
    /// Keys compare in layout order. Engines without an append fast path
    /// accept any key.
    fn push_back(&mut self, row: usize, col: usize, value: Self::Element) -> Result<()>;

    /// Remove the last entry
    fn pop_back(&mut self) -> Result<()>;

    /// Adjust capacity
    ///
    /// With `preserve` set, entries survive. Without it the matrix is emptied.
    fn reserve(&mut self, capacity: usize, preserve: bool);

    /// Change extents, discarding all entries
    ///
    /// Keeping entries across a resize is not supported; asking for it
    /// leaves the matrix untouched.
    fn resize(&mut self, rows: usize, cols: usize, preserve: bool) -> Result<()>;

    /// Mutable reference to a stored entry
    fn at_element(&mut self, row: usize, col: usize) -> Result<&mut Self::Element>;

    /// Bounds-checked [`SparseMatrixMut::set`]
    fn try_set(&mut self, row: usize, col: usize, value: Self::Element) -> Result<()> {
        let (rows, cols) = self.dimensions();
        check_index(row, col, rows, cols)?;
        self.set(row, col, value);
        Ok(())
    }

    /// Proxy that reads and writes one position
    fn element_mut(&mut self, row: usize, col: usize) -> ElementRef<'_, Self> {
        ElementRef::new(self, row, col)
    }

    /// Build a matrix from `(row, col, value)` triples
    ///
    /// Later duplicates overwrite earlier ones.
    fn from_entries<I>(rows: usize, cols: usize, entries: I) -> Self
    where
        Self: Sized,
        I: IntoIterator<Item = (usize, usize, Self::Element)>,
    {
        let mut matrix = Self::create(rows, cols, 0);
        for (row, col, value) in entries {
            matrix.set(row, col, value);
        }
        matrix
    }

    /// Copy the stored entries of another matrix, whatever its engine
    ///
    /// Entries are appended in this matrix's own layout order.
    fn from_sparse<S>(source: &S) -> Result<Self>
    where
        Self: Sized,
        S: Traverse<Element = Self::Element> + ?Sized,
    {
        let (rows, cols) = source.dimensions();
        let mut matrix = Self::create(rows, cols, source.nnz());
        let order = matrix.orientation();
        for (row, col, value) in source.entries(order) {
            matrix.push_back(row, col, value)?;
        }
        Ok(matrix)
    }
}

/// Extension trait for row/column extraction (requires alloc feature)
#[cfg(feature = "alloc")]
pub trait MatrixOperations: SparseMatrix {
    /// Get all stored elements in a row
    ///
    /// Returns `(col, value)` pairs in column order.
    fn get_row(&self, row_index: usize) -> Vec<(usize, Self::Element)>;

    /// Get all stored elements in a column
    ///
    /// Returns `(row, value)` pairs in row order.
    fn get_col(&self, col_index: usize) -> Vec<(usize, Self::Element)>;
}

#[cfg(feature = "alloc")]
impl<M: Traverse + ?Sized> MatrixOperations for M {
    fn get_row(&self, row_index: usize) -> Vec<(usize, Self::Element)> {
        self.row(row_index)
            .map(|(_, col, value)| (col, value))
            .collect()
    }

    fn get_col(&self, col_index: usize) -> Vec<(usize, Self::Element)> {
        self.col(col_index)
            .map(|(row, _, value)| (row, value))
            .collect()
    }
}

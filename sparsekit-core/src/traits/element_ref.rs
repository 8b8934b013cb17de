//! Write-through proxy for a single matrix position

use super::matrix::SparseMatrixMut;
use crate::traits::MatrixElement;

/// Handle to one `(row, col)` position of a mutable matrix
///
/// Reads go through [`crate::SparseMatrix::get`], so an absent entry reads as
/// zero. Writes store explicitly, zeros included.
pub struct ElementRef<'a, M: SparseMatrixMut + ?Sized> {
    matrix: &'a mut M,
    row: usize,
    col: usize,
}

impl<'a, M: SparseMatrixMut + ?Sized> ElementRef<'a, M> {
    pub(crate) fn new(matrix: &'a mut M, row: usize, col: usize) -> Self {
        Self { matrix, row, col }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Current value, zero when not stored
    pub fn read(&self) -> M::Element {
        self.matrix.get(self.row, self.col)
    }

    /// Whether an entry is stored at this position
    pub fn is_stored(&self) -> bool {
        self.matrix.get_element(self.row, self.col).is_some()
    }

    /// Store `value` at this position
    pub fn write(&mut self, value: M::Element) {
        self.matrix.set(self.row, self.col, value);
    }

    /// Read, transform and store in one step
    pub fn update<F>(&mut self, f: F) -> M::Element
    where
        F: FnOnce(M::Element) -> M::Element,
    {
        let value = f(self.read());
        self.write(value);
        value
    }

    /// Remove the stored entry, if any
    pub fn erase(&mut self) {
        self.matrix.erase(self.row, self.col);
    }

    /// Remove the entry when its value is zero
    pub fn prune_zero(&mut self) {
        if self.is_stored() && self.read().is_zero() {
            self.erase();
        }
    }
}

//! Dual cursor traversal protocol
//!
//! Every storage engine implements [`Traverse`], which exposes two primitives:
//! an exact lookup and a search along one major line. The provided methods
//! turn those into cursors that walk rows or columns in either direction,
//! whatever the physical layout is.
//!
//! Cursors come in two ranks. A [`Rank::Logical`] cursor visits every index
//! of its axis, one step at a time, and reads values through the matrix.
//! A [`Rank::Stored`] cursor only visits stored entries. When it sits on an
//! entry and its axis matches the physical layout it steps to the physical
//! neighbour in O(1); otherwise it moves its logical index by one and
//! re-resolves through [`Traverse::locate`].
//!
//! The outer cursor of a traversal is logical. Its dual, rooted at the
//! current outer index and advancing the other axis, is stored. That pairing
//! is what [`Entries`] and [`Line`] are built from.

use crate::layout::{Axis, Orientation};
use crate::traits::{MatrixElement, SparseMatrix};

/// Stepping mode of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// Logical position, every index is visited
    Logical,
    /// Walks stored entries only
    Stored,
}

/// Search direction along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards larger indices
    Forward,
    /// Towards smaller indices
    Backward,
}

/// Result of a locate call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<P> {
    /// Rank of the cursor built from this result
    pub rank: Rank,
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Engine-specific physical position, meaningful when `on_entry` is set
    pub pos: P,
    /// A stored entry sits at `(row, col)` and `pos` points at it
    pub on_entry: bool,
}

impl<P: Default> Located<P> {
    /// A position with no stored entry behind it
    pub fn between(rank: Rank, row: usize, col: usize) -> Self {
        Self {
            rank,
            row,
            col,
            pos: P::default(),
            on_entry: false,
        }
    }

    /// A stored entry at `(row, col)`
    pub fn entry(row: usize, col: usize, pos: P) -> Self {
        Self {
            rank: Rank::Stored,
            row,
            col,
            pos,
            on_entry: true,
        }
    }
}

/// Traversal primitives every storage engine provides
pub trait Traverse: SparseMatrix {
    /// Physical position of a stored entry
    type Pos: Copy + Default + PartialEq + core::fmt::Debug;

    /// Axis whose index is the major index of the physical layout
    fn major_axis(&self) -> Axis;

    /// Exact lookup of a stored entry
    fn find_pos(&self, row: usize, col: usize) -> Option<Self::Pos>;

    /// Search one major line for the first stored minor index at or after
    /// (`Forward`) or at or before (`Backward`) `minor`
    ///
    /// `minor` is always inside the minor extent.
    fn line_search(
        &self,
        major: usize,
        minor: usize,
        direction: Direction,
    ) -> Option<(usize, Self::Pos)>;

    /// Physical neighbour of a stored entry along a fast axis
    ///
    /// Returns `None` when the neighbour would leave the major line of `from`.
    fn neighbor(
        &self,
        from: &Located<Self::Pos>,
        direction: Direction,
    ) -> Option<Located<Self::Pos>>;

    /// Value of the stored entry at `pos`
    fn value_at(&self, pos: Self::Pos) -> Self::Element;

    /// Whether a cursor advancing `axis` may step physically
    fn is_fast(&self, axis: Axis) -> bool {
        axis != self.major_axis()
    }

    /// Nearest stored entry along `axis`, starting at `(row, col)`
    ///
    /// The index that `axis` advances is the starting point; the other index
    /// stays fixed. Forward searches starting at or past the extent find
    /// nothing; backward searches start at the last valid index.
    fn locate_entry(
        &self,
        row: usize,
        col: usize,
        axis: Axis,
        direction: Direction,
    ) -> Option<Located<Self::Pos>> {
        let (rows, cols) = self.dimensions();
        let extent = axis.extent(rows, cols);
        let fixed_extent = axis.dual().extent(rows, cols);
        if extent == 0 || axis.dual().pick(row, col) >= fixed_extent {
            return None;
        }
        let start = axis.pick(row, col);
        if direction == Direction::Forward && start >= extent {
            return None;
        }
        let start = start.min(extent - 1);

        if axis == self.major_axis() {
            // One exact lookup per major line at the fixed minor index
            let at_index = |index: usize| {
                let (row, col) = axis.with_index(row, col, index);
                self.find_pos(row, col)
                    .map(|pos| Located::entry(row, col, pos))
            };
            match direction {
                Direction::Forward => (start..extent).find_map(at_index),
                Direction::Backward => (0..=start).rev().find_map(at_index),
            }
        } else {
            let major = self.major_axis().pick(row, col);
            self.line_search(major, start, direction).map(|(minor, pos)| {
                let (row, col) = axis.with_index(row, col, minor);
                Located::entry(row, col, pos)
            })
        }
    }

    /// Resolve a cursor position
    ///
    /// A logical rank positions the cursor exactly at `(row, col)`. A stored
    /// rank moves it to the nearest stored entry in `direction`, or to the
    /// `end` sentinel (index = extent) when searching forward and the `rend`
    /// sentinel (index 0, no entry) when searching backward.
    fn locate(
        &self,
        rank: Rank,
        row: usize,
        col: usize,
        axis: Axis,
        direction: Direction,
    ) -> Located<Self::Pos> {
        if rank == Rank::Logical {
            return Located::between(rank, row, col);
        }
        match self.locate_entry(row, col, axis, direction) {
            Some(located) => located,
            None => {
                let (rows, cols) = self.dimensions();
                let index = match direction {
                    Direction::Forward => axis.extent(rows, cols),
                    Direction::Backward => 0,
                };
                let (row, col) = axis.with_index(row, col, index);
                Located::between(Rank::Stored, row, col)
            }
        }
    }

    /// Cursor resolved by [`Traverse::locate`]
    fn find(
        &self,
        rank: Rank,
        row: usize,
        col: usize,
        axis: Axis,
        direction: Direction,
    ) -> Cursor<'_, Self> {
        Cursor::new(self, axis, self.locate(rank, row, col, axis, direction))
    }

    /// Logical cursor at index 0 of `axis`
    fn begin(&self, axis: Axis) -> Cursor<'_, Self> {
        Cursor::new(self, axis, Located::between(Rank::Logical, 0, 0))
    }

    /// Logical cursor one past the last index of `axis`
    fn end(&self, axis: Axis) -> Cursor<'_, Self> {
        let (rows, cols) = self.dimensions();
        let (row, col) = axis.with_index(0, 0, axis.extent(rows, cols));
        Cursor::new(self, axis, Located::between(Rank::Logical, row, col))
    }

    /// Stored entries of one row, in column order
    fn row(&self, row: usize) -> Line<'_, Self> {
        let outer = Cursor::new(self, Axis::Row, Located::between(Rank::Logical, row, 0));
        outer.dual_line()
    }

    /// Stored entries of one column, in row order
    fn col(&self, col: usize) -> Line<'_, Self> {
        let outer = Cursor::new(self, Axis::Col, Located::between(Rank::Logical, 0, col));
        outer.dual_line()
    }

    /// Every stored entry in `order`, independent of the physical layout
    fn entries(&self, order: Orientation) -> Entries<'_, Self> {
        Entries::new(self, order)
    }
}

/// Position in a matrix that advances along one axis
pub struct Cursor<'a, M: Traverse + ?Sized> {
    matrix: &'a M,
    axis: Axis,
    rank: Rank,
    row: usize,
    col: usize,
    pos: M::Pos,
    on_entry: bool,
}

impl<'a, M: Traverse + ?Sized> Clone for Cursor<'a, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, M: Traverse + ?Sized> Copy for Cursor<'a, M> {}

impl<'a, M: Traverse + ?Sized> PartialEq for Cursor<'a, M> {
    fn eq(&self, other: &Self) -> bool {
        self.axis == other.axis
            && self.rank == other.rank
            && self.row == other.row
            && self.col == other.col
            && self.on_entry == other.on_entry
    }
}

impl<'a, M: Traverse + ?Sized> Eq for Cursor<'a, M> {}

impl<'a, M: Traverse + ?Sized> core::fmt::Debug for Cursor<'a, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("axis", &self.axis)
            .field("rank", &self.rank)
            .field("row", &self.row)
            .field("col", &self.col)
            .field("pos", &self.pos)
            .field("on_entry", &self.on_entry)
            .finish()
    }
}

impl<'a, M: Traverse + ?Sized> Cursor<'a, M> {
    /// Build a cursor from a locate result
    pub fn new(matrix: &'a M, axis: Axis, located: Located<M::Pos>) -> Self {
        Self {
            matrix,
            axis,
            rank: located.rank,
            row: located.row,
            col: located.col,
            pos: located.pos,
            on_entry: located.on_entry,
        }
    }

    /// Axis this cursor advances
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Stepping mode
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Current row
    pub fn row(&self) -> usize {
        self.row
    }

    /// Current column
    pub fn col(&self) -> usize {
        self.col
    }

    /// Index along the cursor's axis
    pub fn index(&self) -> usize {
        self.axis.pick(self.row, self.col)
    }

    /// Whether a stored entry backs this position
    pub fn is_entry(&self) -> bool {
        self.on_entry
    }

    /// Physical position of the backing entry
    pub fn position(&self) -> Option<M::Pos> {
        self.on_entry.then_some(self.pos)
    }

    /// Whether the cursor sits one past the last index of its axis
    pub fn is_end(&self) -> bool {
        let (rows, cols) = self.matrix.dimensions();
        self.index() >= self.axis.extent(rows, cols)
    }

    /// Value at the current position
    ///
    /// Sentinel positions outside the matrix read as zero.
    pub fn value(&self) -> M::Element {
        if self.on_entry {
            return self.matrix.value_at(self.pos);
        }
        let (rows, cols) = self.matrix.dimensions();
        if self.row < rows && self.col < cols {
            self.matrix.get(self.row, self.col)
        } else {
            <M::Element as MatrixElement>::zero()
        }
    }

    fn located(&self) -> Located<M::Pos> {
        Located {
            rank: self.rank,
            row: self.row,
            col: self.col,
            pos: self.pos,
            on_entry: self.on_entry,
        }
    }

    fn place(&mut self, located: Located<M::Pos>) {
        self.rank = located.rank;
        self.row = located.row;
        self.col = located.col;
        self.pos = located.pos;
        self.on_entry = located.on_entry;
    }

    fn park(&mut self, index: usize) {
        let (row, col) = self.axis.with_index(self.row, self.col, index);
        self.place(Located::between(self.rank, row, col));
    }

    /// Step to the next position along the axis
    pub fn advance(&mut self) {
        debug_assert!(!self.is_end(), "advance past the end of an axis");
        let index = self.index();
        match self.rank {
            Rank::Logical => self.park(index + 1),
            Rank::Stored => {
                if self.on_entry && self.matrix.is_fast(self.axis) {
                    match self.matrix.neighbor(&self.located(), Direction::Forward) {
                        Some(next) => self.place(next),
                        None => {
                            let (rows, cols) = self.matrix.dimensions();
                            self.park(self.axis.extent(rows, cols));
                        }
                    }
                } else {
                    // Off-entry stored positions are sentinels; `rend` has not
                    // visited its own index yet
                    let next = if self.on_entry { index + 1 } else { index };
                    let (row, col) = self.axis.with_index(self.row, self.col, next);
                    let next = self
                        .matrix
                        .locate(Rank::Stored, row, col, self.axis, Direction::Forward);
                    self.place(next);
                }
            }
        }
    }

    /// Step to the previous position along the axis
    pub fn retreat(&mut self) {
        let index = self.index();
        match self.rank {
            Rank::Logical => {
                debug_assert!(index > 0, "retreat before the start of an axis");
                self.park(index.saturating_sub(1));
            }
            Rank::Stored => {
                if self.on_entry && self.matrix.is_fast(self.axis) {
                    match self.matrix.neighbor(&self.located(), Direction::Backward) {
                        Some(previous) => self.place(previous),
                        None => self.park(0),
                    }
                } else if index == 0 {
                    self.park(0);
                } else {
                    let (row, col) = self.axis.with_index(self.row, self.col, index - 1);
                    let previous = self
                        .matrix
                        .locate(Rank::Stored, row, col, self.axis, Direction::Backward);
                    self.place(previous);
                }
            }
        }
    }

    /// First stored entry on the other axis, rooted at the current index
    pub fn dual_begin(&self) -> Cursor<'a, M> {
        let dual = self.axis.dual();
        let (row, col) = dual.with_index(self.row, self.col, 0);
        Cursor::new(
            self.matrix,
            dual,
            self.matrix.locate(Rank::Stored, row, col, dual, Direction::Forward),
        )
    }

    /// End sentinel on the other axis, rooted at the current index
    pub fn dual_end(&self) -> Cursor<'a, M> {
        let dual = self.axis.dual();
        let (rows, cols) = self.matrix.dimensions();
        let (row, col) = dual.with_index(self.row, self.col, dual.extent(rows, cols));
        Cursor::new(self.matrix, dual, Located::between(Rank::Stored, row, col))
    }

    /// Stored entries on the other axis, rooted at the current index
    pub fn dual_line(&self) -> Line<'a, M> {
        Line {
            front: self.dual_begin(),
            back: self.dual_end(),
        }
    }
}

/// Stored entries of one row or column
///
/// Yields `(row, col, value)` and can be walked from either end.
pub struct Line<'a, M: Traverse + ?Sized> {
    front: Cursor<'a, M>,
    back: Cursor<'a, M>,
}

impl<'a, M: Traverse + ?Sized> Iterator for Line<'a, M> {
    type Item = (usize, usize, M::Element);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = (self.front.row(), self.front.col(), self.front.value());
        self.front.advance();
        Some(item)
    }
}

impl<'a, M: Traverse + ?Sized> DoubleEndedIterator for Line<'a, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back.retreat();
        Some((self.back.row(), self.back.col(), self.back.value()))
    }
}

/// Every stored entry of a matrix in a chosen order
///
/// An outer logical cursor walks the outer axis; at each index its dual
/// [`Line`] yields the stored entries. Both ends can be consumed.
pub struct Entries<'a, M: Traverse + ?Sized> {
    front_outer: Cursor<'a, M>,
    back_outer: Cursor<'a, M>,
    front: Option<Line<'a, M>>,
    back: Option<Line<'a, M>>,
    remaining: usize,
}

impl<'a, M: Traverse + ?Sized> Entries<'a, M> {
    fn new(matrix: &'a M, order: Orientation) -> Self {
        let axis = order.outer_axis();
        Self {
            front_outer: matrix.begin(axis),
            back_outer: matrix.end(axis),
            front: None,
            back: None,
            remaining: matrix.nnz(),
        }
    }
}

impl<'a, M: Traverse + ?Sized> Iterator for Entries<'a, M> {
    type Item = (usize, usize, M::Element);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Some(item) = self.front.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(item);
            }
            if self.front_outer.is_end() {
                break;
            }
            self.front = Some(self.front_outer.dual_line());
            self.front_outer.advance();
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, M: Traverse + ?Sized> DoubleEndedIterator for Entries<'a, M> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Some(item) = self.back.as_mut().and_then(DoubleEndedIterator::next_back) {
                self.remaining -= 1;
                return Some(item);
            }
            if self.back_outer.index() == 0 {
                break;
            }
            self.back_outer.retreat();
            self.back = Some(self.back_outer.dual_line());
        }
        None
    }
}

impl<'a, M: Traverse + ?Sized> ExactSizeIterator for Entries<'a, M> {}

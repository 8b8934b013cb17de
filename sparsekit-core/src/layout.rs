//! Row-major and column-major layout policies
//!
//! A layout maps a logical `(row, col)` pair onto a `(major, minor)` pair and
//! a linear address. Storage engines key and order their entries by that
//! address, so a layout also decides which traversal direction is cheap.

/// Index that a cursor advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The row index changes, the column stays fixed
    Row,
    /// The column index changes, the row stays fixed
    Col,
}

impl Axis {
    /// The other axis
    pub const fn dual(self) -> Self {
        match self {
            Axis::Row => Axis::Col,
            Axis::Col => Axis::Row,
        }
    }

    /// Extent of this axis for a `rows` x `cols` matrix
    pub const fn extent(self, rows: usize, cols: usize) -> usize {
        match self {
            Axis::Row => rows,
            Axis::Col => cols,
        }
    }

    /// Component of `(row, col)` that this axis advances
    pub const fn pick(self, row: usize, col: usize) -> usize {
        match self {
            Axis::Row => row,
            Axis::Col => col,
        }
    }

    /// Replace the component of `(row, col)` that this axis advances
    pub const fn with_index(self, row: usize, col: usize, index: usize) -> (usize, usize) {
        match self {
            Axis::Row => (index, col),
            Axis::Col => (row, index),
        }
    }
}

/// Ordering of entries, either as a physical layout or a traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Rows outer, columns inner
    RowMajor,
    /// Columns outer, rows inner
    ColumnMajor,
}

impl Orientation {
    /// Axis walked by the outer loop of a traversal in this order
    pub const fn outer_axis(self) -> Axis {
        match self {
            Orientation::RowMajor => Axis::Row,
            Orientation::ColumnMajor => Axis::Col,
        }
    }
}

impl core::fmt::Display for Orientation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Orientation::RowMajor => write!(f, "row-major"),
            Orientation::ColumnMajor => write!(f, "column-major"),
        }
    }
}

/// Layout policy shared by all storage engines
///
/// Implementations are stateless; every function is pure index arithmetic.
pub trait Layout: Copy + Default + core::fmt::Debug + 'static {
    /// Which orientation this policy describes
    const ORIENTATION: Orientation;

    /// Stepping along the major axis from a physical position is O(1)
    const FAST_MAJOR: bool = false;

    /// Stepping along the minor axis from a physical position is O(1)
    const FAST_MINOR: bool = true;

    /// Axis whose index is the major index
    fn major_axis() -> Axis;

    /// Major index of `(row, col)`
    fn major(row: usize, col: usize) -> usize;

    /// Minor index of `(row, col)`
    fn minor(row: usize, col: usize) -> usize;

    /// Rebuild `(row, col)` from a major/minor pair
    fn from_major_minor(major: usize, minor: usize) -> (usize, usize);

    /// Number of major lines in a `rows` x `cols` matrix
    fn major_extent(rows: usize, cols: usize) -> usize {
        Self::major_axis().extent(rows, cols)
    }

    /// Length of each major line in a `rows` x `cols` matrix
    fn minor_extent(rows: usize, cols: usize) -> usize {
        Self::major_axis().dual().extent(rows, cols)
    }

    /// Whether a cursor advancing `axis` can step physically
    fn is_fast(axis: Axis) -> bool {
        if axis == Self::major_axis() {
            Self::FAST_MAJOR
        } else {
            Self::FAST_MINOR
        }
    }

    /// Linear address of `(row, col)`, ordered by major then minor
    fn address(row: usize, col: usize, rows: usize, cols: usize) -> usize {
        Self::major(row, col) * Self::minor_extent(rows, cols) + Self::minor(row, col)
    }

    /// Inverse of [`Layout::address`]
    fn from_address(address: usize, rows: usize, cols: usize) -> (usize, usize) {
        let minor_extent = Self::minor_extent(rows, cols);
        if minor_extent == 0 {
            return Self::from_major_minor(address, 0);
        }
        Self::from_major_minor(address / minor_extent, address % minor_extent)
    }
}

/// Rows are the major axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowMajor;

/// Columns are the major axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnMajor;

impl Layout for RowMajor {
    const ORIENTATION: Orientation = Orientation::RowMajor;

    fn major_axis() -> Axis {
        Axis::Row
    }

    fn major(row: usize, _col: usize) -> usize {
        row
    }

    fn minor(_row: usize, col: usize) -> usize {
        col
    }

    fn from_major_minor(major: usize, minor: usize) -> (usize, usize) {
        (major, minor)
    }
}

impl Layout for ColumnMajor {
    const ORIENTATION: Orientation = Orientation::ColumnMajor;

    fn major_axis() -> Axis {
        Axis::Col
    }

    fn major(_row: usize, col: usize) -> usize {
        col
    }

    fn minor(row: usize, _col: usize) -> usize {
        row
    }

    fn from_major_minor(major: usize, minor: usize) -> (usize, usize) {
        (minor, major)
    }
}

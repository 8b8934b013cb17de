//! Sparsekit - interchangeable sparse matrix storage engines
//!
//! This library provides four storage engines for sparse two-dimensional
//! matrices. They share one element access contract and one traversal
//! protocol, so the same code reads any of them and any engine can be copied
//! into any other.
//!
//! ## Architecture
//!
//! Sparsekit separates contracts from engines:
//!
//! - **sparsekit-core**: Layout policies, traits, traversal protocol and validation (no_std)
//! - **sparsekit**: Concrete storage engines, configuration and logging
//!
//! ## Quick Start
//!
//! ```rust
//! use sparsekit::{CompressedMatrix, Orientation, SparseMatrix, SparseMatrixMut, Traverse};
//!
//! let mut matrix = CompressedMatrix::<f64>::new(3, 3);
//! matrix.set(0, 2, 1.5);
//! matrix.set(2, 0, 4.0);
//! assert_eq!(matrix.get(0, 2), 1.5);
//! assert_eq!(matrix.get(1, 1), 0.0);
//!
//! // Column order over row-major storage
//! let entries: Vec<_> = matrix.entries(Orientation::ColumnMajor).collect();
//! assert_eq!(entries, vec![(2, 0, 4.0), (0, 2, 1.5)]);
//! ```
//!
//! ## Engines
//!
//! - **MapMatrix**: One ordered map keyed by linear address
//! - **VectorOfVectorMatrix**: One ordered map per major line
//! - **CompressedMatrix**: CSR/CSC arrays with an offset table
//! - **CoordinateMatrix**: Append-only triplets, sorted and merged lazily
//!
//! Each engine takes a layout parameter, [`RowMajor`] by default or
//! [`ColumnMajor`].
//!
//! ## Features
//!
//! - **parallel**: Sort large coordinate compactions with rayon
//! - **serde**: Serialize configuration and layout types

// Re-export core abstractions
pub use sparsekit_core::{
    // Layout
    Axis, ColumnMajor, Layout, Orientation, RowMajor,
    // Core traits
    ElementRef, MatrixElement, MatrixOperations, SparseMatrix, SparseMatrixMut,
    // Traversal
    Cursor, Direction, Entries, Line, Located, Rank, Traverse,
    // Error handling
    ErrorCategory, Result, SparseError,
};

// Implementation modules
pub mod compressed;
pub mod config;
pub mod coordinate;
pub mod map_matrix;
pub mod vector_of_vector;

mod proptests;
mod tests;

// Public exports
pub use compressed::CompressedMatrix;
pub use config::StorageConfig;
pub use coordinate::CoordinateMatrix;
pub use map_matrix::MapMatrix;
pub use vector_of_vector::VectorOfVectorMatrix;
